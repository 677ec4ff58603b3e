use std::env;

use anyhow::{bail, Context};
use chrono::{Local, Utc};
use tracing::info;

use stock_forecast::io::history::read_history_file;
use stock_forecast::io::labels::{Milestone, ThresholdLabel};
use stock_forecast::io::reporting::write_series_file;
use stock_forecast::io::synthetic::{generate_history, SyntheticProfile};
use stock_forecast::{logging, ForecastConfig, ForecastEngine, Thresholds};

const USAGE: &str =
    "usage: stock-forecast [history.csv] [--quantity N] [--low N] [--critical N] [--export out.csv] [--seed N]";

#[derive(Debug)]
struct Options {
    history_path: Option<String>,
    quantity: f64,
    low: f64,
    critical: f64,
    export_path: Option<String>,
    seed: u64,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut options = Options {
            history_path: None,
            quantity: 120.0,
            low: 30.0,
            critical: 10.0,
            export_path: None,
            seed: 42,
        };

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().with_context(|| format!("{flag} needs a value"));
            match arg.as_str() {
                "--quantity" => options.quantity = value("--quantity")?.parse::<f64>().context("--quantity")?,
                "--low" => options.low = value("--low")?.parse::<f64>().context("--low")?,
                "--critical" => options.critical = value("--critical")?.parse::<f64>().context("--critical")?,
                "--export" => options.export_path = Some(value("--export")?),
                "--seed" => options.seed = value("--seed")?.parse::<u64>().context("--seed")?,
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
                path => options.history_path = Some(path.to_string()),
            }
        }
        Ok(options)
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let options = Options::parse(env::args().skip(1))?;
    let now = Local::now();

    // 1. LOAD OR GENERATE HISTORY
    let history = match &options.history_path {
        Some(path) => {
            let import = read_history_file(path).with_context(|| format!("reading {path}"))?;
            if import.skipped > 0 {
                println!("Skipped {} malformed rows from {}", import.skipped, path);
            }
            import.transactions
        }
        None => {
            info!(seed = options.seed, "no history file given, generating a synthetic one");
            generate_history(&SyntheticProfile::default(), now.with_timezone(&Utc), options.seed)?
        }
    };

    // 2. RUN THE ENGINE
    let engine = ForecastEngine::new(ForecastConfig::default())?;
    let result = engine.analyze(
        &history,
        options.quantity,
        Thresholds::new(options.low, options.critical),
        &now,
    )?;

    // 3. SUMMARY
    println!("=== Stock forecast ({} transactions) ===", history.len());
    println!(
        "Supplies: {} ({:+}%) | Orders: {} ({:+}%) | Wastage: {} ({:+}%, {}% of consumption)",
        result.total_in,
        result.in_growth,
        result.total_out,
        result.orders_growth,
        result.total_wastage,
        result.wastage_growth,
        result.wastage_rate,
    );
    println!("Average daily consumption: {}", result.avg_daily_out_display());
    println!("Stock now: {} ({:?})", options.quantity, result.status);

    let today = now.date_naive();
    for (milestone, days, urgent) in [
        (Milestone::Low, result.days_to_low, result.low_stock_urgent()),
        (Milestone::Critical, result.days_to_critical, result.critical_stock_urgent()),
        (Milestone::Zero, result.days_to_zero, false),
    ] {
        let label = ThresholdLabel::new(milestone, days, today);
        let date = label.date.map(|d| format!(" (~{d})")).unwrap_or_default();
        let flag = if urgent { " !" } else { "" };
        println!("{:>14}: {} {}{}{}", milestone.title(), label.value, label.caption, date, flag);
    }

    // 4. EXPORT
    if let Some(path) = &options.export_path {
        write_series_file(path, &result).with_context(|| format!("writing {path}"))?;
        println!("Series written to {path}");
    }

    Ok(())
}
