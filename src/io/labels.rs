// src/io/labels.rs

//! Text for the stock timeline: how many days until each milestone and when.

use chrono::{Duration, NaiveDate};

use crate::model::threshold::DaysUntil;

/// Milestones shown on the stock timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Low,
    Critical,
    Zero,
}

impl Milestone {
    pub fn title(self) -> &'static str {
        match self {
            Milestone::Low => "Порог закупки",
            Milestone::Critical => "Критический",
            Milestone::Zero => "Нет в наличии",
        }
    }

    fn reached_caption(self) -> &'static str {
        match self {
            Milestone::Low => "достигнут",
            Milestone::Critical => "критично",
            Milestone::Zero => "закончился",
        }
    }
}

/// Russian plural of "day" for a count: 1 день, 2 дня, 5 дней, 11 дней, 21 день.
pub fn day_declension(count: u32) -> &'static str {
    let (last, last_two) = (count % 10, count % 100);
    if last == 1 && last_two != 11 {
        "день"
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        "дня"
    } else {
        "дней"
    }
}

/// Rendered milestone: big value, caption under it, optional projected date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdLabel {
    pub value: String,
    pub caption: &'static str,
    pub date: Option<NaiveDate>,
}

impl ThresholdLabel {
    pub fn new(milestone: Milestone, days: DaysUntil, today: NaiveDate) -> Self {
        match days {
            DaysUntil::In(0) => Self {
                value: "—".to_string(),
                caption: milestone.reached_caption(),
                date: Some(today),
            },
            DaysUntil::In(d) => Self {
                value: d.to_string(),
                caption: day_declension(d),
                date: Some(today + Duration::days(d as i64)),
            },
            DaysUntil::Never => Self {
                value: "∞".to_string(),
                caption: "дней",
                date: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_declension() {
        assert_eq!(day_declension(1), "день");
        assert_eq!(day_declension(21), "день");
        assert_eq!(day_declension(2), "дня");
        assert_eq!(day_declension(34), "дня");
        assert_eq!(day_declension(5), "дней");
        assert_eq!(day_declension(11), "дней");
        assert_eq!(day_declension(12), "дней");
        assert_eq!(day_declension(111), "дней");
        assert_eq!(day_declension(0), "дней");
    }

    #[test]
    fn test_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let reached = ThresholdLabel::new(Milestone::Low, DaysUntil::NOW, today);
        assert_eq!(reached.value, "—");
        assert_eq!(reached.caption, "достигнут");

        let soon = ThresholdLabel::new(Milestone::Critical, DaysUntil::In(3), today);
        assert_eq!(soon.value, "3");
        assert_eq!(soon.caption, "дня");
        assert_eq!(soon.date, NaiveDate::from_ymd_opt(2024, 6, 18));

        let never = ThresholdLabel::new(Milestone::Zero, DaysUntil::Never, today);
        assert_eq!(never.value, "∞");
        assert_eq!(never.date, None);
    }
}
