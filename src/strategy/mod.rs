pub mod implementations;
pub mod rates;
pub mod traits;
