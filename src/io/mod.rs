pub mod history;
pub mod labels;
pub mod reporting;
pub mod synthetic;
