pub mod threshold;
pub mod transaction;
pub mod window;
