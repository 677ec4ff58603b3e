pub mod config;
pub mod depletion;
pub mod engine;
