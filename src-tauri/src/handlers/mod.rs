pub mod config;
pub mod history;
pub mod resolve;
pub mod utils;
