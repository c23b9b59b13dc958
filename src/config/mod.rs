pub mod marketplace_config;

pub use marketplace_config::*;
