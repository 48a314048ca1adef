pub mod action;
pub mod compile;
pub mod config;
pub mod process;
pub mod style;

pub use crate::config::Config;
