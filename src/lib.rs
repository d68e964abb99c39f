pub mod config;
pub mod error;
pub mod runner;
pub mod scoring_core;
