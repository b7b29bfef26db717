pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod storage;
