pub mod archiver;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod database;
pub mod dates;
pub mod error;
pub mod fetcher;
pub mod global;
pub mod output;
pub mod types;
