pub mod config;
pub mod dataset;
pub mod engine;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod storage;
