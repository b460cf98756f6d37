pub mod config;
pub mod logging;

pub mod catalog;
pub mod classify;
pub mod export;
pub mod fetch;
pub mod namer;
pub mod orchestrator;
pub mod resolver;
pub mod retry;
pub mod scanner;
pub mod storage;
pub mod url_model;
pub mod workshop;
