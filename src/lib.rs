pub mod config;
pub mod llm_providers;
pub mod prompts;
pub mod routes;
pub mod service;
pub mod storage;
