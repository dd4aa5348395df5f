use std::env;

use thiserror::Error;

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_PROMPTS_PATH: &str = "prompts.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required env var: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub prompts_path: String,
    pub bind_addr: String,
    pub site_url: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let openrouter_api_key = required("LRS_OPENROUTER_API_KEY")?;
        let supabase_url = required("LRS_SUPABASE_URL")?;
        let supabase_key = required("LRS_SUPABASE_KEY")?;

        let openrouter_base_url = optional("LRS_OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL);
        let prompts_path = optional("LRS_PROMPTS_PATH", DEFAULT_PROMPTS_PATH);
        let bind_addr = optional("LRS_BIND_ADDR", DEFAULT_BIND_ADDR);
        let site_url = optional("LRS_SITE_URL", DEFAULT_SITE_URL);
        let log_level = optional("LRS_LOG_LEVEL", "info");

        Ok(Config {
            openrouter_api_key,
            openrouter_base_url,
            supabase_url,
            supabase_key,
            prompts_path,
            bind_addr,
            site_url,
            log_level,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
