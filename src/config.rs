//! Service configuration
//!
//! Loaded from a JSON file named by `SMART_TOOLS_CONFIG`; every field has a default
//! so a partial file (or no file at all) is valid. Secrets are never read from the file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Environment variable holding the config file path
pub const CONFIG_ENV_VAR: &str = "SMART_TOOLS_CONFIG";

/// Environment variable holding the language model API key
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Maximum characters accepted by the grammar checker and essay improver
    #[serde(default = "default_edit_limit")]
    pub max_edit_chars: usize,

    /// Maximum characters accepted by the summarizer
    #[serde(default = "default_summary_limit")]
    pub max_summary_chars: usize,

    /// Chat completions endpoint
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_temperature")]
    pub chat_temperature: f64,

    /// Exchange rate endpoints, tried in order; `{base}` is replaced by the base code
    #[serde(default = "default_rate_endpoints")]
    pub rate_endpoints: Vec<String>,

    /// Optional CSV of tax brackets replacing the built-in sample tables
    #[serde(default)]
    pub tax_table_path: Option<PathBuf>,
}

fn default_edit_limit() -> usize { 10_000 }
fn default_summary_limit() -> usize { 20_000 }
fn default_chat_endpoint() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_chat_model() -> String { "gpt-4o-mini".to_string() }
fn default_temperature() -> f64 { 0.7 }
fn default_rate_endpoints() -> Vec<String> {
    vec![
        "https://api.exchangerate-api.com/v4/latest/{base}".to_string(),
        "https://api.exchangerate.host/latest?base={base}".to_string(),
    ]
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_edit_chars: default_edit_limit(),
            max_summary_chars: default_summary_limit(),
            chat_endpoint: default_chat_endpoint(),
            chat_model: default_chat_model(),
            chat_temperature: default_temperature(),
            rate_endpoints: default_rate_endpoints(),
            tax_table_path: None,
        }
    }
}

impl ServiceConfig {
    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Load from the file named by `SMART_TOOLS_CONFIG`, or use defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("Loading config from {}", Path::new(&path).display());
                Self::from_json_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// API key for the language model, if present in the environment
    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.trim().is_empty())
    }
}
