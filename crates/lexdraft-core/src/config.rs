use std::collections::HashMap;

use anyhow::Result;

/// Full application configuration, read from the environment with `.env`
/// fallback. Sensitive fields (API keys) come from env/.env only and are
/// never written anywhere.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: String,

    // Web
    pub web_bind: String,
    pub web_port: u16,

    // LLM provider
    /// "gemini" (default) or "ollama".
    pub llm_backend: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub llm_timeout_s: u64,

    // Uploads
    pub max_upload_bytes: usize,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_u64(key: &str, dotenv: &HashMap<String, String>, default: u64) -> u64 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_usize(key: &str, dotenv: &HashMap<String, String>, default: usize) -> usize {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();

        Ok(Config {
            data_dir: get_str("DATA_DIR", &dotenv, "store"),
            web_bind: get_str("WEB_BIND", &dotenv, "127.0.0.1"),
            web_port: get_u16("WEB_PORT", &dotenv, 5000),
            llm_backend: get_str("LLM_BACKEND", &dotenv, "gemini"),
            gemini_api_key: get_str("GEMINI_API_KEY", &dotenv, ""),
            gemini_base_url: get_str(
                "GEMINI_BASE_URL",
                &dotenv,
                "https://generativelanguage.googleapis.com",
            ),
            model: get_str("MODEL", &dotenv, "gemini-1.5-flash"),
            ollama_base_url: get_str("OLLAMA_BASE_URL", &dotenv, "http://localhost:11434"),
            ollama_model: get_str("OLLAMA_MODEL", &dotenv, "llama3.1"),
            llm_timeout_s: get_u64("LLM_TIMEOUT_S", &dotenv, 120),
            max_upload_bytes: get_usize("MAX_UPLOAD_BYTES", &dotenv, 10 * 1024 * 1024),
        })
    }
}
