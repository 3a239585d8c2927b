use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables (or a `.env` file).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). LLM calls are slow,
    /// so this is longer than a typical API timeout.
    pub request_timeout_secs: u64,
    /// Chat-completions API settings.
    pub llm: LlmConfig,
    /// Knowledge store backend.
    pub store: StoreConfig,
}

/// Settings for the upstream chat-completions API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL; requests go to `{api_url}/chat/completions`.
    pub api_url: String,
    /// Bearer token. Chat and analysis endpoints return 503 without one.
    pub api_key: Option<String>,
    /// Model used when a request does not name one.
    pub default_model: String,
}

/// Which knowledge store backend to open at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// JSON array file, created with seed data if missing.
    File(PathBuf),
    /// PostgreSQL connection URL.
    Postgres(String),
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                     |
    /// |-------------------------|-----------------------------|
    /// | `HOST`                  | `0.0.0.0`                   |
    /// | `PORT`                  | `3000`                      |
    /// | `CORS_ORIGINS`          | `*`                         |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                        |
    /// | `LLM_API_URL`           | `https://api.deepseek.com`  |
    /// | `LLM_API_KEY`           | (falls back to `DEEPSEEK_API_KEY`) |
    /// | `LLM_DEFAULT_MODEL`     | `deepseek-chat`             |
    /// | `DATABASE_URL`          | unset (use the file store)  |
    /// | `KNOWLEDGE_FILE`        | `knowledge-base.json`       |
    ///
    /// Panics on malformed numeric values so misconfiguration fails fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            llm: LlmConfig::from_env(),
            store: StoreConfig::from_env(),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("LLM_API_URL").unwrap_or_else(|_| ragdesk_llm::DEFAULT_API_URL.into());

        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("DEEPSEEK_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let default_model = std::env::var("LLM_DEFAULT_MODEL")
            .unwrap_or_else(|_| ragdesk_llm::DEFAULT_MODEL.into());

        Self {
            api_url,
            api_key,
            default_model,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => StoreConfig::Postgres(url),
            _ => StoreConfig::File(
                std::env::var("KNOWLEDGE_FILE")
                    .unwrap_or_else(|_| "knowledge-base.json".into())
                    .into(),
            ),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }
}
