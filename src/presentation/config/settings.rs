use std::path::PathBuf;
use std::time::Duration;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Non-empty environment value, or `None`. Credentials use this so an empty
/// export behaves like an unset one.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub ai: AiSettings,
    pub storage: StorageSettings,
    pub retention: RetentionSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AiSettings {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    /// `model` field of the request payload. The reference deployment routes
    /// on the endpoint URL and ignores this, hence the `n/a` default.
    pub model: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,
    pub prompts_dir: PathBuf,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RetentionSettings {
    pub job_ttl: Duration,
    pub sweep_interval: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse_or("SERVER_PORT", 3000),
            },
            ai: AiSettings {
                endpoint: env_opt("AI_MODEL_ENDPOINT"),
                api_token: env_opt("AI_API_TOKEN"),
                model: env_or("AI_MODEL", "n/a"),
                request_timeout: Duration::from_secs(env_parse_or(
                    "AI_REQUEST_TIMEOUT_SECS",
                    120,
                )),
            },
            storage: StorageSettings {
                upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "/tmp/pdf_uploads")),
                prompts_dir: PathBuf::from(env_or("PROMPTS_DIR", "prompts")),
                static_dir: PathBuf::from(env_or("STATIC_DIR", "web")),
            },
            retention: RetentionSettings {
                job_ttl: Duration::from_secs(env_parse_or("JOB_RETENTION_SECS", 86_400)),
                sweep_interval: Duration::from_secs(env_parse_or(
                    "JOB_SWEEP_INTERVAL_SECS",
                    600,
                )),
            },
        }
    }
}
