use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LOCAL_FRONTEND: &str = "http://localhost:3000";
const RENDER_CACHE_DIR: &str = "/opt/render/.cache/puppeteer";

#[derive(Debug, Clone, Deserialize)]
pub struct A11yConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub scanner: ScannerConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Absent key disables every AI feature except quiz grading, which falls back.
    pub api_key: Option<Secret<String>>,
    pub api_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    pub node_binary: String,
    /// Directory whose `node_modules` holds pa11y.
    pub workdir: Option<PathBuf>,
    pub process_timeout_secs: u64,
    pub executable_path: Option<PathBuf>,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub analyse_per_minute: u32,
    /// Key on `x-forwarded-for`/`x-real-ip` instead of the socket peer.
    pub trust_proxy_headers: bool,
}

impl A11yConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load_for_service(DEFAULT_PORT)?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let frontend_url = if is_prod {
            Some(get_env("FRONTEND_URL", None, is_prod)?)
        } else {
            optional_env("FRONTEND_URL")
        };

        Ok(A11yConfig {
            common,
            openai: OpenAiConfig {
                api_key: optional_env("OPENAI_API_KEY").map(Secret::new),
                api_url: get_env("OPENAI_API_URL", Some(DEFAULT_OPENAI_API_URL), false)?,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), false)?,
                request_timeout_secs: parse_env("OPENAI_TIMEOUT_SECS", 120)?,
            },
            scanner: ScannerConfig {
                node_binary: get_env("PA11Y_NODE_BINARY", Some("node"), false)?,
                workdir: optional_env("PA11Y_WORKDIR").map(PathBuf::from),
                process_timeout_secs: parse_env("PA11Y_PROCESS_TIMEOUT_SECS", 120)?,
                executable_path: optional_env("PUPPETEER_EXECUTABLE_PATH").map(PathBuf::from),
                cache_dir: puppeteer_cache_dir(
                    optional_env("PUPPETEER_CACHE_DIR"),
                    optional_env("HOME"),
                ),
            },
            cors: CorsConfig {
                allowed_origins: allowed_origins(frontend_url),
            },
            rate_limit: RateLimitConfig {
                analyse_per_minute: parse_env("ANALYSE_RATE_LIMIT_PER_MIN", 10)?,
                trust_proxy_headers: parse_env("TRUST_PROXY_HEADERS", false)?,
            },
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
        })
    }
}

/// Explicit cache dir, else `$HOME/.cache/puppeteer`, else the Render default.
pub fn puppeteer_cache_dir(explicit: Option<String>, home: Option<String>) -> PathBuf {
    match (explicit, home) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(home)) => PathBuf::from(home).join(".cache").join("puppeteer"),
        (None, None) => PathBuf::from(RENDER_CACHE_DIR),
    }
}

pub fn allowed_origins(frontend_url: Option<String>) -> Vec<String> {
    frontend_url
        .into_iter()
        .chain(std::iter::once(DEFAULT_LOCAL_FRONTEND.to_string()))
        .collect()
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        None => Ok(default),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
