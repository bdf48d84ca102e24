//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use analysis_engine::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use analysis_engine::OpenAiConfig;
use clap::Parser;
use rand::RngCore;

/// bcrypt work factor for stored passwords
pub const BCRYPT_COST: u32 = 12;

/// Command-line arguments for the LexiAI API server
///
/// Every flag falls back to an environment variable, so a `.env` file is
/// enough to configure a deployment.
#[derive(Parser, Debug, Clone)]
#[command(name = "lexiai-api")]
#[command(about = "LexiAI legal document analysis API")]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// SQLite connection string (defaults to a file in the platform data dir)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory uploaded documents are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Secret for signing bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Secret for signing session cookies
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Timeout for a single language-model request, in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "120")]
    pub llm_timeout_secs: u64,

    /// Report render timeout in milliseconds
    #[arg(long, env = "RENDER_TIMEOUT_MS", default_value = "10000")]
    pub render_timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "RATE_LIMIT", default_value = "10")]
    pub rate_limit: u32,

    /// JSON file of glossary terms to load at startup
    #[arg(long, env = "GLOSSARY_PATH")]
    pub glossary: Option<PathBuf>,

    /// Deployment environment; `production` turns on secure cookies
    #[arg(long, env = "NODE_ENV", default_value = "development")]
    pub environment: String,

    /// Force production settings regardless of NODE_ENV
    #[arg(long)]
    pub production: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runtime settings shared by the handlers
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub session_secret: String,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    pub render_timeout_ms: u64,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Settings with freshly generated secrets, for embedding and tests
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            jwt_secret: random_secret(),
            session_secret: random_secret(),
            secure_cookies: false,
            render_timeout_ms: 10_000,
            bcrypt_cost: BCRYPT_COST,
        }
    }
}

impl Args {
    pub fn is_production(&self) -> bool {
        self.production || self.environment.eq_ignore_ascii_case("production")
    }

    /// Rate limiter burst: twice the per-second rate
    pub fn burst_size(&self) -> u32 {
        self.rate_limit.saturating_mul(2)
    }

    pub fn config(&self) -> Config {
        Config {
            upload_dir: self.upload_dir.clone(),
            jwt_secret: secret_or_random("JWT_SECRET", self.jwt_secret.as_deref()),
            session_secret: secret_or_random("SESSION_SECRET", self.session_secret.as_deref()),
            secure_cookies: self.is_production(),
            render_timeout_ms: self.render_timeout_ms,
            bcrypt_cost: BCRYPT_COST,
        }
    }

    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

fn secret_or_random(name: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(secret) => secret.to_string(),
        None => {
            tracing::warn!("{name} not set; using a per-process secret, tokens and sessions will not survive a restart");
            random_secret()
        }
    }
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
