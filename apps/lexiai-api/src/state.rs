//! Application state for the LexiAI API

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use analysis_engine::{ChatModel, LegalAnalyzer, LegalAssistant, OpenAiClient, Translator};
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::{Args, Config};
use crate::db;

pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub analyzer: LegalAnalyzer,
    pub translator: Translator,
    pub assistant: LegalAssistant,
}

impl AppState {
    pub async fn new(args: &Args) -> Result<Self> {
        // Get database path from args/env or use default
        let db_url = args.database_url.clone().unwrap_or_else(|| {
            let data_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lexiai");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/lexiai.db?mode=rwc", data_dir.display())
        });

        tracing::info!("Connecting to database: {}", db_url);
        let pool = connect(&db_url, 5).await?;

        let client = OpenAiClient::new(args.openai())?;
        tracing::info!(
            model = client.model(),
            configured = client.is_configured(),
            "Language model client ready"
        );
        let model: Arc<dyn ChatModel> = Arc::new(client);
        let state = Self::from_parts(pool, args.config(), model).await?;

        if let Some(path) = &args.glossary {
            let loaded = db::glossary::load_file(&state.db, path).await?;
            tracing::info!("Loaded {} glossary terms from {}", loaded, path.display());
        }

        Ok(state)
    }

    /// Assemble state around an existing pool and language model
    ///
    /// Runs migrations and creates the upload directory.
    pub async fn from_parts(db: SqlitePool, config: Config, model: Arc<dyn ChatModel>) -> Result<Self> {
        db::run_migrations(&db).await?;

        let purged = db::sessions::purge_expired(&db).await?;
        if purged > 0 {
            tracing::info!("Purged {} expired sessions", purged);
        }

        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;

        Ok(Self {
            db,
            config,
            analyzer: LegalAnalyzer::new(model.clone()),
            translator: Translator::new(model.clone()),
            assistant: LegalAssistant::new(model),
        })
    }
}

/// Open a SQLite pool with foreign keys enforced
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid DATABASE_URL {url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
