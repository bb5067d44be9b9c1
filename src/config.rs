//! Runtime configuration
//!
//! Values come from, in increasing precedence: built-in defaults, the YAML
//! config file, the `ANKI_DECK_API_URL` environment variable and CLI flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::constants::{
    API_URL_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_URL, LOG_FILE_NAME,
};
use crate::models::DeckFilter;
use crate::routes::Route;

/// Command line flags
#[derive(Debug, Default, Parser)]
#[command(name = "anki-deck-tui", version, about = "Manage Anki decks from the terminal")]
pub struct Cli {
    /// Base URL of the deck API
    #[arg(long, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Config file to read instead of ~/.anki-deck-tui/config.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory downloaded .apkg packages are written to
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Only list decks in this language
    #[arg(long)]
    pub language: Option<String>,

    /// Only list decks carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Screen to open first, e.g. /import or /decks/<id>/edit
    #[arg(long, default_value = "/")]
    pub route: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// No timeout unless set
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_log_file() -> PathBuf {
    config_dir().join(LOG_FILE_NAME)
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            download_dir: default_download_dir(),
            log_file: default_log_file(),
            request_timeout_secs: None,
            language: None,
            tag: None,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        config_dir().join(CONFIG_FILE_NAME)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Load the file named by the CLI (or the default one) and apply flag overrides
    pub fn from_cli(cli: &Cli) -> Result<Config> {
        let path = cli.config.clone().unwrap_or_else(Config::default_path);
        let mut config = Config::load(&path)?;
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
        if let Some(file) = &cli.log_file {
            self.log_file = file.clone();
        }
        if cli.language.is_some() {
            self.language = cli.language.clone();
        }
        if cli.tag.is_some() {
            self.tag = cli.tag.clone();
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn deck_filter(&self) -> DeckFilter {
        DeckFilter {
            language: self.language.clone(),
            tag: self.tag.clone(),
        }
    }
}

/// Start route named on the command line; unknown paths fall back to the deck list
pub fn start_route(cli: &Cli) -> Route {
    Route::parse(&cli.route).unwrap_or_else(|| {
        tracing::warn!(route = %cli.route, "Unknown start route, opening deck list");
        Route::DeckList
    })
}
