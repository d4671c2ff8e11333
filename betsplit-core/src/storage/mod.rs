use crate::error::{BetSplitError, Result};
use crate::session::Session;
use crate::types::Money;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const FILE_PREFIX: &str = "betting_session_";
const FILE_EXTENSION: &str = "json";
const MAX_NAME_ATTEMPTS: usize = 100;

/// Listing entry for a stored session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub path: PathBuf,
    pub event: String,
    pub date: String,
    pub bettors: usize,
    pub bets: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_pool: Money,
}

/// JSON session files kept in one data directory.
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write a session to a freshly named file and return its path.
    ///
    /// Never replaces an existing file: on a name clash a `_2`, `_3`, ...
    /// suffix is tried instead.
    pub async fn create(&self, session: &Session) -> Result<PathBuf> {
        self.create_with_stem(&file_stem_for(&session.event), session).await
    }

    async fn create_with_stem(&self, stem: &str, session: &Session) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(session)?;

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 1 {
                format!("{}.{}", stem, FILE_EXTENSION)
            } else {
                format!("{}_{}.{}", stem, attempt, FILE_EXTENSION)
            };
            let path = self.data_dir.join(file_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!("{} already exists, trying another name", path.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;

            tracing::info!("Created session file {}", path.display());
            return Ok(path);
        }

        Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free file name for session '{}'", session.event),
        )
        .into())
    }

    pub async fn save(&self, path: &Path, session: &Session) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(session)?;
        tokio::fs::write(path, content).await?;

        tracing::debug!("Saved session '{}' to {}", session.event, path.display());
        Ok(())
    }

    pub async fn load(&self, path: &Path) -> Result<Session> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BetSplitError::SessionNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map_err(|e| BetSplitError::malformed(format!("{}: {}", path.display(), e)))
    }

    /// Resolve a path, a file name inside the data directory, or a file stem.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let direct = PathBuf::from(reference);
        if direct.is_file() {
            return Ok(direct);
        }

        let in_dir = self.data_dir.join(reference);
        if in_dir.is_file() {
            return Ok(in_dir);
        }

        let with_extension = self
            .data_dir
            .join(format!("{}.{}", reference, FILE_EXTENSION));
        if with_extension.is_file() {
            return Ok(with_extension);
        }

        Err(BetSplitError::SessionNotFound { path: direct })
    }

    /// Every readable session in the data directory, newest first.
    pub async fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut summaries = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_session_file(&path) {
                continue;
            }

            match self.load(&path).await {
                Ok(session) => summaries.push(SessionSummary {
                    event: session.event,
                    date: session.date,
                    bettors: session.bettors.len(),
                    bets: session.bets.len(),
                    total_pool: session.bettors.iter().map(|b| b.stake).sum(),
                    path,
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        // DATE_FORMAT sorts lexicographically
        summaries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(summaries)
    }
}

/// `betting_session_<event>_<YYYYmmdd_HHMMSS>.json`, spaces as underscores.
pub fn file_name_for(event: &str) -> String {
    format!("{}.{}", file_stem_for(event), FILE_EXTENSION)
}

fn file_stem_for(event: &str) -> String {
    let event: String = event
        .trim()
        .chars()
        .map(|c| if c == ' ' || std::path::is_separator(c) { '_' } else { c })
        .collect();
    format!(
        "{}{}_{}",
        FILE_PREFIX,
        event,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

fn is_session_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.starts_with(FILE_PREFIX));
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e == FILE_EXTENSION);
    has_prefix && is_json
}
