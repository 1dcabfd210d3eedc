//! On-disk cache generations for the offline shim.
//!
//! Each cache generation is one directory under the store root, named by
//! its version tag. An entry is keyed by request URL and stored as a
//! metadata sidecar (`.json`) plus the raw body (`.bin`). Only one
//! generation is meant to be live at a time; superseded generations are
//! purged on activation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::fetch::Response;

/// Metadata sidecar for one cached response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    content_type: Option<String>,
    cached_at: DateTime<Utc>,
}

/// A response read back from the cache, with its storage timestamp.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub response: Response,
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }
}

pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache root: {}", root.display()))?;
        Ok(Self { root })
    }

    fn generation_dir(&self, tag: &str) -> PathBuf {
        self.root.join(tag)
    }

    fn entry_paths(&self, tag: &str, url: &str) -> (PathBuf, PathBuf) {
        let name = urlencoding::encode(url).into_owned();
        let dir = self.generation_dir(tag);
        (dir.join(format!("{}.json", name)), dir.join(format!("{}.bin", name)))
    }

    /// Create the directory for a new generation.
    pub fn open_generation(&self, tag: &str) -> Result<()> {
        std::fs::create_dir_all(self.generation_dir(tag))
            .with_context(|| format!("Failed to create cache generation: {}", tag))?;
        Ok(())
    }

    /// Store a response under the given generation, replacing any prior
    /// entry for the same URL.
    pub fn put(&self, tag: &str, url: &str, response: &Response) -> Result<()> {
        self.open_generation(tag)?;
        let (meta_path, body_path) = self.entry_paths(tag, url);

        let meta = EntryMeta {
            url: url.to_string(),
            status: response.status.as_u16(),
            content_type: response.content_type.clone(),
            cached_at: Utc::now(),
        };
        std::fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)
            .with_context(|| format!("Failed to write cache metadata for {}", url))?;
        std::fs::write(&body_path, &response.body)
            .with_context(|| format!("Failed to write cache body for {}", url))?;
        Ok(())
    }

    /// Look up a cached response by URL within one generation.
    pub fn get(&self, tag: &str, url: &str) -> Result<Option<CachedResponse>> {
        let (meta_path, body_path) = self.entry_paths(tag, url);
        if !meta_path.exists() || !body_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&meta_path)
            .with_context(|| format!("Failed to read cache metadata for {}", url))?;
        let meta: EntryMeta = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache metadata for {}", url))?;
        let body = std::fs::read(&body_path)
            .with_context(|| format!("Failed to read cache body for {}", url))?;

        let status = StatusCode::from_u16(meta.status)
            .with_context(|| format!("Invalid cached status {} for {}", meta.status, url))?;

        Ok(Some(CachedResponse {
            response: Response {
                status,
                content_type: meta.content_type,
                body,
            },
            cached_at: meta.cached_at,
        }))
    }

    /// List existing generation tags.
    pub fn generations(&self) -> Result<Vec<String>> {
        let mut tags = Vec::new();
        for entry in std::fs::read_dir(&self.root).context("Failed to read cache root")? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    tags.push(name);
                }
            }
        }
        tags.sort();
        Ok(tags)
    }

    /// Delete one generation and everything in it.
    pub fn delete_generation(&self, tag: &str) -> Result<()> {
        let dir = self.generation_dir(tag);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to delete cache generation: {}", tag))?;
        }
        Ok(())
    }

    /// Delete every generation except `keep`. Returns the purged tags.
    pub fn purge_except(&self, keep: &str) -> Result<Vec<String>> {
        let mut purged = Vec::new();
        for tag in self.generations()? {
            if tag != keep {
                self.delete_generation(&tag)?;
                purged.push(tag);
            }
        }
        Ok(purged)
    }
}
