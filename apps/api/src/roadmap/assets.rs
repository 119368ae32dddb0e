//! Asset stores: where roadmap skill images are read from.
//!
//! `FsAssetStore` serves a local directory (default `static/roadmaps`).
//! `S3AssetStore` serves a bucket prefix on S3 / MinIO.
//!
//! `AppState` holds an `Arc<dyn AssetStore>`, picked at startup from config.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::roadmap::catalog::{is_plain_file_name, RoadmapCatalog};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Read-only access to image files by name.
///
/// `Ok(None)` means the file does not exist. `Err` is reserved for storage
/// failures (permissions, network), which must not be mistaken for absence.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn fetch(&self, file_name: &str) -> Result<Option<Bytes>>;

    /// Short label for logs ("fs" | "s3").
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Local directory
// ────────────────────────────────────────────────────────────────────────────

pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsAssetStore { root: root.into() }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn fetch(&self, file_name: &str) -> Result<Option<Bytes>> {
        if !is_plain_file_name(file_name) {
            return Ok(None);
        }
        let path = self.root.join(file_name);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read asset {}", path.display())),
        }
    }

    fn backend(&self) -> &'static str {
        "fs"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO
// ────────────────────────────────────────────────────────────────────────────

pub struct S3AssetStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3AssetStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, prefix: String) -> Self {
        S3AssetStore {
            client,
            bucket,
            prefix,
        }
    }

    fn key_for(&self, file_name: &str) -> String {
        format!("{}{}", self.prefix, file_name)
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn fetch(&self, file_name: &str) -> Result<Option<Bytes>> {
        if !is_plain_file_name(file_name) {
            return Ok(None);
        }
        let key = self.key_for(file_name);
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => {
                let body = output
                    .body
                    .collect()
                    .await
                    .with_context(|| format!("Failed to read s3://{}/{key}", self.bucket))?;
                Ok(Some(body.into_bytes()))
            }
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => Ok(None),
            Err(e) => Err(anyhow!("S3 download of s3://{}/{key} failed: {e}", self.bucket)),
        }
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill resolution
// ────────────────────────────────────────────────────────────────────────────

/// Loads the image bytes for every skill that has a catalog asset present in
/// the store. Skills without one are left out of the map, which the PDF
/// builder treats as "skip this page".
pub async fn resolve_skill_assets(
    catalog: &RoadmapCatalog,
    store: &dyn AssetStore,
    skills: &[String],
) -> Result<HashMap<String, Bytes>> {
    let mut resolved = HashMap::with_capacity(skills.len());
    for skill in skills {
        if resolved.contains_key(skill) {
            continue;
        }
        let Some(file_name) = catalog.asset_for_skill(skill) else {
            debug!(skill = %skill, "Skill has no registered asset");
            continue;
        };
        match store.fetch(file_name).await? {
            Some(data) => {
                resolved.insert(skill.clone(), data);
            }
            None => {
                debug!(
                    skill = %skill,
                    file = file_name,
                    backend = store.backend(),
                    "Asset missing from store"
                );
            }
        }
    }
    Ok(resolved)
}
