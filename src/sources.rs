use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Upstream sources the service knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKey {
    A,
    B,
    C,
    D,
}

impl SourceKey {
    pub const ALL: [SourceKey; 4] = [SourceKey::A, SourceKey::B, SourceKey::C, SourceKey::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKey::A => "a",
            SourceKey::B => "b",
            SourceKey::C => "c",
            SourceKey::D => "d",
        }
    }

    pub fn file_name(&self) -> String {
        format!("source_{}.json", self.as_str())
    }
}

impl FromStr for SourceKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(SourceKey::A),
            "b" => Ok(SourceKey::B),
            "c" => Ok(SourceKey::C),
            "d" => Ok(SourceKey::D),
            other => anyhow::bail!("unknown source key: {}", other),
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetches the raw, untyped payload for one source.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn load(&self, key: SourceKey) -> anyhow::Result<Vec<Value>>;
}

/// Reads `<dir>/source_<key>.json`, which must hold a top-level JSON array.
#[derive(Clone)]
pub struct FileSourceLoader {
    dir: PathBuf,
}

impl FileSourceLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SourceLoader for FileSourceLoader {
    async fn load(&self, key: SourceKey) -> anyhow::Result<Vec<Value>> {
        let path = self.dir.join(key.file_name());
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        let payload: Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        let Value::Array(records) = payload else {
            anyhow::bail!("{} is not a JSON array", path.display());
        };
        debug!(source = %key, records = records.len(), "source payload loaded");
        Ok(records)
    }
}

/// Fixed payloads held in memory.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct StaticSourceLoader {
    payloads: std::collections::HashMap<SourceKey, Vec<Value>>,
}

#[cfg(test)]
impl StaticSourceLoader {
    pub fn with(mut self, key: SourceKey, records: Vec<Value>) -> Self {
        self.payloads.insert(key, records);
        self
    }
}

#[cfg(test)]
#[async_trait]
impl SourceLoader for StaticSourceLoader {
    async fn load(&self, key: SourceKey) -> anyhow::Result<Vec<Value>> {
        self.payloads
            .get(&key)
            .cloned()
            .with_context(|| format!("no payload for source {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_batch;

    #[test]
    fn parses_known_keys_only() {
        assert_eq!("a".parse::<SourceKey>().unwrap(), SourceKey::A);
        assert_eq!(" D ".parse::<SourceKey>().unwrap(), SourceKey::D);
        assert!("e".parse::<SourceKey>().is_err());
        assert!("".parse::<SourceKey>().is_err());
        assert_eq!(SourceKey::C.file_name(), "source_c.json");
    }

    #[tokio::test]
    async fn bundled_payloads_load_and_normalize() {
        let loader = FileSourceLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        for key in SourceKey::ALL {
            let records = loader.load(key).await.expect("bundled payload");
            assert!(!records.is_empty(), "source {} is empty", key);
            let entries = normalize_batch(&records).expect("bundled payload classifies");
            assert_eq!(entries.len(), records.len());
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let loader = FileSourceLoader::new("/definitely/not/here");
        let err = loader.load(SourceKey::A).await.unwrap_err();
        assert!(err.to_string().contains("source_a.json"));
    }

    #[tokio::test]
    async fn static_loader_serves_configured_payloads() {
        let loader = StaticSourceLoader::default().with(SourceKey::B, vec![Value::Null]);
        assert_eq!(loader.load(SourceKey::B).await.unwrap(), vec![Value::Null]);
        assert!(loader.load(SourceKey::A).await.is_err());
    }
}
