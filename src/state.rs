use crate::config::AppConfig;
use crate::sources::{FileSourceLoader, SourceLoader};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sources: Arc<dyn SourceLoader>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let sources = Arc::new(FileSourceLoader::new(config.data_dir.clone())) as Arc<dyn SourceLoader>;
        tracing::info!(data_dir = %config.data_dir.display(), "file source loader ready");
        Ok(Self::from_parts(config, sources))
    }

    pub fn from_parts(config: Arc<AppConfig>, sources: Arc<dyn SourceLoader>) -> Self {
        Self { config, sources }
    }

    #[cfg(test)]
    pub fn fake(sources: crate::sources::StaticSourceLoader) -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: "fake".into(),
        });
        Self::from_parts(config, Arc::new(sources) as Arc<dyn SourceLoader>)
    }
}
