use crate::config::StudioConfig;
use crate::download::{Downloader, HttpImageFetcher, ImageFetcher};
use crate::error::Result;
use crate::generation::{Gallery, GenerationSession, Notifier, RequestBuilder, SeedGenerator};
use crate::models::GenerationOptions;
use crate::preferences::PreferenceStore;
use std::sync::Arc;

/// Everything one studio instance needs, wired from a `StudioConfig`.
pub struct ImageStudio {
    config: StudioConfig,
    session: GenerationSession,
    gallery: Gallery,
    downloader: Downloader,
    preferences: PreferenceStore,
}

impl ImageStudio {
    pub fn new(config: StudioConfig) -> Result<Self> {
        Self::with_fetcher(config, Arc::new(HttpImageFetcher::new()))
    }

    pub fn with_fetcher(config: StudioConfig, fetcher: Arc<dyn ImageFetcher>) -> Result<Self> {
        config.validate()?;

        let session = GenerationSession::new(
            RequestBuilder::from_config(&config.service),
            SeedGenerator::new(),
            Notifier::new(config.notification_ttl),
            config.pacing_delay,
        );
        let gallery = Gallery::new(session.clone());
        let downloader = Downloader::new(fetcher, config.download_dir.clone());
        let preferences = PreferenceStore::load(config.preferences_path.clone());

        log::info!("🎨 Image studio ready ({})", config.service.base_url);

        Ok(Self {
            config,
            session,
            gallery,
            downloader,
            preferences,
        })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn downloads(&self) -> &Downloader {
        &self.downloader
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut PreferenceStore {
        &mut self.preferences
    }

    pub async fn generate(&self, options: &GenerationOptions) {
        self.session.start(options).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::error::StudioError;
    use crate::generation::SessionState;
    use crate::models::{BatchSize, Theme};
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::time::Duration;

    struct FailingFetcher;

    #[async_trait]
    impl ImageFetcher for FailingFetcher {
        async fn fetch(&self, _address: &str) -> Result<Vec<u8>> {
            Err(StudioError::RequestError("connection refused".into()))
        }
    }

    fn config(dir: &std::path::Path) -> StudioConfig {
        StudioConfig::new()
            .with_pacing_delay(Duration::ZERO)
            .with_download_dir(dir.join("downloads"))
            .with_preferences_path(dir.join("prefs.json"))
    }

    #[tokio::test]
    async fn test_generate_then_view_and_fail_download() {
        let dir = tempfile::tempdir().unwrap();
        let studio =
            ImageStudio::with_fetcher(config(dir.path()), Arc::new(FailingFetcher)).unwrap();

        studio
            .generate(&GenerationOptions::new("harbor at night").with_count(BatchSize::Two))
            .await;
        let images = studio.gallery().images();
        assert_eq!(images.len(), 2);
        assert!(images[0]
            .address
            .starts_with("https://image.pollinations.ai/prompt/"));

        studio.gallery().open(&images[0]);
        let mut reports = studio.downloads().reports().unwrap();
        studio.downloads().spawn(images[0].clone()).unwrap();

        let report = reports.next().await.unwrap();
        assert!(!report.is_success());
        assert!(matches!(studio.session().state(), SessionState::Succeeded(_)));
        assert_eq!(studio.gallery().viewer().unwrap().address, images[0].address);
    }

    #[tokio::test]
    async fn test_theme_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut studio =
            ImageStudio::with_fetcher(config(dir.path()), Arc::new(FailingFetcher)).unwrap();
        assert_eq!(studio.preferences().theme(), Theme::Light);
        studio.preferences_mut().set_theme(Theme::Dark).unwrap();

        let reopened =
            ImageStudio::with_fetcher(config(dir.path()), Arc::new(FailingFetcher)).unwrap();
        assert_eq!(reopened.preferences().theme(), Theme::Dark);
    }

    #[test]
    fn test_invalid_service_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).with_service(ServiceConfig::new().with_base_url("nowhere"));

        let result = ImageStudio::with_fetcher(config, Arc::new(FailingFetcher));
        assert!(matches!(result, Err(StudioError::ConfigError(_))));
    }
}
