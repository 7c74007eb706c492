use super::session::GenerationSession;
use crate::models::GeneratedImage;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// What the full-size viewer is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerEntry {
    pub address: String,
    pub prompt: String,
}

/// Read side of the session plus the viewer. The image list always comes from
/// the session; only the viewer entry is stored here.
#[derive(Debug, Clone)]
pub struct Gallery {
    session: GenerationSession,
    viewer: Arc<Mutex<Option<ViewerEntry>>>,
}

impl Gallery {
    pub fn new(session: GenerationSession) -> Self {
        Self {
            session,
            viewer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn images(&self) -> Vec<GeneratedImage> {
        self.session.images()
    }

    /// Opens the viewer, replacing whatever was open.
    pub fn select(&self, address: impl Into<String>, prompt: impl Into<String>) {
        let entry = ViewerEntry {
            address: address.into(),
            prompt: prompt.into(),
        };
        log::debug!("Opening viewer for {}", entry.address);
        *self.lock() = Some(entry);
    }

    pub fn open(&self, image: &GeneratedImage) {
        self.select(image.address.clone(), image.original_prompt.clone());
    }

    pub fn dismiss(&self) {
        *self.lock() = None;
    }

    pub fn viewer(&self) -> Option<ViewerEntry> {
        self.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ViewerEntry>> {
        self.viewer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
