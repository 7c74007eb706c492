pub mod config;
pub mod download;
pub mod error;
pub mod generation;
pub mod logger;
pub mod models;
pub mod preferences;
pub mod studio;

pub use config::{ServiceConfig, StudioConfig};
pub use download::{DownloadReport, Downloader, HttpImageFetcher, ImageFetcher};
pub use error::{Result, StudioError};
pub use generation::{
    Gallery, GenerationSession, Notifier, RequestBuilder, SeedGenerator, SessionState,
    ViewerEntry,
};
pub use models::*;
pub use preferences::PreferenceStore;
pub use studio::ImageStudio;
