use super::notifier::Notifier;
use super::request::RequestBuilder;
use super::resolution;
use super::seed::SeedGenerator;
use crate::error::Result;
use crate::logger;
use crate::models::{GeneratedImage, GenerationOptions, Notification};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const EMPTY_PROMPT: &str = "empty prompt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Generating,
    Succeeded(Vec<GeneratedImage>),
    Failed(String),
}

/// Builds one `GeneratedImage` per seed from the options. The enhanced prompt
/// goes to the service; the trimmed user text is kept for display.
pub fn build_batch(
    builder: &RequestBuilder,
    seeds: &SeedGenerator,
    options: &GenerationOptions,
) -> Result<Vec<GeneratedImage>> {
    let _timer = logger::timer("build batch");

    let enhanced = options.enhanced_prompt();
    let dimensions = resolution::parse(options.resolution.token())?;
    let style = options.style.preset();
    let quality = options.quality.preset();

    log::debug!("Enhanced prompt: {}", enhanced);

    let images = seeds
        .next_batch(options.count.count())
        .into_iter()
        .map(|seed| GeneratedImage {
            address: builder.build(
                &enhanced,
                dimensions.width,
                dimensions.height,
                seed,
                Some(style.model),
                quality.enhance,
            ),
            original_prompt: options.trimmed_prompt().to_string(),
            style: options.style,
            resolution: options.resolution,
            quality: options.quality,
            seed,
            width: dimensions.width,
            height: dimensions.height,
        })
        .collect();

    Ok(images)
}

/// The single live generation session. Clones share the same state.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    state: Arc<Mutex<SessionState>>,
    builder: RequestBuilder,
    seeds: SeedGenerator,
    notifier: Notifier,
    pacing_delay: Duration,
}

impl GenerationSession {
    pub fn new(
        builder: RequestBuilder,
        seeds: SeedGenerator,
        notifier: Notifier,
        pacing_delay: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::Idle)),
            builder,
            seeds,
            notifier,
            pacing_delay,
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn is_generating(&self) -> bool {
        matches!(*self.lock(), SessionState::Generating)
    }

    /// Images of the last successful batch, empty in every other state.
    pub fn images(&self) -> Vec<GeneratedImage> {
        match &*self.lock() {
            SessionState::Succeeded(images) => images.clone(),
            _ => Vec::new(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Runs one batch. A call made while another batch is in flight does
    /// nothing at all. Dropping the returned future does not stop the batch.
    pub async fn start(&self, options: &GenerationOptions) {
        if let Some(handle) = self.launch(options) {
            if let Err(e) = handle.await {
                log::error!("Batch task ended abnormally: {}", e);
            }
        }
    }

    /// Commits the transition to `Generating` and hands the pacing delay and
    /// publication to a background task, so the batch always completes.
    /// Returns `None` when nothing was started.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like `tokio::spawn`.
    pub fn launch(&self, options: &GenerationOptions) -> Option<JoinHandle<()>> {
        if !self.begin(options) {
            return None;
        }

        match build_batch(&self.builder, &self.seeds, options) {
            Ok(images) => {
                let session = self.clone();
                Some(tokio::spawn(async move {
                    tokio::time::sleep(session.pacing_delay).await;
                    session.publish(images);
                }))
            }
            Err(e) => {
                self.fail(e.to_string());
                None
            }
        }
    }

    fn begin(&self, options: &GenerationOptions) -> bool {
        let mut state = self.lock();

        if matches!(*state, SessionState::Generating) {
            log::debug!("Generation already in progress, ignoring start");
            return false;
        }

        if options.trimmed_prompt().is_empty() {
            *state = SessionState::Failed(EMPTY_PROMPT.to_string());
            drop(state);
            self.notifier.emit(Notification::error(
                "Please enter a prompt to generate images",
            ));
            return false;
        }

        // Previous results go away as soon as the new batch starts.
        *state = SessionState::Generating;
        drop(state);

        self.notifier.emit(Notification::info(format!(
            "Generating {} image(s)...",
            options.count.count()
        )));
        true
    }

    fn publish(&self, images: Vec<GeneratedImage>) {
        let count = images.len();
        *self.lock() = SessionState::Succeeded(images);
        self.notifier.emit(Notification::success(format!(
            "Successfully generated {} image(s)!",
            count
        )));
    }

    fn fail(&self, reason: String) {
        *self.lock() = SessionState::Failed(reason.clone());
        self.notifier.emit(Notification::error(reason));
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
