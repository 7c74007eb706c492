pub mod gallery;
pub mod notifier;
pub mod request;
pub mod resolution;
pub mod sanitize;
pub mod seed;
pub mod session;

pub use gallery::{Gallery, ViewerEntry};
pub use notifier::Notifier;
pub use request::RequestBuilder;
pub use sanitize::sanitize;
pub use seed::SeedGenerator;
pub use session::{build_batch, GenerationSession, SessionState};
