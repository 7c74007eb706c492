use super::options::{Quality, Resolution, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One image of a batch. Built once when the batch is assembled and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Fully formed image-service address.
    pub address: String,
    /// The user's text before style and quality phrases were added.
    pub original_prompt: String,
    pub style: Style,
    pub resolution: Resolution,
    pub quality: Quality,
    pub seed: u32,
    pub width: u32,
    pub height: u32,
}

impl GeneratedImage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}
