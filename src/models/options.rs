use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    Realistic,
    Anime,
    DigitalArt,
    OilPainting,
    Cyberpunk,
    ThreeD,
}

/// Static row of the style catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePreset {
    pub label: &'static str,
    pub phrase: &'static str,
    pub model: &'static str,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Realistic,
        Style::Anime,
        Style::DigitalArt,
        Style::OilPainting,
        Style::Cyberpunk,
        Style::ThreeD,
    ];

    pub fn preset(&self) -> StylePreset {
        match self {
            Style::Realistic => StylePreset {
                label: "Realistic",
                phrase: "photorealistic, highly detailed photograph, natural lighting",
                model: "flux-realism",
            },
            Style::Anime => StylePreset {
                label: "Anime",
                phrase: "anime style, vibrant colors, studio quality illustration",
                model: "flux-anime",
            },
            Style::DigitalArt => StylePreset {
                label: "Digital Art",
                phrase: "digital art, concept art, trending on artstation",
                model: "flux",
            },
            Style::OilPainting => StylePreset {
                label: "Oil Painting",
                phrase: "oil painting, classical fine art, visible brushstrokes",
                model: "flux",
            },
            Style::Cyberpunk => StylePreset {
                label: "Cyberpunk",
                phrase: "cyberpunk style, neon lights, futuristic atmosphere",
                model: "flux",
            },
            Style::ThreeD => StylePreset {
                label: "3D Render",
                phrase: "3d render, octane render, cinematic lighting",
                model: "flux-3d",
            },
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Style::Realistic => "realistic",
            Style::Anime => "anime",
            Style::DigitalArt => "digital-art",
            Style::OilPainting => "oil-painting",
            Style::Cyberpunk => "cyberpunk",
            Style::ThreeD => "three-d",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1344x768")]
    Landscape,
    #[serde(rename = "768x1344")]
    Portrait,
    #[serde(rename = "512x512")]
    Small,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [
        Resolution::Square,
        Resolution::Landscape,
        Resolution::Portrait,
        Resolution::Small,
    ];

    /// The "WxH" token sent through the resolution codec.
    pub fn token(&self) -> &'static str {
        match self {
            Resolution::Square => "1024x1024",
            Resolution::Landscape => "1344x768",
            Resolution::Portrait => "768x1344",
            Resolution::Small => "512x512",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    High,
    Ultra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityPreset {
    pub label: &'static str,
    pub suffix: Option<&'static str>,
    pub enhance: bool,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Standard, Quality::High, Quality::Ultra];

    pub fn preset(&self) -> QualityPreset {
        match self {
            Quality::Standard => QualityPreset {
                label: "Standard",
                suffix: None,
                enhance: false,
            },
            Quality::High => QualityPreset {
                label: "High",
                suffix: Some("high quality, sharp focus, detailed"),
                enhance: false,
            },
            Quality::Ultra => QualityPreset {
                label: "Ultra",
                suffix: Some("ultra high quality, 8k, masterpiece, intricate details"),
                enhance: true,
            },
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Quality::Standard => "standard",
            Quality::High => "high",
            Quality::Ultra => "ultra",
        }
    }
}

/// Number of images in one batch: 1, 2 or 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BatchSize {
    #[default]
    One,
    Two,
    Four,
}

impl BatchSize {
    pub fn count(&self) -> usize {
        match self {
            BatchSize::One => 1,
            BatchSize::Two => 2,
            BatchSize::Four => 4,
        }
    }
}

impl TryFrom<u32> for BatchSize {
    type Error = StudioError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(BatchSize::One),
            2 => Ok(BatchSize::Two),
            4 => Ok(BatchSize::Four),
            other => Err(StudioError::ValidationError(format!(
                "image count must be 1, 2 or 4, got {}",
                other
            ))),
        }
    }
}

impl From<BatchSize> for u32 {
    fn from(size: BatchSize) -> Self {
        size.count() as u32
    }
}

macro_rules! token_enum_str {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }

        impl FromStr for $ty {
            type Err = StudioError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim().to_ascii_lowercase();
                $ty::ALL
                    .into_iter()
                    .find(|candidate| candidate.token() == wanted)
                    .ok_or_else(|| {
                        StudioError::ValidationError(format!("unknown {} '{}'", $kind, s))
                    })
            }
        }
    };
}

token_enum_str!(Style, "style");
token_enum_str!(Resolution, "resolution");
token_enum_str!(Quality, "quality");

impl FromStr for BatchSize {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| StudioError::ValidationError(format!("invalid image count '{}'", s)))?;
        BatchSize::try_from(value)
    }
}

/// Snapshot of what the user asked for. The prompt is only checked when a
/// generation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub prompt: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub count: BatchSize,
}

impl GenerationOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: Style::default(),
            resolution: Resolution::default(),
            quality: Quality::default(),
            count: BatchSize::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_count(mut self, count: BatchSize) -> Self {
        self.count = count;
        self
    }

    pub fn trimmed_prompt(&self) -> &str {
        self.prompt.trim()
    }

    /// Style phrase, then the user's text, then the quality suffix if any.
    pub fn enhanced_prompt(&self) -> String {
        let mut prompt = format!("{}, {}", self.style.preset().phrase, self.trimmed_prompt());
        if let Some(suffix) = self.quality.preset().suffix {
            prompt.push_str(", ");
            prompt.push_str(suffix);
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_parse_back() {
        for style in Style::ALL {
            assert_eq!(style.token().parse::<Style>().unwrap(), style);
        }
        for resolution in Resolution::ALL {
            assert_eq!(resolution.token().parse::<Resolution>().unwrap(), resolution);
        }
        assert_eq!(" ULTRA ".parse::<Quality>().unwrap(), Quality::Ultra);
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        assert!("sketch".parse::<Style>().is_err());
        assert!("800x600".parse::<Resolution>().is_err());
        assert!(matches!(
            BatchSize::try_from(3),
            Err(StudioError::ValidationError(_))
        ));
        assert!("two".parse::<BatchSize>().is_err());
    }

    #[test]
    fn test_options_deserialize_from_tokens() {
        let options: GenerationOptions = serde_json::from_str(
            r#"{"prompt":"a fox","style":"oil-painting","resolution":"768x1344","quality":"high","count":4}"#,
        )
        .unwrap();

        assert_eq!(options.style, Style::OilPainting);
        assert_eq!(options.resolution, Resolution::Portrait);
        assert_eq!(options.quality, Quality::High);
        assert_eq!(options.count, BatchSize::Four);

        let bad = serde_json::from_str::<GenerationOptions>(r#"{"prompt":"a fox","count":3}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let options: GenerationOptions = serde_json::from_str(r#"{"prompt":"a fox"}"#).unwrap();
        assert_eq!(options, GenerationOptions::new("a fox"));
        assert_eq!(options.style, Style::Realistic);
        assert_eq!(options.resolution, Resolution::Square);
        assert_eq!(options.quality, Quality::Standard);
        assert_eq!(options.count, BatchSize::One);
    }

    #[test]
    fn test_enhanced_prompt_without_suffix() {
        let options = GenerationOptions::new("  a red fox  ").with_style(Style::Anime);
        assert_eq!(
            options.enhanced_prompt(),
            "anime style, vibrant colors, studio quality illustration, a red fox"
        );
    }

    #[test]
    fn test_enhanced_prompt_with_suffix() {
        let options = GenerationOptions::new("castle")
            .with_style(Style::ThreeD)
            .with_quality(Quality::Ultra);
        assert_eq!(
            options.enhanced_prompt(),
            "3d render, octane render, cinematic lighting, castle, ultra high quality, 8k, masterpiece, intricate details"
        );
    }

    #[test]
    fn test_only_ultra_enhances() {
        assert!(!Quality::Standard.preset().enhance);
        assert!(!Quality::High.preset().enhance);
        assert!(Quality::Ultra.preset().enhance);
    }
}
