//! Kie.ai image model catalog and request builder.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::task::CreateTaskRequest;
use crate::error::ConfigurationError;

/// Model used when the caller does not choose one.
pub const DEFAULT_IMAGE_MODEL: ImageModel = ImageModel::NanoBananaPro;

/// Aspect ratio used when the caller does not choose one.
pub const DEFAULT_ASPECT_RATIO: AspectRatio = AspectRatio::Square;

fn invalid(name: &str, value: &str, allowed: &[&str]) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        name: name.to_string(),
        message: format!("'{value}' is not one of {}", allowed.join(", ")),
    }
}

/// Kind of model in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Text-to-image.
    Image,
}

/// Image generation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageModel {
    /// High quality with 2K/4K resolution support.
    #[default]
    NanoBananaPro,
    /// Fast with quality options.
    GptImage15,
    /// Cheapest.
    ZImage,
}

impl ImageModel {
    /// Every model, default first.
    pub const ALL: [ImageModel; 3] = [ImageModel::NanoBananaPro, ImageModel::GptImage15, ImageModel::ZImage];

    /// Wire id.
    pub fn id(self) -> &'static str {
        match self {
            ImageModel::NanoBananaPro => "nano-banana-pro",
            ImageModel::GptImage15 => "gpt-image/1.5-text-to-image",
            ImageModel::ZImage => "z-image",
        }
    }

    /// Human description.
    pub fn description(self) -> &'static str {
        match self {
            ImageModel::NanoBananaPro => "Nano Banana Pro: high quality with 2K/4K resolution support",
            ImageModel::GptImage15 => "GPT Image 1.5: fast, affordable with quality options",
            ImageModel::ZImage => "Z-Image: cheapest, simple and fast",
        }
    }

    /// Approximate credit cost.
    pub fn cost(self) -> &'static str {
        match self {
            ImageModel::NanoBananaPro => "18-24 credits (2K/4K)",
            ImageModel::GptImage15 => "~10 credits",
            ImageModel::ZImage => "~5 credits",
        }
    }

    /// Catalog kind.
    pub fn kind(self) -> ModelKind {
        ModelKind::Image
    }

    /// Parses a wire id.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.id() == id)
    }

    /// Catalog entry.
    pub fn info(self) -> ModelInfo {
        ModelInfo {
            id: self.id(),
            kind: self.kind(),
            description: self.description(),
            cost: self.cost(),
            is_default: self == DEFAULT_IMAGE_MODEL,
        }
    }
}

impl FromStr for ImageModel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| invalid("model", s, &Self::ALL.map(ImageModel::id)))
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// Wire id.
    pub id: &'static str,
    /// Catalog kind.
    pub kind: ModelKind,
    /// Human description.
    pub description: &'static str,
    /// Approximate credit cost.
    pub cost: &'static str,
    /// Whether this is the default model.
    pub is_default: bool,
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    /// 1:1
    #[default]
    Square,
    /// 16:9
    Landscape16x9,
    /// 9:16
    Portrait9x16,
    /// 4:3
    Landscape4x3,
    /// 3:4
    Portrait3x4,
    /// 3:2
    Landscape3x2,
    /// 2:3
    Portrait2x3,
}

impl AspectRatio {
    /// Every ratio, default first.
    pub const ALL: [AspectRatio; 7] = [
        AspectRatio::Square,
        AspectRatio::Landscape16x9,
        AspectRatio::Portrait9x16,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait3x4,
        AspectRatio::Landscape3x2,
        AspectRatio::Portrait2x3,
    ];

    /// Wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait2x3 => "2:3",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or_else(|| invalid("aspect_ratio", s, &Self::ALL.map(AspectRatio::as_str)))
    }
}

/// Quality level for `gpt-image/1.5-text-to-image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    /// Default.
    #[default]
    Medium,
    /// Slower, better.
    High,
}

impl Quality {
    /// Wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl FromStr for Quality {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            other => Err(invalid("quality", other, &["medium", "high"])),
        }
    }
}

/// Resolution for `nano-banana-pro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// 2K, the default.
    #[default]
    TwoK,
    /// 4K.
    FourK,
}

impl Resolution {
    /// Wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }
}

impl FromStr for Resolution {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2K" => Ok(Resolution::TwoK),
            "4K" => Ok(Resolution::FourK),
            other => Err(invalid("resolution", other, &["2K", "4K"])),
        }
    }
}

/// A text-to-image request for the Kie.ai job API.
///
/// Quality only applies to `gpt-image/1.5-text-to-image` and resolution only
/// to `nano-banana-pro`; either is silently dropped for other models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Prompt text.
    pub prompt: String,
    /// Model.
    pub model: ImageModel,
    /// Aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Quality override.
    pub quality: Option<Quality>,
    /// Resolution override.
    pub resolution: Option<Resolution>,
}

impl ImageRequest {
    /// Request with default model and aspect ratio.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: DEFAULT_IMAGE_MODEL,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            quality: None,
            resolution: None,
        }
    }

    /// Sets the model.
    pub fn model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the aspect ratio.
    pub fn aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Sets the quality.
    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Sets the resolution.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Model-specific input mapping.
    pub fn to_input(&self) -> Value {
        let mut input = Map::new();
        input.insert("prompt".to_string(), Value::from(self.prompt.as_str()));
        input.insert("aspect_ratio".to_string(), Value::from(self.aspect_ratio.as_str()));

        match self.model {
            ImageModel::NanoBananaPro => {
                let resolution = self.resolution.unwrap_or_default();
                input.insert("resolution".to_string(), Value::from(resolution.as_str()));
            }
            ImageModel::GptImage15 => {
                let quality = self.quality.unwrap_or_default();
                input.insert("quality".to_string(), Value::from(quality.as_str()));
            }
            ImageModel::ZImage => {}
        }

        Value::Object(input)
    }

    /// Submission body.
    pub fn to_task_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            model: self.model.id().to_string(),
            input: self.to_input(),
        }
    }
}
