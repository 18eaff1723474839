//! Data models and structures
//!
//! Defines the background presets, pose actions, composition request payload
//! and environment-driven configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed set of background choices. Each carries its display label and the
/// instruction fragment appended verbatim to the generated prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundPreset {
    StudioWhite,
    LushGarden,
    CityPark,
    LuxuryHome,
}

impl BackgroundPreset {
    pub const ALL: [BackgroundPreset; 4] = [
        BackgroundPreset::StudioWhite,
        BackgroundPreset::LushGarden,
        BackgroundPreset::CityPark,
        BackgroundPreset::LuxuryHome,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BackgroundPreset::StudioWhite => "white",
            BackgroundPreset::LushGarden => "garden",
            BackgroundPreset::CityPark => "park",
            BackgroundPreset::LuxuryHome => "home",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackgroundPreset::StudioWhite => "Studio White",
            BackgroundPreset::LushGarden => "Lush Garden",
            BackgroundPreset::CityPark => "City Park",
            BackgroundPreset::LuxuryHome => "Luxury Home",
        }
    }

    pub fn instruction_fragment(&self) -> &'static str {
        match self {
            BackgroundPreset::StudioWhite => {
                "Replace the background with a smooth white one."
            }
            BackgroundPreset::LushGarden => {
                "Replace the background with a beautiful lush garden during daytime."
            }
            BackgroundPreset::CityPark => {
                "Replace the background with a scenic city park at sunset."
            }
            BackgroundPreset::LuxuryHome => {
                "Replace the background with the interior of a luxurious modern home."
            }
        }
    }

    /// Resolve a preset from its short key. The set is closed, so an unknown
    /// key is a contract violation and fails rather than defaulting.
    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.key() == key)
            .ok_or_else(|| Error::Validation(format!("Unknown background preset '{}'", key)))
    }
}

/// The two supported poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoseAction {
    Hug,
    Kiss,
}

impl PoseAction {
    pub fn key(&self) -> &'static str {
        match self {
            PoseAction::Hug => "hug",
            PoseAction::Kiss => "kiss",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "hug" => Ok(PoseAction::Hug),
            "kiss" => Ok(PoseAction::Kiss),
            other => Err(Error::Validation(format!("Unknown pose '{}'", other))),
        }
    }
}

/// One base64-encoded image payload plus its media type, ready for transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineImage {
    pub data: String,
    pub media_type: String,
}

/// Everything the generation client needs for one call. Built fresh per
/// attempt, never persisted.
#[derive(Debug, Clone)]
pub struct CompositionRequest {
    pub first: InlineImage,
    pub second: InlineImage,
    pub instruction: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub image_model: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Generic("GEMINI_API_KEY not set".to_string()))?,
            image_model: std::env::var("PAIRPOSE_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".to_string()),
        })
    }
}
