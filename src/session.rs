//! Session orchestration for the upload -> prompt -> generate -> render
//! pipeline.
//!
//! All user-facing failures are folded into a single human-readable message
//! on the session; every path returns the session to an interactive state.

use crate::ai::CompositionService;
use crate::ingest::{self, IngestedImage};
use crate::models::{BackgroundPreset, CompositionRequest, InlineImage, PoseAction};
use crate::prompts;
use crate::share::{ShareService, SHARE_TEXT, SHARE_TITLE};
use crate::{Error, Result};
use base64::Engine as _;
use std::path::{Path, PathBuf};

pub const CREATION_FILE_NAME: &str = "pairpose-creation.png";

const RESULT_MEDIA_TYPE: &str = "image/png";

/// The two independent upload positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    First,
    Second,
}

/// Where the session currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Generating(PoseAction),
}

/// A finished composition, kept as raw PNG bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultImage {
    bytes: Vec<u8>,
}

impl ResultImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Directly displayable embedded-data reference.
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// One interactive editing session. Not persisted; dropped state (including
/// the preview directory) is abandoned with the session.
pub struct Session {
    preview_dir: PathBuf,
    first: Option<IngestedImage>,
    second: Option<IngestedImage>,
    background: BackgroundPreset,
    new_outfits: bool,
    in_flight: Option<PoseAction>,
    error: Option<String>,
    result: Option<ResultImage>,
}

impl Session {
    pub fn new(preview_dir: PathBuf) -> Self {
        Self {
            preview_dir,
            first: None,
            second: None,
            background: BackgroundPreset::StudioWhite,
            new_outfits: false,
            in_flight: None,
            error: None,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if let Some(action) = self.in_flight {
            Phase::Generating(action)
        } else if self.first.is_some() && self.second.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn slot(&self, slot: SlotId) -> Option<&IngestedImage> {
        match slot {
            SlotId::First => self.first.as_ref(),
            SlotId::Second => self.second.as_ref(),
        }
    }

    pub fn background(&self) -> BackgroundPreset {
        self.background
    }

    pub fn set_background(&mut self, background: BackgroundPreset) {
        self.background = background;
    }

    pub fn new_outfits(&self) -> bool {
        self.new_outfits
    }

    pub fn set_new_outfits(&mut self, new_outfits: bool) {
        self.new_outfits = new_outfits;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&ResultImage> {
        self.result.as_ref()
    }

    fn slot_mut(&mut self, slot: SlotId) -> &mut Option<IngestedImage> {
        match slot {
            SlotId::First => &mut self.first,
            SlotId::Second => &mut self.second,
        }
    }

    /// Ingest a photo into a slot, replacing (and releasing) whatever was
    /// there. On failure the slot keeps its previous content.
    pub async fn upload(&mut self, slot: SlotId, path: &Path) {
        if !ingest::declares_image_type(path) {
            self.error = Some("Please select an image file.".to_string());
            return;
        }

        match ingest::ingest_file(&self.preview_dir, path).await {
            Ok(image) => {
                if let Some(previous) = self.slot_mut(slot).replace(image) {
                    previous.preview.release();
                }
            }
            Err(e) => {
                tracing::error!("Ingestion failed: {}", e);
                self.error = Some("Failed to read the image file.".to_string());
            }
        }
    }

    /// Empty a slot and release its preview.
    pub fn delete(&mut self, slot: SlotId) {
        if let Some(image) = self.slot_mut(slot).take() {
            image.preview.release();
        }
    }

    /// Run one generation attempt.
    ///
    /// Refuses to start while another attempt is in flight, and makes no
    /// network call unless both slots hold a completed ingestion. The
    /// in-flight marker is cleared on success and failure alike.
    pub async fn generate(&mut self, action: PoseAction, service: &dyn CompositionService) {
        if self.in_flight.is_some() {
            tracing::warn!(
                "Generation already in flight; ignoring {} trigger",
                action.key()
            );
            return;
        }

        let (first, second) = match (&self.first, &self.second) {
            (Some(first), Some(second)) => (first, second),
            _ => {
                self.error = Some("Please upload both photos before generating.".to_string());
                return;
            }
        };

        let request = CompositionRequest {
            first: InlineImage {
                data: first.payload.clone(),
                media_type: first.media_type.clone(),
            },
            second: InlineImage {
                data: second.payload.clone(),
                media_type: second.media_type.clone(),
            },
            instruction: prompts::build_instruction(self.background, self.new_outfits, action),
        };

        self.in_flight = Some(action);
        // Stale output must not show while the new attempt is loading.
        self.error = None;
        self.result = None;

        match service.compose(&request).await {
            Ok(bytes) => {
                tracing::info!("Generated {} composition ({} bytes)", action.key(), bytes.len());
                self.result = Some(ResultImage { bytes });
            }
            Err(e) => {
                tracing::error!("Composition failed: {}", e);
                self.error = Some(format!("Generation failed: {}", e));
            }
        }

        self.in_flight = None;
    }

    /// Materialize the result as `pairpose-creation.png` in `dir`.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf> {
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| Error::Validation("No generated image to download".to_string()))?;

        let target = dir.join(CREATION_FILE_NAME);
        tokio::fs::write(&target, result.bytes()).await?;
        tracing::info!("Saved creation to {}", target.display());
        Ok(target)
    }

    async fn hand_off(&self, result: &ResultImage, platform: &dyn ShareService) -> Result<()> {
        if !platform.can_share(RESULT_MEDIA_TYPE) {
            return Err(Error::ShareUnsupported(
                "Sharing this file type is not supported on your device.".to_string(),
            ));
        }

        platform
            .share(
                CREATION_FILE_NAME,
                result.bytes(),
                RESULT_MEDIA_TYPE,
                SHARE_TITLE,
                SHARE_TEXT,
            )
            .await
    }

    /// Hand the result to the platform share surface, degrading to a visible
    /// message when the platform cannot share this content type.
    pub async fn share(&mut self, platform: &dyn ShareService) {
        let Some(result) = self.result.clone() else {
            tracing::warn!("No generated image to share");
            return;
        };

        match self.hand_off(&result, platform).await {
            Ok(()) => {}
            Err(Error::ShareUnsupported(message)) => {
                self.error = Some(message);
            }
            Err(e) => {
                tracing::error!("Error sharing: {}", e);
                self.error =
                    Some("An error occurred while trying to share the image.".to_string());
            }
        }
    }
}
