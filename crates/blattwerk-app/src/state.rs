// SPDX-License-Identifier: MIT
//
// Application state — one reactive struct shared with the UI via
// `use_context`. The export phase is the explicit state machine from
// blattwerk-document; a prior Ready artifact is dropped (released) the
// moment a new export begins.

use blattwerk_core::human_errors::{user_message, HumanMessage};
use blattwerk_core::{AppConfig, BlattwerkError, ImageCollection};
use blattwerk_document::{ExportArtifact, ExportPhase};

use crate::services::app_services::AppServices;

/// Shared state for the conversion form.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Accepted images in page order.
    pub collection: ImageCollection,
    /// Export state machine: Idle / Normalizing / Rendering / Ready / Failed.
    pub phase: ExportPhase,
    /// Single-slot error banner; the latest error replaces any prior one.
    pub error: Option<HumanMessage>,
    /// Output name field contents (without extension).
    pub output_name: String,
    /// Presentation-only dark mode flag.
    pub dark_mode: bool,
    /// True while a drag is over the drop zone.
    pub drag_active: bool,
    /// True while an intake batch is being read.
    pub uploading: bool,
    /// Application settings.
    pub config: AppConfig,
}

impl AppState {
    /// Create initial state from the service layer.
    pub fn new(svc: &AppServices) -> Self {
        let config = svc.config();
        Self::from_config(config)
    }

    fn from_config(config: AppConfig) -> Self {
        Self {
            collection: ImageCollection::new(),
            phase: ExportPhase::Idle,
            error: None,
            output_name: config.default_output_name.clone(),
            dark_mode: config.dark_mode.unwrap_or_else(platform_prefers_dark),
            drag_active: false,
            uploading: false,
            config,
        }
    }

    /// Whether intake or export work is in flight. Disables the intake
    /// control and the export button.
    pub fn is_busy(&self) -> bool {
        self.uploading || self.phase.is_busy()
    }

    /// Whether the export control is available.
    pub fn can_export(&self) -> bool {
        !self.collection.is_empty() && !self.is_busy()
    }

    /// Start an intake batch: clear the error slot, raise the busy flag.
    pub fn begin_intake(&mut self) {
        self.error = None;
        self.uploading = true;
    }

    /// Finish an intake batch, recording its last error (if any) in the
    /// single banner slot.
    pub fn finish_intake(&mut self, last_error: Option<BlattwerkError>) {
        self.error = last_error.as_ref().map(user_message);
        self.uploading = false;
    }

    /// Start an export: clear the error slot and release any previously
    /// generated artifact by replacing the phase wholesale.
    pub fn begin_export(&mut self) {
        self.error = None;
        self.phase = ExportPhase::Normalizing;
    }

    /// Settle the export phase from the pipeline result.
    pub fn settle_export(&mut self, result: Result<ExportArtifact, BlattwerkError>) {
        match result {
            Ok(artifact) => {
                self.phase = ExportPhase::Ready(artifact);
            }
            Err(err) => {
                let human = user_message(&err);
                self.phase = ExportPhase::Failed(human.message.clone());
                self.error = Some(human);
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(AppConfig::default())
    }
}

/// Platform colour-scheme preference, consulted only when no explicit
/// choice is stored in the config.
fn platform_prefers_dark() -> bool {
    matches!(dark_light::detect(), Ok(dark_light::Mode::Dark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::types::StagedImage;
    use std::sync::Arc;

    fn state_with_one_image() -> AppState {
        let mut state = AppState::default();
        state
            .collection
            .push(StagedImage::new(vec![1, 2, 3], 3, "image/png"));
        state
    }

    #[test]
    fn stored_theme_preference_overrides_platform() {
        let mut config = AppConfig::default();
        config.dark_mode = Some(true);
        assert!(AppState::from_config(config).dark_mode);

        let mut config = AppConfig::default();
        config.dark_mode = Some(false);
        assert!(!AppState::from_config(config).dark_mode);
    }

    #[test]
    fn export_unavailable_when_empty() {
        let state = AppState::default();
        assert!(!state.can_export());
        assert!(state_with_one_image().can_export());
    }

    #[test]
    fn export_unavailable_while_busy() {
        let mut state = state_with_one_image();
        state.uploading = true;
        assert!(state.is_busy());
        assert!(!state.can_export());

        state.uploading = false;
        state.phase = ExportPhase::Rendering;
        assert!(state.is_busy());
        assert!(!state.can_export());
    }

    #[test]
    fn begin_export_releases_prior_artifact_and_error() {
        let mut state = state_with_one_image();
        state.error = Some(user_message(&BlattwerkError::EmptyExport));
        state.phase = ExportPhase::Ready(ExportArtifact {
            file_name: "old.pdf".into(),
            bytes: Arc::new(vec![0u8; 8]),
        });

        state.begin_export();
        assert_eq!(state.phase, ExportPhase::Normalizing);
        assert!(state.error.is_none());
        assert!(state.phase.artifact().is_none());
    }

    #[test]
    fn settle_export_failure_surfaces_generic_message() {
        let mut state = state_with_one_image();
        state.begin_export();
        state.settle_export(Err(BlattwerkError::PdfRender("boom".into())));

        assert!(matches!(state.phase, ExportPhase::Failed(_)));
        assert!(!state.is_busy());
        let banner = state.error.as_ref().unwrap();
        assert_eq!(banner.message, "There was an error generating the PDF");
    }

    #[test]
    fn finish_intake_fills_the_single_error_slot() {
        let mut state = AppState::default();
        state.begin_intake();
        assert!(state.is_busy());

        state.finish_intake(Some(BlattwerkError::InvalidType {
            name: "notes.txt".into(),
        }));
        assert!(!state.is_busy());
        assert_eq!(
            state.error.as_ref().unwrap().message,
            "Only image files are allowed"
        );

        // Next intake clears it.
        state.begin_intake();
        assert!(state.error.is_none());
    }
}
