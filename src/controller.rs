//! Upload controller: the selected image and its lifecycle
//!
//! ```text
//!            select                analyze               success
//!   Idle ─────────────▶ Previewing ───────▶ Analyzing ─────────▶ ShowingResults
//!    ▲                     ▲   ▲               │                      │
//!    │                     │   └───failure─────┘                      │
//!    │                     └──────────────select──────────────────────┤
//!    └───────────────────────────────reset────────────────────────────┘
//! ```
//!
//! The two slow steps (reading the preview, the network request) do not run
//! inside the controller. It hands out a ticket, the caller does the work,
//! and the result comes back through `complete_preview` or
//! `complete_analysis`. Every ticket is stamped with a counter. Previews
//! carry the selection counter, bumped by selecting and resetting. Analyses
//! carry the generation, bumped by selecting, starting an analysis and
//! resetting. A completion whose stamp is no longer current is discarded
//! instead of overwriting newer state.

use crate::detection::DetectionResult;
use crate::error::{DetectError, UploadError};
use crate::render::{RenderedResult, ResultRenderer};
use crate::selection::{CandidateFile, ImageSource, Preview, SelectedImage};
use log::{debug, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum UploadState {
    #[default]
    Idle,
    Previewing,
    Analyzing,
    ShowingResults,
}

/// A preview waiting to be read
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    generation: u64,
    image: SelectedImage,
}

impl PreviewTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Encode the image; may run off the UI thread
    pub fn load(self) -> LoadedPreview {
        LoadedPreview {
            generation: self.generation,
            preview: self.image.to_preview(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPreview {
    generation: u64,
    preview: Preview,
}

impl LoadedPreview {
    pub fn preview(&self) -> &Preview {
        &self.preview
    }
}

/// An analysis in flight; carries its own copy of the image to upload
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    generation: u64,
    image: SelectedImage,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Rendered(RenderedResult),
    /// The controller is back in `Previewing` with the image kept
    Failed(UploadError),
    /// Superseded by a reset, a new selection or a newer analysis
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct UploadController {
    state: UploadState,
    image: Option<SelectedImage>,
    preview: Option<Preview>,
    results: Option<RenderedResult>,
    selection: u64,
    generation: u64,
    renderer: ResultRenderer,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(mut self, renderer: ResultRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn results(&self) -> Option<&RenderedResult> {
        self.results.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn transition(&mut self, to: UploadState) {
        if self.state != to {
            debug!("upload state {:?} -> {:?} (generation {})", self.state, to, self.generation);
        }
        self.state = to;
    }

    /// Validate and hold a new image
    ///
    /// A non-image candidate is rejected and nothing changes: the previous
    /// image, preview and state stay as they were.
    pub fn select_image(
        &mut self,
        candidate: CandidateFile,
        source: ImageSource,
    ) -> Result<PreviewTicket, UploadError> {
        let image = SelectedImage::try_from_candidate(candidate).map_err(|rejected| {
            debug!("rejected '{}' ({})", rejected.file_name, rejected.mime);
            UploadError::Validation(source)
        })?;

        self.selection += 1;
        self.generation += 1;
        self.image = Some(image.clone());
        self.preview = None;
        self.results = None;
        self.transition(UploadState::Previewing);

        Ok(PreviewTicket {
            generation: self.selection,
            image,
        })
    }

    /// Show a loaded preview. Returns false when a newer selection or a reset
    /// superseded it.
    pub fn complete_preview(&mut self, loaded: LoadedPreview) -> bool {
        if loaded.generation != self.selection || self.image.is_none() {
            debug!("dropping superseded preview of '{}'", loaded.preview.file_name);
            return false;
        }
        self.preview = Some(loaded.preview);
        true
    }

    /// Start analysing the held image
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, UploadError> {
        let image = self.image.clone().ok_or(UploadError::State)?;

        self.generation += 1;
        self.transition(UploadState::Analyzing);

        Ok(AnalysisTicket {
            generation: self.generation,
            image,
        })
    }

    /// Apply the settled request for `ticket`
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<DetectionResult, DetectError>,
    ) -> AnalysisOutcome {
        if ticket.generation != self.generation || self.state != UploadState::Analyzing {
            warn!(
                "discarding stale analysis of '{}' (generation {}, current {})",
                ticket.image.file_name(),
                ticket.generation,
                self.generation
            );
            return AnalysisOutcome::Stale;
        }

        let rendered = outcome
            .map_err(UploadError::from)
            .and_then(|result| {
                self.renderer
                    .render(&result)
                    .map_err(|e| UploadError::Transport(e.to_string()))
            });

        match rendered {
            Ok(rendered) => {
                self.results = Some(rendered.clone());
                self.transition(UploadState::ShowingResults);
                AnalysisOutcome::Rendered(rendered)
            }
            Err(err) => {
                debug!("analysis of '{}' failed: {}", ticket.image.file_name(), err);
                self.transition(UploadState::Previewing);
                AnalysisOutcome::Failed(err)
            }
        }
    }

    /// Drop the image, preview and results. Returns false when already idle.
    pub fn reset(&mut self) -> bool {
        if self.state == UploadState::Idle {
            return false;
        }
        self.selection += 1;
        self.generation += 1;
        self.image = None;
        self.preview = None;
        self.results = None;
        self.transition(UploadState::Idle);
        true
    }
}
