//! Presentation adapters
//!
//! The controller and renderer only produce data. A [`Presenter`] is the
//! piece that makes it visible, and the only piece that differs between a
//! terminal, a browser page, or a test. [`Session`] wires one controller, one
//! [`Detector`] and one presenter together and plays the role the page's
//! event handlers play in a browser.

#[cfg(feature = "cli")]
pub mod terminal;

#[cfg(feature = "cli")]
pub use self::terminal::TerminalPresenter;

use crate::client::Detector;
use crate::controller::{AnalysisOutcome, UploadController, UploadState};
use crate::error::UploadError;
use crate::render::RenderedResult;
use crate::selection::{CandidateFile, ImageSource, Preview};

pub trait Presenter {
    fn show_preview(&mut self, preview: &Preview);
    /// Called with `true` before the request and `false` once it settles
    fn set_loading(&mut self, loading: bool);
    fn show_results(&mut self, result: &RenderedResult);
    /// Blocking-equivalent notification; shown before the session returns
    fn show_error(&mut self, error: &UploadError);
    /// Back to the empty upload area
    fn clear(&mut self);
}

pub struct Session<D, P> {
    controller: UploadController,
    detector: D,
    presenter: P,
}

impl<D: Detector, P: Presenter> Session<D, P> {
    pub fn new(detector: D, presenter: P) -> Self {
        Self::with_controller(UploadController::new(), detector, presenter)
    }

    pub fn with_controller(controller: UploadController, detector: D, presenter: P) -> Self {
        Self {
            controller,
            detector,
            presenter,
        }
    }

    pub fn controller(&self) -> &UploadController {
        &self.controller
    }

    pub fn state(&self) -> UploadState {
        self.controller.state()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Offer a picked or dropped file. Rejections are shown and returned.
    pub fn select(
        &mut self,
        candidate: CandidateFile,
        source: ImageSource,
    ) -> Result<(), UploadError> {
        let ticket = match self.controller.select_image(candidate, source) {
            Ok(ticket) => ticket,
            Err(err) => {
                self.presenter.show_error(&err);
                return Err(err);
            }
        };

        let loaded = ticket.load();
        let preview = loaded.preview().clone();
        if self.controller.complete_preview(loaded) {
            self.presenter.show_preview(&preview);
        }
        Ok(())
    }

    /// Submit the held image and show whatever comes back
    pub fn analyze(&mut self) -> AnalysisOutcome {
        let ticket = match self.controller.begin_analysis() {
            Ok(ticket) => ticket,
            Err(err) => {
                self.presenter.show_error(&err);
                return AnalysisOutcome::Failed(err);
            }
        };

        self.presenter.set_loading(true);
        let response = self.detector.detect(ticket.image());
        self.presenter.set_loading(false);

        let outcome = self.controller.complete_analysis(ticket, response);
        match &outcome {
            AnalysisOutcome::Rendered(rendered) => self.presenter.show_results(rendered),
            AnalysisOutcome::Failed(err) => self.presenter.show_error(err),
            AnalysisOutcome::Stale => {}
        }
        outcome
    }

    /// "Change Image" / "Analyze Another"
    pub fn reset(&mut self) -> bool {
        let cleared = self.controller.reset();
        if cleared {
            self.presenter.clear();
        }
        cleared
    }
}
