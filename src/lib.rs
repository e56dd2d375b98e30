//! emolens - see how a face feels
//!
//! emolens takes one image, picked from a file dialog or dropped on the
//! command line, sends it to an emotion-detection service, and charts the
//! confidence the service reports for each emotion.
//!
//! # Overview
//!
//! The crate is split into pure cores and thin adapters:
//!
//! 1. **Upload controller** ([`controller`]): holds at most one selected
//!    image and moves between `Idle`, `Previewing`, `Analyzing` and
//!    `ShowingResults`. Slow work (preview encoding, the network request)
//!    happens outside it and is fed back through tickets, so a reset or a
//!    newer selection silently drops stale completions.
//!
//! 2. **Result renderer** ([`render`]): ranks the predictions, picks glyphs
//!    and colors, and computes the staggered reveal of the bars.
//!
//! 3. **Adapters**: a [`Detector`] submits the image (HTTP in
//!    [`client::HttpDetector`]) and a [`Presenter`] draws the outcome (the
//!    terminal, an HTML report, or a browser page through the wasm crate).
//!
//! # Quick Start
//!
//! ```no_run
//! use emolens::{CandidateFile, HttpDetector, ImageSource, Session, TerminalPresenter};
//!
//! let detector = HttpDetector::new("http://127.0.0.1:5000").unwrap();
//! let presenter = TerminalPresenter::new(std::io::stdout());
//! let mut session = Session::new(detector, presenter);
//!
//! let file = CandidateFile::from_path("face.jpg").unwrap();
//! if session.select(file, ImageSource::Drop).is_ok() {
//!     session.analyze();
//! }
//! ```
//!
//! # Wire contract
//!
//! `POST /api/detect` with a multipart `image` part. The service answers
//! `{success, predictions, dominant_emotion}` or `{success: false, error}`.
//! See [`detection`].
//!
//! # Modules
//!
//! - [`emotion`]: the seven labels and their glyphs/colors
//! - [`color`]: linear brightness adjustment for bar gradients
//! - [`selection`]: candidate files, MIME validation, previews
//! - [`report`]: Output formatters (HTML, JSON)

pub mod client;
pub mod color;
pub mod controller;
pub mod detection;
pub mod emotion;
pub mod error;
pub mod present;
pub mod render;
pub mod report;
pub mod selection;

pub use client::Detector;
#[cfg(feature = "http")]
pub use client::HttpDetector;
pub use color::adjust_color;
pub use controller::{AnalysisOutcome, UploadController, UploadState};
pub use detection::{DetectionResult, Predictions};
pub use emotion::Emotion;
pub use error::{DetectError, UploadError};
#[cfg(feature = "cli")]
pub use present::TerminalPresenter;
pub use present::{Presenter, Session};
pub use render::{render, RenderedResult, ResultRenderer};
pub use selection::{CandidateFile, ImageSource, Preview, SelectedImage};
