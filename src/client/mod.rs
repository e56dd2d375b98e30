//! Transport to the detection service
//!
//! [`Detector`] is the seam between the session and the network. The
//! session calls it exactly once per analysis with the image to upload.
//! [`HttpDetector`] is the real implementation; tests substitute closures.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use self::http::{ClientError, HttpDetector};

use crate::detection::DetectionResult;
use crate::error::DetectError;
use crate::selection::SelectedImage;

/// Server used when none is configured
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Endpoint path, relative to the server URL
pub const DETECT_PATH: &str = "api/detect";

/// Multipart field carrying the image bytes
pub const IMAGE_FIELD: &str = "image";

pub trait Detector {
    /// Submit one image and wait for the settled response
    fn detect(&self, image: &SelectedImage) -> Result<DetectionResult, DetectError>;
}

impl<F> Detector for F
where
    F: Fn(&SelectedImage) -> Result<DetectionResult, DetectError>,
{
    fn detect(&self, image: &SelectedImage) -> Result<DetectionResult, DetectError> {
        self(image)
    }
}
