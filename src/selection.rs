//! Candidate files, the selected image and its preview
//!
//! A candidate carries a declared MIME type the way a browser `File` does:
//! derived from the file extension unless the caller says otherwise. Only
//! candidates whose type starts with `image/` can become the
//! [`SelectedImage`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Type reported for extensions we do not recognise
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// How a candidate file reached the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageSource {
    /// Click-to-browse
    Picker,
    /// Drag-and-drop
    Drop,
}

impl ImageSource {
    pub fn rejection_message(self) -> &'static str {
        match self {
            ImageSource::Picker => "Please select a valid image file",
            ImageSource::Drop => "Please drop a valid image file",
        }
    }
}

/// Declared type for a path, from its extension
pub fn mime_from_path<P: AsRef<Path>>(path: P) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" | "pjpeg" | "pjp" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "mp4" => "video/mp4",
        _ => UNKNOWN_MIME,
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// A file offered by the user, not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its type from the extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, mime_from_path(path), bytes))
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime)
    }
}

/// The one image the controller holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl SelectedImage {
    /// Validate a candidate; gives it back when its type is not `image/*`
    pub fn try_from_candidate(candidate: CandidateFile) -> Result<Self, CandidateFile> {
        if !candidate.is_image() {
            return Err(candidate);
        }
        Ok(Self {
            file_name: candidate.file_name,
            mime: candidate.mime,
            bytes: candidate.bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode as a `data:` URI for display
    pub fn to_preview(&self) -> Preview {
        Preview {
            file_name: self.file_name.clone(),
            mime: self.mime.clone(),
            size: self.bytes.len(),
            data_uri: format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes)),
        }
    }
}

/// Locally rendered, pre-submission display of the selected image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub file_name: String,
    pub mime: String,
    pub size: usize,
    pub data_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_path("face.JPG"), "image/jpeg");
        assert_eq!(mime_from_path("/tmp/a/face.png"), "image/png");
        assert_eq!(mime_from_path("notes.txt"), "text/plain");
        assert_eq!(mime_from_path("noext"), UNKNOWN_MIME);
    }

    #[test]
    fn test_image_prefix_check() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("application/octet-stream"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_rejected_candidate_is_returned() {
        let candidate = CandidateFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let rejected = SelectedImage::try_from_candidate(candidate.clone()).unwrap_err();
        assert_eq!(rejected, candidate);
    }

    #[test]
    fn test_mime_override() {
        let candidate =
            CandidateFile::new("capture", UNKNOWN_MIME, vec![1, 2, 3]).with_mime("image/png");
        assert!(SelectedImage::try_from_candidate(candidate).is_ok());
    }

    #[test]
    fn test_preview_data_uri() {
        let candidate = CandidateFile::new("face.png", "image/png", b"abc".to_vec());
        let image = SelectedImage::try_from_candidate(candidate).unwrap();
        let preview = image.to_preview();
        assert_eq!(preview.data_uri, "data:image/png;base64,YWJj");
        assert_eq!(preview.size, 3);
        assert_eq!(preview.file_name, "face.png");
    }

    #[test]
    fn test_from_path_reads_file() {
        let path =
            std::env::temp_dir().join(format!("emolens_selection_{}.jpeg", std::process::id()));
        std::fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let candidate = CandidateFile::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(candidate.mime, "image/jpeg");
        assert_eq!(candidate.bytes, vec![0xff, 0xd8, 0xff]);
        assert!(candidate.file_name.ends_with(".jpeg"));
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(CandidateFile::from_path("/definitely/not/here.png").is_err());
    }
}
