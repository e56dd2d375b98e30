//! Report generation for a rendered result
//!
//! This module writes a detection result to disk in one of two formats:
//!
//! - **HTML**: Self-contained page with the preview image, the dominant
//!   emotion and the animated bar chart
//! - **JSON**: Machine-readable format for programmatic consumption
//!
//! # Usage
//!
//! ```ignore
//! use emolens::report;
//!
//! // Automatically picks format based on extension
//! report::generate("result.html", Some(&preview), &rendered)?;  // HTML
//! report::generate("result.json", Some(&preview), &rendered)?;  // JSON
//! ```

pub mod html;
pub mod json;

use crate::render::RenderedResult;
use crate::selection::Preview;
use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(
    path: P,
    preview: Option<&Preview>,
    result: &RenderedResult,
) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, preview, result),
        _ => json::write(&mut file, preview, result),
    }
}

/// `<dir>/emolens_<timestamp>.html`
pub fn default_report_path<P: AsRef<Path>>(dir: P) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.as_ref().join(format!("emolens_{}.html", timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionResult, Predictions};
    use crate::render::render;

    fn sample() -> RenderedResult {
        render(&DetectionResult {
            predictions: Predictions::from_pairs([("Happy", 70.2), ("Sad", 10.1), ("Angry", 19.7)]),
            dominant_emotion: "Happy".into(),
        })
        .unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emolens_report_{}_{}", name, std::process::id()))
    }

    // ==========================================================================
    // FORMAT DISPATCH
    // ==========================================================================
    //
    // The extension decides the format; anything that is not .html/.htm is
    // written as JSON.
    // ==========================================================================

    #[test]
    fn test_generate_html_by_extension() {
        let dir = scratch_dir("html");
        let path = dir.join("result.HTML");
        generate(&path, None, &sample()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_generate_json_otherwise() {
        let dir = scratch_dir("json");
        let path = dir.join("nested").join("result.out");
        generate(&path, None, &sample()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["result"]["dominant"]["label"], "Happy");
    }

    #[test]
    fn test_default_report_path() {
        let path = default_report_path("reports");
        assert!(path.starts_with("reports"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("emolens_"));
        assert!(name.ends_with(".html"));
    }
}
