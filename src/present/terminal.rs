//! Terminal presenter: ANSI bars with a staggered reveal
//!
//! Each bar is a row of block characters colored along the same gradient the
//! browser page uses (base color to base darkened by 20%). Bars are printed
//! one at a time at their reveal delay, highest first.

use super::Presenter;
use crate::color::Rgb;
use crate::error::UploadError;
use crate::render::{EmotionBar, RenderedResult};
use crate::selection::Preview;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

/// Cells in a full (100%) bar
pub const BAR_WIDTH: usize = 40;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[90m";
const RED: &str = "\x1b[31m";

pub struct TerminalPresenter<W: Write> {
    out: W,
    animate: bool,
    color: bool,
    spinner_enabled: bool,
    spinner: Option<ProgressBar>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            animate: true,
            color: true,
            spinner_enabled: true,
            spinner: None,
        }
    }

    /// Print bars at their reveal delays instead of all at once
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_spinner(mut self, spinner: bool) -> Self {
        self.spinner_enabled = spinner;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn bar_line(&self, bar: &EmotionBar) -> String {
        let filled = filled_cells(bar.percentage);
        let fill = if self.color {
            gradient_cells(bar, filled)
        } else {
            "█".repeat(filled)
        };
        let empty = self.paint(DIM, &"░".repeat(BAR_WIDTH - filled));
        format!(
            "  {} {:<10} {}{} {:>6}",
            bar.glyph, bar.label, fill, empty, bar.percentage_text
        )
    }
}

/// Number of cells to fill; out-of-range percentages are drawn clamped
pub fn filled_cells(percentage: f64) -> usize {
    if !percentage.is_finite() {
        return 0;
    }
    let cells = (percentage.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64).round();
    cells as usize
}

fn gradient_cells(bar: &EmotionBar, filled: usize) -> String {
    let (Ok(from), Ok(to)) = (Rgb::parse(bar.base_color), Rgb::parse(&bar.dark_color)) else {
        return "█".repeat(filled);
    };

    let mut out = String::new();
    for i in 0..filled {
        let t = if filled > 1 { i as f64 / (filled - 1) as f64 } else { 0.0 };
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        out.push_str(&format!(
            "\x1b[38;2;{};{};{}m█",
            mix(from.r, to.r),
            mix(from.g, to.g),
            mix(from.b, to.b)
        ));
    }
    if filled > 0 {
        out.push_str(RESET);
    }
    out
}

fn human_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_preview(&mut self, preview: &Preview) {
        let line = format!(
            "Preview: {} ({}, {})",
            preview.file_name,
            preview.mime,
            human_size(preview.size)
        );
        let _ = writeln!(self.out, "{}", self.paint(DIM, &line));
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            if !self.spinner_enabled {
                return;
            }
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message("Analyzing emotions...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            self.spinner = Some(spinner);
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn show_results(&mut self, result: &RenderedResult) {
        let dominant = &result.dominant;
        let header = format!(
            "{} {}  {}",
            dominant.glyph, dominant.label, dominant.confidence_text
        );
        let _ = writeln!(self.out, "\n{}", self.paint(BOLD, &header));
        let _ = writeln!(self.out, "{}", "─".repeat(BAR_WIDTH + 22));

        let start = Instant::now();
        for bar in &result.bars {
            if self.animate {
                if let Some(wait) = bar.reveal_delay.checked_sub(start.elapsed()) {
                    thread::sleep(wait);
                }
            }
            let line = self.bar_line(bar);
            let _ = writeln!(self.out, "{}", line);
            let _ = self.out.flush();
        }
        let _ = writeln!(self.out);
    }

    fn show_error(&mut self, error: &UploadError) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        let line = self.paint(RED, &error.notification());
        let _ = writeln!(self.out, "{}", line);
    }

    fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionResult, Predictions};
    use crate::render::render;
    use crate::selection::ImageSource;

    fn plain() -> TerminalPresenter<Vec<u8>> {
        TerminalPresenter::new(Vec::new())
            .with_animation(false)
            .with_color(false)
            .with_spinner(false)
    }

    fn output(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(0.0), 0);
        assert_eq!(filled_cells(50.0), 20);
        assert_eq!(filled_cells(100.0), BAR_WIDTH);
        assert_eq!(filled_cells(150.0), BAR_WIDTH);
        assert_eq!(filled_cells(-3.0), 0);
        assert_eq!(filled_cells(f64::NAN), 0);
    }

    #[test]
    fn test_results_in_rank_order() {
        let result = DetectionResult {
            predictions: Predictions::from_pairs([("Sad", 10.1), ("Happy", 70.2), ("Angry", 19.7)]),
            dominant_emotion: "Happy".into(),
        };
        let mut presenter = plain();
        presenter.show_results(&render(&result).unwrap());
        let text = output(presenter);

        assert!(text.contains("😊 Happy  70.2%"));
        let happy = text.find(" Happy ").unwrap();
        let angry = text.find(" Angry ").unwrap();
        let sad = text.find(" Sad ").unwrap();
        assert!(happy < angry && angry < sad);
        assert!(text.contains(&"█".repeat(28)));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_colored_bar_uses_truecolor() {
        let result = DetectionResult {
            predictions: Predictions::from_pairs([("Happy", 100.0)]),
            dominant_emotion: "Happy".into(),
        };
        let mut presenter = TerminalPresenter::new(Vec::new())
            .with_animation(false)
            .with_spinner(false);
        presenter.show_results(&render(&result).unwrap());
        let text = output(presenter);

        // First cell is the base color, last cell the darkened one
        assert!(text.contains("\x1b[38;2;255;215;0m█"));
        assert!(text.contains("\x1b[38;2;204;164;0m█"));
    }

    #[test]
    fn test_error_notification() {
        let mut presenter = plain();
        presenter.show_error(&UploadError::Validation(ImageSource::Drop));
        assert_eq!(output(presenter), "Error: Please drop a valid image file\n");
    }

    #[test]
    fn test_preview_line() {
        let mut presenter = plain();
        presenter.show_preview(&Preview {
            file_name: "face.jpg".into(),
            mime: "image/jpeg".into(),
            size: 2048,
            data_uri: String::new(),
        });
        assert_eq!(output(presenter), "Preview: face.jpg (image/jpeg, 2.0 KB)\n");
    }
}
