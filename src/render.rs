//! Result renderer: turns a [`DetectionResult`] into display data
//!
//! Rendering is pure. It produces a [`RenderedResult`] that a
//! [`Presenter`](crate::present::Presenter) draws; no state survives between
//! calls.
//!
//! # What gets computed
//!
//! 1. **Dominant emotion**: the server's `dominant_emotion`, with its
//!    confidence looked up directly in `predictions`. The argmax is never
//!    recomputed. When the claimed label is missing from `predictions` the
//!    confidence is `None` and displays as `NaN%`.
//! 2. **Ranking**: predictions stably sorted by percentage, highest first.
//!    Ties keep the order the server sent.
//! 3. **Bars**: width is the raw percentage (no clamping); color is a
//!    gradient from the label's base color to the same color darkened by 20%.
//! 4. **Stagger**: bar `i` is revealed `i * 100ms` after the chart appears.

use crate::color::{adjust_color, ColorError};
use crate::detection::{DetectionResult, Predictions};
use crate::emotion::style_for;
use serde::{Serialize, Serializer};
use std::time::Duration;
use thiserror::Error;

/// Delay between consecutive bar reveals
pub const STAGGER_STEP: Duration = Duration::from_millis(100);

/// Brightness shift applied to the gradient's end color
pub const DARKEN_PERCENT: f64 = -20.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("response has no predictions to chart")]
    NoPredictions,
    #[error(transparent)]
    Color(#[from] ColorError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantDisplay {
    pub glyph: &'static str,
    pub label: String,
    /// `None` when the claimed label is absent from `predictions`
    pub confidence: Option<f64>,
    pub confidence_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionBar {
    /// 0 for the highest percentage
    pub rank: usize,
    pub label: String,
    pub glyph: &'static str,
    /// Fill width on a 0-100 scale
    pub percentage: f64,
    pub percentage_text: String,
    pub base_color: &'static str,
    pub dark_color: String,
    /// CSS background for the fill
    pub gradient: String,
    #[serde(rename = "reveal_delay_ms", serialize_with = "serialize_millis")]
    pub reveal_delay: Duration,
}

fn serialize_millis<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(delay.as_millis() as u64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResult {
    pub dominant: DominantDisplay,
    /// In rank order
    pub bars: Vec<EmotionBar>,
}

/// `70.2%`, or `NaN%` for a missing value
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "NaN%".to_string(),
    }
}

/// Predictions ordered by percentage, highest first. Stable; NaN values go
/// last.
pub fn rank_predictions(predictions: &Predictions) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = predictions
        .iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect();
    ranked.sort_by(|a, b| {
        a.1.is_nan()
            .cmp(&b.1.is_nan())
            .then_with(|| b.1.total_cmp(&a.1))
    });
    ranked
}

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    pub stagger: Duration,
    pub darken_percent: f64,
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultRenderer {
    pub fn new() -> Self {
        Self {
            stagger: STAGGER_STEP,
            darken_percent: DARKEN_PERCENT,
        }
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn render(&self, result: &DetectionResult) -> Result<RenderedResult, RenderError> {
        if result.predictions.is_empty() {
            return Err(RenderError::NoPredictions);
        }

        let confidence = result.predictions.get(&result.dominant_emotion);
        let dominant = DominantDisplay {
            glyph: style_for(&result.dominant_emotion).glyph,
            label: result.dominant_emotion.clone(),
            confidence,
            confidence_text: format_percentage(confidence),
        };

        let bars = rank_predictions(&result.predictions)
            .into_iter()
            .enumerate()
            .map(|(rank, (label, percentage))| self.bar(rank, label, percentage))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RenderedResult { dominant, bars })
    }

    fn bar(&self, rank: usize, label: String, percentage: f64) -> Result<EmotionBar, RenderError> {
        let style = style_for(&label);
        let dark_color = adjust_color(style.color, self.darken_percent)?;
        Ok(EmotionBar {
            rank,
            glyph: style.glyph,
            percentage,
            percentage_text: format_percentage(Some(percentage)),
            base_color: style.color,
            gradient: format!("linear-gradient(90deg, {}, {})", style.color, dark_color),
            dark_color,
            reveal_delay: self.stagger * rank as u32,
            label,
        })
    }
}

/// Render with the default stagger and darkening
pub fn render(result: &DetectionResult) -> Result<RenderedResult, RenderError> {
    ResultRenderer::new().render(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{FALLBACK_COLOR, FALLBACK_GLYPH};

    fn result(pairs: &[(&str, f64)], dominant: &str) -> DetectionResult {
        DetectionResult {
            predictions: Predictions::from_pairs(pairs.iter().copied()),
            dominant_emotion: dominant.to_string(),
        }
    }

    // ==========================================================================
    // RANKING
    // ==========================================================================

    #[test]
    fn test_sorted_descending() {
        let pairs = [("Happy", 70.2), ("Sad", 10.1), ("Angry", 19.7)];
        let rendered = render(&result(&pairs, "Happy")).unwrap();

        let ranked: Vec<(&str, f64)> = rendered
            .bars
            .iter()
            .map(|b| (b.label.as_str(), b.percentage))
            .collect();
        assert_eq!(ranked, vec![("Happy", 70.2), ("Angry", 19.7), ("Sad", 10.1)]);
        assert_eq!(rendered.dominant.confidence_text, "70.2%");
    }

    #[test]
    fn test_ties_keep_server_order() {
        let ranked = rank_predictions(&Predictions::from_pairs([
            ("Fear", 25.0),
            ("Happy", 50.0),
            ("Disgust", 25.0),
            ("Sad", 25.0),
        ]));
        let labels: Vec<&str> = ranked.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Happy", "Fear", "Disgust", "Sad"]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let ranked = rank_predictions(&Predictions::from_pairs([
            ("Happy", 50.0),
            ("Sad", f64::NAN),
            ("Angry", 70.0),
            ("Fear", f64::NAN),
            ("Neutral", 10.0),
        ]));
        let labels: Vec<&str> = ranked.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Angry", "Happy", "Neutral", "Sad", "Fear"]);
    }

    #[test]
    fn test_nan_prediction_renders() {
        let rendered = render(&result(&[("Happy", f64::NAN), ("Sad", 40.0)], "Happy")).unwrap();
        assert_eq!(rendered.bars[0].label, "Sad");
        assert_eq!(rendered.bars[1].percentage_text, "NaN%");
    }

    #[test]
    fn test_ranks_are_sequential() {
        let pairs = [("Sad", 1.0), ("Happy", 2.0), ("Fear", 3.0)];
        let rendered = render(&result(&pairs, "Fear")).unwrap();
        let ranks: Vec<usize> = rendered.bars.iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    // ==========================================================================
    // DOMINANT EMOTION
    // ==========================================================================
    //
    // The server's claim is displayed as-is. These pin the behavior on
    // malformed responses rather than correcting it.
    // ==========================================================================

    #[test]
    fn test_dominant_claim_is_trusted_over_argmax() {
        let rendered = render(&result(&[("Happy", 80.0), ("Sad", 20.0)], "Sad")).unwrap();
        assert_eq!(rendered.dominant.label, "Sad");
        assert_eq!(rendered.dominant.glyph, "😢");
        assert_eq!(rendered.dominant.confidence, Some(20.0));
        assert_eq!(rendered.dominant.confidence_text, "20.0%");
        // The chart still ranks by value
        assert_eq!(rendered.bars[0].label, "Happy");
    }

    #[test]
    fn test_dominant_absent_from_predictions_shows_nan() {
        let rendered = render(&result(&[("Happy", 80.0)], "Surprise")).unwrap();
        assert_eq!(rendered.dominant.label, "Surprise");
        assert_eq!(rendered.dominant.confidence, None);
        assert_eq!(rendered.dominant.confidence_text, "NaN%");
    }

    #[test]
    fn test_empty_predictions_rejected() {
        assert_eq!(render(&result(&[], "Happy")), Err(RenderError::NoPredictions));
    }

    // ==========================================================================
    // BARS
    // ==========================================================================

    #[test]
    fn test_bar_colors_and_gradient() {
        let rendered = render(&result(&[("Happy", 70.0)], "Happy")).unwrap();
        let bar = &rendered.bars[0];
        assert_eq!(bar.base_color, "#FFD700");
        assert_eq!(bar.dark_color, "#cca400");
        assert_eq!(bar.gradient, "linear-gradient(90deg, #FFD700, #cca400)");
        assert_eq!(bar.glyph, "😊");
    }

    #[test]
    fn test_unknown_label_uses_fallback_style() {
        let rendered = render(&result(&[("Contempt", 60.0), ("Happy", 40.0)], "Contempt")).unwrap();
        let bar = &rendered.bars[0];
        assert_eq!(bar.label, "Contempt");
        assert_eq!(bar.glyph, FALLBACK_GLYPH);
        assert_eq!(bar.base_color, FALLBACK_COLOR);
        assert_eq!(bar.dark_color, "#3033be");
        assert_eq!(rendered.dominant.glyph, FALLBACK_GLYPH);
    }

    #[test]
    fn test_percentage_not_clamped() {
        let rendered = render(&result(&[("Happy", 120.0), ("Sad", -5.0)], "Happy")).unwrap();
        assert_eq!(rendered.bars[0].percentage, 120.0);
        assert_eq!(rendered.bars[1].percentage, -5.0);
        assert_eq!(rendered.bars[1].percentage_text, "-5.0%");
    }

    #[test]
    fn test_stagger_delays_follow_rank() {
        let pairs = [("Sad", 5.0), ("Happy", 60.0), ("Angry", 35.0)];
        let rendered = render(&result(&pairs, "Happy")).unwrap();
        let delays: Vec<u128> = rendered.bars.iter().map(|b| b.reveal_delay.as_millis()).collect();
        assert_eq!(delays, vec![0, 100, 200]);
    }

    #[test]
    fn test_custom_stagger() {
        let renderer = ResultRenderer::new().with_stagger(Duration::ZERO);
        let rendered = renderer.render(&result(&[("Sad", 5.0), ("Happy", 60.0)], "Happy")).unwrap();
        assert!(rendered.bars.iter().all(|b| b.reveal_delay.is_zero()));
    }

    #[test]
    fn test_serialized_delay_in_millis() {
        let rendered = render(&result(&[("Sad", 5.0), ("Happy", 60.0)], "Happy")).unwrap();
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["bars"][1]["reveal_delay_ms"], 100);
        assert_eq!(json["dominant"]["confidence_text"], "60.0%");
    }
}
