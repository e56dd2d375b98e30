//! The fixed emotion label set and its display table
//!
//! The detection service reports one confidence per label. Each known label
//! has a glyph and a base color used when drawing its bar. The table is
//! static; nothing mutates it at runtime.
//!
//! Labels the service may add later are not rejected. They are drawn with
//! [`FALLBACK_GLYPH`] and [`FALLBACK_COLOR`] instead.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Glyph used for labels outside the known set
pub const FALLBACK_GLYPH: &str = "😊";

/// Bar color used for labels outside the known set
pub const FALLBACK_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprise,
    Fear,
    Disgust,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    /// Label as the service spells it
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Surprise => "Surprise",
            Emotion::Fear => "Fear",
            Emotion::Disgust => "Disgust",
            Emotion::Neutral => "Neutral",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Surprise => "😲",
            Emotion::Fear => "😨",
            Emotion::Disgust => "🤢",
            Emotion::Neutral => "😐",
        }
    }

    /// Base bar color as `#RRGGBB`
    pub fn color(self) -> &'static str {
        match self {
            Emotion::Happy => "#FFD700",
            Emotion::Sad => "#4169E1",
            Emotion::Angry => "#DC143C",
            Emotion::Surprise => "#FF69B4",
            Emotion::Fear => "#9370DB",
            Emotion::Disgust => "#32CD32",
            Emotion::Neutral => "#808080",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEmotion(pub String);

impl fmt::Display for UnknownEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown emotion label '{}'", self.0)
    }
}

impl std::error::Error for UnknownEmotion {}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    /// Exact, case-sensitive match against the service's labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.label() == s)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// Display attributes for an arbitrary label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionStyle {
    pub glyph: &'static str,
    pub color: &'static str,
    /// False when the fallback entry was used
    pub known: bool,
}

/// Look up glyph and color for a label, falling back for unknown labels
pub fn style_for(label: &str) -> EmotionStyle {
    match label.parse::<Emotion>() {
        Ok(emotion) => EmotionStyle {
            glyph: emotion.glyph(),
            color: emotion.color(),
            known: true,
        },
        Err(_) => EmotionStyle {
            glyph: FALLBACK_GLYPH,
            color: FALLBACK_COLOR,
            known: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.label().parse::<Emotion>(), Ok(emotion));
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!("happy".parse::<Emotion>().is_err());
        assert!("HAPPY".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_known_style() {
        let style = style_for("Sad");
        assert_eq!(style.glyph, "😢");
        assert_eq!(style.color, "#4169E1");
        assert!(style.known);
    }

    #[test]
    fn test_unknown_label_falls_back() {
        // The backend may grow labels (e.g. "Contempt") before we do
        let style = style_for("Contempt");
        assert_eq!(style.glyph, FALLBACK_GLYPH);
        assert_eq!(style.color, FALLBACK_COLOR);
        assert!(!style.known);
    }

    #[test]
    fn test_table_colors_are_distinct() {
        let mut colors: Vec<_> = Emotion::ALL.iter().map(|e| e.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 7);
    }
}
