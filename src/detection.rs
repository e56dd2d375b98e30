//! Wire contract of `POST /api/detect`
//!
//! Success body:
//!
//! ```json
//! { "success": true, "predictions": { "Happy": 70.2, "Sad": 10.1 }, "dominant_emotion": "Happy" }
//! ```
//!
//! Failure body: `{ "success": false, "error": "no face detected" }`.
//!
//! Prediction order is kept exactly as the server sent it, so ties in the
//! descending sort stay in server order.

use crate::error::{DetectError, SERVICE_FALLBACK_MESSAGE};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label → confidence percentage, in server order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions(Vec<(String, f64)>);

impl Predictions {
    /// Build from pairs; a repeated label overwrites the earlier value in place
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut predictions = Predictions::default();
        for (label, value) in pairs {
            predictions.insert(label.into(), value);
        }
        predictions
    }

    fn insert(&mut self, label: String, value: f64) {
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.0.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Predictions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Predictions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PredictionsVisitor;

        impl<'de> Visitor<'de> for PredictionsVisitor {
            type Value = Predictions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of emotion label to percentage")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut predictions = Predictions::default();
                while let Some((label, value)) = access.next_entry::<String, f64>()? {
                    predictions.insert(label, value);
                }
                Ok(predictions)
            }
        }

        deserializer.deserialize_map(PredictionsVisitor)
    }
}

/// A successful detection. `success: false` responses never become one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub predictions: Predictions,
    /// The server's claim. Not checked against `predictions`.
    pub dominant_emotion: String,
}

/// Raw response body before the success flag is interpreted
#[derive(Debug, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub success: bool,
    pub predictions: Option<Predictions>,
    pub dominant_emotion: Option<String>,
    pub error: Option<String>,
}

impl DetectionResponse {
    pub fn into_result(self) -> Result<DetectionResult, DetectError> {
        if !self.success {
            return Err(DetectError::Service(
                self.error.unwrap_or_else(|| SERVICE_FALLBACK_MESSAGE.to_string()),
            ));
        }
        let predictions = self
            .predictions
            .ok_or_else(|| DetectError::Transport("response has no predictions".to_string()))?;
        let dominant_emotion = self
            .dominant_emotion
            .ok_or_else(|| DetectError::Transport("response has no dominant_emotion".to_string()))?;
        Ok(DetectionResult { predictions, dominant_emotion })
    }
}

/// Parse a response body. Bodies that are not JSON are transport errors
/// carrying the parser's message.
pub fn parse_response(body: &str) -> Result<DetectionResult, DetectError> {
    let response: DetectionResponse =
        serde_json::from_str(body).map_err(|e| DetectError::Transport(e.to_string()))?;
    response.into_result()
}
