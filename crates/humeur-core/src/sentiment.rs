//! Sentiment analysis result model and display rules.
//!
//! `SentimentResult` mirrors the prediction endpoint's response body exactly;
//! the display helpers here (stars, tone lookup, confidence formatting) are
//! the only transformation applied before rendering.

use serde::{Deserialize, Serialize};

/// A single analysis response from the prediction endpoint.
///
/// Replaced wholesale by each new analysis; `score` is expected in 0-5 and
/// `confidence` in 0-1, but out-of-range values are tolerated and clamped at
/// render time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub sentiment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SentimentResult {
    /// The tone bucket for this result, keyed on the backend's sentiment
    /// string.
    pub fn tone(&self) -> Tone {
        Tone::from_label(&self.sentiment)
    }

    /// Score rendered as "<score>/5".
    pub fn score_display(&self) -> String {
        format!("{}/5", self.score)
    }

    /// Confidence rendered as a percentage with one decimal, with the
    /// optional label appended, or `None` when the backend sent no
    /// confidence.
    pub fn confidence_display(&self) -> Option<String> {
        let confidence = self.confidence?;
        let mut out = format!("confidence: {:.1}%", confidence * 100.0);
        if let Some(label) = &self.label {
            out.push_str(&format!(" ({label})"));
        }
        Some(out)
    }
}

/// The small enumerated set of sentiments the backend emits, plus a default
/// bucket for anything unrecognized.
///
/// Wire values are the backend's French labels; everything else maps to
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Tone {
    /// Fixed lookup from the backend's `sentiment` string.
    pub fn from_label(label: &str) -> Self {
        match label {
            "positif" => Tone::Positive,
            "negatif" => Tone::Negative,
            "neutre" => Tone::Neutral,
            _ => Tone::Unknown,
        }
    }

    /// Fixed icon per tone, with a neutral face for unrecognized values.
    pub fn icon(&self) -> &'static str {
        match self {
            Tone::Positive => "😊",
            Tone::Negative => "😔",
            Tone::Neutral | Tone::Unknown => "😐",
        }
    }
}

/// Renders the score as five stars: `floor(clamp(score, 0, 5))` filled stars
/// followed by the remaining empty ones.
///
/// Non-finite scores render as zero filled stars rather than panicking on a
/// bogus backend value.
pub fn score_stars(score: f64) -> String {
    let clamped = if score.is_finite() {
        score.clamp(0.0, 5.0)
    } else {
        0.0
    };
    let filled = clamped.floor() as usize;
    let mut stars = "⭐".repeat(filled);
    stars.push_str(&"☆".repeat(5 - filled));
    stars
}
