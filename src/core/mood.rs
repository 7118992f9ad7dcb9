//! Mood-trend series and its plot-ready derivation.
//!
//! The trend endpoint returns a time-ordered sequence of sentiment events.
//! Each successful fetch replaces the whole in-memory series; the chart
//! consumes a derived view where the confidence sign encodes polarity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::message::Sentiment;

/// One historical sentiment event, taken verbatim from the trend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPoint {
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

impl MoodPoint {
    /// Confidence with the sentiment folded into its sign: positive points
    /// keep their confidence, negative points negate it. Always in [-1, 1]
    /// for any in-range confidence.
    pub fn signed_confidence(&self) -> f64 {
        match self.sentiment {
            Sentiment::Positive => self.confidence,
            Sentiment::Negative => -self.confidence,
        }
    }

    /// Calendar-date label used on the chart's x axis.
    pub fn date_label(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Reject a fetched series whose confidences fall outside [0, 1] instead of
/// letting out-of-range values distort the fixed chart domain.
pub fn validate_series(points: &[MoodPoint]) -> Result<(), String> {
    for (index, point) in points.iter().enumerate() {
        if !(0.0..=1.0).contains(&point.confidence) || !point.confidence.is_finite() {
            return Err(format!(
                "mood point {index} has confidence {} outside [0, 1]",
                point.confidence
            ));
        }
    }
    Ok(())
}

/// A plot-ready point: x-axis label plus signed confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub label: String,
    pub value: f64,
}

/// The client-held mood series. Owned exclusively by the trend pipeline;
/// full-replace semantics, no pagination or incremental merge.
#[derive(Debug, Default)]
pub struct MoodTrend {
    points: Vec<MoodPoint>,
}

impl MoodTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire series with a freshly fetched one.
    pub fn replace(&mut self, points: Vec<MoodPoint>) {
        self.points = points;
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[MoodPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Derive plot points in series order.
    pub fn plot_points(&self) -> Vec<PlotPoint> {
        self.points
            .iter()
            .map(|point| PlotPoint {
                label: point.date_label(),
                value: point.signed_confidence(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(ts: &str, sentiment: Sentiment, confidence: f64) -> MoodPoint {
        MoodPoint {
            timestamp: ts.parse().expect("test timestamp"),
            sentiment,
            confidence,
        }
    }

    #[test]
    fn signed_confidence_folds_polarity_into_sign() {
        let positive = point("2024-03-02T09:30:00Z", Sentiment::Positive, 0.9);
        let negative = point("2024-03-01T12:00:00Z", Sentiment::Negative, 0.6);
        assert_eq!(positive.signed_confidence(), 0.9);
        assert_eq!(negative.signed_confidence(), -0.6);
    }

    #[test]
    fn signed_confidence_stays_within_unit_interval() {
        for sentiment in [Sentiment::Positive, Sentiment::Negative] {
            for confidence in [0.0, 0.25, 0.5, 1.0] {
                let p = point("2024-01-01T00:00:00Z", sentiment, confidence);
                let signed = p.signed_confidence();
                assert!((-1.0..=1.0).contains(&signed), "out of range: {signed}");
            }
        }
    }

    #[test]
    fn plot_points_carry_date_labels_and_preserve_order() {
        let mut trend = MoodTrend::new();
        trend.replace(vec![
            point("2024-03-01T12:00:00Z", Sentiment::Negative, 0.6),
            point("2024-03-02T09:30:00Z", Sentiment::Positive, 0.9),
        ]);

        let plotted = trend.plot_points();
        assert_eq!(plotted.len(), 2);
        assert_eq!(plotted[0].label, "2024-03-01");
        assert_eq!(plotted[0].value, -0.6);
        assert_eq!(plotted[1].label, "2024-03-02");
        assert_eq!(plotted[1].value, 0.9);
    }

    #[test]
    fn replace_discards_the_previous_series() {
        let mut trend = MoodTrend::new();
        trend.replace(vec![point("2024-01-01T00:00:00Z", Sentiment::Positive, 0.5)]);
        trend.replace(vec![
            point("2024-02-01T00:00:00Z", Sentiment::Negative, 0.3),
            point("2024-02-02T00:00:00Z", Sentiment::Positive, 0.4),
        ]);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend.points()[0].sentiment, Sentiment::Negative);
    }

    #[test]
    fn out_of_range_confidence_fails_validation() {
        let good = vec![point("2024-01-01T00:00:00Z", Sentiment::Positive, 1.0)];
        assert!(validate_series(&good).is_ok());

        let bad = vec![point("2024-01-01T00:00:00Z", Sentiment::Negative, 1.2)];
        let err = validate_series(&bad).expect_err("must reject");
        assert!(err.contains("outside [0, 1]"));
    }

    #[test]
    fn timestamps_deserialize_from_rfc3339() {
        let raw = r#"{"timestamp":"2024-03-01T12:00:00Z","sentiment":"NEGATIVE","confidence":0.6}"#;
        let parsed: MoodPoint = serde_json::from_str(raw).expect("parse");
        assert_eq!(
            parsed.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(parsed.sentiment, Sentiment::Negative);
    }
}
