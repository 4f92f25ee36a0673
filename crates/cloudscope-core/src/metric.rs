use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoreError, Result};

/// One observation in a metric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A labeled, time-ordered run of data points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub label: String,
    pub points: Vec<DataPoint>,
}

/// What a metric source hands back: either normalized series data, or a
/// pre-serialized JSON document in the source's own envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricPayload {
    Series(Vec<MetricSeries>),
    Document(String),
}

impl MetricPayload {
    /// An empty payload is fatal for the request; it must never turn into an
    /// empty 200 response.
    pub fn is_empty(&self) -> bool {
        match self {
            MetricPayload::Series(series) => series.is_empty(),
            MetricPayload::Document(document) => document.trim().is_empty(),
        }
    }
}

/// Which of the two response shapes the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Structured time-series form.
    Frame,
    /// Validated pass-through of the source document.
    Passthrough,
}

impl ResponseShape {
    /// Only the exact value `frame` selects the structured form; anything
    /// else, including an absent parameter, takes the pass-through path.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("frame") => ResponseShape::Frame,
            _ => ResponseShape::Passthrough,
        }
    }
}

/// Per-request knobs forwarded to the metric source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricQuery {
    pub instance_id: Option<String>,
    pub element_type: Option<String>,
    pub log_group_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl MetricQuery {
    /// The query window, defaulting to the trailing hour when the caller
    /// gave no bounds.
    pub fn window_or_default(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.end_time.unwrap_or_else(Utc::now);
        let start = self
            .start_time
            .unwrap_or_else(|| end - chrono::Duration::hours(1));
        (start, end)
    }
}

/// Encodes series into the pass-through envelope: one key per series label,
/// each holding `{"Timestamp": …, "Value": …}` objects.
pub fn passthrough_document(series: &[MetricSeries]) -> Value {
    let mut root = serde_json::Map::new();
    for entry in series {
        let points: Vec<Value> = entry
            .points
            .iter()
            .map(|point| {
                serde_json::json!({
                    "Timestamp": point.timestamp.to_rfc3339(),
                    "Value": point.value,
                })
            })
            .collect();
        root.insert(entry.label.clone(), Value::Array(points));
    }
    Value::Object(root)
}

/// Parses a pass-through envelope back into series form. Used when a caller
/// asks for the frame shape but the source produced a document.
pub fn series_from_document(document: &str) -> Result<Vec<MetricSeries>> {
    let value: Value = serde_json::from_str(document)
        .map_err(|e| CoreError::Encoding(format!("document is not valid JSON: {e}")))?;
    let root = value.as_object().ok_or_else(|| {
        CoreError::Encoding("document is not a metric series envelope".to_string())
    })?;

    let mut series = Vec::with_capacity(root.len());
    for (label, entries) in root {
        let entries = entries.as_array().ok_or_else(|| {
            CoreError::Encoding(format!("series {label} is not an array of points"))
        })?;
        let mut points = Vec::with_capacity(entries.len());
        for entry in entries {
            let point = entry.as_object().ok_or_else(|| {
                CoreError::Encoding(format!("series {label} holds a non-object point"))
            })?;
            let timestamp = point
                .get("Timestamp")
                .and_then(Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| {
                    CoreError::Encoding(format!("series {label} holds an unreadable timestamp"))
                })?;
            let value = point.get("Value").and_then(Value::as_f64).ok_or_else(|| {
                CoreError::Encoding(format!("series {label} holds a non-numeric value"))
            })?;
            points.push(DataPoint { timestamp, value });
        }
        series.push(MetricSeries {
            label: label.clone(),
            points,
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_series() -> Vec<MetricSeries> {
        vec![MetricSeries {
            label: "CPU Utilization".to_string(),
            points: vec![
                DataPoint {
                    timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                    value: 12.5,
                },
                DataPoint {
                    timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 5, 0).unwrap(),
                    value: 14.0,
                },
            ],
        }]
    }

    #[test]
    fn test_response_shape_only_frame_selects_frame() {
        assert_eq!(ResponseShape::from_param(Some("frame")), ResponseShape::Frame);
        assert_eq!(ResponseShape::from_param(None), ResponseShape::Passthrough);
        assert_eq!(ResponseShape::from_param(Some("")), ResponseShape::Passthrough);
        assert_eq!(
            ResponseShape::from_param(Some("table")),
            ResponseShape::Passthrough
        );
        assert_eq!(
            ResponseShape::from_param(Some("FRAME")),
            ResponseShape::Passthrough
        );
    }

    #[test]
    fn test_empty_payloads_are_detected() {
        assert!(MetricPayload::Series(Vec::new()).is_empty());
        assert!(MetricPayload::Document(String::new()).is_empty());
        assert!(MetricPayload::Document("  ".to_string()).is_empty());
        assert!(!MetricPayload::Series(sample_series()).is_empty());
        assert!(!MetricPayload::Document("{}".to_string()).is_empty());
    }

    #[test]
    fn test_envelope_round_trip_preserves_points() {
        let series = sample_series();
        let document = serde_json::to_string(&passthrough_document(&series)).unwrap();
        let restored = series_from_document(&document).unwrap();
        assert_eq!(restored, series);
    }

    #[test]
    fn test_series_from_document_rejects_non_envelope_json() {
        assert!(series_from_document("[1, 2, 3]").is_err());
        assert!(series_from_document("{\"cpu\": 3}").is_err());
        assert!(series_from_document("not json").is_err());
    }

    #[test]
    fn test_series_from_document_rejects_malformed_points() {
        let missing_value = r#"{"cpu": [{"Timestamp": "2024-03-01T00:00:00Z"}]}"#;
        assert!(series_from_document(missing_value).is_err());

        let bad_timestamp = r#"{"cpu": [{"Timestamp": "yesterday", "Value": 1.0}]}"#;
        assert!(series_from_document(bad_timestamp).is_err());
    }

    #[test]
    fn test_window_defaults_to_trailing_hour() {
        let query = MetricQuery::default();
        let (start, end) = query.window_or_default();
        assert_eq!(end - start, chrono::Duration::hours(1));
    }

    #[test]
    fn test_window_honors_explicit_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let query = MetricQuery {
            start_time: Some(start),
            end_time: Some(end),
            ..MetricQuery::default()
        };
        assert_eq!(query.window_or_default(), (start, end));
    }

    mod envelope_properties {
        use super::*;
        use proptest::prelude::*;

        fn point_strategy() -> impl Strategy<Value = DataPoint> {
            (0i64..4_000_000_000, -1_000_000.0f64..1_000_000.0).prop_map(|(secs, value)| {
                DataPoint {
                    timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
                    value,
                }
            })
        }

        fn series_strategy() -> impl Strategy<Value = Vec<MetricSeries>> {
            prop::collection::btree_map(
                "[a-z]{1,12}",
                prop::collection::vec(point_strategy(), 0..8),
                0..4,
            )
            .prop_map(|labeled| {
                labeled
                    .into_iter()
                    .map(|(label, points)| MetricSeries { label, points })
                    .collect()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn property_envelope_round_trip(series in series_strategy()) {
                let document =
                    serde_json::to_string(&passthrough_document(&series)).unwrap();
                let restored = series_from_document(&document).unwrap();
                prop_assert_eq!(restored, series);
            }
        }
    }
}
