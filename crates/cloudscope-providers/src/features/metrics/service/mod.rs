use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension};
use aws_sdk_cloudwatchlogs::types::{QueryStatus, ResultField};
use chrono::{DateTime, NaiveDateTime, Utc};
use cloudscope_core::{
    CoreError, Credentials, DataPoint, MetricPayload, MetricQuery, MetricSeries, MetricSource,
    PanelKind, Result, ServiceClient,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::features::metrics::repo::{
    insights_spec, metric_spec, InsightsSpec, MetricSpec, MetricStatistic,
};

const MAX_POLLS: u32 = 30;
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Fetches one panel's series from the CloudWatch metrics API.
pub struct CloudWatchSource {
    spec: MetricSpec,
    period_secs: i32,
}

impl CloudWatchSource {
    pub fn new(spec: MetricSpec, period_secs: i32) -> Self {
        Self { spec, period_secs }
    }
}

#[async_trait]
impl MetricSource for CloudWatchSource {
    async fn fetch(
        &self,
        client: &ServiceClient,
        _credentials: &Credentials,
        query: &MetricQuery,
    ) -> Result<MetricPayload> {
        let cloudwatch = client
            .downcast_ref::<aws_sdk_cloudwatch::Client>()
            .ok_or_else(|| {
                CoreError::MetricFetch("client is not a cloudwatch metrics client".to_string())
            })?;
        let (start, end) = query.window_or_default();

        let mut request = cloudwatch
            .get_metric_statistics()
            .namespace(self.spec.namespace)
            .metric_name(self.spec.metric_name)
            .statistics(self.spec.statistic.as_aws())
            .period(self.period_secs)
            .start_time(AwsDateTime::from_secs(start.timestamp()))
            .end_time(AwsDateTime::from_secs(end.timestamp()));
        if let (Some(name), Some(value)) = (self.spec.dimension_name, query.instance_id.as_deref())
        {
            let dimension = Dimension::builder()
                .name(name)
                .value(value)
                .build()
                .map_err(|e| CoreError::MetricFetch(format!("invalid metric dimension: {e}")))?;
            request = request.dimensions(dimension);
        }

        debug!(
            namespace = self.spec.namespace,
            metric = self.spec.metric_name,
            "fetching metric statistics"
        );
        let output = request
            .send()
            .await
            .map_err(|e| CoreError::MetricFetch(e.to_string()))?;

        let points = points_from_datapoints(self.spec.statistic, output.datapoints());
        if points.is_empty() {
            return Ok(MetricPayload::Series(Vec::new()));
        }
        Ok(MetricPayload::Series(vec![MetricSeries {
            label: self.spec.label.to_string(),
            points,
        }]))
    }
}

/// Fetches one panel's data by running a Logs Insights query and polling for
/// its result.
pub struct LogInsightsSource {
    spec: InsightsSpec,
}

impl LogInsightsSource {
    pub fn new(spec: InsightsSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl MetricSource for LogInsightsSource {
    async fn fetch(
        &self,
        client: &ServiceClient,
        _credentials: &Credentials,
        query: &MetricQuery,
    ) -> Result<MetricPayload> {
        let logs = client
            .downcast_ref::<aws_sdk_cloudwatchlogs::Client>()
            .ok_or_else(|| {
                CoreError::MetricFetch("client is not a cloudwatch logs client".to_string())
            })?;
        let log_group = query.log_group_name.as_deref().ok_or_else(|| {
            CoreError::InvalidParameter(
                "logGroupName is required for log-backed panels".to_string(),
            )
        })?;
        let (start, end) = query.window_or_default();

        let started = logs
            .start_query()
            .log_group_name(log_group)
            .query_string(self.spec.query)
            .start_time(start.timestamp())
            .end_time(end.timestamp())
            .send()
            .await
            .map_err(|e| CoreError::MetricFetch(e.to_string()))?;
        let query_id = started
            .query_id()
            .ok_or_else(|| CoreError::MetricFetch("log query returned no query id".to_string()))?
            .to_string();
        debug!(%query_id, log_group, "log query started");

        for _ in 0..MAX_POLLS {
            tokio::time::sleep(POLL_INTERVAL).await;
            let results = logs
                .get_query_results()
                .query_id(&query_id)
                .send()
                .await
                .map_err(|e| CoreError::MetricFetch(e.to_string()))?;
            match results.status() {
                Some(QueryStatus::Complete) => {
                    return Ok(document_from_rows(self.spec.label, results.results()));
                }
                Some(QueryStatus::Running) | Some(QueryStatus::Scheduled) | None => {}
                Some(status) => {
                    return Err(CoreError::MetricFetch(format!(
                        "log query ended with status {status:?}"
                    )));
                }
            }
        }
        Err(CoreError::MetricFetch("log query timed out".to_string()))
    }
}

/// Builds the full panel-to-source table.
///
/// Metric-backed panels poll CloudWatch statistics with the given period;
/// log-backed panels run Logs Insights queries.
pub fn panel_sources(period_secs: i32) -> HashMap<PanelKind, Arc<dyn MetricSource>> {
    let mut sources: HashMap<PanelKind, Arc<dyn MetricSource>> = HashMap::new();
    for kind in PanelKind::ALL {
        if let Some(spec) = metric_spec(kind) {
            sources.insert(kind, Arc::new(CloudWatchSource::new(spec, period_secs)));
        } else if let Some(spec) = insights_spec(kind) {
            sources.insert(kind, Arc::new(LogInsightsSource::new(spec)));
        }
    }
    sources
}

fn points_from_datapoints(statistic: MetricStatistic, datapoints: &[Datapoint]) -> Vec<DataPoint> {
    let mut points: Vec<DataPoint> = datapoints
        .iter()
        .filter_map(|point| {
            let timestamp = point
                .timestamp()
                .and_then(|ts| DateTime::from_timestamp(ts.secs(), 0))?;
            let value = statistic.pick(point)?;
            Some(DataPoint { timestamp, value })
        })
        .collect();
    points.sort_by_key(|point| point.timestamp);
    points
}

/// Converts finished Insights rows into a payload.
///
/// Rows shaped like the `ts`/`value` aggregation queries produce become a
/// proper series; anything else is passed through as a raw result document.
fn document_from_rows(label: &str, rows: &[Vec<ResultField>]) -> MetricPayload {
    if rows.is_empty() {
        return MetricPayload::Document(String::new());
    }

    let points: Option<Vec<DataPoint>> = rows.iter().map(|row| row_point(row)).collect();
    match points {
        Some(mut points) => {
            points.sort_by_key(|point| point.timestamp);
            MetricPayload::Series(vec![MetricSeries {
                label: label.to_string(),
                points,
            }])
        }
        None => {
            let rows: Vec<Value> = rows
                .iter()
                .map(|row| {
                    let mut object = Map::new();
                    for field in row {
                        if let (Some(name), Some(value)) = (field.field(), field.value()) {
                            object.insert(name.to_string(), Value::String(value.to_string()));
                        }
                    }
                    Value::Object(object)
                })
                .collect();
            MetricPayload::Document(json!({ "results": rows }).to_string())
        }
    }
}

fn row_point(row: &[ResultField]) -> Option<DataPoint> {
    let mut timestamp = None;
    let mut value = None;
    for field in row {
        match field.field() {
            Some("ts") => timestamp = field.value().and_then(parse_insights_timestamp),
            Some("value") => value = field.value().and_then(|v| v.parse::<f64>().ok()),
            _ => {}
        }
    }
    Some(DataPoint {
        timestamp: timestamp?,
        value: value?,
    })
}

fn parse_insights_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.3f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, value: &str) -> ResultField {
        ResultField::builder().field(name).value(value).build()
    }

    #[test]
    fn test_panel_sources_covers_every_panel() {
        let sources = panel_sources(300);
        assert_eq!(sources.len(), PanelKind::ALL.len());
    }

    #[test]
    fn test_points_from_datapoints_sorts_and_skips_incomplete() {
        let datapoints = vec![
            Datapoint::builder()
                .timestamp(AwsDateTime::from_secs(200))
                .average(2.0)
                .build(),
            Datapoint::builder()
                .timestamp(AwsDateTime::from_secs(100))
                .average(1.0)
                .build(),
            // No average, only a sum. Dropped for an average-statistic panel.
            Datapoint::builder()
                .timestamp(AwsDateTime::from_secs(300))
                .sum(9.0)
                .build(),
            // No timestamp at all.
            Datapoint::builder().average(4.0).build(),
        ];

        let points = points_from_datapoints(MetricStatistic::Average, &datapoints);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[1].value, 2.0);
        assert!(points[0].timestamp < points[1].timestamp);
    }

    #[test]
    fn test_aggregation_rows_become_a_series() {
        let rows = vec![
            vec![field("ts", "2024-01-15 14:00:00.000"), field("value", "3")],
            vec![field("ts", "2024-01-15 13:00:00.000"), field("value", "7")],
        ];

        let payload = document_from_rows("Instance Stop Count", &rows);

        match payload {
            MetricPayload::Series(series) => {
                assert_eq!(series.len(), 1);
                assert_eq!(series[0].label, "Instance Stop Count");
                assert_eq!(series[0].points.len(), 2);
                assert_eq!(series[0].points[0].value, 7.0);
                assert_eq!(series[0].points[1].value, 3.0);
            }
            other => panic!("expected a series, got {other:?}"),
        }
    }

    #[test]
    fn test_free_form_rows_become_a_document() {
        let rows = vec![vec![
            field("@message", "instance i-1 stopped"),
            field("eventName", "StopInstances"),
        ]];

        let payload = document_from_rows("Instance Stop Count", &rows);

        match payload {
            MetricPayload::Document(document) => {
                let value: Value = serde_json::from_str(&document).unwrap();
                assert_eq!(
                    value["results"][0]["eventName"],
                    Value::String("StopInstances".to_string())
                );
            }
            other => panic!("expected a document, got {other:?}"),
        }
    }

    #[test]
    fn test_no_rows_is_an_empty_payload() {
        let payload = document_from_rows("Instance Stop Count", &[]);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_insights_timestamps_parse_in_both_formats() {
        let insights = parse_insights_timestamp("2024-01-15 13:00:00.000").unwrap();
        let rfc3339 = parse_insights_timestamp("2024-01-15T13:00:00Z").unwrap();

        assert_eq!(insights, rfc3339);
        assert!(parse_insights_timestamp("yesterday").is_none());
    }
}
