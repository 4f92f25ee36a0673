//! Static tables mapping each panel to the upstream query that feeds it.

use aws_sdk_cloudwatch::types::{Datapoint, Statistic};
use cloudscope_core::PanelKind;

/// Statistic applied to a CloudWatch metric when it is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatistic {
    Average,
    Sum,
    Maximum,
    Minimum,
}

impl MetricStatistic {
    pub fn as_aws(&self) -> Statistic {
        match self {
            MetricStatistic::Average => Statistic::Average,
            MetricStatistic::Sum => Statistic::Sum,
            MetricStatistic::Maximum => Statistic::Maximum,
            MetricStatistic::Minimum => Statistic::Minimum,
        }
    }

    /// Reads the field of a datapoint that matches this statistic.
    pub fn pick(&self, point: &Datapoint) -> Option<f64> {
        match self {
            MetricStatistic::Average => point.average(),
            MetricStatistic::Sum => point.sum(),
            MetricStatistic::Maximum => point.maximum(),
            MetricStatistic::Minimum => point.minimum(),
        }
    }
}

/// A CloudWatch metric query for one panel.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub namespace: &'static str,
    pub metric_name: &'static str,
    pub statistic: MetricStatistic,
    /// Dimension the instance id is bound to, when the panel scopes to one
    /// resource.
    pub dimension_name: Option<&'static str>,
    pub label: &'static str,
}

/// A Logs Insights query for one log-backed panel.
#[derive(Debug, Clone, Copy)]
pub struct InsightsSpec {
    pub query: &'static str,
    pub label: &'static str,
}

pub fn metric_spec(kind: PanelKind) -> Option<MetricSpec> {
    let spec = match kind {
        PanelKind::ApiGateway4xxErrors => MetricSpec {
            namespace: "AWS/ApiGateway",
            metric_name: "4XXError",
            statistic: MetricStatistic::Sum,
            dimension_name: Some("ApiName"),
            label: "4XX Errors",
        },
        PanelKind::ApiGatewayLatency => MetricSpec {
            namespace: "AWS/ApiGateway",
            metric_name: "Latency",
            statistic: MetricStatistic::Average,
            dimension_name: Some("ApiName"),
            label: "Latency",
        },
        PanelKind::ApiGatewayIntegrationLatency => MetricSpec {
            namespace: "AWS/ApiGateway",
            metric_name: "IntegrationLatency",
            statistic: MetricStatistic::Average,
            dimension_name: Some("ApiName"),
            label: "Integration Latency",
        },
        PanelKind::Ec2CpuUtilization => MetricSpec {
            namespace: "AWS/EC2",
            metric_name: "CPUUtilization",
            statistic: MetricStatistic::Average,
            dimension_name: Some("InstanceId"),
            label: "CPU Utilization",
        },
        PanelKind::RdsNetworkReceiveThroughput => MetricSpec {
            namespace: "AWS/RDS",
            metric_name: "NetworkReceiveThroughput",
            statistic: MetricStatistic::Average,
            dimension_name: Some("DBInstanceIdentifier"),
            label: "Network Receive Throughput",
        },
        PanelKind::LambdaInvocations => MetricSpec {
            namespace: "AWS/Lambda",
            metric_name: "Invocations",
            statistic: MetricStatistic::Sum,
            dimension_name: Some("FunctionName"),
            label: "Invocations",
        },
        PanelKind::EksAllocatableCpu => MetricSpec {
            namespace: "ContainerInsights",
            metric_name: "node_cpu_limit",
            statistic: MetricStatistic::Average,
            dimension_name: Some("ClusterName"),
            label: "Allocatable CPU",
        },
        PanelKind::EksNodeUptime => MetricSpec {
            namespace: "ContainerInsights",
            metric_name: "node_status_condition_ready",
            statistic: MetricStatistic::Sum,
            dimension_name: Some("ClusterName"),
            label: "Node Uptime",
        },
        PanelKind::EcsVolumeWriteBytes => MetricSpec {
            namespace: "ECS/ContainerInsights",
            metric_name: "StorageWriteBytes",
            statistic: MetricStatistic::Sum,
            dimension_name: Some("ClusterName"),
            label: "Volume Write Bytes",
        },
        PanelKind::Ec2InstanceStopCount | PanelKind::Ec2InstanceHoursStopped => return None,
    };
    Some(spec)
}

pub fn insights_spec(kind: PanelKind) -> Option<InsightsSpec> {
    let spec = match kind {
        PanelKind::Ec2InstanceStopCount => InsightsSpec {
            query: "filter eventName = 'StopInstances' \
                    | stats count(*) as value by bin(1h) as ts \
                    | sort ts asc",
            label: "Instance Stop Count",
        },
        PanelKind::Ec2InstanceHoursStopped => InsightsSpec {
            query: "filter eventName = 'StopInstances' \
                    | stats count(*) as value by bin(1d) as ts \
                    | sort ts asc",
            label: "Instance Hours Stopped",
        },
        _ => return None,
    };
    Some(spec)
}
