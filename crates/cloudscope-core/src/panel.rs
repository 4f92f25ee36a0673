use std::fmt;

/// Kind of telemetry service a client talks to. Each kind gets its own
/// client cache; entries never cross kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Metrics,
    LogMetrics,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 2] = [ServiceKind::Metrics, ServiceKind::LogMetrics];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Metrics => "metrics",
            ServiceKind::LogMetrics => "log_metrics",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One telemetry panel served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    ApiGateway4xxErrors,
    ApiGatewayLatency,
    ApiGatewayIntegrationLatency,
    Ec2CpuUtilization,
    Ec2InstanceStopCount,
    Ec2InstanceHoursStopped,
    RdsNetworkReceiveThroughput,
    LambdaInvocations,
    EksAllocatableCpu,
    EksNodeUptime,
    EcsVolumeWriteBytes,
}

impl PanelKind {
    pub const ALL: [PanelKind; 11] = [
        PanelKind::ApiGateway4xxErrors,
        PanelKind::ApiGatewayLatency,
        PanelKind::ApiGatewayIntegrationLatency,
        PanelKind::Ec2CpuUtilization,
        PanelKind::Ec2InstanceStopCount,
        PanelKind::Ec2InstanceHoursStopped,
        PanelKind::RdsNetworkReceiveThroughput,
        PanelKind::LambdaInvocations,
        PanelKind::EksAllocatableCpu,
        PanelKind::EksNodeUptime,
        PanelKind::EcsVolumeWriteBytes,
    ];

    /// The telemetry service this panel reads from.
    pub fn service_kind(&self) -> ServiceKind {
        match self {
            PanelKind::Ec2InstanceStopCount | PanelKind::Ec2InstanceHoursStopped => {
                ServiceKind::LogMetrics
            }
            _ => ServiceKind::Metrics,
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            PanelKind::ApiGateway4xxErrors => "/panels/api-gateway/4xx-errors",
            PanelKind::ApiGatewayLatency => "/panels/api-gateway/latency",
            PanelKind::ApiGatewayIntegrationLatency => "/panels/api-gateway/integration-latency",
            PanelKind::Ec2CpuUtilization => "/panels/ec2/cpu-utilization",
            PanelKind::Ec2InstanceStopCount => "/panels/ec2/instance-stop-count",
            PanelKind::Ec2InstanceHoursStopped => "/panels/ec2/instance-hours-stopped",
            PanelKind::RdsNetworkReceiveThroughput => "/panels/rds/network-receive-throughput",
            PanelKind::LambdaInvocations => "/panels/lambda/invocations",
            PanelKind::EksAllocatableCpu => "/panels/eks/allocatable-cpu",
            PanelKind::EksNodeUptime => "/panels/eks/node-uptime",
            PanelKind::EcsVolumeWriteBytes => "/panels/ecs/volume-write-bytes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::ApiGateway4xxErrors => "api_gateway_4xx_errors",
            PanelKind::ApiGatewayLatency => "api_gateway_latency",
            PanelKind::ApiGatewayIntegrationLatency => "api_gateway_integration_latency",
            PanelKind::Ec2CpuUtilization => "ec2_cpu_utilization",
            PanelKind::Ec2InstanceStopCount => "ec2_instance_stop_count",
            PanelKind::Ec2InstanceHoursStopped => "ec2_instance_hours_stopped",
            PanelKind::RdsNetworkReceiveThroughput => "rds_network_receive_throughput",
            PanelKind::LambdaInvocations => "lambda_invocations",
            PanelKind::EksAllocatableCpu => "eks_allocatable_cpu",
            PanelKind::EksNodeUptime => "eks_node_uptime",
            PanelKind::EcsVolumeWriteBytes => "ecs_volume_write_bytes",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_panel_has_a_unique_route() {
        let routes: HashSet<&str> = PanelKind::ALL.iter().map(|k| k.route()).collect();
        assert_eq!(routes.len(), PanelKind::ALL.len());
        assert!(routes.iter().all(|r| r.starts_with("/panels/")));
    }

    #[test]
    fn test_every_panel_has_a_unique_name() {
        let names: HashSet<&str> = PanelKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), PanelKind::ALL.len());
    }

    #[test]
    fn test_log_backed_panels_use_log_metrics_kind() {
        assert_eq!(
            PanelKind::Ec2InstanceStopCount.service_kind(),
            ServiceKind::LogMetrics
        );
        assert_eq!(
            PanelKind::Ec2InstanceHoursStopped.service_kind(),
            ServiceKind::LogMetrics
        );
        assert_eq!(
            PanelKind::Ec2CpuUtilization.service_kind(),
            ServiceKind::Metrics
        );
    }

    #[test]
    fn test_service_kind_labels() {
        assert_eq!(ServiceKind::Metrics.to_string(), "metrics");
        assert_eq!(ServiceKind::LogMetrics.to_string(), "log_metrics");
    }
}
