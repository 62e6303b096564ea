// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::config::build::PlatformMode;
use crate::domain::config::processor::Named;
use crate::domain::enricher::api::{Enricher, EnricherConfig};
use crate::domain::resource::ResourceCollection;
use crate::infrastructure::kubernetes::resources::pod::builders::ProbeBuilder;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::Probe;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Adds the configured liveness and readiness probes to the application
/// container. Sidecars following it are left alone.
pub struct HealthCheckEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(HealthCheckEnricher::new(config))
}

impl HealthCheckEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }
}

fn describe(probe: &Probe) -> String {
    let mut desc = String::from("probe");
    if let Some(http_get) = &probe.http_get {
        let port = match &http_get.port {
            IntOrString::Int(port) => port.to_string(),
            IntOrString::String(port) => port.clone(),
        };
        desc.push_str(&format!(
            " on port {}, path='{}'",
            port,
            http_get.path.as_deref().unwrap_or_default()
        ));
    }
    if let Some(delay) = probe.initial_delay_seconds {
        desc.push_str(&format!(", with initial delay {} seconds", delay));
    }
    if let Some(period) = probe.period_seconds {
        desc.push_str(&format!(", with period {} seconds", period));
    }
    desc
}

impl Named for HealthCheckEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for HealthCheckEnricher {
    fn add_missing_resources(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        let policy = &self.config.context().resources;
        let liveness = ProbeBuilder::build(policy.liveness.as_ref())?;
        let readiness = ProbeBuilder::build(policy.readiness.as_ref())?;
        if liveness.is_none() && readiness.is_none() {
            return Ok(());
        }

        for resource in resources.iter_mut() {
            let kind = resource.kind();
            if !kind.is_deploy_or_replica() {
                continue;
            }
            let Some(container) = resource.pod_spec_mut().and_then(|s| s.containers.last_mut()) else {
                continue;
            };
            tracing::info!("Enriching {} with health checks", kind);

            if container.readiness_probe.is_none() {
                if let Some(probe) = &readiness {
                    tracing::info!("Adding readiness {}", describe(probe));
                    container.readiness_probe = Some(probe.clone());
                }
            }
            if container.liveness_probe.is_none() {
                if let Some(probe) = &liveness {
                    tracing::info!("Adding liveness {}", describe(probe));
                    container.liveness_probe = Some(probe.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::processor::ProcessorConfig;
    use crate::domain::config::resource::{ProbeConfig, ResourceConfig};
    use crate::domain::enricher::standard::testing::enricher_config;
    use crate::domain::resource::Resource;
    use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec, Deployment, DeploymentSpec};
    use k8s_openapi::api::core::v1::{Container, ExecAction, PodSpec, PodTemplateSpec};

    fn template(names: &[&str]) -> PodTemplateSpec {
        PodTemplateSpec {
            spec: Some(PodSpec {
                containers: names
                    .iter()
                    .map(|n| Container {
                        name: n.to_string(),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn enricher() -> HealthCheckEnricher {
        let resources = ResourceConfig::builder()
            .liveness(ProbeConfig {
                get_url: Some("http://localhost:8080/health".to_string()),
                initial_delay_seconds: Some(10),
                ..Default::default()
            })
            .readiness(ProbeConfig {
                exec: Some("cat /tmp/ready".to_string()),
                ..Default::default()
            })
            .build();
        HealthCheckEnricher::new(enricher_config(
            "forge-healthcheck",
            Vec::new(),
            resources,
            ProcessorConfig::default(),
        ))
    }

    #[test]
    fn test_probes_added_to_last_container_only() {
        let deployment = Deployment {
            spec: Some(DeploymentSpec {
                template: template(&["app", "sidecar"]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let daemonset = DaemonSet {
            spec: Some(DaemonSetSpec {
                template: template(&["agent"]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut resources: ResourceCollection =
            vec![Resource::Deployment(deployment), Resource::DaemonSet(daemonset)]
                .into_iter()
                .collect();

        enricher()
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        let containers = &resources.items()[0].pod_spec().unwrap().containers;
        assert!(containers[0].liveness_probe.is_none());
        let liveness = containers[1].liveness_probe.as_ref().unwrap();
        assert_eq!(liveness.initial_delay_seconds, Some(10));
        assert!(liveness.http_get.is_some());
        assert!(containers[1].readiness_probe.as_ref().unwrap().exec.is_some());

        let agent = &resources.items()[1].pod_spec().unwrap().containers[0];
        assert!(agent.liveness_probe.is_none());
    }

    #[test]
    fn test_existing_probe_kept() {
        let mut spec = template(&["app"]);
        let existing = Probe {
            exec: Some(ExecAction {
                command: Some(vec!["true".to_string()]),
            }),
            ..Default::default()
        };
        if let Some(pod) = spec.spec.as_mut() {
            pod.containers[0].liveness_probe = Some(existing.clone());
        }
        let deployment = Deployment {
            spec: Some(DeploymentSpec {
                template: spec,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut resources: ResourceCollection =
            vec![Resource::Deployment(deployment)].into_iter().collect();
        enricher()
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        let container = &resources.items()[0].pod_spec().unwrap().containers[0];
        assert_eq!(container.liveness_probe.as_ref(), Some(&existing));
        assert!(container.readiness_probe.is_some());
    }

    #[test]
    fn test_describe_http_probe() {
        let probe = ProbeBuilder::build(Some(&ProbeConfig {
            get_url: Some("http://localhost:8080/health".to_string()),
            period_seconds: Some(5),
            ..Default::default()
        }))
        .unwrap()
        .unwrap();
        assert_eq!(describe(&probe), "probe on port 8080, path='/health', with period 5 seconds");
    }
}
