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
use crate::domain::config::image::ImageConfiguration;
use crate::domain::config::processor::Named;
use crate::domain::config::resource::{ServiceConfig, ServicePortConfig};
use crate::domain::enricher::api::{ConfigKey, Enricher, EnricherConfig};
use crate::domain::resource::{Kind, Resource, ResourceCollection};
use crate::infrastructure::constants::PROTOCOL_TCP;
use crate::infrastructure::kubernetes::resources::pod::builders::PortMapping;
use crate::infrastructure::kubernetes::resources::ServiceHandler;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{Service, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::{BTreeSet, HashSet};

const NAME: ConfigKey = ConfigKey::new("name", None, "Name of the default service");
const HEADLESS: ConfigKey = ConfigKey::new("headless", Some("false"), "Create a headless service when no ports are exposed");
const EXPOSE: ConfigKey = ConfigKey::new("expose", Some("false"), "Label the service for exposure");
const TYPE: ConfigKey = ConfigKey::new("type", None, "Service type such as NodePort or LoadBalancer");

const HTTP_PORT: i32 = 80;

/// Well known name for a service port.
pub fn default_port_name(port: i32) -> &'static str {
    match port {
        80 | 8080 | 9090 => "http",
        443 => "https",
        8778 => "jolokia",
        9779 => "prometheus",
        _ => "default",
    }
}

/// Adds a Service for the image ports, or completes the one carrying the
/// default name.
pub struct DefaultServiceEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(DefaultServiceEnricher::new(config))
}

impl DefaultServiceEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn default_name(&self) -> String {
        self.config
            .get(&NAME)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.config.context().project.default_resource_name())
    }

    fn default_service_config(&self) -> Result<ServiceConfig> {
        let ports = self.image_ports(&self.config.context().images)?;
        let headless = ports.is_empty() && self.config.get_bool(&HEADLESS);
        Ok(ServiceConfig {
            name: Some(self.default_name()),
            ports,
            headless,
            expose: self.config.get_bool(&EXPOSE),
            service_type: self.config.get(&TYPE),
        })
    }

    /// Service ports for every container port of every image. 8080 and 9090
    /// are published on 80 unless 80 is exposed itself.
    fn image_ports(&self, images: &[ImageConfiguration]) -> Result<Vec<ServicePortConfig>> {
        let mapping = PortMapping::new(&self.config.context().project.properties)?;
        let mut ret = Vec::new();

        for image in images {
            let numbers: BTreeSet<i32> = mapping
                .parse_all(image.ports())?
                .iter()
                .map(|p| p.container_port)
                .collect();
            let mut names = HashSet::new();

            for &number in &numbers {
                let port = if !numbers.contains(&HTTP_PORT) && (number == 8080 || number == 9090) {
                    HTTP_PORT
                } else {
                    number
                };
                let name = default_port_name(port);
                ret.push(ServicePortConfig {
                    name: names.insert(name).then(|| name.to_string()),
                    protocol: Some(PROTOCOL_TCP.to_string()),
                    port,
                    target_port: Some(number),
                    node_port: None,
                });
            }
        }
        Ok(ret)
    }

    fn merge_service(&self, service: &mut Service, default: Option<&Service>, default_name: &str) {
        let named = service
            .metadata
            .name
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        if !named {
            service.metadata.name = Some(default_name.to_string());
        }

        let Some(default) = default else {
            return;
        };
        if service.metadata.name.as_deref() != Some(default_name) {
            return;
        }
        let Some(default_spec) = default.spec.as_ref() else {
            return;
        };

        let Some(spec) = service.spec.as_mut() else {
            service.spec = Some(default_spec.clone());
            return;
        };
        match spec.ports.as_mut() {
            Some(ports) if !ports.is_empty() => {
                for port in ports {
                    if port.protocol.as_deref().map_or(true, |p| p.trim().is_empty()) {
                        port.protocol = Some(PROTOCOL_TCP.to_uppercase());
                    }
                    if port.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                        port.name = Some(default_port_name(port.port).to_string());
                    }
                }
            }
            _ => spec.ports = default_spec.ports.clone(),
        }
    }
}

fn format_target_ports(ports: &[ServicePort]) -> String {
    ports
        .iter()
        .filter_map(|p| match &p.target_port {
            Some(IntOrString::Int(port)) => Some(port.to_string()),
            Some(IntOrString::String(port)) => Some(port.clone()),
            None => None,
        })
        .collect::<Vec<_>>()
        .join(",")
}

impl Named for DefaultServiceEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for DefaultServiceEnricher {
    fn add_missing_resources(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        let service_config = self.default_service_config()?;
        let default_service = ServiceHandler::build_service(&service_config);

        if resources.has_kind(&[Kind::Service]) {
            let default_name = self.default_name();
            for resource in resources.of_kind_mut(Kind::Service) {
                if let Resource::Service(service) = resource {
                    self.merge_service(service, default_service.as_ref(), &default_name);
                }
            }
            return Ok(());
        }

        let Some(service) = default_service else {
            return Ok(());
        };
        if let Some(ports) = service.spec.as_ref().and_then(|s| s.ports.as_ref()) {
            tracing::info!("Adding a default Service with ports [{}]", format_target_ports(ports));
            resources.push(Resource::Service(service));
        } else if service_config.headless {
            tracing::info!("Adding a default headless Service");
            resources.push(Resource::Service(service));
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[NAME, HEADLESS, EXPOSE, TYPE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::image::BuildImageConfiguration;
    use crate::domain::config::processor::ProcessorConfig;
    use crate::domain::enricher::standard::testing::enricher_config;
    use k8s_openapi::api::core::v1::ServiceSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn service_ports(service: &Service) -> BTreeMap<i32, Option<String>> {
        service
            .spec
            .as_ref()
            .and_then(|s| s.ports.as_ref())
            .map(|ports| ports.iter().map(|p| (p.port, p.name.clone())).collect())
            .unwrap_or_default()
    }

    fn image(ports: &[&str]) -> ImageConfiguration {
        ImageConfiguration::new("forge/demo:1.0.0").with_build(BuildImageConfiguration {
            ports: ports.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        })
    }

    fn enricher(images: Vec<ImageConfiguration>, processor: ProcessorConfig) -> DefaultServiceEnricher {
        DefaultServiceEnricher::new(enricher_config(
            "forge-service",
            images,
            Default::default(),
            processor,
        ))
    }

    fn only_service(resources: &ResourceCollection) -> &Service {
        match &resources.items()[0] {
            Resource::Service(service) => service,
            other => panic!("expected a Service, got {}", other.kind()),
        }
    }

    #[test]
    fn test_default_port_names() {
        assert_eq!(default_port_name(8080), "http");
        assert_eq!(default_port_name(443), "https");
        assert_eq!(default_port_name(8778), "jolokia");
        assert_eq!(default_port_name(9779), "prometheus");
        assert_eq!(default_port_name(1234), "default");
    }

    #[test]
    fn test_adds_default_service_remapping_http_ports() {
        let mut resources = ResourceCollection::new();
        enricher(vec![image(&["8080", "8778"])], ProcessorConfig::default())
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        let service = only_service(&resources);
        assert_eq!(service.metadata.name.as_deref(), Some("demo"));
        let ports = service.spec.as_ref().unwrap().ports.as_ref().unwrap();
        assert_eq!(ports[0].port, 80);
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(8080)));
        assert_eq!(ports[0].name.as_deref(), Some("http"));
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
        assert_eq!(ports[1].name.as_deref(), Some("jolokia"));
        assert_eq!(service.spec.as_ref().unwrap().type_, None);
    }

    #[test]
    fn test_duplicate_port_name_dropped() {
        let mut resources = ResourceCollection::new();
        enricher(vec![image(&["8080", "9090"])], ProcessorConfig::default())
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        let ports = service_ports(only_service(&resources));
        assert_eq!(ports.len(), 1);
        let names: Vec<_> = only_service(&resources)
            .spec
            .as_ref()
            .unwrap()
            .ports
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec![Some("http".to_string()), None]);
    }

    #[test]
    fn test_port_80_keeps_8080() {
        let mut resources = ResourceCollection::new();
        enricher(vec![image(&["80", "8080"])], ProcessorConfig::default())
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        let ports = service_ports(only_service(&resources));
        assert_eq!(ports.keys().copied().collect::<Vec<_>>(), vec![80, 8080]);
    }

    #[test]
    fn test_no_ports_no_service_unless_headless() {
        let mut resources = ResourceCollection::new();
        enricher(Vec::new(), ProcessorConfig::default())
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        assert!(resources.is_empty());

        let processor = ProcessorConfig::default().with_config("forge-service", "headless", "true");
        enricher(Vec::new(), processor)
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        let spec = only_service(&resources).spec.as_ref().unwrap();
        assert_eq!(spec.cluster_ip.as_deref(), Some("None"));
    }

    #[test]
    fn test_existing_service_completed() {
        let service = Service {
            metadata: ObjectMeta::default(),
            spec: Some(ServiceSpec {
                ports: Some(vec![ServicePort {
                    port: 443,
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut resources: ResourceCollection =
            vec![Resource::Service(service)].into_iter().collect();
        enricher(vec![image(&["8080"])], ProcessorConfig::default())
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        assert_eq!(resources.len(), 1);
        let service = only_service(&resources);
        assert_eq!(service.metadata.name.as_deref(), Some("demo"));
        let port = &service.spec.as_ref().unwrap().ports.as_ref().unwrap()[0];
        assert_eq!(port.protocol.as_deref(), Some("TCP"));
        assert_eq!(port.name.as_deref(), Some("https"));
    }

    #[test]
    fn test_existing_service_without_ports_gets_defaults() {
        let service = Service {
            metadata: ObjectMeta {
                name: Some("demo".to_string()),
                ..Default::default()
            },
            spec: Some(ServiceSpec::default()),
            ..Default::default()
        };
        let mut resources: ResourceCollection =
            vec![Resource::Service(service)].into_iter().collect();
        enricher(vec![image(&["8080"])], ProcessorConfig::default())
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        assert_eq!(
            service_ports(only_service(&resources)),
            BTreeMap::from([(80, Some("http".to_string()))])
        );
    }
}
