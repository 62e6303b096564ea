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

use crate::domain::config::resource::{ServiceConfig, ServicePortConfig};
use crate::infrastructure::constants::{
    ANNOTATION_PROMETHEUS_PORT, ANNOTATION_PROMETHEUS_SCRAPE, CLUSTER_IP_NONE, LABEL_EXPOSE,
    PROMETHEUS_PORT, PROTOCOL_TCP,
};
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

const PROMETHEUS_PORT_NAME: &str = "prometheus";

pub struct ServiceHandler;

impl ServiceHandler {
    /// Services for the declarations that are headless or carry ports.
    pub fn get_services(configs: &[ServiceConfig]) -> Vec<Service> {
        configs.iter().filter_map(Self::build_service).collect()
    }

    pub fn build_service(config: &ServiceConfig) -> Option<Service> {
        if config.ports.is_empty() && !config.headless {
            tracing::debug!(
                "Skipping service {}: neither ports nor headless",
                config.name.as_deref().unwrap_or("<unnamed>")
            );
            return None;
        }

        let ports: Vec<ServicePort> = config.ports.iter().map(Self::service_port).collect();

        let mut annotations = BTreeMap::new();
        if let Some(port) = config
            .ports
            .iter()
            .find(|p| p.port == PROMETHEUS_PORT || p.name.as_deref() == Some(PROMETHEUS_PORT_NAME))
        {
            annotations.insert(ANNOTATION_PROMETHEUS_PORT.to_string(), port.port.to_string());
            annotations.insert(ANNOTATION_PROMETHEUS_SCRAPE.to_string(), "true".to_string());
        }

        let mut labels = BTreeMap::new();
        if config.expose {
            labels.insert(LABEL_EXPOSE.to_string(), "true".to_string());
        }

        let service_type = config
            .service_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Some(Service {
            metadata: ObjectMeta {
                name: config.name.clone(),
                labels: (!labels.is_empty()).then_some(labels),
                annotations: (!annotations.is_empty()).then_some(annotations),
                ..Default::default()
            },
            spec: Some(ServiceSpec {
                cluster_ip: config.headless.then(|| CLUSTER_IP_NONE.to_string()),
                type_: service_type,
                ports: (!ports.is_empty()).then_some(ports),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn service_port(port: &ServicePortConfig) -> ServicePort {
        let protocol = port
            .protocol
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(PROTOCOL_TCP)
            .to_uppercase();

        ServicePort {
            name: port.name.clone(),
            port: port.port,
            protocol: Some(protocol),
            target_port: port.target_port.map(IntOrString::Int),
            node_port: port.node_port,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str, number: i32) -> ServicePortConfig {
        ServicePortConfig {
            name: Some(name.to_string()),
            port: number,
            target_port: Some(8080),
            ..Default::default()
        }
    }

    #[test]
    fn test_service_without_ports_skipped_unless_headless() {
        let plain = ServiceConfig {
            name: Some("web".to_string()),
            ..Default::default()
        };
        assert!(ServiceHandler::build_service(&plain).is_none());

        let headless = ServiceConfig {
            headless: true,
            ..plain
        };
        let service = ServiceHandler::build_service(&headless).unwrap();
        assert_eq!(
            service.spec.unwrap().cluster_ip.as_deref(),
            Some("None")
        );
    }

    #[test]
    fn test_all_ports_emitted() {
        let config = ServiceConfig {
            name: Some("web".to_string()),
            ports: vec![port("http", 80), port("https", 443)],
            service_type: Some("NodePort".to_string()),
            expose: true,
            ..Default::default()
        };
        let service = ServiceHandler::build_service(&config).unwrap();
        let spec = service.spec.unwrap();
        let ports = spec.ports.unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
        assert_eq!(ports[1].target_port, Some(IntOrString::Int(8080)));
        assert_eq!(spec.type_.as_deref(), Some("NodePort"));
        assert_eq!(
            service.metadata.labels.unwrap().get("expose").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_prometheus_annotations() {
        let config = ServiceConfig {
            name: Some("metrics".to_string()),
            ports: vec![port("metrics", 9779)],
            ..Default::default()
        };
        let services = ServiceHandler::get_services(&[config]);
        let annotations = services[0].metadata.annotations.clone().unwrap();
        assert_eq!(annotations.get("prometheus.io/port").map(String::as_str), Some("9779"));
        assert_eq!(annotations.get("prometheus.io/scrape").map(String::as_str), Some("true"));
    }
}
