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
use crate::domain::config::project::RegistryServer;
use crate::domain::enricher::api::{Enricher, EnricherConfig};
use crate::domain::resource::{Resource, ResourceCollection};
use crate::infrastructure::constants::{
    ANNOTATION_DOCKER_SERVER_ID, DOCKER_CONFIG_DATA_KEY, SECRET_TYPE_DOCKER_CONFIG,
};
use crate::shared::error::Result;
use k8s_openapi::ByteString;
use serde_json::{Map, Value};

/// Fills Secrets annotated with a registry server id with that server's
/// credentials in `.dockercfg` form. The annotation is consumed.
pub struct DockerRegistrySecretEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(DockerRegistrySecretEnricher::new(config))
}

impl DockerRegistrySecretEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }
}

fn docker_config(server: &RegistryServer) -> Value {
    let mut credentials = Map::new();
    let fields = [
        ("username", &server.username),
        ("password", &server.password),
        ("email", &server.email),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            credentials.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    let mut config = Map::new();
    config.insert(server.id.clone(), Value::Object(credentials));
    Value::Object(config)
}

impl Named for DockerRegistrySecretEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for DockerRegistrySecretEnricher {
    fn add_missing_resources(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        let project = &self.config.context().project;

        for resource in resources.iter_mut() {
            let Resource::Secret(secret) = resource else {
                continue;
            };
            let Some(server_id) = secret
                .metadata
                .annotations
                .as_ref()
                .and_then(|a| a.get(ANNOTATION_DOCKER_SERVER_ID))
            else {
                continue;
            };
            let Some(server) = project.server(server_id) else {
                tracing::warn!(
                    "No registry server '{}' configured for secret {}",
                    server_id,
                    secret.metadata.name.as_deref().unwrap_or_default()
                );
                continue;
            };

            let content = serde_json::to_vec(&docker_config(server))?;
            secret
                .data
                .get_or_insert_with(Default::default)
                .insert(DOCKER_CONFIG_DATA_KEY.to_string(), ByteString(content));
            if secret.type_.is_none() {
                secret.type_ = Some(SECRET_TYPE_DOCKER_CONFIG.to_string());
            }
            if let Some(annotations) = secret.metadata.annotations.as_mut() {
                annotations.remove(ANNOTATION_DOCKER_SERVER_ID);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::processor::ProcessorConfig;
    use crate::domain::enricher::api::EnricherContext;
    use crate::domain::enricher::standard::testing::project;
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn secret(server_id: &str) -> Resource {
        Resource::Secret(Secret {
            metadata: ObjectMeta {
                name: Some("pull-secret".to_string()),
                annotations: Some(BTreeMap::from([
                    (ANNOTATION_DOCKER_SERVER_ID.to_string(), server_id.to_string()),
                    ("owner".to_string(), "ops".to_string()),
                ])),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn enricher() -> DockerRegistrySecretEnricher {
        let project = project().with_server(RegistryServer {
            id: "docker.io".to_string(),
            username: Some("username".to_string()),
            password: Some("password".to_string()),
            email: None,
        });
        let context = EnricherContext::new(
            project,
            Vec::new(),
            Default::default(),
            ProcessorConfig::default(),
        );
        DockerRegistrySecretEnricher::new(EnricherConfig::new(
            "forge-docker-registry-secret",
            Arc::new(context),
        ))
    }

    fn as_secret(resources: &ResourceCollection) -> &Secret {
        match &resources.items()[0] {
            Resource::Secret(secret) => secret,
            other => panic!("expected a Secret, got {}", other.kind()),
        }
    }

    #[test]
    fn test_credentials_added_and_annotation_consumed() {
        let mut resources: ResourceCollection = vec![secret("docker.io")].into_iter().collect();
        enricher()
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        let secret = as_secret(&resources);
        let data = &secret.data.as_ref().unwrap()[".dockercfg"];
        let config: Value = serde_json::from_slice(&data.0).unwrap();
        assert_eq!(
            config,
            serde_json::json!({"docker.io": {"username": "username", "password": "password"}})
        );
        assert_eq!(secret.type_.as_deref(), Some("kubernetes.io/dockercfg"));
        assert_eq!(
            secret.metadata.annotations.clone().unwrap(),
            BTreeMap::from([("owner".to_string(), "ops".to_string())])
        );
    }

    #[test]
    fn test_unknown_server_leaves_secret() {
        let mut resources: ResourceCollection = vec![secret("quay.io")].into_iter().collect();
        let before = resources.items()[0].clone();
        enricher()
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        assert_eq!(resources.items()[0], before);
    }

    #[test]
    fn test_secret_without_annotation_ignored() {
        let mut resources: ResourceCollection = vec![Resource::Secret(Secret::default())]
            .into_iter()
            .collect();
        enricher()
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        assert!(as_secret(&resources).data.is_none());
    }
}
