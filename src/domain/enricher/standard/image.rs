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
use crate::domain::enricher::api::{ConfigKey, Enricher, EnricherConfig};
use crate::domain::resource::ResourceCollection;
use crate::infrastructure::constants::{
    ENV_KUBERNETES_NAMESPACE, PULL_POLICY_ALWAYS, PULL_POLICY_IF_NOT_PRESENT,
};
use crate::infrastructure::kubernetes::resources::pod::builders::env::namespace_env_var;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{Container, EnvVar};
use std::collections::BTreeMap;

const PULL_POLICY: ConfigKey = ConfigKey::new("pullPolicy", None, "Pull policy for containers without one");

const LATEST_SUFFIX: &str = ":latest";

/// Fills the containers of every pod template from the image configurations.
pub struct ImageEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(ImageEnricher::new(config))
}

impl ImageEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn merge_images(&self, containers: &mut Vec<Container>) {
        let context = self.config.context();
        for (idx, image) in context.images.iter().enumerate() {
            if idx >= containers.len() {
                containers.push(Container::default());
            }
            let container = &mut containers[idx];
            self.merge_pull_policy(image, container);
            merge_image(image, container);
            if container.name.trim().is_empty() {
                container.name = image.container_name(&context.project);
                tracing::debug!("Setting container name {}", container.name);
            }
            merge_env(&context.resources.env, container);
        }
    }

    fn merge_pull_policy(&self, image: &ImageConfiguration, container: &mut Container) {
        if !is_blank(&container.image_pull_policy) {
            return;
        }
        let policy = self.config.get(&PULL_POLICY).unwrap_or_else(|| {
            let latest = image.name.as_deref().is_some_and(|n| n.ends_with(LATEST_SUFFIX));
            let policy = if latest {
                PULL_POLICY_ALWAYS
            } else {
                PULL_POLICY_IF_NOT_PRESENT
            };
            policy.to_string()
        });
        container.image_pull_policy = Some(policy);
    }
}

fn merge_image(image: &ImageConfiguration, container: &mut Container) {
    if is_blank(&container.image) {
        if let Some(full_name) = image.full_image_name() {
            tracing::debug!("Setting image {}", full_name);
            container.image = Some(full_name);
        }
    }
}

/// Adds configured variables the container does not declare yet. A declared
/// variable keeps its value. The injected namespace variable is appended when
/// missing and can not be configured.
fn merge_env(configured: &BTreeMap<String, String>, container: &mut Container) {
    let env = container.env.get_or_insert_with(Vec::new);
    for (name, value) in configured {
        if name.trim().is_empty() {
            tracing::warn!("Dropping environment variable with blank name (value: {})", value);
            continue;
        }
        if name == ENV_KUBERNETES_NAMESPACE {
            tracing::warn!(
                "Environment variable {} is injected and can not be configured",
                ENV_KUBERNETES_NAMESPACE
            );
            continue;
        }
        match env.iter().find(|e| &e.name == name) {
            Some(existing) if existing.value.as_ref() == Some(value) => {}
            Some(existing) => {
                let actual = existing
                    .value
                    .clone()
                    .unwrap_or_else(|| "retrieved using the downward API".to_string());
                tracing::warn!(
                    "Environment variable {} will not be overridden: trying to set the value {}, but its actual value will be {}",
                    name,
                    value,
                    actual
                );
            }
            None => env.push(EnvVar {
                name: name.clone(),
                value: Some(value.clone()),
                ..Default::default()
            }),
        }
    }

    if !env.iter().any(|e| e.name == ENV_KUBERNETES_NAMESPACE) {
        env.push(namespace_env_var());
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl Named for ImageEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for ImageEnricher {
    fn add_missing_resources(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        if self.config.context().images.is_empty() {
            tracing::debug!("No images resolved. Skipping ...");
            return Ok(());
        }

        for resource in resources.iter_mut() {
            if !resource.kind().is_controller() {
                continue;
            }
            let Some(template) = resource.ensure_pod_template() else {
                continue;
            };
            let spec = template.spec.get_or_insert_with(Default::default);
            self.merge_images(&mut spec.containers);
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[PULL_POLICY]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::processor::ProcessorConfig;
    use crate::domain::config::resource::ResourceConfig;
    use crate::domain::enricher::standard::testing::enricher_config;
    use crate::domain::resource::{Kind, Resource};
    use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, ReplicaSet, ReplicaSetSpec};
    use k8s_openapi::api::core::v1::{
        EnvVarSource, ObjectFieldSelector, PodSpec, PodTemplateSpec, Service,
    };

    fn enricher(images: Vec<ImageConfiguration>, env: &[(&str, &str)], processor: ProcessorConfig) -> ImageEnricher {
        let resources = ResourceConfig::builder()
            .env(env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
            .build();
        ImageEnricher::new(enricher_config("forge-image", images, resources, processor))
    }

    fn run(enricher: &ImageEnricher, resources: Vec<Resource>) -> ResourceCollection {
        let mut resources: ResourceCollection = resources.into_iter().collect();
        enricher
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        resources
    }

    #[test]
    fn test_containers_filled_from_images() {
        let images = vec![
            ImageConfiguration::new("forge/web:latest"),
            ImageConfiguration::new("forge/worker:1.0").with_registry("registry.io"),
        ];
        let resources = run(
            &enricher(images, &[], ProcessorConfig::default()),
            vec![Resource::Deployment(Deployment::default()), Resource::Service(Service::default())],
        );

        let containers = &resources.items()[0].pod_spec().unwrap().containers;
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].image_pull_policy.as_deref(), Some("Always"));
        assert_eq!(containers[0].name, "forge-demo");
        assert_eq!(containers[1].image.as_deref(), Some("registry.io/forge/worker:1.0"));
        assert_eq!(containers[1].image_pull_policy.as_deref(), Some("IfNotPresent"));
        assert!(resources.items()[1].pod_template().is_none());
    }

    #[test]
    fn test_configured_pull_policy_and_existing_values_kept() {
        let processor = ProcessorConfig::default().with_config("forge-image", "pullPolicy", "Never");
        let rs = ReplicaSet {
            spec: Some(ReplicaSetSpec {
                template: Some(PodTemplateSpec {
                    spec: Some(PodSpec {
                        containers: vec![Container {
                            name: "kept".to_string(),
                            image: Some("other:1".to_string()),
                            ..Default::default()
                        }],
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let resources = run(
            &enricher(vec![ImageConfiguration::new("forge/web:latest")], &[], processor),
            vec![Resource::ReplicaSet(rs)],
        );
        let container = &resources.items()[0].pod_spec().unwrap().containers[0];
        assert_eq!(resources.items()[0].kind(), Kind::ReplicaSet);
        assert_eq!(container.name, "kept");
        assert_eq!(container.image.as_deref(), Some("other:1"));
        assert_eq!(container.image_pull_policy.as_deref(), Some("Never"));
    }

    #[test]
    fn test_env_not_overridden() {
        let mut container = Container {
            env: Some(vec![
                EnvVar {
                    name: "MODE".to_string(),
                    value: Some("prod".to_string()),
                    ..Default::default()
                },
                EnvVar {
                    name: "POD".to_string(),
                    value_from: Some(EnvVarSource {
                        field_ref: Some(ObjectFieldSelector {
                            field_path: "metadata.name".to_string(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let configured = BTreeMap::from([
            ("MODE".to_string(), "dev".to_string()),
            ("POD".to_string(), "x".to_string()),
            ("NEW".to_string(), "1".to_string()),
        ]);
        merge_env(&configured, &mut container);

        let env = container.env.unwrap();
        assert_eq!(env.len(), 4);
        assert_eq!(env[0].value.as_deref(), Some("prod"));
        assert!(env[1].value.is_none());
        assert_eq!(env[2].name, "NEW");
        assert_eq!(env[3].name, ENV_KUBERNETES_NAMESPACE);
    }

    #[test]
    fn test_configured_namespace_variable_ignored() {
        let deployment = Deployment {
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    spec: Some(PodSpec {
                        containers: vec![Container {
                            name: "web".to_string(),
                            ..Default::default()
                        }],
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        let resources = run(
            &enricher(
                vec![ImageConfiguration::new("forge/web:1.0")],
                &[("KUBERNETES_NAMESPACE", "foo"), ("MODE", "dev")],
                ProcessorConfig::default(),
            ),
            vec![Resource::Deployment(deployment)],
        );

        let env = resources.items()[0].pod_spec().unwrap().containers[0]
            .env
            .clone()
            .unwrap();
        let names: Vec<&str> = env.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["MODE", ENV_KUBERNETES_NAMESPACE]);
        assert!(env[1].value.is_none());
        let field_path = env[1]
            .value_from
            .as_ref()
            .and_then(|s| s.field_ref.as_ref())
            .map(|f| f.field_path.as_str());
        assert_eq!(field_path, Some("metadata.namespace"));
    }

    #[test]
    fn test_existing_namespace_variable_not_duplicated() {
        let mut container = Container {
            env: Some(vec![namespace_env_var()]),
            ..Default::default()
        };
        merge_env(&BTreeMap::new(), &mut container);
        merge_env(&BTreeMap::new(), &mut container);
        assert_eq!(container.env.unwrap().len(), 1);
    }

    #[test]
    fn test_no_images_skips() {
        let resources = run(
            &enricher(Vec::new(), &[], ProcessorConfig::default()),
            vec![Resource::Deployment(Deployment::default())],
        );
        assert!(resources.items()[0].pod_spec().is_none());
    }
}
