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
use crate::domain::enricher::api::{ConfigKey, Enricher, EnricherConfig};
use crate::domain::resource::ResourceCollection;
use crate::infrastructure::constants::{PULL_POLICY_IF_NOT_PRESENT, VOLUME_PERMISSION_IMAGE};
use crate::infrastructure::kubernetes::resources::InitContainerHandler;
use crate::shared::error::{ForgeError, Result};
use k8s_openapi::api::core::v1::{Container, PodSpec, VolumeMount};

const PERMISSION: ConfigKey = ConfigKey::new("permission", Some("777"), "Mode applied to persistent volume mounts");

/// Adds an init container making persistent volume claims writable.
pub struct VolumePermissionEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(VolumePermissionEnricher::new(config))
}

impl VolumePermissionEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn init_container(&self, pod_spec: &PodSpec) -> Result<Container> {
        let mount_points = mount_points(pod_spec)?;

        let mut command = vec!["chmod".to_string(), self.config.get_or(&PERMISSION, "777")];
        for (_, path) in &mount_points {
            if !command[2..].contains(path) {
                command.push(path.clone());
            }
        }

        Ok(Container {
            name: self.config.name().to_string(),
            image: Some(VOLUME_PERMISSION_IMAGE.to_string()),
            image_pull_policy: Some(PULL_POLICY_IF_NOT_PRESENT.to_string()),
            command: Some(command),
            volume_mounts: Some(
                mount_points
                    .into_iter()
                    .map(|(name, mount_path)| VolumeMount {
                        name,
                        mount_path,
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        })
    }
}

/// Claim volume names with the path they are first mounted at, in volume order.
fn mount_points(pod_spec: &PodSpec) -> Result<Vec<(String, String)>> {
    pod_spec
        .volumes
        .iter()
        .flatten()
        .filter(|v| v.persistent_volume_claim.is_some())
        .map(|volume| {
            pod_spec
                .containers
                .iter()
                .flat_map(|c| c.volume_mounts.iter().flatten())
                .find(|m| m.name == volume.name)
                .map(|m| (volume.name.clone(), m.mount_path.clone()))
                .ok_or_else(|| {
                    ForgeError::invalid_resource(format!(
                        "No matching volume mount found for volume {}",
                        volume.name
                    ))
                })
        })
        .collect()
}

fn has_claim(pod_spec: &PodSpec) -> bool {
    pod_spec
        .volumes
        .iter()
        .flatten()
        .any(|v| v.persistent_volume_claim.is_some())
}

impl Named for VolumePermissionEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for VolumePermissionEnricher {
    fn adapt(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        for resource in resources.iter_mut() {
            let Some(template) = resource.pod_template_mut() else {
                continue;
            };
            let Some(pod_spec) = template.spec.as_ref() else {
                continue;
            };
            if !has_claim(pod_spec) || pod_spec.containers.is_empty() {
                continue;
            }
            if InitContainerHandler::has_init_container(template, self.name()) {
                continue;
            }

            tracing::debug!(
                "Adding init container for changing persistent volumes access mode to {}",
                self.config.get_or(&PERMISSION, "777")
            );
            let container = self.init_container(pod_spec)?;
            InitContainerHandler::append_init_container(template, container)?;
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[PERMISSION]
    }
}
