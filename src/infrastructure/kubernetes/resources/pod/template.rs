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

use crate::domain::config::image::ImageConfiguration;
use crate::domain::config::resource::ResourceConfig;
use crate::infrastructure::kubernetes::resources::pod::builders::build_volumes;
use crate::infrastructure::kubernetes::resources::pod::container::ContainerHandler;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashSet;

pub struct PodTemplateHandler<'a> {
    container_handler: ContainerHandler<'a>,
}

impl<'a> PodTemplateHandler<'a> {
    pub fn new(container_handler: ContainerHandler<'a>) -> Self {
        Self { container_handler }
    }

    pub fn get_pod_template(
        &self,
        config: &ResourceConfig,
        images: &[ImageConfiguration],
    ) -> Result<PodTemplateSpec> {
        let volumes = build_volumes(&config.volumes);
        let volume_names: HashSet<&str> = volumes.iter().map(|v| v.name.as_str()).collect();

        let mut containers = self.container_handler.get_containers(config, images)?;
        for container in &mut containers {
            let Some(mounts) = container.volume_mounts.take() else {
                continue;
            };
            let kept: Vec<_> = mounts
                .into_iter()
                .filter(|mount| {
                    let known = volume_names.contains(mount.name.as_str());
                    if !known {
                        tracing::warn!(
                            "Dropping mount {} of container {}: no volume named '{}'",
                            mount.mount_path,
                            container.name,
                            mount.name
                        );
                    }
                    known
                })
                .collect();
            container.volume_mounts = (!kept.is_empty()).then_some(kept);
        }

        let annotations = &config.annotations.pod;
        let service_account_name = config
            .service_account
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(PodTemplateSpec {
            metadata: Some(ObjectMeta {
                annotations: (!annotations.is_empty()).then(|| annotations.clone()),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                containers,
                service_account_name,
                volumes: (!volumes.is_empty()).then_some(volumes),
                ..Default::default()
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::project::ProjectConfig;
    use crate::domain::config::resource::VolumeConfig;

    #[test]
    fn test_volumes_and_mounts_filtered_together() {
        let project = ProjectConfig::new("io.forge", "demo");
        let config = ResourceConfig::builder()
            .volumes(vec![
                VolumeConfig::new("data", "hostPath")
                    .with_path("/mnt")
                    .with_mounts(["/data"]),
                VolumeConfig::new("typo", "hostpath").with_mounts(["/typo"]),
            ])
            .build();

        let template = PodTemplateHandler::new(ContainerHandler::new(&project))
            .get_pod_template(&config, &[ImageConfiguration::new("demo")])
            .unwrap();
        let spec = template.spec.unwrap();

        let volumes = spec.volumes.unwrap();
        assert_eq!(volumes.len(), 1);
        let mounts = spec.containers[0].volume_mounts.as_ref().unwrap();
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].name, "data");
    }

    #[test]
    fn test_service_account_absent_by_default() {
        let project = ProjectConfig::new("io.forge", "demo");
        let handler = PodTemplateHandler::new(ContainerHandler::new(&project));

        let template = handler
            .get_pod_template(&ResourceConfig::default(), &[])
            .unwrap();
        assert_eq!(template.spec.unwrap().service_account_name, None);

        let config = ResourceConfig::builder().service_account("builder").build();
        let template = handler.get_pod_template(&config, &[]).unwrap();
        assert_eq!(
            template.spec.unwrap().service_account_name.as_deref(),
            Some("builder")
        );
    }
}
