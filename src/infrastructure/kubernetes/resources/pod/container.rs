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
use crate::domain::config::project::ProjectConfig;
use crate::domain::config::resource::ResourceConfig;
use crate::infrastructure::constants::PULL_POLICY_PULL_ALWAYS;
use crate::infrastructure::kubernetes::resources::pod::builders::{
    volume_mount_specs, EnvironmentBuilder, ExternalEnvProvider, PortMapping,
};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{Container, SecurityContext};

/// Builds one container per image configuration.
pub struct ContainerHandler<'a> {
    project: &'a ProjectConfig,
    env_provider: Option<&'a dyn ExternalEnvProvider>,
}

impl<'a> ContainerHandler<'a> {
    pub fn new(project: &'a ProjectConfig) -> Self {
        Self {
            project,
            env_provider: None,
        }
    }

    pub fn with_env_provider(mut self, provider: &'a dyn ExternalEnvProvider) -> Self {
        self.env_provider = Some(provider);
        self
    }

    pub fn get_containers(
        &self,
        config: &ResourceConfig,
        images: &[ImageConfiguration],
    ) -> Result<Vec<Container>> {
        images
            .iter()
            .map(|image| self.build_container(config, image))
            .collect()
    }

    fn build_container(&self, config: &ResourceConfig, image: &ImageConfiguration) -> Result<Container> {
        let ports = PortMapping::new(&self.project.properties)?.container_ports(image.ports())?;

        let mut env = EnvironmentBuilder::new(&config.env);
        if let Some(provider) = self.env_provider {
            env = env.with_provider(provider);
        }

        let mounts: Vec<_> = volume_mount_specs(&config.volumes)
            .iter()
            .map(|m| m.to_volume_mount())
            .collect();

        Ok(Container {
            name: image.container_name(self.project),
            image: image.full_image_name(),
            image_pull_policy: self.image_pull_policy(config),
            env: Some(env.build()?),
            ports: (!ports.is_empty()).then_some(ports),
            volume_mounts: (!mounts.is_empty()).then_some(mounts),
            security_context: config.container_privileged.then(|| SecurityContext {
                privileged: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    /// A configured policy always wins. Otherwise released versions pull
    /// always and snapshot or unversioned builds leave the policy unset.
    pub fn image_pull_policy(&self, config: &ResourceConfig) -> Option<String> {
        if let Some(policy) = config.pull_policy() {
            return Some(policy.to_string());
        }
        match &self.project.version {
            Some(_) if !self.project.is_snapshot() => Some(PULL_POLICY_PULL_ALWAYS.to_string()),
            _ => None,
        }
    }
}
