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
use crate::domain::config::resource::ResourceConfig;
use crate::domain::enricher::api::{ConfigKey, Enricher, EnricherConfig};
use crate::domain::resource::{Kind, Resource, ResourceCollection};
use crate::infrastructure::constants::{DEFAULT_REPLICAS, PULL_POLICY_IF_NOT_PRESENT};
use crate::infrastructure::kubernetes::resources::{controller_handler, merge_pod_spec_defaults};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::PodSpec;

const NAME: ConfigKey = ConfigKey::new("name", None, "Name of the default controller");
const PULL_POLICY: ConfigKey = ConfigKey::new(
    "pullPolicy",
    Some(PULL_POLICY_IF_NOT_PRESENT),
    "Image pull policy used when the resource policy sets none",
);
const TYPE: ConfigKey = ConfigKey::new("type", Some("deployment"), "Kind of controller to add");

/// Kinds whose presence means a pod controller is already declared.
const POD_CONTROLLER_KINDS: [Kind; 4] = [
    Kind::ReplicationController,
    Kind::ReplicaSet,
    Kind::Deployment,
    Kind::DeploymentConfig,
];

/// Adds a default controller when none is declared, otherwise fills gaps in
/// the declared pod templates.
pub struct DefaultControllerEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(DefaultControllerEnricher::new(config))
}

impl DefaultControllerEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn default_name(&self) -> String {
        self.config
            .get(&NAME)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.config.context().project.default_resource_name())
    }

    /// Resource policy with the controller name and pull policy defaulted.
    fn resource_config(&self, default_name: &str) -> ResourceConfig {
        let mut config = self.config.context().resources.clone();
        if config
            .controller_name
            .as_deref()
            .map_or(true, |n| n.trim().is_empty())
        {
            config.controller_name = Some(default_name.to_string());
        }
        if config.pull_policy().is_none() {
            config.image_pull_policy = self.config.get(&PULL_POLICY);
        }
        config
    }

    fn controller_kind(&self, mode: PlatformMode) -> Option<Kind> {
        let controller_type = self.config.get_or(&TYPE, "deployment");
        let kind = match controller_type.trim().to_lowercase().as_str() {
            "deployment" if mode == PlatformMode::Openshift => Kind::DeploymentConfig,
            "deployment" => Kind::Deployment,
            "replicaset" => Kind::ReplicaSet,
            "replicationcontroller" => Kind::ReplicationController,
            "statefulset" => Kind::StatefulSet,
            "daemonset" => Kind::DaemonSet,
            "job" => Kind::Job,
            other => {
                tracing::warn!("Unknown controller type '{}', no controller added", other);
                return None;
            }
        };
        Some(kind)
    }

    fn default_pod_spec(&self, config: &ResourceConfig) -> Result<PodSpec> {
        let context = self.config.context();
        let template = context
            .handler_hub()
            .pod_template_handler()
            .get_pod_template(config, &context.images)?;
        Ok(template.spec.unwrap_or_default())
    }
}

impl Named for DefaultControllerEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for DefaultControllerEnricher {
    fn add_missing_resources(&self, mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        let default_name = self.default_name();
        let config = self.resource_config(&default_name);
        let context = self.config.context();

        if !resources.has_kind(&POD_CONTROLLER_KINDS) {
            let Some(handler) = self.controller_kind(mode).and_then(controller_handler) else {
                return Ok(());
            };
            tracing::info!("Adding a default {}", handler.kind());
            let templates = context.handler_hub().pod_template_handler();
            resources.push(handler.get(&templates, &config, &context.images)?);
            return Ok(());
        }

        let default_spec = self.default_pod_spec(&config)?;
        let replicas = config.replicas.unwrap_or(DEFAULT_REPLICAS);
        for resource in resources.iter_mut() {
            if let Resource::Deployment(deployment) = resource {
                let spec = deployment.spec.get_or_insert_with(Default::default);
                spec.replicas.get_or_insert(replicas);
                resource.ensure_pod_template();
            }
            if let Some(pod_spec) = resource.pod_spec_mut() {
                merge_pod_spec_defaults(&default_spec, pod_spec, &default_name);
            }
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[NAME, PULL_POLICY, TYPE]
    }
}
