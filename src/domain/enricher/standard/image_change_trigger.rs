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
use crate::domain::config::image::{ImageConfiguration, ImageName};
use crate::domain::config::processor::Named;
use crate::domain::enricher::api::{ConfigKey, Enricher, EnricherConfig};
use crate::domain::resource::{
    DeploymentTriggerImageChangeParams, DeploymentTriggerPolicy, Resource, ResourceCollection,
};
use crate::infrastructure::constants::{KIND_IMAGE_STREAM_TAG, TRIGGER_IMAGE_CHANGE};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{Container, ObjectReference};

const CONTAINERS: ConfigKey = ConfigKey::new("containers", Some(""), "Comma separated container names to trigger besides the generated ones");
const AUTOMATIC: ConfigKey = ConfigKey::new("automatic", Some("true"), "Redeploy as soon as the image stream tag changes");
const ENRICH_ALL: ConfigKey = ConfigKey::new("enrichAll", Some("false"), "Trigger on every container image");
const TRIM_IMAGE: ConfigKey = ConfigKey::new("trimImage", Some("false"), "Blank the image of triggered containers");

/// Adds image change triggers to DeploymentConfigs in OpenShift mode.
///
/// Containers running one of the build's images get a trigger on the
/// matching `ImageStreamTag`, as do containers named in `containers`.
pub struct ImageChangeTriggerEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(ImageChangeTriggerEnricher::new(config))
}

impl ImageChangeTriggerEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn needs_trigger(&self, container: &Container, image: &str) -> bool {
        if self.config.get_bool(&ENRICH_ALL) {
            return true;
        }
        let configured = self.config.get_or(&CONTAINERS, "");
        if configured.split(',').map(str::trim).any(|n| n == container.name) {
            return true;
        }
        self.config
            .context()
            .images
            .iter()
            .filter_map(ImageConfiguration::full_image_name)
            .any(|name| name == image)
    }
}

fn image_change_trigger(container: &str, image: &str, automatic: bool) -> DeploymentTriggerPolicy {
    let image = ImageName::parse(image);
    DeploymentTriggerPolicy {
        type_: TRIGGER_IMAGE_CHANGE.to_string(),
        image_change_params: Some(DeploymentTriggerImageChangeParams {
            automatic: Some(automatic),
            container_names: vec![container.to_string()],
            from: ObjectReference {
                kind: Some(KIND_IMAGE_STREAM_TAG.to_string()),
                name: Some(format!(
                    "{}:{}",
                    image.simple_name(),
                    image.tag().unwrap_or("latest")
                )),
                namespace: image.user().map(str::to_string),
                ..Default::default()
            },
        }),
    }
}

fn has_trigger_for(triggers: &[DeploymentTriggerPolicy], container: &str) -> bool {
    triggers
        .iter()
        .filter_map(|t| t.image_change_params.as_ref())
        .any(|p| p.container_names.iter().any(|n| n == container))
}

impl Named for ImageChangeTriggerEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for ImageChangeTriggerEnricher {
    fn adapt(&self, mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        if mode != PlatformMode::Openshift {
            return Ok(());
        }
        let automatic = self.config.get_bool(&AUTOMATIC);
        let trim = self.config.get_bool(&TRIM_IMAGE);

        for resource in resources.iter_mut() {
            let Resource::DeploymentConfig(dc) = resource else {
                continue;
            };
            let Some(spec) = dc.spec.as_mut() else {
                continue;
            };
            let Some(pod_spec) = spec.template.as_mut().and_then(|t| t.spec.as_mut()) else {
                continue;
            };

            let triggers = spec.triggers.get_or_insert_with(Vec::new);
            for container in pod_spec.containers.iter_mut() {
                let Some(image) = container.image.clone().filter(|i| !i.is_empty()) else {
                    continue;
                };
                if container.name.is_empty()
                    || has_trigger_for(triggers.as_slice(), &container.name)
                    || !self.needs_trigger(container, &image)
                {
                    continue;
                }

                tracing::debug!(
                    "{}: image change trigger for container {} on {}",
                    self.name(),
                    container.name,
                    image
                );
                triggers.push(image_change_trigger(&container.name, &image, automatic));
                if trim {
                    container.image = Some(String::new());
                }
            }
            if triggers.is_empty() {
                spec.triggers = None;
            }
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[CONTAINERS, AUTOMATIC, ENRICH_ALL, TRIM_IMAGE]
    }
}
