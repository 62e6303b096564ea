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
use crate::shared::error::Result;

const NAME: ConfigKey = ConfigKey::new("name", None, "Name given to resources without one");

/// Gives every unnamed resource a name.
pub struct NameEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(NameEnricher::new(config))
}

impl NameEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn resource_name(&self) -> String {
        self.config
            .get(&NAME)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.config.context().project.default_resource_name())
    }
}

impl Named for NameEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for NameEnricher {
    fn add_missing_resources(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        let name = self.resource_name();
        for resource in resources.iter_mut() {
            if resource.name().is_none() {
                tracing::debug!("Naming unnamed {} {}", resource.kind(), name);
                resource.metadata_mut().name = Some(name.clone());
            }
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[NAME]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::processor::ProcessorConfig;
    use crate::domain::enricher::standard::testing::enricher_config;
    use crate::domain::resource::Resource;
    use k8s_openapi::api::core::v1::{ConfigMap, Service};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn named_service(name: &str) -> Resource {
        Resource::Service(Service {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_blank_names_filled_with_default() {
        let enricher = NameEnricher::new(enricher_config(
            "forge-name",
            Vec::new(),
            Default::default(),
            ProcessorConfig::default(),
        ));
        let mut resources: ResourceCollection = vec![
            named_service(" "),
            named_service("keep"),
            Resource::ConfigMap(ConfigMap::default()),
        ]
        .into_iter()
        .collect();

        enricher
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();

        let names: Vec<_> = resources.iter().map(|r| r.name().unwrap_or_default()).collect();
        assert_eq!(names, vec!["demo", "keep", "demo"]);
    }

    #[test]
    fn test_configured_name_wins() {
        let enricher = NameEnricher::new(enricher_config(
            "forge-name",
            Vec::new(),
            Default::default(),
            ProcessorConfig::default().with_config("forge-name", "name", "custom"),
        ));
        let mut resources: ResourceCollection = vec![named_service("")].into_iter().collect();
        enricher
            .add_missing_resources(PlatformMode::Kubernetes, &mut resources)
            .unwrap();
        assert_eq!(resources.items()[0].name(), Some("custom"));
    }
}
