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
use crate::domain::enricher::metadata::merge_absent;
use crate::domain::resource::{Kind, ResourceCollection};
use crate::infrastructure::constants::{
    LABEL_APP, LABEL_GROUP, LABEL_PROJECT, LABEL_PROVIDER, LABEL_VERSION, PROVIDER_NAME,
};
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

const USE_PROJECT_LABEL: ConfigKey = ConfigKey::new(
    "useProjectLabel",
    Some("false"),
    "Label the artifact as 'project' instead of 'app'",
);

/// Project coordinates as labels and selectors.
pub struct ProjectLabelEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(ProjectLabelEnricher::new(config))
}

impl ProjectLabelEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    fn project_labels(&self, with_version: bool) -> BTreeMap<String, String> {
        let project = &self.config.context().project;
        let mut ret = BTreeMap::new();

        let artifact_label = if self.config.get_bool(&USE_PROJECT_LABEL) {
            LABEL_PROJECT
        } else {
            LABEL_APP
        };
        ret.insert(artifact_label.to_string(), project.artifact_id.clone());
        ret.insert(LABEL_GROUP.to_string(), project.group_id.clone());
        ret.insert(LABEL_PROVIDER.to_string(), PROVIDER_NAME.to_string());
        if with_version {
            if let Some(version) = &project.version {
                ret.insert(LABEL_VERSION.to_string(), version.clone());
            }
        }
        ret
    }

    fn label(meta: &mut ObjectMeta, labels: &BTreeMap<String, String>) {
        merge_absent(meta.labels.get_or_insert_with(Default::default), labels);
    }
}

impl Named for ProjectLabelEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for ProjectLabelEnricher {
    fn selector(&self, kind: Kind) -> BTreeMap<String, String> {
        self.project_labels(!kind.has_no_version_in_selector())
    }

    fn adapt(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        let labels = self.project_labels(true);
        for resource in resources.iter_mut() {
            Self::label(resource.metadata_mut(), &labels);
            if let Some(template) = resource.pod_template_mut() {
                Self::label(template.metadata.get_or_insert_with(Default::default), &labels);
            }
        }
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[USE_PROJECT_LABEL]
    }
}
