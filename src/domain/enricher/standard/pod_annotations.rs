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
use crate::domain::enricher::api::{Enricher, EnricherConfig};
use crate::domain::enricher::metadata::merge_absent;
use crate::domain::resource::{Resource, ResourceCollection};
use crate::shared::error::Result;

/// Copies Deployment annotations onto its pod template.
pub struct PodAnnotationEnricher {
    config: EnricherConfig,
}

pub fn create(config: EnricherConfig) -> Box<dyn Enricher> {
    Box::new(PodAnnotationEnricher::new(config))
}

impl PodAnnotationEnricher {
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }
}

impl Named for PodAnnotationEnricher {
    fn name(&self) -> &str {
        self.config.name()
    }
}

impl Enricher for PodAnnotationEnricher {
    fn adapt(&self, _mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        for resource in resources.iter_mut() {
            let Resource::Deployment(deployment) = resource else {
                continue;
            };
            let (Some(annotations), Some(spec)) =
                (deployment.metadata.annotations.as_ref(), deployment.spec.as_mut())
            else {
                continue;
            };
            let meta = spec.template.metadata.get_or_insert_with(Default::default);
            merge_absent(meta.annotations.get_or_insert_with(Default::default), annotations);
        }
        Ok(())
    }
}
