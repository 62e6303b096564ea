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

//! The generation pipeline: base fragments, enrichment, then overrides.

use crate::domain::config::build::BuildConfig;
use crate::domain::enricher::{EnricherContext, EnricherManager, EnricherRegistry};
use crate::domain::resource::{Resource, ResourceCollection};
use crate::infrastructure::kubernetes::fragments::read_fragments;
use crate::infrastructure::kubernetes::merge_resources;
use crate::shared::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

pub struct ResourceGenerator {
    build: BuildConfig,
    registry: EnricherRegistry,
    resource_dir: Option<PathBuf>,
    override_dir: Option<PathBuf>,
}

impl ResourceGenerator {
    pub fn new(build: BuildConfig) -> Self {
        Self {
            build,
            registry: EnricherRegistry::with_defaults(),
            resource_dir: None,
            override_dir: None,
        }
    }

    pub fn with_registry(mut self, registry: EnricherRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Directory of base fragments entering the pipeline before enrichment.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// Directory of override fragments merged after enrichment.
    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }

    pub fn generate(&self) -> Result<ResourceCollection> {
        let default_name = self.build.project.default_resource_name();

        let mut resources: ResourceCollection = match &self.resource_dir {
            Some(dir) => read_fragments(dir, &default_name)?.into_iter().collect(),
            None => ResourceCollection::new(),
        };
        tracing::debug!("Starting with {} resource fragment(s)", resources.len());

        let context = Arc::new(EnricherContext::from_build(&self.build));
        let manager = EnricherManager::with_registry(context, &self.registry)?;
        self.enrich(&manager, &mut resources)?;

        if let Some(dir) = &self.override_dir {
            let overrides = read_fragments(dir, &default_name)?;
            apply_overrides(&mut resources, overrides, &default_name)?;
        }

        tracing::info!("Generated {} resource(s)", resources.len());
        Ok(resources)
    }

    fn enrich(&self, manager: &EnricherManager, resources: &mut ResourceCollection) -> Result<()> {
        manager.enrich(self.build.platform_mode, resources)
    }
}

/// Merges each override into the resource of the same kind and name, or
/// appends it when there is none. Unnamed overrides target `default_name`.
pub fn apply_overrides(
    resources: &mut ResourceCollection,
    overrides: Vec<Resource>,
    default_name: &str,
) -> Result<()> {
    for over in overrides {
        let name = over.name().unwrap_or(default_name).to_string();
        match resources.position(over.kind(), &name) {
            Some(index) => {
                tracing::debug!("Merging override into {} {}", over.kind(), name);
                let merged = merge_resources(&resources.items()[index], &over)?;
                resources.replace(index, merged);
            }
            None => {
                tracing::debug!("Adding override {} {} as new resource", over.kind(), name);
                resources.push(over);
            }
        }
    }
    Ok(())
}
