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
use crate::domain::enricher::api::{Enricher, EnricherConfig, EnricherContext};
use crate::domain::enricher::metadata;
use crate::domain::enricher::registry::{descriptor_sources, parse_descriptors, EnricherRegistry};
use crate::domain::resource::ResourceCollection;
use crate::shared::error::Result;
use std::sync::Arc;

const PROCESSOR_KIND: &str = "enricher";

/// A configuration key of one enricher with the value it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnricherSetting {
    pub enricher: String,
    pub key: &'static str,
    pub value: Option<String>,
    pub description: &'static str,
}

/// Runs the three enrichment phases over a collection.
pub struct EnricherManager {
    context: Arc<EnricherContext>,
    enrichers: Vec<Box<dyn Enricher>>,
}

impl EnricherManager {
    pub fn new(context: Arc<EnricherContext>) -> Result<Self> {
        Self::with_registry(context, &EnricherRegistry::with_defaults())
    }

    pub fn with_registry(context: Arc<EnricherContext>, registry: &EnricherRegistry) -> Result<Self> {
        let sources = descriptor_sources(&context.processor.descriptors)?;
        let entries = parse_descriptors(&sources);
        let enrichers = registry.create_enrichers(&entries, context.clone())?;
        tracing::debug!(
            "Discovered enrichers: {}",
            enrichers.iter().map(|e| e.name()).collect::<Vec<_>>().join(", ")
        );
        let manager = Self { context, enrichers };
        for setting in manager.settings() {
            tracing::debug!(
                "{}: {} = {} ({})",
                setting.enricher,
                setting.key,
                setting.value.as_deref().unwrap_or("<unset>"),
                setting.description
            );
        }
        Ok(manager)
    }

    pub fn from_enrichers(context: Arc<EnricherContext>, enrichers: Vec<Box<dyn Enricher>>) -> Self {
        Self { context, enrichers }
    }

    pub fn enrichers(&self) -> &[Box<dyn Enricher>] {
        &self.enrichers
    }

    /// Declared configuration keys of all discovered enrichers, resolved
    /// against the context.
    pub fn settings(&self) -> Vec<EnricherSetting> {
        self.enrichers
            .iter()
            .flat_map(|enricher| {
                let config = EnricherConfig::new(enricher.name(), self.context.clone());
                enricher.config_keys().iter().map(move |key| EnricherSetting {
                    enricher: config.name().to_string(),
                    key: key.name,
                    value: config.get(key),
                    description: key.description,
                })
            })
            .collect()
    }

    /// Enrichers selected by the processor configuration, in execution order.
    pub fn active(&self) -> Result<Vec<&dyn Enricher>> {
        self.context.processor.prepare(&self.enrichers, PROCESSOR_KIND)
    }

    pub fn enrich(&self, mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        self.add_missing_resources(mode, resources)?;
        self.add_metadata(resources)?;
        self.adapt(mode, resources)
    }

    pub fn add_missing_resources(&self, mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        for enricher in self.active()? {
            tracing::debug!("{}: adding missing resources", enricher.name());
            enricher.add_missing_resources(mode, resources)?;
        }
        Ok(())
    }

    pub fn add_metadata(&self, resources: &mut ResourceCollection) -> Result<()> {
        metadata::add_metadata(
            resources,
            &self.enrichers,
            &self.context.resources,
            &self.context.processor,
        )
    }

    pub fn adapt(&self, mode: PlatformMode, resources: &mut ResourceCollection) -> Result<()> {
        for enricher in self.active()? {
            tracing::debug!("{}: adapting", enricher.name());
            enricher.adapt(mode, resources)?;
        }
        Ok(())
    }
}
