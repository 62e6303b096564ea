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

//! Enricher contract, per-enricher configuration and the shared context

use crate::domain::config::build::{BuildConfig, PlatformMode};
use crate::domain::config::image::ImageConfiguration;
use crate::domain::config::processor::{Named, ProcessorConfig};
use crate::domain::config::project::ProjectConfig;
use crate::domain::config::resource::ResourceConfig;
use crate::domain::resource::{Kind, ResourceCollection};
use crate::infrastructure::constants::ENRICHER_PROPERTY_PREFIX;
use crate::infrastructure::kubernetes::resources::pod::builders::{
    ExternalEnvProvider, JsonSchemaEnvProvider,
};
use crate::infrastructure::kubernetes::resources::HandlerHub;
use crate::shared::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named unit contributing metadata and mutating the collection in the
/// add-missing and adapt phases. All hooks default to doing nothing.
pub trait Enricher: Named {
    fn labels(&self, _kind: Kind) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn annotations(&self, _kind: Kind) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn selector(&self, _kind: Kind) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn add_missing_resources(&self, _mode: PlatformMode, _resources: &mut ResourceCollection) -> Result<()> {
        Ok(())
    }

    fn adapt(&self, _mode: PlatformMode, _resources: &mut ResourceCollection) -> Result<()> {
        Ok(())
    }

    fn config_keys(&self) -> &'static [ConfigKey] {
        &[]
    }
}

/// A configuration key with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    pub name: &'static str,
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ConfigKey {
    pub const fn new(name: &'static str, default: Option<&'static str>, description: &'static str) -> Self {
        Self {
            name,
            default,
            description,
        }
    }
}

/// Everything an enricher may look at. Built once per generation pass.
pub struct EnricherContext {
    pub project: ProjectConfig,
    pub images: Vec<ImageConfiguration>,
    pub resources: ResourceConfig,
    pub processor: ProcessorConfig,
    env_provider: Option<Box<dyn ExternalEnvProvider + Send + Sync>>,
}

impl EnricherContext {
    pub fn new(
        project: ProjectConfig,
        images: Vec<ImageConfiguration>,
        resources: ResourceConfig,
        processor: ProcessorConfig,
    ) -> Self {
        Self {
            project,
            images,
            resources,
            processor,
            env_provider: None,
        }
    }

    /// Context for a build document, with the env schema provider wired in
    /// when the resources declare one.
    pub fn from_build(build: &BuildConfig) -> Self {
        let mut context = Self::new(
            build.project.clone(),
            build.images.clone(),
            build.resources.clone(),
            build.enricher.clone(),
        );
        if let Some(schema) = &build.resources.env_schema {
            context = context.with_env_provider(JsonSchemaEnvProvider::new(Some(schema.clone())));
        }
        context
    }

    pub fn with_env_provider(mut self, provider: impl ExternalEnvProvider + Send + Sync + 'static) -> Self {
        self.env_provider = Some(Box::new(provider));
        self
    }

    pub fn env_provider(&self) -> Option<&dyn ExternalEnvProvider> {
        self.env_provider
            .as_deref()
            .map(|p| p as &dyn ExternalEnvProvider)
    }

    pub fn handler_hub(&self) -> HandlerHub<'_> {
        let hub = HandlerHub::new(&self.project);
        match self.env_provider() {
            Some(provider) => hub.with_env_provider(provider),
            None => hub,
        }
    }
}

/// Configuration lookup scoped to one enricher: processor settings first,
/// then the project property `forge.enricher.<name>.<key>`, then the default.
#[derive(Clone)]
pub struct EnricherConfig {
    name: String,
    context: Arc<EnricherContext>,
}

impl EnricherConfig {
    pub fn new(name: impl Into<String>, context: Arc<EnricherContext>) -> Self {
        Self {
            name: name.into(),
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &EnricherContext {
        &self.context
    }

    pub fn get(&self, key: &ConfigKey) -> Option<String> {
        self.get_with_default(key.name, key.default)
    }

    pub fn get_or(&self, key: &ConfigKey, default: &str) -> String {
        self.get_with_default(key.name, Some(default))
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, key: &ConfigKey) -> bool {
        self.get(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    fn get_with_default(&self, key: &str, default: Option<&str>) -> Option<String> {
        if let Some(value) = self.context.processor.get_config(&self.name, key) {
            return Some(value.to_string());
        }
        let property = format!("{}.{}.{}", ENRICHER_PROPERTY_PREFIX, self.name, key);
        if let Some(value) = self.context.project.property(&property) {
            return Some(value.to_string());
        }
        default.map(str::to_string)
    }
}
