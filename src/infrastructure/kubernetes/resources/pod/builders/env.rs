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

//! Environment variable builder
//!
//! Configured variables come first, then defaults contributed by an
//! external provider, then the injected `KUBERNETES_NAMESPACE`.

use crate::infrastructure::constants::{ENV_KUBERNETES_NAMESPACE, FIELD_PATH_NAMESPACE};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Source of additional environment defaults. Values it returns never
/// replace configured ones.
pub trait ExternalEnvProvider {
    fn env_vars(&self, configured: &BTreeMap<String, String>) -> Result<BTreeMap<String, String>>;
}

/// Reads defaults from a JSON schema document of the form
/// `{"properties": {"NAME": {"default": "value"}}}`.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaEnvProvider {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvSchema {
    #[serde(default)]
    properties: BTreeMap<String, EnvSchemaProperty>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvSchemaProperty {
    #[serde(default)]
    default: Option<serde_json::Value>,
}

impl JsonSchemaEnvProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ExternalEnvProvider for JsonSchemaEnvProvider {
    fn env_vars(&self, _configured: &BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
        let Some(path) = self.path.as_ref().filter(|p| p.exists()) else {
            return Ok(BTreeMap::new());
        };

        let content = std::fs::read_to_string(path)?;
        let schema: EnvSchema = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded {} environment default(s) from {}",
            schema.properties.len(),
            path.display()
        );

        Ok(schema
            .properties
            .into_iter()
            .filter_map(|(name, property)| {
                let value = match property.default? {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => return None,
                    other => other.to_string(),
                };
                Some((name, value))
            })
            .collect())
    }
}

pub struct EnvironmentBuilder<'a> {
    configured: BTreeMap<String, String>,
    provider: Option<&'a dyn ExternalEnvProvider>,
}

impl<'a> EnvironmentBuilder<'a> {
    pub fn new(configured: &BTreeMap<String, String>) -> Self {
        Self {
            configured: configured.clone(),
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: &'a dyn ExternalEnvProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(self) -> Result<Vec<EnvVar>> {
        let mut merged = self.configured.clone();
        if let Some(provider) = self.provider {
            for (name, value) in provider.env_vars(&self.configured)? {
                merged.entry(name).or_insert(value);
            }
        }

        let mut env_vars: Vec<EnvVar> = merged
            .into_iter()
            .filter_map(|(name, value)| {
                if name.trim().is_empty() {
                    tracing::warn!("Dropping environment variable with blank name (value: {})", value);
                    return None;
                }
                if name == ENV_KUBERNETES_NAMESPACE {
                    tracing::warn!(
                        "Environment variable {} is injected and can not be configured",
                        ENV_KUBERNETES_NAMESPACE
                    );
                    return None;
                }
                Some(EnvVar {
                    name,
                    value: Some(value),
                    ..Default::default()
                })
            })
            .collect();

        env_vars.push(namespace_env_var());
        Ok(env_vars)
    }
}

pub fn namespace_env_var() -> EnvVar {
    EnvVar {
        name: ENV_KUBERNETES_NAMESPACE.to_string(),
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: FIELD_PATH_NAMESPACE.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
