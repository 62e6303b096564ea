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

//! Top level build configuration document

use crate::domain::config::image::ImageConfiguration;
use crate::domain::config::processor::ProcessorConfig;
use crate::domain::config::project::ProjectConfig;
use crate::domain::config::resource::ResourceConfig;
use crate::shared::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    #[default]
    Kubernetes,
    Openshift,
}

impl PlatformMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformMode::Kubernetes => "kubernetes",
            PlatformMode::Openshift => "openshift",
        }
    }
}

impl fmt::Display for PlatformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformMode {
    type Err = ForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kubernetes" => Ok(PlatformMode::Kubernetes),
            "openshift" => Ok(PlatformMode::Openshift),
            _ => Err(ForgeError::ConfigError(format!(
                "Invalid platform mode: {}. Must be one of: kubernetes, openshift",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildConfig {
    pub project: ProjectConfig,
    pub images: Vec<ImageConfiguration>,
    pub resources: ResourceConfig,
    pub enricher: ProcessorConfig,
    pub platform_mode: PlatformMode,
}

impl BuildConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Loads a TOML or YAML document, chosen by file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::ConfigError(format!(
                "Failed to read build configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let config = match ext.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            _ => {
                return Err(ForgeError::ConfigError(format!(
                    "Unsupported configuration format for {}: expected .toml, .yaml or .yml",
                    path.display()
                )))
            }
        };

        tracing::debug!(
            "Loaded build configuration for {}:{} with {} image(s)",
            config.project.group_id,
            config.project.artifact_id,
            config.images.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_mode_from_str() {
        assert_eq!("OpenShift".parse::<PlatformMode>().unwrap(), PlatformMode::Openshift);
        assert!("swarm".parse::<PlatformMode>().is_err());
    }

    #[test]
    fn test_build_config_from_toml() {
        let config = BuildConfig::from_toml_str(
            r#"
            platform_mode = "openshift"

            [project]
            group_id = "io.forge"
            artifact_id = "demo"
            version = "1.0.0"

            [[images]]
            name = "forge/demo:1.0.0"
            [images.build]
            ports = ["8080"]

            [resources]
            controller_name = "demo"
            replicas = 2

            [enricher]
            excludes = ["forge-service"]
            [enricher.config.forge-name]
            name = "custom"
            "#,
        )
        .unwrap();

        assert_eq!(config.platform_mode, PlatformMode::Openshift);
        assert_eq!(config.images[0].ports(), ["8080".to_string()]);
        assert_eq!(config.resources.replicas, Some(2));
        assert_eq!(config.enricher.get_config("forge-name", "name"), Some("custom"));
    }

    #[test]
    fn test_build_config_missing_sections_default() {
        let config = BuildConfig::from_yaml_str("project:\n  artifact_id: demo\n").unwrap();
        assert!(config.images.is_empty());
        assert_eq!(config.platform_mode, PlatformMode::Kubernetes);
        assert!(config.enricher.includes.is_none());
    }
}
