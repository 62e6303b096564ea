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

use crate::domain::config::build::{BuildConfig, PlatformMode};
use std::collections::HashMap;

/// Applies `-D key=value` overrides. Keys without a dedicated setting
/// become project properties.
pub fn apply_to_build_config(configs: &HashMap<String, String>, build: &mut BuildConfig) {
    for (key, value) in configs {
        match key.as_str() {
            "project.version" => {
                build.project.version = Some(value.clone());
            }
            "resources.controller-name" => {
                build.resources.controller_name = Some(value.clone());
            }
            "resources.image-pull-policy" => {
                build.resources.image_pull_policy = Some(value.clone());
            }
            "resources.replicas" => match value.parse::<i32>() {
                Ok(replicas) => build.resources.replicas = Some(replicas),
                Err(_) => tracing::warn!("Ignoring non-numeric replicas override: {}", value),
            },
            "resources.service-account" => {
                build.resources.service_account = Some(value.clone());
            }
            "platform.mode" => match value.parse::<PlatformMode>() {
                Ok(mode) => build.platform_mode = mode,
                Err(e) => tracing::warn!("{}", e),
            },
            _ => {
                build.project.properties.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Parses `key=value` pairs as given on the command line.
pub fn parse_dynamic_configs(pairs: &[String]) -> HashMap<String, String> {
    pairs
        .iter()
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut build = BuildConfig::default();
        let configs = parse_dynamic_configs(&[
            "resources.replicas=3".to_string(),
            "resources.controller-name=web".to_string(),
            "platform.mode=openshift".to_string(),
        ]);
        apply_to_build_config(&configs, &mut build);

        assert_eq!(build.resources.replicas, Some(3));
        assert_eq!(build.resources.controller_name.as_deref(), Some("web"));
        assert_eq!(build.platform_mode, PlatformMode::Openshift);
    }

    #[test]
    fn test_unknown_keys_become_properties() {
        let mut build = BuildConfig::default();
        let configs = parse_dynamic_configs(&["forge.enricher.forge-name.name=other".to_string()]);
        apply_to_build_config(&configs, &mut build);
        assert_eq!(
            build.project.property("forge.enricher.forge-name.name"),
            Some("other")
        );
    }

    #[test]
    fn test_parse_skips_malformed_pairs() {
        let configs = parse_dynamic_configs(&["novalue".to_string(), "=x".to_string()]);
        assert!(configs.is_empty());
    }
}
