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

//! Resource fragments: partial manifests authored next to the build.
//!
//! File names follow `<name>-<type>.(yaml|yml|json)`, where the type is a
//! short kind alias such as `svc` or `deployment`.

use crate::domain::resource::{Kind, Resource};
use crate::shared::error::{ForgeError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const FILE_TYPES: &[(&str, Kind)] = &[
    ("svc", Kind::Service),
    ("rc", Kind::ReplicationController),
    ("rs", Kind::ReplicaSet),
    ("deployment", Kind::Deployment),
    ("dc", Kind::DeploymentConfig),
    ("statefulset", Kind::StatefulSet),
    ("ds", Kind::DaemonSet),
    ("daemonset", Kind::DaemonSet),
    ("job", Kind::Job),
    ("secret", Kind::Secret),
    ("cm", Kind::ConfigMap),
    ("configmap", Kind::ConfigMap),
];

fn kind_for_type(file_type: &str) -> Option<Kind> {
    let file_type = file_type.to_lowercase();
    FILE_TYPES
        .iter()
        .find(|(alias, _)| *alias == file_type)
        .map(|(_, kind)| *kind)
}

fn known_types() -> String {
    FILE_TYPES
        .iter()
        .map(|(alias, _)| *alias)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fragments in `dir`, in file name order. A missing directory yields none.
pub fn read_fragments(dir: &Path, default_name: &str) -> Result<Vec<Resource>> {
    if !dir.is_dir() {
        tracing::debug!("No fragment directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_fragment_file(path))
        .collect();
    files.sort();

    files
        .iter()
        .map(|path| read_fragment(path, default_name))
        .collect()
}

fn is_fragment_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "yaml" | "yml" | "json"))
        .unwrap_or(false)
}

pub fn read_fragment(path: &Path, default_name: &str) -> Result<Resource> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ForgeError::config_error(format!(
            "Failed to read resource fragment {}: {}",
            path.display(),
            e
        ))
    })?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let is_json = file_name.to_lowercase().ends_with(".json");
    let value: Value = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    let resource = fragment_to_resource(file_name, value, default_name)?;
    tracing::debug!(
        "Read {} {} from {}",
        resource.kind(),
        resource.name().unwrap_or_default(),
        path.display()
    );
    Ok(resource)
}

/// Completes a fragment with kind, apiVersion and name taken from the file
/// name or defaults.
pub fn fragment_to_resource(file_name: &str, value: Value, default_name: &str) -> Result<Resource> {
    let re = Regex::new(r"(?i)^(?P<name>.*?)(-(?P<type>[^-]+))?\.(yaml|yml|json)$")?;
    let caps = re.captures(file_name).ok_or_else(|| {
        ForgeError::config_error(format!(
            "Resource fragment {} must have a .yaml, .yml or .json extension",
            file_name
        ))
    })?;

    let mut name = caps
        .name("name")
        .map(|m| m.as_str().to_string())
        .filter(|n| !n.is_empty());
    let file_type = caps.name("type").map(|m| m.as_str());

    let mut map = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(ForgeError::invalid_resource(format!(
                "Resource fragment {} is not a mapping",
                file_name
            )))
        }
    };
    let declared_kind = map.get("kind").and_then(Value::as_str).map(str::to_string);

    let file_kind = match file_type {
        Some(file_type) => match kind_for_type(file_type) {
            Some(kind) => Some(kind),
            None if declared_kind.is_some() => {
                name = file_name
                    .rsplit_once('.')
                    .map(|(stem, _)| stem.to_string());
                None
            }
            None => {
                return Err(ForgeError::config_error(format!(
                    "Unknown type '{}' for file {}. Must be one of : {}",
                    file_type,
                    file_name,
                    known_types()
                )))
            }
        },
        None => match name.as_deref().and_then(kind_for_type) {
            Some(kind) => {
                name = None;
                Some(kind)
            }
            None => None,
        },
    };

    let kind = match (declared_kind, file_kind) {
        (Some(declared), _) => declared,
        (None, Some(kind)) => kind.as_str().to_string(),
        (None, None) => {
            return Err(ForgeError::config_error(format!(
                "No type given as part of the file name (e.g. 'app-rc.yml') and no 'Kind' defined in resource descriptor {}",
                file_name
            )))
        }
    };

    let api_version = Kind::from_kind_str(&kind).map(|k| k.api_version());
    if let Some(api_version) = api_version {
        map.entry("apiVersion")
            .or_insert_with(|| Value::String(api_version.to_string()));
    }
    map.insert("kind".to_string(), Value::String(kind));

    let metadata = map
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(metadata) = metadata {
        let has_name = metadata
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|n| !n.trim().is_empty());
        if !has_name {
            let name = name.unwrap_or_else(|| default_name.to_string());
            metadata.insert("name".to_string(), Value::String(name));
        }
    }

    Resource::from_value(Value::Object(map))
}
