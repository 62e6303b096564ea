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

//! Container image configuration

use crate::domain::config::project::ProjectConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfiguration {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub registry: Option<String>,
    pub build: Option<BuildImageConfiguration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildImageConfiguration {
    pub from: Option<String>,
    pub ports: Vec<String>,
    pub tags: Vec<String>,
}

impl ImageConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_build(mut self, build: BuildImageConfiguration) -> Self {
        self.build = Some(build);
        self
    }

    pub fn ports(&self) -> &[String] {
        self.build.as_ref().map(|b| b.ports.as_slice()).unwrap_or(&[])
    }

    /// Image reference emitted on containers: `registry/name`, or the bare
    /// name. Without a name there is nothing to reference.
    pub fn full_image_name(&self) -> Option<String> {
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        match self.registry.as_deref().map(str::trim) {
            Some(registry) if !registry.is_empty() => Some(format!("{}/{}", registry, name)),
            _ => Some(name.to_string()),
        }
    }

    /// Container name: the alias, else `<image user>-<artifactId>`.
    pub fn container_name(&self, project: &ProjectConfig) -> String {
        if let Some(alias) = self.alias.as_deref().filter(|a| !a.trim().is_empty()) {
            return alias.to_string();
        }

        let user = self
            .name
            .as_deref()
            .and_then(|n| ImageName::parse(n).user().map(str::to_string))
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| {
                project
                    .group_id
                    .rsplit('.')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        format!("{}-{}", user, project.artifact_id).to_lowercase()
    }
}

/// A parsed image reference `[registry/][user/]repository[:tag]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    registry: Option<String>,
    repository: String,
    tag: Option<String>,
}

impl ImageName {
    pub fn parse(full_name: &str) -> Self {
        let (rest, tag) = match full_name.rfind(':') {
            Some(idx) if !full_name[idx + 1..].contains('/') => (
                &full_name[..idx],
                Some(full_name[idx + 1..].to_string()),
            ),
            _ => (full_name, None),
        };

        let parts: Vec<&str> = rest.split('/').collect();
        let (registry, repository) = if parts.len() > 1 && is_registry(parts[0]) {
            (Some(parts[0].to_string()), parts[1..].join("/"))
        } else {
            (None, parts.join("/"))
        };

        Self {
            registry,
            repository,
            tag,
        }
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The user part, i.e. the repository segment in front of the simple name.
    pub fn user(&self) -> Option<&str> {
        let mut segments = self.repository.rsplitn(2, '/');
        segments.next();
        segments.next().map(|u| u.rsplit('/').next().unwrap_or(u))
    }

    /// Last repository segment, without user or registry.
    pub fn simple_name(&self) -> &str {
        self.repository.rsplit('/').next().unwrap_or(&self.repository)
    }

    pub fn full_name(&self) -> String {
        let mut ret = match &self.registry {
            Some(registry) => format!("{}/{}", registry, self.repository),
            None => self.repository.clone(),
        };
        if let Some(tag) = &self.tag {
            ret.push(':');
            ret.push_str(tag);
        }
        ret
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

fn is_registry(part: &str) -> bool {
    part.contains('.') || part.contains(':') || part == "localhost"
}
