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

//! Resource policy: what the handlers need to know to assemble workloads.

use crate::domain::resource::Kind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceConfig {
    pub env: BTreeMap<String, String>,
    /// Optional JSON schema file contributing environment defaults
    pub env_schema: Option<PathBuf>,
    pub labels: MetaDataConfig,
    pub annotations: MetaDataConfig,
    pub volumes: Vec<VolumeConfig>,
    pub controller_name: Option<String>,
    pub image_pull_policy: Option<String>,
    pub replicas: Option<i32>,
    pub service_account: Option<String>,
    pub liveness: Option<ProbeConfig>,
    pub readiness: Option<ProbeConfig>,
    pub container_privileged: bool,
    pub services: Vec<ServiceConfig>,
}

impl ResourceConfig {
    pub fn builder() -> ResourceConfigBuilder {
        ResourceConfigBuilder::default()
    }

    /// Configured pull policy, if one is set and non-blank.
    pub fn pull_policy(&self) -> Option<&str> {
        self.image_pull_policy
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Default)]
pub struct ResourceConfigBuilder {
    config: ResourceConfig,
}

impl ResourceConfigBuilder {
    pub fn controller_name(mut self, name: impl Into<String>) -> Self {
        self.config.controller_name = Some(name.into());
        self
    }

    pub fn image_pull_policy(mut self, policy: impl Into<String>) -> Self {
        self.config.image_pull_policy = Some(policy.into());
        self
    }

    pub fn replicas(mut self, replicas: i32) -> Self {
        self.config.replicas = Some(replicas);
        self
    }

    pub fn service_account(mut self, account: impl Into<String>) -> Self {
        self.config.service_account = Some(account.into());
        self
    }

    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.config.env = env;
        self
    }

    pub fn volumes(mut self, volumes: Vec<VolumeConfig>) -> Self {
        self.config.volumes = volumes;
        self
    }

    pub fn liveness(mut self, probe: ProbeConfig) -> Self {
        self.config.liveness = Some(probe);
        self
    }

    pub fn readiness(mut self, probe: ProbeConfig) -> Self {
        self.config.readiness = Some(probe);
        self
    }

    pub fn container_privileged(mut self, privileged: bool) -> Self {
        self.config.container_privileged = privileged;
        self
    }

    pub fn build(self) -> ResourceConfig {
        self.config
    }
}

/// Labels or annotations declared per resource kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetaDataConfig {
    pub all: BTreeMap<String, String>,
    pub pod: BTreeMap<String, String>,
    pub replica_set: BTreeMap<String, String>,
    pub service: BTreeMap<String, String>,
    pub deployment: BTreeMap<String, String>,
}

impl MetaDataConfig {
    /// Entries applying to `kind`. Entries in `all` take precedence.
    pub fn for_kind(&self, kind: Kind) -> BTreeMap<String, String> {
        let mut ret = match kind {
            Kind::Service => self.service.clone(),
            Kind::Deployment | Kind::DeploymentConfig => self.deployment.clone(),
            Kind::ReplicationController | Kind::ReplicaSet => self.replica_set.clone(),
            Kind::PodSpec => self.pod.clone(),
            _ => BTreeMap::new(),
        };
        ret.extend(self.all.clone());
        ret
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeConfig {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub volume_type: Option<String>,
    pub mounts: Vec<String>,
    pub path: Option<String>,
    pub medium: Option<String>,
    pub repository: Option<String>,
    pub revision: Option<String>,
    pub secret_name: Option<String>,
    pub server: Option<String>,
    pub read_only: Option<bool>,
    pub pd_name: Option<String>,
    pub fs_type: Option<String>,
    pub partition: Option<i32>,
    pub endpoints: Option<String>,
    pub claim_ref: Option<String>,
}

impl VolumeConfig {
    pub fn new(name: impl Into<String>, volume_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            volume_type: Some(volume_type.into()),
            ..Default::default()
        }
    }

    pub fn with_mounts<I, S>(mut self, mounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mounts = mounts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Volume name, `None` when blank.
    pub fn volume_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub get_url: Option<String>,
    pub tcp_port: Option<String>,
    pub exec: Option<String>,
    pub initial_delay_seconds: Option<i32>,
    pub timeout_seconds: Option<i32>,
    pub period_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: Option<String>,
    pub ports: Vec<ServicePortConfig>,
    pub headless: bool,
    pub expose: bool,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServicePortConfig {
    pub name: Option<String>,
    pub protocol: Option<String>,
    pub port: i32,
    pub target_port: Option<i32>,
    pub node_port: Option<i32>,
}
