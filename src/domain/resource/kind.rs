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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of resource kinds the pipeline routes labels, annotations and
/// selectors by. `PodSpec` addresses pod templates nested in controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Service,
    ReplicaSet,
    ReplicationController,
    Deployment,
    DeploymentConfig,
    StatefulSet,
    DaemonSet,
    Job,
    Secret,
    ConfigMap,
    PodSpec,
}

impl Kind {
    pub const ALL: [Kind; 11] = [
        Kind::Service,
        Kind::ReplicaSet,
        Kind::ReplicationController,
        Kind::Deployment,
        Kind::DeploymentConfig,
        Kind::StatefulSet,
        Kind::DaemonSet,
        Kind::Job,
        Kind::Secret,
        Kind::ConfigMap,
        Kind::PodSpec,
    ];

    /// Kinds whose pods are managed as a replicated deployment.
    pub fn is_deploy_or_replica(&self) -> bool {
        matches!(
            self,
            Kind::ReplicaSet | Kind::ReplicationController | Kind::Deployment | Kind::DeploymentConfig
        )
    }

    /// Kinds whose selector must stay stable across versions.
    pub fn has_no_version_in_selector(&self) -> bool {
        matches!(
            self,
            Kind::Service
                | Kind::Deployment
                | Kind::DeploymentConfig
                | Kind::DaemonSet
                | Kind::StatefulSet
                | Kind::ReplicaSet
        )
    }

    /// Kinds carrying a pod template.
    pub fn is_controller(&self) -> bool {
        matches!(
            self,
            Kind::ReplicaSet
                | Kind::ReplicationController
                | Kind::Deployment
                | Kind::DeploymentConfig
                | Kind::StatefulSet
                | Kind::DaemonSet
                | Kind::Job
        )
    }

    /// The manifest `kind` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Service => "Service",
            Kind::ReplicaSet => "ReplicaSet",
            Kind::ReplicationController => "ReplicationController",
            Kind::Deployment => "Deployment",
            Kind::DeploymentConfig => "DeploymentConfig",
            Kind::StatefulSet => "StatefulSet",
            Kind::DaemonSet => "DaemonSet",
            Kind::Job => "Job",
            Kind::Secret => "Secret",
            Kind::ConfigMap => "ConfigMap",
            Kind::PodSpec => "PodTemplate",
        }
    }

    pub fn from_kind_str(kind: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    pub fn api_version(&self) -> &'static str {
        use crate::infrastructure::constants::{
            API_VERSION_APPS, API_VERSION_BATCH, API_VERSION_CORE, API_VERSION_OPENSHIFT_APPS,
        };
        match self {
            Kind::Deployment | Kind::ReplicaSet | Kind::StatefulSet | Kind::DaemonSet => {
                API_VERSION_APPS
            }
            Kind::Job => API_VERSION_BATCH,
            Kind::DeploymentConfig => API_VERSION_OPENSHIFT_APPS,
            _ => API_VERSION_CORE,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
