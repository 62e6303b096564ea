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

//! Sum type over the manifest kinds the pipeline produces

use super::kind::Kind;
use crate::infrastructure::constants::API_VERSION_OPENSHIFT_APPS;
use crate::shared::error::{ForgeError, Result};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{
    ConfigMap, ObjectReference, PodSpec, PodTemplate, PodTemplateSpec, ReplicationController,
    Secret, Service,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OpenShift `DeploymentConfig`. Only the fields the pipeline touches are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    #[serde(default = "default_dc_api_version")]
    pub api_version: String,
    #[serde(default = "default_dc_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<DeploymentConfigSpec>,
}

fn default_dc_api_version() -> String {
    API_VERSION_OPENSHIFT_APPS.to_string()
}

fn default_dc_kind() -> String {
    Kind::DeploymentConfig.as_str().to_string()
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            api_version: default_dc_api_version(),
            kind: default_dc_kind(),
            metadata: ObjectMeta::default(),
            spec: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<DeploymentTriggerPolicy>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerPolicy {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_change_params: Option<DeploymentTriggerImageChangeParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerImageChangeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic: Option<bool>,
    #[serde(default)]
    pub container_names: Vec<String>,
    #[serde(default)]
    pub from: ObjectReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Service(Service),
    ReplicaSet(ReplicaSet),
    ReplicationController(ReplicationController),
    Deployment(Deployment),
    DeploymentConfig(DeploymentConfig),
    StatefulSet(StatefulSet),
    DaemonSet(DaemonSet),
    Job(Job),
    Secret(Secret),
    ConfigMap(ConfigMap),
    PodTemplate(PodTemplate),
}

macro_rules! each_resource {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Resource::Service($inner) => $body,
            Resource::ReplicaSet($inner) => $body,
            Resource::ReplicationController($inner) => $body,
            Resource::Deployment($inner) => $body,
            Resource::DeploymentConfig($inner) => $body,
            Resource::StatefulSet($inner) => $body,
            Resource::DaemonSet($inner) => $body,
            Resource::Job($inner) => $body,
            Resource::Secret($inner) => $body,
            Resource::ConfigMap($inner) => $body,
            Resource::PodTemplate($inner) => $body,
        }
    };
}

impl Resource {
    pub fn kind(&self) -> Kind {
        match self {
            Resource::Service(_) => Kind::Service,
            Resource::ReplicaSet(_) => Kind::ReplicaSet,
            Resource::ReplicationController(_) => Kind::ReplicationController,
            Resource::Deployment(_) => Kind::Deployment,
            Resource::DeploymentConfig(_) => Kind::DeploymentConfig,
            Resource::StatefulSet(_) => Kind::StatefulSet,
            Resource::DaemonSet(_) => Kind::DaemonSet,
            Resource::Job(_) => Kind::Job,
            Resource::Secret(_) => Kind::Secret,
            Resource::ConfigMap(_) => Kind::ConfigMap,
            Resource::PodTemplate(_) => Kind::PodSpec,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        each_resource!(self, r => &r.metadata)
    }

    pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
        each_resource!(self, r => &mut r.metadata)
    }

    /// `metadata.name`, `None` when unset or blank.
    pub fn name(&self) -> Option<&str> {
        self.metadata()
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
    }

    pub fn pod_template(&self) -> Option<&PodTemplateSpec> {
        match self {
            Resource::ReplicaSet(r) => r.spec.as_ref()?.template.as_ref(),
            Resource::ReplicationController(r) => r.spec.as_ref()?.template.as_ref(),
            Resource::Deployment(r) => r.spec.as_ref().map(|s| &s.template),
            Resource::DeploymentConfig(r) => r.spec.as_ref()?.template.as_ref(),
            Resource::StatefulSet(r) => r.spec.as_ref().map(|s| &s.template),
            Resource::DaemonSet(r) => r.spec.as_ref().map(|s| &s.template),
            Resource::Job(r) => r.spec.as_ref().map(|s| &s.template),
            Resource::PodTemplate(r) => r.template.as_ref(),
            Resource::Service(_) | Resource::Secret(_) | Resource::ConfigMap(_) => None,
        }
    }

    pub fn pod_template_mut(&mut self) -> Option<&mut PodTemplateSpec> {
        match self {
            Resource::ReplicaSet(r) => r.spec.as_mut()?.template.as_mut(),
            Resource::ReplicationController(r) => r.spec.as_mut()?.template.as_mut(),
            Resource::Deployment(r) => r.spec.as_mut().map(|s| &mut s.template),
            Resource::DeploymentConfig(r) => r.spec.as_mut()?.template.as_mut(),
            Resource::StatefulSet(r) => r.spec.as_mut().map(|s| &mut s.template),
            Resource::DaemonSet(r) => r.spec.as_mut().map(|s| &mut s.template),
            Resource::Job(r) => r.spec.as_mut().map(|s| &mut s.template),
            Resource::PodTemplate(r) => r.template.as_mut(),
            Resource::Service(_) | Resource::Secret(_) | Resource::ConfigMap(_) => None,
        }
    }

    /// Pod template of a controller, creating the spec, template and pod
    /// spec on the way when they are missing.
    pub fn ensure_pod_template(&mut self) -> Option<&mut PodTemplateSpec> {
        let template = match self {
            Resource::ReplicaSet(r) => r
                .spec
                .get_or_insert_with(Default::default)
                .template
                .get_or_insert_with(Default::default),
            Resource::ReplicationController(r) => r
                .spec
                .get_or_insert_with(Default::default)
                .template
                .get_or_insert_with(Default::default),
            Resource::Deployment(r) => &mut r.spec.get_or_insert_with(Default::default).template,
            Resource::DeploymentConfig(r) => r
                .spec
                .get_or_insert_with(Default::default)
                .template
                .get_or_insert_with(Default::default),
            Resource::StatefulSet(r) => &mut r.spec.get_or_insert_with(Default::default).template,
            Resource::DaemonSet(r) => &mut r.spec.get_or_insert_with(Default::default).template,
            Resource::Job(r) => &mut r.spec.get_or_insert_with(Default::default).template,
            Resource::PodTemplate(r) => r.template.get_or_insert_with(Default::default),
            Resource::Service(_) | Resource::Secret(_) | Resource::ConfigMap(_) => return None,
        };
        template.spec.get_or_insert_with(PodSpec::default);
        Some(template)
    }

    pub fn pod_spec(&self) -> Option<&PodSpec> {
        self.pod_template()?.spec.as_ref()
    }

    pub fn pod_spec_mut(&mut self) -> Option<&mut PodSpec> {
        self.pod_template_mut()?.spec.as_mut()
    }

    pub fn replicas(&self) -> Option<i32> {
        match self {
            Resource::ReplicaSet(r) => r.spec.as_ref()?.replicas,
            Resource::ReplicationController(r) => r.spec.as_ref()?.replicas,
            Resource::Deployment(r) => r.spec.as_ref()?.replicas,
            Resource::DeploymentConfig(r) => r.spec.as_ref()?.replicas,
            Resource::StatefulSet(r) => r.spec.as_ref()?.replicas,
            _ => None,
        }
    }

    /// Decodes a manifest, dispatching on its `kind` field.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let kind_str = value
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or_else(|| ForgeError::invalid_resource("Resource has no 'kind'"))?
            .to_string();
        let kind = Kind::from_kind_str(&kind_str).ok_or_else(|| {
            ForgeError::invalid_resource(format!("Unsupported resource kind '{}'", kind_str))
        })?;

        let resource = match kind {
            Kind::Service => Resource::Service(serde_json::from_value(value)?),
            Kind::ReplicaSet => Resource::ReplicaSet(serde_json::from_value(value)?),
            Kind::ReplicationController => {
                Resource::ReplicationController(serde_json::from_value(value)?)
            }
            Kind::Deployment => Resource::Deployment(serde_json::from_value(value)?),
            Kind::DeploymentConfig => Resource::DeploymentConfig(serde_json::from_value(value)?),
            Kind::StatefulSet => Resource::StatefulSet(serde_json::from_value(value)?),
            Kind::DaemonSet => Resource::DaemonSet(serde_json::from_value(value)?),
            Kind::Job => Resource::Job(serde_json::from_value(value)?),
            Kind::Secret => Resource::Secret(serde_json::from_value(value)?),
            Kind::ConfigMap => Resource::ConfigMap(serde_json::from_value(value)?),
            Kind::PodSpec => Resource::PodTemplate(serde_json::from_value(value)?),
        };
        Ok(resource)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
