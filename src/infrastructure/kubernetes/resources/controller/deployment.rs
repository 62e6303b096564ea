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

use super::{named_metadata, ControllerHandler};
use crate::domain::resource::{DeploymentConfig, DeploymentConfigSpec, Kind, Resource};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::PodTemplateSpec;

pub struct DeploymentHandler;

impl ControllerHandler for DeploymentHandler {
    fn kind(&self) -> Kind {
        Kind::Deployment
    }

    fn assemble(&self, name: String, replicas: i32, template: PodTemplateSpec) -> Resource {
        Resource::Deployment(Deployment {
            metadata: named_metadata(&name),
            spec: Some(DeploymentSpec {
                replicas: Some(replicas),
                template,
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

pub struct DeploymentConfigHandler;

impl ControllerHandler for DeploymentConfigHandler {
    fn kind(&self) -> Kind {
        Kind::DeploymentConfig
    }

    fn assemble(&self, name: String, replicas: i32, template: PodTemplateSpec) -> Resource {
        Resource::DeploymentConfig(DeploymentConfig {
            metadata: named_metadata(&name),
            spec: Some(DeploymentConfigSpec {
                replicas: Some(replicas),
                selector: None,
                template: Some(template),
                triggers: None,
            }),
            ..Default::default()
        })
    }
}
