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
use crate::domain::resource::{Kind, Resource};
use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec};
use k8s_openapi::api::core::v1::PodTemplateSpec;

/// One pod per node, so the replica count is not used.
pub struct DaemonSetHandler;

impl ControllerHandler for DaemonSetHandler {
    fn kind(&self) -> Kind {
        Kind::DaemonSet
    }

    fn assemble(&self, name: String, _replicas: i32, template: PodTemplateSpec) -> Resource {
        Resource::DaemonSet(DaemonSet {
            metadata: named_metadata(&name),
            spec: Some(DaemonSetSpec {
                template,
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}
