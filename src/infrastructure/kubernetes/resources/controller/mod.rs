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

//! Controller handlers: a validated name, replicas and a pod template
//! assembled into one workload resource.

pub mod daemonset;
pub mod deployment;
pub mod job;
pub mod replica;
pub mod statefulset;

pub use self::daemonset::DaemonSetHandler;
pub use self::deployment::{DeploymentConfigHandler, DeploymentHandler};
pub use self::job::JobHandler;
pub use self::replica::{ReplicaSetHandler, ReplicationControllerHandler};
pub use self::statefulset::StatefulSetHandler;

use crate::domain::config::image::ImageConfiguration;
use crate::domain::config::resource::ResourceConfig;
use crate::domain::resource::{Kind, Resource};
use crate::infrastructure::constants::DEFAULT_REPLICAS;
use crate::infrastructure::kubernetes::naming::validate_kubernetes_id;
use crate::infrastructure::kubernetes::resources::pod::PodTemplateHandler;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub trait ControllerHandler {
    fn kind(&self) -> Kind;

    fn assemble(&self, name: String, replicas: i32, template: PodTemplateSpec) -> Resource;

    /// Builds the controller from the resource policy. Fails fast on a
    /// missing or invalid controller name.
    fn get(
        &self,
        templates: &PodTemplateHandler<'_>,
        config: &ResourceConfig,
        images: &[ImageConfiguration],
    ) -> Result<Resource> {
        let name = validate_kubernetes_id(config.controller_name.as_deref(), "controller name")?;
        let replicas = config.replicas.unwrap_or(DEFAULT_REPLICAS);
        let template = templates.get_pod_template(config, images)?;
        tracing::debug!("Assembled {} {} with {} replica(s)", self.kind(), name, replicas);
        Ok(self.assemble(name, replicas, template))
    }
}

/// Handler for a controller kind, `None` for kinds without a pod template.
pub fn controller_handler(kind: Kind) -> Option<Box<dyn ControllerHandler>> {
    let handler: Box<dyn ControllerHandler> = match kind {
        Kind::ReplicaSet => Box::new(ReplicaSetHandler),
        Kind::ReplicationController => Box::new(ReplicationControllerHandler),
        Kind::Deployment => Box::new(DeploymentHandler),
        Kind::DeploymentConfig => Box::new(DeploymentConfigHandler),
        Kind::StatefulSet => Box::new(StatefulSetHandler),
        Kind::DaemonSet => Box::new(DaemonSetHandler),
        Kind::Job => Box::new(JobHandler),
        _ => return None,
    };
    Some(handler)
}

pub(crate) fn named_metadata(name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        ..Default::default()
    }
}
