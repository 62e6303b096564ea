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

//! Enrichers shipped with the crate

pub mod controller;
pub mod docker_registry_secret;
pub mod healthcheck;
pub mod image;
pub mod image_change_trigger;
pub mod name;
pub mod pod_annotations;
pub mod project;
pub mod service;
pub mod volume_permission;

pub use self::controller::DefaultControllerEnricher;
pub use self::docker_registry_secret::DockerRegistrySecretEnricher;
pub use self::healthcheck::HealthCheckEnricher;
pub use self::image::ImageEnricher;
pub use self::image_change_trigger::ImageChangeTriggerEnricher;
pub use self::name::NameEnricher;
pub use self::pod_annotations::PodAnnotationEnricher;
pub use self::project::ProjectLabelEnricher;
pub use self::service::DefaultServiceEnricher;
pub use self::volume_permission::VolumePermissionEnricher;

use crate::domain::enricher::registry::EnricherFactory;

pub const NAME_ENRICHER: &str = "forge-name";
pub const CONTROLLER_ENRICHER: &str = "forge-controller";
pub const SERVICE_ENRICHER: &str = "forge-service";
pub const IMAGE_ENRICHER: &str = "forge-image";
pub const HEALTHCHECK_ENRICHER: &str = "forge-healthcheck";
pub const PROJECT_ENRICHER: &str = "forge-project";
pub const POD_ANNOTATIONS_ENRICHER: &str = "forge-pod-annotations";
pub const VOLUME_PERMISSION_ENRICHER: &str = "forge-volume-permission";
pub const IMAGE_CHANGE_TRIGGER_ENRICHER: &str = "forge-image-change-trigger";
pub const DOCKER_REGISTRY_SECRET_ENRICHER: &str = "forge-docker-registry-secret";

/// Constructors for the standard enrichers, keyed by descriptor name.
pub fn factories() -> Vec<(&'static str, EnricherFactory)> {
    vec![
        (NAME_ENRICHER, name::create as EnricherFactory),
        (CONTROLLER_ENRICHER, controller::create as EnricherFactory),
        (SERVICE_ENRICHER, service::create as EnricherFactory),
        (IMAGE_ENRICHER, image::create as EnricherFactory),
        (HEALTHCHECK_ENRICHER, healthcheck::create as EnricherFactory),
        (PROJECT_ENRICHER, project::create as EnricherFactory),
        (POD_ANNOTATIONS_ENRICHER, pod_annotations::create as EnricherFactory),
        (VOLUME_PERMISSION_ENRICHER, volume_permission::create as EnricherFactory),
        (IMAGE_CHANGE_TRIGGER_ENRICHER, image_change_trigger::create as EnricherFactory),
        (DOCKER_REGISTRY_SECRET_ENRICHER, docker_registry_secret::create as EnricherFactory),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::domain::config::image::ImageConfiguration;
    use crate::domain::config::processor::ProcessorConfig;
    use crate::domain::config::project::ProjectConfig;
    use crate::domain::config::resource::ResourceConfig;
    use crate::domain::enricher::api::{EnricherConfig, EnricherContext};
    use std::sync::Arc;

    pub fn project() -> ProjectConfig {
        ProjectConfig::new("io.forge", "demo").with_version("1.0.0")
    }

    pub fn enricher_config(
        name: &str,
        images: Vec<ImageConfiguration>,
        resources: ResourceConfig,
        processor: ProcessorConfig,
    ) -> EnricherConfig {
        let context = EnricherContext::new(project(), images, resources, processor);
        EnricherConfig::new(name, Arc::new(context))
    }
}
