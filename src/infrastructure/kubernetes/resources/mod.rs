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

//! Handlers turning build configuration into resources

pub mod controller;
pub mod pod;
pub mod service;

pub use self::controller::{controller_handler, ControllerHandler};
pub use self::pod::{
    merge_pod_spec_defaults, ContainerHandler, InitContainerHandler, PodTemplateHandler,
};
pub use self::service::ServiceHandler;

use crate::domain::config::project::ProjectConfig;
use crate::infrastructure::kubernetes::resources::pod::builders::ExternalEnvProvider;

/// Shared entry point for handlers built around one project.
#[derive(Clone, Copy)]
pub struct HandlerHub<'a> {
    project: &'a ProjectConfig,
    env_provider: Option<&'a dyn ExternalEnvProvider>,
}

impl<'a> HandlerHub<'a> {
    pub fn new(project: &'a ProjectConfig) -> Self {
        Self {
            project,
            env_provider: None,
        }
    }

    pub fn with_env_provider(mut self, provider: &'a dyn ExternalEnvProvider) -> Self {
        self.env_provider = Some(provider);
        self
    }

    pub fn container_handler(&self) -> ContainerHandler<'a> {
        let handler = ContainerHandler::new(self.project);
        match self.env_provider {
            Some(provider) => handler.with_env_provider(provider),
            None => handler,
        }
    }

    pub fn pod_template_handler(&self) -> PodTemplateHandler<'a> {
        PodTemplateHandler::new(self.container_handler())
    }
}
