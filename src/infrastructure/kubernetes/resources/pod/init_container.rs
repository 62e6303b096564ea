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

use crate::shared::error::{ForgeError, Result};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};

/// Init container bookkeeping on a pod template.
pub struct InitContainerHandler;

impl InitContainerHandler {
    pub fn has_init_container(template: &PodTemplateSpec, name: &str) -> bool {
        Self::find(template, name).is_some()
    }

    /// Appends `container`. Adding an identical container twice is a no-op,
    /// a different container under an existing name is an error.
    pub fn append_init_container(template: &mut PodTemplateSpec, container: Container) -> Result<()> {
        if let Some(existing) = Self::find(template, &container.name) {
            if existing == &container {
                tracing::warn!(
                    "Trying to add init-container {} a second time. Ignoring ....",
                    container.name
                );
                return Ok(());
            }
            let pod_name = template
                .metadata
                .as_ref()
                .and_then(|m| m.name.as_deref())
                .unwrap_or_default();
            return Err(ForgeError::invalid_resource(format!(
                "PodSpec {} already contains a different init container with name {} but can not add a second one with the same name. Please choose a different name for the init container",
                pod_name, container.name
            )));
        }

        template
            .spec
            .get_or_insert_with(Default::default)
            .init_containers
            .get_or_insert_with(Vec::new)
            .push(container);
        Ok(())
    }

    pub fn remove_init_container(template: &mut PodTemplateSpec, name: &str) -> bool {
        let Some(init_containers) = template
            .spec
            .as_mut()
            .and_then(|s| s.init_containers.as_mut())
        else {
            return false;
        };
        let before = init_containers.len();
        init_containers.retain(|c| c.name != name);
        let removed = init_containers.len() != before;
        if init_containers.is_empty() {
            if let Some(spec) = template.spec.as_mut() {
                spec.init_containers = None;
            }
        }
        removed
    }

    fn find<'a>(template: &'a PodTemplateSpec, name: &str) -> Option<&'a Container> {
        template
            .spec
            .as_ref()?
            .init_containers
            .as_ref()?
            .iter()
            .find(|c| c.name == name)
    }
}
