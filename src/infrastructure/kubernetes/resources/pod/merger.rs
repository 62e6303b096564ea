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

//! Fills gaps in a user supplied pod spec from a generated default.
//! Values already present are never replaced.

use k8s_openapi::api::core::v1::{Container, PodSpec};
use std::collections::HashSet;

pub fn merge_pod_spec_defaults(default_spec: &PodSpec, target: &mut PodSpec, default_name: &str) {
    let defaults = &default_spec.containers;

    if defaults.is_empty() {
        if let Some(first) = target.containers.first_mut() {
            if first.name.trim().is_empty() {
                first.name = default_name.to_string();
            }
        }
    } else if target.containers.is_empty() {
        target.containers = defaults.clone();
    } else {
        for (idx, default_container) in defaults.iter().enumerate() {
            if idx >= target.containers.len() {
                target.containers.push(Container::default());
            }
            merge_container(default_container, &mut target.containers[idx]);
        }
    }

    if target.service_account_name.is_none() {
        target.service_account_name = default_spec.service_account_name.clone();
    }

    if let Some(default_volumes) = &default_spec.volumes {
        let volumes = target.volumes.get_or_insert_with(Vec::new);
        let existing: HashSet<String> = volumes.iter().map(|v| v.name.clone()).collect();
        volumes.extend(
            default_volumes
                .iter()
                .filter(|v| !existing.contains(&v.name))
                .cloned(),
        );
    }
}

fn merge_container(default: &Container, container: &mut Container) {
    if is_blank(&container.image_pull_policy) {
        container.image_pull_policy = default.image_pull_policy.clone();
    }
    if is_blank(&container.image) {
        container.image = default.image.clone();
    }
    if container.name.trim().is_empty() {
        container.name = default.name.clone();
    }

    if let Some(default_env) = &default.env {
        let env = container.env.get_or_insert_with(Vec::new);
        let existing: HashSet<String> = env.iter().map(|e| e.name.clone()).collect();
        env.extend(
            default_env
                .iter()
                .filter(|e| !existing.contains(&e.name))
                .cloned(),
        );
    }

    if let Some(default_ports) = &default.ports {
        let ports = container.ports.get_or_insert_with(Vec::new);
        for port in default_ports {
            let clash = ports.iter().any(|p| {
                p.container_port == port.container_port || (p.name.is_some() && p.name == port.name)
            });
            if !clash {
                ports.push(port.clone());
            }
        }
    }

    if let Some(default_mounts) = &default.volume_mounts {
        let mounts = container.volume_mounts.get_or_insert_with(Vec::new);
        let existing: HashSet<String> = mounts.iter().map(|m| m.mount_path.clone()).collect();
        mounts.extend(
            default_mounts
                .iter()
                .filter(|m| !existing.contains(&m.mount_path))
                .cloned(),
        );
    }

    if container.readiness_probe.is_none() {
        container.readiness_probe = default.readiness_probe.clone();
    }
    if container.liveness_probe.is_none() {
        container.liveness_probe = default.liveness_probe.clone();
    }
    if container.security_context.is_none() {
        container.security_context = default.security_context.clone();
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
