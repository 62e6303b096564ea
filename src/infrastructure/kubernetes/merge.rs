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

//! Reconciles a generated resource with a user authored override.
//!
//! Map entries from the override replace or add, an empty value removes the
//! key. Containers are matched by name, env vars by name. The original is
//! never touched, the merged resource is a new value.

use crate::domain::resource::Resource;
use crate::shared::error::{ForgeError, Result};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, PodSpec, PodTemplateSpec, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

pub fn merge_resources(original: &Resource, overrides: &Resource) -> Result<Resource> {
    if original.kind() != overrides.kind() {
        return Err(ForgeError::Merge(format!(
            "Can not merge {} {} with a {}",
            original.kind(),
            original.name().unwrap_or_default(),
            overrides.kind()
        )));
    }

    let mut merged = original.clone();
    merge_metadata(merged.metadata_mut(), overrides.metadata());

    match (&mut merged, overrides) {
        (Resource::ConfigMap(target), Resource::ConfigMap(over)) => {
            target.data = merge_string_maps(target.data.as_ref(), over.data.as_ref());
        }
        (Resource::Secret(target), Resource::Secret(over)) => {
            target.data = merge_maps_removing_empty(target.data.as_ref(), over.data.as_ref(), |v: &ByteString| {
                v.0.is_empty()
            });
            target.string_data =
                merge_string_maps(target.string_data.as_ref(), over.string_data.as_ref());
            if over.type_.is_some() {
                target.type_ = over.type_.clone();
            }
        }
        (Resource::Service(target), Resource::Service(over)) => {
            if let Some(over_spec) = &over.spec {
                merge_service_spec(target.spec.get_or_insert_with(Default::default), over_spec);
            }
        }
        (Resource::Deployment(target), Resource::Deployment(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                override_option(&mut spec.replicas, &over_spec.replicas);
                merge_selector(&mut spec.selector, &over_spec.selector);
                merge_template(&mut spec.template, &over_spec.template);
            }
        }
        (Resource::StatefulSet(target), Resource::StatefulSet(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                override_option(&mut spec.replicas, &over_spec.replicas);
                if !over_spec.service_name.is_empty() {
                    spec.service_name = over_spec.service_name.clone();
                }
                merge_selector(&mut spec.selector, &over_spec.selector);
                merge_template(&mut spec.template, &over_spec.template);
            }
        }
        (Resource::DaemonSet(target), Resource::DaemonSet(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                merge_selector(&mut spec.selector, &over_spec.selector);
                merge_template(&mut spec.template, &over_spec.template);
            }
        }
        (Resource::Job(target), Resource::Job(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                override_option(&mut spec.backoff_limit, &over_spec.backoff_limit);
                override_option(&mut spec.completions, &over_spec.completions);
                override_option(&mut spec.parallelism, &over_spec.parallelism);
                merge_template(&mut spec.template, &over_spec.template);
            }
        }
        (Resource::ReplicaSet(target), Resource::ReplicaSet(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                override_option(&mut spec.replicas, &over_spec.replicas);
                merge_selector(&mut spec.selector, &over_spec.selector);
                merge_optional_template(&mut spec.template, &over_spec.template);
            }
        }
        (Resource::ReplicationController(target), Resource::ReplicationController(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                override_option(&mut spec.replicas, &over_spec.replicas);
                spec.selector = merge_string_maps(spec.selector.as_ref(), over_spec.selector.as_ref());
                merge_optional_template(&mut spec.template, &over_spec.template);
            }
        }
        (Resource::DeploymentConfig(target), Resource::DeploymentConfig(over)) => {
            if let Some(over_spec) = &over.spec {
                let spec = target.spec.get_or_insert_with(Default::default);
                override_option(&mut spec.replicas, &over_spec.replicas);
                spec.selector = merge_string_maps(spec.selector.as_ref(), over_spec.selector.as_ref());
                merge_optional_template(&mut spec.template, &over_spec.template);
                override_option(&mut spec.triggers, &over_spec.triggers);
            }
        }
        (Resource::PodTemplate(target), Resource::PodTemplate(over)) => {
            merge_optional_template(&mut target.template, &over.template);
        }
        _ => {}
    }

    Ok(merged)
}

/// Overlays `overrides` on `original`. Keys whose override value is empty
/// are removed. Without overrides the original is returned as is.
pub fn merge_maps_removing_empty<V, F>(
    original: Option<&BTreeMap<String, V>>,
    overrides: Option<&BTreeMap<String, V>>,
    is_empty: F,
) -> Option<BTreeMap<String, V>>
where
    V: Clone,
    F: Fn(&V) -> bool,
{
    let Some(overrides) = overrides else {
        return original.cloned();
    };

    let mut ret = original.cloned().unwrap_or_default();
    for (key, value) in overrides {
        if is_empty(value) {
            ret.remove(key);
        } else {
            ret.insert(key.clone(), value.clone());
        }
    }
    (!ret.is_empty() || original.is_some()).then_some(ret)
}

pub fn merge_string_maps(
    original: Option<&BTreeMap<String, String>>,
    overrides: Option<&BTreeMap<String, String>>,
) -> Option<BTreeMap<String, String>> {
    merge_maps_removing_empty(original, overrides, |v: &String| v.is_empty())
}

fn override_option<T: Clone>(target: &mut Option<T>, over: &Option<T>) {
    if over.is_some() {
        target.clone_from(over);
    }
}

fn merge_metadata(target: &mut ObjectMeta, over: &ObjectMeta) {
    target.labels = merge_string_maps(target.labels.as_ref(), over.labels.as_ref());
    target.annotations = merge_string_maps(target.annotations.as_ref(), over.annotations.as_ref());
    override_option(&mut target.namespace, &over.namespace);
}

fn merge_selector(target: &mut LabelSelector, over: &LabelSelector) {
    target.match_labels = merge_string_maps(target.match_labels.as_ref(), over.match_labels.as_ref());
    override_option(&mut target.match_expressions, &over.match_expressions);
}

fn merge_optional_template(target: &mut Option<PodTemplateSpec>, over: &Option<PodTemplateSpec>) {
    if let Some(over) = over {
        merge_template(target.get_or_insert_with(Default::default), over);
    }
}

fn merge_template(target: &mut PodTemplateSpec, over: &PodTemplateSpec) {
    if let Some(over_meta) = &over.metadata {
        merge_metadata(target.metadata.get_or_insert_with(Default::default), over_meta);
    }
    if let Some(over_spec) = &over.spec {
        merge_pod_spec(target.spec.get_or_insert_with(Default::default), over_spec);
    }
}

fn merge_pod_spec(target: &mut PodSpec, over: &PodSpec) {
    for (idx, over_container) in over.containers.iter().enumerate() {
        let position = if over_container.name.is_empty() {
            (idx < target.containers.len()).then_some(idx)
        } else {
            target
                .containers
                .iter()
                .position(|c| c.name == over_container.name)
        };
        match position {
            Some(position) => merge_container(&mut target.containers[position], over_container),
            None => target.containers.push(over_container.clone()),
        }
    }

    if let Some(over_volumes) = &over.volumes {
        let volumes = target.volumes.get_or_insert_with(Vec::new);
        for volume in over_volumes {
            match volumes.iter_mut().find(|v| v.name == volume.name) {
                Some(existing) => *existing = volume.clone(),
                None => volumes.push(volume.clone()),
            }
        }
    }

    override_option(&mut target.init_containers, &over.init_containers);
    override_option(&mut target.service_account_name, &over.service_account_name);
    override_option(&mut target.restart_policy, &over.restart_policy);
    override_option(&mut target.security_context, &over.security_context);
    target.node_selector = merge_string_maps(target.node_selector.as_ref(), over.node_selector.as_ref());
}

fn merge_container(target: &mut Container, over: &Container) {
    override_option(&mut target.image, &over.image);
    override_option(&mut target.image_pull_policy, &over.image_pull_policy);
    override_option(&mut target.command, &over.command);
    override_option(&mut target.args, &over.args);
    override_option(&mut target.working_dir, &over.working_dir);
    override_option(&mut target.resources, &over.resources);
    override_option(&mut target.liveness_probe, &over.liveness_probe);
    override_option(&mut target.readiness_probe, &over.readiness_probe);
    override_option(&mut target.security_context, &over.security_context);

    if let Some(over_env) = &over.env {
        let mut env = target.env.take().unwrap_or_default();
        for var in over_env {
            merge_env_var(&mut env, var);
        }
        target.env = Some(env);
    }

    if let Some(over_ports) = &over.ports {
        let ports = target.ports.get_or_insert_with(Vec::new);
        for port in over_ports {
            match ports.iter_mut().find(|p| p.container_port == port.container_port) {
                Some(existing) => *existing = port.clone(),
                None => ports.push(port.clone()),
            }
        }
    }

    if let Some(over_mounts) = &over.volume_mounts {
        let mounts = target.volume_mounts.get_or_insert_with(Vec::new);
        for mount in over_mounts {
            match mounts.iter_mut().find(|m| m.mount_path == mount.mount_path) {
                Some(existing) => *existing = mount.clone(),
                None => mounts.push(mount.clone()),
            }
        }
    }
}

fn merge_env_var(env: &mut Vec<EnvVar>, var: &EnvVar) {
    let empty = var.value_from.is_none() && var.value.as_deref().map_or(true, str::is_empty);
    if empty {
        env.retain(|e| e.name != var.name);
        return;
    }
    match env.iter_mut().find(|e| e.name == var.name) {
        Some(existing) => *existing = var.clone(),
        None => env.push(var.clone()),
    }
}

fn merge_service_spec(target: &mut ServiceSpec, over: &ServiceSpec) {
    override_option(&mut target.type_, &over.type_);
    override_option(&mut target.cluster_ip, &over.cluster_ip);
    override_option(&mut target.session_affinity, &over.session_affinity);
    target.selector = merge_string_maps(target.selector.as_ref(), over.selector.as_ref());

    if let Some(over_ports) = &over.ports {
        let ports = target.ports.get_or_insert_with(Vec::new);
        for port in over_ports {
            let existing = ports.iter_mut().find(|p| match (&p.name, &port.name) {
                (Some(a), Some(b)) => a == b,
                _ => p.port == port.port,
            });
            match existing {
                Some(existing) => *existing = port.clone(),
                None => ports.push(port.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ConfigMap, Service};

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_maps_removing_empty() {
        let original = map(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let overrides = map(&[("a", "x"), ("b", ""), ("d", "4")]);
        let merged = merge_string_maps(Some(&original), Some(&overrides)).unwrap();
        assert_eq!(merged, map(&[("a", "x"), ("c", "3"), ("d", "4")]));

        assert_eq!(merge_string_maps(Some(&original), None), Some(original.clone()));
        assert_eq!(merge_string_maps(None, None), None);
    }

    #[test]
    fn test_config_map_data() {
        let original = Resource::ConfigMap(ConfigMap {
            metadata: ObjectMeta {
                name: Some("cfg".to_string()),
                ..Default::default()
            },
            data: Some(map(&[("keep", "1"), ("drop", "2")])),
            ..Default::default()
        });
        let overrides = Resource::ConfigMap(ConfigMap {
            data: Some(map(&[("drop", ""), ("new", "3")])),
            ..Default::default()
        });

        let Resource::ConfigMap(merged) = merge_resources(&original, &overrides).unwrap() else {
            panic!("expected a ConfigMap");
        };
        assert_eq!(merged.data.unwrap(), map(&[("keep", "1"), ("new", "3")]));
        assert_eq!(merged.metadata.name.as_deref(), Some("cfg"));
    }

    #[test]
    fn test_kind_mismatch() {
        let original = Resource::ConfigMap(ConfigMap::default());
        let overrides = Resource::Service(Service::default());
        assert!(matches!(
            merge_resources(&original, &overrides),
            Err(ForgeError::Merge(_))
        ));
    }

    #[test]
    fn test_env_by_name() {
        let var = |name: &str, value: &str| EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        };
        let mut env = vec![var("A", "1"), var("B", "2")];
        merge_env_var(&mut env, &var("B", ""));
        merge_env_var(&mut env, &var("A", "x"));
        merge_env_var(&mut env, &var("C", "3"));
        assert_eq!(env, vec![var("A", "x"), var("C", "3")]);
    }
}
