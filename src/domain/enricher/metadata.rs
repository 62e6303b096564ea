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

//! Metadata phase: labels, annotations and selectors contributed per kind.
//!
//! Configured entries are applied before enricher contributions. Nothing
//! already present on a resource is overwritten, and between enrichers the
//! one running first wins.

use crate::domain::config::processor::ProcessorConfig;
use crate::domain::config::resource::ResourceConfig;
use crate::domain::enricher::api::Enricher;
use crate::domain::resource::{Kind, Resource, ResourceCollection};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

type Contributions = BTreeMap<String, String>;

/// Applies metadata from the enrichers selected by `processor` to every
/// resource in the collection.
pub fn add_metadata(
    resources: &mut ResourceCollection,
    enrichers: &[Box<dyn Enricher>],
    config: &ResourceConfig,
    processor: &ProcessorConfig,
) -> Result<()> {
    let enrichers = processor.prepare(enrichers, "enricher")?;
    let visitor = MetadataVisitor {
        enrichers: &enrichers,
        config,
    };

    for resource in resources.iter_mut() {
        visitor.visit(resource);
    }
    Ok(())
}

struct MetadataVisitor<'a> {
    enrichers: &'a [&'a dyn Enricher],
    config: &'a ResourceConfig,
}

impl MetadataVisitor<'_> {
    fn visit(&self, resource: &mut Resource) {
        let kind = resource.kind();
        self.apply_to_meta(resource.metadata_mut(), kind);

        if let Some(template) = resource.pod_template_mut() {
            self.apply_to_template(template);
        }

        let selector = self.collect(|e| e.selector(kind));
        if !selector.is_empty() {
            apply_selector(resource, &selector);
        }
    }

    fn apply_to_template(&self, template: &mut PodTemplateSpec) {
        let meta = template.metadata.get_or_insert_with(Default::default);
        self.apply_to_meta(meta, Kind::PodSpec);
    }

    fn apply_to_meta(&self, meta: &mut ObjectMeta, kind: Kind) {
        let mut labels = self.config.labels.for_kind(kind);
        merge_absent(&mut labels, &self.collect(|e| e.labels(kind)));
        let mut annotations = self.config.annotations.for_kind(kind);
        merge_absent(&mut annotations, &self.collect(|e| e.annotations(kind)));

        if !labels.is_empty() {
            merge_absent(meta.labels.get_or_insert_with(Default::default), &labels);
        }
        if !annotations.is_empty() {
            merge_absent(meta.annotations.get_or_insert_with(Default::default), &annotations);
        }
    }

    fn collect<F>(&self, contribution: F) -> Contributions
    where
        F: Fn(&dyn Enricher) -> Contributions,
    {
        let mut ret = Contributions::new();
        for enricher in self.enrichers {
            merge_absent(&mut ret, &contribution(*enricher));
        }
        ret
    }
}

/// Inserts entries of `from` whose key `target` does not have yet.
pub fn merge_absent(target: &mut BTreeMap<String, String>, from: &BTreeMap<String, String>) {
    for (key, value) in from {
        target.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

fn merge_match_labels(selector: &mut LabelSelector, contributions: &Contributions) {
    merge_absent(selector.match_labels.get_or_insert_with(Default::default), contributions);
}

fn apply_selector(resource: &mut Resource, selector: &Contributions) {
    match resource {
        Resource::Service(service) => {
            let spec = service.spec.get_or_insert_with(Default::default);
            merge_absent(spec.selector.get_or_insert_with(Default::default), selector);
        }
        Resource::ReplicationController(rc) => {
            if let Some(spec) = rc.spec.as_mut() {
                merge_absent(spec.selector.get_or_insert_with(Default::default), selector);
            }
        }
        Resource::DeploymentConfig(dc) => {
            if let Some(spec) = dc.spec.as_mut() {
                merge_absent(spec.selector.get_or_insert_with(Default::default), selector);
            }
        }
        Resource::Deployment(deployment) => {
            if let Some(spec) = deployment.spec.as_mut() {
                merge_match_labels(&mut spec.selector, selector);
            }
        }
        Resource::ReplicaSet(rs) => {
            if let Some(spec) = rs.spec.as_mut() {
                merge_match_labels(&mut spec.selector, selector);
            }
        }
        Resource::StatefulSet(statefulset) => {
            if let Some(spec) = statefulset.spec.as_mut() {
                merge_match_labels(&mut spec.selector, selector);
            }
        }
        Resource::DaemonSet(daemonset) => {
            if let Some(spec) = daemonset.spec.as_mut() {
                merge_match_labels(&mut spec.selector, selector);
            }
        }
        Resource::Job(job) => {
            if let Some(existing) = job.spec.as_mut().and_then(|s| s.selector.as_mut()) {
                merge_match_labels(existing, selector);
            }
        }
        Resource::Secret(_) | Resource::ConfigMap(_) | Resource::PodTemplate(_) => {}
    }
}
