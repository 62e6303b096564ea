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

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{ConfigMap, Container, PodSpec, PodTemplateSpec, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube_forge::domain::config::BuildImageConfiguration;
use kube_forge::infrastructure::kubernetes::fragments::read_fragments;
use kube_forge::*;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

mod test_utils {
    use super::*;

    pub fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn build_config() -> BuildConfig {
        BuildConfig {
            project: ProjectConfig {
                group_id: "io.forge".to_string(),
                artifact_id: "catalog".to_string(),
                version: Some("3.0.0".to_string()),
                ..Default::default()
            },
            images: vec![ImageConfiguration::new("forge/catalog:3.0.0").with_build(
                BuildImageConfiguration {
                    ports: vec!["8080".to_string()],
                    ..Default::default()
                },
            )],
            ..Default::default()
        }
    }

    pub fn deployment(annotations: &[(&str, &str)], containers: Vec<Container>) -> Resource {
        Resource::Deployment(Deployment {
            metadata: ObjectMeta {
                name: Some("catalog".to_string()),
                annotations: Some(map(annotations)),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    spec: Some(PodSpec {
                        containers,
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    pub fn container(name: &str, image: Option<&str>) -> Container {
        Container {
            name: name.to_string(),
            image: image.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn write(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).unwrap();
    }

    pub fn fragment(file: &str, content: &str) -> Resource {
        let dir = TempDir::new().unwrap();
        write(&dir, file, content);
        let mut resources = read_fragments(dir.path(), "catalog").unwrap();
        assert_eq!(resources.len(), 1);
        resources.remove(0)
    }

    pub const CATALOG_DEPLOYMENT: &str = r#"
metadata:
  labels:
    app: catalog
  annotations:
    audit: "on"
spec:
  replicas: 2
  selector:
    matchLabels:
      app: catalog
  template:
    metadata:
      annotations:
        sidecar.istio.io/inject: "true"
        owner: team-a
    spec:
      containers:
        - name: web
          image: web:1
          env:
            - name: A
              value: "1"
            - name: B
              value: "2"
            - name: C
              value: "3"
"#;
}

use test_utils::*;

// ============================================================================
// Resource merging
// ============================================================================

#[test]
fn test_merge_does_not_touch_inputs() {
    let original = deployment(&[("owner", "team-a")], vec![container("web", Some("web:1"))]);
    let overrides = deployment(&[("owner", "team-b")], vec![container("web", Some("web:2"))]);
    let original_before = original.to_value().unwrap();
    let overrides_before = overrides.to_value().unwrap();

    let merged = merge_resources(&original, &overrides).unwrap();

    assert_eq!(original.to_value().unwrap(), original_before);
    assert_eq!(overrides.to_value().unwrap(), overrides_before);
    assert_eq!(
        merged.pod_spec().unwrap().containers[0].image.as_deref(),
        Some("web:2")
    );
}

#[test]
fn test_merge_is_idempotent() {
    let original = deployment(&[("owner", "team-a")], vec![container("web", Some("web:1"))]);
    let overrides = deployment(
        &[("owner", "team-b"), ("tier", "")],
        vec![container("sidecar", Some("proxy:1"))],
    );

    let once = merge_resources(&original, &overrides).unwrap();
    let twice = merge_resources(&once, &overrides).unwrap();
    assert_eq!(once.to_value().unwrap(), twice.to_value().unwrap());

    let names: Vec<&str> = once
        .pod_spec()
        .unwrap()
        .containers
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["web", "sidecar"]);
}

#[test]
fn test_empty_annotation_value_removes_key() {
    let original = deployment(&[("owner", "team-a"), ("audit", "on")], Vec::new());
    let overrides = deployment(&[("audit", "")], Vec::new());

    let merged = merge_resources(&original, &overrides).unwrap();
    assert_eq!(
        merged.metadata().annotations.clone().unwrap(),
        map(&[("owner", "team-a")])
    );
}

#[test]
fn test_unnamed_override_container_matches_by_index() {
    let original = deployment(&[], vec![container("web", Some("web:1"))]);
    let overrides = deployment(&[], vec![container("", Some("web:9"))]);

    let merged = merge_resources(&original, &overrides).unwrap();
    let containers = &merged.pod_spec().unwrap().containers;
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].name, "web");
    assert_eq!(containers[0].image.as_deref(), Some("web:9"));
}

#[test]
fn test_merge_kind_mismatch_fails() {
    let service = Resource::Service(Service::default());
    let config_map = Resource::ConfigMap(ConfigMap::default());
    let err = merge_resources(&service, &config_map).unwrap_err();
    assert!(matches!(err, ForgeError::Merge(_)));
}

#[test]
fn test_override_fragment_removes_template_annotation() {
    let original = fragment("catalog-deployment.yaml", CATALOG_DEPLOYMENT);
    let overrides = fragment(
        "catalog-deployment.yaml",
        r#"
spec:
  template:
    metadata:
      annotations:
        sidecar.istio.io/inject: ""
"#,
    );

    let merged = merge_resources(&original, &overrides).unwrap();
    let template = merged.pod_template().unwrap();
    assert_eq!(
        template.metadata.as_ref().unwrap().annotations.clone().unwrap(),
        map(&[("owner", "team-a")])
    );
    assert_eq!(merged.replicas(), Some(2));
    assert_eq!(
        merged.pod_spec().unwrap().containers[0].image.as_deref(),
        Some("web:1")
    );
}

#[test]
fn test_override_fragment_env_by_name() {
    let original = fragment("catalog-deployment.yaml", CATALOG_DEPLOYMENT);
    let overrides = fragment(
        "catalog-deployment.yaml",
        r#"
spec:
  template:
    spec:
      containers:
        - name: web
          env:
            - name: B
              value: ""
            - name: A
              value: "x"
            - name: D
              value: "4"
"#,
    );

    let merged = merge_resources(&original, &overrides).unwrap();
    let container = &merged.pod_spec().unwrap().containers[0];
    let env: Vec<(&str, &str)> = container
        .env
        .as_ref()
        .unwrap()
        .iter()
        .map(|e| (e.name.as_str(), e.value.as_deref().unwrap_or_default()))
        .collect();
    assert_eq!(env, vec![("A", "x"), ("C", "3"), ("D", "4")]);
    assert_eq!(container.image.as_deref(), Some("web:1"));
}

#[test]
fn test_override_fragment_without_spec_keeps_spec() {
    let original = fragment("catalog-deployment.yaml", CATALOG_DEPLOYMENT);
    let overrides = fragment(
        "catalog-deployment.yaml",
        r#"
metadata:
  labels:
    team: payments
  annotations:
    audit: ""
"#,
    );

    let merged = merge_resources(&original, &overrides).unwrap();
    let spec_of = |resource: &Resource| resource.to_value().unwrap()["spec"].clone();
    assert_eq!(spec_of(&merged), spec_of(&original));
    assert_eq!(
        merged.metadata().labels.clone().unwrap(),
        map(&[("app", "catalog"), ("team", "payments")])
    );
    assert_eq!(merged.metadata().annotations.clone().unwrap(), BTreeMap::new());
}

// ============================================================================
// Fragments
// ============================================================================

#[test]
fn test_fragments_take_kind_and_name_from_file_name() {
    let dir = TempDir::new().unwrap();
    write(&dir, "catalog-cm.yaml", "data:\n  mode: prod\n");
    write(&dir, "svc.yml", "spec:\n  type: NodePort\n");
    write(
        &dir,
        "search-extra.json",
        r#"{"kind": "Secret", "stringData": {"token": "abc"}}"#,
    );
    write(&dir, "notes.txt", "ignored");

    let resources = read_fragments(dir.path(), "catalog").unwrap();
    let summary: Vec<(Kind, Option<&str>)> =
        resources.iter().map(|r| (r.kind(), r.name())).collect();
    assert_eq!(
        summary,
        vec![
            (Kind::ConfigMap, Some("catalog")),
            (Kind::Secret, Some("search-extra")),
            (Kind::Service, Some("catalog")),
        ]
    );
}

#[test]
fn test_fragment_with_unknown_type_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "catalog-widget.yaml", "data: {}\n");

    let err = read_fragments(dir.path(), "catalog").unwrap_err();
    assert!(err.to_string().contains("Unknown type 'widget'"));
}

#[test]
fn test_missing_fragment_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let resources = read_fragments(&dir.path().join("absent"), "catalog").unwrap();
    assert!(resources.is_empty());
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_generate_completes_fragments_and_applies_overrides() {
    let fragments = TempDir::new().unwrap();
    write(
        &fragments,
        "catalog-svc.yaml",
        "metadata:\n  annotations:\n    team: search\nspec:\n  type: NodePort\n",
    );
    write(&fragments, "catalog-cm.yaml", "data:\n  mode: prod\n  debug: \"true\"\n");

    let overrides = TempDir::new().unwrap();
    write(&overrides, "cm.yaml", "data:\n  debug: \"\"\n  region: eu\n");

    let resources = ResourceGenerator::new(build_config())
        .with_resource_dir(fragments.path())
        .with_override_dir(overrides.path())
        .generate()
        .unwrap();

    assert_eq!(resources.of_kind(Kind::Service).count(), 1);
    assert!(resources.has_named(Kind::Deployment, "catalog"));

    let Some(Resource::Service(service)) = resources.find(Kind::Service, "catalog") else {
        panic!("expected the catalog Service");
    };
    let spec = service.spec.as_ref().unwrap();
    assert_eq!(spec.type_.as_deref(), Some("NodePort"));
    assert_eq!(spec.ports.as_ref().unwrap()[0].port, 80);
    let annotations = service.metadata.annotations.as_ref().unwrap();
    assert_eq!(annotations.get("team").map(String::as_str), Some("search"));

    let Some(Resource::ConfigMap(config_map)) = resources.find(Kind::ConfigMap, "catalog") else {
        panic!("expected the catalog ConfigMap");
    };
    assert_eq!(
        config_map.data.clone().unwrap(),
        map(&[("mode", "prod"), ("region", "eu")])
    );
}

#[test]
fn test_build_config_file_drives_generation() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "forge.yaml",
        r#"
project:
  group_id: io.forge
  artifact_id: ledger
  version: 1.0.0-SNAPSHOT
images:
  - name: forge/ledger:latest
    build:
      ports: ["9090"]
resources:
  controller_name: ledger-api
enricher:
  excludes: ["forge-service"]
"#,
    );

    let config = BuildConfig::from_file(dir.path().join("forge.yaml")).unwrap();
    let resources = ResourceGenerator::new(config).generate().unwrap();

    assert_eq!(resources.len(), 1);
    let deployment = resources.find(Kind::Deployment, "ledger-api").unwrap();
    let container = &deployment.pod_spec().unwrap().containers[0];
    assert_eq!(container.image_pull_policy.as_deref(), Some("IfNotPresent"));
    assert_eq!(container.image.as_deref(), Some("forge/ledger:latest"));
}

// ============================================================================
// Output
// ============================================================================

#[tokio::test]
async fn test_file_sink_writes_list() {
    let dir = TempDir::new().unwrap();
    let resources = ResourceGenerator::new(build_config()).generate().unwrap();

    let sink = FileManifestSink::new(dir.path());
    sink.write(&resources, OutputFormat::Yaml).await.unwrap();

    let written = fs::read_to_string(dir.path().join("kubernetes.yml")).unwrap();
    let list: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();
    assert_eq!(list["kind"].as_str(), Some("List"));
    assert_eq!(list["items"].as_sequence().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_file_sink_json_to_explicit_path() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out/manifest.json");
    let resources = ResourceGenerator::new(build_config()).generate().unwrap();

    let sink = FileManifestSink::new(&target);
    assert_eq!(sink.target(OutputFormat::Json), target);
    sink.write(&resources, OutputFormat::Json).await.unwrap();

    let list: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(list["items"][0]["kind"], "Deployment");
    assert_eq!(list["items"][1]["kind"], "Service");
}
