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

/// Injected environment
pub const ENV_KUBERNETES_NAMESPACE: &str = "KUBERNETES_NAMESPACE";
pub const FIELD_PATH_NAMESPACE: &str = "metadata.namespace";

/// Image pull policies
pub const PULL_POLICY_ALWAYS: &str = "Always";
pub const PULL_POLICY_IF_NOT_PRESENT: &str = "IfNotPresent";
pub const PULL_POLICY_PULL_ALWAYS: &str = "PullAlways";

/// Version suffix marking an unstable build
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Kubernetes naming limits
pub const MAX_RESOURCE_NAME_LENGTH: usize = 63;

/// Controller defaults
pub const DEFAULT_REPLICAS: i32 = 1;

/// Port protocols
pub const PROTOCOL_TCP: &str = "tcp";
pub const PROTOCOL_UDP: &str = "udp";

/// Service settings
pub const CLUSTER_IP_NONE: &str = "None";
pub const PROMETHEUS_PORT: i32 = 9779;
pub const ANNOTATION_PROMETHEUS_PORT: &str = "prometheus.io/port";
pub const ANNOTATION_PROMETHEUS_SCRAPE: &str = "prometheus.io/scrape";
pub const LABEL_EXPOSE: &str = "expose";

/// Project labels
pub const LABEL_APP: &str = "app";
pub const LABEL_PROJECT: &str = "project";
pub const LABEL_GROUP: &str = "group";
pub const LABEL_PROVIDER: &str = "provider";
pub const LABEL_VERSION: &str = "version";
pub const PROVIDER_NAME: &str = "kube-forge";

/// Prefix for enricher settings given as project properties
pub const ENRICHER_PROPERTY_PREFIX: &str = "forge.enricher";

/// First ordinal handed out to descriptor entries without an explicit order
pub const DEFAULT_ENRICHER_ORDER: i32 = 100;

/// OpenShift deployment triggers
pub const TRIGGER_IMAGE_CHANGE: &str = "ImageChange";
pub const KIND_IMAGE_STREAM_TAG: &str = "ImageStreamTag";

/// Registry pull secrets
pub const ANNOTATION_DOCKER_SERVER_ID: &str = "forge.io/docker-server-id";
pub const DOCKER_CONFIG_DATA_KEY: &str = ".dockercfg";
pub const SECRET_TYPE_DOCKER_CONFIG: &str = "kubernetes.io/dockercfg";

/// Init container used to fix persistent volume permissions
pub const VOLUME_PERMISSION_IMAGE: &str = "busybox";

/// Api versions
pub const API_VERSION_CORE: &str = "v1";
pub const API_VERSION_APPS: &str = "apps/v1";
pub const API_VERSION_BATCH: &str = "batch/v1";
pub const API_VERSION_OPENSHIFT_APPS: &str = "apps.openshift.io/v1";

/// Enrichers shipped with the crate, in discovery order
pub const DEFAULT_ENRICHER_DESCRIPTOR: &str = "\
# Default enrichers
forge-name
forge-controller
forge-service
forge-image
forge-healthcheck
forge-project
forge-pod-annotations
forge-volume-permission
forge-image-change-trigger
forge-docker-registry-secret
";
