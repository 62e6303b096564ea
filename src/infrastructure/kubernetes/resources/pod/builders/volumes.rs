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

//! Volumes and volume mounts derived from volume declarations

use crate::domain::config::resource::VolumeConfig;
use k8s_openapi::api::core::v1::{
    EmptyDirVolumeSource, GCEPersistentDiskVolumeSource, GitRepoVolumeSource,
    GlusterfsVolumeSource, HostPathVolumeSource, NFSVolumeSource,
    PersistentVolumeClaimVolumeSource, SecretVolumeSource, Volume, VolumeMount,
};

/// A mount before it is attached to a container. The name may be absent
/// when the declaring volume has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMountSpec {
    pub name: Option<String>,
    pub mount_path: String,
    pub read_only: Option<bool>,
}

impl VolumeMountSpec {
    pub fn to_volume_mount(&self) -> VolumeMount {
        VolumeMount {
            name: self.name.clone().unwrap_or_default(),
            mount_path: self.mount_path.clone(),
            read_only: self.read_only,
            ..Default::default()
        }
    }
}

/// One mount per declared path, sharing the declaration's name.
pub fn volume_mount_specs(volumes: &[VolumeConfig]) -> Vec<VolumeMountSpec> {
    volumes
        .iter()
        .flat_map(|volume| {
            let name = volume.volume_name().map(str::to_string);
            volume.mounts.iter().map(move |path| VolumeMountSpec {
                name: name.clone(),
                mount_path: path.clone(),
                read_only: Some(false),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeType {
    HostPath,
    EmptyDir,
    GitRepo,
    Secret,
    NfsPath,
    GcePdName,
    GlusterFsPath,
    PersistentVolumeClaim,
}

impl VolumeType {
    /// Exact, case sensitive keyword match.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "hostPath" => Some(VolumeType::HostPath),
            "emptyDir" => Some(VolumeType::EmptyDir),
            "gitRepo" => Some(VolumeType::GitRepo),
            "secret" => Some(VolumeType::Secret),
            "nfsPath" => Some(VolumeType::NfsPath),
            "gcePdName" => Some(VolumeType::GcePdName),
            "glusterFsPath" => Some(VolumeType::GlusterFsPath),
            "persistentVolumeClaim" => Some(VolumeType::PersistentVolumeClaim),
            _ => None,
        }
    }

    pub fn to_volume(&self, name: &str, config: &VolumeConfig) -> Volume {
        let mut volume = Volume {
            name: name.to_string(),
            ..Default::default()
        };
        let path = config.path.clone().unwrap_or_default();

        match self {
            VolumeType::HostPath => {
                volume.host_path = Some(HostPathVolumeSource {
                    path,
                    ..Default::default()
                });
            }
            VolumeType::EmptyDir => {
                volume.empty_dir = Some(EmptyDirVolumeSource {
                    medium: config.medium.clone(),
                    ..Default::default()
                });
            }
            VolumeType::GitRepo => {
                volume.git_repo = Some(GitRepoVolumeSource {
                    repository: config.repository.clone().unwrap_or_default(),
                    revision: config.revision.clone(),
                    ..Default::default()
                });
            }
            VolumeType::Secret => {
                volume.secret = Some(SecretVolumeSource {
                    secret_name: config.secret_name.clone(),
                    ..Default::default()
                });
            }
            VolumeType::NfsPath => {
                volume.nfs = Some(NFSVolumeSource {
                    path,
                    server: config.server.clone().unwrap_or_default(),
                    read_only: config.read_only,
                });
            }
            VolumeType::GcePdName => {
                volume.gce_persistent_disk = Some(GCEPersistentDiskVolumeSource {
                    pd_name: config.pd_name.clone().unwrap_or_default(),
                    fs_type: config.fs_type.clone(),
                    partition: config.partition,
                    read_only: config.read_only,
                });
            }
            VolumeType::GlusterFsPath => {
                volume.glusterfs = Some(GlusterfsVolumeSource {
                    endpoints: config.endpoints.clone().unwrap_or_default(),
                    path,
                    read_only: config.read_only,
                });
            }
            VolumeType::PersistentVolumeClaim => {
                volume.persistent_volume_claim = Some(PersistentVolumeClaimVolumeSource {
                    claim_name: config.claim_ref.clone().unwrap_or_default(),
                    read_only: config.read_only,
                });
            }
        }
        volume
    }
}

/// Pod volumes for the declarations with a name and a recognised type.
pub fn build_volumes(configs: &[VolumeConfig]) -> Vec<Volume> {
    configs
        .iter()
        .filter_map(|config| {
            let keyword = config.volume_type.as_deref().unwrap_or_default();
            let Some(volume_type) = VolumeType::from_keyword(keyword) else {
                tracing::warn!(
                    "Dropping volume {}: unsupported volume type '{}'",
                    config.volume_name().unwrap_or("<unnamed>"),
                    keyword
                );
                return None;
            };
            let Some(name) = config.volume_name() else {
                tracing::warn!("Dropping {} volume without a name", keyword);
                return None;
            };
            Some(volume_type.to_volume(name, config))
        })
        .collect()
}
