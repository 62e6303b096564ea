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

use super::{named_metadata, ControllerHandler};
use crate::domain::resource::{Kind, Resource};
use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::PodTemplateSpec;

const JOB_RESTART_POLICY: &str = "OnFailure";

pub struct JobHandler;

impl ControllerHandler for JobHandler {
    fn kind(&self) -> Kind {
        Kind::Job
    }

    fn assemble(&self, name: String, _replicas: i32, mut template: PodTemplateSpec) -> Resource {
        if let Some(spec) = template.spec.as_mut() {
            spec.restart_policy
                .get_or_insert_with(|| JOB_RESTART_POLICY.to_string());
        }
        Resource::Job(Job {
            metadata: named_metadata(&name),
            spec: Some(JobSpec {
                template,
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::project::ProjectConfig;
    use crate::domain::config::resource::ResourceConfig;
    use crate::infrastructure::kubernetes::resources::pod::{ContainerHandler, PodTemplateHandler};

    #[test]
    fn test_job_restart_policy() {
        let project = ProjectConfig::new("io.forge", "demo");
        let templates = PodTemplateHandler::new(ContainerHandler::new(&project));
        let config = ResourceConfig::builder().controller_name("batch").build();

        let resource = JobHandler.get(&templates, &config, &[]).unwrap();
        assert_eq!(resource.name(), Some("batch"));
        assert_eq!(
            resource.pod_spec().and_then(|s| s.restart_policy.as_deref()),
            Some("OnFailure")
        );
        assert_eq!(resource.replicas(), None);
    }
}
