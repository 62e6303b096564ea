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

//! Configuration domain

pub mod build;
pub mod dynamic;
pub mod image;
pub mod processor;
pub mod project;
pub mod resource;

pub use self::build::{BuildConfig, PlatformMode};
pub use self::image::{BuildImageConfiguration, ImageConfiguration, ImageName};
pub use self::processor::{Named, ProcessorConfig};
pub use self::project::{Dependency, ProjectConfig, RegistryServer};
pub use self::resource::{
    MetaDataConfig, ProbeConfig, ResourceConfig, ResourceConfigBuilder, ServiceConfig,
    ServicePortConfig, VolumeConfig,
};

pub use self::dynamic::{apply_to_build_config, parse_dynamic_configs};
