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

//! Builders turning string based configuration into container fields

pub mod env;
pub mod ports;
pub mod probe;
pub mod volumes;

pub use self::env::{EnvironmentBuilder, ExternalEnvProvider, JsonSchemaEnvProvider};
pub use self::ports::{PortMapping, PortSpec};
pub use self::probe::{split_command_line, ProbeBuilder};
pub use self::volumes::{build_volumes, volume_mount_specs, VolumeMountSpec, VolumeType};
