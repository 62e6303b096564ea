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

//! Enricher framework and the standard enrichers

pub mod api;
pub mod manager;
pub mod metadata;
pub mod registry;
pub mod standard;

pub use self::api::{ConfigKey, Enricher, EnricherConfig, EnricherContext};
pub use self::manager::{EnricherManager, EnricherSetting};
pub use self::registry::{parse_descriptors, DescriptorEntry, EnricherFactory, EnricherRegistry};
