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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Error, Debug)]
pub enum ForgeError {
    /// Naming and policy violations. The message is surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid port mapping '{spec}': {reason}")]
    PortParse { spec: String, reason: String },

    #[error("Unbalanced quotes in {0}")]
    CommandLineParse(String),

    #[error("Enricher {0} could not be found")]
    EnricherNotFound(String),

    #[error("No {kind} with name '{name}' found to include. Please check spelling and your project dependencies")]
    UnknownInclude { kind: String, name: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Merge error: {0}")]
    Merge(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl ForgeError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_resource(context: impl Into<String>) -> Self {
        Self::InvalidResource(context.into())
    }

    pub fn port_parse(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortParse {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_include(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownInclude {
            kind: kind.into(),
            name: name.into(),
        }
    }
}
