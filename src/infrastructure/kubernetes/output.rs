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

//! Manifest output. A sink receives the final resource list; files and
//! stdout are provided.

use crate::domain::resource::ResourceCollection;
use crate::shared::error::{ForgeError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::AsyncWriteExt;

const DEFAULT_MANIFEST_BASENAME: &str = "kubernetes";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yml",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => f.write_str("yaml"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ForgeError::config_error(format!(
                "Invalid output format: {}. Must be one of: yaml, json",
                s
            ))),
        }
    }
}

/// Serialises the collection as a `List` manifest.
pub fn render(collection: &ResourceCollection, format: OutputFormat) -> Result<String> {
    let list = collection.to_list()?;
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&list)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&list)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

#[async_trait::async_trait]
pub trait ManifestSink: Send + Sync {
    async fn write(&self, collection: &ResourceCollection, format: OutputFormat) -> Result<()>;

    fn describe(&self) -> String;
}

/// Writes one manifest file. A directory target receives
/// `kubernetes.<ext>`.
pub struct FileManifestSink {
    path: PathBuf,
}

impl FileManifestSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn target(&self, format: OutputFormat) -> PathBuf {
        if self.path.is_dir() || self.path.extension().is_none() {
            self.path
                .join(format!("{}.{}", DEFAULT_MANIFEST_BASENAME, format.extension()))
        } else {
            self.path.clone()
        }
    }
}

#[async_trait::async_trait]
impl ManifestSink for FileManifestSink {
    async fn write(&self, collection: &ResourceCollection, format: OutputFormat) -> Result<()> {
        let target = self.target(format);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, render(collection, format)?).await?;
        tracing::info!("Wrote {} resource(s) to {}", collection.len(), target.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct StdoutManifestSink;

#[async_trait::async_trait]
impl ManifestSink for StdoutManifestSink {
    async fn write(&self, collection: &ResourceCollection, format: OutputFormat) -> Result<()> {
        let rendered = render(collection, format)?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}
