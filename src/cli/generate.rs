//! Manifest generation command

use super::display::{ResourceSummary, TableRenderer};
use crate::domain::config::{apply_to_build_config, parse_dynamic_configs, BuildConfig};
use crate::domain::ResourceGenerator;
use crate::infrastructure::kubernetes::{
    FileManifestSink, ManifestSink, OutputFormat, StdoutManifestSink,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct GenerateCommand {
    /// Build configuration (.toml, .yaml or .yml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: PathBuf,

    /// Directory of resource fragments used as the starting point
    #[arg(long, value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Directory of override fragments merged into the generated resources
    #[arg(long, value_name = "DIR")]
    pub overrides: Option<PathBuf>,

    /// Output file or directory. Without it the manifest goes to stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Settings: project.version, resources.controller-name, resources.image-pull-policy,
    /// resources.replicas, resources.service-account, platform.mode
    /// Any other key becomes a project property, e.g. -Dforge.enricher.forge-service.type=NodePort
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl GenerateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut build = BuildConfig::from_file(&self.config).map_err(|e| {
            anyhow::anyhow!("Failed to load build configuration {}: {}", self.config.display(), e)
        })?;

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties);
            apply_to_build_config(&dynamic_configs, &mut build);
        }

        let mut generator = ResourceGenerator::new(build);
        if let Some(dir) = &self.resources {
            generator = generator.with_resource_dir(dir);
        }
        if let Some(dir) = &self.overrides {
            generator = generator.with_override_dir(dir);
        }
        let resources = generator.generate()?;

        let sink: Box<dyn ManifestSink> = match &self.output {
            Some(path) => Box::new(FileManifestSink::new(path)),
            None => Box::new(StdoutManifestSink),
        };
        sink.write(&resources, self.format).await?;

        // Keep stdout clean for the manifest itself
        if self.output.is_some() {
            let summaries: Vec<ResourceSummary> =
                resources.iter().map(ResourceSummary::from_resource).collect();
            println!("{}", TableRenderer::new().render_resources(&summaries));
            println!("✓ Wrote {} resource(s) to {}", resources.len(), sink.describe());
        }
        Ok(())
    }
}
