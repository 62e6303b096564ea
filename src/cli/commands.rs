// CLI command definitions

use super::generate::GenerateCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kube-forge",
    version,
    about = "Kubernetes manifest generator",
    long_about = "Generates and enriches Kubernetes resource manifests from a build description, resource fragments and overrides"
)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate the manifest list for a build
    Generate(GenerateCommand),
}
