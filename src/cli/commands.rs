// CLI command definitions

use super::install::InstallOperatorCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "apim-kube",
    version,
    about = "Kubernetes installation tool for the API Operator",
    long_about = "A standalone CLI tool for installing the API Operator, its registry credentials and controller configs on Kubernetes"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Install components into a Kubernetes cluster
    #[command(subcommand)]
    Install(InstallCommands),
}

#[derive(clap::Subcommand, Debug)]
pub enum InstallCommands {
    /// Install OLM, the API Operator, the registry secret and controller configs
    Operator(InstallOperatorCommand),
}
