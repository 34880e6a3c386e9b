//! Build automation for apim-kube
//!
//! Usage: cargo xtask <command>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for apim-kube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tests
    Test {
        /// Run only the workflow integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Build a release tarball
    Dist,
    /// Run CI checks (format, clippy, test)
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Test { integration } => test(&sh, integration),
        Commands::Dist => dist(&sh),
        Commands::Ci => ci(&sh),
    }
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    if integration {
        cmd!(sh, "cargo test --test workflow_test").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }
    Ok(())
}

fn dist(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo build --release -p apim-kube").run()?;

    let dist_dir = project_root()?.join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(
        project_root()?.join("target/release/apim-kube"),
        dist_dir.join("apim-kube"),
    )?;

    let archive_name = "apim-kube.tar.gz";
    cmd!(sh, "tar -czf {archive_name} -C dist apim-kube")
        .run()
        .context("Failed to create tarball")?;

    println!("Distribution package created: {}", archive_name);
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings").run()?;
    test(sh, false)
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
