//! `install operator` command

use crate::cli::display::TableRenderer;
use crate::domain::config::{apply_to_installer_conf, parse_dynamic_configs, InstallerConf};
use crate::domain::credentials::RegistryCredential;
use crate::domain::workflow::{InstallOptions, InstallationWorkflow};
use crate::infrastructure::constants::CONF_FILE_ENV;
use crate::infrastructure::{HttpTemplateFetcher, Kubectl, SystemProcessRunner, TerminalPrompter};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
pub struct InstallOperatorCommand {
    /// Path to API Operator directory or manifest (local installation, skips OLM)
    #[arg(long = "from-file", short = 'f', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Path to installer configuration file (TOML)
    /// If not provided, APIM_KUBE_CONF_FILE is used when set
    #[arg(long = "config", value_name = "PATH")]
    pub config_file: Option<String>,

    /// Local controller config template (mustache)
    #[arg(long, value_name = "PATH")]
    pub controller_config: Option<String>,

    /// Repository written into the controller configs (defaults to the registry username)
    #[arg(long)]
    pub repository: Option<String>,

    /// OLM release to install
    #[arg(long)]
    pub olm_version: Option<String>,

    /// Path to kubeconfig file passed to kubectl
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context passed to kubectl
    #[arg(long)]
    pub context: Option<String>,

    /// Run without prompts, taking credentials from the flags below
    #[arg(long, short = 'B')]
    pub batch: bool,

    /// Docker registry URL (batch mode)
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Docker registry username (batch mode)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Docker registry password (batch mode)
    #[arg(long, short = 'p')]
    pub password: Option<String>,

    /// Override configuration properties (-D key=value)
    ///
    /// Keys: kubectl.binary, kubectl.kubeconfig, kubectl.context, olm.version,
    /// olm.crd-url-template, olm.olm-url-template, operator.manifest-url,
    /// registry.default-url, registry.repository, registry.secret-name,
    /// registry.secret-key, controller.template-url, controller.template-file
    ///
    /// Example: -Dolm.version=0.14.1 -Dregistry.secret-name=my-registry
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl InstallOperatorCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let conf = self.resolve_conf()?;
        let credentials = self.batch_credentials(&conf)?;

        let kubectl = Kubectl::new(
            Arc::new(SystemProcessRunner::new()),
            conf.kubectl.binary.clone(),
        )
        .with_kubeconfig(conf.kubectl.kubeconfig.as_deref())
        .with_context(conf.kubectl.context.as_deref());

        let options = InstallOptions::new(self.from_file.clone(), conf).with_credentials(credentials);
        let fetcher = HttpTemplateFetcher::new()?;

        let mut workflow = InstallationWorkflow::new(
            options,
            kubectl,
            Box::new(fetcher),
            Box::new(TerminalPrompter::new()),
        );

        let report = workflow
            .run()
            .await
            .map_err(|e| anyhow::Error::new(e).context("API Operator installation failed"))?;

        println!("{}", TableRenderer::new().render_install_report(&report));
        Ok(())
    }

    /// Priority: command line > -D properties > config file > defaults
    pub fn resolve_conf(&self) -> anyhow::Result<InstallerConf> {
        let mut conf = if let Some(ref config_path) = self.config_file {
            InstallerConf::from(config_path)?
        } else if let Ok(env_path) = std::env::var(CONF_FILE_ENV) {
            InstallerConf::from(&env_path)?
        } else {
            InstallerConf::default()
        };

        if !self.properties.is_empty() {
            let configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_installer_conf(&configs, &mut conf);
        }

        if let Some(ref version) = self.olm_version {
            conf.olm.version = version.clone();
        }
        if let Some(ref repository) = self.repository {
            conf.registry.repository = Some(repository.clone());
        }
        if let Some(ref template) = self.controller_config {
            conf.controller.template_file = Some(template.clone());
        }
        if let Some(ref kubeconfig) = self.kubeconfig {
            conf.kubectl.kubeconfig = Some(kubeconfig.clone());
        }
        if let Some(ref context) = self.context {
            conf.kubectl.context = Some(context.clone());
        }

        Ok(conf)
    }

    pub fn batch_credentials(
        &self,
        conf: &InstallerConf,
    ) -> anyhow::Result<Option<RegistryCredential>> {
        if !self.batch {
            if self.registry_url.is_some() || self.username.is_some() || self.password.is_some() {
                anyhow::bail!("--registry-url, --username and --password require --batch");
            }
            return Ok(None);
        }

        let username = self
            .username
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--username is required in batch mode"))?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--password is required in batch mode"))?;
        let registry_url = self
            .registry_url
            .clone()
            .unwrap_or_else(|| conf.registry.default_url.clone());

        Ok(Some(RegistryCredential::new(registry_url, username, password)))
    }
}
