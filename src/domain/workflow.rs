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

//! API Operator installation workflow
//!
//! Steps run strictly in order and any failure stops the run. Resources
//! applied by earlier steps are left in place.

use crate::domain::config::InstallerConf;
use crate::domain::controller::{ConfigRenderer, TemplateSource};
use crate::domain::credentials::RegistryCredential;
use crate::domain::input::{validate_credential, CollectedInput, InputCollector, Prompter};
use crate::domain::secret::SecretProvisioner;
use crate::infrastructure::constants::CONTROLLER_CONFIG_FILE_NAME;
use crate::infrastructure::http::TemplateFetcher;
use crate::infrastructure::kubectl::Kubectl;
use crate::shared::error::{InstallError, Result};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationMode {
    /// Operator manifests come from a local file or directory
    Local { operator_path: PathBuf },
    Remote,
}

#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub mode: InstallationMode,
    pub conf: InstallerConf,
    /// Skips the prompts when set
    pub credentials: Option<RegistryCredential>,
}

impl InstallOptions {
    pub fn new(operator_file: Option<PathBuf>, conf: InstallerConf) -> Self {
        let mode = match operator_file {
            Some(operator_path) => InstallationMode::Local { operator_path },
            None => InstallationMode::Remote,
        };
        Self {
            mode,
            conf,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<RegistryCredential>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn is_local(&self) -> bool {
        matches!(self.mode, InstallationMode::Local { .. })
    }

    pub fn operator_source(&self) -> String {
        match &self.mode {
            InstallationMode::Local { operator_path } => operator_path.display().to_string(),
            InstallationMode::Remote => self.conf.operator.manifest_url.clone(),
        }
    }

    /// An explicit template file wins; otherwise remote installs use the
    /// configured URL and local installs look next to the operator manifests.
    pub fn template_source(&self) -> Result<TemplateSource> {
        if let Some(file) = &self.conf.controller.template_file {
            let path = PathBuf::from(file);
            if !path.is_file() {
                return Err(InstallError::unsupported(format!(
                    "controller config template {} does not exist",
                    path.display()
                )));
            }
            return Ok(TemplateSource::Local(path));
        }

        match &self.mode {
            InstallationMode::Remote => Ok(TemplateSource::Remote(
                self.conf.controller.template_url.clone(),
            )),
            InstallationMode::Local { operator_path } => {
                let candidate = operator_path.join(CONTROLLER_CONFIG_FILE_NAME);
                if operator_path.is_dir() && candidate.is_file() {
                    Ok(TemplateSource::Local(candidate))
                } else {
                    Err(InstallError::unsupported(format!(
                        "local installation needs a controller config template: \
                         pass --controller-config or place {} in {}",
                        CONTROLLER_CONFIG_FILE_NAME,
                        operator_path.display()
                    )))
                }
            }
        }
    }

    fn repository_for(&self, username: &str) -> String {
        self.conf
            .registry
            .repository
            .clone()
            .unwrap_or_else(|| username.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    InstallOlm,
    CollectCredentials,
    ProvisionSecret,
    InstallOperator,
    RenderControllerConfig,
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InstallOlm => "Install OLM",
            Self::CollectCredentials => "Collect registry credentials",
            Self::ProvisionSecret => "Create registry secret",
            Self::InstallOperator => "Install API Operator",
            Self::RenderControllerConfig => "Apply controller configs",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub steps: Vec<(InstallStep, StepOutcome)>,
}

impl InstallReport {
    fn record(&mut self, step: InstallStep, outcome: StepOutcome) {
        tracing::debug!(%step, ?outcome, "step finished");
        self.steps.push((step, outcome));
    }

    pub fn outcome(&self, step: InstallStep) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| *outcome)
    }
}

pub struct InstallationWorkflow {
    options: InstallOptions,
    kubectl: Kubectl,
    fetcher: Box<dyn TemplateFetcher>,
    prompter: Box<dyn Prompter>,
}

impl InstallationWorkflow {
    pub fn new(
        options: InstallOptions,
        kubectl: Kubectl,
        fetcher: Box<dyn TemplateFetcher>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            options,
            kubectl,
            fetcher,
            prompter,
        }
    }

    pub async fn run(&mut self) -> Result<InstallReport> {
        // resolved first so a bad local setup fails before the cluster is touched
        let template_source = self.options.template_source()?;
        let mut report = InstallReport::default();

        if self.options.is_local() {
            tracing::info!("Local installation, skipping OLM");
            report.record(InstallStep::InstallOlm, StepOutcome::Skipped);
        } else {
            self.install_olm().await?;
            report.record(InstallStep::InstallOlm, StepOutcome::Completed);
        }

        // OLM needs time to settle, so credentials are collected after it
        let input = self.collect_credentials()?;
        report.record(InstallStep::CollectCredentials, StepOutcome::Completed);

        self.provision_secret(&input.credential).await?;
        report.record(InstallStep::ProvisionSecret, StepOutcome::Completed);

        self.install_operator().await?;
        report.record(InstallStep::InstallOperator, StepOutcome::Completed);

        self.render_controller_config(&input.repository, &template_source)
            .await?;
        report.record(InstallStep::RenderControllerConfig, StepOutcome::Completed);

        Ok(report)
    }

    async fn install_olm(&self) -> Result<()> {
        let olm = &self.options.conf.olm;
        tracing::info!(version = %olm.version, "Installing OLM");

        let crd_url = olm.crd_url();
        let olm_url = olm.olm_url();
        let output = self
            .kubectl
            .apply_files(
                &[crd_url.as_str(), olm_url.as_str()],
                "Error installing Operator-Hub OLM tool",
            )
            .await?;
        print_output(&output);
        Ok(())
    }

    /// Prompting blocks the calling thread. Nothing else runs on the runtime
    /// while the user types, since every step awaits the previous one.
    fn collect_credentials(&mut self) -> Result<CollectedInput> {
        if let Some(credential) = &self.options.credentials {
            validate_credential(credential)?;
            return Ok(CollectedInput {
                credential: credential.clone(),
                repository: self.options.repository_for(&credential.username),
            });
        }

        let registry = &self.options.conf.registry;
        InputCollector::new(
            &mut *self.prompter,
            registry.default_url.clone(),
            registry.repository.clone(),
        )?
        .collect()
    }

    async fn provision_secret(&self, credential: &RegistryCredential) -> Result<()> {
        let registry = &self.options.conf.registry;
        tracing::info!(secret = %registry.secret_name, "Creating registry secret");

        let output = SecretProvisioner::new(
            &self.kubectl,
            registry.secret_name.clone(),
            registry.secret_key.clone(),
        )
        .provision(credential)
        .await?;
        print_output(&output);
        Ok(())
    }

    async fn install_operator(&self) -> Result<()> {
        let source = self.options.operator_source();
        tracing::info!(%source, "Installing API Operator");

        let output = self
            .kubectl
            .apply_files(&[source.as_str()], "Error installing WSO2 api-operator")
            .await?;
        print_output(&output);
        Ok(())
    }

    async fn render_controller_config(
        &self,
        repository: &str,
        source: &TemplateSource,
    ) -> Result<()> {
        tracing::info!(?source, "Installing controller configs");

        let output = ConfigRenderer::new(&self.kubectl, self.fetcher.as_ref())
            .render(repository, source)
            .await?;
        print_output(&output);
        Ok(())
    }
}

fn print_output(output: &[u8]) {
    let text = String::from_utf8_lossy(output);
    if !text.trim().is_empty() {
        println!("{}", text.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(operator_file: Option<PathBuf>) -> InstallOptions {
        InstallOptions::new(operator_file, InstallerConf::default())
    }

    #[test]
    fn test_remote_sources() {
        let opts = options(None);
        assert!(!opts.is_local());
        assert_eq!(
            opts.operator_source(),
            "https://operatorhub.io/install/api-operator.yaml"
        );
        assert!(matches!(
            opts.template_source().unwrap(),
            TemplateSource::Remote(url) if url.ends_with("controller_conf.yaml")
        ));
    }

    #[test]
    fn test_local_template_found_next_to_operator() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("controller_conf.yaml"), "a: b").unwrap();

        let opts = options(Some(dir.path().to_path_buf()));
        assert!(opts.is_local());
        assert_eq!(
            opts.template_source().unwrap(),
            TemplateSource::Local(dir.path().join("controller_conf.yaml"))
        );
    }

    #[test]
    fn test_local_without_template_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let err = options(Some(dir.path().to_path_buf()))
            .template_source()
            .unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn test_explicit_template_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("controller.yaml");
        std::fs::write(&template, "a: b").unwrap();

        let mut conf = InstallerConf::default();
        conf.controller.template_file = Some(template.display().to_string());
        let opts = InstallOptions::new(None, conf);
        assert_eq!(opts.template_source().unwrap(), TemplateSource::Local(template));
    }

    #[test]
    fn test_missing_explicit_template_file_is_unsupported() {
        let mut conf = InstallerConf::default();
        conf.controller.template_file = Some("/nonexistent/controller_conf.yaml".to_string());
        let err = InstallOptions::new(None, conf).template_source().unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn test_repository_falls_back_to_username() {
        let opts = options(None);
        assert_eq!(opts.repository_for("alice"), "alice");

        let mut conf = InstallerConf::default();
        conf.registry.repository = Some("acme".to_string());
        assert_eq!(InstallOptions::new(None, conf).repository_for("alice"), "acme");
    }
}
