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

//! Controller configuration rendering

use crate::infrastructure::constants::CONTROLLER_CONFIG_REPOSITORY_VAR;
use crate::infrastructure::http::TemplateFetcher;
use crate::infrastructure::kubectl::Kubectl;
use crate::shared::error::{InstallError, Result};
use std::path::PathBuf;
use tera::{Context, Tera};

/// Where the controller config template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Remote(String),
    Local(PathBuf),
}

pub struct ConfigRenderer<'a> {
    kubectl: &'a Kubectl,
    fetcher: &'a dyn TemplateFetcher,
}

impl<'a> ConfigRenderer<'a> {
    pub fn new(kubectl: &'a Kubectl, fetcher: &'a dyn TemplateFetcher) -> Self {
        Self { kubectl, fetcher }
    }

    /// Renders the template with `repository` and applies it, returning kubectl's output.
    pub async fn render(&self, repository: &str, source: &TemplateSource) -> Result<Vec<u8>> {
        let template = self.load_template(source).await?;
        let config = render_controller_config(&template, repository)?;

        self.kubectl
            .apply_stdin(config.as_bytes(), "Error creating controller configs")
            .await
    }

    pub async fn load_template(&self, source: &TemplateSource) -> Result<String> {
        match source {
            TemplateSource::Remote(url) => self.fetcher.fetch(url).await,
            TemplateSource::Local(path) => {
                tokio::fs::read_to_string(path).await.map_err(|e| {
                    InstallError::Io(std::io::Error::new(
                        e.kind(),
                        format!("failed to read controller config {}: {}", path.display(), e),
                    ))
                })
            }
        }
    }
}

/// Renders the controller config template. The output is YAML, so values are
/// substituted without HTML escaping.
pub fn render_controller_config(template: &str, repository: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert(CONTROLLER_CONFIG_REPOSITORY_VAR, repository);

    let rendered = Tera::one_off(template, &context, false)?;
    tracing::debug!("Rendered controller config ({} bytes)", rendered.len());
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::{Invocation, ProcessRunner};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Invocation>>,
    }

    #[async_trait::async_trait]
    impl ProcessRunner for Recorder {
        async fn run(&self, invocation: &Invocation) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(b"configmap/controller-config configured".to_vec())
        }
    }

    struct StaticFetcher(&'static str);

    #[async_trait::async_trait]
    impl TemplateFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_render_repository_variable() {
        assert_eq!(
            render_controller_config("registry={{usernameDockerRegistry}}", "acme").unwrap(),
            "registry=acme"
        );
    }

    #[test]
    fn test_render_error_is_template_error() {
        let err = render_controller_config("registry={{usernameDockerRegistry", "acme").unwrap_err();
        assert!(matches!(err, InstallError::Template(_)));
    }

    #[test]
    fn test_render_unknown_variable_is_template_error() {
        let err = render_controller_config("registry={{ registryHost }}", "acme").unwrap_err();
        assert!(matches!(err, InstallError::Template(_)));
    }

    #[test]
    fn test_render_keeps_yaml_verbatim() {
        let template = "a: 1\n{# note #}\nb: \"{{ usernameDockerRegistry }}\"";
        assert_eq!(
            render_controller_config(template, "acme&co").unwrap(),
            "a: 1\n\nb: \"acme&co\""
        );
    }

    #[tokio::test]
    async fn test_remote_template_rendered_then_applied() {
        let recorder = Arc::new(Recorder::default());
        let kubectl = Kubectl::new(recorder.clone(), "kubectl");
        let fetcher = StaticFetcher("registry={{usernameDockerRegistry}}");
        let renderer = ConfigRenderer::new(&kubectl, &fetcher);

        renderer
            .render("acme", &TemplateSource::Remote("https://example.com/t.yaml".to_string()))
            .await
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["apply", "-f", "-"]);
        assert_eq!(calls[0].stdin.as_deref(), Some(&b"registry=acme"[..]));
    }

    #[tokio::test]
    async fn test_local_template_is_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller_conf.yaml");
        std::fs::write(&path, "user: {{ usernameDockerRegistry }}").unwrap();

        let recorder = Arc::new(Recorder::default());
        let kubectl = Kubectl::new(recorder.clone(), "kubectl");
        let fetcher = StaticFetcher("unused");
        let renderer = ConfigRenderer::new(&kubectl, &fetcher);

        renderer
            .render("acme", &TemplateSource::Local(path))
            .await
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].stdin.as_deref(), Some(&b"user: acme"[..]));
    }

    #[tokio::test]
    async fn test_missing_local_template_fails_before_apply() {
        let recorder = Arc::new(Recorder::default());
        let kubectl = Kubectl::new(recorder.clone(), "kubectl");
        let fetcher = StaticFetcher("unused");
        let renderer = ConfigRenderer::new(&kubectl, &fetcher);

        let err = renderer
            .render("acme", &TemplateSource::Local(PathBuf::from("/nonexistent/conf.yaml")))
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::Io(_)));
        assert!(recorder.calls.lock().unwrap().is_empty());
    }
}
