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

//! kubectl invocations used by the installer

use crate::infrastructure::constants::{
    K8S_APPLY, K8S_CREATE, K8S_DRY_RUN_CLIENT, K8S_SECRET, K8S_SECRET_TYPE_GENERIC, K8S_STDIN,
};
use crate::infrastructure::process::{Invocation, ProcessRunner};
use crate::shared::error::Result;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Kubectl {
    runner: Arc<dyn ProcessRunner>,
    binary: String,
    global_args: Vec<String>,
}

impl Kubectl {
    pub fn new(runner: Arc<dyn ProcessRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            global_args: Vec::new(),
        }
    }

    pub fn with_kubeconfig(mut self, kubeconfig: Option<&str>) -> Self {
        if let Some(path) = kubeconfig {
            self.global_args.push("--kubeconfig".to_string());
            self.global_args.push(path.to_string());
        }
        self
    }

    pub fn with_context(mut self, context: Option<&str>) -> Self {
        if let Some(name) = context {
            self.global_args.push("--context".to_string());
            self.global_args.push(name.to_string());
        }
        self
    }

    fn invocation(&self, context: &str) -> Invocation {
        Invocation::new(&self.binary, context).args(self.global_args.iter().cloned())
    }

    /// `kubectl apply -f <a> -f <b> ...`
    pub async fn apply_files(&self, sources: &[&str], context: &str) -> Result<Vec<u8>> {
        let mut invocation = self.invocation(context).arg(K8S_APPLY);
        for source in sources {
            invocation = invocation.args(["-f", *source]);
        }
        self.runner.run(&invocation).await
    }

    /// `kubectl apply -f -` with the manifest on stdin
    pub async fn apply_stdin(&self, manifest: &[u8], context: &str) -> Result<Vec<u8>> {
        let invocation = self
            .invocation(context)
            .args([K8S_APPLY, "-f", K8S_STDIN])
            .stdin(manifest);
        self.runner.run(&invocation).await
    }

    /// Renders a generic secret holding `file` under `key` without touching the cluster.
    pub async fn render_secret_from_file(
        &self,
        name: &str,
        key: &str,
        file: &Path,
        context: &str,
    ) -> Result<Vec<u8>> {
        let invocation = self.invocation(context).args([
            K8S_CREATE.to_string(),
            K8S_SECRET.to_string(),
            K8S_SECRET_TYPE_GENERIC.to_string(),
            name.to_string(),
            format!("--from-file={}={}", key, file.display()),
            K8S_DRY_RUN_CLIENT.to_string(),
            "-o".to_string(),
            "yaml".to_string(),
        ]);
        self.runner.run(&invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Invocation>>,
    }

    #[async_trait::async_trait]
    impl ProcessRunner for Recorder {
        async fn run(&self, invocation: &Invocation) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_apply_files_repeats_file_flag() {
        let recorder = Arc::new(Recorder::default());
        let kubectl = Kubectl::new(recorder.clone(), "kubectl");
        kubectl
            .apply_files(&["crds.yaml", "olm.yaml"], "Error installing OLM")
            .await
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].command_line(), "kubectl apply -f crds.yaml -f olm.yaml");
        assert_eq!(calls[0].context, "Error installing OLM");
    }

    #[tokio::test]
    async fn test_global_args_precede_subcommand() {
        let recorder = Arc::new(Recorder::default());
        let kubectl = Kubectl::new(recorder.clone(), "kubectl")
            .with_kubeconfig(Some("/tmp/kubeconfig"))
            .with_context(Some("kind-dev"));
        kubectl.apply_stdin(b"kind: ConfigMap", "ctx").await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            calls[0].command_line(),
            "kubectl --kubeconfig /tmp/kubeconfig --context kind-dev apply -f -"
        );
        assert_eq!(calls[0].stdin.as_deref(), Some(&b"kind: ConfigMap"[..]));
    }

    #[tokio::test]
    async fn test_render_secret_is_dry_run() {
        let recorder = Arc::new(Recorder::default());
        let kubectl = Kubectl::new(recorder.clone(), "kubectl");
        kubectl
            .render_secret_from_file(
                "docker-registry-credentials",
                ".dockerconfigjson",
                Path::new("/tmp/docker-secret-1.json"),
                "ctx",
            )
            .await
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            calls[0].args,
            vec![
                "create",
                "secret",
                "generic",
                "docker-registry-credentials",
                "--from-file=.dockerconfigjson=/tmp/docker-secret-1.json",
                "--dry-run=client",
                "-o",
                "yaml",
            ]
        );
        assert!(calls[0].stdin.is_none());
    }
}
