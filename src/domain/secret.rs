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

//! Docker registry pull secret provisioning

use crate::domain::credentials::{DockerAuthDocument, RegistryCredential};
use crate::infrastructure::constants::{DOCKER_SECRET_FILE_PREFIX, DOCKER_SECRET_FILE_SUFFIX};
use crate::infrastructure::kubectl::Kubectl;
use crate::shared::error::{InstallError, Result};
use k8s_openapi::api::core::v1::Secret;
use std::io::Write;

pub struct SecretProvisioner<'a> {
    kubectl: &'a Kubectl,
    secret_name: String,
    secret_key: String,
}

impl<'a> SecretProvisioner<'a> {
    pub fn new(
        kubectl: &'a Kubectl,
        secret_name: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            kubectl,
            secret_name: secret_name.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Creates or updates the registry secret and returns kubectl's apply output.
    ///
    /// The credential JSON only ever exists in a temp file owned by this call;
    /// the file is removed when it goes out of scope, on success and on error.
    pub async fn provision(&self, credential: &RegistryCredential) -> Result<Vec<u8>> {
        let auth_json = DockerAuthDocument::from_credential(credential).to_json()?;

        let mut file = tempfile::Builder::new()
            .prefix(DOCKER_SECRET_FILE_PREFIX)
            .suffix(DOCKER_SECRET_FILE_SUFFIX)
            .tempfile()?;
        file.write_all(&auth_json)?;
        file.flush()?;
        let credential_file = file.into_temp_path();

        let manifest = self
            .kubectl
            .render_secret_from_file(
                &self.secret_name,
                &self.secret_key,
                &credential_file,
                "Error rendering k8s secret for registry credentials",
            )
            .await?;

        self.verify_rendered_secret(&manifest)?;

        let output = self
            .kubectl
            .apply_stdin(
                &manifest,
                "Error creating k8s secret for registry credentials",
            )
            .await?;

        tracing::info!(secret = %self.secret_name, registry = %credential.registry_url, "registry secret applied");
        Ok(output)
    }

    fn verify_rendered_secret(&self, manifest: &[u8]) -> Result<()> {
        let secret: Secret = serde_yaml::from_slice(manifest)?;

        if secret.metadata.name.as_deref() != Some(self.secret_name.as_str()) {
            return Err(InstallError::InvalidManifest(format!(
                "rendered secret is named {:?}, expected '{}'",
                secret.metadata.name, self.secret_name
            )));
        }

        let has_key = secret
            .data
            .as_ref()
            .is_some_and(|data| data.contains_key(&self.secret_key));
        if !has_key {
            return Err(InstallError::InvalidManifest(format!(
                "rendered secret '{}' has no '{}' entry",
                self.secret_name, self.secret_key
            )));
        }

        Ok(())
    }
}
