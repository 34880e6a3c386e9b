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

//! Installer configuration loaded from TOML

use crate::infrastructure::constants::{
    CONTROLLER_CONFIG_TEMPLATE_URL, DOCKER_REGISTRY_URL, K8S_DOCKER_SECRET_KEY_NAME,
    K8S_DOCKER_SECRET_NAME, KUBECTL, OLM_CRD_URL_TEMPLATE, OLM_OLM_URL_TEMPLATE, OLM_VERSION,
    OPERATOR_YAML_URL, VERSION_PLACEHOLDER,
};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstallerConf {
    pub kubectl: KubectlConf,
    pub olm: OlmConf,
    pub operator: OperatorConf,
    pub registry: RegistryConf,
    pub controller: ControllerConf,
}

impl InstallerConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> anyhow::Result<Self> {
        let content = read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.as_ref(), e))?;

        let conf: Self =
            toml::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;

        Ok(conf)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KubectlConf {
    pub binary: String,
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
}

impl Default for KubectlConf {
    fn default() -> Self {
        Self {
            binary: KUBECTL.to_string(),
            kubeconfig: None,
            context: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OlmConf {
    pub version: String,
    pub crd_url_template: String,
    pub olm_url_template: String,
}

impl Default for OlmConf {
    fn default() -> Self {
        Self {
            version: OLM_VERSION.to_string(),
            crd_url_template: OLM_CRD_URL_TEMPLATE.to_string(),
            olm_url_template: OLM_OLM_URL_TEMPLATE.to_string(),
        }
    }
}

impl OlmConf {
    pub fn crd_url(&self) -> String {
        self.crd_url_template
            .replace(VERSION_PLACEHOLDER, &self.version)
    }

    pub fn olm_url(&self) -> String {
        self.olm_url_template
            .replace(VERSION_PLACEHOLDER, &self.version)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OperatorConf {
    pub manifest_url: String,
}

impl Default for OperatorConf {
    fn default() -> Self {
        Self {
            manifest_url: OPERATOR_YAML_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConf {
    pub default_url: String,
    /// Value substituted into the controller config; the username when unset
    pub repository: Option<String>,
    pub secret_name: String,
    pub secret_key: String,
}

impl Default for RegistryConf {
    fn default() -> Self {
        Self {
            default_url: DOCKER_REGISTRY_URL.to_string(),
            repository: None,
            secret_name: K8S_DOCKER_SECRET_NAME.to_string(),
            secret_key: K8S_DOCKER_SECRET_KEY_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConf {
    pub template_url: String,
    pub template_file: Option<String>,
}

impl Default for ControllerConf {
    fn default() -> Self {
        Self {
            template_url: CONTROLLER_CONFIG_TEMPLATE_URL.to_string(),
            template_file: None,
        }
    }
}
