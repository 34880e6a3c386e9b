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

/// Cluster-control binary
pub const KUBECTL: &str = "kubectl";
pub const K8S_APPLY: &str = "apply";
pub const K8S_CREATE: &str = "create";
pub const K8S_SECRET: &str = "secret";
pub const K8S_SECRET_TYPE_GENERIC: &str = "generic";
pub const K8S_DRY_RUN_CLIENT: &str = "--dry-run=client";
pub const K8S_STDIN: &str = "-";

/// Operator Lifecycle Manager
pub const OLM_VERSION: &str = "0.13.0";
pub const OLM_CRD_URL_TEMPLATE: &str =
    "https://github.com/operator-framework/operator-lifecycle-manager/releases/download/{version}/crds.yaml";
pub const OLM_OLM_URL_TEMPLATE: &str =
    "https://github.com/operator-framework/operator-lifecycle-manager/releases/download/{version}/olm.yaml";
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// API Operator manifests
pub const OPERATOR_YAML_URL: &str = "https://operatorhub.io/install/api-operator.yaml";

/// Docker registry
pub const DOCKER_REGISTRY_URL: &str = "https://index.docker.io/v1/";
pub const K8S_DOCKER_SECRET_NAME: &str = "docker-registry-credentials";
pub const K8S_DOCKER_SECRET_KEY_NAME: &str = ".dockerconfigjson";
pub const DOCKER_SECRET_FILE_PREFIX: &str = "docker-secret-";
pub const DOCKER_SECRET_FILE_SUFFIX: &str = ".json";

/// Controller configuration
pub const CONTROLLER_CONFIG_TEMPLATE_URL: &str = "https://gist.githubusercontent.com/renuka-fernando/6d6c64c786e6d13742e802534de3da4e/raw/d6191bc60f3bae659749e9db5f882bef6d1d062a/controller_conf.yaml";
pub const CONTROLLER_CONFIG_FILE_NAME: &str = "controller_conf.yaml";
pub const CONTROLLER_CONFIG_REPOSITORY_VAR: &str = "usernameDockerRegistry";

/// Input validation
pub const URL_VALIDATION_REGEX: &str =
    r"^(?:https?://)?[\w.-]+(?::\d+)?(?:/[\w\-._~:/?#\[\]@!$&'()*+,;=]*)?$";
pub const USERNAME_VALIDATION_REGEX: &str = r"^[\w.+@-]+$";

/// Environment
pub const CONF_FILE_ENV: &str = "APIM_KUBE_CONF_FILE";
