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

use crate::domain::config::InstallerConf;
use std::collections::HashMap;

/// Parses `-D key=value` arguments.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();

    for config in configs {
        let (key, value) = config.split_once('=').ok_or_else(|| {
            format!("Invalid config format: '{}'. Expected 'key=value'", config)
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty key in config: '{}'", config));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_installer_conf(configs: &HashMap<String, String>, conf: &mut InstallerConf) {
    for (key, value) in configs {
        match key.as_str() {
            "kubectl.binary" => conf.kubectl.binary = value.clone(),
            "kubectl.kubeconfig" => conf.kubectl.kubeconfig = non_empty(value),
            "kubectl.context" => conf.kubectl.context = non_empty(value),
            "olm.version" => conf.olm.version = value.clone(),
            "olm.crd-url-template" => conf.olm.crd_url_template = value.clone(),
            "olm.olm-url-template" => conf.olm.olm_url_template = value.clone(),
            "operator.manifest-url" => conf.operator.manifest_url = value.clone(),
            "registry.default-url" => conf.registry.default_url = value.clone(),
            "registry.repository" => conf.registry.repository = non_empty(value),
            "registry.secret-name" => conf.registry.secret_name = value.clone(),
            "registry.secret-key" => conf.registry.secret_key = value.clone(),
            "controller.template-url" => conf.controller.template_url = value.clone(),
            "controller.template-file" => conf.controller.template_file = non_empty(value),
            unknown => tracing::warn!(key = unknown, "ignoring unknown configuration property"),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dynamic_configs() {
        let configs = parse_dynamic_configs(&[
            "olm.version=0.16.0".to_string(),
            " registry.repository = acme ".to_string(),
            "olm.crd-url-template=https://example.com/{version}/crds.yaml?a=b".to_string(),
        ])
        .unwrap();

        assert_eq!(configs["olm.version"], "0.16.0");
        assert_eq!(configs["registry.repository"], "acme");
        assert_eq!(
            configs["olm.crd-url-template"],
            "https://example.com/{version}/crds.yaml?a=b"
        );
    }

    #[test]
    fn test_parse_dynamic_configs_rejects_malformed() {
        assert!(parse_dynamic_configs(&["olm.version".to_string()]).is_err());
        assert!(parse_dynamic_configs(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut conf = InstallerConf::default();
        let configs = parse_dynamic_configs(&[
            "olm.version=0.16.0".to_string(),
            "kubectl.context=kind-dev".to_string(),
            "registry.secret-name=pull-secret".to_string(),
            "registry.repository=".to_string(),
            "not.a.key=1".to_string(),
        ])
        .unwrap();

        apply_to_installer_conf(&configs, &mut conf);

        assert_eq!(conf.olm.version, "0.16.0");
        assert_eq!(conf.kubectl.context.as_deref(), Some("kind-dev"));
        assert_eq!(conf.registry.secret_name, "pull-secret");
        assert_eq!(conf.registry.repository, None);
    }
}
