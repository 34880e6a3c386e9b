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

//! Docker registry credentials and the auth document built from them

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredential {
    pub registry_url: String,
    pub username: String,
    pub password: String,
}

impl RegistryCredential {
    pub fn new(
        registry_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            registry_url: registry_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// `base64(username:password)`
    pub fn encoded_auth(&self) -> String {
        encode_auth(&self.username, &self.password)
    }
}

// Password stays out of logs and panics.
impl fmt::Debug for RegistryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredential")
            .field("registry_url", &self.registry_url)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

pub fn encode_auth(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}

/// Splits an encoded auth value back into `(username, password)`.
pub fn decode_auth(auth: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(auth).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerCredential {
    pub auth: String,
    pub username: String,
    pub password: String,
}

/// The `.dockerconfigjson` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerAuthDocument {
    pub auths: BTreeMap<String, DockerCredential>,
}

impl DockerAuthDocument {
    pub fn from_credential(credential: &RegistryCredential) -> Self {
        let mut auths = BTreeMap::new();
        auths.insert(
            credential.registry_url.clone(),
            DockerCredential {
                auth: credential.encoded_auth(),
                username: credential.username.clone(),
                password: credential.password.clone(),
            },
        );
        Self { auths }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
