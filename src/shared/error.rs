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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, InstallError>;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("{context}: failed to launch '{program}': {source}")]
    ProcessLaunch {
        context: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: '{program}' exited with code {code}: {stderr}")]
    ProcessExit {
        context: String,
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("Error marshalling docker secret credentials: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error rendering template: {0}")]
    Template(#[from] tera::Error),

    #[error("Error reading '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl InstallError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn input(context: impl Into<String>) -> Self {
        Self::Input(context.into())
    }

    pub fn unsupported(context: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(context.into())
    }

    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }
}
