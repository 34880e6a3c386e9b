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

//! Remote manifest and template retrieval

use crate::shared::error::{InstallError, Result};

#[async_trait::async_trait]
pub trait TemplateFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpTemplateFetcher {
    client: reqwest::Client,
}

impl HttpTemplateFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("apim-kube/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InstallError::config_error(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl TemplateFetcher for HttpTemplateFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching remote document");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| InstallError::fetch(url, e))?;

        response.text().await.map_err(|e| InstallError::fetch(url, e))
    }
}
