//! Remote JSON document backend.
//!
//! Both collections live in a single hosted JSON document:
//!
//! ```json
//! { "technicians": [ ... ], "tasks": [ ... ] }
//! ```
//!
//! Reads GET the document. Writes GET it, replace one collection, and PUT the
//! whole document back. There is no locking or version check, so concurrent
//! writers race and the last PUT wins.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Backend;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::model::{Task, Technician};

/// Key some hosted JSON stores wrap the stored payload in.
const RECORD_ENVELOPE_KEY: &str = "record";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    #[serde(default)]
    pub technicians: Vec<Technician>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl RemoteDocument {
    /// Decode a fetched body, unwrapping a `{ "record": ... }` envelope.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let value = match value {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(mut map)
                if !map.contains_key("technicians")
                    && !map.contains_key("tasks")
                    && map.contains_key(RECORD_ENVELOPE_KEY) =>
            {
                map.remove(RECORD_ENVELOPE_KEY).unwrap_or_default()
            }
            other => other,
        };
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone)]
struct ApiKey {
    header: String,
    value: String,
}

#[derive(Debug, Clone)]
pub struct RemoteDocumentBackend {
    url: String,
    api_key: Option<ApiKey>,
    agent: ureq::Agent,
}

impl RemoteDocumentBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_global(Some(timeout))
                .build(),
        );
        Self {
            url: url.into(),
            api_key: None,
            agent,
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::InvalidConfig("storage.remote.url is required".to_string()))?;

        let mut backend = Self::new(url, Duration::from_secs(config.timeout_secs));
        if let (Some(header), Some(env_var)) = (&config.api_key_header, &config.api_key_env) {
            match std::env::var(env_var) {
                Ok(value) if !value.trim().is_empty() => {
                    backend = backend.with_api_key(header.clone(), value.trim().to_string());
                }
                _ => tracing::warn!(env = %env_var, "api key env var not set; sending no key"),
            }
        }
        Ok(backend)
    }

    pub fn with_api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey {
            header: header.into(),
            value: value.into(),
        });
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch(&self) -> Result<RemoteDocument> {
        let mut request = self.agent.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header(key.header.as_str(), key.value.as_str());
        }
        let mut response = request.call()?;
        let value: serde_json::Value = response.body_mut().read_json()?;
        let document = RemoteDocument::from_value(value)?;
        tracing::debug!(
            url = %self.url,
            technicians = document.technicians.len(),
            tasks = document.tasks.len(),
            "fetched remote document"
        );
        Ok(document)
    }

    pub fn store(&self, document: &RemoteDocument) -> Result<()> {
        let mut request = self.agent.put(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header(key.header.as_str(), key.value.as_str());
        }
        request.send_json(document)?;
        tracing::debug!(url = %self.url, "stored remote document");
        Ok(())
    }
}

impl Backend for RemoteDocumentBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    fn read_technicians(&self) -> Result<Vec<Technician>> {
        Ok(self.fetch()?.technicians)
    }

    fn write_technicians(&self, technicians: &[Technician]) -> Result<()> {
        let mut document = self.fetch()?;
        document.technicians = technicians.to_vec();
        self.store(&document)
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.fetch()?.tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut document = self.fetch()?;
        document.tasks = tasks.to_vec();
        self.store(&document)
    }
}
