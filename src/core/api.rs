//! Rainforest API client.
//!
//! Thin typed wrapper over the REST endpoints. Every request carries the
//! `CLIENT_TOKEN` header; status mapping lives in [`super::http`].

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::http::{self, build_client, send_error};
use super::models::{
    Generator, MobileAppConfirmation, MobilePresign, NewGenerator, Resource, ResourceKind, Run,
    RunParams, RunTest, TestFilters, TestIdMapping, TestSummary,
};
use super::rfml::RfmlTest;
use crate::error::{RainforestError, Result};
use crate::storage::ResolvedConfig;

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "CLIENT_TOKEN";

/// Authenticated client for one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout,
        })
    }

    /// Create a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthNotConfigured` when no token was resolved.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .ok_or(RainforestError::AuthNotConfigured)?;
        Self::new(&config.base_url, token, config.timeout)
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))
            .map_err(|e| RainforestError::ConfigInvalid {
                key: "api.base_url".to_string(),
                message: e.to_string(),
            })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, path = url.path(), "API request");
        self.client
            .request(method, url)
            .header(TOKEN_HEADER, &self.token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;
        http::read_json(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path, query)?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path, &[])?;
        self.send(self.request(method, url).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path, &[])?;
        let _: serde_json::Value = self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// List one kind of resource.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        self.get(kind.endpoint(), &[]).await
    }

    // =========================================================================
    // Runs
    // =========================================================================

    /// Start a run.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn create_run(&self, params: &RunParams) -> Result<Run> {
        self.with_body(Method::POST, "runs", params).await
    }

    /// Fetch a run's current status.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn get_run(&self, run_id: i64) -> Result<Run> {
        self.get(&format!("runs/{run_id}"), &[]).await
    }

    /// Fetch per-test results of a run.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn run_tests(&self, run_id: i64) -> Result<Vec<RunTest>> {
        self.get(&format!("runs/{run_id}/tests"), &[]).await
    }

    // =========================================================================
    // Tests
    // =========================================================================

    /// Map every remote test to its RFML id.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn rfml_ids(&self) -> Result<Vec<TestIdMapping>> {
        self.get("tests/rfml_ids", &[]).await
    }

    /// List tests matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn list_tests(&self, filters: &TestFilters) -> Result<Vec<TestSummary>> {
        self.get("tests", &filters.query_pairs()).await
    }

    /// Fetch a full test.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn get_test(&self, test_id: i64) -> Result<RfmlTest> {
        self.get(&format!("tests/{test_id}"), &[]).await
    }

    /// Create a test.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn create_test(&self, test: &RfmlTest) -> Result<RfmlTest> {
        self.with_body(Method::POST, "tests", test).await
    }

    /// Replace an existing test.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn update_test(&self, test_id: i64, test: &RfmlTest) -> Result<RfmlTest> {
        self.with_body(Method::PUT, &format!("tests/{test_id}"), test)
            .await
    }

    /// Delete a test.
    ///
    /// # Errors
    ///
    /// Returns error on request failure.
    pub async fn delete_test(&self, test_id: i64) -> Result<()> {
        self.delete(&format!("tests/{test_id}")).await
    }

    // =========================================================================
    // Tabular variables
    // =========================================================================

    /// List tabular variables.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn generators(&self) -> Result<Vec<Generator>> {
        self.get("generators", &[]).await
    }

    /// Create a tabular variable.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn create_generator(&self, generator: &NewGenerator) -> Result<Generator> {
        self.with_body(Method::POST, "generators", generator).await
    }

    /// Delete a tabular variable.
    ///
    /// # Errors
    ///
    /// Returns error on request failure.
    pub async fn delete_generator(&self, generator_id: i64) -> Result<()> {
        self.delete(&format!("generators/{generator_id}")).await
    }

    /// Append rows to a tabular variable. Each row maps column id to value.
    ///
    /// # Errors
    ///
    /// Returns error on request failure.
    pub async fn batch_rows(
        &self,
        generator_id: i64,
        rows: &[serde_json::Map<String, serde_json::Value>],
    ) -> Result<()> {
        let body = serde_json::json!({ "data": rows });
        let _: serde_json::Value = self
            .with_body(
                Method::POST,
                &format!("generators/{generator_id}/batch"),
                &body,
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Mobile apps
    // =========================================================================

    /// Ask for a presigned upload URL for an app slot.
    ///
    /// # Errors
    ///
    /// Returns error on request or decode failure.
    pub async fn mobile_presign(
        &self,
        site_id: i64,
        environment_id: i64,
        app_slot: i64,
    ) -> Result<MobilePresign> {
        self.get(
            &format!("sites/{site_id}/environments/{environment_id}/mobile_presign"),
            &[("app_slot", app_slot.to_string())],
        )
        .await
    }

    /// Upload an app binary to a presigned URL.
    ///
    /// The presigned URL is not an API endpoint, so no token is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the upload fails.
    pub async fn upload_to_presigned(&self, url: &str, file: &Path) -> Result<()> {
        let bytes = tokio::fs::read(file).await?;
        tracing::debug!(size = bytes.len(), "uploading app binary");
        let response = self
            .client
            .put(url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        http::check_status(status, &body)
    }

    /// Confirm an uploaded app.
    ///
    /// # Errors
    ///
    /// Returns error on request failure.
    pub async fn confirm_mobile_app(
        &self,
        site_id: i64,
        environment_id: i64,
        confirmation: &MobileAppConfirmation,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .with_body(
                Method::POST,
                &format!("sites/{site_id}/environments/{environment_id}/mobile_app"),
                confirmation,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:1/api/1/", "tok", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(client().base_url(), "http://127.0.0.1:1/api/1");
    }

    #[test]
    fn url_encodes_query() {
        let url = client()
            .url("tests", &[("tags", "a b,c".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1/api/1/tests?tags=a+b%2Cc");
    }

    #[test]
    fn from_config_requires_token() {
        use crate::cli::GlobalOptions;
        use crate::storage::Config;

        let config =
            ResolvedConfig::from_sources(&GlobalOptions::default(), &Config::default(), |_| None)
                .unwrap();
        let err = ApiClient::from_config(&config).unwrap_err();
        assert!(matches!(err, RainforestError::AuthNotConfigured));
    }
}
