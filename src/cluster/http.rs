//! JSON control-plane client.
//!
//! - `GET  {base}/clusters/{id}`        -> `{"state": "available"}`
//! - `POST {base}/clusters/{id}/resume`
//! - `POST {base}/clusters/{id}/pause`

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;

use crate::cluster::ClusterApi;
use crate::domain::ClusterState;
use crate::error::AppError;

pub const API_URL_VAR: &str = "WAREHOUSE_API_URL";
pub const API_TOKEN_VAR: &str = "WAREHOUSE_API_TOKEN";

pub struct HttpClusterApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    state: String,
}

impl HttpClusterApi {
    pub fn new(base: &str, token: Option<String>) -> Result<Self, AppError> {
        let base = Url::parse(base)
            .map_err(|e| AppError::input(format!("Invalid warehouse API URL '{base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(AppError::input(format!(
                "Warehouse API URL '{base}' cannot be used as a base URL."
            )));
        }
        Ok(Self {
            client: Client::new(),
            base,
            token,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base = std::env::var(API_URL_VAR)
            .map_err(|_| AppError::input(format!("Missing {API_URL_VAR} in environment (.env).")))?;
        let token = std::env::var(API_TOKEN_VAR).ok().filter(|t| !t.is_empty());
        Self::new(&base, token)
    }

    pub fn cluster_url(&self, cluster_id: &str, action: Option<&str>) -> Result<Url, AppError> {
        if cluster_id.is_empty() {
            return Err(AppError::input("Cluster identifier must be non-empty."));
        }
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::input(format!("Warehouse API URL '{}' cannot carry a path.", self.base)))?;
            segments.pop_if_empty().push("clusters").push(cluster_id);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn post_action(&self, cluster_id: &str, action: &str) -> Result<(), AppError> {
        let url = self.cluster_url(cluster_id, Some(action))?;
        let resp = self
            .authorize(self.client.post(url))
            .send()
            .map_err(|e| AppError::service(format!("{action} request for {cluster_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::service(format!(
                "{action} request for {cluster_id} failed with status {}.",
                resp.status()
            )));
        }
        Ok(())
    }
}

impl ClusterApi for HttpClusterApi {
    fn status(&self, cluster_id: &str) -> Result<ClusterState, AppError> {
        let url = self.cluster_url(cluster_id, None)?;
        let resp = self
            .authorize(self.client.get(url))
            .send()
            .map_err(|e| AppError::service(format!("Status request for {cluster_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::service(format!(
                "Status request for {cluster_id} failed with status {}.",
                resp.status()
            )));
        }

        let body: StatusResponse = resp
            .json()
            .map_err(|e| AppError::service(format!("Failed to parse status for {cluster_id}: {e}")))?;
        Ok(ClusterState::parse(&body.state))
    }

    fn request_resume(&self, cluster_id: &str) -> Result<(), AppError> {
        self.post_action(cluster_id, "resume")
    }

    fn request_pause(&self, cluster_id: &str) -> Result<(), AppError> {
        self.post_action(cluster_id, "pause")
    }
}
