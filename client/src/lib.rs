//! # Lair API Client
//!
//! Thin `reqwest` wrapper around the two Lair API server routes this tool
//! uses:
//!
//! * `GET /api/projects/{id}` exports the current project.
//! * `PATCH /api/projects/{id}` imports a project document into it.
//!
//! Both authenticate with HTTP basic auth taken from [`ServerConfig`].

mod error;

pub use error::ClientError;
pub use reqwest::StatusCode;

use drone_bbot_common::TOOL;
use drone_bbot_common::config::ServerConfig;
use drone_bbot_common::lair::Project;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

/// Query flags accepted by the import route.
///
/// These mirror the Lair API. The importer always sends the defaults (both
/// off); callers of the client may set them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Let the server add ports to hosts even if the port already exists.
    pub force_ports: bool,
    /// Only import into hosts that already exist in the project.
    pub limit_hosts: bool,
}

impl ImportOptions {
    fn query(&self) -> Vec<(&'static str, &'static str)> {
        let mut query = Vec::new();
        if self.force_ports {
            query.push(("force-ports", "true"));
        }
        if self.limit_hosts {
            query.push(("limit-hosts", "true"));
        }
        query
    }
}

pub struct LairClient {
    http: Client,
    server: ServerConfig,
}

impl LairClient {
    pub fn new(server: ServerConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(server.insecure_skip_verify)
            .user_agent(format!("{}/{}", TOOL, env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, server })
    }

    pub fn endpoint(&self) -> &str {
        &self.server.endpoint
    }

    /// Fetches the project with all of its hosts.
    pub async fn export_project(&self, id: &str) -> Result<Project, ClientError> {
        if id.is_empty() {
            return Err(ClientError::EmptyProjectId);
        }
        let url = project_url(&self.server.endpoint, id);
        debug!("GET {url}");

        let response = self.send(self.http.get(&url), &url).await?;
        response.json::<Project>().await.map_err(ClientError::Decode)
    }

    /// Sends `project` to the server, which merges it into the stored project.
    pub async fn import_project(
        &self,
        options: &ImportOptions,
        project: &Project,
    ) -> Result<(), ClientError> {
        if project.id.is_empty() {
            return Err(ClientError::EmptyProjectId);
        }
        let url = project_url(&self.server.endpoint, &project.id);
        debug!("PATCH {url} with {} hosts", project.hosts.len());

        let request = self.http.patch(&url).query(&options.query()).json(project);
        self.send(request, &url).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ClientError> {
        let response = request
            .basic_auth(&self.server.username, Some(&self.server.password))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response)
    }
}

fn project_url(endpoint: &str, id: &str) -> String {
    format!(
        "{}/api/projects/{}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}
