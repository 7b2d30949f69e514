//! Boundary between the import service and the Lair API server.
//!
//! The service only depends on [`ProjectGateway`]; [`LairClient`] is the
//! production implementation and tests substitute an in-memory one.

use async_trait::async_trait;
use drone_bbot_client::{ClientError, ImportOptions, LairClient};
use drone_bbot_common::lair::Project;

#[async_trait]
pub trait ProjectGateway: Send + Sync {
    /// Fetches the current state of project `id`.
    async fn fetch_project(&self, id: &str) -> Result<Project, ClientError>;

    /// Submits `project` as one update. Called at most once per run.
    async fn submit_project(&self, project: &Project) -> Result<(), ClientError>;
}

#[async_trait]
impl ProjectGateway for LairClient {
    async fn fetch_project(&self, id: &str) -> Result<Project, ClientError> {
        self.export_project(id).await
    }

    async fn submit_project(&self, project: &Project) -> Result<(), ClientError> {
        self.import_project(&ImportOptions::default(), project).await
    }
}
