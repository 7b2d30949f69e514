use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use drone_bbot_client::{ClientError, StatusCode};
use drone_bbot_common::config::{ImportSettings, MalformedPolicy};
use drone_bbot_common::lair::{Host, Project};
use drone_bbot_core::gateway::ProjectGateway;
use tempfile::NamedTempFile;

#[derive(Default)]
struct State {
    project: Project,
    fetches: usize,
    submissions: Vec<Project>,
}

/// In-memory Lair server holding one project.
///
/// A submission replaces the stored host list, the way the real import
/// route treats this tool's full-list updates.
#[derive(Clone, Default)]
pub struct FakeLair {
    state: Arc<Mutex<State>>,
    fail_export: Option<StatusCode>,
    fail_import: Option<StatusCode>,
}

impl FakeLair {
    pub fn with_hosts(id: &str, hosts: Vec<Host>) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.project.id = id.to_string();
            state.project.hosts = hosts;
        }
        fake
    }

    pub fn failing_export(mut self, status: StatusCode) -> Self {
        self.fail_export = Some(status);
        self
    }

    pub fn failing_import(mut self, status: StatusCode) -> Self {
        self.fail_import = Some(status);
        self
    }

    pub fn submissions(&self) -> Vec<Project> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub fn hosts(&self) -> Vec<Host> {
        self.state.lock().unwrap().project.hosts.clone()
    }
}

#[async_trait]
impl ProjectGateway for FakeLair {
    async fn fetch_project(&self, id: &str) -> Result<Project, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if let Some(status) = self.fail_export {
            return Err(ClientError::Status {
                status,
                body: "export refused".into(),
            });
        }
        if state.project.id != id {
            return Err(ClientError::Status {
                status: StatusCode::NOT_FOUND,
                body: format!("no project {id}"),
            });
        }
        Ok(state.project.clone())
    }

    async fn submit_project(&self, project: &Project) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = self.fail_import {
            return Err(ClientError::Status {
                status,
                body: "import refused".into(),
            });
        }
        state.submissions.push(project.clone());
        state.project.hosts = project.hosts.clone();
        Ok(())
    }
}

pub fn host(ip: &str, hostnames: &[&str]) -> Host {
    let mut host = Host::new(ip).with_hostnames(hostnames.iter().map(|h| h.to_string()).collect());
    host.last_modified_by = "nmap".into();
    host
}

pub fn bbot_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn settings(input: PathBuf, force_hosts: bool, tags: &[&str]) -> ImportSettings {
    ImportSettings {
        project_id: "proj1".into(),
        input,
        force_hosts,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        malformed: MalformedPolicy::Fail,
    }
}
