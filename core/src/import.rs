//! # Import Service
//!
//! Runs one import end to end:
//!
//! 1. **Export** the project snapshot through the [`ProjectGateway`].
//! 2. **Read and merge** the whole input file in memory.
//! 3. **Import** the merged hosts in a single call, unless there are none.
//!
//! Any error before step 3 means nothing is sent to the server.
//! There is no concurrency token: a change made to the project by someone
//! else between export and import is overwritten.

use std::io;
use std::path::PathBuf;

use drone_bbot_client::ClientError;
use drone_bbot_common::config::ImportSettings;
use drone_bbot_common::lair::Project;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{Instrument, debug, info, info_span};

use crate::gateway::ProjectGateway;
use crate::merge::{MergeEngine, MergeOutcome, MergeStats, UnmatchedIndex};
use crate::reader::{ReadError, RecordReader};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unable to export project")]
    Export(#[source] ClientError),
    #[error("Could not open file {}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("Unable to import project")]
    Import(#[source] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The project was updated with this many hosts.
    Imported { hosts: usize },
    /// The merge produced no hosts, so the server was not called.
    NothingToImport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub submission: Submission,
    pub unmatched: UnmatchedIndex,
    pub stats: MergeStats,
}

pub struct ImportService {
    gateway: Box<dyn ProjectGateway>,
}

impl ImportService {
    pub fn new(gateway: Box<dyn ProjectGateway>) -> Self {
        Self { gateway }
    }

    pub async fn run(&self, settings: &ImportSettings) -> Result<ImportOutcome, ImportError> {
        let snapshot = self
            .gateway
            .fetch_project(&settings.project_id)
            .instrument(info_span!("export", project = %settings.project_id))
            .await
            .map_err(ImportError::Export)?;
        info!(
            "Exported project {} with {} hosts",
            settings.project_id,
            snapshot.hosts.len()
        );

        let file = File::open(&settings.input)
            .await
            .map_err(|source| ImportError::OpenInput {
                path: settings.input.clone(),
                source,
            })?;

        self.import_from(settings, snapshot, BufReader::new(file))
            .await
    }

    /// Merges the records read from `input` into `snapshot` and submits the result.
    pub async fn import_from<R>(
        &self,
        settings: &ImportSettings,
        snapshot: Project,
        input: R,
    ) -> Result<ImportOutcome, ImportError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut engine = MergeEngine::with_settings(snapshot.hosts, settings);
        let mut reader = RecordReader::new(input, settings.malformed);

        while let Some((_line, record)) = reader.next_record().await? {
            engine.apply(&record);
        }
        debug!("Read {} lines", reader.lines_read());

        let MergeOutcome {
            hosts,
            unmatched,
            stats,
        } = engine.finish();
        info!(
            "Merged {} DNS records: {} host updates, {} hosts created, {} unmatched addresses",
            stats.dns_records,
            stats.host_updates,
            stats.hosts_created,
            unmatched.len()
        );

        let submission = if hosts.is_empty() {
            Submission::NothingToImport
        } else {
            let count = hosts.len();
            let project = Project::for_import(settings.project_id.as_str(), hosts);
            self.gateway
                .submit_project(&project)
                .instrument(info_span!("import", hosts = count))
                .await
                .map_err(ImportError::Import)?;
            Submission::Imported { hosts: count }
        };

        Ok(ImportOutcome {
            submission,
            unmatched,
            stats,
        })
    }
}
