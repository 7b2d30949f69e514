//! # Record Reader
//!
//! Single forward pass over the input. Every line is decoded into a
//! [`DiscoveryRecord`] and paired with its 1-based line number. A malformed
//! line either ends the read with [`ReadError::Malformed`] or is handed
//! through (after a warning), depending on the [`MalformedPolicy`].
//! A blank line is not JSON, so it is malformed under `Fail`; `Skip` drops
//! it silently.

use std::io;

use drone_bbot_common::config::MalformedPolicy;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use crate::record::DiscoveryRecord;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Could not read input line {line}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("Could not parse bbot JSON on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

pub struct RecordReader<R> {
    lines: Lines<R>,
    line_no: usize,
    policy: MalformedPolicy,
}

impl<R> RecordReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R, policy: MalformedPolicy) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            policy,
        }
    }

    /// Returns the next record, or `None` once the input is exhausted.
    pub async fn next_record(&mut self) -> Result<Option<(usize, DiscoveryRecord)>, ReadError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|source| ReadError::Io {
                    line: self.line_no + 1,
                    source,
                })?;
            let Some(line) = line else {
                return Ok(None);
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                match self.policy {
                    MalformedPolicy::Fail => {
                        return Err(ReadError::Malformed {
                            line: self.line_no,
                            reason: "empty line".to_string(),
                        });
                    }
                    MalformedPolicy::Skip => continue,
                }
            }

            let record = DiscoveryRecord::decode(&line);
            if let DiscoveryRecord::Malformed { reason } = &record {
                match self.policy {
                    MalformedPolicy::Fail => {
                        return Err(ReadError::Malformed {
                            line: self.line_no,
                            reason: reason.clone(),
                        });
                    }
                    MalformedPolicy::Skip => {
                        warn!("Skipping line {}: {}", self.line_no, reason);
                    }
                }
            }
            return Ok(Some((self.line_no, record)));
        }
    }

    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}
