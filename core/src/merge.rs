//! # Merge Engine
//!
//! Folds DNS names into the project's host inventory.
//!
//! Hosts are matched by their `ipv4` string. A matched host gets the DNS name
//! and the configured tags appended and is attributed to this tool. Nothing is
//! deduplicated, so importing the same file twice doubles hostnames and tags.
//! Unknown addresses become new hosts when `force_hosts` is set and are
//! otherwise collected into the [`UnmatchedIndex`] for the operator.

use std::collections::{BTreeMap, HashMap};

use drone_bbot_common::TOOL;
use drone_bbot_common::config::ImportSettings;
use drone_bbot_common::lair::Host;

use crate::record::{DiscoveryRecord, DnsName};

/// Address to the hostnames that pointed at it, for addresses not in the project.
pub type UnmatchedIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub dns_records: usize,
    pub ignored_records: usize,
    pub malformed_records: usize,
    /// One per (record, address) pair that hit a known host.
    pub host_updates: usize,
    pub hosts_created: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Snapshot hosts in snapshot order, then created hosts in first-seen order.
    pub hosts: Vec<Host>,
    pub unmatched: UnmatchedIndex,
    pub stats: MergeStats,
}

pub struct MergeEngine {
    hosts: Vec<Host>,
    index: HashMap<String, usize>,
    force_hosts: bool,
    tags: Vec<String>,
    unmatched: UnmatchedIndex,
    stats: MergeStats,
}

impl MergeEngine {
    /// Indexes `snapshot` by address. If an address appears twice the later
    /// host replaces the earlier one.
    pub fn new(snapshot: Vec<Host>, force_hosts: bool, tags: Vec<String>) -> Self {
        let mut hosts: Vec<Host> = Vec::with_capacity(snapshot.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(snapshot.len());

        for host in snapshot {
            match index.get(&host.ipv4) {
                Some(&pos) => hosts[pos] = host,
                None => {
                    index.insert(host.ipv4.clone(), hosts.len());
                    hosts.push(host);
                }
            }
        }

        Self {
            hosts,
            index,
            force_hosts,
            tags,
            unmatched: UnmatchedIndex::new(),
            stats: MergeStats::default(),
        }
    }

    pub fn with_settings(snapshot: Vec<Host>, settings: &ImportSettings) -> Self {
        Self::new(snapshot, settings.force_hosts, settings.tags.clone())
    }

    pub fn apply(&mut self, record: &DiscoveryRecord) {
        match record {
            DiscoveryRecord::DnsName(dns) => self.merge_dns_name(dns),
            DiscoveryRecord::Ignored { .. } => self.stats.ignored_records += 1,
            DiscoveryRecord::Malformed { .. } => self.stats.malformed_records += 1,
        }
    }

    fn merge_dns_name(&mut self, record: &DnsName) {
        self.stats.dns_records += 1;

        for ip in &record.resolved_hosts {
            if let Some(&pos) = self.index.get(ip) {
                let host = &mut self.hosts[pos];
                host.hostnames.push(record.host.clone());
                host.tags.extend(self.tags.iter().cloned());
                host.last_modified_by = TOOL.to_string();
                self.stats.host_updates += 1;
            } else if self.force_hosts {
                let mut host = Host::new(ip.clone())
                    .with_hostnames(vec![record.host.clone()])
                    .with_tags(self.tags.clone());
                host.last_modified_by = TOOL.to_string();

                // Later records for this address update the new host instead of creating another.
                self.index.insert(ip.clone(), self.hosts.len());
                self.hosts.push(host);
                self.stats.hosts_created += 1;
            } else {
                self.unmatched
                    .entry(ip.clone())
                    .or_default()
                    .push(record.host.clone());
            }
        }
    }

    pub fn finish(self) -> MergeOutcome {
        MergeOutcome {
            hosts: self.hosts,
            unmatched: self.unmatched,
            stats: self.stats,
        }
    }
}
