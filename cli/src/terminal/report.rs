//! Final report printed after an import.

use colored::*;

use crate::terminal::{colors, print};
use drone_bbot_core::import::{ImportOutcome, Submission};
use drone_bbot_core::merge::{MergeStats, UnmatchedIndex};

pub const SUCCESS_MSG: &str = "Success: Operation completed successfully";
pub const NOTHING_MSG: &str = "No new hosts were imported.";
pub const UNMATCHED_MSG: &str =
    "The following hosts had DNS names but could not be imported because they do not exist in lair:";

pub fn outcome(outcome: &ImportOutcome) {
    print::header("import summary");
    let details: Vec<(&str, ColoredString)> = summary_pairs(&outcome.stats)
        .into_iter()
        .map(|(key, value)| (key, value.to_string().color(colors::ACCENT)))
        .collect();
    print::tree(&details);
    print::fat_separator();

    match outcome.submission {
        Submission::Imported { hosts } => {
            let detail: ColoredString = format!("{hosts} hosts sent").bold().green();
            print::centered(&format!("{} ({})", SUCCESS_MSG.color(colors::TEXT_DEFAULT), detail));
        }
        Submission::NothingToImport => {
            print::centered(&NOTHING_MSG.yellow().bold().to_string());
        }
    }

    if !outcome.unmatched.is_empty() {
        print::header("not in lair");
        print::print(&UNMATCHED_MSG.yellow().bold().to_string());
        for line in unmatched_lines(&outcome.unmatched) {
            print::print(&format!("{}", line.color(colors::TEXT_DEFAULT)));
        }
    }
}

/// Counters shown in the summary tree. Ignored and skipped lines only appear when non-zero.
pub fn summary_pairs(stats: &MergeStats) -> Vec<(&'static str, usize)> {
    let mut pairs = vec![
        ("Records", stats.dns_records),
        ("Updated", stats.host_updates),
        ("Created", stats.hosts_created),
    ];
    if stats.ignored_records > 0 {
        pairs.push(("Ignored", stats.ignored_records));
    }
    if stats.malformed_records > 0 {
        pairs.push(("Skipped", stats.malformed_records));
    }
    pairs
}

/// One line per unmatched address, in address order.
pub fn unmatched_lines(index: &UnmatchedIndex) -> Vec<String> {
    index
        .iter()
        .map(|(ip, dns_names)| format!("IP: {}, DNS Names: [{}]", ip, dns_names.join(" ")))
        .collect()
}
