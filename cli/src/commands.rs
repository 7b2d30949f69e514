pub mod import;

use clap::Parser;
use drone_bbot_common::config::{Invocation, MalformedPolicy};

const USAGE: &str = "drone-bbot [options] <id> <filename>
       export LAIR_ID=<id>; drone-bbot [options] <filename>";

#[derive(Parser)]
#[command(name = "drone-bbot")]
#[command(about = "Parses a bbot JSON file into a Lair project, extracting DNS name and IP.")]
#[command(override_usage = USAGE)]
pub struct CommandLine {
    /// Project ID followed by the bbot JSON file (only the file when LAIR_ID is set)
    #[arg(value_name = "ARGS")]
    pub positionals: Vec<String>,

    /// Show version and exit
    #[arg(short = 'v', long = "version")]
    pub show_version: bool,

    /// Allow insecure SSL connections
    #[arg(short = 'k', long = "insecure")]
    pub insecure: bool,

    /// Import all hosts into Lair, default behaviour is to only import
    /// DNS records for hosts that already exist in the project
    #[arg(long = "force-hosts")]
    pub force_hosts: bool,

    /// A comma separated list of tags to add to every host that is imported
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// What to do with a line that is not valid bbot JSON: fail or skip
    #[arg(long = "on-malformed", value_name = "POLICY", default_value_t = MalformedPolicy::Fail)]
    pub on_malformed: MalformedPolicy,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn into_invocation(self) -> Invocation {
        Invocation {
            positionals: self.positionals,
            insecure: self.insecure,
            force_hosts: self.force_hosts,
            tags: self.tags,
            malformed: self.on_malformed,
        }
    }
}
