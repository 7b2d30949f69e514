//! # Run Configuration
//!
//! Everything the importer needs is resolved once, at the entry point, into a
//! [`Config`] and passed down by reference. Nothing below the binary reads the
//! process environment; the lookup is injected into [`Config::resolve`].

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Base URL of the Lair API server, credentials embedded in the authority.
pub const SERVER_URL_VAR: &str = "LAIR_API_SERVER";
/// Fallback for the `<id>` positional.
pub const PROJECT_ID_VAR: &str = "LAIR_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required arguments <id> and <filename>")]
    MissingArguments,
    #[error("Too many arguments: expected <id> <filename>, got {0} positionals")]
    TooManyArguments(usize),
    #[error("Missing LAIR_API_SERVER environment variable")]
    MissingServerUrl,
    #[error("Error parsing LAIR_API_SERVER URL")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("LAIR_API_SERVER URL has no host")]
    MissingHost,
    #[error("Missing username and/or password")]
    MissingCredentials,
    #[error("Username or password is not valid percent-encoded UTF-8")]
    InvalidCredentials,
}

/// What to do with an input line that cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort the whole run before anything is submitted.
    #[default]
    Fail,
    /// Log the line and keep going.
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            other => Err(format!("invalid policy '{other}', expected 'fail' or 'skip'")),
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Connection settings for the Lair API.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `scheme://host[:port]`, without credentials or path.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub insecure_skip_verify: bool,
}

impl ServerConfig {
    /// Parses the `LAIR_API_SERVER` value.
    ///
    /// Only scheme, host and port are kept for the endpoint; any path in the
    /// URL is ignored because the API routes are absolute.
    pub fn from_url(raw: &str, insecure_skip_verify: bool) -> Result<Self, ConfigError> {
        let url = Url::parse(raw)?;
        let host = url.host_str().ok_or(ConfigError::MissingHost)?;

        let username = decode(url.username())?;
        let password = decode(url.password().unwrap_or_default())?;
        if username.is_empty() || password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let endpoint = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };

        Ok(Self {
            endpoint,
            username,
            password,
            insecure_skip_verify,
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

fn decode(component: &str) -> Result<String, ConfigError> {
    urlencoding::decode(component)
        .map(Cow::into_owned)
        .map_err(|_| ConfigError::InvalidCredentials)
}

/// Settings consumed by the merge/import pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub project_id: String,
    pub input: PathBuf,
    /// Create hosts for addresses the project does not know yet.
    pub force_hosts: bool,
    /// Tags appended to every host that is touched or created.
    pub tags: Vec<String>,
    pub malformed: MalformedPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub import: ImportSettings,
}

/// Raw values collected by the command line, before validation.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// `<id> <filename>` or just `<filename>`.
    pub positionals: Vec<String>,
    pub insecure: bool,
    pub force_hosts: bool,
    pub tags: Option<String>,
    pub malformed: MalformedPolicy,
}

impl Config {
    /// Validates the invocation against the environment provided by `env`.
    ///
    /// Arguments are checked before the environment so that a bare
    /// invocation reports the usage error first.
    pub fn resolve<F>(invocation: Invocation, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (project_id, input) = split_positionals(invocation.positionals, &env)?;

        let raw_url = env(SERVER_URL_VAR)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingServerUrl)?;
        let server = ServerConfig::from_url(&raw_url, invocation.insecure)?;

        Ok(Self {
            server,
            import: ImportSettings {
                project_id,
                input,
                force_hosts: invocation.force_hosts,
                tags: parse_tags(invocation.tags.as_deref().unwrap_or_default()),
                malformed: invocation.malformed,
            },
        })
    }
}

fn split_positionals<F>(
    mut positionals: Vec<String>,
    env: &F,
) -> Result<(String, PathBuf), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match positionals.len() {
        2 => {
            let input = positionals.pop().unwrap_or_default();
            let project_id = positionals.pop().unwrap_or_default();
            Ok((project_id, PathBuf::from(input)))
        }
        1 => {
            let project_id = env(PROJECT_ID_VAR)
                .filter(|id| !id.is_empty())
                .ok_or(ConfigError::MissingArguments)?;
            let input = positionals.pop().unwrap_or_default();
            Ok((project_id, PathBuf::from(input)))
        }
        0 => Err(ConfigError::MissingArguments),
        n => Err(ConfigError::TooManyArguments(n)),
    }
}

/// Splits `--tags`. Pieces are kept verbatim, only the empty string means "no tags".
pub fn parse_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(String::from).collect()
}
