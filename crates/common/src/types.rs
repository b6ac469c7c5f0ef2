//! Core data types for the favscan fingerprinting engine
//!
//! Field names on the serialized forms are part of the HTTP API:
//! `IP_Address` / `Matches` on probe results and `pos` / `name` / `value`
//! on signature params.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// One `{pos, name, value}` triple attached to a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureParam {
    pub pos: u32,
    pub name: String,
    pub value: String,
}

impl SignatureParam {
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>, V: Into<String>>(pos: u32, name: N, value: V) -> Self {
        Self {
            pos,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single favicon fingerprint record.
///
/// `pattern` is kept as the source text. Matching goes through the
/// compiled form held by the signature store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub pattern: String,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub params: Vec<SignatureParam>,
}

impl Signature {
    #[inline]
    #[must_use]
    pub fn new<P: Into<String>, D: Into<String>>(pattern: P, description: D) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            examples: Vec::new(),
            params: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_example<S: Into<String>>(mut self, example: S) -> Self {
        self.examples.push(example.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_param(mut self, param: SignatureParam) -> Self {
        self.params.push(param);
        self
    }

    /// Copy of this signature without its pattern.
    #[must_use]
    pub fn to_match_record(&self) -> MatchRecord {
        MatchRecord {
            description: self.description.clone(),
            examples: self.examples.clone(),
            params: self.params.clone(),
        }
    }
}

/// A signature that matched a digest, minus the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub description: String,
    pub examples: Vec<String>,
    pub params: Vec<SignatureParam>,
}

impl MatchRecord {
    /// Value of the first param named `name`, e.g. `service.vendor`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// An address that served a favicon matching at least one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "IP_Address")]
    pub address: IpAddr,
    #[serde(rename = "Matches")]
    pub matches: Vec<MatchRecord>,
}

impl ProbeResult {
    #[inline]
    #[must_use]
    pub fn new(address: IpAddr, matches: Vec<MatchRecord>) -> Self {
        Self { address, matches }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} match", self.address, self.matches.len())?;
        if self.matches.len() != 1 {
            f.write_str("es")?;
        }
        f.write_str(")")
    }
}

/// Probe results for one top-level target, in address enumeration order.
pub type FingerprintResult = Vec<ProbeResult>;

/// Probe behaviour tuning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOptions {
    pub timeout: Duration,
    pub port: u16,
    pub path: String,
    /// Bodies larger than this are treated as absent.
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(25),
            port: 80,
            path: "/favicon.ico".to_string(),
            max_body_bytes: 1024 * 1024,
            user_agent: format!("favscan/{}", crate::VERSION),
        }
    }
}

impl ProbeOptions {
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = path.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Plain-HTTP URL of the favicon on `address`.
    ///
    /// IPv6 hosts are bracketed and the port is omitted when it is 80.
    #[must_use]
    pub fn url_for(&self, address: IpAddr) -> String {
        let host = match address {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(v6) => format!("[{}]", v6),
        };
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        if self.port == 80 {
            format!("http://{}{}", host, path)
        } else {
            format!("http://{}:{}{}", host, self.port, path)
        }
    }
}
