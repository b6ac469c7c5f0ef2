//! Signature store - favicon fingerprint database
//!
//! Loads the fingerprint definition file (Rapid7 recog `favicons.xml`
//! layout) once and answers digest lookups:
//!
//! ```xml
//! <fingerprints>
//!   <fingerprint pattern="^55ece828b1329741c1d553a6575d71f1$">
//!     <description>Radarr</description>
//!     <example>55ece828b1329741c1d553a6575d71f1</example>
//!     <param pos="0" name="service.product" value="Radarr"/>
//!   </fingerprint>
//! </fingerprints>
//! ```
//!
//! A pattern matches when it matches at the start of the digest. It does not
//! have to consume the whole digest. Invalid patterns fail the load.

use regex::{Regex, RegexSet};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, instrument};

use favscan_common::{FavscanError, FavscanResult, MatchRecord, Signature, SignatureParam};

use crate::digest::digest;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "fingerprint", default)]
    fingerprints: Vec<RawFingerprint>,
}

#[derive(Debug, Deserialize)]
struct RawFingerprint {
    #[serde(rename = "@pattern")]
    pattern: Option<String>,
    description: Option<RawText>,
    #[serde(rename = "example", default)]
    examples: Vec<RawText>,
    #[serde(rename = "param", default)]
    params: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
struct RawText {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(rename = "@pos")]
    pos: u32,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value", default)]
    value: String,
}

impl RawFingerprint {
    fn validate(self, index: usize) -> FavscanResult<Signature> {
        let pattern = self.pattern.unwrap_or_default();
        if pattern.is_empty() {
            return Err(FavscanError::InvalidSignature {
                index,
                reason: "missing or empty pattern attribute".to_string(),
            });
        }

        let description = self.description.map(|d| d.text).unwrap_or_default();
        if description.is_empty() {
            return Err(FavscanError::InvalidSignature {
                index,
                reason: "missing or empty description".to_string(),
            });
        }

        Ok(Signature {
            pattern,
            description,
            examples: self.examples.into_iter().map(|e| e.text).collect(),
            params: self
                .params
                .into_iter()
                .map(|p| SignatureParam::new(p.pos, p.name, p.value))
                .collect(),
        })
    }
}

/// Immutable, load-ordered collection of signatures.
///
/// Safe to share behind an `Arc` across probe tasks; nothing mutates it
/// after construction.
#[derive(Debug)]
pub struct SignatureStore {
    signatures: Vec<Signature>,
    compiled: Vec<Regex>,
    /// Prefilter over all patterns; candidates are re-checked for a match at offset 0.
    index: RegexSet,
}

impl SignatureStore {
    /// Load and validate the signature file at `path`.
    #[instrument(skip(path), fields(file = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> FavscanResult<Self> {
        let file = File::open(path.as_ref())?;
        let store = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} signatures", store.len());
        Ok(store)
    }

    /// Parse a signature document from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> FavscanResult<Self> {
        Self::from_document(quick_xml::de::from_reader(reader)?)
    }

    /// Parse a signature document held in memory.
    pub fn from_xml_str(xml: &str) -> FavscanResult<Self> {
        Self::from_document(quick_xml::de::from_str(xml)?)
    }

    fn from_document(doc: RawDocument) -> FavscanResult<Self> {
        let signatures = doc
            .fingerprints
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.validate(index))
            .collect::<FavscanResult<Vec<_>>>()?;
        Self::from_signatures(signatures)
    }

    /// Build a store from already-parsed signatures, compiling every pattern.
    pub fn from_signatures(signatures: Vec<Signature>) -> FavscanResult<Self> {
        let compiled = signatures
            .iter()
            .enumerate()
            .map(|(index, sig)| {
                Regex::new(&sig.pattern).map_err(|source| FavscanError::InvalidPattern {
                    index,
                    pattern: sig.pattern.clone(),
                    source,
                })
            })
            .collect::<FavscanResult<Vec<_>>>()?;

        // Every pattern compiled on its own above, so the set only fails on size limits.
        let index = RegexSet::new(signatures.iter().map(|s| s.pattern.as_str())).map_err(
            |e| FavscanError::Config(format!("signature set too large to index: {}", e)),
        )?;

        Ok(Self {
            signatures,
            compiled,
            index,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Signatures in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    /// Every signature whose pattern matches at the start of `digest`, in load order.
    #[must_use]
    pub fn match_digest(&self, digest: &str) -> Vec<MatchRecord> {
        // SetMatches iterates in ascending pattern index, i.e. load order.
        self.index
            .matches(digest)
            .into_iter()
            .filter(|&i| {
                self.compiled[i]
                    .find(digest)
                    .is_some_and(|m| m.start() == 0)
            })
            .map(|i| self.signatures[i].to_match_record())
            .collect()
    }

    /// Digest `body` and look it up.
    #[must_use]
    pub fn identify(&self, body: &[u8]) -> Vec<MatchRecord> {
        let hash = digest(body);
        let matches = self.match_digest(&hash);
        debug!(digest = %hash, matches = matches.len(), "Digest lookup");
        matches
    }
}
