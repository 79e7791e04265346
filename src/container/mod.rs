// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Container image references
//!
//! A node may name the container image its stage runs in. Only the parsed
//! reference is modelled here; pulling, launching, and sandboxing are the
//! execution engine's business.
//!
//! References follow the Docker pattern
//! `[registry/][namespace/]repository[:tag][@algorithm=hash]`.

use std::fmt;
use std::str::FromStr;

use crate::errors::FlowError;

/// Content-addressable digest of an image, written `algorithm=hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDigest {
    /// Hashing algorithm, e.g. "sha256"
    pub algorithm: String,

    /// Hash value
    pub hash: String,
}

/// A parsed container image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelector {
    /// Optional namespace, registry included if present
    /// (e.g. "quay.io/biocontainers")
    pub namespace: Option<String>,

    /// Repository name; the only required component
    pub repository: String,

    /// Optional tag, e.g. "latest" or "1.5.2"
    pub tag: Option<String>,

    /// Optional content-addressable digest
    pub digest: Option<ImageDigest>,
}

impl ImageSelector {
    /// Parse an image reference string.
    ///
    /// When both a tag and a digest are present, both are kept; the digest
    /// is the authoritative reference.
    pub fn parse(reference: &str) -> Result<Self, FlowError> {
        let (rest, digest) = match reference.split_once('@') {
            Some((rest, digest_ref)) => {
                let Some((algorithm, hash)) = digest_ref.split_once('=') else {
                    return Err(FlowError::InvalidImageDigest {
                        digest: digest_ref.to_string(),
                    });
                };
                if algorithm.is_empty() || hash.is_empty() {
                    return Err(FlowError::InvalidImageDigest {
                        digest: digest_ref.to_string(),
                    });
                }
                (
                    rest,
                    Some(ImageDigest {
                        algorithm: algorithm.to_string(),
                        hash: hash.to_string(),
                    }),
                )
            }
            None => (reference, None),
        };

        let (rest, tag) = match rest.rsplit_once(':') {
            Some((rest, tag)) => (rest, Some(tag.to_string())),
            None => (rest, None),
        };

        let (namespace, repository) = match rest.rsplit_once('/') {
            Some((namespace, repository)) => (Some(namespace.to_string()), repository),
            None => (None, rest),
        };

        if repository.is_empty() {
            return Err(FlowError::MissingImageRepository {
                reference: reference.to_string(),
            });
        }

        Ok(Self {
            namespace,
            repository: repository.to_string(),
            tag,
            digest,
        })
    }
}

impl fmt::Display for ImageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref namespace) = self.namespace {
            write!(f, "{}/", namespace)?;
        }
        f.write_str(&self.repository)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}={}", digest.algorithm, digest.hash)?;
        }
        Ok(())
    }
}

impl FromStr for ImageSelector {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ImageSelector {
    type Error = FlowError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
