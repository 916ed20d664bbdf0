//! Declarative template documents.
//!
//! A template names the product, its version streams, and the released
//! images that belong to it. Templates arrive as YAML or JSON with identical
//! structure; validation enumerates every problem instead of stopping at the
//! first.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CanonicalReference, VersionStream};

/// Schema tag every template must carry.
pub const SCHEMA_CINCINNATI: &str = "olm.cincinnati";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemplateError {
    #[error("template is invalid: {}", .problems.join("; "))]
    Invalid { problems: Vec<String> },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub schema: String,
    pub name: String,
    pub version_streams: Vec<VersionStream>,
    pub images: Vec<CanonicalReference>,
}

impl Template {
    /// Parse a YAML template document. JSON is a subset of YAML, so JSON
    /// documents parse through here as well.
    pub fn from_yaml(raw: &str) -> Result<Self, TemplateError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Report every problem with the document, joined into one error.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let mut problems = Vec::new();
        if self.schema != SCHEMA_CINCINNATI {
            problems.push(format!("schema must be {SCHEMA_CINCINNATI:?}"));
        }
        if self.name.is_empty() {
            problems.push("name must be set".to_string());
        }
        if self.version_streams.is_empty() {
            problems.push("no streams found in template".to_string());
        }
        if self.images.is_empty() {
            problems.push("no images found in template".to_string());
        }
        for stream in &self.version_streams {
            if let Err(err) = stream.lifecycle_dates.validate_order() {
                problems.push(format!("version \"{}\" invalid: {err}", stream.version));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::Invalid { problems })
        }
    }
}
