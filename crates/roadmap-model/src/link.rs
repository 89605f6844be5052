//! User-managed reference links

use crate::error::LinkInputError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SCHEME_AND_WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://(www\.)?").expect("valid regex"));
static HAS_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").expect("valid regex"));

/// A labelled link attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Display label
    pub label: String,
    /// Absolute URL
    pub url: String,
}

impl LinkRecord {
    /// Create a link without normalization
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// Normalize raw form input into a link
    ///
    /// Both inputs are trimmed. An empty label is derived from the URL with
    /// the scheme and a leading `www.` removed. A URL without `http://` or
    /// `https://` gets `https://` prepended.
    ///
    /// # Errors
    /// `LinkInputError::EmptyUrl` if the URL is empty after trimming
    pub fn from_input(label: &str, url: &str) -> Result<Self, LinkInputError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LinkInputError::EmptyUrl);
        }

        let label = match label.trim() {
            "" => SCHEME_AND_WWW.replace(url, "").into_owned(),
            given => given.to_string(),
        };

        let url = if HAS_SCHEME.is_match(url) {
            url.to_string()
        } else {
            format!("https://{url}")
        };

        Ok(Self { label, url })
    }
}
