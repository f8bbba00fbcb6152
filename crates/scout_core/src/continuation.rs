//! Cross-tab continuation: the remainder of a multi-open search carried in the
//! `#state=` fragment of the application's own address.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marketplace::{Condition, MarketplaceId};
use crate::search::SearchSnapshot;
use scout_logging::scout_warn;

pub const STATE_PREFIX: &str = "state=";
pub const CONTINUATION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContinuationError {
    #[error("malformed continuation state: {0}")]
    Malformed(String),
    #[error("unsupported continuation state version {0}")]
    UnsupportedVersion(u32),
    #[error("failed to serialize continuation state: {0}")]
    Serialize(String),
}

/// Wire form of the continuation. Field names are part of the fragment format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuationState {
    #[serde(rename = "v", default = "legacy_version")]
    pub version: u32,
    pub urls: Vec<String>,
    pub search_term: String,
    pub min_price: String,
    pub max_price: String,
    pub selected_marketplaces: BTreeMap<String, bool>,
    pub item_condition: BTreeMap<String, bool>,
}

// Fragments written before the tag existed carry no `v`.
fn legacy_version() -> u32 {
    1
}

/// One link of the chain: open `handoff_address` in a new context, then
/// navigate the current one to `navigate_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub handoff_address: String,
    pub navigate_to: String,
    pub remaining: usize,
}

impl ContinuationState {
    pub fn from_snapshot(search: &SearchSnapshot, urls: Vec<String>) -> Self {
        Self {
            version: CONTINUATION_VERSION,
            urls,
            search_term: search.term.clone(),
            min_price: search.min_price.clone(),
            max_price: search.max_price.clone(),
            selected_marketplaces: search
                .marketplaces
                .iter()
                .map(|id| (id.as_str().to_string(), true))
                .collect(),
            item_condition: search
                .conditions
                .iter()
                .map(|c| (c.as_str().to_string(), true))
                .collect(),
        }
    }

    /// Rebuilds the form state. Only flags explicitly set to `true` are
    /// applied; unknown identifiers are skipped.
    pub fn to_snapshot(&self) -> SearchSnapshot {
        let marketplaces = self
            .selected_marketplaces
            .iter()
            .filter(|(_, selected)| **selected)
            .filter_map(|(key, _)| match key.parse::<MarketplaceId>() {
                Ok(id) => Some(id),
                Err(err) => {
                    scout_warn!("Ignoring marketplace in continuation state: {}", err);
                    None
                }
            })
            .collect();
        let conditions = self
            .item_condition
            .iter()
            .filter(|(_, checked)| **checked)
            .filter_map(|(key, _)| match key.parse::<Condition>() {
                Ok(condition) => Some(condition),
                Err(err) => {
                    scout_warn!("Ignoring item condition in continuation state: {}", err);
                    None
                }
            })
            .collect();
        SearchSnapshot {
            term: self.search_term.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            marketplaces,
            conditions,
        }
    }

    pub fn pop_next(&mut self) -> Option<String> {
        if self.urls.is_empty() {
            None
        } else {
            Some(self.urls.remove(0))
        }
    }

    /// `state=<percent-encoded JSON>`, without the leading `#`.
    pub fn to_fragment(&self) -> Result<String, ContinuationError> {
        let json = serde_json::to_string(self)
            .map_err(|err| ContinuationError::Serialize(err.to_string()))?;
        Ok(format!("{STATE_PREFIX}{}", urlencoding::encode(&json)))
    }

    /// Parses a fragment (with or without `#`). A fragment that does not
    /// start with `state=` carries no continuation and yields `Ok(None)`.
    pub fn from_fragment(fragment: &str) -> Result<Option<Self>, ContinuationError> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let Some(encoded) = fragment.strip_prefix(STATE_PREFIX) else {
            return Ok(None);
        };
        let json = urlencoding::decode(encoded)
            .map_err(|err| ContinuationError::Malformed(err.to_string()))?;
        let state: ContinuationState = serde_json::from_str(&json)
            .map_err(|err| ContinuationError::Malformed(err.to_string()))?;
        if state.version > CONTINUATION_VERSION {
            return Err(ContinuationError::UnsupportedVersion(state.version));
        }
        Ok(Some(state))
    }

    /// Pops the next URL and composes the address that carries the rest.
    /// Returns `None` once no URLs remain.
    pub fn plan_handoff(mut self, base_address: &str) -> Result<Option<Handoff>, ContinuationError> {
        let Some(navigate_to) = self.pop_next() else {
            return Ok(None);
        };
        let fragment = self.to_fragment()?;
        Ok(Some(Handoff {
            handoff_address: format!("{}#{fragment}", strip_fragment(base_address)),
            navigate_to,
            remaining: self.urls.len(),
        }))
    }
}

pub fn strip_fragment(address: &str) -> &str {
    match address.split_once('#') {
        Some((base, _)) => base,
        None => address,
    }
}

/// Fragment of an address, parsed with `url` when the address is absolute.
/// A bare `#...` string is accepted as a fragment on its own.
pub fn address_fragment(address: &str) -> Option<String> {
    if let Some(fragment) = address.strip_prefix('#') {
        return Some(fragment.to_string());
    }
    match url::Url::parse(address) {
        Ok(parsed) => parsed.fragment().map(ToOwned::to_owned),
        Err(_) => address.split_once('#').map(|(_, f)| f.to_string()),
    }
}
