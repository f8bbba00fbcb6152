use std::collections::BTreeSet;

use crate::marketplace::{Catalog, Condition, MarketplaceDescriptor, MarketplaceId, SEARCH_PLACEHOLDER};

/// Immutable value of the search form, passed by value to URL building and
/// to the continuation encoder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSnapshot {
    pub term: String,
    pub min_price: String,
    pub max_price: String,
    pub marketplaces: BTreeSet<MarketplaceId>,
    pub conditions: BTreeSet<Condition>,
}

impl SearchSnapshot {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn with_marketplace(mut self, id: MarketplaceId) -> Self {
        self.marketplaces.insert(id);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.insert(condition);
        self
    }

    pub fn with_prices(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min_price = min.into();
        self.max_price = max.into();
        self
    }

    /// A search needs a non-blank term and at least one marketplace.
    pub fn is_submittable(&self) -> bool {
        !self.term.trim().is_empty() && !self.marketplaces.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltUrl {
    pub marketplace: MarketplaceId,
    pub url: String,
}

/// Builds the outbound search URL for one marketplace. Pure string construction.
///
/// The term and price bounds are trimmed before encoding, so surrounding
/// whitespace never reaches the marketplace.
pub fn build_search_url(descriptor: &MarketplaceDescriptor, search: &SearchSnapshot) -> String {
    let term = urlencoding::encode(search.term.trim());
    let mut url = descriptor.template.replace(SEARCH_PLACEHOLDER, &term);

    let bounds = [
        (descriptor.price_params.min.as_deref(), search.min_price.trim()),
        (descriptor.price_params.max.as_deref(), search.max_price.trim()),
    ];
    for (param, value) in bounds {
        if let Some(param) = param {
            if !value.is_empty() {
                url.push('&');
                url.push_str(param);
                url.push('=');
                url.push_str(&urlencoding::encode(value));
            }
        }
    }

    if let Some(encoding) = &descriptor.conditions {
        let mut mapped = search
            .conditions
            .iter()
            .filter_map(|condition| encoding.code(*condition));
        let value = if encoding.first_only {
            mapped.next().map(ToOwned::to_owned)
        } else {
            let joined = mapped.collect::<Vec<_>>().join(&encoding.separator);
            (!joined.is_empty()).then_some(joined)
        };
        if let Some(value) = value {
            url.push('&');
            url.push_str(&encoding.param);
            url.push('=');
            url.push_str(&encoding.prefix);
            url.push_str(&value);
        }
    }

    url
}

/// Builds URLs for every selected marketplace, in catalog order.
pub fn build_all(catalog: &Catalog, search: &SearchSnapshot) -> Vec<BuiltUrl> {
    catalog
        .iter()
        .filter(|descriptor| search.marketplaces.contains(&descriptor.id))
        .map(|descriptor| BuiltUrl {
            marketplace: descriptor.id,
            url: build_search_url(descriptor, search),
        })
        .collect()
}
