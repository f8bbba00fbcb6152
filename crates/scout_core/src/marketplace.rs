use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Literal token in a template URL that is replaced by the search term.
pub const SEARCH_PLACEHOLDER: &str = "|STRING|";

/// Stable identifier of a marketplace, independent of its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketplaceId {
    Facebook,
    Amazon,
    Ebay,
    EbaySold,
    Mercari,
}

impl MarketplaceId {
    pub const ALL: [MarketplaceId; 5] = [
        MarketplaceId::Facebook,
        MarketplaceId::Amazon,
        MarketplaceId::Ebay,
        MarketplaceId::EbaySold,
        MarketplaceId::Mercari,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarketplaceId::Facebook => "facebook",
            MarketplaceId::Amazon => "amazon",
            MarketplaceId::Ebay => "ebay",
            MarketplaceId::EbaySold => "ebay_sold",
            MarketplaceId::Mercari => "mercari",
        }
    }
}

impl fmt::Display for MarketplaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketplaceId {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketplaceId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownId(s.to_string()))
    }
}

/// Logical item condition, mapped to each marketplace's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    OpenBox,
    Refurbished,
    Renewed,
    Used,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::OpenBox,
        Condition::Refurbished,
        Condition::Renewed,
        Condition::Used,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::OpenBox => "open_box",
            Condition::Refurbished => "refurbished",
            Condition::Renewed => "renewed",
            Condition::Used => "used",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::OpenBox => "Open box",
            Condition::Refurbished => "Refurbished",
            Condition::Renewed => "Renewed",
            Condition::Used => "Used",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownId(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownId(pub String);

impl fmt::Display for UnknownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown identifier {:?}", self.0)
    }
}

impl std::error::Error for UnknownId {}

/// Query-parameter names a marketplace uses for the price bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceParams {
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}

/// How a marketplace encodes the selected item conditions.
///
/// The produced parameter is `&{param}={prefix}{codes joined by separator}`.
/// With `first_only` set, only the first mapped code is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEncoding {
    pub param: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub separator: String,
    #[serde(default)]
    pub first_only: bool,
    pub codes: BTreeMap<Condition, String>,
}

impl ConditionEncoding {
    pub fn code(&self, condition: Condition) -> Option<&str> {
        self.codes.get(&condition).map(String::as_str)
    }

    pub fn supports(&self, condition: Condition) -> bool {
        self.codes.contains_key(&condition)
    }
}

/// Configuration record describing how to build a search URL for one marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceDescriptor {
    pub id: MarketplaceId,
    pub name: String,
    pub icon: String,
    pub template: String,
    #[serde(default)]
    pub price_params: PriceParams,
    #[serde(default)]
    pub conditions: Option<ConditionEncoding>,
}

impl MarketplaceDescriptor {
    pub fn supported_conditions(&self) -> Vec<Condition> {
        match &self.conditions {
            Some(encoding) => Condition::ALL
                .into_iter()
                .filter(|c| encoding.supports(*c))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Ordered set of marketplace descriptors. Order drives the order of built URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    marketplaces: Vec<MarketplaceDescriptor>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Later descriptors with an already-seen id are dropped.
    pub fn new(descriptors: Vec<MarketplaceDescriptor>) -> Self {
        let mut marketplaces: Vec<MarketplaceDescriptor> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if marketplaces.iter().all(|m| m.id != descriptor.id) {
                marketplaces.push(descriptor);
            }
        }
        Self { marketplaces }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            facebook(),
            amazon(),
            ebay(),
            ebay_sold(),
            mercari(),
        ])
    }

    pub fn get(&self, id: MarketplaceId) -> Option<&MarketplaceDescriptor> {
        self.marketplaces.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketplaceDescriptor> {
        self.marketplaces.iter()
    }

    pub fn len(&self) -> usize {
        self.marketplaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marketplaces.is_empty()
    }
}

fn codes(pairs: &[(Condition, &str)]) -> BTreeMap<Condition, String> {
    pairs
        .iter()
        .map(|(condition, code)| (*condition, (*code).to_string()))
        .collect()
}

fn facebook() -> MarketplaceDescriptor {
    MarketplaceDescriptor {
        id: MarketplaceId::Facebook,
        name: "Facebook Marketplace".to_string(),
        icon: "facebook.svg".to_string(),
        template: "https://www.facebook.com/marketplace/search?query=|STRING|&exact=false&radius=805&deliveryMethod=shipping".to_string(),
        price_params: PriceParams {
            min: Some("minPrice".to_string()),
            max: Some("maxPrice".to_string()),
        },
        conditions: Some(ConditionEncoding {
            param: "itemCondition".to_string(),
            prefix: String::new(),
            separator: "%2C".to_string(),
            first_only: false,
            codes: codes(&[(Condition::New, "new"), (Condition::Used, "used")]),
        }),
    }
}

fn amazon() -> MarketplaceDescriptor {
    MarketplaceDescriptor {
        id: MarketplaceId::Amazon,
        name: "Amazon".to_string(),
        icon: "amazon.png".to_string(),
        template: "https://www.amazon.com/s?k=|STRING|&tag=autoreplen-20".to_string(),
        price_params: PriceParams::default(),
        conditions: Some(ConditionEncoding {
            param: "rh".to_string(),
            prefix: "n%3A21514055011%2Cp_n_condition-type%3A".to_string(),
            separator: String::new(),
            first_only: true,
            codes: codes(&[
                (Condition::New, "6503240011"),
                (Condition::Renewed, "16907722011"),
                (Condition::Used, "6503242011"),
            ]),
        }),
    }
}

fn ebay_conditions() -> ConditionEncoding {
    ConditionEncoding {
        param: "LH_ItemCondition".to_string(),
        prefix: String::new(),
        separator: "|".to_string(),
        first_only: false,
        codes: codes(&[
            (Condition::New, "1000"),
            (Condition::OpenBox, "1500"),
            (Condition::Refurbished, "2010|2020|2030"),
            (Condition::Used, "3000"),
        ]),
    }
}

const EBAY_TEMPLATE: &str = "https://www.ebay.com/sch/i.html?_nkw=|STRING|&mkcid=1&mkrid=711-53200-19255-0&siteid=0&campid=5339103825&customid=&toolid=10001&mkevt=1";

fn ebay_price_params() -> PriceParams {
    PriceParams {
        min: Some("_udlo".to_string()),
        max: Some("_udhi".to_string()),
    }
}

fn ebay() -> MarketplaceDescriptor {
    MarketplaceDescriptor {
        id: MarketplaceId::Ebay,
        name: "eBay".to_string(),
        icon: "ebay.svg".to_string(),
        template: EBAY_TEMPLATE.to_string(),
        price_params: ebay_price_params(),
        conditions: Some(ebay_conditions()),
    }
}

fn ebay_sold() -> MarketplaceDescriptor {
    MarketplaceDescriptor {
        id: MarketplaceId::EbaySold,
        name: "eBay (Sold)".to_string(),
        icon: "ebay.svg".to_string(),
        template: format!("{EBAY_TEMPLATE}&LH_Sold=1&LH_Complete=1"),
        price_params: ebay_price_params(),
        conditions: Some(ebay_conditions()),
    }
}

fn mercari() -> MarketplaceDescriptor {
    MarketplaceDescriptor {
        id: MarketplaceId::Mercari,
        name: "Mercari".to_string(),
        icon: "mercari.svg".to_string(),
        template: "https://www.mercari.com/search/?keyword=|STRING|".to_string(),
        price_params: PriceParams {
            min: Some("priceMin".to_string()),
            max: Some("priceMax".to_string()),
        },
        conditions: Some(ConditionEncoding {
            param: "itemConditions".to_string(),
            prefix: String::new(),
            separator: "-".to_string(),
            first_only: false,
            codes: codes(&[(Condition::New, "1"), (Condition::Used, "2-3-4-5")]),
        }),
    }
}
