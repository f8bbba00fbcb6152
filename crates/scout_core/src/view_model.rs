use crate::marketplace::{Condition, MarketplaceId};
use crate::profit::ProfitEstimate;
use crate::state::{ScheduleStatus, SubscriptionStatus};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub search_term: String,
    pub min_price: String,
    pub max_price: String,
    pub marketplaces: Vec<MarketplaceOption>,
    /// Conditions offered by at least one selected marketplace.
    pub conditions: Vec<ConditionOption>,
    pub can_search: bool,
    pub last_search_term: Option<String>,
    pub result_links: Vec<ResultLink>,
    pub opened_count: usize,
    pub schedule: ScheduleStatus,
    pub handoff_pending: bool,
    pub current_address: Option<String>,
    pub notice: Option<String>,
    pub profit: ProfitView,
    pub subscription: SubscriptionView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceOption {
    pub id: MarketplaceId,
    pub name: String,
    pub icon: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionOption {
    pub condition: Condition,
    pub label: String,
    pub checked: bool,
}

/// Clickable result for one marketplace; `target` is the window name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    pub target: MarketplaceId,
    pub name: String,
    pub icon: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfitView {
    pub estimate: Option<ProfitEstimate>,
    pub show_hint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubscriptionView {
    pub pitch: String,
    pub status: Option<SubscriptionStatus>,
}
