use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::marketplace::{Catalog, MarketplaceId};
use crate::profit::{ProfitEstimate, ProfitInputs};
use crate::search::SearchSnapshot;
use crate::subscription::{AudienceMode, SubscriptionForm};
use crate::view_model::{
    AppViewModel, ConditionOption, MarketplaceOption, ProfitView, ResultLink, SubscriptionView,
};

pub const POPUP_BLOCKED_NOTICE: &str =
    "Your browser blocked a new tab. Please allow pop-ups for this site and search again.";

/// How a search with several targets opens them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenStrategy {
    /// Open from this context, paced by the delay queue.
    #[default]
    Queue,
    /// One target per new context, chained through the `#state=` fragment.
    HandOff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub strategy: OpenStrategy,
    /// Target delay between scheduled opens; zero opens everything at once.
    pub throttle: Duration,
    /// Pause between opening the hand-off context and navigating this one.
    pub grace: Duration,
    /// Never open anything programmatically; only render result links.
    pub links_only: bool,
    pub base_address: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            strategy: OpenStrategy::Queue,
            throttle: Duration::ZERO,
            grace: Duration::from_millis(500),
            links_only: false,
            base_address: "https://flipscoutly.com/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleStatus {
    #[default]
    Idle,
    Running {
        remaining: usize,
    },
    Stopped {
        remaining: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Subscribed { email: String },
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    search: SearchSnapshot,
    catalog: Catalog,
    settings: SessionSettings,
    last_search_term: Option<String>,
    result_links: Vec<ResultLink>,
    opened_urls: Vec<String>,
    schedule: ScheduleStatus,
    handoff_pending: bool,
    current_address: Option<String>,
    notice: Option<String>,
    profit_inputs: ProfitInputs,
    profit: Option<ProfitEstimate>,
    subscription: SubscriptionForm,
    subscription_status: Option<SubscriptionStatus>,
    audience: AudienceMode,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SessionSettings, catalog: Catalog) -> Self {
        Self {
            settings,
            catalog,
            ..Self::default()
        }
    }

    pub fn search(&self) -> &SearchSnapshot {
        &self.search
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn schedule(&self) -> ScheduleStatus {
        self.schedule
    }

    /// True while navigations are still expected from the platform.
    pub fn is_busy(&self) -> bool {
        self.handoff_pending || matches!(self.schedule, ScheduleStatus::Running { .. })
    }

    pub fn view(&self) -> AppViewModel {
        let marketplaces = self
            .catalog
            .iter()
            .map(|m| MarketplaceOption {
                id: m.id,
                name: m.name.clone(),
                icon: m.icon.clone(),
                selected: self.search.marketplaces.contains(&m.id),
            })
            .collect();

        let mut offered = Vec::new();
        for descriptor in self
            .catalog
            .iter()
            .filter(|m| self.search.marketplaces.contains(&m.id))
        {
            for condition in descriptor.supported_conditions() {
                if !offered.contains(&condition) {
                    offered.push(condition);
                }
            }
        }
        offered.sort();
        let conditions = offered
            .into_iter()
            .map(|condition| ConditionOption {
                condition,
                label: condition.label().to_string(),
                checked: self.search.conditions.contains(&condition),
            })
            .collect();

        AppViewModel {
            search_term: self.search.term.clone(),
            min_price: self.search.min_price.clone(),
            max_price: self.search.max_price.clone(),
            marketplaces,
            conditions,
            can_search: self.search.is_submittable(),
            last_search_term: self.last_search_term.clone(),
            result_links: self.result_links.clone(),
            opened_count: self.opened_urls.len(),
            schedule: self.schedule,
            handoff_pending: self.handoff_pending,
            current_address: self.current_address.clone(),
            notice: self.notice.clone(),
            profit: ProfitView {
                estimate: self.profit,
                show_hint: self.profit.is_none() && !self.profit_inputs.is_blank(),
            },
            subscription: SubscriptionView {
                pitch: self.audience.pitch().to_string(),
                status: self.subscription_status.clone(),
            },
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn search_mut(&mut self) -> &mut SearchSnapshot {
        self.dirty = true;
        &mut self.search
    }

    pub(crate) fn replace_search(&mut self, search: SearchSnapshot) {
        self.search = search;
        self.dirty = true;
    }

    pub(crate) fn set_results(&mut self, term: String, links: Vec<ResultLink>) {
        self.last_search_term = Some(term);
        self.result_links = links;
        self.opened_urls.clear();
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn record_opened(&mut self, url: String) {
        self.opened_urls.push(url);
        self.dirty = true;
    }

    pub(crate) fn set_schedule(&mut self, schedule: ScheduleStatus) {
        if self.schedule != schedule {
            self.schedule = schedule;
            self.dirty = true;
        }
    }

    pub(crate) fn set_handoff_pending(&mut self, pending: bool) {
        if self.handoff_pending != pending {
            self.handoff_pending = pending;
            self.dirty = true;
        }
    }

    pub(crate) fn set_current_address(&mut self, address: String) {
        self.current_address = Some(address);
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        if self.notice != notice {
            self.notice = notice;
            self.dirty = true;
        }
    }

    pub(crate) fn profit_inputs_mut(&mut self) -> &mut ProfitInputs {
        self.dirty = true;
        &mut self.profit_inputs
    }

    pub(crate) fn profit_inputs(&self) -> &ProfitInputs {
        &self.profit_inputs
    }

    pub(crate) fn set_profit(&mut self, estimate: Option<ProfitEstimate>) {
        self.profit = estimate;
        self.dirty = true;
    }

    pub(crate) fn subscription_mut(&mut self) -> &mut SubscriptionForm {
        self.dirty = true;
        &mut self.subscription
    }

    pub(crate) fn subscription(&self) -> &SubscriptionForm {
        &self.subscription
    }

    pub(crate) fn set_subscription_status(&mut self, status: SubscriptionStatus) {
        self.subscription_status = Some(status);
        self.dirty = true;
    }

    pub(crate) fn set_audience(&mut self, audience: AudienceMode) {
        if self.audience != audience {
            self.audience = audience;
            self.dirty = true;
        }
    }

    pub(crate) fn is_marketplace_known(&self, id: MarketplaceId) -> bool {
        self.catalog.get(id).is_some()
    }
}
