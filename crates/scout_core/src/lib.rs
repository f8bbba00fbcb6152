//! FlipScout core: marketplace URL building, the delay queue and continuation
//! state machines, and the pure `update` function driving the search form.
mod continuation;
mod delay_queue;
mod effect;
mod marketplace;
mod msg;
mod profit;
mod search;
mod state;
mod subscription;
mod throttle;
mod update;
mod view_model;

pub use continuation::{
    address_fragment, strip_fragment, ContinuationError, ContinuationState, Handoff,
    CONTINUATION_VERSION, STATE_PREFIX,
};
pub use delay_queue::{DelayQueue, Fired, JobId, QueueError, ScheduledJob, TimerRequest, TimerToken};
pub use effect::{AnalyticsEvent, Effect, PlannedOpen};
pub use marketplace::{
    Catalog, Condition, ConditionEncoding, MarketplaceDescriptor, MarketplaceId, PriceParams,
    UnknownId, SEARCH_PLACEHOLDER,
};
pub use msg::Msg;
pub use profit::{
    estimate as estimate_profit, ChannelEstimate, ProfitEstimate, ProfitField, ProfitInputs,
    AMAZON_FEE_RATE, EBAY_FEE_RATE, MISSING_INPUT_HINT,
};
pub use search::{build_all, build_search_url, BuiltUrl, SearchSnapshot};
pub use state::{
    AppState, OpenStrategy, ScheduleStatus, SessionSettings, SubscriptionStatus,
    POPUP_BLOCKED_NOTICE,
};
pub use subscription::{
    AudienceMode, Subscriber, SubscriptionError, SubscriptionField, SubscriptionForm,
};
pub use throttle::{jittered_delay, JITTER_RATIO};
pub use update::update;
pub use view_model::{
    AppViewModel, ConditionOption, MarketplaceOption, ProfitView, ResultLink, SubscriptionView,
};
