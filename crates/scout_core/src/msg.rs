use crate::marketplace::{Condition, MarketplaceId};
use crate::profit::ProfitField;
use crate::subscription::{AudienceMode, SubscriptionField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search box.
    SearchTermChanged(String),
    MinPriceChanged(String),
    MaxPriceChanged(String),
    MarketplaceToggled {
        marketplace: MarketplaceId,
        selected: bool,
    },
    ConditionToggled {
        condition: Condition,
        checked: bool,
    },
    /// User pressed Search (or Enter in the search box).
    SearchSubmitted,
    /// The application was loaded at this address, possibly carrying a
    /// continuation fragment.
    AddressLoaded(String),
    /// The platform opened a URL in a new browsing context.
    UrlOpened { url: String },
    /// The platform refused to open a new browsing context.
    NavigationBlocked { url: String },
    /// The hand-off tab opened and the current context moved on.
    HandOffCompleted { navigate_to: String },
    /// Remaining scheduled opens after a job fired.
    ScheduleProgress { remaining: usize },
    ScheduleFinished,
    StopClicked,
    ResumeClicked,
    ResetClicked,
    NoticeDismissed,
    ProfitInputChanged { field: ProfitField, value: String },
    ProfitCalculateClicked,
    SubscriptionFieldChanged {
        field: SubscriptionField,
        value: String,
    },
    SubscriptionSubmitted,
    AudienceModeChanged(AudienceMode),
    /// Fallback for placeholder wiring.
    NoOp,
}
