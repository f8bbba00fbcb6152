use std::time::Duration;

use crate::continuation::Handoff;
use crate::marketplace::MarketplaceId;
use crate::subscription::Subscriber;

/// One outbound navigation; `target` doubles as the browser window name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOpen {
    pub target: MarketplaceId,
    pub url: String,
}

/// Fire-and-forget analytics event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub category: String,
    pub action: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open immediately in a new browsing context.
    OpenUrl(PlannedOpen),
    /// Open one after another; the runner draws each delay around `throttle`.
    ScheduleOpens {
        opens: Vec<PlannedOpen>,
        throttle: Duration,
    },
    StopSchedule,
    ResumeSchedule,
    ResetSchedule,
    HandOff { handoff: Handoff, grace: Duration },
    /// Replace the visible address without adding a history entry.
    ReplaceAddress { address: String },
    Track(AnalyticsEvent),
    SubmitSubscription(Subscriber),
}
