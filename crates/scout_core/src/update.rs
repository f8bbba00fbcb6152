use scout_logging::{scout_debug, scout_info, scout_warn};

use crate::continuation::{address_fragment, strip_fragment, ContinuationState};
use crate::search::{build_all, SearchSnapshot};
use crate::state::{OpenStrategy, ScheduleStatus, SubscriptionStatus, POPUP_BLOCKED_NOTICE};
use crate::view_model::ResultLink;
use crate::{AnalyticsEvent, AppState, Effect, Msg, PlannedOpen};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchTermChanged(term) => {
            state.search_mut().term = term;
            Vec::new()
        }
        Msg::MinPriceChanged(value) => {
            state.search_mut().min_price = value;
            Vec::new()
        }
        Msg::MaxPriceChanged(value) => {
            state.search_mut().max_price = value;
            Vec::new()
        }
        Msg::MarketplaceToggled {
            marketplace,
            selected,
        } => {
            if !state.is_marketplace_known(marketplace) {
                scout_warn!("Ignoring toggle for marketplace {} not in catalog", marketplace);
                return (state, Vec::new());
            }
            let search = state.search_mut();
            if selected {
                search.marketplaces.insert(marketplace);
            } else {
                search.marketplaces.remove(&marketplace);
            }
            Vec::new()
        }
        Msg::ConditionToggled { condition, checked } => {
            let search = state.search_mut();
            if checked {
                search.conditions.insert(condition);
            } else {
                search.conditions.remove(&condition);
            }
            Vec::new()
        }
        Msg::SearchSubmitted => submit_search(&mut state),
        Msg::AddressLoaded(address) => load_address(&mut state, &address),
        Msg::UrlOpened { url } => {
            state.record_opened(url);
            Vec::new()
        }
        Msg::NavigationBlocked { url } => {
            scout_warn!("Navigation blocked: {}", url);
            state.set_handoff_pending(false);
            state.set_notice(Some(POPUP_BLOCKED_NOTICE.to_string()));
            Vec::new()
        }
        Msg::HandOffCompleted { navigate_to } => {
            state.set_handoff_pending(false);
            state.record_opened(navigate_to);
            Vec::new()
        }
        Msg::ScheduleProgress { remaining } => {
            if let ScheduleStatus::Running { .. } = state.schedule() {
                state.set_schedule(ScheduleStatus::Running { remaining });
            }
            Vec::new()
        }
        Msg::ScheduleFinished => {
            state.set_schedule(ScheduleStatus::Idle);
            Vec::new()
        }
        Msg::StopClicked => match state.schedule() {
            ScheduleStatus::Running { remaining } => {
                state.set_schedule(ScheduleStatus::Stopped { remaining });
                vec![Effect::StopSchedule]
            }
            _ => Vec::new(),
        },
        Msg::ResumeClicked => match state.schedule() {
            ScheduleStatus::Stopped { remaining } => {
                state.set_schedule(ScheduleStatus::Running { remaining });
                vec![Effect::ResumeSchedule]
            }
            _ => Vec::new(),
        },
        Msg::ResetClicked => match state.schedule() {
            ScheduleStatus::Idle => Vec::new(),
            _ => {
                state.set_schedule(ScheduleStatus::Idle);
                vec![Effect::ResetSchedule]
            }
        },
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
        Msg::ProfitInputChanged { field, value } => {
            state.profit_inputs_mut().set(field, value);
            Vec::new()
        }
        Msg::ProfitCalculateClicked => {
            let estimate = crate::profit::estimate(state.profit_inputs());
            state.set_profit(estimate);
            Vec::new()
        }
        Msg::SubscriptionFieldChanged { field, value } => {
            state.subscription_mut().set(field, value);
            Vec::new()
        }
        Msg::SubscriptionSubmitted => match state.subscription().validate() {
            Ok(subscriber) => {
                state.set_subscription_status(SubscriptionStatus::Subscribed {
                    email: subscriber.email.clone(),
                });
                *state.subscription_mut() = Default::default();
                vec![Effect::SubmitSubscription(subscriber)]
            }
            Err(err) => {
                state.set_subscription_status(SubscriptionStatus::Rejected(err.to_string()));
                Vec::new()
            }
        },
        Msg::AudienceModeChanged(mode) => {
            state.set_audience(mode);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_search(state: &mut AppState) -> Vec<Effect> {
    let mut search = state.search().clone();
    if !search.is_submittable() {
        return Vec::new();
    }
    // URLs, the continuation and analytics all see the same trimmed term.
    search.term = search.term.trim().to_string();

    let built = build_all(state.catalog(), &search);
    let links: Vec<ResultLink> = built
        .iter()
        .filter_map(|b| {
            state.catalog().get(b.marketplace).map(|m| ResultLink {
                target: b.marketplace,
                name: m.name.clone(),
                icon: m.icon.clone(),
                url: b.url.clone(),
            })
        })
        .collect();
    let term = search.term.clone();
    state.set_results(term.clone(), links);

    let settings = state.settings().clone();
    let mut effects = Vec::new();
    if settings.links_only {
        scout_info!("Links-only session; rendering {} result links", built.len());
    } else {
        match settings.strategy {
            OpenStrategy::Queue => {
                let opens: Vec<PlannedOpen> = built
                    .into_iter()
                    .map(|b| PlannedOpen {
                        target: b.marketplace,
                        url: b.url,
                    })
                    .collect();
                if settings.throttle.is_zero() {
                    effects.extend(opens.into_iter().map(Effect::OpenUrl));
                } else {
                    if state.schedule() != ScheduleStatus::Idle {
                        effects.push(Effect::ResetSchedule);
                    }
                    state.set_schedule(ScheduleStatus::Running {
                        remaining: opens.len(),
                    });
                    effects.push(Effect::ScheduleOpens {
                        opens,
                        throttle: settings.throttle,
                    });
                }
            }
            OpenStrategy::HandOff => {
                let urls = built.into_iter().map(|b| b.url).collect();
                let continuation = ContinuationState::from_snapshot(&search, urls);
                effects.extend(hand_off(state, continuation, &settings.base_address));
            }
        }
    }

    effects.push(Effect::Track(AnalyticsEvent {
        category: "search".to_string(),
        action: "search_multiple".to_string(),
        label: term,
    }));
    effects
}

fn load_address(state: &mut AppState, address: &str) -> Vec<Effect> {
    let Some(fragment) = address_fragment(address) else {
        return Vec::new();
    };
    let base = strip_fragment(address).to_string();

    let continuation = match ContinuationState::from_fragment(&fragment) {
        Ok(Some(continuation)) => continuation,
        Ok(None) => return Vec::new(),
        Err(err) => {
            scout_warn!("Discarding continuation state: {}", err);
            state.replace_search(SearchSnapshot::default());
            state.set_current_address(base.clone());
            return vec![Effect::ReplaceAddress { address: base }];
        }
    };

    scout_debug!(
        "Restoring continuation with {} remaining urls",
        continuation.urls.len()
    );
    state.replace_search(continuation.to_snapshot());
    state.set_current_address(base.clone());
    let mut effects = vec![Effect::ReplaceAddress {
        address: base.clone(),
    }];

    if continuation.urls.is_empty() {
        return effects;
    }
    if state.settings().links_only {
        scout_info!("Links-only session; not continuing the hand-off chain");
        return effects;
    }
    effects.extend(hand_off(state, continuation, &base));
    effects
}

fn hand_off(state: &mut AppState, continuation: ContinuationState, base: &str) -> Vec<Effect> {
    match continuation.plan_handoff(base) {
        Ok(Some(handoff)) => {
            state.set_handoff_pending(true);
            vec![Effect::HandOff {
                handoff,
                grace: state.settings().grace,
            }]
        }
        Ok(None) => Vec::new(),
        Err(err) => {
            scout_warn!("Could not encode continuation state: {}", err);
            state.set_notice(Some(format!("Could not continue the search: {err}")));
            Vec::new()
        }
    }
}
