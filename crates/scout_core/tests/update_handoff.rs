use std::sync::Once;
use std::time::Duration;

use pretty_assertions::assert_eq;
use scout_core::{
    update, AppState, Catalog, Condition, ContinuationState, Effect, MarketplaceId, Msg,
    OpenStrategy, SearchSnapshot, SessionSettings,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn handoff_state() -> AppState {
    AppState::with_settings(
        SessionSettings {
            strategy: OpenStrategy::HandOff,
            base_address: "https://flipscoutly.com/#stale".to_string(),
            ..SessionSettings::default()
        },
        Catalog::builtin(),
    )
}

fn handoff_of(effect: &Effect) -> (&scout_core::Handoff, Duration) {
    match effect {
        Effect::HandOff { handoff, grace } => (handoff, *grace),
        other => panic!("expected hand-off, got {other:?}"),
    }
}

#[test]
fn submit_hands_off_remaining_urls() {
    init_logging();
    let msgs = vec![
        Msg::SearchTermChanged("bicycle".into()),
        Msg::MarketplaceToggled {
            marketplace: MarketplaceId::Facebook,
            selected: true,
        },
        Msg::MarketplaceToggled {
            marketplace: MarketplaceId::Ebay,
            selected: true,
        },
        Msg::MarketplaceToggled {
            marketplace: MarketplaceId::Mercari,
            selected: true,
        },
        Msg::ConditionToggled {
            condition: Condition::New,
            checked: true,
        },
    ];
    let mut state = handoff_state();
    for msg in msgs {
        state = update(state, msg).0;
    }
    let (state, effects) = update(state, Msg::SearchSubmitted);

    assert_eq!(effects.len(), 2);
    let (handoff, grace) = handoff_of(&effects[0]);
    assert_eq!(grace, Duration::from_millis(500));
    assert!(handoff.navigate_to.starts_with("https://www.facebook.com/"));
    assert_eq!(handoff.remaining, 2);
    assert!(handoff
        .handoff_address
        .starts_with("https://flipscoutly.com/#state="));
    assert!(state.is_busy());

    let fragment = handoff.handoff_address.split_once('#').unwrap().1;
    let carried = ContinuationState::from_fragment(fragment).unwrap().unwrap();
    assert!(carried.urls[0].starts_with("https://www.ebay.com/"));
    assert!(carried.urls[1].starts_with("https://www.mercari.com/"));
    assert_eq!(carried.search_term, "bicycle");
}

#[test]
fn submitted_term_is_trimmed_everywhere() {
    init_logging();
    let mut state = handoff_state();
    for msg in [
        Msg::SearchTermChanged("  road bike ".into()),
        Msg::MarketplaceToggled {
            marketplace: MarketplaceId::Ebay,
            selected: true,
        },
        Msg::MarketplaceToggled {
            marketplace: MarketplaceId::Mercari,
            selected: true,
        },
    ] {
        state = update(state, msg).0;
    }
    let (state, effects) = update(state, Msg::SearchSubmitted);

    let (handoff, _) = handoff_of(&effects[0]);
    assert!(handoff.navigate_to.contains("_nkw=road%20bike&"));
    let fragment = handoff.handoff_address.split_once('#').unwrap().1;
    let carried = ContinuationState::from_fragment(fragment).unwrap().unwrap();
    assert_eq!(carried.search_term, "road bike");
    assert_eq!(carried.to_snapshot().term, "road bike");
    assert_eq!(state.view().last_search_term.as_deref(), Some("road bike"));
}

#[test]
fn loaded_continuation_restores_form_and_continues() {
    init_logging();
    let search = SearchSnapshot::new("lamp")
        .with_marketplace(MarketplaceId::Amazon)
        .with_marketplace(MarketplaceId::Mercari)
        .with_condition(Condition::Used)
        .with_prices("", "80");
    let carried = ContinuationState::from_snapshot(
        &search,
        vec!["https://b.example".into(), "https://c.example".into()],
    );
    let address = format!(
        "https://flipscoutly.com/?ref=x#{}",
        carried.to_fragment().unwrap()
    );

    let (state, effects) = update(handoff_state(), Msg::AddressLoaded(address));
    let view = state.view();

    assert_eq!(view.search_term, "lamp");
    assert_eq!(view.max_price, "80");
    assert_eq!(
        view.current_address.as_deref(),
        Some("https://flipscoutly.com/?ref=x")
    );
    assert_eq!(
        effects[0],
        Effect::ReplaceAddress {
            address: "https://flipscoutly.com/?ref=x".into()
        }
    );
    let (handoff, _) = handoff_of(&effects[1]);
    assert_eq!(handoff.navigate_to, "https://b.example");
    assert!(handoff
        .handoff_address
        .starts_with("https://flipscoutly.com/?ref=x#state="));
    assert_eq!(handoff.remaining, 1);
}

#[test]
fn exhausted_continuation_ends_the_chain() {
    init_logging();
    let carried = ContinuationState::from_snapshot(&SearchSnapshot::new("lamp"), Vec::new());
    let address = format!("https://flipscoutly.com/#{}", carried.to_fragment().unwrap());

    let (state, effects) = update(handoff_state(), Msg::AddressLoaded(address));

    assert_eq!(
        effects,
        vec![Effect::ReplaceAddress {
            address: "https://flipscoutly.com/".into()
        }]
    );
    assert!(!state.is_busy());
    assert_eq!(state.view().search_term, "lamp");
}

#[test]
fn malformed_fragment_falls_back_to_blank_state() {
    init_logging();
    let (state, _) = update(handoff_state(), Msg::SearchTermChanged("typed".into()));

    let (state, effects) = update(
        state,
        Msg::AddressLoaded("https://flipscoutly.com/#state=not-json".into()),
    );

    let view = state.view();
    assert_eq!(view.search_term, "");
    assert!(view.marketplaces.iter().all(|m| !m.selected));
    assert_eq!(
        effects,
        vec![Effect::ReplaceAddress {
            address: "https://flipscoutly.com/".into()
        }]
    );
    assert!(!state.is_busy());
}

#[test]
fn address_without_state_fragment_changes_nothing() {
    init_logging();
    let state = handoff_state();
    let (next, effects) = update(state.clone(), Msg::AddressLoaded("https://flipscoutly.com/#faq".into()));
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn blocked_handoff_abandons_chain() {
    init_logging();
    let mut state = handoff_state();
    for msg in [
        Msg::SearchTermChanged("chair".into()),
        Msg::MarketplaceToggled {
            marketplace: MarketplaceId::Ebay,
            selected: true,
        },
        Msg::SearchSubmitted,
    ] {
        state = update(state, msg).0;
    }
    assert!(state.is_busy());

    let (state, effects) = update(
        state,
        Msg::NavigationBlocked {
            url: "https://flipscoutly.com/#state=...".into(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.is_busy());
    assert!(state.view().notice.is_some());
}

#[test]
fn completed_handoff_counts_the_navigation() {
    init_logging();
    let (state, _) = update(
        handoff_state(),
        Msg::HandOffCompleted {
            navigate_to: "https://a.example".into(),
        },
    );
    assert_eq!(state.view().opened_count, 1);
}
