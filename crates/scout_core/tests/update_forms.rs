use pretty_assertions::assert_eq;
use scout_core::{
    update, AppState, AudienceMode, Effect, Msg, ProfitField, Subscriber, SubscriptionField,
    SubscriptionStatus,
};

fn profit(state: AppState, cogs: &str, amazon: &str, ebay: &str) -> AppState {
    let mut state = state;
    for (field, value) in [
        (ProfitField::Cogs, cogs),
        (ProfitField::AmazonPrice, amazon),
        (ProfitField::EbayPrice, ebay),
    ] {
        state = update(
            state,
            Msg::ProfitInputChanged {
                field,
                value: value.to_string(),
            },
        )
        .0;
    }
    update(state, Msg::ProfitCalculateClicked).0
}

fn subscribe(first: &str, last: &str, email: &str) -> (AppState, Vec<Effect>) {
    let mut state = AppState::new();
    for (field, value) in [
        (SubscriptionField::FirstName, first),
        (SubscriptionField::LastName, last),
        (SubscriptionField::Email, email),
    ] {
        state = update(
            state,
            Msg::SubscriptionFieldChanged {
                field,
                value: value.to_string(),
            },
        )
        .0;
    }
    update(state, Msg::SubscriptionSubmitted)
}

#[test]
fn profit_applies_channel_fees() {
    let state = profit(AppState::new(), "10", "40", "$30");
    let estimate = state.view().profit.estimate.unwrap();

    assert!((estimate.amazon.profit - 24.0).abs() < 1e-9);
    assert!((estimate.amazon.roi_percent.unwrap() - 240.0).abs() < 1e-9);
    assert!((estimate.ebay.profit - 16.1).abs() < 1e-9);
    assert!((estimate.ebay.roi_percent.unwrap() - 161.0).abs() < 1e-9);
    assert!(!state.view().profit.show_hint);
}

#[test]
fn profit_with_zero_cogs_has_no_roi() {
    let state = profit(AppState::new(), "0", "10", "10");
    let estimate = state.view().profit.estimate.unwrap();
    assert_eq!(estimate.amazon.roi_percent, None);
}

#[test]
fn profit_hint_only_for_partial_input() {
    let state = profit(AppState::new(), "10", "", "abc");
    assert_eq!(state.view().profit.estimate, None);
    assert!(state.view().profit.show_hint);

    let state = profit(AppState::new(), "", "", "");
    assert!(!state.view().profit.show_hint);
}

#[test]
fn profit_hint_shows_as_soon_as_input_is_typed() {
    let state = AppState::new();
    assert!(!state.view().profit.show_hint);

    let (state, _) = update(
        state,
        Msg::ProfitInputChanged {
            field: ProfitField::Cogs,
            value: "12".to_string(),
        },
    );

    let view = state.view().profit;
    assert_eq!(view.estimate, None);
    assert!(view.show_hint);
}

#[test]
fn valid_subscription_is_submitted_and_form_cleared() {
    let (state, effects) = subscribe(" Ada ", "Lovelace", "ada@example.com");

    assert_eq!(
        effects,
        vec![Effect::SubmitSubscription(Subscriber {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
        })]
    );
    assert_eq!(
        state.view().subscription.status,
        Some(SubscriptionStatus::Subscribed {
            email: "ada@example.com".into()
        })
    );

    let (_state, effects) = update(state, Msg::SubscriptionSubmitted);
    assert!(effects.is_empty());
}

#[test]
fn invalid_subscription_is_rejected() {
    let (state, effects) = subscribe("Ada", "", "ada@example.com");
    assert!(effects.is_empty());
    assert_eq!(
        state.view().subscription.status,
        Some(SubscriptionStatus::Rejected("last name is required".into()))
    );

    let (state, _) = subscribe("Ada", "Lovelace", "ada.example.com");
    assert_eq!(
        state.view().subscription.status,
        Some(SubscriptionStatus::Rejected("email address is not valid".into()))
    );
}

#[test]
fn audience_mode_switches_pitch() {
    let before = AppState::new().view().subscription.pitch;
    let (state, _) = update(AppState::new(), Msg::AudienceModeChanged(AudienceMode::Collector));
    assert_ne!(state.view().subscription.pitch, before);
    assert!(state.view().subscription.pitch.contains("collection"));
}
