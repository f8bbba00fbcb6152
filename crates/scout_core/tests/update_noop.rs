use scout_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn dismissing_absent_notice_leaves_state_clean() {
    let mut state = AppState::new();
    assert!(!state.consume_dirty());

    let (mut next, effects) = update(state, Msg::NoticeDismissed);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
