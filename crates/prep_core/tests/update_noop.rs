use prep_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn clearing_the_picker_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::DateSelected(None));

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
