use enhancer_core::{update, EnhancerState, Msg};

#[test]
fn update_is_noop() {
    let state = EnhancerState::new(Default::default(), Default::default());
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
