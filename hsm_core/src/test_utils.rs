//! Contains structs and data useful across the module when running tests
use std::{cell::RefCell, rc::Rc};

use crate::{
    examples::{ApexState, BranchState, DemoEvents, DemoStates, LeafState, PeerState, TapeRef},
    state_engine::HsmEngine,
};

pub fn new_tape() -> TapeRef {
    Rc::new(RefCell::new(Vec::new()))
}

/// Assemble the demo machine from `examples` with every handler wired to one
/// shared tape. The caller picks the initial state.
pub fn create_test_hsm() -> (HsmEngine<DemoStates, DemoEvents, ()>, TapeRef) {
    let tape = new_tape();
    let engine = HsmEngine::new("TestHsm");
    engine
        .add_state(DemoStates::Apex, ApexState::new(tape.clone()), None)
        .unwrap();
    engine
        .add_state(
            DemoStates::Branch,
            BranchState::new(tape.clone()),
            Some(DemoStates::Apex),
        )
        .unwrap();
    engine
        .add_state(
            DemoStates::Leaf,
            LeafState::new(tape.clone()),
            Some(DemoStates::Branch),
        )
        .unwrap();
    engine
        .add_state(
            DemoStates::Peer,
            PeerState::new(tape.clone()),
            Some(DemoStates::Apex),
        )
        .unwrap();
    (engine, tape)
}

/// Drain and return everything recorded so far.
pub fn take_tape(tape: &TapeRef) -> Vec<String> {
    tape.borrow_mut().drain(..).collect()
}
