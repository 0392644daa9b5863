//! Contains structs and infrastructure useful for minimal examples in docs
//! (and tests): a four-state machine that records everything its handlers do
//! onto a shared tape.
//!
//! ```text
//! :root:
//! └── Apex
//!     ├── Branch
//!     │   └── Leaf
//!     └── Peer
//! ```
use std::{cell::RefCell, rc::Rc};

use crate::{
    events::{Event, EventConstraint},
    state::{StateConstraint, StateHandler},
    state_engine::HsmEngine,
};

/// Side-effect tape shared by every handler of the demo machine.
pub type TapeRef = Rc<RefCell<Vec<String>>>;

#[derive(Clone, PartialEq, Eq, Hash, Debug, strum::Display)]
pub enum DemoStates {
    Apex,
    Branch,
    Leaf,
    Peer,
}

impl StateConstraint for DemoStates {}

#[derive(Clone, Debug, strum::Display)]
pub enum DemoEvents {
    /// Consumed by Apex only.
    Alpha,
    /// Consumed by Branch.
    Beta,
    /// Apex reacts by transitioning into Leaf.
    Descend,
    /// Leaf reacts by transitioning over to Peer.
    Hop,
    /// Nobody handles this one.
    Nop,
}

impl EventConstraint for DemoEvents {}

fn record(tape: &TapeRef, state: &str, what: &str) {
    tape.borrow_mut().push(format!("{}:{}", state, what));
}

pub struct ApexState {
    tape: TapeRef,
}

impl ApexState {
    pub fn new(tape: TapeRef) -> Self {
        Self { tape }
    }
}

impl StateHandler<DemoStates, DemoEvents, ()> for ApexState {
    fn on_event(
        &self,
        hsm: &HsmEngine<DemoStates, DemoEvents, ()>,
        event: &Event<DemoEvents>,
        param: Option<&()>,
    ) -> Option<DemoEvents> {
        match event {
            Event::Entry => record(&self.tape, "Apex", "ENTRY"),
            Event::Exit => record(&self.tape, "Apex", "EXIT"),
            Event::Init => record(&self.tape, "Apex", "INIT"),
            Event::User(DemoEvents::Alpha) => record(&self.tape, "Apex", "Alpha"),
            Event::User(DemoEvents::Descend) => hsm.tran(DemoStates::Leaf, param),
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}

pub struct BranchState {
    tape: TapeRef,
}

impl BranchState {
    pub fn new(tape: TapeRef) -> Self {
        Self { tape }
    }
}

impl StateHandler<DemoStates, DemoEvents, ()> for BranchState {
    fn on_event(
        &self,
        hsm: &HsmEngine<DemoStates, DemoEvents, ()>,
        event: &Event<DemoEvents>,
        param: Option<&()>,
    ) -> Option<DemoEvents> {
        match event {
            Event::Entry => record(&self.tape, "Branch", "ENTRY"),
            Event::Exit => record(&self.tape, "Branch", "EXIT"),
            Event::Init => {
                // Composite default: landing on Branch settles in Leaf.
                record(&self.tape, "Branch", "INIT");
                hsm.tran(DemoStates::Leaf, param);
            }
            Event::User(DemoEvents::Beta) => record(&self.tape, "Branch", "Beta"),
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}

pub struct LeafState {
    tape: TapeRef,
}

impl LeafState {
    pub fn new(tape: TapeRef) -> Self {
        Self { tape }
    }
}

impl StateHandler<DemoStates, DemoEvents, ()> for LeafState {
    fn on_event(
        &self,
        hsm: &HsmEngine<DemoStates, DemoEvents, ()>,
        event: &Event<DemoEvents>,
        param: Option<&()>,
    ) -> Option<DemoEvents> {
        match event {
            Event::Entry => record(&self.tape, "Leaf", "ENTRY"),
            Event::Exit => record(&self.tape, "Leaf", "EXIT"),
            Event::Init => record(&self.tape, "Leaf", "INIT"),
            Event::User(DemoEvents::Hop) => {
                record(&self.tape, "Leaf", "Hop");
                hsm.tran(DemoStates::Peer, param);
            }
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}

pub struct PeerState {
    tape: TapeRef,
}

impl PeerState {
    pub fn new(tape: TapeRef) -> Self {
        Self { tape }
    }
}

impl StateHandler<DemoStates, DemoEvents, ()> for PeerState {
    fn on_event(
        &self,
        _hsm: &HsmEngine<DemoStates, DemoEvents, ()>,
        event: &Event<DemoEvents>,
        _param: Option<&()>,
    ) -> Option<DemoEvents> {
        match event {
            Event::Entry => record(&self.tape, "Peer", "ENTRY"),
            Event::Exit => record(&self.tape, "Peer", "EXIT"),
            Event::Init => record(&self.tape, "Peer", "INIT"),
            // Peer defers every user event to Apex.
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
