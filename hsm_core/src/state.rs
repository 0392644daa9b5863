//! This file contains the logic for an individual state and how states are
//! addressed and implemented by consumers.
use std::{fmt, hash::Hash, rc::Rc};

use crate::{
    events::{Event, EventConstraint},
    state_engine::HsmEngine,
};

/// All valid definitions of a 'class' of states must satisfy this.
/// States are keyed by their enum value; Display doubles as the state name in
/// debug output.
pub trait StateConstraint: fmt::Display + Clone + Eq + Hash + 'static {}

/// Address of a node in the state tree: the engine-owned root or a user state.
/// The root is addressable so transitions that collapse the whole hierarchy
/// can target it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<S> {
    Root,
    State(S),
}

impl<S> From<S> for Target<S> {
    fn from(state: S) -> Self {
        Target::State(state)
    }
}

/// Lets callers compare `engine.current()` against a bare state value.
impl<S: PartialEq> PartialEq<S> for Target<S> {
    fn eq(&self, other: &S) -> bool {
        matches!(self, Target::State(state) if state == other)
    }
}

impl<S: fmt::Display> fmt::Display for Target<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Root => write!(f, ":root:"),
            Target::State(state) => write!(f, "{}", state),
        }
    }
}

/// Definition of what makes a struct (or closure) a state's behavior.
/// A handler receives every event delivered to its state, including the
/// pseudo-events raised while transitioning through it.
pub trait StateHandler<S: StateConstraint, E: EventConstraint, P: 'static> {
    /// # Return
    /// * `None` if the event was consumed. Dispatch halts.
    /// * `Some(event)` to defer to the parent state, possibly remapping the
    ///   event on the way up. Return values are ignored for pseudo-events.
    fn on_event(&self, hsm: &HsmEngine<S, E, P>, event: &Event<E>, param: Option<&P>)
        -> Option<E>;
}

impl<S, E, P, F> StateHandler<S, E, P> for F
where
    S: StateConstraint,
    E: EventConstraint,
    P: 'static,
    F: Fn(&HsmEngine<S, E, P>, &Event<E>, Option<&P>) -> Option<E>,
{
    fn on_event(
        &self,
        hsm: &HsmEngine<S, E, P>,
        event: &Event<E>,
        param: Option<&P>,
    ) -> Option<E> {
        self(hsm, event, param)
    }
}

pub(crate) type HandlerRef<S, E, P> = Rc<dyn StateHandler<S, E, P>>;

/// Immutable descriptor of a registered state. Never mutated once built.
pub(crate) struct StateNode<S: StateConstraint, E: EventConstraint, P: 'static> {
    /// Depth below the root (the root sits at 0, parentless states at 1).
    pub(crate) level: u32,
    /// `None` nests the state directly under the engine's root.
    pub(crate) parent: Option<S>,
    pub(crate) handler: HandlerRef<S, E, P>,
}
