//! This file contains the logic behind events that can be delivered to states
use core::fmt;

/// Abstracts the requirements on user event enums into a trait.
/// Display is what shows up in the engine's debug lines.
pub trait EventConstraint: fmt::Display + 'static {}

/// An event as seen by a state handler: either one of the reserved
/// pseudo-events or a user event. The pseudo-events are generated by the
/// engine during transitions and can never be produced through `run`, so user
/// event codes cannot collide with them.
#[derive(Debug)]
pub enum Event<E> {
    Init,
    Entry,
    Exit,
    User(E),
}

impl<E: fmt::Display> fmt::Display for Event<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Event::Init => write!(f, "INIT"),
            Event::Entry => write!(f, "ENTRY"),
            Event::Exit => write!(f, "EXIT"),
            Event::User(event) => write!(f, "{}", event),
        }
    }
}
