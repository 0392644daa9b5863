use thiserror::Error;

pub type HsmResult<T> = std::result::Result<T, HsmError>;

/// Construction-time failures. Anything that can go wrong once the machine is
/// running (illegal transitions, dropped events) is logged and degraded to a
/// no-op instead, so handlers never have to unwind.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HsmError {
    #[error("State {0} was already added to this machine")]
    DuplicateState(String),
    #[error("Parent {parent} of state {state} is not a state of this machine")]
    InvalidParent { state: String, parent: String },
    #[error("{0} is not a state of this machine")]
    NotAState(String),
}
