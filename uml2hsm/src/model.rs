//! The ordered intermediate model sitting between the parser and the
//! emitters. Insertion order is preserved everywhere: the emitters rely on
//! source order for deterministic output.
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Tag on a UML note directing the emitter where to splice the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stereotype {
    Include,
    Code,
    Test,
    Comment,
}

impl Stereotype {
    pub fn from_tag(tag: &str) -> Option<Stereotype> {
        match tag {
            "include" => Some(Stereotype::Include),
            "code" => Some(Stereotype::Code),
            "test" => Some(Stereotype::Test),
            "comment" => Some(Stereotype::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub stereotype: Stereotype,
    /// Dedented, blank lines dropped.
    pub body: Vec<String>,
}

/// One guarded reaction of a state to an event. `guard: None` is the default
/// arm; `target: None` is an internal action without a transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arm {
    pub guard: Option<String>,
    pub action: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateEntry {
    /// `None` for top-level states.
    pub parent: Option<String>,
    /// Event name -> guard arms, both in source order.
    pub events: IndexMap<String, Vec<Arm>>,
}

/// A whole state machine as read from one `@startuml` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hsm {
    pub name: String,
    pub image: String,
    /// Top-level `[*] -->` target; nested ones become `init` events instead.
    pub init: Option<String>,
    pub states: IndexMap<String, StateEntry>,
    /// Every event name seen, in order of first appearance. Feeds the
    /// emitted event enumeration.
    pub events: IndexSet<String>,
    /// Notes keyed by the state (or machine) they are anchored to.
    /// Anchorless notes collect under the empty key.
    pub notes: IndexMap<String, Vec<Note>>,
}

impl Hsm {
    pub fn new(image: &str) -> Self {
        Hsm {
            name: String::new(),
            image: image.to_string(),
            init: None,
            states: IndexMap::new(),
            events: IndexSet::new(),
            notes: IndexMap::new(),
        }
    }

    /// Concatenated bodies of every `stereotype` note anchored at `anchor`,
    /// in source order.
    pub fn notes_for(&self, anchor: &str, stereotype: Stereotype) -> Vec<&str> {
        self.notes
            .get(anchor)
            .into_iter()
            .flatten()
            .filter(|note| note.stereotype == stereotype)
            .flat_map(|note| note.body.iter().map(String::as_str))
            .collect()
    }
}
