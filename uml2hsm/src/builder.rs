//! Assembles the lexer's token stream into the ordered HSM model.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    lexer::{Lexeme, Token, UmlDocument},
    model::{Arm, Hsm, Note, StateEntry, Stereotype},
};

/// `evt [guard] / action` tail shared by event and transition lines.
static EVENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<event>\w+)(?:\s*\[(?P<guard>.*?)\])?(?:\s*/\s*(?P<action>.*))?$")
        .expect("event regex must compile")
});

static STEREO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<(.*)>>").expect("stereotype regex must compile"));

/// `<position> of <state>` association inside a note position.
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w*)\s+of\s+(\w*)\s*").expect("anchor regex must compile"));

/// Stateful accumulator driven by tokens. The nesting stack tracks which
/// composite state encloses the tokens currently being read.
pub struct ModelBuilder {
    hsm: Hsm,
    nesting: Vec<String>,
}

impl ModelBuilder {
    pub fn new(image: &str) -> Self {
        ModelBuilder {
            hsm: Hsm::new(image),
            nesting: Vec::new(),
        }
    }

    pub fn feed(&mut self, lexeme: &Lexeme) {
        match &lexeme.token {
            Token::Name(name) => self.hsm.name = name.clone(),
            Token::Nest(state) => {
                self.ensure_state(state);
                self.nesting.push(state.clone());
            }
            Token::Unnest => {
                if self.nesting.pop().is_none() {
                    log::warn!("Unmatched '}}' at offset {}", lexeme.offset);
                }
            }
            Token::Init { state, guard } => {
                self.ensure_state(state);
                match self.nesting.last().cloned() {
                    Some(parent) => {
                        // A nested initial transition becomes an init event
                        // on the enclosing composite state.
                        let evtact = match guard {
                            Some(guard) => format!("init {}", guard),
                            None => "init".to_string(),
                        };
                        self.add_event(&parent, &evtact, Some(state.clone()), lexeme.offset);
                    }
                    None => self.hsm.init = Some(state.clone()),
                }
            }
            Token::Event { state, evtact } => {
                self.ensure_state(state);
                self.add_event(state, evtact, None, lexeme.offset);
            }
            Token::Tran { src, dst, evtact } => {
                self.ensure_state(src);
                self.add_event(src, evtact, Some(dst.clone()), lexeme.offset);
            }
            Token::Note { pos, body } => self.add_note(pos.as_deref(), body),
        }
    }

    pub fn finish(self) -> Hsm {
        self.hsm
    }

    fn ensure_state(&mut self, state: &str) {
        if !self.hsm.states.contains_key(state) {
            self.hsm.states.insert(
                state.to_string(),
                StateEntry {
                    parent: self.nesting.last().cloned(),
                    events: IndexMap::new(),
                },
            );
        }
    }

    fn add_event(&mut self, state: &str, evtact: &str, target: Option<String>, offset: usize) {
        let caps = match EVENT_RE.captures(evtact) {
            Some(caps) => caps,
            None => {
                log::warn!("Unrecognized event fragment {:?} at offset {}", evtact, offset);
                return;
            }
        };
        let event = match caps.name("event") {
            Some(m) => m.as_str().to_string(),
            None => return,
        };
        let guard = caps.name("guard").map(|m| m.as_str().to_string());
        let action = caps.name("action").map(|m| m.as_str().to_string());

        let entry = match self.hsm.states.get_mut(state) {
            Some(entry) => entry,
            None => return, // every caller ensures the state first
        };
        let arms = entry.events.entry(event.clone()).or_default();
        match arms.iter_mut().find(|arm| arm.guard == guard) {
            Some(existing) => {
                // Last one wins, keeping the original source position.
                log::warn!(
                    "Event \"{}[{}]\" for state \"{}\" is being replaced",
                    event,
                    guard.as_deref().unwrap_or(""),
                    state
                );
                existing.action = action;
                existing.target = target;
            }
            None => arms.push(Arm {
                guard,
                action,
                target,
            }),
        }
        self.hsm.events.insert(event);
    }

    fn add_note(&mut self, pos: Option<&str>, body: &str) {
        let (stereotype, body) = match STEREO_RE.captures(body).and_then(|caps| caps.get(1)) {
            Some(tag) => {
                let stereotype = Stereotype::from_tag(tag.as_str()).unwrap_or_else(|| {
                    log::warn!(
                        "Unknown note stereotype <<{}>>, treating as comment",
                        tag.as_str()
                    );
                    Stereotype::Comment
                });
                let cleaned = body.replace(&format!("<<{}>>", tag.as_str()), "");
                (stereotype, cleaned)
            }
            None => (Stereotype::Comment, body.to_string()),
        };

        let anchor = pos
            .and_then(|p| ANCHOR_RE.captures(p))
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        // Drop blank lines, then strip the common leading indentation.
        let lines: Vec<&str> = body
            .split('\n')
            .filter(|line| !line.trim_start_matches(' ').is_empty())
            .collect();
        let indent = lines
            .iter()
            .map(|line| line.len() - line.trim_start_matches(' ').len())
            .min()
            .unwrap_or(0);
        let body: Vec<String> = lines.iter().map(|line| line[indent..].to_string()).collect();

        self.hsm
            .notes
            .entry(anchor)
            .or_default()
            .push(Note { stereotype, body });
    }
}

/// Build the model for one UML document.
pub fn build(doc: &UmlDocument) -> Hsm {
    let mut builder = ModelBuilder::new(&doc.image);
    for lexeme in &doc.lexemes {
        builder.feed(lexeme);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CAMERA_PUML, PUMP_PUML};

    fn parse_one(source: &str) -> Hsm {
        let models = crate::parse(source);
        assert_eq!(models.len(), 1);
        models.into_iter().next().unwrap()
    }

    #[test]
    fn camera_model_preserves_source_order() {
        let hsm = parse_one(CAMERA_PUML);

        assert_eq!(hsm.name, "Camera");
        assert_eq!(hsm.init.as_deref(), Some("Off"));

        let states: Vec<&String> = hsm.states.keys().collect();
        assert_eq!(states, vec!["Off", "On", "Shoot", "Disp", "Play", "Menu"]);

        let events: Vec<&String> = hsm.events.iter().collect();
        assert_eq!(
            events,
            vec!["entry", "exit", "PWR", "LOWBATT", "init", "RELEASE", "MODE"]
        );
    }

    #[test]
    fn nesting_assigns_parents() {
        let hsm = parse_one(CAMERA_PUML);

        assert_eq!(hsm.states["Off"].parent, None);
        assert_eq!(hsm.states["On"].parent, None);
        assert_eq!(hsm.states["Shoot"].parent.as_deref(), Some("On"));
        assert_eq!(hsm.states["Disp"].parent.as_deref(), Some("On"));
        assert_eq!(hsm.states["Play"].parent.as_deref(), Some("Disp"));
        assert_eq!(hsm.states["Menu"].parent.as_deref(), Some("Disp"));
    }

    #[test]
    fn nested_initial_becomes_an_init_event_on_the_composite() {
        let hsm = parse_one(CAMERA_PUML);

        let on_init = &hsm.states["On"].events["init"];
        assert_eq!(
            on_init,
            &vec![Arm {
                guard: None,
                action: None,
                target: Some("Shoot".to_string()),
            }]
        );

        let disp_init = &hsm.states["Disp"].events["init"];
        assert_eq!(disp_init[0].target.as_deref(), Some("Play"));
    }

    #[test]
    fn events_split_into_guard_action_and_target() {
        let hsm = parse_one(CAMERA_PUML);

        let on_events = &hsm.states["On"].events;
        assert_eq!(
            on_events["LOWBATT"],
            vec![Arm {
                guard: None,
                action: Some("beep_low_battery();".to_string()),
                target: None,
            }]
        );
        assert_eq!(
            on_events["PWR"],
            vec![Arm {
                guard: None,
                action: None,
                target: Some("Off".to_string()),
            }]
        );
    }

    #[test]
    fn duplicate_event_guard_pairs_are_replaced_in_place() {
        let hsm = parse_one(PUMP_PUML);

        let arms = &hsm.states["Idle"].events["START"];
        assert_eq!(arms.len(), 2);
        // The transition line re-used the guard of the first event line and
        // must have replaced it, keeping its position.
        assert_eq!(arms[0].guard.as_deref(), Some("pressure > MIN"));
        assert_eq!(arms[0].action, None);
        assert_eq!(arms[0].target.as_deref(), Some("Running"));
        assert_eq!(arms[1].guard, None);
        assert_eq!(arms[1].action.as_deref(), Some("alarm();"));
    }

    #[test]
    fn notes_attach_with_stereotype_and_dedented_body() {
        let hsm = parse_one(CAMERA_PUML);

        let includes = hsm.notes_for("Camera", Stereotype::Include);
        assert_eq!(includes, vec!["#include \"camera.h\""]);

        let comments = hsm.notes_for("Off", Stereotype::Comment);
        assert_eq!(comments, vec!["The camera is in low power mode"]);

        assert!(hsm.notes_for("Camera", Stereotype::Test).is_empty());
    }

    #[test]
    fn parsing_twice_yields_equal_models() {
        assert_eq!(parse_one(CAMERA_PUML), parse_one(CAMERA_PUML));
        assert_eq!(parse_one(PUMP_PUML), parse_one(PUMP_PUML));
    }

    #[test]
    fn stray_unnest_is_tolerated() {
        let source = "@startuml x\ntitle Stray\n}\n[*] --> A\n@enduml\n";
        let hsm = parse_one(source);
        assert_eq!(hsm.init.as_deref(), Some("A"));
        assert_eq!(hsm.states["A"].parent, None);
    }

    #[test]
    fn malformed_event_fragments_are_skipped() {
        let source = "@startuml x\ntitle Bad\n[*] --> A\nstate A : !!!\n@enduml\n";
        let hsm = parse_one(source);
        assert!(hsm.states["A"].events.is_empty());
    }
}
