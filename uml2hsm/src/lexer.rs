//! Single-pass tokenizer for the PlantUML state-diagram subset.
//!
//! One combined alternation scans each `@startuml` body left to right, so
//! tokens come out in source order and malformed fragments are simply never
//! tokenized. The whole pattern runs case-insensitive and multi-line, like
//! the original combined expression.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Extracts the `@startuml [image] ... @enduml` blocks of a document.
static DOC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)@startuml\s+(?P<image>\w*?)(?P<body>.*?)@enduml")
        .expect("document regex must compile")
});

/// All seven token shapes, tried in this order at every position:
/// machine name, initial transition, in-state event, transition, nesting
/// open/close, and the three note forms.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "(?im)",
        r"(?P<NAME>^\s*title\s*(?P<name>\w+)$)",
        "|",
        r"(?P<INIT>\[\s*\*\s*\]\s*-+(?:\w*-+)?>\s*(?P<istate>\w+)(?:\s*:\s*(?P<iguard>.*))?)",
        "|",
        r"(?P<EVENT>state\s+(?P<estate>\w*?)\s*:\s*(?P<eact>.*?)$)",
        "|",
        r"(?P<TRAN>(?P<tsrc>\w+)\s*-+(?:\w*-+)?>\s*(?P<tdst>\w+)\s*:\s*(?P<tact>.*?)$)",
        "|",
        r"(?P<NEST>state\s+(?P<nstate>\w+)\s+\{)",
        "|",
        r"(?P<UNNEST>\})",
        "|",
        r"(?P<NOTE1>note(?P<n1pos>.*)\s*:\s*(?P<n1body>.*)$)",
        "|",
        r"(?P<NOTE2>note(?P<n2pos>.*)(?P<n2body>(?:\n.+)+)\s*end note)",
        "|",
        r#"(?P<NOTE3>note\s+"(?P<n3body>.*)"\s+as\s+(?P<n3lbl>\w*)$)"#,
    ))
    .expect("token regex must compile")
});

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `title NAME`
    Name(String),
    /// `[*] --> STATE [: guard]`, relative to the current nesting.
    Init { state: String, guard: Option<String> },
    /// `state STATE : evt [guard] / action`
    Event { state: String, evtact: String },
    /// `SRC --> DST : evt [guard] / action`
    Tran {
        src: String,
        dst: String,
        evtact: String,
    },
    /// `state STATE {`
    Nest(String),
    /// `}`
    Unnest,
    /// Any of the three note forms; the `as LABEL` form has no position.
    Note { pos: Option<String>, body: String },
}

/// A token plus the byte offset it was found at, for warning messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub offset: usize,
    pub token: Token,
}

/// One `@startuml ... @enduml` block.
#[derive(Debug, Clone, PartialEq)]
pub struct UmlDocument {
    pub image: String,
    pub lexemes: Vec<Lexeme>,
}

/// Tokenize every UML block in `source`, in source order.
pub fn lex(source: &str) -> Vec<UmlDocument> {
    DOC_RE
        .captures_iter(source)
        .map(|doc| {
            let image = doc
                .name("image")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let lexemes = match doc.name("body") {
                Some(body) => TOKEN_RE
                    .captures_iter(body.as_str())
                    .filter_map(|caps| lexeme_of(&caps, body.start()))
                    .collect(),
                None => Vec::new(),
            };
            UmlDocument { image, lexemes }
        })
        .collect()
}

fn lexeme_of(caps: &Captures, base: usize) -> Option<Lexeme> {
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
    let lexeme = |offset: usize, token: Token| {
        Some(Lexeme {
            offset: base + offset,
            token,
        })
    };

    if let Some(m) = caps.name("NAME") {
        return lexeme(m.start(), Token::Name(group("name")?));
    }
    if let Some(m) = caps.name("INIT") {
        return lexeme(
            m.start(),
            Token::Init {
                state: group("istate")?,
                guard: group("iguard"),
            },
        );
    }
    if let Some(m) = caps.name("EVENT") {
        return lexeme(
            m.start(),
            Token::Event {
                state: group("estate")?,
                evtact: group("eact")?,
            },
        );
    }
    if let Some(m) = caps.name("TRAN") {
        return lexeme(
            m.start(),
            Token::Tran {
                src: group("tsrc")?,
                dst: group("tdst")?,
                evtact: group("tact")?,
            },
        );
    }
    if let Some(m) = caps.name("NEST") {
        return lexeme(m.start(), Token::Nest(group("nstate")?));
    }
    if let Some(m) = caps.name("UNNEST") {
        return lexeme(m.start(), Token::Unnest);
    }
    if let Some(m) = caps.name("NOTE1") {
        return lexeme(
            m.start(),
            Token::Note {
                pos: group("n1pos"),
                body: group("n1body")?,
            },
        );
    }
    if let Some(m) = caps.name("NOTE2") {
        return lexeme(
            m.start(),
            Token::Note {
                pos: group("n2pos"),
                body: group("n2body")?,
            },
        );
    }
    if let Some(m) = caps.name("NOTE3") {
        // The label is dropped; the note attaches to the machine itself.
        return lexeme(
            m.start(),
            Token::Note {
                pos: None,
                body: group("n3body")?,
            },
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_come_out_in_source_order() {
        let source = "@startuml demo\n\
                      title Widget\n\
                      [*] --> A\n\
                      state A : GO / go()\n\
                      A --> B : STOP [armed] / halt()\n\
                      state B {\n\
                      [*] --> C\n\
                      }\n\
                      note right of A : hello\n\
                      @enduml\n";
        let docs = lex(source);
        assert_eq!(docs.len(), 1);

        let tokens: Vec<&Token> = docs[0].lexemes.iter().map(|l| &l.token).collect();
        assert_eq!(
            tokens,
            vec![
                &Token::Name("Widget".to_string()),
                &Token::Init {
                    state: "A".to_string(),
                    guard: None,
                },
                &Token::Event {
                    state: "A".to_string(),
                    evtact: "GO / go()".to_string(),
                },
                &Token::Tran {
                    src: "A".to_string(),
                    dst: "B".to_string(),
                    evtact: "STOP [armed] / halt()".to_string(),
                },
                &Token::Nest("B".to_string()),
                &Token::Init {
                    state: "C".to_string(),
                    guard: None,
                },
                &Token::Unnest,
                &Token::Note {
                    pos: Some(" right of A ".to_string()),
                    body: "hello".to_string(),
                },
            ]
        );

        let offsets: Vec<usize> = docs[0].lexemes.iter().map(|l| l.offset).collect();
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn all_arrow_forms_are_accepted() {
        let source = "@startuml x\n\
                      A --> B : E1\n\
                      B -> C : E2\n\
                      C -down-> D : E3\n\
                      [*] -up-> A\n\
                      @enduml\n";
        let docs = lex(source);
        let kinds: Vec<&Token> = docs[0].lexemes.iter().map(|l| &l.token).collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(kinds[0], Token::Tran { .. }));
        assert!(matches!(kinds[1], Token::Tran { .. }));
        assert!(matches!(kinds[2], Token::Tran { .. }));
        assert!(matches!(kinds[3], Token::Init { .. }));
    }

    #[test]
    fn multiline_and_floating_notes_lex_as_single_tokens() {
        let source = "@startuml x\n\
                      note top of M\n\
                      \x20   <<code>>\n\
                      \x20   int count;\n\
                      end note\n\
                      note \"floating\" as N\n\
                      @enduml\n";
        let docs = lex(source);
        let tokens: Vec<&Token> = docs[0].lexemes.iter().map(|l| &l.token).collect();
        assert_eq!(tokens.len(), 2);
        match tokens[0] {
            Token::Note { pos: Some(pos), body } => {
                assert_eq!(pos, " top of M");
                assert!(body.contains("<<code>>"));
                assert!(body.contains("int count;"));
            }
            other => panic!("expected a positioned note, got {:?}", other),
        }
        assert_eq!(
            tokens[1],
            &Token::Note {
                pos: None,
                body: "floating".to_string(),
            }
        );
    }

    #[test]
    fn each_uml_block_becomes_its_own_document() {
        let source = "@startuml one\ntitle First\n@enduml\n\
                      @startuml two\ntitle Second\n@enduml\n";
        let docs = lex(source);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].lexemes.len(), 1);
        assert_eq!(docs[0].lexemes[0].token, Token::Name("First".to_string()));
        assert_eq!(docs[1].lexemes[0].token, Token::Name("Second".to_string()));
    }

    #[test]
    fn text_outside_uml_blocks_is_ignored() {
        let source = "title NotInAnyBlock\n\
                      @startuml x\ntitle Inside\n@enduml\n\
                      A --> B : TRAILING\n";
        let docs = lex(source);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].lexemes.len(), 1);
        assert_eq!(docs[0].lexemes[0].token, Token::Name("Inside".to_string()));
    }
}
