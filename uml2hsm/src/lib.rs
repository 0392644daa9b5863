pub mod builder;
pub mod emit;
pub mod errors;
pub mod lexer;
pub mod model;

#[cfg(test)]
pub mod test_utils;

/// Parse every `@startuml` block in `source` into an ordered HSM model.
pub fn parse(source: &str) -> Vec<model::Hsm> {
    lexer::lex(source).iter().map(builder::build).collect()
}
