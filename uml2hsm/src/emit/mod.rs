//! Per-target-language code generation over the HSM model.
use std::io::{self, Write};

use crate::{errors::GeneratorError, model::Hsm};

mod c;

pub use c::CEmitter;

/// A code generator back-end. Output must be a pure function of the model,
/// so emitting the same model twice is byte-identical.
pub trait Emitter {
    fn emit(&self, hsm: &Hsm, out: &mut dyn Write) -> io::Result<()>;
}

/// Look up the back-end registered for `lang`.
pub fn emitter_for(lang: &str) -> Result<Box<dyn Emitter>, GeneratorError> {
    match lang {
        "c" => Ok(Box::new(CEmitter)),
        other => Err(GeneratorError::UnsupportedLanguage(other.to_string())),
    }
}
