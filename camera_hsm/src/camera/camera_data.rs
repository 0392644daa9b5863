//! Shared data every camera state handler records onto.
use std::{cell::RefCell, rc::Rc};

pub type CameraDataRef = Rc<RefCell<CameraData>>;

/// Tape of observable side effects, in the order the hardware would see
/// them. Handlers append; the demo and the tests drain.
#[derive(Default)]
pub struct CameraData {
    tape: Vec<String>,
}

impl CameraData {
    pub fn new() -> CameraDataRef {
        Rc::new(RefCell::new(CameraData::default()))
    }

    pub fn record(&mut self, effect: &str) {
        println!("\t{}", effect);
        self.tape.push(effect.to_string());
    }

    /// Drain and return everything recorded since the last call.
    pub fn take_tape(&mut self) -> Vec<String> {
        self.tape.drain(..).collect()
    }
}
