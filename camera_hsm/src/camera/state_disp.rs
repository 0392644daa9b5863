use hsm_core::{events::Event, state::StateHandler};

use crate::camera::{
    camera_data::CameraDataRef, camera_events::CameraEvents, camera_states::CameraStates,
    CameraEngine,
};

/// Composite display mode wrapping playback and the menu; owns the LCD.
pub struct CameraStateDisp {
    data: CameraDataRef,
}

impl CameraStateDisp {
    pub fn new(data: CameraDataRef) -> Self {
        Self { data }
    }
}

impl StateHandler<CameraStates, CameraEvents, ()> for CameraStateDisp {
    fn on_event(
        &self,
        _hsm: &CameraEngine,
        event: &Event<CameraEvents>,
        _param: Option<&()>,
    ) -> Option<CameraEvents> {
        match event {
            Event::Entry => self.data.borrow_mut().record("Turn on LCD"),
            Event::Exit => self.data.borrow_mut().record("Turn off LCD"),
            Event::Init => {}
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
