use hsm_core::{events::Event, state::StateHandler};

use crate::camera::{
    camera_data::CameraDataRef, camera_events::CameraEvents, camera_states::CameraStates,
    CameraEngine,
};

/// Playback: browse the stored pictures; MODE moves on to the menu.
pub struct CameraStatePlay {
    data: CameraDataRef,
}

impl CameraStatePlay {
    pub fn new(data: CameraDataRef) -> Self {
        Self { data }
    }
}

impl StateHandler<CameraStates, CameraEvents, ()> for CameraStatePlay {
    fn on_event(
        &self,
        hsm: &CameraEngine,
        event: &Event<CameraEvents>,
        param: Option<&()>,
    ) -> Option<CameraEvents> {
        match event {
            Event::Entry => self.data.borrow_mut().record("Display Pictures"),
            Event::Exit | Event::Init => {}
            Event::User(CameraEvents::Mode) => hsm.tran(CameraStates::OnDispMenu, param),
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
