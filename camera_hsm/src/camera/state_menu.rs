use hsm_core::{events::Event, state::StateHandler};

use crate::camera::{
    camera_data::CameraDataRef, camera_events::CameraEvents, camera_states::CameraStates,
    CameraEngine,
};

/// Menu settings; MODE cycles back around to shooting.
pub struct CameraStateMenu {
    data: CameraDataRef,
}

impl CameraStateMenu {
    pub fn new(data: CameraDataRef) -> Self {
        Self { data }
    }
}

impl StateHandler<CameraStates, CameraEvents, ()> for CameraStateMenu {
    fn on_event(
        &self,
        hsm: &CameraEngine,
        event: &Event<CameraEvents>,
        param: Option<&()>,
    ) -> Option<CameraEvents> {
        match event {
            Event::Entry => self.data.borrow_mut().record("Display Menu"),
            Event::Exit | Event::Init => {}
            Event::User(CameraEvents::Mode) => hsm.tran(CameraStates::OnShoot, param),
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
