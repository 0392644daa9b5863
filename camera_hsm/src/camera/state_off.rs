use hsm_core::{events::Event, state::StateHandler};

use crate::camera::{
    camera_data::CameraDataRef, camera_events::CameraEvents, camera_states::CameraStates,
    CameraEngine,
};

/// Low power mode. PWR wakes the camera up.
pub struct CameraStateOff {
    data: CameraDataRef,
}

impl CameraStateOff {
    pub fn new(data: CameraDataRef) -> Self {
        Self { data }
    }
}

impl StateHandler<CameraStates, CameraEvents, ()> for CameraStateOff {
    fn on_event(
        &self,
        hsm: &CameraEngine,
        event: &Event<CameraEvents>,
        param: Option<&()>,
    ) -> Option<CameraEvents> {
        match event {
            Event::Entry => self.data.borrow_mut().record("Enter Low Power Mode"),
            Event::Exit => self.data.borrow_mut().record("Exit Low Power Mode"),
            Event::Init => {}
            Event::User(CameraEvents::Pwr) => hsm.tran(CameraStates::On, param),
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
