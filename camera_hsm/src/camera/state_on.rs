use hsm_core::{events::Event, state::StateHandler};

use crate::camera::{
    camera_data::CameraDataRef, camera_events::CameraEvents, camera_states::CameraStates,
    CameraEngine,
};

/// Composite powered-on state. Its INIT handler settles the camera in the
/// shooting mode; LOWBATT is handled here for every child.
pub struct CameraStateOn {
    data: CameraDataRef,
}

impl CameraStateOn {
    pub fn new(data: CameraDataRef) -> Self {
        Self { data }
    }
}

impl StateHandler<CameraStates, CameraEvents, ()> for CameraStateOn {
    fn on_event(
        &self,
        hsm: &CameraEngine,
        event: &Event<CameraEvents>,
        param: Option<&()>,
    ) -> Option<CameraEvents> {
        match event {
            Event::Entry => self.data.borrow_mut().record("Open Lens"),
            Event::Exit => self.data.borrow_mut().record("Close Lens"),
            Event::Init => hsm.tran(CameraStates::OnShoot, param),
            Event::User(CameraEvents::Pwr) => hsm.tran(CameraStates::Off, param),
            Event::User(CameraEvents::LowBatt) => {
                self.data.borrow_mut().record("Beep low battery warning")
            }
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
