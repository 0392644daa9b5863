use hsm_core::{events::Event, state::StateHandler};

use crate::camera::{
    camera_data::CameraDataRef, camera_events::CameraEvents, camera_states::CameraStates,
    CameraEngine,
};

/// Shooting mode: the sensor is live and RELEASE takes pictures.
pub struct CameraStateShoot {
    data: CameraDataRef,
}

impl CameraStateShoot {
    pub fn new(data: CameraDataRef) -> Self {
        Self { data }
    }
}

impl StateHandler<CameraStates, CameraEvents, ()> for CameraStateShoot {
    fn on_event(
        &self,
        hsm: &CameraEngine,
        event: &Event<CameraEvents>,
        param: Option<&()>,
    ) -> Option<CameraEvents> {
        match event {
            Event::Entry => self.data.borrow_mut().record("Enable Sensor"),
            Event::Exit => self.data.borrow_mut().record("Disable Sensor"),
            Event::Init => {}
            Event::User(CameraEvents::Release) => {
                self.data.borrow_mut().record("CLICK!, save photo")
            }
            Event::User(CameraEvents::Mode) => hsm.tran(CameraStates::OnDispPlay, param),
            Event::User(other) => return Some(other.clone()),
        }
        None
    }
}
