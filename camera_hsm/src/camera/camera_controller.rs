use hsm_core::{errors::HsmResult, logger::DebugMask, state::Target};

use crate::camera::{
    camera_data::{CameraData, CameraDataRef},
    camera_events::CameraEvents,
    camera_states::CameraStates,
    state_disp::CameraStateDisp,
    state_menu::CameraStateMenu,
    state_off::CameraStateOff,
    state_on::CameraStateOn,
    state_play::CameraStatePlay,
    state_shoot::CameraStateShoot,
    CameraEngine,
};

/// Assembles the camera machine and owns its engine.
pub struct CameraHsm {
    engine: CameraEngine,
    /// Kept around so the demo and the tests can inspect the tape. A real
    /// consumer would not leak this.
    data: CameraDataRef,
}

impl CameraHsm {
    pub fn new(name: &str) -> HsmResult<Self> {
        let data = CameraData::new();
        let engine = CameraEngine::new(name);
        engine.add_state(CameraStates::Off, CameraStateOff::new(data.clone()), None)?;
        engine.add_state(CameraStates::On, CameraStateOn::new(data.clone()), None)?;
        engine.add_state(
            CameraStates::OnShoot,
            CameraStateShoot::new(data.clone()),
            Some(CameraStates::On),
        )?;
        engine.add_state(
            CameraStates::OnDisp,
            CameraStateDisp::new(data.clone()),
            Some(CameraStates::On),
        )?;
        engine.add_state(
            CameraStates::OnDispPlay,
            CameraStatePlay::new(data.clone()),
            Some(CameraStates::OnDisp),
        )?;
        engine.add_state(
            CameraStates::OnDispMenu,
            CameraStateMenu::new(data.clone()),
            Some(CameraStates::OnDisp),
        )?;
        engine.set_initial(CameraStates::Off)?;
        engine.set_prefix(&format!("[{}] ", name));
        engine.set_debug(DebugMask::ALL);
        Ok(CameraHsm { engine, data })
    }

    pub fn dispatch(&self, event: CameraEvents) {
        self.engine.run(event, None);
    }

    pub fn current(&self) -> Target<CameraStates> {
        self.engine.current()
    }

    pub fn is_powered(&self) -> bool {
        self.engine.is_in(CameraStates::On)
    }

    /// Drain the observable side effects recorded since the last call.
    pub fn take_tape(&self) -> Vec<String> {
        self.data.borrow_mut().take_tape()
    }
}
