//! The camera machine: a power state pair with a composite On state that
//! nests shooting and display modes.
pub mod camera_controller;
pub mod camera_data;
pub mod camera_events;
pub mod camera_states;
mod state_disp;
mod state_menu;
mod state_off;
mod state_on;
mod state_play;
mod state_shoot;

pub type CameraEngine =
    hsm_core::state_engine::HsmEngine<camera_states::CameraStates, camera_events::CameraEvents, ()>;
