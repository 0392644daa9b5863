use hsm_core::state::StateConstraint;

/// Dotted names mirror the nesting, which keeps the engine's debug lines
/// readable.
#[derive(Clone, PartialEq, Eq, Hash, Debug, strum::Display)]
pub enum CameraStates {
    Off,
    On,
    #[strum(to_string = "On.Shoot")]
    OnShoot,
    #[strum(to_string = "On.Disp")]
    OnDisp,
    #[strum(to_string = "On.Disp.Play")]
    OnDispPlay,
    #[strum(to_string = "On.Disp.Menu")]
    OnDispMenu,
}

impl StateConstraint for CameraStates {}
