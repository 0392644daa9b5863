use hsm_core::events::EventConstraint;

#[derive(Clone, Debug, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CameraEvents {
    Pwr,
    Release,
    Mode,
    LowBatt,
}

impl EventConstraint for CameraEvents {}
