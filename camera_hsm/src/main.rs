mod camera;

use camera::{
    camera_controller::CameraHsm, camera_events::CameraEvents, camera_states::CameraStates,
};

fn main() {
    env_logger::init();

    let camera = CameraHsm::new("Canon").expect("failed to assemble the camera HSM");
    assert_eq!(camera.current(), CameraStates::Off);

    // Turn on the power
    camera.dispatch(CameraEvents::Pwr);
    assert_eq!(
        camera.take_tape(),
        vec!["Exit Low Power Mode", "Open Lens", "Enable Sensor"]
    );
    assert_eq!(camera.current(), CameraStates::OnShoot);
    assert!(camera.is_powered());

    // Take a picture
    camera.dispatch(CameraEvents::Release);
    // Take another picture
    camera.dispatch(CameraEvents::Release);
    // Playback the photos
    camera.dispatch(CameraEvents::Mode);
    assert_eq!(camera.current(), CameraStates::OnDispPlay);
    // Oops, pushed the release button by accident
    camera.dispatch(CameraEvents::Release);
    // Go to the menu settings
    camera.dispatch(CameraEvents::Mode);
    // Uh oh, low battery
    camera.dispatch(CameraEvents::LowBatt);
    // Time to turn it off
    camera.dispatch(CameraEvents::Pwr);
    assert_eq!(camera.current(), CameraStates::Off);

    println!("Camera demo finished in state {}", camera.current());
}
