use hspgfx::render::DeviceKind;
use hspgfx::{DeviceManager, DevicePreference, Error};
use hspgfx_pxl::PxlBackend;

use super::*;

#[test]
fn initialize_is_idempotent() {
    let mut devices = DeviceManager::new(PxlBackend::new(), harness::options());
    devices.initialize().unwrap();
    let device = devices.device().unwrap().clone();
    devices.initialize().unwrap();
    assert!(std::rc::Rc::ptr_eq(&device, devices.device().unwrap()));
    assert_eq!(devices.device_kind(), Some(DeviceKind::Hardware));
}

#[test]
fn falls_back_to_software_device() {
    let mut devices = DeviceManager::new(PxlBackend::software_only(), harness::options());
    devices.initialize().unwrap();
    assert_eq!(devices.device_kind(), Some(DeviceKind::Software));
}

#[test]
fn software_preference() {
    let options = harness::options().with_device(DevicePreference::SoftwareOnly);
    let h = harness::headless_with(PxlBackend::new(), options);
    assert_eq!(
        h.screens.devices().device_kind(),
        Some(DeviceKind::Software)
    );
}

#[test]
fn device_loss_is_listed() {
    let mut h = harness::headless();
    h.screens.buffer(1, 8, 8);
    h.screens.buffer(2, 8, 8);
    assert!(h.screens.lost_surfaces().is_empty());

    h.backend.lose_device();
    let surf = h.screens.cur().unwrap();
    surf.boxf(0, 0, 3, 3);
    assert!(surf.needs_recreate());
    assert_eq!(h.screens.lost_surfaces(), vec![2]);

    // every surface of the lost device reports it
    assert!(h.screens.gsel(1));
    h.screens.cur().unwrap().boxf(0, 0, 3, 3);
    assert_eq!(h.screens.lost_surfaces(), vec![1, 2]);
}

#[test]
fn surfaces_on_recreated_device_are_healthy() {
    let mut h = harness::headless();
    h.backend.lose_device();
    h.screens.buffer(1, 8, 8).boxf(0, 0, 3, 3);
    assert_eq!(h.screens.lost_surfaces(), vec![1]);

    let devices = h.screens.devices_mut();
    devices.shutdown();
    devices.initialize().unwrap();
    h.screens.buffer(2, 8, 8).boxf(0, 0, 3, 3);
    assert_eq!(h.screens.lost_surfaces(), vec![1]);
}

#[test]
fn device_loss_in_manual_frame_is_reported() {
    let mut h = harness::headless();
    let surf = h.screens.buffer(1, 8, 8);
    surf.begin_draw();
    surf.boxf(0, 0, 3, 3);
    h.backend.lose_device();
    let surf = h.screens.cur().unwrap();
    assert!(matches!(
        surf.end_draw_and_present(),
        Err(Error::RecreateTarget)
    ));
    assert_eq!(surf.frame_state(), FrameState::Idle);
    assert_eq!(h.screens.lost_surfaces(), vec![1]);
}

#[test]
fn uninitialized_surfaces_are_inert() {
    let devices = DeviceManager::new(PxlBackend::new(), harness::options());
    let mut surf = Surface::offscreen(&devices, 8, 8);
    assert!(!surf.is_usable());
    surf.boxf(0, 0, 3, 3);
    assert_eq!(surf.pget(1, 1), BLACK);
    assert!(!surf.bmpsave(harness::temp_path("inert.bmp")));
    assert_eq!(surf.frame_state(), FrameState::Idle);
}
