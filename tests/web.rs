//! Facade checks that need a JS host (`wasm-pack test --node`)
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use windtunnel_engine::WindTunnel;

#[wasm_bindgen_test]
fn bad_presence_length_surfaces_as_js_error() {
    let mut tunnel = WindTunnel::new(16, 8).unwrap();
    let err = tunnel.merge_presence(&[1u8; 3]).unwrap_err();
    let message = err.as_string().unwrap();
    assert!(message.contains("presence array"));
}

#[wasm_bindgen_test]
fn config_json_round_trips_through_js() {
    let tunnel = WindTunnel::from_config_json(r#"{"width": 20, "height": 10}"#.to_string()).unwrap();
    assert_eq!(tunnel.width(), 20);
    let again = WindTunnel::from_config_json(tunnel.config_json()).unwrap();
    assert_eq!((again.width(), again.height()), (20, 10));
}

#[wasm_bindgen_test]
fn image_import_rejects_short_buffers() {
    let mut tunnel = WindTunnel::new(4, 4).unwrap();
    assert!(tunnel.load_image(4, 4, vec![0u32; 15]).is_err());
    let pixels = tunnel.to_image(0xffff_ffff);
    assert!(tunnel.load_image(4, 4, pixels).is_ok());
}
