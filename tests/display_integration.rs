/*
 *  tests/display_integration.rs
 *
 *  Integration tests for the status display
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *  (c) 2020-26 Stuart Hunter
 */

use artnode_status::config::{self, Config, DisplayConfig, NodeConfig};
use artnode_status::display::layout::StatusLayout;
use artnode_status::display::{
    DisplayDriver, DisplayInitError, FrameBuffer, MockDriver, RenderError, Screen, StatusDisplay,
};
use artnode_status::draw::draw_text;
use embedded_graphics::prelude::*;

fn text_at(text: &str, top_left: Point) -> FrameBuffer {
    let layout = StatusLayout::for_size(Size::new(128, 64)).unwrap();
    let mut fb = FrameBuffer::new(128, 64);
    draw_text(&mut fb, text, top_left, layout.text_style).unwrap();
    fb
}

#[test]
fn test_connected_screen_end_to_end() {
    let mut driver = MockDriver::new(128, 64);
    {
        let mut status = StatusDisplay::new(&mut driver, 1, 2, "MyNet");
        status.initialize().unwrap();
        status.show_connected("192.168.1.1").unwrap();
    }

    let panel = driver.panel().expect("panel was flushed");
    assert!(panel.covers(&text_at("MyNet", Point::new(0, 5))));
    assert!(panel.covers(&text_at("192.168.1.1", Point::new(0, 21))));
    assert!(panel.covers(&text_at("Output A - Univ 1", Point::new(0, 42))));
    assert!(panel.covers(&text_at("Output B - Univ 2", Point::new(0, 55))));
    // no banner on the connected screen
    assert!(!panel.covers(&text_at("Connecting...", Point::new(0, 5))));
}

#[test]
fn test_wide_universes_render_in_full() {
    for (a, b) in [(0u16, 999u16), (511, 512), (1000, 32767)] {
        let mut driver = MockDriver::new(128, 64);
        {
            let mut status = StatusDisplay::new(&mut driver, a, b, "Rig");
            status.initialize().unwrap();
            status.show_error().unwrap();
        }
        let panel = driver.panel().unwrap();
        let label_a = format!("Output A - Univ {}", a);
        let label_b = format!("Output B - Univ {}", b);
        assert!(panel.covers(&text_at(&label_a, Point::new(0, 42))), "{}", label_a);
        assert!(panel.covers(&text_at(&label_b, Point::new(0, 55))), "{}", label_b);
    }
}

#[test]
fn test_screens_replace_each_other() {
    let mut error_only = MockDriver::new(128, 64);
    {
        let mut status = StatusDisplay::new(&mut error_only, 1, 2, "MyNet");
        status.initialize().unwrap();
        status.show_error().unwrap();
    }

    let mut sequence = MockDriver::new(128, 64);
    {
        let mut status = StatusDisplay::new(&mut sequence, 1, 2, "MyNet");
        status.initialize().unwrap();
        status.show_connecting().unwrap();
        status.show_connected("10.0.0.7").unwrap();
        status.show_error().unwrap();
    }

    assert_eq!(error_only.panel(), sequence.panel());
}

#[test]
fn test_dead_panel_never_receives_frames() {
    let mut driver = MockDriver::new(128, 64);
    driver.state().lock().unwrap().simulate_init_failure = true;
    {
        let mut status = StatusDisplay::new(&mut driver, 1, 2, "MyNet");
        let err = status.initialize().unwrap_err();
        assert!(matches!(err, DisplayInitError::Driver(_)));
        assert!(matches!(status.show_connecting(), Err(RenderError::NotInitialized)));
    }

    let state = driver.state();
    let state = state.lock().unwrap();
    assert_eq!(state.flush_count, 0);
    assert_eq!(state.draw_calls, 0);
    assert!(state.panel.is_none());
}

#[test]
fn test_recovers_once_panel_answers() {
    let mut driver = MockDriver::new(128, 64);
    let state = driver.state();
    state.lock().unwrap().simulate_init_failure = true;

    let mut status = StatusDisplay::new(&mut driver, 1, 2, "MyNet");
    assert!(status.initialize().is_err());

    state.lock().unwrap().simulate_init_failure = false;
    status.initialize().unwrap();
    status.show_connecting().unwrap();

    assert_eq!(state.lock().unwrap().init_attempts, 2);
    assert_eq!(state.lock().unwrap().flush_count, 1);
}

#[test]
fn test_config_drives_status_display() {
    let mut cfg = Config::default();
    config::merge(&mut cfg, Config {
        node: Some(NodeConfig {
            universe_a: Some(5),
            universe_b: Some(6),
            wifi_network: Some("FOH".into()),
        }),
        display: Some(DisplayConfig {
            brightness: Some(40),
            ..Default::default()
        }),
        ..Default::default()
    });
    config::validate(&cfg).unwrap();

    let node = cfg.node.clone().unwrap();
    let mut driver = MockDriver::from_config(cfg.display.as_ref().unwrap());
    assert_eq!(driver.dimensions(), (128, 64));

    let mut status = StatusDisplay::new(&mut driver, node.universe_a(), node.universe_b(), node.wifi_network());
    status.initialize().unwrap();
    let frame = status.frame(Screen::Connecting);
    assert!(frame.contains("Output A - Univ 5"));
    assert!(frame.contains("Output B - Univ 6"));
    assert!(frame.contains("FOH"));
}
