use glam::Vec2;
use is_shifty::camera::Camera;
use is_shifty::geometry::Rect;

fn make_camera() -> Camera {
    Camera::new(Vec2::new(3200.0, 720.0), Vec2::new(800.0, 600.0))
}

#[test]
fn camera_centres_on_target() {
    let mut camera = make_camera();
    camera.update(Vec2::new(1600.0, 400.0));
    assert_eq!(camera.offset, Vec2::new(1200.0, 100.0));
    assert_eq!(camera.apply_point(Vec2::new(1600.0, 400.0)), Vec2::new(400.0, 300.0));
}

#[test]
fn camera_clamps_at_level_edges() {
    let mut camera = make_camera();
    camera.update(Vec2::new(10.0, 10.0));
    assert_eq!(camera.offset, Vec2::ZERO);

    camera.update(Vec2::new(3190.0, 710.0));
    assert_eq!(camera.offset, Vec2::new(2400.0, 120.0));
    let view = camera.view_rect();
    assert_eq!(view.right(), 3200.0);
    assert_eq!(view.bottom(), 720.0);
}

#[test]
fn level_smaller_than_viewport_pins_to_origin() {
    let mut camera = Camera::new(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
    camera.update(Vec2::new(350.0, 250.0));
    assert_eq!(camera.offset, Vec2::ZERO);
}

#[test]
fn apply_moves_rects_into_screen_space() {
    let mut camera = make_camera();
    camera.update(Vec2::new(1600.0, 400.0));
    let on_screen = camera.apply(&Rect::new(1300.0, 200.0, 40.0, 80.0));
    assert_eq!(on_screen, Rect::new(100.0, 100.0, 40.0, 80.0));
}
