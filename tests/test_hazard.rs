use glam::Vec2;
use is_shifty::constants::*;
use is_shifty::entities::DeathCause;
use is_shifty::events::GameEvent;
use is_shifty::geometry::Rect;
use is_shifty::hazard::{Hazard, HazardKind, SawMotion};
use is_shifty::input::{ControlBindings, InputFrame};
use is_shifty::player::Player;

fn ground() -> Vec<Rect> {
    vec![Rect::new(0.0, 640.0, 4000.0, 80.0)]
}

fn player_at(x: f32) -> Player {
    Player::new(Vec2::new(x, 600.0), ControlBindings::default(), true)
}

#[test]
fn acid_kills_outright() {
    let mut acid = Hazard::acid(Rect::new(80.0, 620.0, 64.0, 20.0));
    let mut player = player_at(100.0);
    let mut events = Vec::new();
    acid.update(&mut player, 1.0, &mut events);
    assert!(player.is_dead());
    assert_eq!(player.dead_message(), Some(DeathCause::Acid));
}

#[test]
fn acid_kills_through_invulnerability() {
    let mut acid = Hazard::acid(Rect::new(80.0, 620.0, 64.0, 20.0));
    let mut player = player_at(100.0);
    let mut events = Vec::new();
    player.take_damage(10, DeathCause::Zombies, 0.0, &mut events);
    assert!(player.is_invulnerable());
    acid.update(&mut player, 1.0, &mut events);
    assert!(player.is_dead());
}

#[test]
fn spikes_hurt_once_per_cooldown() {
    let mut spikes = Hazard::spikes(Rect::new(80.0, 624.0, 64.0, 16.0));
    let mut player = player_at(100.0);
    let mut events = Vec::new();

    for _ in 0..(CONTACT_COOLDOWN_FRAMES as usize) {
        spikes.update(&mut player, 1.0, &mut events);
        player.body.vel = Vec2::ZERO;
        player.update(&InputFrame::idle(), &ground(), 1.0, &mut events);
    }
    assert_eq!(player.health(), PLAYER_MAX_HEALTH - SPIKES_DAMAGE);
    assert_eq!(player.dead_message(), None);
}

#[test]
fn hazards_ignore_a_player_out_of_reach() {
    let mut spikes = Hazard::spikes(Rect::new(500.0, 624.0, 64.0, 16.0));
    let mut player = player_at(100.0);
    let mut events = Vec::new();
    spikes.update(&mut player, 1.0, &mut events);
    assert_eq!(player.health(), PLAYER_MAX_HEALTH);
    assert!(events.is_empty());
}

#[test]
fn saw_motion_parse_defaults_to_long_axis() {
    let wide = Rect::new(0.0, 0.0, 300.0, 64.0);
    let tall = Rect::new(0.0, 0.0, 64.0, 300.0);
    assert_eq!(SawMotion::parse("", &wide), Some(SawMotion::Horizontal));
    assert_eq!(SawMotion::parse("", &tall), Some(SawMotion::Vertical));
    assert_eq!(SawMotion::parse("static", &wide), Some(SawMotion::Static));
    assert_eq!(SawMotion::parse("diagonal", &wide), None);
}

#[test]
fn moving_saw_stays_on_its_track() {
    let track = Rect::new(400.0, 560.0, 320.0, 64.0);
    let mut saw = Hazard::saw(track, SawMotion::Horizontal);
    assert!(saw.is_moving());
    let mut player = player_at(100.0);
    let mut events = Vec::new();
    let start = saw.rect.center();
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;

    for _ in 0..400 {
        saw.update(&mut player, 1.0, &mut events);
        let c = saw.rect.center();
        assert_eq!(c.y, start.y);
        min_x = min_x.min(c.x);
        max_x = max_x.max(c.x);
    }
    let half = SAW_SIZE * 0.5;
    assert!(min_x - half >= track.left() - 1e-3);
    assert!(max_x + half <= track.right() + 1e-3);
    // It went all the way and came back.
    assert!((max_x + half - track.right()).abs() < 1e-3);
    assert!((min_x - half - track.left()).abs() < 1e-3);
}

#[test]
fn static_saw_does_not_move_and_damages() {
    let mut saw = Hazard::saw(Rect::new(68.0, 568.0, 64.0, 64.0), SawMotion::Static);
    assert!(!saw.is_moving());
    assert_eq!(saw.kind, HazardKind::Saw);
    let before = saw.rect;
    let mut player = player_at(100.0);
    let mut events = Vec::new();
    saw.update(&mut player, 1.0, &mut events);
    assert_eq!(saw.rect, before);
    assert_eq!(player.health(), PLAYER_MAX_HEALTH - SAW_DAMAGE);
    assert!(events.contains(&GameEvent::PlayerHit { damage: SAW_DAMAGE }));
}

#[test]
fn static_saw_keeps_its_authored_size() {
    let authored = Rect::new(60.0, 520.0, 128.0, 120.0);
    let mut saw = Hazard::saw(authored, SawMotion::Static);
    assert_eq!(saw.rect, authored);

    // The corner of the authored rect reaches a player the blade-sized box would miss.
    let mut player = player_at(180.0);
    let mut events = Vec::new();
    saw.update(&mut player, 1.0, &mut events);
    assert_eq!(player.health(), PLAYER_MAX_HEALTH - SAW_DAMAGE);
}
