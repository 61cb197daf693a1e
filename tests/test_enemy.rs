use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use is_shifty::constants::*;
use is_shifty::enemy::{Zombie, ZombieState};
use is_shifty::entities::Facing;
use is_shifty::events::GameEvent;
use is_shifty::geometry::{CollisionWorld, Obstacle, ObstacleKind, Rect};
use is_shifty::input::{ControlBindings, InputFrame};
use is_shifty::player::Player;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn ground() -> Rect {
    Rect::new(0.0, 640.0, 4000.0, 80.0)
}

fn boundary(x: f32) -> Obstacle {
    Obstacle {
        rect: Rect::new(x, 520.0, 16.0, 120.0),
        kind: ObstacleKind::ZombieBoundary,
    }
}

/// Ground with patrol boundaries at x = 300 and x = 700.
fn make_world() -> CollisionWorld {
    CollisionWorld::new(vec![
        Obstacle { rect: ground(), kind: ObstacleKind::Ground },
        boundary(300.0),
        boundary(700.0),
    ])
}

fn make_zombie(world: &CollisionWorld, rng: &mut StdRng) -> Zombie {
    Zombie::new(Vec2::new(400.0, 600.0), world, rng)
}

fn player_at(x: f32) -> Player {
    Player::new(Vec2::new(x, 600.0), ControlBindings::default(), true)
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

#[test]
fn zombie_spawns_patrolling_between_nearest_boundaries() {
    let world = make_world();
    let z = make_zombie(&world, &mut seeded_rng());
    assert_eq!(z.state, ZombieState::Patrol);
    assert_eq!(z.health, ZOMBIE_MAX_HEALTH);
    assert_eq!(z.left_bound, Some(316.0));
    assert_eq!(z.right_bound, Some(700.0));
    assert!(z.is_alive());
    assert!(!z.health_bar_visible());
}

// ── Patrol ────────────────────────────────────────────────────────────────────

#[test]
fn patrol_stays_inside_boundaries_and_turns() {
    let world = make_world();
    let solids = world.solid_rects();
    let mut rng = seeded_rng();
    let mut z = make_zombie(&world, &mut rng);
    let mut player = player_at(3000.0);
    let mut events = Vec::new();
    let mut seen_left = false;
    let mut seen_right = false;

    for _ in 0..1000 {
        z.update(&mut player, &solids, 1.0, &mut rng, &mut events);
        assert_eq!(z.state, ZombieState::Patrol);
        assert!(z.rect().left() >= 316.0 - COLLISION_EPSILON);
        assert!(z.rect().right() <= 700.0 + COLLISION_EPSILON);
        seen_left |= z.facing == Facing::Left;
        seen_right |= z.facing == Facing::Right;
    }
    assert!(seen_left && seen_right);
    assert!(events.contains(&GameEvent::ZombieMoan));
}

#[test]
fn zombie_without_boundaries_turns_at_walls() {
    let wall = |x: f32| Obstacle {
        rect: Rect::new(x, 0.0, 16.0, 640.0),
        kind: ObstacleKind::Ground,
    };
    let world = CollisionWorld::new(vec![
        Obstacle { rect: ground(), kind: ObstacleKind::Ground },
        wall(300.0),
        wall(500.0),
    ]);
    let solids = world.solid_rects();
    let mut rng = seeded_rng();
    let mut z = make_zombie(&world, &mut rng);
    assert_eq!((z.left_bound, z.right_bound), (None, None));

    let mut player = player_at(3000.0);
    let mut events = Vec::new();
    let start = z.facing;
    let mut turned = false;
    for _ in 0..400 {
        z.update(&mut player, &solids, 1.0, &mut rng, &mut events);
        assert!(solids.iter().all(|s| !z.rect().overlaps(s)));
        turned |= z.facing != start;
    }
    assert!(turned);
}

// ── Chase ─────────────────────────────────────────────────────────────────────

#[test]
fn zombie_chases_player_inside_its_area() {
    let world = make_world();
    let solids = world.solid_rects();
    let mut rng = seeded_rng();
    let mut z = make_zombie(&world, &mut rng);
    let mut player = player_at(550.0);
    let mut events = Vec::new();

    z.update(&mut player, &solids, 1.0, &mut rng, &mut events);
    assert_eq!(z.state, ZombieState::Chase);
    assert_eq!(z.facing, Facing::Right);
    assert!((z.body.pos.x - (400.0 + ZOMBIE_CHASE_SPEED)).abs() < 1e-4);
}

#[test]
fn zombie_ignores_player_beyond_its_boundary() {
    let world = make_world();
    let solids = world.solid_rects();
    let mut rng = seeded_rng();
    let mut z = make_zombie(&world, &mut rng);
    let mut player = player_at(720.0);
    let mut events = Vec::new();

    z.update(&mut player, &solids, 1.0, &mut rng, &mut events);
    assert_eq!(z.state, ZombieState::Patrol);
}

// ── Contact damage ────────────────────────────────────────────────────────────

#[test]
fn contact_damage_lands_once_per_cooldown_window() {
    let world = make_world();
    let solids = world.solid_rects();
    let mut rng = seeded_rng();
    let mut z = make_zombie(&world, &mut rng);
    let mut player = player_at(400.0);
    let mut events = Vec::new();

    let mut frame = |z: &mut Zombie, player: &mut Player, events: &mut Vec<GameEvent>| {
        z.update(player, &solids, 1.0, &mut rng, events);
        // Pin the player in place so the overlap persists; its own
        // invulnerability still runs out on schedule.
        player.body.vel = Vec2::ZERO;
        player.update(&InputFrame::idle(), &solids, 1.0, events);
    };

    for _ in 0..(CONTACT_COOLDOWN_FRAMES as usize) {
        frame(&mut z, &mut player, &mut events);
        assert_eq!(z.state, ZombieState::Attack);
    }
    assert!(!player.is_invulnerable());
    assert_eq!(player.health(), PLAYER_MAX_HEALTH - ZOMBIE_CONTACT_DAMAGE);
    let hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
        .count();
    assert_eq!(hits, 1);

    frame(&mut z, &mut player, &mut events);
    assert_eq!(player.health(), PLAYER_MAX_HEALTH - 2 * ZOMBIE_CONTACT_DAMAGE);
}

// ── Taking hits ───────────────────────────────────────────────────────────────

#[test]
fn zombie_dies_after_enough_hits() {
    let world = make_world();
    let mut z = make_zombie(&world, &mut seeded_rng());
    let mut events = Vec::new();

    assert!(!z.take_hit(40, &mut events));
    assert!(z.health_bar_visible());
    assert!(!z.take_hit(40, &mut events));
    assert!(z.take_hit(40, &mut events));
    assert!(!z.is_alive());
    assert!(!z.take_hit(40, &mut events));
    assert_eq!(
        events,
        vec![GameEvent::EnemyHit, GameEvent::EnemyHit, GameEvent::EnemyDeath]
    );
}

#[test]
fn dead_zombie_is_harmless_and_removed_after_animation() {
    let world = make_world();
    let solids = world.solid_rects();
    let mut rng = seeded_rng();
    let mut z = make_zombie(&world, &mut rng);
    let mut player = player_at(400.0);
    let mut events = Vec::new();
    z.take_hit(ZOMBIE_MAX_HEALTH, &mut events);

    for _ in 0..(ZOMBIE_DEATH_FRAMES as usize - 1) {
        z.update(&mut player, &solids, 1.0, &mut rng, &mut events);
        assert!(!z.is_removable());
    }
    z.update(&mut player, &solids, 1.0, &mut rng, &mut events);
    assert!(z.is_removable());
    assert_eq!(player.health(), PLAYER_MAX_HEALTH);
}
