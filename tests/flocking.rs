use std::sync::Arc;
use std::thread;
use std::time::Duration;

use boids::physics;
use boids::{BoidId, BoidState, NeighborMap, Simulation, SimulationClock, SimulationParams, Vector2D, WorldBounds};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bounds() -> WorldBounds {
    WorldBounds::new(-2.0, 2.0, -1.0, 1.0)
}

fn simulation() -> Simulation {
    Simulation::new(SimulationParams::default(), bounds())
}

fn view_of(sim: &Simulation, id: BoidId) -> boids::BoidView {
    sim.frame().boids.into_iter().find(|b| b.id == id).expect("boid is registered")
}

fn captured_states(sim: &Simulation) -> Vec<BoidState> {
    let mut states = Vec::new();
    sim.registry().for_each_boid(|boid| states.push(BoidState::from(boid)));
    states
}

#[test]
fn test_neighbor_pairs_are_mutual_with_equal_distance() {
    let sim = simulation();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let position = Vector2D::new(rng.gen_range(-0.6..0.6), rng.gen_range(-0.6..0.6));
        sim.spawn_boid_at(position);
    }

    let states = captured_states(&sim);
    let radius = sim.params().neighbor_radius;
    let map = NeighborMap::build(&states, radius);
    assert_eq!(map.len(), states.len());

    for (i, a) in states.iter().enumerate() {
        for b in &states[i + 1..] {
            let distance = a.position.distance(b.position);
            let a_sees_b: Vec<_> = map.get(a.id).unwrap().iter().filter(|n| n.position == b.position).collect();
            let b_sees_a: Vec<_> = map.get(b.id).unwrap().iter().filter(|n| n.position == a.position).collect();

            if distance <= radius {
                assert_eq!(a_sees_b.len(), 1);
                assert_eq!(b_sees_a.len(), 1);
                assert_eq!(a_sees_b[0].distance, b_sees_a[0].distance);
                assert_eq!(a_sees_b[0].velocity, b.velocity);
            } else {
                assert!(a_sees_b.is_empty());
                assert!(b_sees_a.is_empty());
            }
        }
    }
}

#[test]
fn test_speed_never_exceeds_maximum() {
    let sim = simulation();
    let mut rng = StdRng::seed_from_u64(5);
    sim.populate(150, &mut rng);
    for _ in 0..10 {
        sim.spawn_obstacle_at(Vector2D::new(rng.gen_range(-1.0..1.0), rng.gen_range(-0.8..0.8)));
    }
    sim.set_target(Some(Vector2D::new(0.5, 0.5)));
    sim.set_follow_mode(true);

    let max_speed = sim.params().max_speed;
    for _ in 0..50 {
        sim.tick();
        for boid in sim.frame().boids {
            assert!(boid.velocity.magnitude() <= max_speed * (1.0 + 1e-12));
            assert!(sim.bounds().contains(boid.position));
        }
    }
}

#[test]
fn test_wraparound_on_all_four_edges() {
    let sim = simulation();
    let eps = 1e-4;
    let speed = 0.005;

    let left = sim.spawn_boid_with_velocity(Vector2D::new(-2.0 + eps, 0.3), Vector2D::new(-speed, 0.0));
    let right = sim.spawn_boid_with_velocity(Vector2D::new(2.0 - eps, -0.3), Vector2D::new(speed, 0.0));
    let bottom = sim.spawn_boid_with_velocity(Vector2D::new(1.2, -1.0 + eps), Vector2D::new(0.0, -speed));
    let top = sim.spawn_boid_with_velocity(Vector2D::new(-1.2, 1.0 - eps), Vector2D::new(0.0, speed));

    sim.tick();

    assert_eq!(view_of(&sim, left).position, Vector2D::new(2.0, 0.3));
    assert_eq!(view_of(&sim, right).position, Vector2D::new(-2.0, -0.3));
    assert_eq!(view_of(&sim, bottom).position, Vector2D::new(1.2, 1.0));
    assert_eq!(view_of(&sim, top).position, Vector2D::new(-1.2, -1.0));
}

#[test]
fn test_single_boid_scenario() {
    let sim = simulation();
    let velocity = Vector2D::new(0.005, 0.0);
    let id = sim.spawn_boid_with_velocity(Vector2D::new(0.1, 0.1), velocity);

    sim.tick();
    let view = view_of(&sim, id);

    // Only the alignment term with itself remains
    assert_eq!(view.acceleration, velocity * 0.1);
    assert_eq!(view.velocity.y, 0.0);
    assert!(view.velocity.x > 0.0);
    assert!(view.velocity.magnitude() <= sim.params().max_speed);
    assert_eq!(view.density, 0.0);
    assert_eq!((view.color.red, view.color.green, view.color.blue), (0, 255, 0));
}

#[test]
fn test_lone_boid_converges_to_straight_line_at_max_speed() {
    let sim = simulation();
    let id = sim.spawn_boid_with_velocity(Vector2D::ZERO, Vector2D::new(0.003, 0.004));
    let max_speed = sim.params().max_speed;

    for _ in 0..50 {
        sim.tick();
    }

    let before = view_of(&sim, id);
    sim.tick();
    let after = view_of(&sim, id);

    assert!((after.velocity.magnitude() - max_speed).abs() < 1e-12);
    assert!((after.velocity.angle() - before.velocity.angle()).abs() < 1e-12);
    assert!((Vector2D::new(0.003, 0.004).angle() - after.velocity.angle()).abs() < 1e-12);
}

#[test]
fn test_crowded_boid_is_fully_dense() {
    let sim = simulation();
    let center = sim.spawn_boid_with_velocity(Vector2D::ZERO, Vector2D::new(0.001, 0.0));
    for i in 0..30 {
        let angle = i as f64 * std::f64::consts::TAU / 30.0;
        sim.spawn_boid_with_velocity(
            Vector2D::new(0.15 * angle.cos(), 0.15 * angle.sin()),
            Vector2D::new(0.001, 0.0),
        );
    }

    sim.tick();
    let view = view_of(&sim, center);

    assert_eq!(view.density, 1.0);
    assert_eq!((view.color.red, view.color.green, view.color.blue), (255, 0, 0));
}

#[test]
fn test_close_pair_separates_symmetrically() {
    let sim = simulation();
    let velocity = Vector2D::new(0.002, 0.0);
    sim.spawn_boid_with_velocity(Vector2D::new(0.0, 0.0), velocity);
    sim.spawn_boid_with_velocity(Vector2D::new(0.03, 0.04), velocity);

    let states = captured_states(&sim);
    let map = NeighborMap::build(&states, sim.params().neighbor_radius);
    let params = sim.params();

    let first = physics::separation(states[0].position, map.get(states[0].id).unwrap(), params);
    let second = physics::separation(states[1].position, map.get(states[1].id).unwrap(), params);

    assert!(first.magnitude() > 0.0);
    assert!((first.magnitude() - second.magnitude()).abs() < 1e-15);
    assert!((first + second).magnitude() < 1e-15);

    // Pushed apart along the line joining them
    let joining = states[0].position - states[1].position;
    let cross = first.x * joining.y - first.y * joining.x;
    assert!(cross.abs() < 1e-15);
    assert!(first.x * joining.x + first.y * joining.y > 0.0);
}

#[test]
fn test_reset_of_empty_registry_is_noop() {
    let sim = simulation();
    sim.reset_boids();
    assert_eq!(sim.registry().count(), 0);
    assert!(sim.frame().boids.is_empty());
}

#[test]
fn test_tick_render_and_input_interleave() {
    let sim = Arc::new(Simulation::new(
        SimulationParams {
            tick_interval: Duration::from_millis(1),
            ..SimulationParams::default()
        },
        bounds(),
    ));
    sim.populate(100, &mut StdRng::seed_from_u64(2));

    let clock = {
        let sim = Arc::clone(&sim);
        SimulationClock::start(Duration::from_millis(1), Duration::from_millis(20), move || {
            sim.tick();
        })
        .unwrap()
    };

    let input = {
        let sim = Arc::clone(&sim);
        thread::spawn(move || {
            for i in 0..300 {
                sim.spawn_boid_at(Vector2D::new(0.0, 0.0));
                sim.spawn_obstacle_at(Vector2D::new(0.5, 0.0));
                if i % 50 == 0 {
                    sim.reset_boids();
                    sim.clear_obstacles();
                }
                thread::sleep(Duration::from_micros(200));
            }
        })
    };

    let render = {
        let sim = Arc::clone(&sim);
        thread::spawn(move || {
            let mut frames = 0;
            for _ in 0..200 {
                let frame = sim.frame();
                assert!(frame.boids.iter().all(|b| b.velocity.magnitude().is_finite()));
                frames += 1;
            }
            frames
        })
    };

    input.join().unwrap();
    assert_eq!(render.join().unwrap(), 200);
    thread::sleep(Duration::from_millis(10));
    assert!(clock.ticks() > 0);
    clock.stop();

    let settled = sim.frame().boids.iter().map(|b| b.position).collect::<Vec<_>>();
    thread::sleep(Duration::from_millis(10));
    let later = sim.frame().boids.iter().map(|b| b.position).collect::<Vec<_>>();
    assert_eq!(settled, later);
}
