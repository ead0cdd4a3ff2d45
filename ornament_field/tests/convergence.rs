//! End-to-end behaviour of the field driven through the public engine API.

use ornament_field::{Category, CategoryCounts, FieldConfig, FieldEngine, TransformBuffer, TreeMode};

const EPSILON: f32 = 0.01;

fn engine(counts: CategoryCounts, seed: u64) -> FieldEngine {
    FieldEngine::new(&FieldConfig { counts, seed: Some(seed), ..FieldConfig::default() }).unwrap()
}

#[test]
fn thousand_formed_frames_assemble_the_tree() {
    let counts = CategoryCounts::zero()
        .with(Category::Ball, 400)
        .with(Category::Box, 150)
        .with(Category::Light, 600);
    let mut engine = engine(counts, 2024);
    assert_eq!(engine.mode(), TreeMode::Chaos);

    for _ in 0..1_000 {
        engine.tick(TreeMode::Formed, 1.0 / 60.0);
    }

    let pop = engine.population();
    let mut checked = 0;
    let mut arrived = 0;
    for category in [Category::Ball, Category::Box] {
        for i in pop.range(category) {
            checked += 1;
            let d = pop.live()[i].position.distance(pop.instances()[i].target_position());
            if d < EPSILON {
                arrived += 1;
            }
        }
    }
    assert_eq!(checked, 550);
    assert!(arrived as f32 / checked as f32 >= 0.99, "{} of {} arrived", arrived, checked);
}

#[test]
fn mode_flip_mid_flight_is_continuous() {
    let mut engine = engine(CategoryCounts::default(), 7);
    for _ in 0..45 {
        engine.tick(TreeMode::Formed, 1.0 / 60.0);
    }
    let before: Vec<_> = engine.population().live().iter().map(|l| l.position).collect();
    engine.tick(TreeMode::Chaos, 1.0 / 60.0);
    for (b, l) in before.iter().zip(engine.population().live()) {
        // One tick at rates <= 0.1 across a field well under 80 units wide.
        assert!(b.distance(l.position) < 8.0);
    }
    assert_eq!(engine.mode(), TreeMode::Chaos);
}

#[test]
fn round_trip_returns_to_chaos() {
    let mut engine = engine(CategoryCounts::zero().with(Category::Gem, 50).with(Category::Bell, 50), 11);
    for _ in 0..300 {
        engine.tick(TreeMode::Formed, 1.0 / 60.0);
    }
    for _ in 0..3_000 {
        engine.tick(TreeMode::Chaos, 1.0 / 60.0);
    }
    let pop = engine.population();
    for (inst, live) in pop.instances().iter().zip(pop.live()) {
        assert!(live.position.distance(inst.chaos_position()) < EPSILON);
    }
    assert!(engine.progress() < 0.01);
}

#[test]
fn buffer_stays_finite_for_full_population() {
    let mut engine = engine(CategoryCounts::default(), 3);
    let mut buffer = TransformBuffer::default();
    for frame in 0..600 {
        let mode = if (frame / 150) % 2 == 0 { TreeMode::Formed } else { TreeMode::Chaos };
        engine.tick(mode, 1.0 / 60.0);
    }
    engine.write_buffer(&mut buffer);
    assert_eq!(buffer.instances.len(), 1800);
    assert!(buffer.instances.iter().all(|e| e.matrix.iter().all(|v| v.is_finite())));
    assert!(buffer.foliage.iter().all(|p| p.position.iter().all(|v| v.is_finite())));
    assert_eq!(engine.stats().frozen, 0);
}
