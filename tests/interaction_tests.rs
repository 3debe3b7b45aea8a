use approx::assert_abs_diff_eq;
use drape::{Cloth, ClothConfig, ClothError, GridCoord, NoOpStepObserver, Vec3};

fn curtain() -> Cloth<f64> {
    let config = ClothConfig::new(4, 4, 2.0, 2.0)
        .with_mass(1.0)
        .with_stiffness(1.0)
        .with_gravity(Vec3::new(0.0, 0.0, 0.0));
    let mut cloth = Cloth::new(config).unwrap();
    cloth.pin_row(0).unwrap();
    cloth
}

#[test]
fn nearest_particle_finds_closest_vertex() {
    let cloth = curtain();
    assert_eq!(cloth.nearest_particle(Vec3::new(0.45, -1.1, 0.3)), GridCoord::new(3, 2));
    assert_eq!(cloth.nearest_particle(Vec3::new(-5.0, 5.0, 0.0)), GridCoord::new(0, 0));
    assert_eq!(cloth.nearest_particle(Vec3::new(9.0, -9.0, 0.0)), GridCoord::new(4, 4));
}

#[test]
fn nearest_particle_tie_goes_to_first() {
    let cloth = curtain();
    // midway between (0, 0) and (1, 0)
    assert_eq!(cloth.nearest_particle(Vec3::new(-0.75, 0.0, 0.0)), GridCoord::new(0, 0));
}

#[test]
fn out_of_range_lookup_is_none() {
    let cloth = curtain();
    assert!(cloth.particle_at(4, 4).is_some());
    assert!(cloth.particle_at(5, 0).is_none());
    assert!(cloth.particle_at(0, 5).is_none());
    assert!(cloth.position_at(usize::MAX, 0).is_none());
}

#[test]
fn mutations_reject_out_of_range() {
    let mut cloth = curtain();
    let err = ClothError::ParticleOutOfBounds { col: 5, row: 1, cols: 5, rows: 5 };
    assert_eq!(cloth.pin(5, 1), Err(err.clone()));
    assert_eq!(cloth.unpin(5, 1), Err(err.clone()));
    assert_eq!(cloth.drag_particle(5, 1, Vec3::new(0.0, 0.0, 0.0)), Err(err));
}

#[test]
fn override_moves_pinned_rod_point() {
    let mut cloth = curtain();
    let target = Vec3::new(-1.0, 0.5, 0.2);
    assert_eq!(cloth.override_position(0, 0, target), Ok(true));
    cloth.step(0.016, &mut NoOpStepObserver).unwrap();

    let p = cloth.particle_at(0, 0).unwrap();
    assert_eq!(p.pos, target);
    assert_eq!(p.prev_pos, target);
}

#[test]
fn override_ignores_free_particle() {
    let mut cloth = curtain();
    let before = cloth.position_at(2, 2).unwrap();
    assert_eq!(cloth.override_position(2, 2, Vec3::new(9.0, 9.0, 9.0)), Ok(false));
    assert_eq!(cloth.position_at(2, 2), Some(before));
}

#[test]
fn drag_moves_free_particle_without_velocity() {
    let mut cloth = curtain();
    let grab = cloth.nearest_particle(Vec3::new(0.0, -2.0, 0.0));
    assert_eq!(grab, GridCoord::new(2, 4));

    let target = Vec3::new(0.0, -2.0, 0.5);
    assert_eq!(cloth.drag_particle(grab.col, grab.row, target), Ok(true));
    let p = cloth.particle_at(grab.col, grab.row).unwrap();
    assert_eq!(p.pos, target);
    assert_eq!(p.prev_pos, target);

    // pinned rod points refuse drags
    assert_eq!(cloth.drag_particle(1, 0, target), Ok(false));
}

#[test]
fn unpinned_row_falls() {
    let config = ClothConfig::new(2, 2, 1.0, 1.0).with_gravity(Vec3::new(0.0, -9.8, 0.0));
    let mut cloth: Cloth<f64> = Cloth::new(config).unwrap();
    cloth.pin_top_row();
    cloth.unpin(0, 0).unwrap();
    for _ in 0..30 {
        cloth.step(1.0 / 60.0, &mut NoOpStepObserver).unwrap();
    }
    assert!(cloth.position_at(0, 0).unwrap().y < 0.0);
    assert_eq!(cloth.position_at(2, 0).unwrap().y, 0.0);
}

#[test]
fn translate_moves_rest_too() {
    let mut cloth = curtain();
    cloth.translate(Vec3::new(0.5, 1.0, 0.0));
    let p = cloth.particle_at(0, 0).unwrap();
    assert_eq!(p.pos, Vec3::new(-0.5, 1.0, 0.0));
    assert_eq!(p.rest, p.pos);
    assert_eq!(p.prev_pos, p.pos);
}

#[test]
fn pleats_follow_sine_of_column() {
    let mut cloth = curtain();
    cloth.apply_pleats(0.2, 4.0).unwrap();
    for col in 0..=4 {
        let expected = (col as f64 * std::f64::consts::PI / 2.0).sin() * 0.2;
        let p = cloth.particle_at(col, 3).unwrap();
        assert_abs_diff_eq!(p.pos.z, expected, epsilon = 1e-9);
        assert_eq!(p.rest.z, p.pos.z);
    }
    assert_eq!(cloth.apply_pleats(0.2, 0.0), Err(ClothError::InvalidExtent));
}

#[test]
fn drive_from_rest_offsets_every_particle() {
    let mut cloth = curtain();
    cloth.drive_from_rest(|coord, _rest| Vec3::new(1.5, 0.0, coord.row as f64 * 0.1));

    for (idx, p) in cloth.particles().iter().enumerate() {
        let coord = cloth.coord(idx);
        assert_eq!(p.pos.x, p.rest.x + 1.5);
        assert_eq!(p.pos.y, p.rest.y);
        assert_abs_diff_eq!(p.pos.z, coord.row as f64 * 0.1, epsilon = 1e-12);
        assert_eq!(p.prev_pos, p.pos);
    }

    // a second drive starts from rest again, not from the last offset
    cloth.drive_from_rest(|_, _| Vec3::new(0.0, 0.0, 0.0));
    assert!(cloth.particles().iter().all(|p| p.pos == p.rest));
}

#[test]
fn driving_x_keeps_simulated_sag_and_wind() {
    let config = ClothConfig::new(4, 4, 2.0, 2.0)
        .with_mass(1.0)
        .with_stiffness(1.0)
        .with_damping(0.0)
        .with_gravity(Vec3::new(0.0, -1.0, 0.0))
        .with_wind(Vec3::new(0.0, 0.0, 1.0));
    let mut cloth: Cloth<f64> = Cloth::new(config).unwrap();
    cloth.pin_top_row();
    for _ in 0..60 {
        cloth.step(0.016, &mut NoOpStepObserver).unwrap();
    }
    let before = cloth.particle_at(2, 4).unwrap().clone();
    assert!((before.pos.y - before.rest.y).abs() > 1e-3);
    assert!(before.pos.z > 0.1);

    cloth.drive_x_from_rest(|coord| 0.5 + coord.row as f64 * 0.01);

    let after = cloth.particle_at(2, 4).unwrap();
    assert_abs_diff_eq!(after.pos.x, after.rest.x + 0.54, epsilon = 1e-12);
    assert_eq!(after.prev_pos.x, after.pos.x);
    assert_eq!(after.pos.y, before.pos.y);
    assert_eq!(after.pos.z, before.pos.z);
    assert_eq!(after.prev_pos.y, before.prev_pos.y);

    let rod = cloth.particle_at(0, 0).unwrap();
    assert_eq!(rod.pos.x, rod.rest.x + 0.5);

    cloth.step(0.016, &mut NoOpStepObserver).unwrap();
    let stepped = cloth.particle_at(2, 4).unwrap();
    assert_abs_diff_eq!(stepped.pos.y, before.pos.y, epsilon = 0.05);
    assert!(stepped.pos.z > 0.1);
}
