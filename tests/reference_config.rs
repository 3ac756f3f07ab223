use artificial_life::LifeSimulation;
use life_common::{BoundaryPolicy, ExecutionMode, SimulationConfig};
use std::path::Path;

fn reference_config() -> SimulationConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    SimulationConfig::load(path).unwrap()
}

#[test]
fn reference_config_describes_three_groups_and_seven_rules() {
    let config = reference_config();
    assert_eq!(config.groups.len(), 3);
    assert!(config.groups.iter().all(|g| g.count == 1500));
    assert_eq!(config.rules.len(), 7);
    assert_eq!(config.world.width, 2700.0);
    assert_eq!(config.world.height, 1000.0);
    assert_eq!(config.world.boundary, BoundaryPolicy::Clamp);
}

#[test]
fn reduced_reference_run_is_mode_independent_and_bounded() {
    let mut config = reference_config();
    config.initial_conditions.seed = Some(2024);
    for group in &mut config.groups {
        group.count = 200;
    }

    let mut serial = LifeSimulation::new(config.clone()).unwrap();
    let mut parallel = LifeSimulation::new(config).unwrap();
    for _ in 0..20 {
        serial.step_with(ExecutionMode::Serial);
        parallel.step_with(ExecutionMode::Parallel);
    }

    assert_eq!(serial.get_results(), parallel.get_results());

    let params = parallel.params().clone();
    for d in parallel.draw_list() {
        assert!(d.x >= 0.0 && d.x <= params.max_x(), "x escaped: {}", d.x);
        assert!(d.y >= 0.0 && d.y <= params.max_y(), "y escaped: {}", d.y);
        assert_eq!(d.size, 3.0);
    }
}
