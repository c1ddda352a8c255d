//! Loading the configuration from disk.

use std::io::Write;

use ot2_common::config::{ConfigError, LogLevel};
use ot2_control::config::load_config;
use ot2_control::{ControllerSystem, PidGains};
use ot2_sim::KinematicSimulator;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn full_file_round_trips_into_controller() {
    let file = write_config(
        r#"
[shared]
log_level = "debug"

[controller]
dt = 0.02
velocity_scale = 1.5
tolerance = 0.002
max_steps = 300
enforce_envelope = true

[controller.gains]
z = { kp = 3.0, ki = 0.2 }

[batch]
trials = 2
seed = 9

[simulator]
time_step = 0.01
num_agents = 2
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.shared.log_level, LogLevel::Debug);
    assert_eq!(config.controller.max_steps, 300);
    assert_eq!(config.controller.gains.z, PidGains::new(3.0, 0.2, 0.0));
    assert_eq!(config.controller.gains.x, PidGains::new(2.0, 0.1, 0.05));
    assert_eq!(config.simulator.num_agents, 2);

    let sim = KinematicSimulator::new(config.simulator.clone(), Some(config.envelope)).unwrap();
    let controller =
        ControllerSystem::from_config(sim, &config.controller, &config.envelope).unwrap();
    assert_eq!(controller.dt(), 0.02);
    assert_eq!(controller.velocity_scale(), 1.5);
    assert_eq!(controller.envelope(), Some(&config.envelope));
}

#[test]
fn missing_file_is_reported() {
    let err = load_config(std::path::Path::new("/nonexistent/ot2.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound));
}

#[test]
fn invalid_values_fail_validation() {
    let file = write_config("[controller]\ndt = -0.01\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn bundled_sample_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/ot2.toml");
    let config = load_config(&path).unwrap();
    assert_eq!(config.batch.trials, 5);
}
