//! Envelope probe against a clamped simulator.

use ot2_common::bounds::Bounds;
use ot2_control::ControlError;
use ot2_control::envelope::{
    DEFAULT_PROBE_SPEED, DEFAULT_PROBE_STEPS, envelope_markdown, probe_envelope,
};
use ot2_sim::{KinematicSimulator, SimulatorConfig};

fn clamped(envelope: Bounds, num_agents: usize) -> KinematicSimulator {
    let config = SimulatorConfig {
        num_agents,
        ..SimulatorConfig::default()
    };
    KinematicSimulator::new(config, Some(envelope)).unwrap()
}

#[test]
fn probe_recovers_configured_envelope() {
    let envelope = Bounds::default();
    let mut sim = clamped(envelope, 1);

    let probe = probe_envelope(
        &mut sim,
        envelope.center(),
        DEFAULT_PROBE_SPEED,
        DEFAULT_PROBE_STEPS,
    )
    .unwrap();

    assert_eq!(probe.corners.len(), 8);
    assert_eq!(probe.bounds, envelope);
    assert_eq!(probe.corners[0], envelope.low);
    assert_eq!(probe.corners[7], envelope.high);
}

#[test]
fn probe_with_several_robots_records_first() {
    let envelope = Bounds::new([-0.1, -0.1, 0.1], [0.1, 0.1, 0.3]);
    let mut sim = clamped(envelope, 3);

    let probe = probe_envelope(&mut sim, envelope.center(), 0.5, 100).unwrap();
    assert_eq!(probe.bounds, envelope);
}

#[test]
fn short_probe_stays_inside() {
    let envelope = Bounds::default();
    let mut sim = clamped(envelope, 1);

    let probe = probe_envelope(&mut sim, envelope.center(), 0.1, 5).unwrap();
    for i in 0..3 {
        assert!(probe.bounds.low[i] > envelope.low[i]);
        assert!(probe.bounds.high[i] < envelope.high[i]);
    }
}

#[test]
fn invalid_probe_parameters_rejected() {
    let mut sim = clamped(Bounds::default(), 1);
    let home = Bounds::default().center();

    assert!(matches!(
        probe_envelope(&mut sim, home, 0.0, 10),
        Err(ControlError::InvalidProbe(_))
    ));
    assert!(matches!(
        probe_envelope(&mut sim, home, 0.9, 0),
        Err(ControlError::InvalidProbe(_))
    ));
    assert_eq!(sim.run_calls(), 0);
}

#[test]
fn markdown_of_probe() {
    let envelope = Bounds::default();
    let mut sim = clamped(envelope, 1);
    let probe = probe_envelope(
        &mut sim,
        envelope.center(),
        DEFAULT_PROBE_SPEED,
        DEFAULT_PROBE_STEPS,
    )
    .unwrap();

    let md = envelope_markdown(&probe.bounds);
    assert!(md.contains("| X | -0.187 | 0.253 |"));
    assert!(md.contains("| Z | 0.1695 | 0.2908 |"));
}
