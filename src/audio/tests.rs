use std::time::{Duration, Instant};

use super::clock::PlayClock;
use super::*;

#[test]
fn generations_increase() {
    let g = Generation::default();
    assert_eq!(g.get(), 0);
    assert!(g.next() > g);
    assert_eq!(g.next().next().get(), 2);
}

#[test]
fn event_generation_covers_every_variant() {
    let g = Generation::default().next();
    let prepared = DecoderEvent::Prepared {
        generation: g,
        duration: Duration::ZERO,
    };
    let completed = DecoderEvent::Completed { generation: g };
    let failed = DecoderEvent::Failed {
        generation: g,
        error: DecodeError::Output("none".into()),
    };
    assert_eq!(prepared.generation(), g);
    assert_eq!(completed.generation(), g);
    assert_eq!(failed.generation(), g);
}

#[test]
fn clock_accumulates_across_pauses() {
    let t0 = Instant::now();
    let mut clock = PlayClock::default();
    assert_eq!(clock.elapsed(t0), Duration::ZERO);

    clock.resume(t0);
    assert!(clock.is_running());
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(3)), Duration::from_secs(3));

    clock.pause(t0 + Duration::from_secs(3));
    assert!(!clock.is_running());
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(10)), Duration::from_secs(3));

    clock.resume(t0 + Duration::from_secs(10));
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(12)), Duration::from_secs(5));
}

#[test]
fn clock_set_jumps_and_keeps_running_state() {
    let t0 = Instant::now();
    let mut clock = PlayClock::default();
    clock.resume(t0);
    clock.set(Duration::from_secs(60), t0 + Duration::from_secs(1));
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(2)), Duration::from_secs(61));

    clock.pause(t0 + Duration::from_secs(2));
    clock.set(Duration::from_secs(5), t0 + Duration::from_secs(4));
    assert!(!clock.is_running());
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(9)), Duration::from_secs(5));

    clock.reset();
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(9)), Duration::ZERO);
}
