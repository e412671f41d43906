use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::audio::DecoderEvent;
use crate::audio::fake::FakeDecoder;
use crate::config::ArbitrationSetting;
use crate::library::Location;

fn service() -> (ServiceLoop<FakeDecoder>, FakeDecoder, StatusHandle) {
    let fake = FakeDecoder::default();
    let status = StatusHandle::default();
    (ServiceLoop::new(fake.clone(), Arc::clone(&status)), fake, status)
}

#[test]
fn play_loads_then_starts_when_prepared() {
    let (mut service, fake, status) = service();
    assert!(service.handle(ServiceCmd::Play("media://audio/abc".into())));
    assert_eq!(fake.log().loads.len(), 1);
    assert_eq!(fake.log().loads[0].0, Location::for_id("abc"));
    assert!(!status.lock().unwrap().playing);

    fake.prepared(fake.last_generation(), Duration::from_secs(1));
    service.pump();
    assert_eq!(fake.log().starts, 1);
    let status = status.lock().unwrap().clone();
    assert_eq!(status.location, Some(Location::for_id("abc")));
    assert!(status.playing);
}

#[test]
fn empty_or_malformed_locations_are_ignored() {
    let (mut service, fake, _) = service();
    assert!(service.handle(ServiceCmd::Play(String::new())));
    assert!(service.handle(ServiceCmd::Play("file:///tmp/x.mp3".into())));
    let log = fake.log();
    assert!(log.loads.is_empty());
    assert_eq!(log.resets, 0);
}

#[test]
fn play_replaces_the_previous_request() {
    let (mut service, fake, _) = service();
    service.handle(ServiceCmd::Play("media://audio/one".into()));
    let first = fake.last_generation();
    service.handle(ServiceCmd::Play("media://audio/two".into()));

    fake.prepared(first, Duration::from_secs(1));
    service.pump();
    assert_eq!(fake.log().starts, 0);
    assert_eq!(fake.log().resets, 2);
}

#[test]
fn stop_resets_and_discards_pending_preparation() {
    let (mut service, fake, status) = service();
    service.handle(ServiceCmd::Play("media://audio/one".into()));
    let generation = fake.last_generation();
    assert!(service.handle(ServiceCmd::Stop));

    fake.prepared(generation, Duration::from_secs(1));
    service.pump();
    assert_eq!(fake.log().starts, 0);
    assert_eq!(*status.lock().unwrap(), BackgroundStatus::default());
}

#[test]
fn completion_resets_the_decoder() {
    let (mut service, fake, status) = service();
    service.handle(ServiceCmd::Play("media://audio/one".into()));
    let generation = fake.last_generation();
    fake.prepared(generation, Duration::from_secs(1));
    fake.push(DecoderEvent::Completed { generation });
    service.pump();

    assert_eq!(fake.log().resets, 2);
    assert!(!status.lock().unwrap().playing);
}

#[test]
fn completion_and_failure_record_the_finished_request() {
    let (mut service, fake, status) = service();
    service.handle(ServiceCmd::Play("media://audio/one".into()));
    fake.push(DecoderEvent::Completed {
        generation: fake.last_generation(),
    });
    service.pump();
    assert_eq!(status.lock().unwrap().finished_request, Some(1));

    service.handle(ServiceCmd::Play("media://audio/two".into()));
    assert_eq!(status.lock().unwrap().finished_request, Some(1));
    fake.push(DecoderEvent::Failed {
        generation: fake.last_generation(),
        error: crate::audio::DecodeError::Output("gone".into()),
    });
    service.pump();
    let status = status.lock().unwrap().clone();
    assert_eq!(status.finished_request, Some(2));
    assert_eq!(status.location, None);
}

#[test]
fn stop_is_not_a_finish() {
    let (mut service, _, status) = service();
    service.handle(ServiceCmd::Play("media://audio/one".into()));
    service.handle(ServiceCmd::Stop);
    assert_eq!(status.lock().unwrap().finished_request, None);
}

#[test]
fn shutdown_command_ends_the_loop() {
    let (mut service, _, _) = service();
    assert!(!service.handle(ServiceCmd::Shutdown));
}

#[test]
fn service_thread_handles_commands_and_releases_on_shutdown() {
    let fake = FakeDecoder::default();
    let handle = fake.clone();
    let background = BackgroundPlayback::spawn(move || Ok(handle));

    background.play(&Location::for_id("abc"));
    background.shutdown();

    let log = fake.log();
    assert_eq!(log.loads.len(), 1);
    assert!(log.released);
    drop(log);
    assert_eq!(background.status(), BackgroundStatus::default());
}

#[test]
fn unavailable_decoder_does_not_block_shutdown() {
    let background = BackgroundPlayback::spawn(|| {
        Err::<FakeDecoder, _>(crate::audio::DecodeError::Output("no device".into()))
    });
    background.play(&Location::for_id("abc"));
    background.shutdown();
    background.shutdown();
}

#[test]
fn exclusive_claim_displaces_the_other_owner() {
    let mut arbiter = PlaybackArbiter::default();
    assert_eq!(arbiter.policy(), Policy::Exclusive);

    assert_eq!(arbiter.claim(Owner::Player), None);
    assert_eq!(arbiter.claim(Owner::Background), Some(Owner::Player));
    assert!(!arbiter.holds(Owner::Player));
    assert!(arbiter.holds(Owner::Background));

    assert_eq!(arbiter.claim(Owner::Background), None);
    arbiter.release(Owner::Background);
    assert_eq!(arbiter.claim(Owner::Player), None);
}

#[test]
fn independent_claims_coexist() {
    let mut arbiter = PlaybackArbiter::new(Policy::Independent);
    assert_eq!(arbiter.claim(Owner::Player), None);
    assert_eq!(arbiter.claim(Owner::Background), None);
    assert!(arbiter.holds(Owner::Player));
    assert!(arbiter.holds(Owner::Background));
}

#[test]
fn policy_follows_settings() {
    assert_eq!(Policy::from(ArbitrationSetting::Exclusive), Policy::Exclusive);
    assert_eq!(
        Policy::from(ArbitrationSetting::Independent),
        Policy::Independent
    );
}
