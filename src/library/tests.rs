use std::time::Duration;

use super::memory::{MemoryStore, row};
use super::*;

#[test]
fn duration_ms_saturates_instead_of_truncating() {
    assert_eq!(duration_ms(Duration::from_millis(75_400)), 75_400);
    assert_eq!(duration_ms(Duration::MAX), u64::MAX);
}

#[test]
fn format_mmss_pads_minutes_and_seconds() {
    assert_eq!(format_mmss(0), "00:00");
    assert_eq!(format_mmss(999), "00:00");
    assert_eq!(format_mmss(61_000), "01:01");
    assert_eq!(format_mmss(754_321), "12:34");
    assert_eq!(format_mmss(6_000_000), "100:00");
}

#[test]
fn format_duration_of_unknown_is_empty() {
    assert_eq!(format_duration(None), "");
    assert_eq!(format_duration(Some(0)), "00:00");
    assert_eq!(format_duration(Some(59_999)), "00:59");
}

#[test]
fn load_tracks_keeps_only_music() {
    let mut not_music = row("2", "Podcast");
    not_music.is_music = false;
    let mut alarm = row("3", "Alarm");
    alarm.is_alarm = true;
    let mut ringtone = row("4", "Ring");
    ringtone.is_ringtone = true;

    let store = MemoryStore::with_rows(vec![row("1", "Song"), not_music, alarm, ringtone]);
    let tracks = load_tracks(&store);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title(), "Song");
}

#[test]
fn load_tracks_sorts_by_title() {
    let store = MemoryStore::with_rows(vec![row("1", "B"), row("2", "A")]);
    let titles: Vec<String> = load_tracks(&store)
        .iter()
        .map(|t| t.title().to_string())
        .collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn load_tracks_sort_ignores_case() {
    let store = MemoryStore::with_rows(vec![row("1", "beta"), row("2", "Alpha"), row("3", "Gamma")]);
    let titles: Vec<String> = load_tracks(&store)
        .iter()
        .map(|t| t.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Alpha", "beta", "Gamma"]);
}

#[test]
fn load_tracks_derives_location_from_id() {
    let store = MemoryStore::with_rows(vec![row("42", "Song")]);
    let tracks = load_tracks(&store);
    assert_eq!(tracks[0].location(), &Location::for_id("42"));
    assert_eq!(tracks[0].location().as_str(), "media://audio/42");
    assert_eq!(tracks[0].duration_ms(), 180_000);
}

#[test]
fn load_tracks_from_unavailable_index_is_empty() {
    let store = MemoryStore {
        rows: vec![row("1", "Song")],
        unavailable: true,
        ..MemoryStore::default()
    };
    assert!(load_tracks(&store).is_empty());
}

#[test]
fn location_parse_accepts_only_media_locations() {
    let loc = Location::parse("media://audio/abc").unwrap();
    assert_eq!(loc.id(), "abc");
    assert_eq!(
        Location::parse("file:///tmp/a.mp3"),
        Err(LocationError::Scheme("file:///tmp/a.mp3".to_string()))
    );
    assert_eq!(
        Location::parse("media://audio/"),
        Err(LocationError::MissingId("media://audio/".to_string()))
    );
}

#[test]
fn track_encodes_fields_in_fixed_order() {
    let track = Track::new("7", "Title", "Artist", 1234);
    let value = serde_json::to_value(&track).unwrap();
    assert_eq!(
        value,
        serde_json::json!(["7", "Title", "Artist", 1234, "media://audio/7"])
    );

    let back: Track = serde_json::from_value(value).unwrap();
    assert_eq!(back, track);
}

#[test]
fn track_decode_rejects_short_and_long_sequences() {
    let short = serde_json::json!(["7", "Title", "Artist", 1234]);
    assert!(serde_json::from_value::<Track>(short).is_err());

    let long = serde_json::json!(["7", "Title", "Artist", 1234, "media://audio/7", "extra"]);
    assert!(serde_json::from_value::<Track>(long).is_err());
}

#[test]
fn track_decode_rejects_bad_location() {
    let value = serde_json::json!(["7", "Title", "Artist", 1234, "/tmp/song.mp3"]);
    assert!(serde_json::from_value::<Track>(value).is_err());
}

#[test]
fn default_artwork_lookup_goes_through_resolve() {
    struct PathOnly;
    impl MediaStore for PathOnly {
        fn query(&self) -> Result<Vec<IndexRow>, LibraryError> {
            Ok(Vec::new())
        }
        fn resolve(&self, _location: &Location) -> Option<std::path::PathBuf> {
            Some(std::path::PathBuf::from("/definitely/not/here.mp3"))
        }
    }

    let loc = Location::for_id("x");
    assert!(PathOnly.artwork(&loc).is_none());
    assert!(!PathOnly.has_artwork(&loc));
}
