//! Positional encoding of `Track` and `Location`.
//!
//! A track is written as a fixed five-element sequence
//! `[id, title, artist, duration_ms, location]`. Readers and writers must keep
//! this order; the encoding carries no field names.

use std::fmt;

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::model::{Location, Track};

const TRACK_FIELDS: usize = 5;

impl Serialize for Track {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_tuple(TRACK_FIELDS)?;
        seq.serialize_element(self.id())?;
        seq.serialize_element(self.title())?;
        seq.serialize_element(self.artist())?;
        seq.serialize_element(&self.duration_ms())?;
        seq.serialize_element(self.location())?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Track {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(TRACK_FIELDS, TrackVisitor)
    }
}

struct TrackVisitor;

impl<'de> Visitor<'de> for TrackVisitor {
    type Value = Track;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of {TRACK_FIELDS} track fields")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Track, A::Error> {
        let id: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let title: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let artist: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        let duration_ms: u64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(3, &self))?;
        let location: Location = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(4, &self))?;

        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(TRACK_FIELDS + 1, &self));
        }

        Ok(Track::from_parts(id, title, artist, duration_ms, location))
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Location::parse(&raw).map_err(de::Error::custom)
    }
}
