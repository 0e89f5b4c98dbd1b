//! Timestamps are rendered in fixed UTC+8, whatever offset the store returns.
//! Use as `#[serde(with = "crate::zoned")]` on `OffsetDateTime` fields.

use serde::{Deserializer, Serializer};
use time::{OffsetDateTime, UtcOffset, macros::offset};

pub const ZONE: UtcOffset = offset!(+8);

pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(ZONE)
}

pub fn in_zone(value: OffsetDateTime) -> OffsetDateTime {
    value.to_offset(ZONE)
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    time::serde::rfc3339::serialize(&in_zone(*value), serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    time::serde::rfc3339::deserialize(deserializer)
}
