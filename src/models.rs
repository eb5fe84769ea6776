use serde::{Deserialize, Deserializer};

pub mod quotes;
pub mod users;

/// Deserializes a present field as `Some`, so that an explicit `null` becomes
/// `Some(None)` while a missing field stays `None` through `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
