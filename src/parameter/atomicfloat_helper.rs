use atomic_float::AtomicF32;

use serde::Serializer;
use serde_with::SerializeAs;
use std::sync::atomic::Ordering;

/// Serializes an `AtomicF32` as a plain number.
/// Deserializing goes through `FloatParameter::new` so the value is clamped.
pub struct AtomicF32Json;

impl SerializeAs<AtomicF32> for AtomicF32Json {
    fn serialize_as<S>(value: &AtomicF32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f32(value.load(Ordering::Relaxed))
    }
}
