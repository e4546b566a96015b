use atomic_float::AtomicF32;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::ops::RangeInclusive;
use std::sync::atomic::Ordering;

mod atomicfloat_helper;
use atomicfloat_helper::AtomicF32Json;

pub trait Parameter<T> {
    fn new(init: T, range: RangeInclusive<T>, label: impl Into<String>) -> Self;
    fn get(&self) -> T;
    fn set(&self, v: T);
}

/// A float value shared between the control thread and the audio thread.
/// Stores are clamped into `range`, including the one made when deserializing.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
#[serde(from = "FloatParameterData")]
pub struct FloatParameter {
    #[serde_as(serialize_as = "AtomicF32Json")]
    value: AtomicF32,
    range: RangeInclusive<f32>,
    label: String,
}

#[derive(Deserialize)]
struct FloatParameterData {
    value: f32,
    range: RangeInclusive<f32>,
    label: String,
}

impl From<FloatParameterData> for FloatParameter {
    fn from(d: FloatParameterData) -> Self {
        FloatParameter::new(d.value, d.range, d.label)
    }
}

impl FloatParameter {
    pub fn range(&self) -> &RangeInclusive<f32> {
        &self.range
    }
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Clone for FloatParameter {
    fn clone(&self) -> Self {
        Self {
            value: AtomicF32::new(self.get()),
            range: self.range.clone(),
            label: self.label.clone(),
        }
    }
}

impl Parameter<f32> for FloatParameter {
    fn new(init: f32, range: RangeInclusive<f32>, label: impl Into<String>) -> Self {
        let res = Self {
            value: AtomicF32::new(*range.start()),
            range,
            label: label.into(),
        };
        res.set(init);
        res
    }

    fn get(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }
    // note that no need to be "&mut self" here.
    fn set(&self, v: f32) {
        // NaN would pass through max/min untouched.
        let v = if v.is_nan() { *self.range.start() } else { v };
        self.value.store(
            v.max(*self.range.start()).min(*self.range.end()),
            Ordering::Relaxed,
        );
    }
}
