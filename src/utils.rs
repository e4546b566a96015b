//! Misc utilities such as Atomic Structure.
pub mod atomic;
pub mod logger;
