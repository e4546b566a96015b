use serde::{Deserialize, Serialize};
use std::{marker::PhantomData, sync::atomic};

pub struct Primitive<P, A>
where
    P: Copy,
    A: From<P>,
{
    v: A,
    phantom_data: PhantomData<P>,
}

pub trait SimpleAtomic<T>
where
    T: Copy,
{
    const ORDER: atomic::Ordering = atomic::Ordering::Relaxed;
    fn load(&self) -> T;
    fn store(&self, v: T);
    /// Stores `v` and returns the previous value.
    fn swap(&self, v: T) -> T;
}
impl<P, A> From<P> for Primitive<P, A>
where
    P: Copy,
    A: From<P>,
{
    fn from(v: P) -> Self {
        Self {
            v: A::from(v),
            phantom_data: PhantomData::<P> {},
        }
    }
}

macro_rules! impl_simple_atomic {
    ($name:ident,$p:ty,$ps:literal,$a:ty) => {
        impl SimpleAtomic<$p> for Primitive<$p, $a> {
            fn load(&self) -> $p {
                self.v.load(Self::ORDER)
            }
            fn store(&self, v: $p) {
                self.v.store(v, Self::ORDER)
            }
            fn swap(&self, v: $p) -> $p {
                self.v.swap(v, Self::ORDER)
            }
        }
        impl Clone for Primitive<$p, $a> {
            fn clone(&self) -> Self {
                Self::from(self.load())
            }
        }
        impl std::fmt::Debug for Primitive<$p, $a> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.load(), f)
            }
        }
        #[derive(Clone, Debug, Serialize, Deserialize)]
        #[serde(from=$ps,into=$ps)]
        pub struct $name(pub Primitive<$p, $a>);

        impl $name {
            pub fn new(v: $p) -> Self {
                Self::from(v)
            }
            pub fn load(&self) -> $p {
                self.0.load()
            }
            pub fn store(&self, v: $p) {
                self.0.store(v)
            }
            pub fn swap(&self, v: $p) -> $p {
                self.0.swap(v)
            }
        }
        impl From<$p> for $name {
            fn from(v: $p) -> Self {
                $name(Primitive::<$p, $a>::from(v))
            }
        }
        impl From<$name> for $p {
            fn from(v: $name) -> $p {
                v.0.load()
            }
        }
    };
}

impl_simple_atomic!(Bool, bool, "bool", atomic::AtomicBool);
impl_simple_atomic!(U8, u8, "u8", atomic::AtomicU8);
impl_simple_atomic!(U64, u64, "u64", atomic::AtomicU64);
