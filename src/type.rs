use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast, ToPrimitive};

/// A trait for types that can be used as indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. All distance arithmetic is
/// carried out in `f64`, so every coordinate type must convert to it without failure.
pub trait Coordinate:
    private::Sealed + Num + NumCast + ToPrimitive + PartialOrd + Copy + Debug + Send + Sync + Bounded
{
    /// Widen this coordinate to `f64`.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl Coordinate for i8 {}
impl Coordinate for u8 {}
impl Coordinate for i16 {}
impl Coordinate for u16 {}
impl Coordinate for i32 {}
impl Coordinate for u32 {}
impl Coordinate for f32 {}

impl Coordinate for f64 {
    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
