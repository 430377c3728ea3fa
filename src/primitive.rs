use num::{NumCast, Zero, Float};
use std::{
    fmt::{Debug, Display, LowerExp}, iter::Sum, ops::{Add, AddAssign, Sub, SubAssign}
};

pub trait Primitive: Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> {
    /// Convert a row counter into the primitive type.
    /// Counters exceeding the representable range saturate to infinity.
    #[inline(always)]
    fn from_count(cnt: u64) -> Self {
        <Self as NumCast>::from(cnt).unwrap_or_else(Self::infinity)
    }
}
impl Primitive for f32 {}
impl Primitive for f64 {}
