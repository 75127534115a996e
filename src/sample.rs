//! Numeric element types accepted as dataset samples.

/// A primitive numeric type that can appear in a dataset.
///
/// Integer and floating-point datasets go through the same estimators:
/// every element is widened to `f64` before it is accumulated, so
/// `[1, 2, 3]` and `[1.0, 2.0, 3.0]` produce bit-identical statistics.
///
/// # Precision
/// `i64`, `u64`, `isize` and `usize` values beyond 2⁵³ are rounded to the
/// nearest representable `f64`.
pub trait Sample: Copy {
    /// Widen to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($t:ty),* $(,)?) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
