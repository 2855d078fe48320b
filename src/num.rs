//! Utilities related to numbers.

use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait MFloat:
    Sync + Send + num::Float + num::cast::FromPrimitive + fmt::Debug + 'static
{
}

impl MFloat for f32 {}
impl MFloat for f64 {}
