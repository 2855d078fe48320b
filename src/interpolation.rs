//! Interpolation of mesh fields to tracer particle positions.
//!
//! Each kernel consumes one or more [`field handles`](crate::field::FieldHandle3)
//! and writes the interpolated values into a caller-provided flat buffer,
//! ordered by field first and component second. The kernels are pure
//! functions of their inputs and can be invoked concurrently for any number
//! of particles as long as the sampled fields are not mutated meanwhile.
//!
//! No bounds are checked against the extents of the sampled fields: every
//! field must provide at least one ghost/halo layer beyond the stencil
//! lower corner in each axis (and one below the seed vertical index for the
//! terrain-fitted kernels).

pub mod linear;
pub mod terrain;

use crate::num::MFloat;

/// Floors a fractional mesh index to the integer index of the stencil
/// lower corner, rounding toward negative infinity.
fn floor_index<F: MFloat>(coord: F) -> isize {
    coord
        .floor()
        .to_isize()
        .expect("Fractional mesh index not representable as isize")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_index_rounds_toward_negative_infinity() {
        assert_eq!(floor_index(1.5_f64), 1);
        assert_eq!(floor_index(-0.25_f64), -1);
        assert_eq!(floor_index(-2.0_f64), -2);
    }
}
