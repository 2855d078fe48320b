//! Portable math primitives.
//!
//! Thin wrappers with uniform semantics across the float types used by the
//! interpolation kernels, so numerical behavior does not depend on which
//! math library a platform links.

use crate::num::MFloat;

/// Returns pi in the requested precision.
pub fn pi<F: MFloat>() -> F {
    F::from_f64(std::f64::consts::PI).unwrap()
}

/// Returns cos(pi*x) given x.
pub fn cospi<F: MFloat>(x: F) -> F {
    (pi::<F>() * x).cos()
}

/// Returns sin(pi*x) given x.
pub fn sinpi<F: MFloat>(x: F) -> F {
    (pi::<F>() * x).sin()
}

/// Returns the sine and cosine of the given number.
pub fn sincos<F: MFloat>(x: F) -> (F, F) {
    x.sin_cos()
}

/// Returns sin(pi*x) and cos(pi*x) given x.
pub fn sincospi<F: MFloat>(x: F) -> (F, F) {
    sincos(pi::<F>() * x)
}

/// Returns the absolute value of the given number.
pub fn abs<F: MFloat>(x: F) -> F {
    x.abs()
}

/// Returns x raised to the given integer power, by repeated squaring.
pub fn powi<F: MFloat>(x: F, power: i32) -> F {
    let mut result = F::one();
    let mut base = x;
    let mut exponent = power.unsigned_abs();
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * base;
        }
        base = base * base;
        exponent >>= 1;
    }
    if power < 0 {
        F::one() / result
    } else {
        result
    }
}
