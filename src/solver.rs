//! Adapter exposing a multigrid solver as a matrix operator for GMRES.

use crate::num::MFloat;
use num::{Float, Zero};
use std::mem;

/// Defines the vector operations a GMRES iteration needs from the solution
/// and right-hand-side vectors of a linear system.
pub trait LinearVector {
    /// Element type of the vector.
    type Value: MFloat;

    /// Sets every valid element to the given value.
    fn set_all(&mut self, value: Self::Value);

    /// Copies the valid elements of the given vector into this one.
    fn assign(&mut self, other: &Self);

    /// Multiplies every valid element by the given factor.
    fn scale(&mut self, factor: Self::Value);

    /// Adds the given vector scaled by the given factor to this one.
    fn add_scaled(&mut self, other: &Self, factor: Self::Value);

    /// Overwrites this vector with `a * va + b * vb`.
    fn linear_combination(&mut self, a: Self::Value, va: &Self, b: Self::Value, vb: &Self);
}

/// Defines the multigrid-solver operations needed to act as the matrix
/// operator and preconditioner of a GMRES iteration.
pub trait MultigridSolver {
    /// The vector type the solver operates on.
    type Vector: LinearVector;

    /// Creates a zeroed vector with the given number of ghost layers.
    fn make_vector(&self, num_ghost_layers: usize) -> Self::Vector;

    /// Computes the inner product of the valid elements of the two vectors.
    fn inner_product(
        &self,
        a: &Self::Vector,
        b: &Self::Vector,
    ) -> <Self::Vector as LinearVector>::Value;

    /// Applies the linear operator with homogeneous boundary conditions,
    /// writing `L(operand)` into `result`.
    fn apply_operator(&self, result: &mut Self::Vector, operand: &Self::Vector);

    /// Performs one smoothing sweep on `solution` for the given right-hand
    /// side, discarding the current solution content when `initialize` is set.
    fn smooth(&self, solution: &mut Self::Vector, rhs: &Self::Vector, initialize: bool);
}

/// Wraps a multigrid solver as the matrix operator of a GMRES iteration,
/// optionally using a few smoothing sweeps as the preconditioner.
pub struct GmresMultigrid<'a, M> {
    solver: &'a M,
    use_preconditioner: bool,
}

impl<'a, M: MultigridSolver> GmresMultigrid<'a, M> {
    /// Number of smoothing sweeps applied by the preconditioner.
    const SMOOTHING_SWEEPS: usize = 4;

    /// Creates a new GMRES operator wrapping the given multigrid solver,
    /// with preconditioning disabled.
    pub fn new(solver: &'a M) -> Self {
        Self {
            solver,
            use_preconditioner: false,
        }
    }

    /// Creates a vector suitable as a right-hand side (no ghost layers).
    pub fn make_vec_rhs(&self) -> M::Vector {
        self.solver.make_vector(0)
    }

    /// Creates a vector suitable as a left-hand side (one ghost layer,
    /// with ghost values zeroed).
    pub fn make_vec_lhs(&self) -> M::Vector {
        self.solver.make_vector(1)
    }

    /// Computes the 2-norm of the given vector.
    pub fn norm2(&self, vector: &M::Vector) -> <M::Vector as LinearVector>::Value {
        self.solver.inner_product(vector, vector).sqrt()
    }

    /// Computes the inner product of the two given vectors.
    pub fn dot_product(
        &self,
        a: &M::Vector,
        b: &M::Vector,
    ) -> <M::Vector as LinearVector>::Value {
        self.solver.inner_product(a, b)
    }

    /// Multiplies every element of the given vector by the given factor.
    pub fn scale(vector: &mut M::Vector, factor: <M::Vector as LinearVector>::Value) {
        vector.scale(factor);
    }

    /// Sets every element of the given vector to the given value.
    pub fn set_all(vector: &mut M::Vector, value: <M::Vector as LinearVector>::Value) {
        vector.set_all(value);
    }

    /// Copies `rhs` into `lhs`.
    pub fn assign(lhs: &mut M::Vector, rhs: &M::Vector) {
        lhs.assign(rhs);
    }

    /// Adds `factor * rhs` to `lhs`.
    pub fn add_scaled(
        lhs: &mut M::Vector,
        rhs: &M::Vector,
        factor: <M::Vector as LinearVector>::Value,
    ) {
        lhs.add_scaled(rhs, factor);
    }

    /// Overwrites `lhs` with `a * va + b * vb`.
    pub fn linear_combination(
        lhs: &mut M::Vector,
        a: <M::Vector as LinearVector>::Value,
        va: &M::Vector,
        b: <M::Vector as LinearVector>::Value,
        vb: &M::Vector,
    ) {
        lhs.linear_combination(a, va, b, vb);
    }

    /// Applies the linear operator, writing `L(operand)` into `result`.
    pub fn apply(&self, result: &mut M::Vector, operand: &M::Vector) {
        self.solver.apply_operator(result, operand);
    }

    /// Applies the preconditioner to the given right-hand side, writing the
    /// approximate solution into `result`.
    ///
    /// With preconditioning enabled this smooths a zero initial guess a few
    /// times; otherwise it reduces to a copy.
    pub fn precond(&self, result: &mut M::Vector, rhs: &M::Vector) {
        if self.use_preconditioner {
            result.set_all(<M::Vector as LinearVector>::Value::zero());
            for sweep in 0..Self::SMOOTHING_SWEEPS {
                self.solver.smooth(result, rhs, sweep == 0);
            }
        } else {
            result.assign(rhs);
        }
    }

    /// Enables or disables preconditioning and returns the previous setting.
    pub fn use_precond(&mut self, new_flag: bool) -> bool {
        mem::replace(&mut self.use_preconditioner, new_flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Plain dense vector; ghost layers are irrelevant for the toy operator.
    #[derive(Clone, Debug, PartialEq)]
    struct DenseVector(Vec<f64>);

    impl LinearVector for DenseVector {
        type Value = f64;

        fn set_all(&mut self, value: f64) {
            self.0.iter_mut().for_each(|element| *element = value);
        }

        fn assign(&mut self, other: &Self) {
            self.0.copy_from_slice(&other.0);
        }

        fn scale(&mut self, factor: f64) {
            self.0.iter_mut().for_each(|element| *element *= factor);
        }

        fn add_scaled(&mut self, other: &Self, factor: f64) {
            for (element, &other_element) in self.0.iter_mut().zip(&other.0) {
                *element += factor * other_element;
            }
        }

        fn linear_combination(&mut self, a: f64, va: &Self, b: f64, vb: &Self) {
            for ((element, &va_element), &vb_element) in
                self.0.iter_mut().zip(&va.0).zip(&vb.0)
            {
                *element = a * va_element + b * vb_element;
            }
        }
    }

    /// Diagonal operator L(x) = diagonal * x, with exact Jacobi smoothing.
    struct DiagonalSolver {
        size: usize,
        diagonal: f64,
    }

    impl MultigridSolver for DiagonalSolver {
        type Vector = DenseVector;

        fn make_vector(&self, _num_ghost_layers: usize) -> DenseVector {
            DenseVector(vec![0.0; self.size])
        }

        fn inner_product(&self, a: &DenseVector, b: &DenseVector) -> f64 {
            a.0.iter().zip(&b.0).map(|(&x, &y)| x * y).sum()
        }

        fn apply_operator(&self, result: &mut DenseVector, operand: &DenseVector) {
            for (element, &operand_element) in result.0.iter_mut().zip(&operand.0) {
                *element = self.diagonal * operand_element;
            }
        }

        fn smooth(&self, solution: &mut DenseVector, rhs: &DenseVector, initialize: bool) {
            if initialize {
                solution.set_all(0.0);
            }
            for (element, &rhs_element) in solution.0.iter_mut().zip(&rhs.0) {
                *element = rhs_element / self.diagonal;
            }
        }
    }

    #[test]
    fn norm_and_dot_product_delegate_to_the_solver() {
        let solver = DiagonalSolver {
            size: 4,
            diagonal: 2.0,
        };
        let gmres = GmresMultigrid::new(&solver);

        let mut ones = gmres.make_vec_rhs();
        ones.set_all(1.0);
        assert_relative_eq!(gmres.norm2(&ones), 2.0);
        assert_relative_eq!(gmres.dot_product(&ones, &ones), 4.0);
    }

    #[test]
    fn apply_evaluates_the_operator() {
        let solver = DiagonalSolver {
            size: 3,
            diagonal: 2.0,
        };
        let gmres = GmresMultigrid::new(&solver);

        let mut operand = gmres.make_vec_lhs();
        operand.set_all(1.5);
        let mut result = gmres.make_vec_rhs();
        gmres.apply(&mut result, &operand);
        assert_eq!(result, DenseVector(vec![3.0; 3]));
    }

    #[test]
    fn precond_copies_unless_enabled() {
        let solver = DiagonalSolver {
            size: 3,
            diagonal: 2.0,
        };
        let mut gmres = GmresMultigrid::new(&solver);

        let mut rhs = gmres.make_vec_rhs();
        rhs.set_all(4.0);
        let mut result = gmres.make_vec_lhs();

        gmres.precond(&mut result, &rhs);
        assert_eq!(result, DenseVector(vec![4.0; 3]));

        assert!(!gmres.use_precond(true));
        gmres.precond(&mut result, &rhs);
        assert_eq!(result, DenseVector(vec![2.0; 3]));

        assert!(gmres.use_precond(false));
    }

    #[test]
    fn vector_operations_are_thin_wrappers() {
        let solver = DiagonalSolver {
            size: 2,
            diagonal: 1.0,
        };
        let gmres = GmresMultigrid::new(&solver);

        let mut a = gmres.make_vec_rhs();
        let mut b = gmres.make_vec_rhs();
        GmresMultigrid::<DiagonalSolver>::set_all(&mut a, 1.0);
        GmresMultigrid::<DiagonalSolver>::set_all(&mut b, 2.0);

        GmresMultigrid::<DiagonalSolver>::add_scaled(&mut a, &b, 2.0);
        assert_eq!(a, DenseVector(vec![5.0; 2]));

        GmresMultigrid::<DiagonalSolver>::scale(&mut a, 0.5);
        assert_eq!(a, DenseVector(vec![2.5; 2]));

        let mut c = gmres.make_vec_rhs();
        GmresMultigrid::<DiagonalSolver>::linear_combination(&mut c, 2.0, &a, -1.0, &b);
        assert_eq!(c, DenseVector(vec![3.0; 2]));

        GmresMultigrid::<DiagonalSolver>::assign(&mut c, &b);
        assert_eq!(c, b);
    }
}
