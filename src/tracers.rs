//! Tracer particles and data-parallel batch sampling.

use crate::{
    field::{FieldHandle2, FieldHandle3, FieldSampler2, FieldSampler3},
    geometry::{Point2, Point3},
    grid::{GridGeometry2, GridGeometry3},
    interpolation::{linear, terrain},
    num::MFloat,
};
use rayon::prelude::*;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Defines read access to the position of a 3D tracer particle.
pub trait TracerPosition3<F: MFloat>: Sync {
    /// Returns the position of the particle.
    fn position(&self) -> &Point3<F>;
}

/// Defines read access to the position of a 2D tracer particle.
pub trait TracerPosition2<F: MFloat>: Sync {
    /// Returns the position of the particle.
    fn position(&self) -> &Point2<F>;
}

/// Defines read access to the position of a 1D tracer particle.
pub trait TracerPosition1<F: MFloat>: Sync {
    /// Returns the position of the particle.
    fn position(&self) -> F;
}

/// Defines the state a 3D tracer particle must carry to be interpolated to
/// on a terrain-fitted mesh.
pub trait TerrainTracer3<F: MFloat>: TracerPosition3<F> {
    /// Returns the estimated vertical cell index of the particle, normally
    /// the index resolved at the previous evaluation.
    fn vertical_cell_hint(&self) -> isize;
}

/// Defines the state a 2D tracer particle must carry to be interpolated to
/// on a terrain-fitted mesh.
pub trait TerrainTracer2<F: MFloat>: TracerPosition2<F> {
    /// Returns the estimated vertical cell index of the particle, normally
    /// the index resolved at the previous evaluation.
    fn vertical_cell_hint(&self) -> isize;
}

/// A minimal 3D tracer particle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Tracer3<F> {
    position: Point3<F>,
    vertical_cell: isize,
}

impl<F: MFloat> Tracer3<F> {
    /// Creates a new tracer at the given position with the given vertical
    /// cell index.
    pub fn new(position: Point3<F>, vertical_cell: isize) -> Self {
        Self {
            position,
            vertical_cell,
        }
    }

    /// Moves the tracer to the given position.
    pub fn move_to(&mut self, position: Point3<F>) {
        self.position = position;
    }

    /// Updates the stored vertical cell index.
    pub fn set_vertical_cell(&mut self, vertical_cell: isize) {
        self.vertical_cell = vertical_cell;
    }
}

impl<F: MFloat> TracerPosition3<F> for Tracer3<F> {
    fn position(&self) -> &Point3<F> {
        &self.position
    }
}

impl<F: MFloat> TerrainTracer3<F> for Tracer3<F> {
    fn vertical_cell_hint(&self) -> isize {
        self.vertical_cell
    }
}

/// A minimal 2D tracer particle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Tracer2<F> {
    position: Point2<F>,
    vertical_cell: isize,
}

impl<F: MFloat> Tracer2<F> {
    /// Creates a new tracer at the given position with the given vertical
    /// cell index.
    pub fn new(position: Point2<F>, vertical_cell: isize) -> Self {
        Self {
            position,
            vertical_cell,
        }
    }

    /// Moves the tracer to the given position.
    pub fn move_to(&mut self, position: Point2<F>) {
        self.position = position;
    }

    /// Updates the stored vertical cell index.
    pub fn set_vertical_cell(&mut self, vertical_cell: isize) {
        self.vertical_cell = vertical_cell;
    }
}

impl<F: MFloat> TracerPosition2<F> for Tracer2<F> {
    fn position(&self) -> &Point2<F> {
        &self.position
    }
}

impl<F: MFloat> TerrainTracer2<F> for Tracer2<F> {
    fn vertical_cell_hint(&self) -> isize {
        self.vertical_cell
    }
}

/// A minimal 1D tracer particle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Tracer1<F> {
    position: F,
}

impl<F: MFloat> Tracer1<F> {
    /// Creates a new tracer at the given position.
    pub fn new(position: F) -> Self {
        Self { position }
    }

    /// Moves the tracer to the given position.
    pub fn move_to(&mut self, position: F) {
        self.position = position;
    }
}

impl<F: MFloat> TracerPosition1<F> for Tracer1<F> {
    fn position(&self) -> F {
        self.position
    }
}

/// Interpolates the given 3D fields to every tracer in the given slice,
/// processing tracers in parallel.
///
/// Returns one value vector per tracer, laid out as for
/// [`linear::interpolate_to_particle_3`].
pub fn sample_for_tracers_3<F, P>(
    tracers: &[P],
    geometry: &GridGeometry3<F>,
    fields: &[FieldHandle3<'_, F>],
    start_comp: usize,
    n_comp: usize,
) -> Vec<Vec<F>>
where
    F: MFloat,
    P: TracerPosition3<F>,
{
    tracers
        .par_iter()
        .map(|tracer| {
            let mut values = vec![F::zero(); fields.len() * n_comp];
            linear::interpolate_to_particle_3(
                tracer, geometry, fields, start_comp, n_comp, &mut values,
            );
            values
        })
        .collect()
}

/// Interpolates the given 2D fields to every tracer in the given slice,
/// processing tracers in parallel.
pub fn sample_for_tracers_2<F, P>(
    tracers: &[P],
    geometry: &GridGeometry2<F>,
    fields: &[FieldHandle2<'_, F>],
    start_comp: usize,
    n_comp: usize,
) -> Vec<Vec<F>>
where
    F: MFloat,
    P: TracerPosition2<F>,
{
    tracers
        .par_iter()
        .map(|tracer| {
            let mut values = vec![F::zero(); fields.len() * n_comp];
            linear::interpolate_to_particle_2(
                tracer, geometry, fields, start_comp, n_comp, &mut values,
            );
            values
        })
        .collect()
}

/// Interpolates the given 3D fields to every tracer in the given slice on
/// a terrain-fitted mesh, processing tracers in parallel.
pub fn sample_for_tracers_mapped_3<F, P>(
    tracers: &[P],
    geometry: &GridGeometry3<F>,
    fields: &[FieldHandle3<'_, F>],
    heights: &dyn FieldSampler3<F>,
    start_comp: usize,
    n_comp: usize,
) -> Vec<Vec<F>>
where
    F: MFloat,
    P: TerrainTracer3<F>,
{
    tracers
        .par_iter()
        .map(|tracer| {
            let mut values = vec![F::zero(); fields.len() * n_comp];
            terrain::interpolate_to_particle_mapped_3(
                tracer, geometry, fields, heights, start_comp, n_comp, &mut values,
            );
            values
        })
        .collect()
}

/// Interpolates the given 2D fields to every tracer in the given slice on
/// a terrain-fitted mesh, processing tracers in parallel.
pub fn sample_for_tracers_mapped_2<F, P>(
    tracers: &[P],
    geometry: &GridGeometry2<F>,
    fields: &[FieldHandle2<'_, F>],
    heights: &dyn FieldSampler2<F>,
    start_comp: usize,
    n_comp: usize,
) -> Vec<Vec<F>>
where
    F: MFloat,
    P: TerrainTracer2<F>,
{
    tracers
        .par_iter()
        .map(|tracer| {
            let mut values = vec![F::zero(); fields.len() * n_comp];
            terrain::interpolate_to_particle_mapped_2(
                tracer, geometry, fields, heights, start_comp, n_comp, &mut values,
            );
            values
        })
        .collect()
}
