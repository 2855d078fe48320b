//! Multilinear interpolation on terrain-fitted meshes.
//!
//! On a terrain-fitted mesh the vertical coordinate follows a height field
//! of mesh-node elevations instead of being uniform, so the enclosing
//! vertical cell cannot be found by flooring a fractional index. The
//! kernels here locate it by comparing the particle elevation against the
//! terrain surface reconstructed from the height field, starting from the
//! seed vertical index carried on the particle.
//!
//! The seed is assumed to be at most one cell away from the true enclosing
//! cell (temporal coherence between evaluations); the locator applies a
//! single-step correction and performs no further search, so a staler seed
//! gives a silently wrong result.

use super::floor_index;
use crate::{
    field::{
        FieldHandle1, FieldHandle2, FieldHandle3, FieldSampler1, FieldSampler2, FieldSampler3,
    },
    geometry::{
        Dim2,
        Dim3::{X, Y, Z},
        Idx2, Idx3, In3D,
    },
    grid::{self, GridGeometry1, GridGeometry2, GridGeometry3},
    num::MFloat,
    tracers::{TerrainTracer2, TerrainTracer3, TracerPosition1},
};

/// Reconstructs the terrain height at a mesh node by averaging the eight
/// height-field samples straddling it under the given per-axis offsets.
///
/// The offsets are the `cell_offset`s of the staggering of the field being
/// interpolated, so the reconstruction lands on the sample locations of
/// that field.
fn corner_height_3<F: MFloat>(
    heights: &dyn FieldSampler3<F>,
    i: isize,
    j: isize,
    k: isize,
    offsets: &In3D<isize>,
) -> F {
    let (di, dj, dk) = (offsets[X], offsets[Y], offsets[Z]);
    F::from_f64(0.125).unwrap()
        * (heights.sample(&Idx3::new(i, j, k), 0)
            + heights.sample(&Idx3::new(i + di, j, k), 0)
            + heights.sample(&Idx3::new(i, j + dj, k), 0)
            + heights.sample(&Idx3::new(i + di, j + dj, k), 0)
            + heights.sample(&Idx3::new(i, j, k + dk), 0)
            + heights.sample(&Idx3::new(i + di, j, k + dk), 0)
            + heights.sample(&Idx3::new(i, j + dj, k + dk), 0)
            + heights.sample(&Idx3::new(i + di, j + dj, k + dk), 0))
}

/// Reconstructs the terrain height at a mesh node by averaging the four
/// height-field samples straddling it under the given per-axis offsets.
fn corner_height_2<F: MFloat>(
    heights: &dyn FieldSampler2<F>,
    i: isize,
    j: isize,
    offsets: &(isize, isize),
) -> F {
    let (di, dj) = *offsets;
    F::from_f64(0.25).unwrap()
        * (heights.sample(&Idx2::new(i, j), 0)
            + heights.sample(&Idx2::new(i + di, j), 0)
            + heights.sample(&Idx2::new(i, j + dj), 0)
            + heights.sample(&Idx2::new(i + di, j + dj), 0))
}

/// Interpolates a set of arbitrarily staggered 3D fields to the position of
/// the given particle on a terrain-fitted mesh.
///
/// `heights` holds the mesh-node elevations and must be nodal in both
/// horizontal axes; its first component is the one sampled. The particle's
/// vertical cell hint seeds the terrain locator, and the hint is assumed to
/// be at most one cell away from the enclosing cell.
///
/// Output layout and staggering semantics are as for
/// [`linear::interpolate_to_particle_3`](super::linear::interpolate_to_particle_3).
pub fn interpolate_to_particle_mapped_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    fields: &[FieldHandle3<'_, F>],
    heights: &dyn FieldSampler3<F>,
    start_comp: usize,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer3<F> + ?Sized,
{
    assert!(
        values.len() >= fields.len() * n_comp,
        "Output buffer too small for {} fields with {} components each",
        fields.len(),
        n_comp
    );
    let position = particle.position();
    let seed = particle.vertical_cell_hint();

    let mut ctr = 0;
    for field in fields {
        let lx = geometry.fractional_coord(X, position[X], field.staggering[X]);
        let ly = geometry.fractional_coord(Y, position[Y], field.staggering[Y]);

        let i0 = floor_index(lx);
        let j0 = floor_index(ly);

        let xint = lx - lx.floor();
        let yint = ly - ly.floor();

        let sx = [F::one() - xint, xint];
        let sy = [F::one() - yint, yint];

        let offsets = In3D::with_each_component(|dim| field.staggering[dim].cell_offset());

        // Terrain elevation directly under/over the particle, reconstructed
        // at the seed vertical index.
        let mut seed_elevation = F::zero();
        for ii in 0..2 {
            for jj in 0..2 {
                let height = corner_height_3(
                    heights,
                    i0 + ii as isize,
                    j0 + jj as isize,
                    seed,
                    &offsets,
                );
                seed_elevation = seed_elevation + height * sx[ii] * sy[jj];
            }
        }

        // Single-step correction of the seed; no wider search is attempted.
        let k0 = if position[Z] >= seed_elevation {
            seed
        } else {
            seed - 1
        };

        // Fractional vertical position between the reconstructed surfaces,
        // separately for every horizontal corner since the terrain tilts.
        let mut vertical_fraction = [[F::zero(); 2]; 2];
        for ii in 0..2 {
            for jj in 0..2 {
                let lower =
                    corner_height_3(heights, i0 + ii as isize, j0 + jj as isize, k0, &offsets);
                let upper =
                    corner_height_3(heights, i0 + ii as isize, j0 + jj as isize, k0 + 1, &offsets);
                vertical_fraction[ii][jj] = (position[Z] - lower) / (upper - lower);
            }
        }

        for comp in start_comp..start_comp + n_comp {
            let mut value = F::zero();
            for kk in 0..2 {
                for jj in 0..2 {
                    for ii in 0..2 {
                        let sz = if kk == 0 {
                            F::one() - vertical_fraction[ii][jj]
                        } else {
                            vertical_fraction[ii][jj]
                        };
                        value = value
                            + field.sampler.sample(
                                &Idx3::new(i0 + ii as isize, j0 + jj as isize, k0 + kk as isize),
                                comp,
                            ) * sx[ii]
                                * sy[jj]
                                * sz;
                    }
                }
            }
            values[ctr] = value;
            ctr += 1;
        }
    }
}

/// Interpolates a set of arbitrarily staggered 2D fields to the position of
/// the given particle on a terrain-fitted mesh.
///
/// The y-axis is the vertical (terrain-following) axis. Semantics are as
/// for [`interpolate_to_particle_mapped_3`] with one fewer horizontal axis.
pub fn interpolate_to_particle_mapped_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    fields: &[FieldHandle2<'_, F>],
    heights: &dyn FieldSampler2<F>,
    start_comp: usize,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer2<F> + ?Sized,
{
    assert!(
        values.len() >= fields.len() * n_comp,
        "Output buffer too small for {} fields with {} components each",
        fields.len(),
        n_comp
    );
    let position = particle.position();
    let seed = particle.vertical_cell_hint();

    let mut ctr = 0;
    for field in fields {
        let lx = geometry.fractional_coord(Dim2::X, position[Dim2::X], field.staggering[Dim2::X]);

        let i0 = floor_index(lx);
        let xint = lx - lx.floor();
        let sx = [F::one() - xint, xint];

        let offsets = (
            field.staggering[Dim2::X].cell_offset(),
            field.staggering[Dim2::Y].cell_offset(),
        );

        let seed_elevation = sx[0] * corner_height_2(heights, i0, seed, &offsets)
            + sx[1] * corner_height_2(heights, i0 + 1, seed, &offsets);

        // Single-step correction of the seed; no wider search is attempted.
        let j0 = if position[Dim2::Y] >= seed_elevation {
            seed
        } else {
            seed - 1
        };

        let mut vertical_fraction = [F::zero(); 2];
        for (ii, fraction) in vertical_fraction.iter_mut().enumerate() {
            let lower = corner_height_2(heights, i0 + ii as isize, j0, &offsets);
            let upper = corner_height_2(heights, i0 + ii as isize, j0 + 1, &offsets);
            *fraction = (position[Dim2::Y] - lower) / (upper - lower);
        }

        for comp in start_comp..start_comp + n_comp {
            let mut value = F::zero();
            for jj in 0..2 {
                for ii in 0..2 {
                    let sy = if jj == 0 {
                        F::one() - vertical_fraction[ii]
                    } else {
                        vertical_fraction[ii]
                    };
                    value = value
                        + field
                            .sampler
                            .sample(&Idx2::new(i0 + ii as isize, j0 + jj as isize), comp)
                            * sx[ii]
                            * sy;
                }
            }
            values[ctr] = value;
            ctr += 1;
        }
    }
}

/// Terrain-fitted interpolation requires at least one horizontal axis in
/// addition to the vertical one, so it does not exist in 1D.
///
/// # Panics
///
/// Always. Calling this is a programming error, not a runtime condition.
pub fn interpolate_to_particle_mapped_1<F, P>(
    _particle: &P,
    _geometry: &GridGeometry1<F>,
    _fields: &[FieldHandle1<'_, F>],
    _heights: &dyn FieldSampler1<F>,
    _start_comp: usize,
    _n_comp: usize,
    _values: &mut [F],
) -> !
where
    F: MFloat,
    P: TracerPosition1<F> + ?Sized,
{
    panic!("Terrain-fitted interpolation is not supported in 1D");
}

/// Interpolates the first `n_comp` components of a fully cell-centered 3D
/// field to the position of the given particle on a terrain-fitted mesh.
pub fn interpolate_cell_centered_mapped_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    sampler: &dyn FieldSampler3<F>,
    heights: &dyn FieldSampler3<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer3<F> + ?Sized,
{
    interpolate_to_particle_mapped_3(
        particle,
        geometry,
        &[FieldHandle3::new(sampler, grid::cell_centered_3())],
        heights,
        0,
        n_comp,
        values,
    );
}

/// Interpolates the first `n_comp` components of a fully node-centered 3D
/// field to the position of the given particle on a terrain-fitted mesh.
pub fn interpolate_node_centered_mapped_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    sampler: &dyn FieldSampler3<F>,
    heights: &dyn FieldSampler3<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer3<F> + ?Sized,
{
    interpolate_to_particle_mapped_3(
        particle,
        geometry,
        &[FieldHandle3::new(sampler, grid::node_centered_3())],
        heights,
        0,
        n_comp,
        values,
    );
}

/// Interpolates one face-centered 3D field per axis to the position of the
/// given particle on a terrain-fitted mesh, taking the first component of
/// each.
pub fn interpolate_face_centered_mapped_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    samplers: &In3D<&dyn FieldSampler3<F>>,
    heights: &dyn FieldSampler3<F>,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer3<F> + ?Sized,
{
    let fields = [
        FieldHandle3::new(samplers[X], grid::face_centered_3(X)),
        FieldHandle3::new(samplers[Y], grid::face_centered_3(Y)),
        FieldHandle3::new(samplers[Z], grid::face_centered_3(Z)),
    ];
    interpolate_to_particle_mapped_3(particle, geometry, &fields, heights, 0, 1, values);
}

/// Interpolates the first `n_comp` components of a fully cell-centered 2D
/// field to the position of the given particle on a terrain-fitted mesh.
pub fn interpolate_cell_centered_mapped_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    sampler: &dyn FieldSampler2<F>,
    heights: &dyn FieldSampler2<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer2<F> + ?Sized,
{
    interpolate_to_particle_mapped_2(
        particle,
        geometry,
        &[FieldHandle2::new(sampler, grid::cell_centered_2())],
        heights,
        0,
        n_comp,
        values,
    );
}

/// Interpolates the first `n_comp` components of a fully node-centered 2D
/// field to the position of the given particle on a terrain-fitted mesh.
pub fn interpolate_node_centered_mapped_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    sampler: &dyn FieldSampler2<F>,
    heights: &dyn FieldSampler2<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer2<F> + ?Sized,
{
    interpolate_to_particle_mapped_2(
        particle,
        geometry,
        &[FieldHandle2::new(sampler, grid::node_centered_2())],
        heights,
        0,
        n_comp,
        values,
    );
}

/// Interpolates one face-centered 2D field per axis to the position of the
/// given particle on a terrain-fitted mesh, taking the first component of
/// each.
pub fn interpolate_face_centered_mapped_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    samplers: &[&dyn FieldSampler2<F>; 2],
    heights: &dyn FieldSampler2<F>,
    values: &mut [F],
) where
    F: MFloat,
    P: TerrainTracer2<F> + ?Sized,
{
    let fields = [
        FieldHandle2::new(samplers[0], grid::face_centered_2(Dim2::X)),
        FieldHandle2::new(samplers[1], grid::face_centered_2(Dim2::Y)),
    ];
    interpolate_to_particle_mapped_2(particle, geometry, &fields, heights, 0, 1, values);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        field::{GhostedField2, GhostedField3},
        geometry::{Point2, Point3, Vec2, Vec3},
        interpolation::linear,
        tracers::{Tracer2, Tracer3},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array3, Array4};

    /// Node elevations h(i, j, k) = k + slope_x * i + slope_y * j, stored
    /// with one ghost layer in every direction.
    fn tilted_heights_3(size: usize, slope_x: f64, slope_y: f64) -> GhostedField3<f64> {
        let mut data = Array4::zeros((size + 2, size + 2, size + 2, 1));
        for i in 0..size + 2 {
            for j in 0..size + 2 {
                for k in 0..size + 2 {
                    data[[i, j, k, 0]] = (k as f64 - 1.0)
                        + slope_x * (i as f64 - 1.0)
                        + slope_y * (j as f64 - 1.0);
                }
            }
        }
        GhostedField3::new(data, Idx3::new(-1, -1, -1))
    }

    /// Node-centered field storing the elevation coordinate of each node.
    fn elevation_field_3(heights: &GhostedField3<f64>, size: usize) -> GhostedField3<f64> {
        let mut data = Array4::zeros((size + 2, size + 2, size + 2, 1));
        for i in 0..size + 2 {
            for j in 0..size + 2 {
                for k in 0..size + 2 {
                    let idx = Idx3::new(i as isize - 1, j as isize - 1, k as isize - 1);
                    data[[i, j, k, 0]] = heights.sample(&idx, 0);
                }
            }
        }
        GhostedField3::new(data, Idx3::new(-1, -1, -1))
    }

    fn unit_geometry_3() -> GridGeometry3<f64> {
        GridGeometry3::new(Point3::origin(), Vec3::equal_components(1.0))
    }

    #[test]
    fn flat_terrain_reproduces_orthogonal_interpolation() {
        let size = 6;
        let heights = tilted_heights_3(size, 0.0, 0.0);

        let mut data = Array4::zeros((size + 2, size + 2, size + 2, 1));
        for i in 0..size + 2 {
            for j in 0..size + 2 {
                for k in 0..size + 2 {
                    data[[i, j, k, 0]] =
                        (i as f64).sin() + (j as f64).cos() + 0.3 * (k as f64);
                }
            }
        }
        let field = GhostedField3::new(data, Idx3::new(-1, -1, -1));
        let geometry = unit_geometry_3();

        for &(x, y, z) in &[(1.3_f64, 2.7, 2.2_f64), (3.9, 1.1, 3.8), (2.5, 2.5, 1.5)] {
            let seed = z.floor() as isize;
            let tracer = Tracer3::new(Point3::new(x, y, z), seed);

            let mut mapped = [0.0];
            interpolate_cell_centered_mapped_3(
                &tracer, &geometry, &field, &heights, 1, &mut mapped,
            );
            let mut orthogonal = [0.0];
            linear::interpolate_cell_centered_3(&tracer, &geometry, &field, 1, &mut orthogonal);

            assert_relative_eq!(mapped[0], orthogonal[0], max_relative = 1e-12);
        }
    }

    #[test]
    fn tilted_terrain_recovers_the_elevation_coordinate() {
        let size = 6;
        let heights = tilted_heights_3(size, 0.15, -0.1);
        let elevations = elevation_field_3(&heights, size);
        let geometry = unit_geometry_3();

        // Particle 40% up through vertical cell 2 of the column at (2.3, 3.6).
        let (x, y) = (2.3, 3.6);
        let seed = 2;
        let surface = |k: f64| k + 0.15 * x - 0.1 * y;
        let z = surface(seed as f64) + 0.4 * (surface(seed as f64 + 1.0) - surface(seed as f64));
        let tracer = Tracer3::new(Point3::new(x, y, z), seed);

        let mut values = [0.0];
        interpolate_node_centered_mapped_3(
            &tracer,
            &geometry,
            &elevations,
            &heights,
            1,
            &mut values,
        );
        assert_relative_eq!(values[0], z, max_relative = 1e-12);
    }

    #[test]
    fn locator_corrects_a_seed_one_cell_too_high() {
        let size = 6;
        let heights = tilted_heights_3(size, 0.15, -0.1);
        let elevations = elevation_field_3(&heights, size);
        let geometry = unit_geometry_3();

        let (x, y) = (2.3, 3.6);
        let surface = |k: f64| k + 0.15 * x - 0.1 * y;
        // True cell is 2, but the particle carries last timestep's index 3.
        let z = surface(2.0) + 0.4;
        let tracer = Tracer3::new(Point3::new(x, y, z), 3);

        let mut values = [0.0];
        interpolate_node_centered_mapped_3(
            &tracer,
            &geometry,
            &elevations,
            &heights,
            1,
            &mut values,
        );
        assert_relative_eq!(values[0], z, max_relative = 1e-12);
    }

    #[test]
    fn two_dimensional_mapped_interpolation_recovers_the_elevation_coordinate() {
        let size = 6;
        let mut height_data = Array3::zeros((size + 2, size + 2, 1));
        for i in 0..size + 2 {
            for j in 0..size + 2 {
                height_data[[i, j, 0]] = (j as f64 - 1.0) + 0.2 * (i as f64 - 1.0);
            }
        }
        let heights = GhostedField2::new(height_data.clone(), Idx2::new(-1, -1));
        let elevations = GhostedField2::new(height_data, Idx2::new(-1, -1));
        let geometry = GridGeometry2::new(Point2::origin(), Vec2::equal_components(1.0));

        let x = 3.4;
        let seed = 2;
        let z = (seed as f64 + 0.2 * x) + 0.7;
        let tracer = Tracer2::new(Point2::new(x, z), seed);

        let mut values = [0.0];
        interpolate_node_centered_mapped_2(
            &tracer,
            &geometry,
            &elevations,
            &heights,
            1,
            &mut values,
        );
        assert_relative_eq!(values[0], z, max_relative = 1e-12);
    }

    #[test]
    #[should_panic(expected = "not supported in 1D")]
    fn mapped_interpolation_panics_in_one_dimension() {
        let heights = crate::field::GhostedField1::new(ndarray::Array2::zeros((1, 1)), 0);
        let tracer = crate::tracers::Tracer1::new(0.5_f64);
        let geometry = GridGeometry1::new(0.0, 1.0);
        let mut values = [0.0_f64];
        interpolate_to_particle_mapped_1(&tracer, &geometry, &[], &heights, 0, 1, &mut values);
    }
}
