//! Multilinear interpolation on orthogonal uniform meshes.

use super::floor_index;
use crate::{
    field::{FieldHandle1, FieldHandle2, FieldHandle3, FieldSampler2, FieldSampler3},
    geometry::{
        Dim2,
        Dim3::{X, Y, Z},
        Idx2, Idx3, In3D,
    },
    grid::{self, GridGeometry1, GridGeometry2, GridGeometry3},
    num::MFloat,
    tracers::{TracerPosition1, TracerPosition2, TracerPosition3},
};

/// Interpolates a set of arbitrarily staggered 3D fields to the position of
/// the given particle.
///
/// For every field handle, the components in
/// `start_comp..start_comp + n_comp` are interpolated and written to
/// `values`, ordered by field first and component second, so `values` must
/// hold at least `fields.len() * n_comp` elements.
///
/// The staggering of each handle determines the half-cell shift between the
/// particle position and the field's sample index space along each axis; a
/// handle whose staggering does not match its sampler's storage convention
/// yields a silently wrong result.
pub fn interpolate_to_particle_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    fields: &[FieldHandle3<'_, F>],
    start_comp: usize,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition3<F> + ?Sized,
{
    assert!(
        values.len() >= fields.len() * n_comp,
        "Output buffer too small for {} fields with {} components each",
        fields.len(),
        n_comp
    );
    let position = particle.position();

    let mut ctr = 0;
    for field in fields {
        let lx = geometry.fractional_coord(X, position[X], field.staggering[X]);
        let ly = geometry.fractional_coord(Y, position[Y], field.staggering[Y]);
        let lz = geometry.fractional_coord(Z, position[Z], field.staggering[Z]);

        // Lower corner of the 2x2x2 interpolation stencil.
        let i0 = floor_index(lx);
        let j0 = floor_index(ly);
        let k0 = floor_index(lz);

        let xint = lx - lx.floor();
        let yint = ly - ly.floor();
        let zint = lz - lz.floor();

        let sx = [F::one() - xint, xint];
        let sy = [F::one() - yint, yint];
        let sz = [F::one() - zint, zint];

        for comp in start_comp..start_comp + n_comp {
            let mut value = F::zero();
            for kk in 0..2 {
                for jj in 0..2 {
                    for ii in 0..2 {
                        value = value
                            + field.sampler.sample(
                                &Idx3::new(i0 + ii as isize, j0 + jj as isize, k0 + kk as isize),
                                comp,
                            ) * sx[ii]
                                * sy[jj]
                                * sz[kk];
                    }
                }
            }
            values[ctr] = value;
            ctr += 1;
        }
    }
}

/// Interpolates a set of arbitrarily staggered 2D fields to the position of
/// the given particle.
///
/// Output layout and staggering semantics are as for
/// [`interpolate_to_particle_3`].
pub fn interpolate_to_particle_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    fields: &[FieldHandle2<'_, F>],
    start_comp: usize,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition2<F> + ?Sized,
{
    assert!(
        values.len() >= fields.len() * n_comp,
        "Output buffer too small for {} fields with {} components each",
        fields.len(),
        n_comp
    );
    let position = particle.position();

    let mut ctr = 0;
    for field in fields {
        let lx = geometry.fractional_coord(Dim2::X, position[Dim2::X], field.staggering[Dim2::X]);
        let ly = geometry.fractional_coord(Dim2::Y, position[Dim2::Y], field.staggering[Dim2::Y]);

        let i0 = floor_index(lx);
        let j0 = floor_index(ly);

        let xint = lx - lx.floor();
        let yint = ly - ly.floor();

        let sx = [F::one() - xint, xint];
        let sy = [F::one() - yint, yint];

        for comp in start_comp..start_comp + n_comp {
            let mut value = F::zero();
            for jj in 0..2 {
                for ii in 0..2 {
                    value = value
                        + field
                            .sampler
                            .sample(&Idx2::new(i0 + ii as isize, j0 + jj as isize), comp)
                            * sx[ii]
                            * sy[jj];
                }
            }
            values[ctr] = value;
            ctr += 1;
        }
    }
}

/// Interpolates a set of 1D fields to the position of the given particle.
///
/// Output layout and staggering semantics are as for
/// [`interpolate_to_particle_3`].
pub fn interpolate_to_particle_1<F, P>(
    particle: &P,
    geometry: &GridGeometry1<F>,
    fields: &[FieldHandle1<'_, F>],
    start_comp: usize,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition1<F> + ?Sized,
{
    assert!(
        values.len() >= fields.len() * n_comp,
        "Output buffer too small for {} fields with {} components each",
        fields.len(),
        n_comp
    );
    let position = particle.position();

    let mut ctr = 0;
    for field in fields {
        let lx = geometry.fractional_coord(position, field.location);

        let i0 = floor_index(lx);
        let xint = lx - lx.floor();
        let sx = [F::one() - xint, xint];

        for comp in start_comp..start_comp + n_comp {
            let mut value = F::zero();
            for ii in 0..2 {
                value = value + field.sampler.sample(i0 + ii as isize, comp) * sx[ii];
            }
            values[ctr] = value;
            ctr += 1;
        }
    }
}

/// Interpolates the first `n_comp` components of a fully cell-centered 3D
/// field to the position of the given particle.
pub fn interpolate_cell_centered_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    sampler: &dyn FieldSampler3<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition3<F> + ?Sized,
{
    interpolate_to_particle_3(
        particle,
        geometry,
        &[FieldHandle3::new(sampler, grid::cell_centered_3())],
        0,
        n_comp,
        values,
    );
}

/// Interpolates the first `n_comp` components of a fully node-centered 3D
/// field to the position of the given particle.
pub fn interpolate_node_centered_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    sampler: &dyn FieldSampler3<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition3<F> + ?Sized,
{
    interpolate_to_particle_3(
        particle,
        geometry,
        &[FieldHandle3::new(sampler, grid::node_centered_3())],
        0,
        n_comp,
        values,
    );
}

/// Interpolates one face-centered 3D field per axis to the position of the
/// given particle, taking the first component of each.
///
/// The field for each axis is nodal in that axis and cell-centered in the
/// others, as for MAC-staggered velocities.
pub fn interpolate_face_centered_3<F, P>(
    particle: &P,
    geometry: &GridGeometry3<F>,
    samplers: &In3D<&dyn FieldSampler3<F>>,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition3<F> + ?Sized,
{
    let fields = [
        FieldHandle3::new(samplers[X], grid::face_centered_3(X)),
        FieldHandle3::new(samplers[Y], grid::face_centered_3(Y)),
        FieldHandle3::new(samplers[Z], grid::face_centered_3(Z)),
    ];
    interpolate_to_particle_3(particle, geometry, &fields, 0, 1, values);
}

/// Interpolates the first `n_comp` components of a fully cell-centered 2D
/// field to the position of the given particle.
pub fn interpolate_cell_centered_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    sampler: &dyn FieldSampler2<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition2<F> + ?Sized,
{
    interpolate_to_particle_2(
        particle,
        geometry,
        &[FieldHandle2::new(sampler, grid::cell_centered_2())],
        0,
        n_comp,
        values,
    );
}

/// Interpolates the first `n_comp` components of a fully node-centered 2D
/// field to the position of the given particle.
pub fn interpolate_node_centered_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    sampler: &dyn FieldSampler2<F>,
    n_comp: usize,
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition2<F> + ?Sized,
{
    interpolate_to_particle_2(
        particle,
        geometry,
        &[FieldHandle2::new(sampler, grid::node_centered_2())],
        0,
        n_comp,
        values,
    );
}

/// Interpolates one face-centered 2D field per axis to the position of the
/// given particle, taking the first component of each.
pub fn interpolate_face_centered_2<F, P>(
    particle: &P,
    geometry: &GridGeometry2<F>,
    samplers: &[&dyn FieldSampler2<F>; 2],
    values: &mut [F],
) where
    F: MFloat,
    P: TracerPosition2<F> + ?Sized,
{
    let fields = [
        FieldHandle2::new(samplers[0], grid::face_centered_2(Dim2::X)),
        FieldHandle2::new(samplers[1], grid::face_centered_2(Dim2::Y)),
    ];
    interpolate_to_particle_2(particle, geometry, &fields, 0, 1, values);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        field::{FieldSampler1, GhostedField2, GhostedField3},
        geometry::{Point2, Point3, Vec2, Vec3},
        grid::MeshLocation,
        tracers::{Tracer2, Tracer3},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array3, Array4};

    fn unit_geometry_2() -> GridGeometry2<f64> {
        GridGeometry2::new(Point2::origin(), Vec2::equal_components(1.0))
    }

    fn unit_geometry_3() -> GridGeometry3<f64> {
        GridGeometry3::new(Point3::origin(), Vec3::equal_components(1.0))
    }

    #[test]
    fn cell_centered_2d_interpolation_averages_the_four_cells() {
        let mut data = Array3::zeros((2, 2, 1));
        data[[0, 0, 0]] = 10.0;
        data[[1, 0, 0]] = 20.0;
        data[[0, 1, 0]] = 30.0;
        data[[1, 1, 0]] = 40.0;
        let field = GhostedField2::new(data, Idx2::new(0, 0));

        let tracer = Tracer2::new(Point2::new(1.0, 1.0), 0);
        let mut values = [0.0];
        interpolate_cell_centered_2(&tracer, &unit_geometry_2(), &field, 1, &mut values);
        assert_relative_eq!(values[0], 25.0);
    }

    #[test]
    fn node_centered_interpolation_recovers_stored_values_at_nodes() {
        let mut data = Array4::zeros((3, 3, 3, 1));
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    data[[i, j, k, 0]] = (i + 10 * j + 100 * k) as f64;
                }
            }
        }
        let field = GhostedField3::new(data, Idx3::new(0, 0, 0));
        let geometry = unit_geometry_3();

        let tracer = Tracer3::new(Point3::new(1.0, 1.0, 1.0), 0);
        let mut values = [0.0];
        interpolate_node_centered_3(&tracer, &geometry, &field, 1, &mut values);
        assert_relative_eq!(values[0], 111.0);
    }

    #[test]
    fn interpolation_of_linear_field_is_exact_for_both_staggerings() {
        let f = |x: f64| 2.0 * x + 1.0;

        let mut centered = Array3::zeros((4, 3, 1));
        let mut nodal = Array3::zeros((4, 3, 1));
        for i in 0..4 {
            for j in 0..3 {
                centered[[i, j, 0]] = f(i as f64 + 0.5);
                nodal[[i, j, 0]] = f(i as f64);
            }
        }
        let centered = GhostedField2::new(centered, Idx2::new(0, 0));
        let nodal = GhostedField2::new(nodal, Idx2::new(0, 0));
        let geometry = unit_geometry_2();

        let tracer = Tracer2::new(Point2::new(1.7, 1.2), 0);
        let mut from_centered = [0.0];
        let mut from_nodal = [0.0];
        interpolate_cell_centered_2(&tracer, &geometry, &centered, 1, &mut from_centered);
        interpolate_node_centered_2(&tracer, &geometry, &nodal, 1, &mut from_nodal);

        assert_relative_eq!(from_centered[0], f(1.7), max_relative = 1e-12);
        assert_relative_eq!(from_nodal[0], f(1.7), max_relative = 1e-12);
    }

    #[test]
    fn face_centered_interpolation_takes_one_component_per_axis() {
        let constant = |value: f64| {
            let mut data = Array4::zeros((3, 3, 3, 1));
            data.fill(value);
            GhostedField3::new(data, Idx3::new(-1, -1, -1))
        };
        let u = constant(1.5);
        let v = constant(-2.5);
        let w = constant(4.0);
        let samplers = In3D::<&dyn FieldSampler3<f64>>::new(&u, &v, &w);

        let tracer = Tracer3::new(Point3::new(0.3, 0.6, 0.9), 0);
        let mut values = [0.0; 3];
        interpolate_face_centered_3(&tracer, &unit_geometry_3(), &samplers, &mut values);
        assert_relative_eq!(values[0], 1.5);
        assert_relative_eq!(values[1], -2.5);
        assert_relative_eq!(values[2], 4.0);
    }

    #[test]
    fn component_range_and_output_layout_are_respected() {
        let mut data_a = Array3::zeros((3, 3, 3));
        let mut data_b = Array3::zeros((3, 3, 3));
        for comp in 0..3 {
            data_a
                .index_axis_mut(ndarray::Axis(2), comp)
                .fill(comp as f64);
            data_b
                .index_axis_mut(ndarray::Axis(2), comp)
                .fill(10.0 * comp as f64);
        }
        let field_a = GhostedField2::new(data_a, Idx2::new(-1, -1));
        let field_b = GhostedField2::new(data_b, Idx2::new(-1, -1));
        let fields = [
            FieldHandle2::new(&field_a, grid::cell_centered_2()),
            FieldHandle2::new(&field_b, grid::node_centered_2()),
        ];

        let tracer = Tracer2::new(Point2::new(0.4, 0.4), 0);
        let mut values = [0.0; 4];
        interpolate_to_particle_2(&tracer, &unit_geometry_2(), &fields, 1, 2, &mut values);
        assert_relative_eq!(values[0], 1.0);
        assert_relative_eq!(values[1], 2.0);
        assert_relative_eq!(values[2], 10.0);
        assert_relative_eq!(values[3], 20.0);
    }

    #[test]
    fn empty_field_list_is_a_no_op() {
        let tracer = Tracer3::new(Point3::origin(), 0);
        let mut values: [f64; 0] = [];
        interpolate_to_particle_3(&tracer, &unit_geometry_3(), &[], 0, 3, &mut values);
    }

    #[test]
    fn one_dimensional_interpolation_matches_linear_blend() {
        let mut data = ndarray::Array2::zeros((4, 1));
        for i in 0..4 {
            data[[i, 0]] = (i * i) as f64;
        }
        let field = crate::field::GhostedField1::new(data, 0);
        let geometry = GridGeometry1::new(0.0, 1.0);
        let fields = [FieldHandle1::new(
            &field as &dyn FieldSampler1<f64>,
            MeshLocation::Node,
        )];

        let tracer = crate::tracers::Tracer1::new(2.25);
        let mut values = [0.0];
        interpolate_to_particle_1(&tracer, &geometry, &fields, 0, 1, &mut values);
        // 0.75 * 4 + 0.25 * 9
        assert_relative_eq!(values[0], 5.25);
    }
}
