//! Read-only access to field data on the mesh.

use crate::{
    geometry::{
        Dim2,
        Dim3::{X, Y, Z},
        Idx2, Idx3,
    },
    grid::{MeshLocation, Staggering2, Staggering3},
    num::MFloat,
};
use ndarray::{Array2, Array3, Array4};

/// Defines read-only sampling of a multi-component 3D field.
///
/// Implementors must provide the ghost/halo depth required by the code
/// sampling them; no bounds are validated at this seam.
pub trait FieldSampler3<F>: Sync {
    /// Returns the field value at the given mesh index for the given component.
    fn sample(&self, indices: &Idx3<isize>, component: usize) -> F;
}

/// Defines read-only sampling of a multi-component 2D field.
pub trait FieldSampler2<F>: Sync {
    /// Returns the field value at the given mesh index for the given component.
    fn sample(&self, indices: &Idx2<isize>, component: usize) -> F;
}

/// Defines read-only sampling of a multi-component 1D field.
pub trait FieldSampler1<F>: Sync {
    /// Returns the field value at the given mesh index for the given component.
    fn sample(&self, index: isize, component: usize) -> F;
}

/// A 3D field sampler paired with the staggering describing where its
/// samples live in each mesh cell.
///
/// The staggering must match the storage convention of the sampler;
/// mismatches are not detected and give silently wrong interpolants.
#[derive(Clone, Copy)]
pub struct FieldHandle3<'a, F> {
    /// Accessor for the field values.
    pub sampler: &'a dyn FieldSampler3<F>,
    /// Per-axis sample locations of the field.
    pub staggering: Staggering3,
}

impl<'a, F> FieldHandle3<'a, F> {
    /// Creates a new handle from a sampler and its staggering.
    pub fn new(sampler: &'a dyn FieldSampler3<F>, staggering: Staggering3) -> Self {
        Self {
            sampler,
            staggering,
        }
    }
}

/// A 2D field sampler paired with the staggering describing where its
/// samples live in each mesh cell.
#[derive(Clone, Copy)]
pub struct FieldHandle2<'a, F> {
    /// Accessor for the field values.
    pub sampler: &'a dyn FieldSampler2<F>,
    /// Per-axis sample locations of the field.
    pub staggering: Staggering2,
}

impl<'a, F> FieldHandle2<'a, F> {
    /// Creates a new handle from a sampler and its staggering.
    pub fn new(sampler: &'a dyn FieldSampler2<F>, staggering: Staggering2) -> Self {
        Self {
            sampler,
            staggering,
        }
    }
}

/// A 1D field sampler paired with the location of its samples.
#[derive(Clone, Copy)]
pub struct FieldHandle1<'a, F> {
    /// Accessor for the field values.
    pub sampler: &'a dyn FieldSampler1<F>,
    /// Sample location of the field.
    pub location: MeshLocation,
}

impl<'a, F> FieldHandle1<'a, F> {
    /// Creates a new handle from a sampler and its sample location.
    pub fn new(sampler: &'a dyn FieldSampler1<F>, location: MeshLocation) -> Self {
        Self { sampler, location }
    }
}

/// A multi-component 3D field stored in an `ndarray`, with a signed lower
/// corner index so that ghost layers can sit below the domain origin.
#[derive(Clone, Debug)]
pub struct GhostedField3<F> {
    values: Array4<F>,
    lower_corner: Idx3<isize>,
}

impl<F: MFloat> GhostedField3<F> {
    /// Creates a new field from the given values (indexed `[i, j, k, component]`)
    /// and the mesh index of the first stored sample along each axis.
    pub fn new(values: Array4<F>, lower_corner: Idx3<isize>) -> Self {
        Self {
            values,
            lower_corner,
        }
    }

    /// Returns the number of components of the field.
    pub fn num_components(&self) -> usize {
        self.values.shape()[3]
    }

    /// Returns the mesh index of the first stored sample along each axis.
    pub fn lower_corner(&self) -> &Idx3<isize> {
        &self.lower_corner
    }
}

impl<F: MFloat> FieldSampler3<F> for GhostedField3<F> {
    fn sample(&self, indices: &Idx3<isize>, component: usize) -> F {
        self.values[[
            (indices[X] - self.lower_corner[X]) as usize,
            (indices[Y] - self.lower_corner[Y]) as usize,
            (indices[Z] - self.lower_corner[Z]) as usize,
            component,
        ]]
    }
}

/// A multi-component 2D field stored in an `ndarray`, with a signed lower
/// corner index so that ghost layers can sit below the domain origin.
#[derive(Clone, Debug)]
pub struct GhostedField2<F> {
    values: Array3<F>,
    lower_corner: Idx2<isize>,
}

impl<F: MFloat> GhostedField2<F> {
    /// Creates a new field from the given values (indexed `[i, j, component]`)
    /// and the mesh index of the first stored sample along each axis.
    pub fn new(values: Array3<F>, lower_corner: Idx2<isize>) -> Self {
        Self {
            values,
            lower_corner,
        }
    }

    /// Returns the number of components of the field.
    pub fn num_components(&self) -> usize {
        self.values.shape()[2]
    }

    /// Returns the mesh index of the first stored sample along each axis.
    pub fn lower_corner(&self) -> &Idx2<isize> {
        &self.lower_corner
    }
}

impl<F: MFloat> FieldSampler2<F> for GhostedField2<F> {
    fn sample(&self, indices: &Idx2<isize>, component: usize) -> F {
        self.values[[
            (indices[Dim2::X] - self.lower_corner[Dim2::X]) as usize,
            (indices[Dim2::Y] - self.lower_corner[Dim2::Y]) as usize,
            component,
        ]]
    }
}

/// A multi-component 1D field stored in an `ndarray`, with a signed lower
/// corner index so that ghost layers can sit below the domain origin.
#[derive(Clone, Debug)]
pub struct GhostedField1<F> {
    values: Array2<F>,
    lower_corner: isize,
}

impl<F: MFloat> GhostedField1<F> {
    /// Creates a new field from the given values (indexed `[i, component]`)
    /// and the mesh index of the first stored sample.
    pub fn new(values: Array2<F>, lower_corner: isize) -> Self {
        Self {
            values,
            lower_corner,
        }
    }

    /// Returns the number of components of the field.
    pub fn num_components(&self) -> usize {
        self.values.shape()[1]
    }

    /// Returns the mesh index of the first stored sample.
    pub fn lower_corner(&self) -> isize {
        self.lower_corner
    }
}

impl<F: MFloat> FieldSampler1<F> for GhostedField1<F> {
    fn sample(&self, index: isize, component: usize) -> F {
        self.values[[(index - self.lower_corner) as usize, component]]
    }
}
