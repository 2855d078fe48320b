//! Uniform mesh geometry and data staggering.

use crate::{
    geometry::{Dim2, Dim3, In2D, In3D, Point2, Point3, Vec2, Vec3},
    num::MFloat,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Where the samples of a field are located along one axis of the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum MeshLocation {
    /// Samples live at cell centers along this axis.
    Center = 0,
    /// Samples live on cell faces/nodes along this axis.
    Node = 1,
}

impl MeshLocation {
    /// Returns the shift between node index space and the sample index
    /// space of this location (half a cell for cell-centered samples).
    pub fn index_shift<F: MFloat>(self) -> F {
        match self {
            Self::Center => F::from_f64(0.5).unwrap(),
            Self::Node => F::zero(),
        }
    }

    /// Returns the index offset to the neighboring sample that straddles a
    /// node along this axis (zero when the samples already lie on nodes).
    pub fn cell_offset(self) -> isize {
        match self {
            Self::Center => 1,
            Self::Node => 0,
        }
    }

    /// Whether samples lie on cell faces/nodes along this axis.
    pub fn is_nodal(self) -> bool {
        self == Self::Node
    }
}

/// Per-axis sample locations of a 3D field.
pub type Staggering3 = In3D<MeshLocation>;

/// Per-axis sample locations of a 2D field.
pub type Staggering2 = In2D<MeshLocation>;

/// Creates the staggering of a fully cell-centered 3D field.
pub fn cell_centered_3() -> Staggering3 {
    In3D::same(MeshLocation::Center)
}

/// Creates the staggering of a fully node-centered 3D field.
pub fn node_centered_3() -> Staggering3 {
    In3D::same(MeshLocation::Node)
}

/// Creates the staggering of a 3D field located on the cell faces
/// perpendicular to the given axis.
pub fn face_centered_3(dim: Dim3) -> Staggering3 {
    let mut staggering = In3D::same(MeshLocation::Center);
    staggering[dim] = MeshLocation::Node;
    staggering
}

/// Creates the staggering of a fully cell-centered 2D field.
pub fn cell_centered_2() -> Staggering2 {
    In2D::same(MeshLocation::Center)
}

/// Creates the staggering of a fully node-centered 2D field.
pub fn node_centered_2() -> Staggering2 {
    In2D::same(MeshLocation::Node)
}

/// Creates the staggering of a 2D field located on the cell faces
/// perpendicular to the given axis.
pub fn face_centered_2(dim: Dim2) -> Staggering2 {
    let mut staggering = In2D::same(MeshLocation::Center);
    staggering[dim] = MeshLocation::Node;
    staggering
}

/// Mapping between physical coordinates and fractional mesh indices
/// for a uniform 3D mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry3<F> {
    lower_corner: Point3<F>,
    inverse_cell_extents: Vec3<F>,
}

impl<F: MFloat> GridGeometry3<F> {
    /// Creates a new mesh geometry given the physical lower corner and
    /// the cell extents along each axis.
    pub fn new(lower_corner: Point3<F>, cell_extents: Vec3<F>) -> Self {
        Self {
            lower_corner,
            inverse_cell_extents: Vec3::new(
                F::one() / cell_extents[Dim3::X],
                F::one() / cell_extents[Dim3::Y],
                F::one() / cell_extents[Dim3::Z],
            ),
        }
    }

    /// Returns the physical lower corner of the mesh.
    pub fn lower_corner(&self) -> &Point3<F> {
        &self.lower_corner
    }

    /// Returns the inverse cell extents of the mesh.
    pub fn inverse_cell_extents(&self) -> &Vec3<F> {
        &self.inverse_cell_extents
    }

    /// Maps a physical coordinate to the fractional sample index of a
    /// field with the given sample location along the given axis.
    pub fn fractional_coord(&self, dim: Dim3, coord: F, location: MeshLocation) -> F {
        (coord - self.lower_corner[dim]) * self.inverse_cell_extents[dim]
            - location.index_shift::<F>()
    }
}

/// Mapping between physical coordinates and fractional mesh indices
/// for a uniform 2D mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry2<F> {
    lower_corner: Point2<F>,
    inverse_cell_extents: Vec2<F>,
}

impl<F: MFloat> GridGeometry2<F> {
    /// Creates a new mesh geometry given the physical lower corner and
    /// the cell extents along each axis.
    pub fn new(lower_corner: Point2<F>, cell_extents: Vec2<F>) -> Self {
        Self {
            lower_corner,
            inverse_cell_extents: Vec2::new(
                F::one() / cell_extents[Dim2::X],
                F::one() / cell_extents[Dim2::Y],
            ),
        }
    }

    /// Returns the physical lower corner of the mesh.
    pub fn lower_corner(&self) -> &Point2<F> {
        &self.lower_corner
    }

    /// Returns the inverse cell extents of the mesh.
    pub fn inverse_cell_extents(&self) -> &Vec2<F> {
        &self.inverse_cell_extents
    }

    /// Maps a physical coordinate to the fractional sample index of a
    /// field with the given sample location along the given axis.
    pub fn fractional_coord(&self, dim: Dim2, coord: F, location: MeshLocation) -> F {
        (coord - self.lower_corner[dim]) * self.inverse_cell_extents[dim]
            - location.index_shift::<F>()
    }
}

/// Mapping between physical coordinates and fractional mesh indices
/// for a uniform 1D mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry1<F> {
    lower_corner: F,
    inverse_cell_extent: F,
}

impl<F: MFloat> GridGeometry1<F> {
    /// Creates a new mesh geometry given the physical lower corner and
    /// the cell extent.
    pub fn new(lower_corner: F, cell_extent: F) -> Self {
        Self {
            lower_corner,
            inverse_cell_extent: F::one() / cell_extent,
        }
    }

    /// Returns the physical lower corner of the mesh.
    pub fn lower_corner(&self) -> F {
        self.lower_corner
    }

    /// Returns the inverse cell extent of the mesh.
    pub fn inverse_cell_extent(&self) -> F {
        self.inverse_cell_extent
    }

    /// Maps a physical coordinate to the fractional sample index of a
    /// field with the given sample location.
    pub fn fractional_coord(&self, coord: F, location: MeshLocation) -> F {
        (coord - self.lower_corner) * self.inverse_cell_extent - location.index_shift::<F>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dim3::{X, Y, Z};

    #[test]
    fn fractional_coord_accounts_for_staggering() {
        let geometry = GridGeometry3::new(
            Point3::new(0.0_f64, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 2.0),
        );
        // A node-centered field samples directly at index space.
        assert_eq!(
            geometry.fractional_coord(X, 3.0, MeshLocation::Node),
            1.5
        );
        // A cell-centered field is shifted down by half a cell.
        assert_eq!(
            geometry.fractional_coord(X, 3.0, MeshLocation::Center),
            1.0
        );
    }

    #[test]
    fn face_centered_staggering_is_nodal_in_its_own_axis_only() {
        let staggering = face_centered_3(Y);
        assert!(!staggering[X].is_nodal());
        assert!(staggering[Y].is_nodal());
        assert!(!staggering[Z].is_nodal());
    }
}
