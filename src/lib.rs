//! The `tracerkit` crate provides tools for interpolating block-structured
//! AMR mesh data to tracer particles, on flat and terrain-fitted meshes.

pub mod field;
pub mod geometry;
pub mod grid;
pub mod interpolation;
pub mod math;
pub mod num;
pub mod solver;
pub mod tracers;
