//! Coordinate-space helpers.

pub mod coords;
