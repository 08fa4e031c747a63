//! Base types shared by the hspgfx crates: colors, geometry and quads.

pub mod color;
pub mod geom;
pub mod quad;

pub use color::ColorU8;
pub use quad::{Quad, QuadColors};
