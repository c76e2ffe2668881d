//! Selection algorithms.
//!
//! - **Magic wand**: tolerance flood fill and global color thresholding
//!   into a `BitMask`
//! - **Contour**: boundary tracing of mask islands into closed outline
//!   polygons for marching-ants display and path conversion

pub mod contour;
pub mod magic_wand;

pub use contour::{create_polygon_set, polygons_to_flat};
pub use magic_wand::{
    fill_stencil_by_color, fill_stencil_from_point, magic_wand_select, WandSelection,
};
