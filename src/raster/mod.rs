//! Polygon rasterization.
//!
//! - **Fixed24_8**: fixed-point arithmetic for incremental edge stepping
//! - **Scan conversion**: active-edge-table polygon-to-scanline
//!   conversion under the even-odd fill rule

pub mod fixed;
pub mod scan_convert;

pub use fixed::Fixed24_8;
pub use scan_convert::get_scans;
