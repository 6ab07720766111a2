//! Typed pixel buffer re-exports.
//!
//! Uses `imgref` for 2D pixel data with typed pixels from the `rgb` crate.

pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::alt::BGR8;
pub use rgb::{RGB8, RGBA8, Rgb, Rgba};
