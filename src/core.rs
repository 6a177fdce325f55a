pub mod clipper;
pub mod framebuffer;
pub mod geometry;
pub mod math;
pub mod rasterizer;
