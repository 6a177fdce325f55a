pub mod camera;
pub mod context;
pub mod light;
pub mod material;
pub mod mesh;
pub mod texture;
