use log::info;
use nalgebra::Vector3;
use std::path::Path;

/// A decoded 2D texture map sampled with nearest-neighbor lookup.
#[derive(Debug, Clone)]
pub struct Texture {
    pixels: Vec<Vector3<f32>>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes an image file into a linear [0,1] RGB buffer.
    /// A missing or undecodable file is a hard error: the renderer must
    /// fail at construction time instead of sampling garbage.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture '{}': {}", path_ref.display(), e))?
            .to_rgb8();

        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| {
                Vector3::new(
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                )
            })
            .collect();

        info!("Loaded texture: {} ({}x{})", path_ref.display(), width, height);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// A 1x1 texture of a constant color. Used as a fallback material and
    /// heavily in tests.
    pub fn solid(color: Vector3<f32>) -> Self {
        Self {
            pixels: vec![color],
            width: 1,
            height: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbor sample. Texel indices are clamped to the valid
    /// range, so out-of-range uv coordinates repeat the border texel.
    pub fn sample(&self, u: f32, v: f32) -> Vector3<f32> {
        let x = (u * self.width as f32) as i64;
        let y = (v * self.height as f32) as i64;

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;

        self.pixels[y * self.width as usize + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: red, green / blue, white.
        Texture {
            pixels: vec![
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(1.0, 1.0, 1.0),
            ],
            width: 2,
            height: 2,
        }
    }

    #[test]
    fn nearest_sampling_picks_the_covering_texel() {
        let tex = checker();
        assert_eq!(tex.sample(0.25, 0.25), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(0.75, 0.25), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(0.25, 0.75), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(0.75, 0.75), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn out_of_range_uv_clamps_to_border() {
        let tex = checker();
        assert_eq!(tex.sample(-3.0, -3.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(4.0, 4.0), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn missing_file_is_a_construction_error() {
        assert!(Texture::load("no/such/texture.png").is_err());
    }
}
