use image::{ImageBuffer, Rgb};
use log::info;

/// Saves a packed 0RGB framebuffer to an image file; the format follows
/// the file extension.
pub fn save_buffer(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: &str,
) -> Result<(), String> {
    if buffer.len() != width * height {
        return Err(format!(
            "Buffer size {} does not match {}x{}",
            buffer.len(),
            width,
            height
        ));
    }

    let img = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let pixel = buffer[y as usize * width + x as usize];
        Rgb([
            ((pixel >> 16) & 0xFF) as u8,
            ((pixel >> 8) & 0xFF) as u8,
            (pixel & 0xFF) as u8,
        ])
    });

    img.save(path)
        .map_err(|e| format!("Failed to save image '{}': {}", path, e))?;

    info!("Saved image: {} ({}x{})", path, width, height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_buffer_size_is_rejected() {
        let buffer = vec![0u32; 10];
        assert!(save_buffer(&buffer, 4, 4, "unused.png").is_err());
    }
}
