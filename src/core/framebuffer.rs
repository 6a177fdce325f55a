use atomic_float::AtomicF32;
use nalgebra::Vector3;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::Ordering;

/// Color and depth storage for one frame.
///
/// Thread-safe for parallel rasterization: the depth test is a
/// compare-and-swap loop on per-pixel atomics, and color writes go
/// through a pool of striped locks so that two fragments landing on the
/// same pixel cannot interleave.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Linear RGB color, row-major. Interior mutability is required so
    /// that rasterization workers can share `&FrameBuffer`; safety comes
    /// from `locks` plus the depth test.
    color_buffer: UnsafeCell<Vec<Vector3<f32>>>,

    /// One depth value per pixel, reset to +inf each frame. Only ever
    /// decreases between clears.
    depth_buffer: Vec<AtomicF32>,

    /// Striped locks protecting color writes; pixels hash onto stripes.
    locks: Vec<Mutex<()>>,
}

// Shared mutation is coordinated manually through the atomics and locks.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;

        let mut depth_buffer = Vec::with_capacity(size);
        for _ in 0..size {
            depth_buffer.push(AtomicF32::new(f32::INFINITY));
        }

        // A fixed pool keeps memory bounded; contention on 1024 stripes
        // is negligible for frame-sized buffers.
        let lock_count = 1024;
        let mut locks = Vec::with_capacity(lock_count);
        for _ in 0..lock_count {
            locks.push(Mutex::new(()));
        }

        Self {
            width,
            height,
            color_buffer: UnsafeCell::new(vec![Vector3::zeros(); size]),
            depth_buffer,
            locks,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Resets every pixel to the given background color and every depth
    /// value to +inf. Requires exclusive access, so it acts as the
    /// start-of-frame barrier.
    pub fn clear(&mut self, background: Vector3<f32>) {
        self.color_buffer.get_mut().fill(background);
        for depth in &self.depth_buffer {
            depth.store(f32::INFINITY, Ordering::Relaxed);
        }
    }

    /// Atomic depth test: returns true (and stores the new depth) only if
    /// `new_depth` is strictly nearer than the current value. Two
    /// fragments racing for the same pixel cannot both win against the
    /// same stored value.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth_atomic = &self.depth_buffer[self.index(x, y)];

        let mut current = depth_atomic.load(Ordering::Relaxed);
        loop {
            if new_depth >= current {
                return false;
            }
            match depth_atomic.compare_exchange_weak(
                current,
                new_depth,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated) => current = updated,
            }
        }
    }

    /// Thread-safe color write for a fragment that won the depth test at
    /// `depth`. The stored depth is re-checked under the stripe lock: a
    /// writer that has since been beaten by a nearer fragment drops its
    /// color instead of overwriting the winner's.
    #[inline]
    pub fn set_pixel(&self, x: usize, y: usize, color: Vector3<f32>, depth: f32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let _guard = self.locks[idx % self.locks.len()].lock().unwrap();

        // The depth only decreases between clears, so anything other than
        // our own value means a nearer fragment owns this pixel now.
        if self.depth_buffer[idx].load(Ordering::Acquire) != depth {
            return;
        }

        // Safe: the stripe lock serializes writers to this pixel.
        unsafe {
            let buffer = &mut *self.color_buffer.get();
            buffer[idx] = color;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        // Reading after rendering has finished races with nothing.
        let buffer = unsafe { &*self.color_buffer.get() };
        Some(buffer[self.index(x, y)])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_accepts_only_strictly_nearer() {
        let fb = FrameBuffer::new(4, 4);
        assert!(fb.depth_test_and_update(1, 1, 0.5));
        assert!(!fb.depth_test_and_update(1, 1, 0.7));
        assert!(!fb.depth_test_and_update(1, 1, 0.5));
        assert!(fb.depth_test_and_update(1, 1, 0.3));
        assert_eq!(fb.depth_at(1, 1), Some(0.3));
    }

    #[test]
    fn stale_color_write_is_discarded() {
        let fb = FrameBuffer::new(2, 2);
        let near = Vector3::new(1.0, 0.0, 0.0);
        let far = Vector3::new(0.0, 0.0, 1.0);

        // Both fragments pass their depth test before either commits a
        // color; the far one's late write must lose.
        assert!(fb.depth_test_and_update(0, 0, 0.6));
        assert!(fb.depth_test_and_update(0, 0, 0.3));
        fb.set_pixel(0, 0, near, 0.3);
        fb.set_pixel(0, 0, far, 0.6);
        assert_eq!(fb.get_pixel(0, 0), Some(near));

        // Same outcome with the near color arriving last.
        assert!(fb.depth_test_and_update(1, 0, 0.6));
        assert!(fb.depth_test_and_update(1, 0, 0.3));
        fb.set_pixel(1, 0, far, 0.6);
        fb.set_pixel(1, 0, near, 0.3);
        assert_eq!(fb.get_pixel(1, 0), Some(near));
    }

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.depth_test_and_update(0, 0, 0.1);
        fb.set_pixel(0, 0, Vector3::new(1.0, 0.0, 0.0), 0.1);

        fb.clear(Vector3::new(0.2, 0.2, 0.2));
        assert_eq!(fb.get_pixel(0, 0), Some(Vector3::new(0.2, 0.2, 0.2)));
        assert_eq!(fb.depth_at(0, 0), Some(f32::INFINITY));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let fb = FrameBuffer::new(2, 2);
        assert!(!fb.depth_test_and_update(5, 0, 0.1));
        fb.set_pixel(5, 0, Vector3::new(1.0, 1.0, 1.0), 0.1);
        assert!(fb.get_pixel(5, 0).is_none());
    }
}
