use nalgebra::Vector3;

/// A triangular wall of boxes standing in the YZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PyramidSpec {
    /// Center of the bottom row, on the ground.
    pub origin: Vector3<f32>,
    /// Boxes in the bottom row.
    pub size: usize,
    /// Edge length of one box.
    pub box_size: f32,
}

impl PyramidSpec {
    pub fn new(origin: Vector3<f32>, size: usize, box_size: f32) -> Self {
        Self {
            origin,
            size,
            box_size,
        }
    }

    pub fn box_count(&self) -> usize {
        pyramid_box_count(self.size)
    }

    pub fn half_extents(&self) -> Vector3<f32> {
        Vector3::repeat(self.box_size * 0.5)
    }

    pub fn positions(&self) -> Vec<Vector3<f32>> {
        pyramid_positions(self.origin, self.size, self.box_size)
    }
}

/// `size + (size - 1) + ... + 1`.
pub fn pyramid_box_count(size: usize) -> usize {
    size * (size + 1) / 2
}

/// Box centers of a pyramid, bottom row first.
///
/// Row `y` holds `size - y` boxes and is lifted by half a box so it rests on the row
/// below. Within a row boxes are emitted from `+Z` to `-Z`, and every row is centered
/// on `origin.z`; each row is shifted by half a box relative to the one below.
pub fn pyramid_positions(origin: Vector3<f32>, size: usize, box_size: f32) -> Vec<Vector3<f32>> {
    let mut positions = Vec::with_capacity(pyramid_box_count(size));
    let half_size = size as f32 / 2.0;

    for y in 0..size {
        let row_len = size - y;
        for x in (1..=row_len).rev() {
            let local = Vector3::new(
                0.0,
                y as f32 + 0.5,
                x as f32 - half_size + y as f32 / 2.0 - 0.5,
            );
            positions.push(local * box_size + origin);
        }
    }

    positions
}
