use rgbd_image::{ImageError, ImageSize};

/// Sentinel marking a depth pixel with no valid color correspondence.
pub const INVALID_UV: [f32; 2] = [-1.0, -1.0];

/// Per-depth-pixel map of normalized color image coordinates.
///
/// Holds one `[u, v]` pair per depth pixel, row-major in the depth grid.
/// Valid pairs are normalized to `[0, 1)` against the color image width and
/// height; a negative component marks a pixel whose 3-D point is not observed
/// by the color sensor (see [`INVALID_UV`]).
#[derive(Clone, Debug)]
pub struct UvMap {
    size: ImageSize,
    data: Vec<[f32; 2]>,
}

impl UvMap {
    /// Create a UV map from per-pixel data.
    ///
    /// # Errors
    ///
    /// If the data length does not match `size.width * size.height`, an error
    /// is returned.
    pub fn new(size: ImageSize, data: Vec<[f32; 2]>) -> Result<Self, ImageError> {
        if data.len() != size.num_pixels() {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.num_pixels(),
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a UV map with every entry set to the same pair.
    pub fn from_size_val(size: ImageSize, val: [f32; 2]) -> Self {
        Self {
            size,
            data: vec![val; size.num_pixels()],
        }
    }

    /// Get the depth grid size the map was computed for.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of entries in the map.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the per-pixel data as a flat slice.
    pub fn as_slice(&self) -> &[[f32; 2]] {
        &self.data
    }

    /// Get the pair for the depth pixel at `(x, y)`.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&[f32; 2]> {
        if x >= self.size.width {
            return None;
        }
        self.data.get(y * self.size.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::{UvMap, INVALID_UV};
    use rgbd_image::{ImageError, ImageSize};

    #[test]
    fn uvmap_smoke() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let map = UvMap::new(size, vec![[0.5, 0.5]; 6])?;
        assert_eq!(map.len(), 6);
        assert_eq!(map.size(), size);
        assert_eq!(map.get(2, 1), Some(&[0.5, 0.5]));
        assert_eq!(map.get(3, 1), None);

        Ok(())
    }

    #[test]
    fn uvmap_length_mismatch() {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let map = UvMap::new(size, vec![[0.0, 0.0]; 5]);
        assert!(matches!(map, Err(ImageError::InvalidChannelShape(5, 6))));
    }

    #[test]
    fn uvmap_from_size_val() {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let map = UvMap::from_size_val(size, INVALID_UV);
        assert!(map.as_slice().iter().all(|uv| *uv == INVALID_UV));
    }
}
