use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

/// Dense 3D storage, x fastest, then y, then z.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer3<T> {
    voxels: Vec<T>,
    width: usize,
    height: usize,
    depth: usize,
}

impl<T> Buffer3<T> {
    pub fn new(width: usize, height: usize, depth: usize, voxels: Vec<T>) -> Self {
        assert_eq!(
            voxels.len(),
            width * height * depth,
            "voxels length must equal width * height * depth"
        );
        Self {
            voxels,
            width,
            height,
            depth,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> &T {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        &self.voxels[self.index(x, y, z)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> &mut T {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        let idx = self.index(x, y, z);
        &mut self.voxels[idx]
    }

    /// Linear index of `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.width * self.height + y * self.width + x
    }

    /// Inverse of [`Buffer3::index`].
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let slice_len = self.slice_len();
        let z = idx / slice_len;
        let in_slice = idx % slice_len;
        (in_slice % self.width, in_slice / self.width, z)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Number of voxels in one z-slice.
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.width * self.height
    }

    /// Voxels of slice `z`, indexed by `x + y * width`.
    #[inline]
    pub fn slice(&self, z: usize) -> &[T] {
        let len = self.slice_len();
        &self.voxels[z * len..(z + 1) * len]
    }

    #[inline]
    pub fn slice_mut(&mut self, z: usize) -> &mut [T] {
        let len = self.slice_len();
        &mut self.voxels[z * len..(z + 1) * len]
    }

    #[inline]
    pub fn voxels(&self) -> &[T] {
        &self.voxels
    }

    #[inline]
    pub fn voxels_mut(&mut self) -> &mut [T] {
        &mut self.voxels
    }

    #[inline]
    pub fn into_voxels(self) -> Vec<T> {
        self.voxels
    }
}

impl<T: Clone> Buffer3<T> {
    pub fn new_filled(width: usize, height: usize, depth: usize, value: T) -> Self {
        Self {
            voxels: vec![value; width * height * depth],
            width,
            height,
            depth,
        }
    }

    /// Like [`Buffer3::new_filled`], but reports allocation failure instead of aborting.
    pub fn try_new_filled(
        width: usize,
        height: usize,
        depth: usize,
        value: T,
    ) -> Result<Self, TryReserveError> {
        let len = width * height * depth;
        let mut voxels = Vec::new();
        voxels.try_reserve_exact(len)?;
        voxels.resize(len, value);
        Ok(Self {
            voxels,
            width,
            height,
            depth,
        })
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.voxels.fill(value);
    }
}

impl<T: Default + Clone> Buffer3<T> {
    pub fn new_default(width: usize, height: usize, depth: usize) -> Self {
        Self::new_filled(width, height, depth, T::default())
    }
}

impl<T> Index<(usize, usize, usize)> for Buffer3<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y, z): (usize, usize, usize)) -> &Self::Output {
        &self.voxels[z * self.width * self.height + y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Buffer3<T> {
    #[inline]
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut Self::Output {
        let idx = z * self.width * self.height + y * self.width + x;
        &mut self.voxels[idx]
    }
}

impl<T> Index<usize> for Buffer3<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.voxels[idx]
    }
}

impl<T> IndexMut<usize> for Buffer3<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.voxels[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout_is_x_fastest() {
        let buf = Buffer3::<u8>::new_default(4, 3, 2);
        assert_eq!(buf.index(0, 0, 0), 0);
        assert_eq!(buf.index(1, 0, 0), 1);
        assert_eq!(buf.index(0, 1, 0), 4);
        assert_eq!(buf.index(0, 0, 1), 12);
        assert_eq!(buf.index(3, 2, 1), 23);
    }

    #[test]
    fn test_coords_inverts_index() {
        let buf = Buffer3::<u8>::new_default(5, 4, 3);
        for idx in 0..buf.len() {
            let (x, y, z) = buf.coords(idx);
            assert_eq!(buf.index(x, y, z), idx);
        }
    }

    #[test]
    fn test_tuple_index_and_get_agree() {
        let mut buf = Buffer3::new_filled(3, 3, 3, 0i16);
        buf[(1, 2, 0)] = 7;
        *buf.get_mut(2, 0, 2) = -3;

        assert_eq!(*buf.get(1, 2, 0), 7);
        assert_eq!(buf[(2, 0, 2)], -3);
        assert_eq!(buf[buf.index(1, 2, 0)], 7);
    }

    #[test]
    fn test_slice_views() {
        let voxels: Vec<u32> = (0..24).collect();
        let mut buf = Buffer3::new(4, 3, 2, voxels);

        assert_eq!(buf.slice_len(), 12);
        assert_eq!(buf.slice(0)[0], 0);
        assert_eq!(buf.slice(1)[0], 12);
        assert_eq!(buf.slice(1).len(), 12);

        buf.slice_mut(1).fill(0);
        assert_eq!(buf[(3, 2, 1)], 0);
        assert_eq!(buf[(3, 2, 0)], 11);
    }

    #[test]
    fn test_try_new_filled() {
        let buf = Buffer3::try_new_filled(2, 2, 2, 9u32).unwrap();
        assert_eq!(buf.len(), 8);
        assert!(buf.voxels().iter().all(|&v| v == 9));
    }

    #[test]
    fn test_fill_and_into_voxels() {
        let mut buf = Buffer3::new_filled(2, 1, 1, 1u8);
        buf.fill(5);
        assert_eq!(buf.into_voxels(), vec![5, 5]);
    }

    #[test]
    #[should_panic(expected = "voxels length")]
    fn test_new_wrong_length() {
        Buffer3::new(2, 2, 2, vec![0u8; 7]);
    }
}
