//! Bit-packed 3D buffer for boolean masks.
//!
//! Uses 1 bit per voxel instead of 1 byte. Storage is slice-aligned: every
//! z-slice starts on a fresh `u64` word, so slices can be written from
//! different threads without sharing words.

use std::ops::Index;

use crate::buffer3::Buffer3;

/// Number of bits per storage word.
const BITS_PER_WORD: usize = 64;

/// A 3D buffer storing boolean values packed as bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer3 {
    /// Packed bit storage, `words_per_slice` words per z-slice, LSB first.
    words: Vec<u64>,
    width: usize,
    height: usize,
    depth: usize,
    words_per_slice: usize,
}

impl BitBuffer3 {
    /// Create a new bit buffer filled with the given value.
    pub fn new_filled(width: usize, height: usize, depth: usize, value: bool) -> Self {
        let words_per_slice = (width * height).div_ceil(BITS_PER_WORD);
        let mut buf = Self {
            words: vec![0u64; words_per_slice * depth],
            width,
            height,
            depth,
            words_per_slice,
        };
        if value {
            buf.fill(true);
        }
        buf
    }

    /// Create a new bit buffer with all bits set to false.
    #[inline]
    pub fn new_default(width: usize, height: usize, depth: usize) -> Self {
        Self::new_filled(width, height, depth, false)
    }

    /// Create a bit buffer from booleans in `x + y*width + z*width*height` order.
    pub fn from_slice(width: usize, height: usize, depth: usize, data: &[bool]) -> Self {
        let len = width * height * depth;
        assert_eq!(
            data.len(),
            len,
            "data length {} does not match dimensions {}x{}x{}={}",
            data.len(),
            width,
            height,
            depth,
            len
        );

        let mut buf = Self::new_default(width, height, depth);
        for (i, &value) in data.iter().enumerate() {
            if value {
                buf.set(i, true);
            }
        }
        buf
    }

    /// Foreground mask of every voxel that differs from `T::default()`.
    pub fn from_nonzero<T: Default + PartialEq>(volume: &Buffer3<T>) -> Self {
        let zero = T::default();
        let mut buf = Self::new_default(volume.width(), volume.height(), volume.depth());
        for (i, value) in volume.voxels().iter().enumerate() {
            if *value != zero {
                buf.set(i, true);
            }
        }
        buf
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

    /// Total number of voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height * self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn slice_len(&self) -> usize {
        self.width * self.height
    }

    /// Number of words backing one z-slice.
    #[inline]
    pub fn words_per_slice(&self) -> usize {
        self.words_per_slice
    }

    #[inline]
    fn word_and_bit(&self, idx: usize) -> (usize, usize) {
        let slice_len = self.slice_len();
        let z = idx / slice_len;
        let in_slice = idx % slice_len;
        (
            z * self.words_per_slice + in_slice / BITS_PER_WORD,
            in_slice % BITS_PER_WORD,
        )
    }

    /// Get a bit value at the given linear voxel index.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len());
        let (word_idx, bit_idx) = self.word_and_bit(idx);
        (self.words[word_idx] >> bit_idx) & 1 != 0
    }

    /// Set a bit value at the given linear voxel index.
    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len());
        let (word_idx, bit_idx) = self.word_and_bit(idx);
        if value {
            self.words[word_idx] |= 1u64 << bit_idx;
        } else {
            self.words[word_idx] &= !(1u64 << bit_idx);
        }
    }

    #[inline]
    pub fn get_xyz(&self, x: usize, y: usize, z: usize) -> bool {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        self.get(z * self.slice_len() + y * self.width + x)
    }

    #[inline]
    pub fn set_xyz(&mut self, x: usize, y: usize, z: usize, value: bool) {
        debug_assert!(x < self.width && y < self.height && z < self.depth);
        let idx = z * self.slice_len() + y * self.width + x;
        self.set(idx, value);
    }

    /// Fill all voxels with the given value. Padding bits stay zero.
    pub fn fill(&mut self, value: bool) {
        if !value {
            self.words.fill(0);
            return;
        }

        let slice_len = self.slice_len();
        let tail_bits = slice_len % BITS_PER_WORD;
        for slice_words in self.words.chunks_mut(self.words_per_slice.max(1)) {
            slice_words.fill(!0u64);
            if tail_bits != 0 {
                if let Some(last) = slice_words.last_mut() {
                    *last = (1u64 << tail_bits) - 1;
                }
            }
        }
    }

    /// Underlying word storage, `words_per_slice()` words per slice.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Count the number of set voxels.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over all voxel values in linear order.
    #[inline]
    pub fn iter(&self) -> BitIter<'_> {
        BitIter {
            buffer: self,
            idx: 0,
        }
    }
}

impl Index<usize> for BitBuffer3 {
    type Output = bool;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        if self.get(idx) {
            &true
        } else {
            &false
        }
    }
}

impl Index<(usize, usize, usize)> for BitBuffer3 {
    type Output = bool;

    #[inline]
    fn index(&self, (x, y, z): (usize, usize, usize)) -> &Self::Output {
        if self.get_xyz(x, y, z) {
            &true
        } else {
            &false
        }
    }
}

impl From<&BitBuffer3> for Vec<bool> {
    #[inline]
    fn from(buf: &BitBuffer3) -> Self {
        buf.iter().collect()
    }
}

/// Iterator over voxel values.
#[derive(Debug)]
pub struct BitIter<'a> {
    buffer: &'a BitBuffer3,
    idx: usize,
}

impl Iterator for BitIter<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.buffer.len() {
            let value = self.buffer.get(self.idx);
            self.idx += 1;
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIter<'_> {}
