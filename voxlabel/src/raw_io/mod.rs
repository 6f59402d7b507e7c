//! Headerless raw volume files.
//!
//! A raw file is `width * height * depth` elements of one [`ElementType`],
//! stored x-fastest, then y, then z, with no header. Byte order is declared
//! by the caller.

pub mod error;


use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use common::Buffer3;
use num_traits::{AsPrimitive, ToBytes};
use serde::{Deserialize, Serialize};

use crate::volume::{Spacing, Volume, VolumeDimensions};

pub use error::{RawIoError, RawIoErrorKind, UnknownElementType};

// ============================================================================
// Format descriptors
// ============================================================================

/// Element type stored in a raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    #[serde(alias = "char")]
    I8,
    #[serde(alias = "uchar")]
    U8,
    /// Typical CT storage (Hounsfield units).
    #[default]
    #[serde(alias = "short")]
    I16,
    #[serde(alias = "ushort")]
    U16,
    #[serde(alias = "int")]
    I32,
    #[serde(alias = "uint")]
    U32,
    #[serde(alias = "float")]
    F32,
}

impl ElementType {
    #[inline]
    pub const fn size_bytes(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::F32 => "f32",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "i8" | "char" => Ok(Self::I8),
            "u8" | "uchar" => Ok(Self::U8),
            "i16" | "short" => Ok(Self::I16),
            "u16" | "ushort" => Ok(Self::U16),
            "i32" | "int" => Ok(Self::I32),
            "u32" | "uint" => Ok(Self::U32),
            "f32" | "float" => Ok(Self::F32),
            _ => Err(UnknownElementType(s.to_string())),
        }
    }
}

/// Byte order of multi-byte elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// Decode one element to `f64`. Every supported type is exactly representable.
#[inline]
fn decode_element(bytes: &[u8], element_type: ElementType, byte_order: ByteOrder) -> f64 {
    macro_rules! decode {
        ($t:ty, $n:literal) => {{
            let mut raw = [0u8; $n];
            raw.copy_from_slice(bytes);
            match byte_order {
                ByteOrder::Little => <$t>::from_le_bytes(raw) as f64,
                ByteOrder::Big => <$t>::from_be_bytes(raw) as f64,
            }
        }};
    }

    match element_type {
        ElementType::I8 => bytes[0] as i8 as f64,
        ElementType::U8 => bytes[0] as f64,
        ElementType::I16 => decode!(i16, 2),
        ElementType::U16 => decode!(u16, 2),
        ElementType::I32 => decode!(i32, 4),
        ElementType::U32 => decode!(u32, 4),
        ElementType::F32 => decode!(f32, 4),
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Reads a raw file into a [`Volume`].
///
/// ```no_run
/// use voxlabel::raw_io::{ByteOrder, RawReader};
/// use voxlabel::volume::VolumeDimensions;
///
/// let volume = RawReader::new("volume1_512x512x56.raw")
///     .with_byte_order(ByteOrder::Big)
///     .read::<f32>(VolumeDimensions::new(512, 512, 56))?;
/// # Ok::<(), voxlabel::raw_io::RawIoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RawReader {
    path: PathBuf,
    element_type: ElementType,
    byte_order: ByteOrder,
    spacing: Spacing,
}

impl RawReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            element_type: ElementType::default(),
            byte_order: ByteOrder::default(),
            spacing: Spacing::default(),
        }
    }

    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read exactly `dimensions` elements, converting each to `T` with
    /// `as`-cast semantics. Trailing bytes in the file are ignored.
    pub fn read<T>(&self, dimensions: VolumeDimensions) -> Result<Volume<T>, RawIoError>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        let VolumeDimensions {
            width,
            height,
            depth,
        } = dimensions;
        let num_voxels = self.checked_len(dimensions)?;
        let element_size = self.element_type.size_bytes();
        let slice_bytes = width * height * element_size;

        let file = File::open(&self.path).map_err(|source| RawIoError::FileOpen {
            path: self.path.clone(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let mut voxels = Vec::new();
        voxels
            .try_reserve_exact(num_voxels)
            .map_err(|e| self.unknown(format!("cannot allocate {num_voxels} voxels: {e}")))?;
        let mut slice = vec![0u8; slice_bytes];
        for _ in 0..depth {
            reader
                .read_exact(&mut slice)
                .map_err(|source| RawIoError::FileRead {
                    path: self.path.clone(),
                    source,
                })?;
            voxels.extend(
                slice
                    .chunks_exact(element_size)
                    .map(|b| decode_element(b, self.element_type, self.byte_order).as_()),
            );
        }

        tracing::debug!(
            path = %self.path.display(),
            width,
            height,
            depth,
            element_type = %self.element_type,
            byte_order = ?self.byte_order,
            "Read raw volume"
        );

        Ok(Volume::new(
            Buffer3::new(width, height, depth, voxels),
            self.spacing,
        ))
    }

    /// Voxel count, rejecting empty or unaddressable volumes.
    fn checked_len(&self, dimensions: VolumeDimensions) -> Result<usize, RawIoError> {
        let VolumeDimensions {
            width,
            height,
            depth,
        } = dimensions;
        if width == 0 || height == 0 || depth == 0 {
            return Err(self.unknown(format!(
                "zero-sized dimensions {width}x{height}x{depth}"
            )));
        }
        dimensions
            .num_voxels()
            .filter(|n| n.checked_mul(self.element_type.size_bytes()).is_some())
            .ok_or_else(|| {
                self.unknown(format!("dimensions {width}x{height}x{depth} overflow"))
            })
    }

    fn unknown(&self, reason: String) -> RawIoError {
        RawIoError::Unknown {
            path: self.path.clone(),
            reason,
        }
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Writes a [`Buffer3`] as a raw file, element type given by `T`.
#[derive(Debug, Clone)]
pub struct RawWriter {
    path: PathBuf,
    byte_order: ByteOrder,
}

impl RawWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            byte_order: ByteOrder::default(),
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every voxel, one z-slice at a time. Truncates an existing file.
    pub fn write<T: ToBytes>(&self, volume: &Buffer3<T>) -> Result<(), RawIoError> {
        let file = File::create(&self.path).map_err(|source| RawIoError::FileOpen {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        let write_err = |source| RawIoError::FileWrite {
            path: self.path.clone(),
            source,
        };

        let mut bytes = Vec::with_capacity(volume.slice_len() * std::mem::size_of::<T>());
        for z in 0..volume.depth() {
            bytes.clear();
            for value in volume.slice(z) {
                match self.byte_order {
                    ByteOrder::Little => bytes.extend_from_slice(value.to_le_bytes().as_ref()),
                    ByteOrder::Big => bytes.extend_from_slice(value.to_be_bytes().as_ref()),
                }
            }
            writer.write_all(&bytes).map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;

        tracing::debug!(
            path = %self.path.display(),
            voxels = volume.len(),
            byte_order = ?self.byte_order,
            "Wrote raw volume"
        );
        Ok(())
    }
}
