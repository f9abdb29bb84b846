//! Minimal single-file NIfTI-1 (`.nii.gz`) codec for `f64` volumes.
//!
//! Only what the sphere masks need: one header with an sform affine, an empty
//! extension block, and little-endian voxels in first-axis-fastest order.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use nalgebra::Matrix4;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use crate::error::{Result, SphereMaskError};

pub const HEADER_SIZE: usize = 348;
/// Header plus the 4-byte extension flag.
pub const VOX_OFFSET: usize = 352;
pub const MAGIC: [u8; 4] = *b"n+1\0";

pub const DT_FLOAT64: i16 = 64;
/// `sform_code` meaning "aligned to another file's / anatomical coordinates".
pub const XFORM_ALIGNED_ANAT: i16 = 2;

/// The subset of the NIfTI-1 header written and read by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// `dim[0]` is the rank, `dim[1..=rank]` the extents.
    pub dim: [i16; 8],
    pub datatype: i16,
    pub bitpix: i16,
    pub pixdim: [f32; 8],
    pub vox_offset: f32,
    pub qform_code: i16,
    pub sform_code: i16,
    pub srow_x: [f32; 4],
    pub srow_y: [f32; 4],
    pub srow_z: [f32; 4],
}

impl NiftiHeader {
    /// Header for a `f64` volume of `shape` with the given voxel-to-world affine.
    ///
    /// Returns [`SphereMaskError::InvalidShape`] for ranks above 7 or extents
    /// that do not fit in an `i16`.
    pub fn for_volume(shape: &[usize], affine: &Matrix4<f64>) -> Result<Self> {
        if shape.is_empty() || shape.len() > 7 {
            return Err(SphereMaskError::InvalidShape(format!(
                "NIfTI supports 1 to 7 dimensions, got {}",
                shape.len()
            )));
        }
        let mut dim = [1_i16; 8];
        dim[0] = shape.len() as i16;
        for (d, &n) in dim[1..].iter_mut().zip(shape) {
            *d = i16::try_from(n).map_err(|_| {
                SphereMaskError::InvalidShape(format!("extent {n} too large for NIfTI"))
            })?;
        }

        let row = |r: usize| -> [f32; 4] { std::array::from_fn(|c| affine[(r, c)] as f32) };

        Ok(Self {
            dim,
            datatype: DT_FLOAT64,
            bitpix: 64,
            pixdim: [1.0; 8],
            vox_offset: VOX_OFFSET as f32,
            qform_code: 0,
            sform_code: XFORM_ALIGNED_ANAT,
            srow_x: row(0),
            srow_y: row(1),
            srow_z: row(2),
        })
    }

    /// Volume extents, `dim[1..=dim[0]]`.
    pub fn shape(&self) -> Vec<usize> {
        let rank = self.dim[0].clamp(0, 7) as usize;
        self.dim[1..=rank].iter().map(|&d| d as usize).collect()
    }

    /// The sform as a 4×4 matrix; the last row is always `[0, 0, 0, 1]`.
    pub fn affine(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        for (r, srow) in [self.srow_x, self.srow_y, self.srow_z].iter().enumerate() {
            for (c, &v) in srow.iter().enumerate() {
                m[(r, c)] = v as f64;
            }
        }
        m
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0_u8; HEADER_SIZE];
        put(&mut buf, 0, &(HEADER_SIZE as i32).to_le_bytes());
        for (i, d) in self.dim.iter().enumerate() {
            put(&mut buf, 40 + 2 * i, &d.to_le_bytes());
        }
        put(&mut buf, 70, &self.datatype.to_le_bytes());
        put(&mut buf, 72, &self.bitpix.to_le_bytes());
        for (i, p) in self.pixdim.iter().enumerate() {
            put(&mut buf, 76 + 4 * i, &p.to_le_bytes());
        }
        put(&mut buf, 108, &self.vox_offset.to_le_bytes());
        put(&mut buf, 252, &self.qform_code.to_le_bytes());
        put(&mut buf, 254, &self.sform_code.to_le_bytes());
        for (base, srow) in [(280, &self.srow_x), (296, &self.srow_y), (312, &self.srow_z)] {
            for (i, v) in srow.iter().enumerate() {
                put(&mut buf, base + 4 * i, &v.to_le_bytes());
            }
        }
        put(&mut buf, 344, &MAGIC);
        buf
    }

    /// Decodes a little-endian single-file header.
    ///
    /// Returns [`SphereMaskError::InvalidShape`] if `sizeof_hdr` or the magic is wrong.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        if read_i32(buf, 0) != HEADER_SIZE as i32 || buf[344..348] != MAGIC {
            return Err(SphereMaskError::InvalidShape(
                "not a little-endian NIfTI-1 single file".into(),
            ));
        }
        Ok(Self {
            dim: std::array::from_fn(|i| read_i16(buf, 40 + 2 * i)),
            datatype: read_i16(buf, 70),
            bitpix: read_i16(buf, 72),
            pixdim: std::array::from_fn(|i| read_f32(buf, 76 + 4 * i)),
            vox_offset: read_f32(buf, 108),
            qform_code: read_i16(buf, 252),
            sform_code: read_i16(buf, 254),
            srow_x: std::array::from_fn(|i| read_f32(buf, 280 + 4 * i)),
            srow_y: std::array::from_fn(|i| read_f32(buf, 296 + 4 * i)),
            srow_z: std::array::from_fn(|i| read_f32(buf, 312 + 4 * i)),
        })
    }
}

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn read_i16(buf: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn read_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_bits(read_i32(buf, offset) as u32)
}

/// Writes `volume` as a gzipped single-file NIfTI-1 with the given affine.
pub fn write_nifti_gz(path: &Path, volume: &ArrayD<f64>, affine: &Matrix4<f64>) -> Result<()> {
    let header = NiftiHeader::for_volume(volume.shape(), affine)?;

    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(&header.to_bytes())?;
    encoder.write_all(&[0_u8; VOX_OFFSET - HEADER_SIZE])?;
    // reversed axes iterate with axis 0 fastest
    for v in volume.t().iter() {
        encoder.write_all(&v.to_le_bytes())?;
    }
    encoder.finish()?.flush()?;
    Ok(())
}

/// Reads only the header of a `.nii.gz` file.
pub fn read_header_gz(path: &Path) -> Result<NiftiHeader> {
    let mut decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    let mut buf = [0_u8; HEADER_SIZE];
    decoder.read_exact(&mut buf)?;
    NiftiHeader::from_bytes(&buf)
}

/// Reads a `.nii.gz` written by [`write_nifti_gz`] back into an array.
///
/// Only `FLOAT64` volumes are supported.
pub fn read_nifti_gz(path: &Path) -> Result<(NiftiHeader, ArrayD<f64>)> {
    let mut decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    let mut buf = [0_u8; HEADER_SIZE];
    decoder.read_exact(&mut buf)?;
    let header = NiftiHeader::from_bytes(&buf)?;
    if header.datatype != DT_FLOAT64 {
        return Err(SphereMaskError::InvalidShape(format!(
            "unsupported NIfTI datatype {}",
            header.datatype
        )));
    }

    let skip = (header.vox_offset as usize).saturating_sub(HEADER_SIZE);
    std::io::copy(&mut (&mut decoder).take(skip as u64), &mut std::io::sink())?;

    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    let values: Vec<f64> = raw
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect();

    let shape = header.shape();
    let volume = ArrayD::from_shape_vec(IxDyn(&shape).f(), values)
        .map_err(|e| SphereMaskError::InvalidShape(e.to_string()))?;
    Ok((header, volume))
}
