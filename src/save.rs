use std::path::{Path, PathBuf};

use image::GrayImage;
use nalgebra::Matrix4;
use ndarray::{ArrayD, Ix2};

use crate::{
    error::{Result, SphereMaskError},
    nifti::write_nifti_gz,
    types::Mask,
};

/// Saves a mask next to `base`, choosing the format from its rank.
///
/// ```text
/// ndim 2  →  <base>.png      8-bit grayscale, value × 255
/// ndim 3  →  <base>.nii.gz   FLOAT64 NIfTI-1, identity affine
/// other   →  nothing written, diagnostic printed
/// ```
///
/// Returns the written path, or `None` when the rank is unsupported. An
/// unsupported rank is not an error; I/O failures are.
pub fn save(mask: &Mask, base: &Path) -> Result<Option<PathBuf>> {
    match mask.ndim() {
        2 => {
            let path = with_suffix(base, ".png");
            save_png(mask, &path)?;
            Ok(Some(path))
        }
        3 => {
            let path = with_suffix(base, ".nii.gz");
            save_nifti(mask, &path)?;
            Ok(Some(path))
        }
        n => {
            let skipped = SphereMaskError::UnsupportedDimensionality(n);
            tracing::warn!(n_dims = n, "{skipped}");
            println!("{skipped}");
            Ok(None)
        }
    }
}

/// `base` with `suffix` appended verbatim, e.g. `data/out` → `data/out.nii.gz`.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s = base.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Writes a 2-D mask as an 8-bit grayscale PNG.
///
/// Rows become image rows, so the image is `shape[1]` wide and `shape[0]` tall.
/// Each value is scaled by 255 and truncated.
pub fn save_png(mask: &Mask, path: &Path) -> Result<()> {
    let plane = mask
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| SphereMaskError::UnsupportedDimensionality(mask.ndim()))?;
    let (height, width) = plane.dim();

    let pixels: Vec<u8> = plane.iter().map(|&v| (v * 255.0) as u8).collect();
    let image = GrayImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
        SphereMaskError::InvalidShape(format!("{width}x{height} does not fit an image buffer"))
    })?;
    image.save(path)?;

    tracing::debug!(path = %path.display(), width, height, "png written");
    Ok(())
}

/// Writes a 3-D mask as a gzipped NIfTI-1 volume of `f64` voxels with an identity affine.
pub fn save_nifti(mask: &Mask, path: &Path) -> Result<()> {
    if mask.ndim() != 3 {
        return Err(SphereMaskError::UnsupportedDimensionality(mask.ndim()));
    }
    let volume: ArrayD<f64> = mask.mapv(f64::from);
    write_nifti_gz(path, &volume, &Matrix4::identity())?;

    tracing::debug!(path = %path.display(), shape = ?mask.shape(), "nifti written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorized;

    fn scratch_base(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sphere_mask_save_{}_{}", name, std::process::id()))
    }

    #[test]
    fn suffix_is_appended_not_replaced() {
        assert_eq!(
            with_suffix(Path::new("data/out"), ".nii.gz"),
            PathBuf::from("data/out.nii.gz")
        );
        assert_eq!(
            with_suffix(Path::new("data/out.v1"), ".png"),
            PathBuf::from("data/out.v1.png")
        );
    }

    #[test]
    fn png_pixels_are_scaled() {
        let mask = vectorized::sphere(1.0, 3, 2).unwrap();
        let base = scratch_base("png_pixels");
        let path = save(&mask, &base).unwrap().unwrap();
        assert_eq!(path.extension().unwrap(), "png");

        let img = image::open(&path).unwrap().into_luma8();
        assert_eq!(img.dimensions(), (3, 3));
        assert_eq!(img.get_pixel(1, 1).0, [255]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn one_dimensional_mask_is_skipped() {
        let mask = vectorized::sphere(1.0, 4, 1).unwrap();
        let base = scratch_base("one_d");
        assert!(save(&mask, &base).unwrap().is_none());
    }

    #[test]
    fn direct_nifti_rejects_planes() {
        let mask = vectorized::sphere(1.0, 4, 2).unwrap();
        assert!(matches!(
            save_nifti(&mask, &scratch_base("plane")),
            Err(SphereMaskError::UnsupportedDimensionality(2))
        ));
    }
}
