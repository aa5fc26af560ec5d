use image::imageops::FilterType;
use ndarray::Array4;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("failed to read image {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Loads an image file as a channels-last batch of one, scaled into `[0, 1]`.
pub fn preprocess_image(path: &Path, target_size: u32) -> Result<Array4<f32>, PreprocessError> {
    let read_error = |source| PreprocessError::Read {
        path: path.to_path_buf(),
        source,
    };

    let image_reader = image::ImageReader::open(path)
        .map_err(read_error)?
        .with_guessed_format()
        .map_err(read_error)?;

    let original_img = image_reader.decode()?;
    let img = original_img
        .resize_exact(target_size, target_size, FilterType::Nearest)
        .to_rgb8();

    let (width, height) = img.dimensions();
    let mut input = Array4::zeros((1, height as usize, width as usize, 3));
    for (x, y, pixel) in img.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        let [r, g, b] = pixel.0;
        input[[0, y, x, 0]] = (r as f32) / 255.;
        input[[0, y, x, 1]] = (g as f32) / 255.;
        input[[0, y, x, 2]] = (b as f32) / 255.;
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4().simple(), name))
    }

    #[test]
    fn test_preprocess_image_resizes_and_normalizes() {
        let path = scratch_path("red.png");
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(100, 60, Rgb([255, 0, 51]));
        img.save(&path).unwrap();

        let result = preprocess_image(&path, 32);
        std::fs::remove_file(&path).unwrap();

        let input = result.unwrap();
        assert_eq!(input.shape(), &[1, 32, 32, 3]);
        assert_eq!(input[[0, 0, 0, 0]], 1.0);
        assert_eq!(input[[0, 31, 31, 1]], 0.0);
        assert!((input[[0, 10, 20, 2]] - 0.2).abs() < 1e-6);
        assert!(input.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_preprocess_image_drops_alpha_channel() {
        let path = scratch_path("rgba.png");
        let img = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_pixel(8, 8, Rgba([0, 255, 0, 10]));
        img.save(&path).unwrap();

        let result = preprocess_image(&path, 16);
        std::fs::remove_file(&path).unwrap();

        let input = result.unwrap();
        assert_eq!(input.shape(), &[1, 16, 16, 3]);
        assert_eq!(input[[0, 5, 5, 1]], 1.0);
    }

    #[test]
    fn test_preprocess_image_ignores_misleading_extension() {
        let path = scratch_path("actually-png.jpg");
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(4, 4, Rgb([0, 0, 255]));
        img.save_with_format(&path, image::ImageFormat::Png).unwrap();

        let result = preprocess_image(&path, 4);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_ok());
    }

    #[test]
    fn test_preprocess_image_rejects_corrupt_file() {
        let path = scratch_path("corrupt.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = preprocess_image(&path, 32);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(PreprocessError::Decode(_))));
    }

    #[test]
    fn test_preprocess_image_reports_missing_file() {
        let path = scratch_path("missing.png");
        let result = preprocess_image(&path, 32);

        assert!(matches!(result, Err(PreprocessError::Read { .. })));
    }
}
