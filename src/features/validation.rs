use crate::PhotoLocatorError;
use image::ImageReader;
use mime_guess::MimeGuess;
use std::path::Path;
use tracing::debug;

const JPEG_MIME: &str = "image/jpeg";
const PNG_MIME: &str = "image/png";

/// File dialog extensions matching [`validate_image`].
pub fn accepted_extensions(accept_png: bool) -> &'static [&'static str] {
    if accept_png {
        &["jpg", "jpeg", "png"]
    } else {
        &["jpg", "jpeg"]
    }
}

/// Gate between choosing a file and reading its metadata.
///
/// The content must be recognised as an image. For formats with a compiled-in decoder the
/// header and dimensions are read as well (pixels are not). A recognised format without a
/// decoder, such as GIF or WebP, still counts as an image and is then rejected by the
/// extension check, which accepts JPEG, or PNG when `accept_png` is set.
pub fn validate_image(path: &Path, accept_png: bool) -> Result<(), PhotoLocatorError> {
    let not_an_image = || PhotoLocatorError::NotAnImage {
        path: path.to_path_buf(),
    };

    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|_| not_an_image())?;
    let format = reader.format().ok_or_else(not_an_image)?;
    if format.reading_enabled() {
        let (width, height) = reader.into_dimensions().map_err(|_| not_an_image())?;
        debug!(file = %path.display(), ?format, width, height, "image decoded");
    } else {
        debug!(file = %path.display(), ?format, "image recognised, no decoder");
    }

    let mime = MimeGuess::from_path(path).first_or_octet_stream();
    let accepted = match mime.essence_str() {
        JPEG_MIME => true,
        PNG_MIME => accept_png,
        _ => false,
    };
    if !accepted {
        return Err(PhotoLocatorError::UnsupportedFormat {
            path: path.to_path_buf(),
            mime: mime.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_image(dir: &TempDir, name: &str, format: ImageFormat) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::new(4, 4)
            .save_with_format(&path, format)
            .expect("test image should be written");
        path
    }

    #[test]
    fn test_accepts_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let lower = write_image(&dir, "photo.jpg", ImageFormat::Jpeg);
        let upper = write_image(&dir, "PHOTO.JPEG", ImageFormat::Jpeg);

        assert!(validate_image(&lower, false).is_ok());
        assert!(validate_image(&upper, false).is_ok());
    }

    #[test]
    fn test_text_file_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "just some words").unwrap();

        assert!(matches!(
            validate_image(&path, false),
            Err(PhotoLocatorError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_text_renamed_to_jpg_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, "definitely not a jpeg").unwrap();

        assert!(matches!(
            validate_image(&path, false),
            Err(PhotoLocatorError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.jpg");

        assert!(matches!(
            validate_image(&path, false),
            Err(PhotoLocatorError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_png_is_unsupported_unless_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(&dir, "screenshot.png", ImageFormat::Png);

        assert!(matches!(
            validate_image(&path, false),
            Err(PhotoLocatorError::UnsupportedFormat { mime, .. }) if mime == "image/png"
        ));
        assert!(validate_image(&path, true).is_ok());
    }

    /// Smallest valid GIF: one transparent pixel.
    const ONE_PIXEL_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00\
        !\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

    /// A lossless WebP container header for a 1x1 image.
    const ONE_PIXEL_WEBP: &[u8] = b"RIFF\x1a\x00\x00\x00WEBPVP8L\x0d\x00\x00\x00\
        \x2f\x00\x00\x00\x10\x07\x10\x11\x11\x88\x88\xfe\x07\x00";

    #[test]
    fn test_gif_is_unsupported_not_a_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, ONE_PIXEL_GIF).unwrap();

        assert!(matches!(
            validate_image(&path, true),
            Err(PhotoLocatorError::UnsupportedFormat { mime, .. }) if mime == "image/gif"
        ));
    }

    #[test]
    fn test_webp_is_unsupported_not_a_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.webp");
        std::fs::write(&path, ONE_PIXEL_WEBP).unwrap();

        assert!(matches!(
            validate_image(&path, false),
            Err(PhotoLocatorError::UnsupportedFormat { mime, .. }) if mime == "image/webp"
        ));
    }

    #[test]
    fn test_jpeg_without_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(&dir, "photo", ImageFormat::Jpeg);

        assert!(matches!(
            validate_image(&path, false),
            Err(PhotoLocatorError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_accepted_extensions() {
        assert_eq!(accepted_extensions(false), &["jpg", "jpeg"]);
        assert!(accepted_extensions(true).contains(&"png"));
    }
}
