// Image loading for the player photo and the spray chart.
//
// Terminal output draws images with half-block cells: each character cell
// shows two vertically stacked pixels (foreground = top, background =
// bottom). HTML output embeds them as PNG data URIs.

use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Longest edge kept in memory for terminal previews.
pub const PREVIEW_EDGE: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("failed to encode image {path}: {source}")]
    Encode {
        path: String,
        source: image::ImageError,
    },
}

/// Decode an image file. The format is sniffed from the bytes, not the
/// extension.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|e| ImageError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    image::load_from_memory(&bytes).map_err(|e| ImageError::Decode {
        path: path.display().to_string(),
        source: e,
    })
}

/// Decode an image and shrink it to at most `PREVIEW_EDGE` on its longest
/// side, so per-frame resizing stays cheap.
pub fn load_preview(path: &Path) -> Result<DynamicImage, ImageError> {
    let img = load_image(path)?;
    let (w, h) = img.dimensions();
    if w > PREVIEW_EDGE || h > PREVIEW_EDGE {
        Ok(img.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE))
    } else {
        Ok(img)
    }
}

/// Re-encode an image as PNG and wrap it in a `data:` URI.
pub fn png_data_uri(path: &Path) -> Result<String, ImageError> {
    let img = load_image(path)?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImageError::Encode {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
}

// ---------------------------------------------------------------------------
// Half-block thumbnails
// ---------------------------------------------------------------------------

/// One terminal cell: the upper and lower pixel colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfBlock {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

/// An image scaled to fit a block of terminal cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thumbnail {
    pub rows: Vec<Vec<HalfBlock>>,
}

impl Thumbnail {
    pub fn width(&self) -> u16 {
        self.rows.first().map_or(0, |r| r.len() as u16)
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Scale `img` to fit within `cols` x `rows` cells, preserving aspect ratio.
///
/// A cell holds two pixels vertically, which makes cell pixels roughly square
/// on common terminal fonts.
pub fn thumbnail(img: &DynamicImage, cols: u16, rows: u16) -> Thumbnail {
    let (iw, ih) = img.dimensions();
    if cols == 0 || rows == 0 || iw == 0 || ih == 0 {
        return Thumbnail::default();
    }

    let max_w = f64::from(cols);
    let max_h = f64::from(rows) * 2.0;
    let scale = (max_w / f64::from(iw)).min(max_h / f64::from(ih));
    let tw = ((f64::from(iw) * scale).round() as u32).clamp(1, u32::from(cols));
    let th = ((f64::from(ih) * scale).round() as u32).clamp(1, u32::from(rows) * 2);

    let pixels = img.resize_exact(tw, th, FilterType::Nearest).to_rgb8();
    let mut out = Vec::with_capacity(th.div_ceil(2) as usize);
    for y in (0..th).step_by(2) {
        let row = (0..tw)
            .map(|x| {
                let top = pixels.get_pixel(x, y).0;
                let bottom = if y + 1 < th {
                    pixels.get_pixel(x, y + 1).0
                } else {
                    top
                };
                HalfBlock { top, bottom }
            })
            .collect();
        out.push(row);
    }
    Thumbnail { rows: out }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Top half red, bottom half blue.
    fn two_tone(w: u32, h: u32) -> DynamicImage {
        let img = RgbImage::from_fn(w, h, |_, y| {
            if y < h / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn thumbnail_fits_within_cells() {
        let t = thumbnail(&two_tone(400, 200), 20, 20);
        assert!(t.width() <= 20);
        assert!(t.height() <= 20);
        assert_eq!(t.width(), 20);
        // 400x200 at width 20 is 20x10 pixels, i.e. 5 cell rows.
        assert_eq!(t.height(), 5);
    }

    #[test]
    fn thumbnail_respects_row_limit_for_tall_images() {
        let t = thumbnail(&two_tone(100, 400), 40, 10);
        assert_eq!(t.height(), 10);
        assert!(t.width() <= 40);
        assert_eq!(t.width(), 5);
    }

    #[test]
    fn thumbnail_keeps_colors() {
        let t = thumbnail(&two_tone(4, 4), 4, 2);
        assert_eq!(t.height(), 2);
        assert_eq!(t.rows[0][0].top, [255, 0, 0]);
        assert_eq!(t.rows[0][0].bottom, [255, 0, 0]);
        assert_eq!(t.rows[1][0].top, [0, 0, 255]);
    }

    #[test]
    fn thumbnail_of_zero_area_is_empty() {
        assert!(thumbnail(&two_tone(4, 4), 0, 10).is_empty());
        assert!(thumbnail(&two_tone(4, 4), 10, 0).is_empty());
    }

    #[test]
    fn odd_pixel_height_repeats_last_row() {
        let t = thumbnail(&two_tone(1, 3), 1, 2);
        let last = t.rows.last().unwrap()[0];
        assert_eq!(last.top, last.bottom);
    }

    #[test]
    fn load_preview_shrinks_large_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        two_tone(600, 300).save(&path).unwrap();

        let img = load_preview(&path).unwrap();
        let (w, h) = img.dimensions();
        assert_eq!(w, PREVIEW_EDGE);
        assert!(h <= PREVIEW_EDGE);
    }

    #[test]
    fn data_uri_is_png_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");
        two_tone(8, 8).save(&path).unwrap();

        let uri = png_data_uri(&path).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let payload = uri.trim_start_matches("data:image/png;base64,");
        let bytes = STANDARD.decode(payload).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_image(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
    }
}
