//! Rasterizing the preview next to the original input

use anyhow::{Context, Result, anyhow};
use image::{ImageBuffer, Rgba, RgbaImage};

/// Raster settings for `render_preview`
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Width in pixels of each rendered image
    pub raster_width: u32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self { raster_width: 300 }
    }
}

/// Render SVG markup to PNG bytes, scaled to the configured width.
pub fn svg_to_png(svg: &str, options: &PreviewOptions) -> Result<Vec<u8>> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default()).context("parsing SVG")?;

    let svg_size = tree.size();
    let scale = options.raster_width as f32 / svg_size.width();
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("cannot allocate a {width}x{height} pixmap"))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().context("encoding PNG")
}

/// Structural similarity of two PNGs, rounded to four decimals.
pub fn calculate_ssim(original_png: &[u8], preview_png: &[u8]) -> Result<f64> {
    let original = image::load_from_memory(original_png)?.to_luma8();
    let preview = image::load_from_memory(preview_png)?.to_luma8();

    let width = original.width().max(preview.width());
    let height = original.height().max(preview.height());

    let original = if original.dimensions() != (width, height) {
        image::imageops::resize(&original, width, height, image::imageops::Lanczos3)
    } else {
        original
    };
    let preview = if preview.dimensions() != (width, height) {
        image::imageops::resize(&preview, width, height, image::imageops::Lanczos3)
    } else {
        preview
    };

    let result = image_compare::gray_similarity_structure(
        &image_compare::Algorithm::MSSIMSimple,
        &original,
        &preview,
    )
    .map_err(|e| anyhow!("comparing images: {e:?}"))?;

    Ok((result.score * 10000.0).round() / 10000.0)
}

/// Both images next to each other under colored header bars, original on
/// the left. A missing image is drawn as a pink placeholder.
pub fn create_side_by_side(original_png: Option<&[u8]>, preview_png: Option<&[u8]>) -> Result<Vec<u8>> {
    let load = |png: Option<&[u8]>| -> Result<RgbaImage> {
        match png {
            Some(data) => Ok(image::load_from_memory(data)?.to_rgba8()),
            None => Ok(ImageBuffer::from_pixel(300, 200, Rgba([255, 200, 200, 255]))),
        }
    };
    let left = load(original_png)?;
    let right = load(preview_png)?;

    let max_height = left.height().max(right.height());
    let fit = |img: RgbaImage| {
        if img.height() == max_height {
            return img;
        }
        let width = (img.width() as f32 * max_height as f32 / img.height() as f32) as u32;
        image::imageops::resize(&img, width, max_height, image::imageops::Lanczos3)
    };
    let left = fit(left);
    let right = fit(right);

    let label_height = 25u32;
    let gap = 10u32;
    let total_width = left.width() + gap + right.width();
    let total_height = max_height + label_height;

    let mut combined: RgbaImage =
        ImageBuffer::from_pixel(total_width, total_height, Rgba([255, 255, 255, 255]));

    // gray header for the input, blue for the preview
    for y in 0..label_height {
        for x in 0..left.width() {
            combined.put_pixel(x, y, Rgba([120, 120, 120, 255]));
        }
        for x in (left.width() + gap)..total_width {
            combined.put_pixel(x, y, Rgba([25, 118, 210, 255]));
        }
    }

    for (x, y, pixel) in left.enumerate_pixels() {
        combined.put_pixel(x, y + label_height, *pixel);
    }
    for (x, y, pixel) in right.enumerate_pixels() {
        combined.put_pixel(x + left.width() + gap, y + label_height, *pixel);
    }

    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    combined.write_with_encoder(encoder)?;
    Ok(buf)
}
