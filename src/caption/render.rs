//! Cairo/Pango caption drawing.

use super::color::{BLACK, Color};
use super::font::FontDescriptor;
use super::layout::{Anchor, MAX_WIDTH_RATIO, TextExtents, caption_origin, fit_font_size};
use super::{CaptionError, CaptionStyle, Captions, image_io};

/// Padding around the text when a frame is drawn.
const FRAME_PADDING: f64 = 10.0;

/// Draws captions onto an encoded image and re-encodes it.
pub fn render_captions(
    image_bytes: &[u8],
    captions: &Captions,
    style: &CaptionStyle,
) -> Result<Vec<u8>, CaptionError> {
    style.font.ensure_available()?;

    let rgba = image_io::decode_rgba(image_bytes)?;
    let (width, height) = rgba.dimensions();
    let mut surface = image_io::rgba_to_surface(&rgba)?;
    drop(rgba);

    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.set_antialias(cairo::Antialias::Best);

        if let Some(top) = captions.top() {
            draw_caption(&ctx, width, height, top, Anchor::Top, style)?;
        }
        if let Some(bottom) = captions.bottom() {
            draw_caption(&ctx, width, height, bottom, Anchor::Bottom, style)?;
        }
    }

    let (width, height, rgb) = image_io::surface_to_rgb(&mut surface)?;
    image_io::encode_rgb(width, height, &rgb, style.file_type, style.compression_level)
}

/// Fits, positions and draws one caption.
fn draw_caption(
    ctx: &cairo::Context,
    width: u32,
    height: u32,
    text: &str,
    anchor: Anchor,
    style: &CaptionStyle,
) -> Result<(), CaptionError> {
    ctx.save()?;

    let layout = pangocairo::functions::create_layout(ctx);
    layout.set_text(text);

    let start = style.bounds.initial_size(width, height);
    let max_width = width as f64 * MAX_WIDTH_RATIO;
    let size = fit_font_size(start, style.bounds.min, max_width, |size| {
        measure(&layout, &style.font, size).width
    });

    let extents = measure(&layout, &style.font, size);
    log::debug!(
        "Caption {:?} at {}px ({:.0}x{:.0} ink) on {}x{} image",
        anchor,
        size,
        extents.width,
        extents.height,
        width,
        height
    );

    let (x, y) = caption_origin(width, height, &extents, anchor);

    if style.use_frame {
        ctx.rectangle(
            x + extents.x - FRAME_PADDING,
            y + extents.y - FRAME_PADDING,
            extents.width + FRAME_PADDING * 2.0,
            extents.height + FRAME_PADDING * 2.0,
        );
        set_source(ctx, BLACK);
        ctx.fill()?;
    }

    // Outline first, then fill over the preserved path
    ctx.move_to(x, y);
    pangocairo::functions::layout_path(ctx, &layout);
    set_source(ctx, style.color.contrasting());
    ctx.set_line_width((size as f64 * 0.08).max(1.0));
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.stroke_preserve()?;

    set_source(ctx, style.color);
    ctx.fill()?;

    ctx.restore()?;
    Ok(())
}

/// Applies the font at `size` pixels and returns the ink extents.
fn measure(layout: &pango::Layout, font: &FontDescriptor, size: u32) -> TextExtents {
    layout.set_font_description(Some(&font.description(size)));
    let (ink, _logical) = layout.pixel_extents();
    TextExtents {
        x: ink.x() as f64,
        y: ink.y() as f64,
        width: ink.width() as f64,
        height: ink.height() as f64,
    }
}

fn set_source(ctx: &cairo::Context, color: Color) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
}
