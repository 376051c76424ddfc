pub mod colors;

use crate::{
    catalog::Capacity,
    constants::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, FONT_SIZE, LABEL_PADDING},
    error::Result,
    placement::Placement,
};
use colors::{Colors, color_of, label_color};

use ab_glyph::{FontVec, PxScale};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};
use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size},
    rect::Rect,
};
use log::{debug, warn};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Draw region names when a system font is available
    pub labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
            labels: true,
        }
    }
}

/// Drawing context
pub struct Renderer {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
    pub font: Option<FontVec>,
}

impl Renderer {
    pub fn new(width: u32, height: u32, labels: bool) -> Self {
        let image = ImageBuffer::from_pixel(width, height, Colors::WHITE);
        let font = if labels { load_system_font() } else { None };
        Self {
            image,
            width,
            height,
            font,
        }
    }

    /// Filled rectangle, at least one pixel in each direction
    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb<u8>) {
        let rect = Rect::at(x as i32, y as i32)
            .of_size((width.round() as u32).max(1), (height.round() as u32).max(1));
        draw_filled_rect_mut(&mut self.image, rect, color);
    }

    pub fn draw_hline(&mut self, y: f64, color: Rgb<u8>) {
        draw_line_segment_mut(
            &mut self.image,
            (0.0, y as f32),
            (self.width as f32, y as f32),
            color,
        );
    }

    /// Draws `text` if a font is loaded and it fits inside the box
    pub fn draw_label(
        &mut self,
        x: f64,
        y: f64,
        max_width: f64,
        max_height: f64,
        text: &str,
        color: Rgb<u8>,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(FONT_SIZE as f32);
        let (text_w, text_h) = text_size(scale, font, text);
        if text_w as f64 + 2.0 * LABEL_PADDING > max_width
            || text_h as f64 + 2.0 * LABEL_PADDING > max_height
        {
            return;
        }
        draw_text_mut(
            &mut self.image,
            color,
            (x + LABEL_PADDING) as i32,
            (y + LABEL_PADDING) as i32,
            scale,
            font,
            text,
        );
    }

    /// Draws a placement inside the horizontal panel starting at `top`.
    /// Lanes are scaled by `max_width`, rows by the capacity.
    pub fn draw_placement(
        &mut self,
        placement: &Placement,
        capacity: Capacity,
        max_width: u64,
        top: f64,
        panel_height: f64,
    ) {
        let sx = self.width as f64 / max_width.max(1) as f64;
        let sy = panel_height / capacity.rows() as f64;

        for (index, region) in placement.iter().enumerate() {
            let color = color_of(&region.name, index);
            let x = region.x as f64 * sx;
            let y = top + region.y as f64 * sy;
            let w = region.width as f64 * sx;
            let h = region.height as f64 * sy;
            self.draw_rect(x, y, w, h, color);
            self.draw_label(x, y, w, h, &region.name, label_color(color));
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Load a system font for labels; `None` if nothing usable is installed
fn load_system_font() -> Option<FontVec> {
    let source = SystemSource::new();

    let font_families = [
        FamilyName::Title("Arial".to_string()),
        FamilyName::SansSerif,
        FamilyName::Title("Helvetica".to_string()),
        FamilyName::Title("DejaVu Sans".to_string()),
    ];

    for family in font_families {
        if let Ok(handle) = source.select_best_match(&[family], &Properties::new())
            && let Ok(font_kit_font) = handle.load()
            && let Some(font_bytes) = font_kit_font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(font_bytes.to_vec())
        {
            return Some(font);
        }
    }

    warn!("No system font found, region labels are skipped");
    None
}

/// Baseline in the top half, merged layout in the bottom half, both scaled to the
/// wider of the two layouts.
pub fn render_comparison<P: AsRef<Path>>(
    baseline: &Placement,
    merged: &Placement,
    capacity: Capacity,
    output_path: P,
    options: &RenderOptions,
) -> Result<()> {
    let mut renderer = Renderer::new(options.width, options.height, options.labels);
    let max_width = baseline.total_width().max(merged.total_width());
    let panel_height = (options.height / 2) as f64;

    renderer.draw_placement(baseline, capacity, max_width, 0.0, panel_height);
    renderer.draw_hline(panel_height - 1.0, Colors::BLACK);
    renderer.draw_placement(merged, capacity, max_width, panel_height, panel_height);

    renderer.save(&output_path)?;
    debug!("Rendered comparison to {}", output_path.as_ref().display());
    Ok(())
}

/// A single layout filling the whole image
pub fn render_placement<P: AsRef<Path>>(
    placement: &Placement,
    capacity: Capacity,
    max_width: u64,
    output_path: P,
    options: &RenderOptions,
) -> Result<()> {
    let mut renderer = Renderer::new(options.width, options.height, options.labels);
    renderer.draw_placement(
        placement,
        capacity,
        max_width.max(placement.total_width()),
        0.0,
        options.height as f64,
    );
    renderer.save(&output_path)?;
    debug!("Rendered {} to {}", placement.strategy, output_path.as_ref().display());
    Ok(())
}
