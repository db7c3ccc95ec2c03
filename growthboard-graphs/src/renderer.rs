//! Graph rendering trait and PNG backends

use crate::GraphConfig;
use growthboard_common::{GrowthboardError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Parse a color string (hex format) to RGBColor
///
/// Falls back to black for anything that does not parse.
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

/// Trait for chart renderers drawing onto a plotters backend
///
/// Renderers implement [`GraphRenderer::draw`]; file and in-memory PNG
/// output come from the provided methods.
pub trait GraphRenderer {
    /// Draw the chart onto a drawing area
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static;

    /// Render the chart to a PNG file
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root =
            BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.draw(&root, config)?;
        root.present()?;
        tracing::info!(path = %path.display(), "rendered chart");
        Ok(())
    }

    /// Render the chart to an in-memory PNG buffer
    fn render_to_bytes(&self, config: &GraphConfig) -> Result<Vec<u8>> {
        let mut pixels = vec![0u8; (config.width * config.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (config.width, config.height))
                .into_drawing_area();
            self.draw(&root, config)?;
            root.present()?;
        }

        let image = image::RgbImage::from_raw(config.width, config.height, pixels)
            .ok_or_else(|| GrowthboardError::graph("Pixel buffer size mismatch"))?;
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageFormat::Png)
            .map_err(|e| GrowthboardError::graph_with_source("Failed to encode PNG", e))?;
        Ok(bytes.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_colors() {
        assert_eq!(parse_color("#FF0000"), RGBColor(255, 0, 0));
        assert_eq!(parse_color("#00FF00"), RGBColor(0, 255, 0));
        assert_eq!(parse_color("#0000FF"), RGBColor(0, 0, 255));
        assert_eq!(parse_color("#abc123"), RGBColor(171, 193, 35));
    }

    #[test]
    fn test_parse_invalid_colors_default_to_black() {
        assert_eq!(parse_color("white"), RGBColor(0, 0, 0));
        assert_eq!(parse_color("#ZZ0000"), RGBColor(0, 0, 0));
        assert_eq!(parse_color("#FFF"), RGBColor(0, 0, 0));
        assert_eq!(parse_color(""), RGBColor(0, 0, 0));
    }

    struct FillOnly;

    impl GraphRenderer for FillOnly {
        fn draw<DB: DrawingBackend>(
            &self,
            root: &DrawingArea<DB, Shift>,
            config: &GraphConfig,
        ) -> Result<()>
        where
            DB::ErrorType: std::error::Error + Send + Sync + 'static,
        {
            root.fill(&parse_color(&config.background_color))?;
            Ok(())
        }
    }

    #[test]
    fn test_render_to_bytes_produces_png() {
        let config = GraphConfig {
            width: 64,
            height: 48,
            ..Default::default()
        };
        let bytes = FillOnly.render_to_bytes(&config).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_render_to_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fill.png");
        let config = GraphConfig {
            width: 64,
            height: 48,
            ..Default::default()
        };
        FillOnly.render_to_file(&config, &path).unwrap();
        assert!(path.exists());
    }
}
