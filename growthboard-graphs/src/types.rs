//! Shared graph configuration types

/// Rendering options shared by every chart
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Chart title drawn as the caption
    pub title: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Background color (hex format)
    pub background_color: String,

    /// Font family for captions and labels
    pub font_family: String,

    /// Base font size for axis labels
    pub font_size: u32,

    /// Whether to draw grid lines
    pub show_grid: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 900,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            show_grid: true,
        }
    }
}

impl GraphConfig {
    /// Replace the chart title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.width, 900);
        assert_eq!(config.height, 600);
        assert_eq!(config.background_color, "#FFFFFF");
        assert!(config.show_grid);
    }

    #[test]
    fn test_with_title() {
        let config = GraphConfig::default().with_title("Top Schools");
        assert_eq!(config.title, "Top Schools");
    }
}
