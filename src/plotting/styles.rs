use plotters::style::{RGBAColor, RGBColor};

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Smoothed commit curve
    pub line_color: RGBColor,
    /// Raw weekly commit counts
    pub point_color: RGBColor,
    pub additions_color: RGBColor,
    pub deletions_color: RGBColor,
    /// Colours cycled through for per-contributor bars and pie slices
    pub palette: Vec<RGBColor>,
}

impl ChartTheme {
    /// Palette colour for the `index`-th contributor.
    pub fn series_color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            return self.line_color;
        }
        self.palette[index % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBColor(255, 255, 255),
            text_color: RGBAColor(0, 0, 0, 0.85),
            grid_color: RGBAColor(0, 0, 0, 0.1),
            axis_color: RGBAColor(0, 0, 0, 0.8),
            line_color: RGBColor(31, 119, 180),
            point_color: RGBColor(214, 39, 40),
            additions_color: RGBColor(44, 160, 44),
            deletions_color: RGBColor(214, 39, 40),
            palette: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    pub point_size: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Lower bound on the top of the commit-count axis
    pub min_commit_axis: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            line_width: 2,
            point_size: 4,
            font_size: 15,
            caption_size: 24,
            margin: 15,
            label_area_size: 60,
            min_commit_axis: 60.0,
        }
    }
}
