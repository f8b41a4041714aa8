//! Chart theme shared by every renderer.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const FIREBRICK: RGBColor = RGBColor(178, 34, 34);
pub const DARK_GREEN: RGBColor = RGBColor(0, 100, 0);
pub const TEAL: RGBColor = RGBColor(0, 128, 128);
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const LIGHT_STEEL: RGBColor = RGBColor(169, 205, 225);
pub const DARK_GRAY: RGBColor = RGBColor(64, 64, 64);
const GRID_GRAY: RGBColor = RGBColor(234, 234, 242);

/// Muted qualitative palette for category hues.
const MUTED: [RGBColor; 10] = [
    RGBColor(72, 120, 208),
    RGBColor(238, 133, 74),
    RGBColor(106, 204, 100),
    RGBColor(214, 95, 95),
    RGBColor(149, 108, 180),
    RGBColor(140, 97, 60),
    RGBColor(220, 126, 192),
    RGBColor(121, 121, 121),
    RGBColor(213, 187, 103),
    RGBColor(130, 198, 226),
];

/// Viridis stops, dark to light.
const VIRIDIS: [RGBColor; 10] = [
    RGBColor(68, 1, 84),
    RGBColor(72, 40, 120),
    RGBColor(62, 73, 137),
    RGBColor(49, 104, 142),
    RGBColor(38, 130, 142),
    RGBColor(31, 158, 137),
    RGBColor(53, 183, 121),
    RGBColor(109, 205, 89),
    RGBColor(180, 222, 44),
    RGBColor(253, 231, 37),
];

/// Fonts, colors and marker sizes passed explicitly to each chart.
#[derive(Debug, Clone)]
pub struct Theme {
    pub font_family: String,
    pub title_size: f64,
    pub axis_label_size: f64,
    pub tick_label_size: f64,
    pub annotation_size: f64,
    pub background: RGBColor,
    pub grid_color: RGBColor,
    /// Category hues for scatter charts.
    pub palette: Vec<RGBColor>,
    /// Sequential hues, sampled evenly across categories.
    pub sequential: Vec<RGBColor>,
    pub point_color: RGBColor,
    pub point_radius: u32,
    pub violin_fill: RGBColor,
    pub median_color: RGBColor,
    pub high_color: RGBColor,
    pub low_color: RGBColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            title_size: 24.0,
            axis_label_size: 18.0,
            tick_label_size: 14.0,
            annotation_size: 13.0,
            background: WHITE,
            grid_color: GRID_GRAY,
            palette: MUTED.to_vec(),
            sequential: VIRIDIS.to_vec(),
            point_color: DARK_GRAY,
            point_radius: 4,
            violin_fill: LIGHT_STEEL,
            median_color: BLACK,
            high_color: FIREBRICK,
            low_color: DARK_GREEN,
        }
    }
}

impl Theme {
    pub fn title_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.title_size)
            .into_font()
            .style(FontStyle::Bold)
    }

    pub fn axis_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.axis_label_size).into_font()
    }

    pub fn tick_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.tick_label_size).into_font()
    }

    /// Centered annotation text anchored at `vpos`.
    pub fn annotation_style(&self, color: &RGBColor, bold: bool, vpos: VPos) -> TextStyle<'_> {
        let font = (self.font_family.as_str(), self.annotation_size).into_font();
        let font = if bold {
            font.style(FontStyle::Bold)
        } else {
            font
        };
        font.color(color).pos(Pos::new(HPos::Center, vpos))
    }

    /// Qualitative color for the `idx`-th category.
    pub fn category_color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            return BLACK;
        }
        self.palette[idx % self.palette.len()]
    }

    /// Sequential color for the `idx`-th of `count` categories.
    pub fn sequential_color(&self, idx: usize, count: usize) -> RGBColor {
        match self.sequential.len() {
            0 => BLACK,
            1 => self.sequential[0],
            len if count <= 1 => self.sequential[len / 2],
            len => {
                let pos = idx as f64 / (count - 1) as f64 * (len - 1) as f64;
                self.sequential[(pos.round() as usize).min(len - 1)]
            }
        }
    }
}
