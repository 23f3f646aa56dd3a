use serde::{Deserialize, Serialize};

/// Common metadata for all panels
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotMeta {
    /// Title displayed at the top of the panel
    pub title: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Weighted so that `t = 0` and `t = 1` return the endpoints exactly.
    fn lerp(self, other: Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const ORANGE: Self = Self::rgb(1.0, 0.647, 0.0);
    pub const SKYBLUE: Self = Self::rgb(0.529, 0.808, 0.922);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::srgba(c.r, c.g, c.b, c.a)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    pub size: f32,    // line width / edge width
    pub opacity: f32, // multiplied into alpha
    pub line: LineKind,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 2.0,
            opacity: 1.0,
            line: LineKind::Solid,
        }
    }
}

impl Style {
    #[inline]
    pub const fn color(mut self, c: Color) -> Self {
        self.color = c;
        self
    }

    #[inline]
    pub const fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[inline]
    pub const fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[inline]
    pub const fn dashed(mut self) -> Self {
        self.line = LineKind::Dashed;
        self
    }

    /// Final fill color with opacity folded into alpha.
    pub fn resolved(&self) -> Color {
        self.color.with_a(self.color.a * self.opacity)
    }
}

/// Palettes used for count plot bars.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum Colormap {
    #[default]
    Viridis,
    /// Qualitative eight-color palette, cycled.
    Set2,
}

const VIRIDIS: [Color; 5] = [
    Color::rgb(0.267, 0.005, 0.329),
    Color::rgb(0.229, 0.322, 0.546),
    Color::rgb(0.128, 0.567, 0.551),
    Color::rgb(0.369, 0.789, 0.383),
    Color::rgb(0.993, 0.906, 0.144),
];

const SET2: [Color; 8] = [
    Color::rgb(0.400, 0.761, 0.647),
    Color::rgb(0.988, 0.553, 0.384),
    Color::rgb(0.553, 0.627, 0.796),
    Color::rgb(0.906, 0.541, 0.765),
    Color::rgb(0.651, 0.847, 0.329),
    Color::rgb(1.000, 0.851, 0.184),
    Color::rgb(0.898, 0.769, 0.580),
    Color::rgb(0.702, 0.702, 0.702),
];

impl Colormap {
    /// Map value in [0, 1] to a color
    pub fn sample(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Viridis => {
                let scaled = t * (VIRIDIS.len() - 1) as f32;
                let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
                VIRIDIS[i].lerp(VIRIDIS[i + 1], scaled - i as f32)
            }
            Colormap::Set2 => SET2[((t * SET2.len() as f32) as usize).min(SET2.len() - 1)],
        }
    }

    /// `n` colors for `n` bars. Continuous maps skip both extremes.
    pub fn palette(&self, n: usize) -> Vec<Color> {
        match self {
            Colormap::Viridis => (0..n)
                .map(|i| self.sample((i + 1) as f32 / (n + 1) as f32))
                .collect(),
            Colormap::Set2 => (0..n).map(|i| SET2[i % SET2.len()]).collect(),
        }
    }
}

/// How the x axis maps data to screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum XAxis {
    Continuous,
    /// One evenly spaced slot per tick, slot `i` centered at `x = i`.
    Categorical {
        ticks: Vec<String>,
        /// Tick label rotation in degrees, counter-clockwise.
        rotation: f32,
    },
}

impl Default for XAxis {
    fn default() -> Self {
        Self::Continuous
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    /// Count bars at slots `0..heights.len()`.
    Bars {
        heights: Vec<f32>,
        colors: Vec<Color>,
        edge: Option<Style>,
        /// Bar width in slot units.
        width: f32,
    },
    /// Bars spanning `edges[i]..edges[i + 1]`.
    Histogram {
        edges: Vec<f32>,
        heights: Vec<f32>,
        style: Style,
        edge: Option<Style>,
    },
    Curve {
        xy: Vec<[f32; 2]>,
        style: Style,
        label: Option<String>,
    },
    /// Vertical marker spanning the whole plot height.
    VLine {
        x: f32,
        style: Style,
        label: Option<String>,
    },
    /// Filled rectangle from `y = 0` to `height_fraction` of the axis top.
    /// A missing start extends the zone to the left edge of the axis.
    Zone {
        x_start: Option<f32>,
        x_end: f32,
        height_fraction: f32,
        style: Style,
        label: Option<String>,
    },
}

impl Layer {
    pub fn label(&self) -> Option<&str> {
        match self {
            Layer::Curve { label, .. } | Layer::VLine { label, .. } | Layer::Zone { label, .. } => {
                label.as_deref()
            }
            Layer::Bars { .. } | Layer::Histogram { .. } => None,
        }
    }

    pub fn style(&self) -> Option<&Style> {
        match self {
            Layer::Histogram { style, .. }
            | Layer::Curve { style, .. }
            | Layer::VLine { style, .. }
            | Layer::Zone { style, .. } => Some(style),
            Layer::Bars { .. } => None,
        }
    }
}

/// Data extent of a panel: `([x_min, y_min], [x_max, y_max])`.
pub type Bounds = ([f32; 2], [f32; 2]);

/// One axis of the figure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub meta: PlotMeta,
    pub x_axis: XAxis,
    pub layers: Vec<Layer>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend: bool,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Labeled layers in drawing order, for the legend.
    pub fn legend_entries(&self) -> Vec<(&str, Style)> {
        self.layers
            .iter()
            .filter_map(|l| Some((l.label()?, *l.style()?)))
            .collect()
    }

    /// Extent covering every layer. The y range always starts at zero and
    /// gets 5% headroom; zones and markers only widen the x range.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = 0.0f32;
        let mut any = false;

        let mut see_x = |x: f32| {
            if x.is_finite() {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
            }
        };

        for layer in &self.layers {
            match layer {
                Layer::Bars { heights, width, .. } => {
                    if !heights.is_empty() {
                        see_x(-width * 0.5);
                        see_x(heights.len() as f32 - 1.0 + width * 0.5);
                        max_y = heights.iter().copied().fold(max_y, f32::max);
                        any = true;
                    }
                }
                Layer::Histogram { edges, heights, .. } => {
                    for &e in edges {
                        see_x(e);
                    }
                    max_y = heights.iter().copied().fold(max_y, f32::max);
                    any |= !heights.is_empty();
                }
                Layer::Curve { xy, .. } => {
                    for p in xy {
                        see_x(p[0]);
                        if p[1].is_finite() {
                            max_y = max_y.max(p[1]);
                        }
                    }
                    any |= !xy.is_empty();
                }
                Layer::VLine { x, .. } => see_x(*x),
                Layer::Zone { x_start, x_end, .. } => {
                    if let Some(s) = x_start {
                        see_x(*s);
                    }
                    see_x(*x_end);
                }
            }
        }

        if let XAxis::Categorical { ticks, .. } = &self.x_axis {
            if !ticks.is_empty() {
                see_x(-0.5);
                see_x(ticks.len() as f32 - 0.5);
                any = true;
            }
        }

        if !any || !min_x.is_finite() || !max_x.is_finite() {
            return None;
        }
        if max_x - min_x < f32::EPSILON {
            min_x -= 0.5;
            max_x += 0.5;
        }
        let max_y = if max_y > 0.0 { max_y * 1.05 } else { 1.0 };
        Some(([min_x, 0.0], [max_x, max_y]))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub background: Color,
    /// Panels per row
    pub columns: usize,
    pub panels: Vec<Panel>,
}

impl Default for Figure {
    fn default() -> Self {
        Self {
            title: None,
            background: Color::WHITE,
            columns: 2,
            panels: vec![],
        }
    }
}

impl Figure {
    /// `(columns, rows)` of the panel grid.
    pub fn grid(&self) -> (usize, usize) {
        let cols = self.columns.max(1);
        (cols, self.panels.len().div_ceil(cols))
    }
}
