use crate::core::{Color, Figure, Layer, Panel, Style, XAxis};

pub fn figure() -> FigureBuilder {
    FigureBuilder {
        fig: Figure::default(),
    }
}

pub struct FigureBuilder {
    fig: Figure,
}

impl FigureBuilder {
    /// Set the number of panels per row
    pub fn columns(mut self, cols: usize) -> Self {
        self.fig.columns = cols.max(1);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.fig.title = Some(title.into());
        self
    }

    pub fn add_panel<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PanelBuilder) -> PanelBuilder,
    {
        let b = f(PanelBuilder::new());
        self.fig.panels.push(b.panel);
        self
    }

    pub fn push_panel(mut self, panel: Panel) -> Self {
        self.fig.panels.push(panel);
        self
    }

    /// Get the built Figure without showing it
    pub fn build(self) -> Figure {
        self.fig
    }
}

/* -------------------- PANEL BUILDER -------------------- */

pub struct PanelBuilder {
    panel: Panel,
}

impl PanelBuilder {
    pub fn new() -> Self {
        Self {
            panel: Panel::new(),
        }
    }

    /// Switch the x axis to evenly spaced slots, one per tick label
    pub fn categorical(mut self, ticks: Vec<impl Into<String>>, rotation: f32) -> Self {
        self.panel.x_axis = XAxis::Categorical {
            ticks: ticks.into_iter().map(Into::into).collect(),
            rotation,
        };
        self
    }

    /// Count bars, one per slot
    pub fn bars(mut self, heights: Vec<f32>, colors: Vec<Color>, edge: impl Into<Option<Style>>) -> Self {
        self.panel.layers.push(Layer::Bars {
            heights,
            colors,
            edge: edge.into(),
            width: 0.8,
        });
        self
    }

    /// Histogram bars between consecutive `edges`
    pub fn histogram(
        mut self,
        edges: Vec<f32>,
        heights: Vec<f32>,
        style: Style,
        edge: impl Into<Option<Style>>,
    ) -> Self {
        self.panel.layers.push(Layer::Histogram {
            edges,
            heights,
            style,
            edge: edge.into(),
        });
        self
    }

    pub fn curve(mut self, xy: Vec<[f32; 2]>, style: Style) -> Self {
        self.panel.layers.push(Layer::Curve {
            xy,
            style,
            label: None,
        });
        self
    }

    /// Vertical marker line
    pub fn vline(mut self, x: f32, style: Style, label: impl Into<Option<String>>) -> Self {
        self.panel.layers.push(Layer::VLine {
            x,
            style,
            label: label.into(),
        });
        self
    }

    /// Shaded region; `x_start = None` starts at the left edge of the axis
    pub fn zone(
        mut self,
        x_start: Option<f32>,
        x_end: f32,
        height_fraction: f32,
        style: Style,
        label: impl Into<Option<String>>,
    ) -> Self {
        self.panel.layers.push(Layer::Zone {
            x_start,
            x_end,
            height_fraction,
            style,
            label: label.into(),
        });
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.panel.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.panel.y_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.panel.meta.title = Some(title.into());
        self
    }

    /// Whether any layer added so far carries a legend label
    pub fn has_legend_entries(&self) -> bool {
        self.panel.layers.iter().any(|l| l.label().is_some())
    }

    pub fn legend(mut self, show: bool) -> Self {
        self.panel.legend = show;
        self
    }

    pub fn build(self) -> Panel {
        self.panel
    }
}

impl Default for PanelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Allow passing &Style into the `impl Into<Option<Style>>` slot.
impl From<&Style> for Option<Style> {
    #[inline]
    fn from(s: &Style) -> Self {
        Some(*s)
    }
}
