//! Figure rendering
//!
//! A [`Figure`] is a plain description of what to draw: panels, their axis
//! labels and the line series in each. It is built from trajectories without
//! touching any drawing surface, then persisted with [`Figure::save`]. The
//! output format follows the file extension.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Palette;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SimError};
use crate::grid::TimeGrid;
use crate::trajectory::Trajectory;

/// Title of the first panel of a sweep figure
pub const EQUATION_TITLE: &str = "x'' - mu (1 - x^2) x' + x = 0";

const FONT: &str = "sans-serif";

/// Panel layout of a sweep figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum RenderMode {
    /// (t, x), (t, p) and the (x, p) phase portrait side by side
    #[default]
    #[serde(rename = "multi")]
    #[value(name = "multi")]
    MultiPanel,
    /// (t, x) only
    #[serde(rename = "single")]
    #[value(name = "single")]
    SinglePanel,
}

/// Artifact format, inferred from the output extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Bmp,
    Jpeg,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("png") => Ok(ImageFormat::Png),
            Some("bmp") => Ok(ImageFormat::Bmp),
            Some("jpg") | Some("jpeg") => Ok(ImageFormat::Jpeg),
            Some("svg") => Ok(ImageFormat::Svg),
            _ => Err(SimError::invalid(format!(
                "cannot infer image format of '{}' (use .png, .bmp, .jpg or .svg)",
                path.display()
            ))),
        }
    }
}

/// Color of the `index`-th series, stable across panels and runs
pub fn palette_color(index: usize) -> (u8, u8, u8) {
    Palette99::COLORS[index % Palette99::COLORS.len()]
}

/// One line in a panel
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend entry, if any
    pub label: Option<String>,
    pub color: (u8, u8, u8),
    pub points: Vec<(f64, f64)>,
}

/// One set of axes
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub legend: bool,
}

impl Panel {
    pub fn new(x_label: &str, y_label: &str) -> Self {
        Self {
            title: None,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
            legend: false,
        }
    }

    /// Padded `((x_min, x_max), (y_min, y_max))` covering every finite point
    ///
    /// An empty panel gets the unit square.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let points = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut x_range: Option<(f64, f64)> = None;
        let mut y_range: Option<(f64, f64)> = None;
        for &(x, y) in points {
            x_range = Some(x_range.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))));
            y_range = Some(y_range.map_or((y, y), |(lo, hi)| (lo.min(y), hi.max(y))));
        }

        (
            pad(x_range.unwrap_or((0.0, 1.0))),
            pad(y_range.unwrap_or((0.0, 1.0))),
        )
    }
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        (lo - 0.05 * span, hi + 0.05 * span)
    } else {
        let half = 0.5 * lo.abs().max(1.0);
        (lo - half, hi + half)
    }
}

/// Everything needed to draw one image
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Pixel size `(width, height)`
    pub size: (u32, u32),
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Figure of a parameter sweep
    ///
    /// Series follow the order of `trajectories`; the `i`-th trajectory is
    /// drawn with [`palette_color`]`(i)` in every panel. The legend keyed by
    /// mu lives on the first panel.
    pub fn sweep(mode: RenderMode, grid: &TimeGrid, trajectories: &[Trajectory]) -> Self {
        let t = grid.as_slice();

        let mut x_panel = Panel::new("t", "x");
        x_panel.title = Some(EQUATION_TITLE.to_string());
        x_panel.legend = true;

        let mut p_panel = Panel::new("t", "p");
        let mut phase_panel = Panel::new("x", "p");

        for (i, traj) in trajectories.iter().enumerate() {
            let color = palette_color(i);

            x_panel.series.push(Series {
                label: Some(traj.label()),
                color,
                points: t.iter().copied().zip(traj.positions()).collect(),
            });
            p_panel.series.push(Series {
                label: None,
                color,
                points: t.iter().copied().zip(traj.momenta()).collect(),
            });
            phase_panel.series.push(Series {
                label: None,
                color,
                points: traj.positions().zip(traj.momenta()).collect(),
            });
        }

        match mode {
            RenderMode::MultiPanel => Self {
                size: (1200, 400),
                panels: vec![x_panel, p_panel, phase_panel],
            },
            RenderMode::SinglePanel => Self {
                size: (800, 600),
                panels: vec![x_panel],
            },
        }
    }

    /// Single-panel figure of one curve
    pub fn function_plot(title: &str, x_label: &str, y_label: &str, points: Vec<(f64, f64)>) -> Self {
        let mut panel = Panel::new(x_label, y_label);
        panel.title = Some(title.to_string());
        panel.series.push(Series {
            label: None,
            color: (0, 128, 0),
            points,
        });

        Self {
            size: (800, 600),
            panels: vec![panel],
        }
    }

    /// Total number of series over all panels
    pub fn series_count(&self) -> usize {
        self.panels.iter().map(|p| p.series.len()).sum()
    }

    /// Draw the figure into `path`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the extension names no supported format
    /// - `OutputWriteFailure` if the parent directory is missing or the
    ///   backend fails to write
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        ensure_parent_dir(path)?;

        let drawn = match format {
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                self.draw(&root).map_err(|e| e.to_string())
            }
            ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Jpeg => {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                self.draw(&root).map_err(|e| e.to_string())
            }
        };

        drawn.map_err(|reason| SimError::write_failure(path, reason))
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<(), DB> {
        root.fill(&WHITE)?;

        let areas = root.split_evenly((1, self.panels.len().max(1)));
        for (area, panel) in areas.iter().zip(&self.panels) {
            draw_panel(area, panel)?;
        }

        root.present()?;
        Ok(())
    }
}

type DrawResult<T, DB> = std::result::Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> DrawResult<(), DB> {
    let ((x0, x1), (y0, y1)) = panel.bounds();

    let mut builder = ChartBuilder::on(area);
    builder.margin(12).x_label_area_size(40).y_label_area_size(50);
    if let Some(title) = &panel.title {
        builder.caption(title, (FONT, 18));
    }

    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;
    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .label_style((FONT, 14))
        .draw()?;

    for series in &panel.series {
        let (r, g, b) = series.color;
        let color = RGBColor(r, g, b);
        let drawn = chart.draw_series(LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(2),
        ))?;

        if let Some(label) = &series.label {
            drawn
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }
    }

    if panel.legend && panel.series.iter().any(|s| s.label.is_some()) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 14))
            .draw()?;
    }

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(SimError::write_failure(
            path,
            format!("directory '{}' does not exist", dir.display()),
        )),
        _ => Ok(()),
    }
}
