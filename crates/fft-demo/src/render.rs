//! Presentation of a run: the `Renderer` capability and its implementations.
//!
//! The kernel knows nothing about output; front ends implement [`Renderer`]
//! for whatever surface they draw on. Three are provided:
//! - [`TerminalRenderer`]: section headers, sample rows and metric lines
//! - [`ChartRenderer`]: SVG line charts drawn with `plotters`
//! - [`CsvRenderer`]: raw vs smoothed series as CSV

use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;

use anyhow::Result;
use fft_kernel::{Evaluation, SignalTable};
use plotters::coord::Shift;
use plotters::prelude::*;

pub const TITLE: &str = "Future Forecast Tokens (FFT) - Minimal Demo";

/// Caption of the overlay chart.
pub const OVERLAY_CAPTION: &str = "FFT Stabilization Effect";

/// Rows shown by the terminal previews.
const PREVIEW_ROWS: usize = 5;

/// What a renderer receives for one run.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub table: &'a SignalTable,
    /// Number of leading agents to chart
    pub displayed_agents: usize,
    pub focus_agent: usize,
    pub original: &'a [f64],
    pub smoothed: &'a [f64],
    pub evaluation: &'a Evaluation,
}

/// Draws series and metrics somewhere.
pub trait Renderer {
    fn render(&mut self, view: &RenderView<'_>) -> Result<()>;
}

/// Text renderer mirroring the sections of the original page.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &RenderView<'_>) -> Result<()> {
        writeln!(self.out, "{}", TITLE)?;
        writeln!(self.out, "{}", "=".repeat(TITLE.len()))?;

        writeln!(self.out, "\n1. Simulating Chaotic System")?;
        writeln!(
            self.out,
            "{} agents x {} steps",
            view.table.agent_count(),
            view.table.step_count()
        )?;
        let shown = view.displayed_agents.min(view.table.agent_count());
        write!(self.out, "  {:>25}", "timestamp")?;
        for agent in 0..shown {
            write!(self.out, " {:>10}", SignalTable::agent_label(agent))?;
        }
        writeln!(self.out)?;
        for (step, ts) in view.table.timestamps().iter().take(PREVIEW_ROWS).enumerate() {
            write!(self.out, "  {:>25}", ts.to_rfc3339())?;
            let row = view.table.row(step).unwrap_or_default();
            for value in row.iter().take(shown) {
                write!(self.out, " {:>10.4}", value)?;
            }
            writeln!(self.out)?;
        }

        writeln!(self.out, "\n2. Applying FFT Stabilization")?;
        writeln!(
            self.out,
            "Resilience Before FFT: {:.3}",
            view.evaluation.resilience_before
        )?;
        writeln!(
            self.out,
            "Resilience After FFT: {:.3}",
            view.evaluation.resilience_after
        )?;
        writeln!(
            self.out,
            "Error Reduction (%): {:.1}%",
            view.evaluation.error_reduction_percent()
        )?;

        writeln!(
            self.out,
            "\n3. Visualization: {} ({})",
            OVERLAY_CAPTION,
            SignalTable::agent_label(view.focus_agent)
        )?;
        writeln!(
            self.out,
            "  {:>6} {:>16} {:>22}",
            "step", "Chaotic Signal", "FFT Stabilized Signal"
        )?;
        for (step, (original, smoothed)) in view
            .original
            .iter()
            .zip(view.smoothed)
            .take(PREVIEW_ROWS)
            .enumerate()
        {
            writeln!(self.out, "  {:>6} {:>16.4} {:>22.4}", step, original, smoothed)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Writes the agent chart and the stabilization overlay to an SVG file.
pub struct ChartRenderer {
    path: PathBuf,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: (1200, 900),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width.max(200), height.max(200));
        self
    }
}

impl Renderer for ChartRenderer {
    fn render(&mut self, view: &RenderView<'_>) -> Result<()> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        draw_charts(&root, view)?;
        root.present()?;
        Ok(())
    }
}

/// Render both charts into an in-memory SVG document.
pub fn render_svg(view: &RenderView<'_>, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_charts(&root, view)?;
        root.present()?;
    }
    Ok(svg)
}

/// Y range covering every series, padded so flat lines stay visible.
fn value_range<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Range<f64> {
    let (min, max) = series
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return -1.0..1.0;
    }
    let pad = if max - min < 1e-9 { 1.0 } else { (max - min) * 0.05 };
    (min - pad)..(max + pad)
}

fn points(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v))
}

/// Draw the raw agent chart above the raw vs smoothed overlay.
pub fn draw_charts<DB>(root: &DrawingArea<DB, Shift>, view: &RenderView<'_>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));
    let x_max = view.table.step_count().saturating_sub(1).max(1) as f64;

    let shown: Vec<(usize, &[f64])> = view.table.iter().take(view.displayed_agents).collect();
    let mut agents_chart = ChartBuilder::on(&panels[0])
        .caption("Simulated Agent Signals", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, value_range(shown.iter().map(|(_, s)| *s)))?;

    agents_chart
        .configure_mesh()
        .x_desc("Time Steps")
        .y_desc("Signal Value")
        .draw()?;

    for &(agent, values) in &shown {
        let color = Palette99::pick(agent).to_rgba();
        agents_chart
            .draw_series(LineSeries::new(points(values), &color))?
            .label(SignalTable::agent_label(agent))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    agents_chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    let mut overlay = ChartBuilder::on(&panels[1])
        .caption(
            format!(
                "{} ({})",
                OVERLAY_CAPTION,
                SignalTable::agent_label(view.focus_agent)
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, value_range([view.original, view.smoothed]))?;

    overlay
        .configure_mesh()
        .x_desc("Time Steps")
        .y_desc("Signal Value")
        .draw()?;

    let faded = BLUE.mix(0.4);
    overlay
        .draw_series(LineSeries::new(points(view.original), &faded))?
        .label("Chaotic Signal")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], faded));
    overlay
        .draw_series(LineSeries::new(points(view.smoothed), RED.stroke_width(2)))?
        .label("FFT Stabilized Signal")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    overlay
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Writes `step,timestamp,original,smoothed` rows for the focus agent.
pub struct CsvRenderer<W: Write> {
    out: W,
}

impl<W: Write> CsvRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for CsvRenderer<W> {
    fn render(&mut self, view: &RenderView<'_>) -> Result<()> {
        writeln!(self.out, "step,timestamp,original,smoothed")?;
        for (step, ((ts, original), smoothed)) in view
            .table
            .timestamps()
            .iter()
            .zip(view.original)
            .zip(view.smoothed)
            .enumerate()
        {
            writeln!(
                self.out,
                "{},{},{:.6},{:.6}",
                step,
                ts.to_rfc3339(),
                original,
                smoothed
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Write the whole table as `timestamp,Agent_0,...` CSV.
pub fn write_table_csv<W: Write>(table: &SignalTable, mut out: W) -> Result<()> {
    let header: Vec<String> = (0..table.agent_count())
        .map(SignalTable::agent_label)
        .collect();
    writeln!(out, "timestamp,{}", header.join(","))?;

    for (step, ts) in table.timestamps().iter().enumerate() {
        let row = table.row(step).unwrap_or_default();
        let cells: Vec<String> = row.iter().map(|v| format!("{:.6}", v)).collect();
        writeln!(out, "{},{}", ts.to_rfc3339(), cells.join(","))?;
    }
    out.flush()?;
    Ok(())
}
