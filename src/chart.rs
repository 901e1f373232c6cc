//! Per-year chart series and their bitmap rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use tempfile::Builder;
use tracing::debug;

use crate::error::{QuakeError, Result};
use crate::output::parent_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    /// Bar chart of earthquake counts per year.
    Frequency,
    /// Line chart of mean magnitude per year.
    Magnitude,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Frequency, ChartKind::Magnitude];

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Frequency => "earthquake_frequency.png",
            ChartKind::Magnitude => "earthquake_magnitude.png",
        }
    }
}

/// Everything needed to draw one chart. Points are ascending by year and
/// `labels[i]` annotates `points[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(i32, f64)>,
    pub labels: Vec<String>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn year_range(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    fn value_range(&self) -> (f64, f64) {
        let max = self.points.iter().map(|p| p.1).fold(f64::MIN, f64::max);
        let min = self.points.iter().map(|p| p.1).fold(0.0, f64::min);
        let top = if max > 0.0 { max * 1.15 } else { 1.0 };
        (min, top)
    }
}

pub fn frequency_series(counts: &BTreeMap<i32, usize>) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Frequency,
        title: "Earthquake Frequency per Year".to_string(),
        x_label: "Year".to_string(),
        y_label: "Number of Earthquakes".to_string(),
        points: counts.iter().map(|(y, c)| (*y, *c as f64)).collect(),
        labels: counts.values().map(|c| c.to_string()).collect(),
    }
}

pub fn magnitude_series(means: &BTreeMap<i32, f64>) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Magnitude,
        title: "Average Earthquake Magnitude per Year".to_string(),
        x_label: "Year".to_string(),
        y_label: "Average Magnitude".to_string(),
        points: means.iter().map(|(y, m)| (*y, *m)).collect(),
        labels: means.values().map(|m| format!("{m:.2}")).collect(),
    }
}

/// Writes a chart image for a series.
pub trait ChartRenderer {
    fn render(&self, series: &ChartSeries, path: &Path) -> Result<()>;
}

impl<T: ChartRenderer + ?Sized> ChartRenderer for &T {
    fn render(&self, series: &ChartSeries, path: &Path) -> Result<()> {
        (**self).render(series, path)
    }
}

/// PNG renderer backed by plotters' bitmap backend.
#[derive(Debug, Clone, Copy)]
pub struct BitmapRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for BitmapRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 720,
        }
    }
}

impl ChartRenderer for BitmapRenderer {
    #[tracing::instrument(skip_all, fields(kind = ?series.kind, path = %path.display()))]
    fn render(&self, series: &ChartSeries, path: &Path) -> Result<()> {
        if series.is_empty() {
            return Err(QuakeError::chart(path, "series has no points"));
        }

        // Render next to the target and rename, so a failed draw leaves no
        // half-written image behind. The suffix keeps the PNG encoder selected.
        let dir = parent_dir(path);
        std::fs::create_dir_all(dir).map_err(|e| QuakeError::io(dir, e))?;
        let tmp = Builder::new()
            .prefix(".chart")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| QuakeError::io(dir, e))?;

        {
            let root =
                BitMapBackend::new(tmp.path(), (self.width, self.height)).into_drawing_area();
            draw(&root, series).map_err(|e| QuakeError::chart(path, e))?;
            root.present().map_err(|e| QuakeError::chart(path, e))?;
        }

        tmp.persist(path).map_err(|e| QuakeError::io(path, e.error))?;
        debug!(points = series.points.len(), "Chart written");
        Ok(())
    }
}

fn tick_label(years: &BTreeSet<i32>, value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::Exact(y) | SegmentValue::CenterOf(y) if years.contains(y) => y.to_string(),
        _ => String::new(),
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &ChartSeries,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let Some((first, last)) = series.year_range() else {
        return Ok(());
    };
    let (y_min, y_max) = series.value_range();

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&series.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(70)
        .build_cartesian_2d((first..last).into_segmented(), y_min..y_max)?;

    // One key point per year in the span; only years with data get text.
    let years: BTreeSet<i32> = series.points.iter().map(|p| p.0).collect();
    let span = (last - first) as usize + 1;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .label_style(("sans-serif", 14))
        .x_labels(span)
        .x_label_formatter(&|v| tick_label(&years, v))
        .x_label_style(
            ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(series.x_label.as_str())
        .y_desc(series.y_label.as_str())
        .draw()?;

    match series.kind {
        ChartKind::Frequency => {
            chart.draw_series(
                Histogram::vertical(&chart)
                    .style(RGBColor(70, 130, 180).filled())
                    .margin(6)
                    .data(series.points.iter().copied()),
            )?;
        }
        ChartKind::Magnitude => {
            let line = RGBColor(220, 20, 60);
            chart.draw_series(LineSeries::new(
                series
                    .points
                    .iter()
                    .map(|&(year, mean)| (SegmentValue::CenterOf(year), mean)),
                line.stroke_width(2),
            ))?;
            chart.draw_series(series.points.iter().map(|&(year, mean)| {
                Circle::new((SegmentValue::CenterOf(year), mean), 4, line.filled())
            }))?;
        }
    }

    let label_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(series.points.iter().zip(&series.labels).map(
        |(&(year, value), label)| {
            Text::new(
                label.clone(),
                (SegmentValue::CenterOf(year), value),
                label_style.clone(),
            )
        },
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_series_is_ordered_and_labeled() {
        let counts = BTreeMap::from([(2003, 7), (2001, 2), (2002, 0)]);
        let series = frequency_series(&counts);

        assert_eq!(series.kind, ChartKind::Frequency);
        assert_eq!(series.points, vec![(2001, 2.0), (2002, 0.0), (2003, 7.0)]);
        assert_eq!(series.labels, vec!["2", "0", "7"]);
        assert_eq!(series.x_label, "Year");
    }

    #[test]
    fn test_magnitude_series_labels_two_decimals() {
        let means = BTreeMap::from([(2010, 1.0), (2009, 2.0 / 3.0)]);
        let series = magnitude_series(&means);

        assert_eq!(series.kind, ChartKind::Magnitude);
        assert_eq!(series.points[0].0, 2009);
        assert_eq!(series.points[1], (2010, 1.0));
        assert_eq!(series.labels, vec!["0.67", "1.00"]);
    }

    #[test]
    fn test_value_range_has_headroom() {
        let series = frequency_series(&BTreeMap::from([(2000, 10)]));
        let (min, max) = series.value_range();
        assert_eq!(min, 0.0);
        assert!(max > 10.0);
    }

    #[test]
    fn test_value_range_of_all_zero_series() {
        let series = magnitude_series(&BTreeMap::from([(2000, 0.0)]));
        assert_eq!(series.value_range(), (0.0, 1.0));
    }

    #[test]
    fn test_file_names_are_distinct() {
        assert_ne!(
            ChartKind::Frequency.file_name(),
            ChartKind::Magnitude.file_name()
        );
    }

    #[test]
    fn test_tick_label_only_for_years_with_data() {
        let years = BTreeSet::from([2000, 2002, 2008]);
        assert_eq!(tick_label(&years, &SegmentValue::CenterOf(2000)), "2000");
        assert_eq!(tick_label(&years, &SegmentValue::Exact(2002)), "2002");
        assert_eq!(tick_label(&years, &SegmentValue::CenterOf(2008)), "2008");
        assert_eq!(tick_label(&years, &SegmentValue::CenterOf(2005)), "");
        assert_eq!(tick_label(&years, &SegmentValue::Last), "");
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with(".chart")
            })
            .count()
    }

    #[test]
    fn test_render_frequency_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ChartKind::Frequency.file_name());
        let series = frequency_series(&BTreeMap::from([(2000, 2), (2002, 3), (2008, 3)]));

        BitmapRenderer::default().render(&series, &path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[test]
    fn test_render_single_year_magnitude_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ChartKind::Magnitude.file_name());
        let series = magnitude_series(&BTreeMap::from([(2008, 3.9)]));

        BitmapRenderer::default().render(&series, &path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[test]
    fn test_render_rejects_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ChartKind::Frequency.file_name());
        let series = frequency_series(&BTreeMap::new());

        let err = BitmapRenderer::default().render(&series, &path).unwrap_err();
        assert!(matches!(err, QuakeError::Chart { .. }));
        assert!(!path.exists());
    }
}
