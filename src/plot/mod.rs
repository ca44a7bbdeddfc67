//! Figure catalog rendering.
//!
//! Every chart consumes finalized aggregate tables and writes one PNG and
//! one SVG file; no chart mutates its inputs. Rendering options live in an
//! explicit [`PlotConfig`] instead of process-wide state.

pub mod hexbin;

#[cfg(test)]
mod tests;

use crate::aggregate::{self, GenusDensity};
use crate::classify::{self, Category};
use crate::dataset::regions::BgcRegion;
use crate::dataset::Dataset;
use crate::run;
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use indoc::formatdoc;
use itertools::Itertools;
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

// ----------------------------------------------------------------------------
// Args
// ----------------------------------------------------------------------------

/// Arguments for rendering the figure catalog.
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct Args {
    /// Input directory containing the analysis tables.
    #[clap(short = 'i', long, required = true)]
    pub input_dir: PathBuf,

    /// Output directory for the figures.
    #[clap(short = 'o', long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Minimum combination count that escapes lumping.
    #[clap(long, default_value_t = classify::LUMP_THRESHOLD)]
    pub lump_threshold: usize,

    /// Figure width in pixels.
    #[clap(long, default_value_t = 1400)]
    pub width: u32,

    /// Figure height in pixels.
    #[clap(long, default_value_t = 900)]
    pub height: u32,

    /// Number of bins in length histograms.
    #[clap(long, default_value_t = 30)]
    pub bins: usize,

    /// Genera shown on the genus panel, by descending region count.
    #[clap(long, default_value_t = 20)]
    pub top_genera: usize,
}

// ----------------------------------------------------------------------------
// Plot Config
// ----------------------------------------------------------------------------

/// Explicit rendering options passed to every chart.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlotConfig {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Bins in length histograms.
    pub bins: usize,
    /// Hexagon columns in hexbin charts.
    pub hex_columns: usize,
    /// Genera shown on the genus panel.
    pub top_genera: usize,
    /// Decimal digits on density axis labels.
    pub digits: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            width: 1400,
            height: 900,
            bins: 30,
            hex_columns: 24,
            top_genera: 20,
            digits: 1,
        }
    }
}

impl PlotConfig {
    pub fn from_args(args: &Args) -> PlotConfig {
        PlotConfig {
            width: args.width,
            height: args.height,
            bins: args.bins,
            top_genera: args.top_genera,
            ..PlotConfig::default()
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// ----------------------------------------------------------------------------
// Catalog
// ----------------------------------------------------------------------------

/// Run the analysis pipeline and render the figure catalog.
pub fn plot(args: &Args) -> Result<Vec<PathBuf>, Report> {
    let (dataset, regions) = run::analysis_regions(&args.input_dir)?;
    let config = PlotConfig::from_args(args);

    let plot_dir = args.output_dir.join("plots");
    std::fs::create_dir_all(&plot_dir)
        .wrap_err_with(|| format!("Unable to create directory: {plot_dir:?}"))?;

    let mut paths = Vec::new();
    paths.extend(length_histogram(&regions, &config, &plot_dir)?);
    paths.extend(combination_counts(&regions, args.lump_threshold, &config, &plot_dir)?);
    paths.extend(genus_panel(&regions, &dataset, args.lump_threshold, &config, &plot_dir)?);
    paths.extend(edge_hexbin(&regions, &config, &plot_dir)?);
    paths.extend(overview(&regions, &dataset, args.lump_threshold, &config, &plot_dir)?);

    info!(
        "{}",
        formatdoc!(
            "Figure catalog written.
            charts: {}
            directory: {plot_dir:?}",
            paths.len(),
        )
    );

    Ok(paths)
}

/// Map a plotters error into a report; the backend error type varies per
/// backend, so the message is formatted eagerly.
fn draw_err<E: std::fmt::Display>(error: E) -> Report {
    eyre!("Failed to render chart: {error}")
}

/// Lumped combination counts, descending; ties break alphabetically.
pub fn lumped_counts(regions: &[BgcRegion], threshold: usize) -> Vec<(String, usize)> {
    let ranked = classify::rank_combinations(regions);
    let mut lumped: BTreeMap<String, usize> = BTreeMap::new();
    ranked.iter().for_each(|(combination, count)| {
        *lumped.entry(classify::lump(combination, *count, threshold)).or_default() += count;
    });

    lumped
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect_vec()
}

// ----------------------------------------------------------------------------
// Chart: length histogram by category
// ----------------------------------------------------------------------------

/// Histogram of BGC length (kbp), one facet per category.
pub fn length_histogram(
    regions: &[BgcRegion],
    config: &PlotConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, Report> {
    // one facet per category, in canonical order, empty categories included
    let by_category = aggregate::lengths_by_category(regions);
    let data = Category::iter()
        .map(|category| {
            let lengths = by_category.get(&category).cloned().unwrap_or_default();
            (category.to_string(), lengths.into_iter().map(|l| l as f64 / 1000.0).collect_vec())
        })
        .collect_vec();

    let png = dir.join("length_histogram.png");
    let root = BitMapBackend::new(&png, config.size()).into_drawing_area();
    draw_length_histogram(&root, &data, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    let svg = dir.join("length_histogram.svg");
    let root = SVGBackend::new(&svg, config.size()).into_drawing_area();
    draw_length_histogram(&root, &data, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    Ok(vec![png, svg])
}

fn draw_length_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &[(String, Vec<f64>)],
    config: &PlotConfig,
) -> Result<(), Report> {
    root.fill(&WHITE).map_err(draw_err)?;

    let areas = root.split_evenly((2, 4));
    for (i, (category, lengths)) in data.iter().enumerate() {
        let area = areas
            .get(i)
            .ok_or_else(|| eyre!("Too many categories for the histogram grid: {category}"))?;
        let title = format!("{category} (n={})", lengths.len());
        draw_histogram(area, &title, lengths, Palette99::pick(i).to_rgba(), config)?;
    }

    Ok(())
}

/// One histogram panel over pre-binned values.
fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    values: &[f64],
    color: RGBAColor,
    config: &PlotConfig,
) -> Result<(), Report> {
    let (bins, width) = hist_bins(values, config.bins);
    let x_max = (values.iter().cloned().fold(0.0, f64::max) * 1.05).max(1.0);
    let y_max = (bins.iter().map(|(_, count)| *count).max().unwrap_or(0) as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(32)
        .y_label_area_size(44)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Length (kbp)")
        .y_desc("Regions")
        .label_style(("sans-serif", 11))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(bins.iter().filter(|(_, count)| *count > 0).map(|(x0, count)| {
            Rectangle::new([(*x0, 0.0), (*x0 + width, *count as f64)], color.mix(0.8).filled())
        }))
        .map_err(draw_err)?;

    Ok(())
}

/// Evenly spaced histogram bins over `[0, max]`.
fn hist_bins(values: &[f64], bins: usize) -> (Vec<(f64, usize)>, f64) {
    let bins = bins.max(1);
    let max = values.iter().cloned().fold(0.0, f64::max);
    let width = match max > 0.0 {
        true => max / bins as f64,
        false => 1.0,
    };

    let mut counts = vec![0usize; bins];
    values.iter().for_each(|value| {
        let i = ((value / width) as usize).min(bins - 1);
        counts[i] += 1;
    });

    let bins =
        counts.into_iter().enumerate().map(|(i, count)| (i as f64 * width, count)).collect_vec();
    (bins, width)
}

// ----------------------------------------------------------------------------
// Chart: combination counts
// ----------------------------------------------------------------------------

/// Bar chart of lumped combination counts, descending.
pub fn combination_counts(
    regions: &[BgcRegion],
    threshold: usize,
    config: &PlotConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, Report> {
    let counts = lumped_counts(regions, threshold);
    let labels = counts.iter().map(|(combination, _)| combination.clone()).collect_vec();
    let values = counts.iter().map(|(_, count)| *count as f64).collect_vec();

    let png = dir.join("combination_counts.png");
    let root = BitMapBackend::new(&png, config.size()).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    draw_count_bars(&root, "BGC category combinations", &labels, &values, 0, "Regions", true)?;
    root.present().map_err(draw_err)?;
    drop(root);

    let svg = dir.join("combination_counts.svg");
    let root = SVGBackend::new(&svg, config.size()).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    draw_count_bars(&root, "BGC category combinations", &labels, &values, 0, "Regions", true)?;
    root.present().map_err(draw_err)?;
    drop(root);

    Ok(vec![png, svg])
}

/// Vertical bars over labeled positions, shared by the count charts.
fn draw_count_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    labels: &[String],
    values: &[f64],
    color_index: usize,
    y_desc: &str,
    show_x_labels: bool,
) -> Result<(), Report> {
    let n = values.len().max(1);
    let y_max = values.iter().cloned().fold(0.0, f64::max).max(1.0) * 1.1;
    let color = Palette99::pick(color_index).to_rgba();
    let x_label_area = match show_x_labels {
        true => 120,
        false => 16,
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(x_label_area)
        .y_label_area_size(56)
        .build_cartesian_2d((0..n - 1).into_segmented(), 0f64..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(match show_x_labels {
            true => n,
            false => 0,
        })
        .x_label_formatter(&|value| segment_label(value, labels))
        .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
        .y_desc(y_desc)
        .label_style(("sans-serif", 11))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, value)| {
            Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                color.filled(),
            )
        }))
        .map_err(draw_err)?;

    Ok(())
}

/// Label of one segmented axis position.
fn segment_label(value: &SegmentValue<usize>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

// ----------------------------------------------------------------------------
// Chart: genus panel
// ----------------------------------------------------------------------------

/// Stacked density bars per genus and its lumped groups, alongside the aux
/// count panels.
struct DensityStack {
    genera: Vec<String>,
    groups: Vec<String>,
    densities: Vec<GenusDensity>,
}

/// Densities restricted to the top genera by region count.
fn density_stack(
    regions: &[BgcRegion],
    dataset: &Dataset,
    threshold: usize,
    config: &PlotConfig,
) -> DensityStack {
    let bgc_counts = aggregate::genus_bgc_counts(regions);
    let genera = bgc_counts
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(genus, _)| genus.clone())
        .take(config.top_genera)
        .collect_vec();
    if bgc_counts.len() > genera.len() {
        debug!("Genus panel shows {}/{} genera.", genera.len(), bgc_counts.len());
    }

    let counts = aggregate::genus_combination_counts(regions, threshold);
    let totals = aggregate::genus_genome_totals(regions, &dataset.zero_hit_genus_counts());
    let densities = aggregate::genus_density(&counts, &totals);

    // groups ordered by total count, the lumped bucket last
    let mut group_totals: BTreeMap<&str, usize> = BTreeMap::new();
    densities.iter().for_each(|d| {
        *group_totals.entry(&d.group).or_default() += d.count;
    });
    let (mut groups, lumped): (Vec<String>, Vec<String>) = group_totals
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(group, _)| group.to_string())
        .partition(|group| group != classify::OTHER_HYBRIDS);
    groups.extend(lumped);

    DensityStack { genera, groups, densities }
}

/// Genus figure: stacked density bars plus BGC, source genome and GCF counts.
pub fn genus_panel(
    regions: &[BgcRegion],
    dataset: &Dataset,
    threshold: usize,
    config: &PlotConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, Report> {
    let stack = density_stack(regions, dataset, threshold, config);

    let bgc_counts = aggregate::genus_bgc_counts(regions);
    let gcf_counts = aggregate::gcf_counts(&dataset.gcf_clusters, &dataset.taxonomy);
    let bgc = aligned_counts(&stack.genera, &bgc_counts);
    let genomes = aligned_counts(&stack.genera, &dataset.genus_genomes);
    let gcf = aligned_counts(&stack.genera, &gcf_counts);

    let png = dir.join("genus_panel.png");
    let root = BitMapBackend::new(&png, config.size()).into_drawing_area();
    draw_genus_panel(&root, &stack, &bgc, &genomes, &gcf, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    let svg = dir.join("genus_panel.svg");
    let root = SVGBackend::new(&svg, config.size()).into_drawing_area();
    draw_genus_panel(&root, &stack, &bgc, &genomes, &gcf, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    Ok(vec![png, svg])
}

/// Counts aligned with the genus ordering; a genus missing from the map gets
/// a zero bar.
fn aligned_counts(genera: &[String], counts: &BTreeMap<String, usize>) -> Vec<f64> {
    genera.iter().map(|genus| counts.get(genus).copied().unwrap_or(0) as f64).collect_vec()
}

fn draw_genus_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    stack: &DensityStack,
    bgc: &[f64],
    genomes: &[f64],
    gcf: &[f64],
    config: &PlotConfig,
) -> Result<(), Report> {
    root.fill(&WHITE).map_err(draw_err)?;

    let (main, side) = root.split_horizontally((65).percent_width());
    draw_density_stack(&main, "BGC density by genus", stack, config)?;

    let panels = side.split_evenly((3, 1));
    draw_count_bars(&panels[0], "BGCs", &stack.genera, bgc, 1, "Regions", false)?;
    draw_count_bars(&panels[1], "Source genomes", &stack.genera, genomes, 2, "Genomes", false)?;
    draw_count_bars(&panels[2], "Gene cluster families", &stack.genera, gcf, 3, "GCFs", false)?;

    Ok(())
}

fn draw_density_stack<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    stack: &DensityStack,
    config: &PlotConfig,
) -> Result<(), Report> {
    let n = stack.genera.len().max(1);

    // stacked totals set the y range
    let mut totals = vec![0f64; stack.genera.len()];
    for d in &stack.densities {
        if let Some(xi) = stack.genera.iter().position(|genus| genus == &d.genus) {
            totals[xi] += d.density;
        }
    }
    let y_max = totals.iter().cloned().fold(0.0, f64::max).max(0.1) * 1.15;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n - 1).into_segmented(), 0f64..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|value| segment_label(value, &stack.genera))
        .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
        .y_desc("BGCs per genome")
        .y_label_formatter(&|y| format!("{y:.digits$}", digits = config.digits))
        .label_style(("sans-serif", 11))
        .draw()
        .map_err(draw_err)?;

    let mut cumulative = vec![0f64; stack.genera.len()];
    for (gi, group) in stack.groups.iter().enumerate() {
        let color = Palette99::pick(gi).to_rgba();
        let mut bars = Vec::new();
        for (xi, genus) in stack.genera.iter().enumerate() {
            let density = stack
                .densities
                .iter()
                .find(|d| &d.genus == genus && &d.group == group)
                .map(|d| d.density)
                .unwrap_or(0.0);
            if density > 0.0 {
                let y0 = cumulative[xi];
                let y1 = y0 + density;
                cumulative[xi] = y1;
                bars.push(Rectangle::new(
                    [(SegmentValue::Exact(xi), y0), (SegmentValue::Exact(xi + 1), y1)],
                    color.filled(),
                ));
            }
        }
        chart
            .draw_series(bars)
            .map_err(draw_err)?
            .label(group.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 12))
        .draw()
        .map_err(draw_err)?;

    Ok(())
}

// ----------------------------------------------------------------------------
// Chart: hexbin by contig edge
// ----------------------------------------------------------------------------

/// Hexbin density of scaffold count vs. per-genome BGC count, faceted by the
/// contig edge flag.
pub fn edge_hexbin(
    regions: &[BgcRegion],
    config: &PlotConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, Report> {
    let (edge_false, edge_true) = aggregate::genome_scaffold_points(regions);
    let facets = [("Not on contig edge", edge_false), ("On contig edge", edge_true)];

    let png = dir.join("edge_hexbin.png");
    let root = BitMapBackend::new(&png, config.size()).into_drawing_area();
    draw_edge_hexbin(&root, &facets, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    let svg = dir.join("edge_hexbin.svg");
    let root = SVGBackend::new(&svg, config.size()).into_drawing_area();
    draw_edge_hexbin(&root, &facets, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    Ok(vec![png, svg])
}

fn draw_edge_hexbin<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    facets: &[(&str, Vec<(f64, f64)>)],
    config: &PlotConfig,
) -> Result<(), Report> {
    root.fill(&WHITE).map_err(draw_err)?;

    let areas = root.split_evenly((1, facets.len()));
    for (area, (title, points)) in areas.iter().zip(facets.iter()) {
        draw_hexbin(area, title, points, config)?;
    }

    Ok(())
}

fn draw_hexbin<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    points: &[(f64, f64)],
    config: &PlotConfig,
) -> Result<(), Report> {
    let x_max = (points.iter().map(|(x, _)| *x).fold(0.0, f64::max) * 1.05).max(1.0);
    let y_max = (points.iter().map(|(_, y)| *y).fold(0.0, f64::max) * 1.05).max(1.0);

    let bins = hexbin::bin(points, config.hex_columns, (0.0, x_max), (0.0, y_max));
    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{title} (n={})", points.len()), ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Scaffolds in genome")
        .y_desc("BGCs in genome")
        .label_style(("sans-serif", 11))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(bins.iter().map(|bin| {
            // square root scale keeps sparse bins visible
            let t = (bin.count as f64 / max_count).sqrt();
            Polygon::new(bin.vertices(), density_color(t).filled())
        }))
        .map_err(draw_err)?;

    Ok(())
}

/// Light-to-dark blue ramp over `[0, 1]`.
fn density_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(222, 8), lerp(235, 48), lerp(247, 107))
}

// ----------------------------------------------------------------------------
// Chart: composite overview
// ----------------------------------------------------------------------------

/// Composite multi-panel figure: combination counts, pooled length
/// histogram, stacked genus densities.
pub fn overview(
    regions: &[BgcRegion],
    dataset: &Dataset,
    threshold: usize,
    config: &PlotConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, Report> {
    let counts = lumped_counts(regions, threshold);
    let labels = counts.iter().map(|(combination, _)| combination.clone()).collect_vec();
    let values = counts.iter().map(|(_, count)| *count as f64).collect_vec();
    let lengths = regions.iter().map(|region| region.length as f64 / 1000.0).collect_vec();
    let stack = density_stack(regions, dataset, threshold, config);

    let png = dir.join("overview.png");
    let root = BitMapBackend::new(&png, config.size()).into_drawing_area();
    draw_overview(&root, &labels, &values, &lengths, &stack, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    let svg = dir.join("overview.svg");
    let root = SVGBackend::new(&svg, config.size()).into_drawing_area();
    draw_overview(&root, &labels, &values, &lengths, &stack, config)?;
    root.present().map_err(draw_err)?;
    drop(root);

    Ok(vec![png, svg])
}

fn draw_overview<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    labels: &[String],
    values: &[f64],
    lengths: &[f64],
    stack: &DensityStack,
    config: &PlotConfig,
) -> Result<(), Report> {
    root.fill(&WHITE).map_err(draw_err)?;

    let (top, bottom) = root.split_vertically((50).percent_height());
    let (left, right) = top.split_horizontally((50).percent_width());

    draw_count_bars(&left, "BGC category combinations", labels, values, 0, "Regions", true)?;
    let title = format!("BGC length (n={})", lengths.len());
    draw_histogram(&right, &title, lengths, Palette99::pick(4).to_rgba(), config)?;
    draw_density_stack(&bottom, "BGC density by genus", stack, config)?;

    Ok(())
}
