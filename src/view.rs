//! View composer: turns cluster assignments, projected points, and the
//! frequency table into the exact records the presentation layer renders.
//!
//! Everything here is a pure presentation merge — colors, opacities, legend
//! labels, row ordering. Records are plain serializable data so any front end
//! (chart widget, JSON bridge) can consume them unchanged.

use serde::Serialize;
use tracing::trace;

use crate::cluster::{ClusterAssignment, ElbowCurve, ElbowPoint};
use crate::embedding::WordFrequencyTable;
use crate::error::{Error, Result};
use crate::project::ProjectedPoint;

/// Categorical palette for cluster colors; cluster id `c` maps to entry
/// `(c - 1) % len`.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Color of the spotlighted cluster when a highlight is active.
pub const HIGHLIGHT_COLOR: &str = "#e41a1c";

/// Opacity of non-highlighted points when a highlight is active. Keeps the
/// rest of the vocabulary faintly visible for context.
pub const DIM_OPACITY: f32 = 0.1;

/// Legend label shared by all non-highlighted points.
pub const OTHERS_LABEL: &str = "Others";

/// Highlight selection. "No highlight" is an explicit variant, never inferred
/// from a sentinel string or an out-of-range id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// No cluster spotlighted; all points render at full opacity.
    None,
    /// Spotlight one cluster, dimming the rest.
    Cluster(usize),
}

/// Drill-down target for the top-words table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillTarget {
    /// All assigned words.
    All,
    /// Words of one cluster.
    Cluster(usize),
}

/// One renderable scatter point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRecord {
    /// Vocabulary word.
    pub word: String,
    /// Coordinate on the first principal axis.
    pub pc1: f32,
    /// Coordinate on the second principal axis.
    pub pc2: f32,
    /// Coordinate on the third principal axis.
    pub pc3: f32,
    /// Cluster id in `1..=k`.
    pub cluster_id: usize,
    /// Render color (hex).
    pub color: &'static str,
    /// Render opacity in `[0, 1]`.
    pub opacity: f32,
    /// Legend label.
    pub legend: String,
}

/// One row of the drill-down word table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopWordsRow {
    /// Vocabulary word.
    pub word: String,
    /// Corpus occurrence count.
    pub frequency: u64,
    /// Cluster id in `1..=k`.
    pub cluster_id: usize,
}

/// An elbow curve plus the marker for the currently selected k.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedElbow {
    /// The full curve.
    pub curve: ElbowCurve,
    /// The curve point at the selected k, when the selection is on the curve.
    pub marker: Option<ElbowPoint>,
}

/// Merge the elbow curve with a marker at `selected_k`.
///
/// A `selected_k` outside the curve's domain yields no marker rather than an
/// error; the chart still renders.
pub fn compose_elbow_annotation(curve: &ElbowCurve, selected_k: usize) -> AnnotatedElbow {
    let marker = curve.value_at(selected_k).map(|total_within_ss| ElbowPoint {
        k: selected_k,
        total_within_ss,
    });
    AnnotatedElbow {
        curve: curve.clone(),
        marker,
    }
}

/// Compose the 3D scatter view from projected points and a cluster assignment.
///
/// With [`Highlight::None`], every record gets its cluster's palette color at
/// full opacity and its cluster id as legend label. With a highlighted cluster
/// `C`, records in `C` get [`HIGHLIGHT_COLOR`] at full opacity and legend
/// `"C"`; all others keep their palette color at [`DIM_OPACITY`] under the
/// shared [`OTHERS_LABEL`].
///
/// # Errors
///
/// [`Error::InvalidParameter`] when the highlighted cluster id is outside
/// `1..=k`.
pub fn compose_scatter_view(
    points: &[ProjectedPoint],
    assignment: &ClusterAssignment,
    highlight: Highlight,
) -> Result<Vec<ViewRecord>> {
    if let Highlight::Cluster(c) = highlight {
        if !assignment.contains_id(c) {
            return Err(Error::InvalidParameter {
                name: "highlight",
                message: "no such cluster id",
            });
        }
    }

    let records = points
        .iter()
        .filter_map(|point| {
            let cluster_id = assignment.id_of(&point.word)?;
            let palette_color = PALETTE[(cluster_id - 1) % PALETTE.len()];
            let (color, opacity, legend) = match highlight {
                Highlight::None => (palette_color, 1.0, cluster_id.to_string()),
                Highlight::Cluster(c) if cluster_id == c => {
                    (HIGHLIGHT_COLOR, 1.0, c.to_string())
                }
                Highlight::Cluster(_) => (palette_color, DIM_OPACITY, OTHERS_LABEL.to_string()),
            };
            Some(ViewRecord {
                word: point.word.clone(),
                pc1: point.pc1,
                pc2: point.pc2,
                pc3: point.pc3,
                cluster_id,
                color,
                opacity,
                legend,
            })
        })
        .collect();

    trace!(n_points = points.len(), ?highlight, "composed scatter view");
    Ok(records)
}

/// Compose the drill-down word table for one cluster (or all of them).
///
/// Rows are ordered by frequency descending; equal frequencies keep the
/// frequency table's insertion order (stable sort). Words present in the
/// frequency table but absent from the vocabulary are skipped.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] when the target cluster id is outside `1..=k`.
/// - [`Error::EmptySelection`] when no row survives the filter. Non-fatal by
///   contract: render an empty table.
pub fn compose_top_words(
    freq: &WordFrequencyTable,
    assignment: &ClusterAssignment,
    target: DrillTarget,
) -> Result<Vec<TopWordsRow>> {
    if let DrillTarget::Cluster(c) = target {
        if !assignment.contains_id(c) {
            return Err(Error::InvalidParameter {
                name: "drill_target",
                message: "no such cluster id",
            });
        }
    }

    let mut rows: Vec<TopWordsRow> = freq
        .iter()
        .filter_map(|(word, frequency)| {
            let cluster_id = assignment.id_of(word)?;
            match target {
                DrillTarget::All => {}
                DrillTarget::Cluster(c) if cluster_id == c => {}
                DrillTarget::Cluster(_) => return None,
            }
            Some(TopWordsRow {
                word: word.to_string(),
                frequency,
                cluster_id,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(Error::EmptySelection);
    }

    // Stable: ties keep table insertion order.
    rows.sort_by_key(|row| std::cmp::Reverse(row.frequency));

    trace!(n_rows = rows.len(), ?target, "composed top-words table");
    Ok(rows)
}
