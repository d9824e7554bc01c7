//! Session state machine: one exploration loop over a fixed embedding matrix.
//!
//! The presentation layer forwards user events (cluster-count slider,
//! highlight selection, drill-down) and renders whatever the session hands
//! back. The session decides which pipeline stages each event re-runs:
//!
//! - cluster-count change: recluster, re-annotate the elbow, recompose the
//!   scatter view;
//! - highlight change: recompose the scatter view only (no reclustering);
//! - drill-down request: open the parameter-selection step, compute nothing;
//! - drill-down apply: compose the top-words table, return to idle.
//!
//! The matrix-derived artifacts — elbow curve and projected points — are
//! computed once at construction; the matrix never changes within a session.
//! Several sessions may share one matrix and frequency table by reference
//! (`Arc`); all session-scoped selections live here.
//!
//! Invalid parameters never kill the loop: out-of-range cluster counts are
//! clamped, references to non-existent cluster ids are ignored, and an empty
//! drill-down yields an empty table. Each recovery is logged.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cluster::{cluster, compute_elbow_curve, ClusterAssignment, ElbowCurve};
use crate::embedding::{EmbeddingMatrix, WordFrequencyTable};
use crate::error::{Error, Result};
use crate::project::{project, ProjectedPoint};
use crate::view::{
    compose_elbow_annotation, compose_scatter_view, compose_top_words, AnnotatedElbow,
    DrillTarget, Highlight, TopWordsRow, ViewRecord,
};

/// Session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionParams {
    /// Initial cluster count (clamped to the vocabulary size).
    pub initial_k: usize,

    /// Upper end of the elbow sweep.
    pub k_max: usize,

    /// Seed shared by the elbow sweep and every reclustering.
    pub seed: u64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            initial_k: 2,
            k_max: 10,
            seed: 42,
        }
    }
}

/// Where the session is in its event-handling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next user event.
    Idle,
    /// A drill-down parameter-selection step is open.
    DrilldownRequested,
}

/// A user event forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The cluster-count slider moved.
    SetClusterCount(usize),
    /// The highlight selection changed.
    SetHighlight(Highlight),
    /// The user opened the drill-down dialog.
    RequestDrilldown,
    /// The user confirmed a drill-down target.
    ApplyDrilldown(DrillTarget),
}

/// The artifacts refreshed by one event. `None` means "unchanged — keep what
/// you are showing".
#[derive(Debug, Clone, Default)]
pub struct ViewUpdate {
    /// Refreshed elbow chart (curve + selected-k marker).
    pub elbow: Option<AnnotatedElbow>,
    /// Refreshed 3D scatter records.
    pub scatter: Option<Vec<ViewRecord>>,
    /// Refreshed drill-down table. `Some(vec![])` is a valid empty table.
    pub top_words: Option<Vec<TopWordsRow>>,
}

/// One exploration session over an immutable matrix and frequency table.
#[derive(Debug)]
pub struct Session {
    matrix: Arc<EmbeddingMatrix>,
    freq: Arc<WordFrequencyTable>,
    params: SessionParams,

    // Computed once per matrix.
    elbow: ElbowCurve,
    points: Vec<ProjectedPoint>,

    // Session-scoped selections and their derived assignment.
    k: usize,
    highlight: Highlight,
    assignment: ClusterAssignment,
    state: SessionState,
}

impl Session {
    /// Open a session: compute the elbow curve, the projection, and the
    /// initial cluster assignment.
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateInput`] when the matrix cannot support a
    /// 3-component projection; clustering errors if the sweep fails.
    pub fn new(
        matrix: Arc<EmbeddingMatrix>,
        freq: Arc<WordFrequencyTable>,
        params: SessionParams,
    ) -> Result<Self> {
        if params.k_max == 0 {
            return Err(Error::InvalidParameter {
                name: "k_max",
                message: "must be at least 1",
            });
        }

        let points = project(&matrix)?;
        let elbow = compute_elbow_curve(&matrix, params.k_max, params.seed)?;

        let k = clamp_k(params.initial_k, matrix.len());
        if k != params.initial_k {
            warn!(requested = params.initial_k, clamped = k, "initial cluster count clamped");
        }
        let assignment = cluster(&matrix, k, params.seed)?;

        debug!(n_words = matrix.len(), dim = matrix.dim(), k, "session opened");
        Ok(Self {
            matrix,
            freq,
            params,
            elbow,
            points,
            k,
            highlight: Highlight::None,
            assignment,
            state: SessionState::Idle,
        })
    }

    /// Current cluster count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Current highlight selection.
    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Current loop state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current cluster assignment.
    pub fn assignment(&self) -> &ClusterAssignment {
        &self.assignment
    }

    /// Projected points (fixed for the session's lifetime).
    pub fn projected_points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    /// Elbow curve (fixed for the session's lifetime).
    pub fn elbow_curve(&self) -> &ElbowCurve {
        &self.elbow
    }

    /// Everything needed for the first render.
    pub fn initial_view(&self) -> Result<ViewUpdate> {
        Ok(ViewUpdate {
            elbow: Some(compose_elbow_annotation(&self.elbow, self.k)),
            scatter: Some(compose_scatter_view(
                &self.points,
                &self.assignment,
                self.highlight,
            )?),
            top_words: None,
        })
    }

    /// Handle one user event, re-running exactly the stages it gates.
    pub fn apply(&mut self, event: SessionEvent) -> Result<ViewUpdate> {
        match event {
            SessionEvent::SetClusterCount(requested) => self.set_cluster_count(requested),
            SessionEvent::SetHighlight(highlight) => self.set_highlight(highlight),
            SessionEvent::RequestDrilldown => {
                debug!("drill-down parameter selection opened");
                self.state = SessionState::DrilldownRequested;
                Ok(ViewUpdate::default())
            }
            SessionEvent::ApplyDrilldown(target) => self.apply_drilldown(target),
        }
    }

    fn set_cluster_count(&mut self, requested: usize) -> Result<ViewUpdate> {
        let k = clamp_k(requested, self.matrix.len());
        if k != requested {
            warn!(requested, clamped = k, "cluster count clamped");
        }

        self.k = k;
        self.assignment = cluster(&self.matrix, k, self.params.seed)?;

        // A highlight can outlive its cluster when k shrinks.
        if let Highlight::Cluster(c) = self.highlight {
            if !self.assignment.contains_id(c) {
                debug!(dropped = c, "highlight cleared: cluster id gone at new k");
                self.highlight = Highlight::None;
            }
        }

        debug!(k, "recomputed cluster assignment");
        Ok(ViewUpdate {
            elbow: Some(compose_elbow_annotation(&self.elbow, self.k)),
            scatter: Some(compose_scatter_view(
                &self.points,
                &self.assignment,
                self.highlight,
            )?),
            top_words: None,
        })
    }

    fn set_highlight(&mut self, highlight: Highlight) -> Result<ViewUpdate> {
        if let Highlight::Cluster(c) = highlight {
            if !self.assignment.contains_id(c) {
                warn!(requested = c, k = self.k, "highlight ignored: no such cluster");
                return Ok(ViewUpdate::default());
            }
        }

        self.highlight = highlight;
        Ok(ViewUpdate {
            elbow: None,
            scatter: Some(compose_scatter_view(
                &self.points,
                &self.assignment,
                self.highlight,
            )?),
            top_words: None,
        })
    }

    fn apply_drilldown(&mut self, target: DrillTarget) -> Result<ViewUpdate> {
        self.state = SessionState::Idle;

        if let DrillTarget::Cluster(c) = target {
            if !self.assignment.contains_id(c) {
                warn!(requested = c, k = self.k, "drill-down ignored: no such cluster");
                return Ok(ViewUpdate::default());
            }
        }

        let top_words = match compose_top_words(&self.freq, &self.assignment, target) {
            Ok(rows) => rows,
            // Non-fatal: the table is simply empty.
            Err(Error::EmptySelection) => {
                debug!(?target, "drill-down matched no words");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(ViewUpdate {
            elbow: None,
            scatter: None,
            top_words: Some(top_words),
        })
    }
}

fn clamp_k(requested: usize, n_words: usize) -> usize {
    requested.clamp(1, n_words)
}
