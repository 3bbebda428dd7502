use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::candidate_dto::CandidateListQuery;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::models::candidate::Candidate;
use crate::models::stage::Stage;
use crate::services::filter_service::{derive, FilterSpec};

/// How a listing screen lays out its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum SelectionState {
    #[default]
    Idle,
    Selecting(BTreeSet<Uuid>),
}

/// Outcome of a bulk stage transition. Partial success is a normal result,
/// not an error: callers get one entry per selected candidate and show both
/// counts.
#[derive(Debug)]
pub struct BulkOutcome {
    pub target: Stage,
    pub items: Vec<BulkItem>,
}

#[derive(Debug)]
pub struct BulkItem {
    pub candidate_id: Uuid,
    pub result: Result<Candidate>,
}

impl BulkOutcome {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn is_partial(&self) -> bool {
        self.succeeded() > 0 && self.failed() > 0
    }
}

/// Per-screen coordinator: owns the candidate list for one listing screen,
/// the selection state machine (`Idle ⇄ Selecting`) and the screen's view
/// mode. The list is never shared across screens.
pub struct ScreenCoordinator {
    gateway: Arc<dyn Gateway>,
    job_id: Uuid,
    candidates: Vec<Candidate>,
    selection: SelectionState,
    pub view_mode: ViewMode,
}

impl ScreenCoordinator {
    /// Fetches the job's candidates and starts in idle selection state.
    pub async fn load(gateway: Arc<dyn Gateway>, job_id: Uuid) -> Result<Self> {
        let candidates = gateway
            .list_candidates(&CandidateListQuery {
                job_id: Some(job_id),
                status: None,
            })
            .await?;
        Ok(Self {
            gateway,
            job_id,
            candidates,
            selection: SelectionState::Idle,
            view_mode: ViewMode::default(),
        })
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Layout preference survives selection-mode changes; it is purely
    /// per-screen presentation state.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// The list the screen actually renders.
    pub fn visible(&self, spec: &FilterSpec) -> Vec<Candidate> {
        derive(&self.candidates, spec)
    }

    pub fn in_selection_mode(&self) -> bool {
        matches!(self.selection, SelectionState::Selecting(_))
    }

    pub fn enter_selection_mode(&mut self) {
        if !self.in_selection_mode() {
            self.selection = SelectionState::Selecting(BTreeSet::new());
        }
    }

    /// Leaving selection mode always drops the selection.
    pub fn exit_selection_mode(&mut self) {
        self.selection = SelectionState::Idle;
    }

    /// Valid only in selection mode; ignored otherwise. Returns whether the
    /// candidate ended up selected.
    pub fn toggle_select(&mut self, id: Uuid) -> bool {
        match &mut self.selection {
            SelectionState::Selecting(set) => {
                if !set.remove(&id) {
                    set.insert(id);
                    true
                } else {
                    false
                }
            }
            SelectionState::Idle => {
                warn!(%id, "toggle_select outside selection mode ignored");
                false
            }
        }
    }

    /// Selects exactly the candidates visible under the current filter, not
    /// the full list.
    pub fn select_all_visible(&mut self, spec: &FilterSpec) {
        let visible: BTreeSet<Uuid> = self.visible(spec).iter().map(|c| c.id).collect();
        if let SelectionState::Selecting(set) = &mut self.selection {
            *set = visible;
        } else {
            warn!("select_all_visible outside selection mode ignored");
        }
    }

    pub fn clear_selection(&mut self) {
        if let SelectionState::Selecting(set) = &mut self.selection {
            set.clear();
        }
    }

    pub fn selected_ids(&self) -> Vec<Uuid> {
        match &self.selection {
            SelectionState::Selecting(set) => set.iter().copied().collect(),
            SelectionState::Idle => Vec::new(),
        }
    }

    /// Moves every selected candidate to `target`. Candidates whose current
    /// stage does not permit the move are rejected locally and never produce
    /// a network call; the rest are updated concurrently and the outcome is
    /// reported only after all requests have settled. Confirmed server
    /// records replace the local ones; nothing is rolled back, since the
    /// individual updates are independent on the backend too.
    #[instrument(skip(self), fields(job_id = %self.job_id))]
    pub async fn apply_bulk_transition(&mut self, target: Stage) -> BulkOutcome {
        let selected = self.selected_ids();
        let mut items: Vec<BulkItem> = Vec::with_capacity(selected.len());
        let mut eligible: Vec<Uuid> = Vec::new();

        for id in selected {
            match self.candidates.iter().find(|c| c.id == id) {
                None => items.push(BulkItem {
                    candidate_id: id,
                    result: Err(Error::NotFound(format!("Candidate {} is not on this screen", id))),
                }),
                Some(candidate) => match candidate.apply_transition(target) {
                    Ok(_) => eligible.push(id),
                    Err(e) => items.push(BulkItem {
                        candidate_id: id,
                        result: Err(e),
                    }),
                },
            }
        }

        let gateway = Arc::clone(&self.gateway);
        let calls = eligible.iter().map(|&id| {
            let gateway = Arc::clone(&gateway);
            async move { (id, gateway.update_candidate_stage(id, target).await) }
        });
        for (id, result) in join_all(calls).await {
            if let Ok(confirmed) = &result {
                self.apply_confirmed(confirmed.clone());
            }
            items.push(BulkItem {
                candidate_id: id,
                result,
            });
        }

        let outcome = BulkOutcome { target, items };
        info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "Bulk stage transition settled"
        );
        outcome
    }

    /// Replaces the local record with the server-confirmed one. Local state
    /// is never trusted past the response that confirmed it.
    fn apply_confirmed(&mut self, confirmed: Candidate) {
        if let Some(slot) = self.candidates.iter_mut().find(|c| c.id == confirmed.id) {
            *slot = confirmed;
        }
    }

    /// Authoritative re-fetch of the screen's list. Keeps the selection only
    /// for candidates that still exist.
    pub async fn refresh(&mut self) -> Result<()> {
        let candidates = self
            .gateway
            .list_candidates(&CandidateListQuery {
                job_id: Some(self.job_id),
                status: None,
            })
            .await?;
        self.candidates = candidates;
        if let SelectionState::Selecting(set) = &mut self.selection {
            set.retain(|id| self.candidates.iter().any(|c| c.id == *id));
        }
        Ok(())
    }
}
