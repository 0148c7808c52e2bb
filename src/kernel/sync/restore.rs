use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::kernel::document::DocumentKind;
use crate::kernel::ids::DocumentId;

/// Where a surface attachment is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfacePhase {
    /// No surface is attached; nothing is pushed and no changes are expected.
    #[default]
    Detached,
    /// Content is being pushed, or the surface is still echoing it back.
    /// Every change reported in this phase is an echo.
    Restoring,
    /// Surface changes are user edits.
    Live,
}

/// Identifies one restoration run. A step is only applied while its token is
/// still the current one and its target is still the active document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoreToken {
    pub target: DocumentId,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreStep {
    PushText,
    PushShapes,
    RegisterAsset(String),
    /// Scroll and zoom go last, asset insertion can move the viewport.
    RestoreView,
}

/// Restoration state machine for one surface attachment.
#[derive(Debug)]
pub struct Restorer {
    kind: DocumentKind,
    phase: SurfacePhase,
    generation: u64,
    token: Option<RestoreToken>,
    steps: VecDeque<RestoreStep>,
    settle_delay: Duration,
    settle_deadline: Option<Instant>,
}

impl Restorer {
    pub fn new(kind: DocumentKind, settle_delay: Duration) -> Self {
        Self {
            kind,
            phase: SurfacePhase::Detached,
            generation: 0,
            token: None,
            steps: VecDeque::new(),
            settle_delay,
            settle_deadline: None,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> Option<RestoreToken> {
        self.token
    }

    pub fn is_attached(&self) -> bool {
        self.phase != SurfacePhase::Detached
    }

    /// Only a live surface produces edits worth keeping.
    pub fn accepts_changes(&self) -> bool {
        self.phase == SurfacePhase::Live
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.settle_deadline
    }

    pub fn attach(&mut self) {
        self.reset(SurfacePhase::Restoring);
        tracing::debug!(kind = %self.kind, "surface attached");
    }

    pub fn detach(&mut self) {
        self.reset(SurfacePhase::Detached);
        tracing::debug!(kind = %self.kind, "surface detached");
    }

    fn reset(&mut self, phase: SurfacePhase) {
        self.generation += 1;
        self.phase = phase;
        self.token = None;
        self.steps.clear();
        self.settle_deadline = None;
    }

    /// Start restoring `target`, abandoning whatever run was in flight.
    /// Returns `None` while detached.
    pub fn begin(
        &mut self,
        target: DocumentId,
        steps: impl IntoIterator<Item = RestoreStep>,
    ) -> Option<RestoreToken> {
        if self.phase == SurfacePhase::Detached {
            return None;
        }
        if let Some(stale) = self.token {
            tracing::debug!(
                kind = %self.kind,
                stale = %stale.target,
                target = %target,
                "abandoning in-flight restore"
            );
        }
        self.reset(SurfacePhase::Restoring);
        let token = RestoreToken {
            target,
            generation: self.generation,
        };
        self.token = Some(token);
        self.steps.extend(steps);
        tracing::debug!(kind = %self.kind, %target, generation = token.generation, "restore started");
        Some(token)
    }

    pub fn is_current(&self, token: RestoreToken, active: Option<DocumentId>) -> bool {
        self.phase == SurfacePhase::Restoring
            && self.token == Some(token)
            && active == Some(token.target)
    }

    /// Next step to apply against the document that is active now. A run
    /// whose target is no longer active is dropped without side effects.
    pub fn next_step(&mut self, active: Option<DocumentId>) -> Option<(RestoreToken, RestoreStep)> {
        let token = self.token?;
        if !self.is_current(token, active) {
            tracing::debug!(
                kind = %self.kind,
                target = %token.target,
                "restore target no longer active, abandoning"
            );
            self.token = None;
            self.steps.clear();
            return None;
        }
        let step = self.steps.pop_front()?;
        Some((token, step))
    }

    /// All programmatic pushes are done; the surface goes live once the
    /// settle delay has passed without another push.
    pub fn pushes_done(&mut self, now: Instant) {
        if self.phase != SurfacePhase::Restoring
            || !self.steps.is_empty()
            || self.settle_deadline.is_some()
        {
            return;
        }
        self.token = None;
        self.settle_deadline = Some(now + self.settle_delay);
    }

    /// Move to `Live` once settled. Returns `true` on the transition.
    pub fn poll_settle(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.settle_deadline else {
            return false;
        };
        if now < deadline || self.phase != SurfacePhase::Restoring || self.token.is_some() {
            return false;
        }
        self.settle_deadline = None;
        self.phase = SurfacePhase::Live;
        tracing::debug!(kind = %self.kind, "surface live");
        true
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/sync/restore.rs"]
mod tests;
