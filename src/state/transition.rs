//! Item transition state
//!
//! Deleting or reordering an entry first plays a short animation on its row
//! and only then commits the mutation. The tracker holds the pending
//! mutation of every animating item and hands it back exactly once.

use crate::document::Section;
use crate::store::Action;
use std::time::{Duration, Instant};

/// What the pending mutation will do to the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Remove,
    MoveUp,
    MoveDown,
}

/// A mutation waiting for its animation to finish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub section: Section,
    pub id: String,
    pub kind: TransitionKind,
}

impl PendingMutation {
    pub fn new(section: Section, id: impl Into<String>, kind: TransitionKind) -> Self {
        Self {
            section,
            id: id.into(),
            kind,
        }
    }

    pub fn into_action(self) -> Action {
        let PendingMutation { section, id, kind } = self;
        match kind {
            TransitionKind::Remove => Action::DeleteItem { section, id },
            TransitionKind::MoveUp => Action::MoveItemUp { section, id },
            TransitionKind::MoveDown => Action::MoveItemDown { section, id },
        }
    }
}

/// Direction of a reorder animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Render state of one item, with eased progress in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemTransition {
    Idle,
    AnimatingOut { progress: f32 },
    AnimatingReorder { direction: ReorderDirection, progress: f32 },
}

/// Result of asking for a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginOutcome {
    /// No animation needed, commit right away
    CommitNow(PendingMutation),
    Started,
    /// The item is already animating; the request is dropped
    AlreadyAnimating,
}

#[derive(Debug)]
struct ActiveTransition {
    mutation: PendingMutation,
    started_at: Instant,
}

/// Tracks animating items and their pending mutations
#[derive(Debug)]
pub struct TransitionTracker {
    duration: Duration,
    active: Vec<ActiveTransition>,
}

impl TransitionTracker {
    /// Default animation length
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);
    /// Upper bound on any animation so a commit is never held back for long
    pub const MAX_ANIMATION: Duration = Duration::from_millis(1000);

    pub fn new(duration: Duration) -> Self {
        Self {
            duration: duration.min(Self::MAX_ANIMATION),
            active: Vec::new(),
        }
    }

    /// Start animating the item targeted by `mutation`.
    /// With `skip` set (or animations disabled) the mutation is handed back
    /// for an immediate commit.
    pub fn begin(&mut self, mutation: PendingMutation, skip: bool, now: Instant) -> BeginOutcome {
        if self.is_item_animating(mutation.section, &mutation.id) {
            return BeginOutcome::AlreadyAnimating;
        }
        if skip || self.duration.is_zero() {
            return BeginOutcome::CommitNow(mutation);
        }
        tracing::debug!(
            "Animating {:?} of {} in {}",
            mutation.kind,
            mutation.id,
            mutation.section.key()
        );
        self.active.push(ActiveTransition {
            mutation,
            started_at: now,
        });
        BeginOutcome::Started
    }

    /// Hand back every mutation whose animation has finished
    pub fn poll(&mut self, now: Instant) -> Vec<PendingMutation> {
        let duration = self.duration;
        let (done, running): (Vec<_>, Vec<_>) = self
            .active
            .drain(..)
            .partition(|t| now.saturating_duration_since(t.started_at) >= duration);
        self.active = running;
        done.into_iter().map(|t| t.mutation).collect()
    }

    /// Completion signal for one item. Returns the mutation only the first time.
    pub fn complete(&mut self, section: Section, id: &str) -> Option<PendingMutation> {
        let index = self
            .active
            .iter()
            .position(|t| t.mutation.section == section && t.mutation.id == id)?;
        Some(self.active.remove(index).mutation)
    }

    /// Complete everything at once, in the order the animations started
    pub fn finish_all(&mut self) -> Vec<PendingMutation> {
        self.active.drain(..).map(|t| t.mutation).collect()
    }

    /// Drop pending mutations of a section that is no longer shown.
    /// Returns how many were dropped.
    pub fn unmount(&mut self, section: Section) -> usize {
        let before = self.active.len();
        self.active.retain(|t| t.mutation.section != section);
        before - self.active.len()
    }

    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn is_item_animating(&self, section: Section, id: &str) -> bool {
        self.active
            .iter()
            .any(|t| t.mutation.section == section && t.mutation.id == id)
    }

    /// Render state of an item at `now`
    pub fn state_of(&self, section: Section, id: &str, now: Instant) -> ItemTransition {
        let Some(active) = self
            .active
            .iter()
            .find(|t| t.mutation.section == section && t.mutation.id == id)
        else {
            return ItemTransition::Idle;
        };

        let elapsed = now.saturating_duration_since(active.started_at);
        let linear = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
        };

        match active.mutation.kind {
            TransitionKind::Remove => ItemTransition::AnimatingOut {
                progress: simple_easing::cubic_in(linear),
            },
            TransitionKind::MoveUp => ItemTransition::AnimatingReorder {
                direction: ReorderDirection::Up,
                progress: simple_easing::cubic_in_out(linear),
            },
            TransitionKind::MoveDown => ItemTransition::AnimatingReorder {
                direction: ReorderDirection::Down,
                progress: simple_easing::cubic_in_out(linear),
            },
        }
    }
}

impl Default for TransitionTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION)
    }
}
