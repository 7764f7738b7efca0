//! Focus routing between answer fields and the shared symbol palette.
//!
//! ```text
//!                 FieldFocused(i)
//!   ┌──────┐ ─────────────────────────▶ ┌───────────┐
//!   │ Idle │                            │ Active(i) │◀─┐ FieldFocused(j)
//!   └──────┘ ◀── deferred blur fires ── └───────────┘ ─┘ (cancels pending)
//!       ▲                                   │
//!       └────────── DocumentReloaded ───────┘
//! ```
//!
//! A blur from the active field does not hide the palette right away. It
//! schedules a [`DeferredBlur`] that only takes effect once `debounce` has
//! elapsed, because pressing a palette button blurs the field a moment before
//! the button's click arrives. Palette pointer-down, palette token selection
//! and refocus all cancel the pending blur.
//!
//! The router never reads a clock. Callers pass `now` in, and
//! [`FocusRouter::poll`] is called from the event loop tick.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::registry::{FieldHandle, FieldRegistry};

pub const DEFAULT_BLUR_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Idle,
    Active(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("palette insert with no active field")]
    NoActiveField,
    #[error("no widget handle registered for step {0}")]
    MissingHandle(usize),
}

/// A scheduled transition to [`FocusState::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredBlur {
    pub step: usize,
    pub due: Instant,
}

#[derive(Debug)]
pub struct FocusRouter {
    state: FocusState,
    pending: Option<DeferredBlur>,
    debounce: Duration,
}

impl Default for FocusRouter {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_BLUR_DEBOUNCE_MS))
    }
}

impl FocusRouter {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: FocusState::Idle,
            pending: None,
            debounce,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn active_step(&self) -> Option<usize> {
        match self.state {
            FocusState::Active(step) => Some(step),
            FocusState::Idle => None,
        }
    }

    /// Deadline of the pending deferred blur, if any.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    pub fn field_focused(&mut self, step: usize) {
        if self.pending.take().is_some() {
            tracing::debug!(step, "refocus cancelled pending blur");
        }
        self.state = FocusState::Active(step);
    }

    pub fn field_blurred(&mut self, step: usize, now: Instant) {
        if self.state != FocusState::Active(step) {
            tracing::debug!(step, state = ?self.state, "ignoring blur from inactive field");
            return;
        }
        self.pending = Some(DeferredBlur {
            step,
            due: now + self.debounce,
        });
    }

    pub fn palette_pointer_down(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("palette pointer-down cancelled pending blur");
        }
    }

    /// Insert `token` into the active field and hand focus back to it.
    pub fn palette_token_selected<H: FieldHandle>(
        &mut self,
        token: &str,
        fields: &mut FieldRegistry<H>,
    ) -> Result<usize, RoutingError> {
        self.pending = None;
        let step = self.active_step().ok_or(RoutingError::NoActiveField)?;
        let handle = fields
            .handle_mut(step)
            .ok_or(RoutingError::MissingHandle(step))?;
        handle.insert_token(token);
        handle.take_focus();
        Ok(step)
    }

    pub fn document_reloaded(&mut self) {
        self.pending = None;
        self.state = FocusState::Idle;
    }

    /// Fire the deferred blur if it is due. Returns the new state on a
    /// transition.
    pub fn poll(&mut self, now: Instant) -> Option<FocusState> {
        let blur = self.pending?;
        if now < blur.due {
            return None;
        }
        self.pending = None;
        if self.state == FocusState::Active(blur.step) {
            self.state = FocusState::Idle;
            tracing::debug!(step = blur.step, "deferred blur fired");
            Some(self.state)
        } else {
            None
        }
    }
}
