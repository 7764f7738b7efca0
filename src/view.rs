use std::time::{Duration, Instant};

use crate::focus::{FocusRouter, FocusState};
use crate::model::{Problem, Step};
use crate::parser::{parse_problem, LoadError};
use crate::registry::{FieldHandle, FieldRegistry};
use crate::render::{ExpressionRenderer, MathMlRenderer};

/// Identifies one load request. Only the most recent ticket may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed,
    /// A newer load started after this ticket was issued; result dropped.
    Superseded,
}

/// What the host draws for one step.
#[derive(Debug, Clone, Copy)]
pub struct StepRow<'a> {
    pub step: &'a Step,
    pub expression: &'a str,
    pub markup: Option<&'a str>,
    pub palette_visible: bool,
}

/// Ties the loaded problem, the answer registry and the focus router
/// together. Generic over the host's widget handle and the renderer.
#[derive(Debug)]
pub struct ProblemView<H, R = MathMlRenderer> {
    problem: Option<Problem>,
    fields: FieldRegistry<H>,
    router: FocusRouter,
    renderer: R,
    generation: u64,
}

impl<H: FieldHandle, R: ExpressionRenderer> ProblemView<H, R> {
    pub fn new(renderer: R, blur_debounce: Duration) -> Self {
        Self {
            problem: None,
            fields: FieldRegistry::new(),
            router: FocusRouter::new(blur_debounce),
            renderer,
            generation: 0,
        }
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Install the document read for `ticket`.
    ///
    /// On error the previously loaded problem stays in place.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        content: &str,
    ) -> Result<LoadOutcome, LoadError> {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, current = self.generation, "discarding stale load");
            return Ok(LoadOutcome::Superseded);
        }
        let problem = parse_problem(content)?;
        self.install(problem);
        Ok(LoadOutcome::Installed)
    }

    pub fn load_document(&mut self, content: &str) -> Result<LoadOutcome, LoadError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, content)
    }

    fn install(&mut self, problem: Problem) {
        tracing::info!(
            title = %problem.title,
            steps = problem.step_count(),
            "problem loaded"
        );
        self.fields.seed(&problem, &mut self.router);
        self.problem = Some(problem);
    }

    pub fn register_handle(&mut self, step: usize, handle: H) {
        if let Err(e) = self.fields.register_handle(step, handle) {
            tracing::warn!(error = %e, "field mounted for unknown step");
        }
    }

    pub fn handles_mut(&mut self) -> impl Iterator<Item = (usize, &mut H)> {
        self.fields.handles_mut()
    }

    pub fn handle(&self, step: usize) -> Option<&H> {
        self.fields.handle(step)
    }

    pub fn handle_mut(&mut self, step: usize) -> Option<&mut H> {
        self.fields.handle_mut(step)
    }

    pub fn edit(&mut self, step: usize, text: &str) {
        if let Err(e) = self.fields.update_text(step, text) {
            tracing::warn!(error = %e, "edit for unknown step");
        }
    }

    pub fn convert(&mut self, step: usize) -> Option<&str> {
        match self.fields.convert(step, &self.renderer) {
            Ok(markup) => Some(markup),
            Err(e) => {
                tracing::warn!(error = %e, "convert for unknown step");
                None
            }
        }
    }

    pub fn expression(&self, step: usize) -> Option<&str> {
        self.fields.answer(step).map(|a| a.expression.as_str())
    }

    pub fn markup(&self, step: usize) -> Option<&str> {
        self.fields.answer(step).and_then(|a| a.markup.as_deref())
    }

    pub fn field_focused(&mut self, step: usize) {
        self.router.field_focused(step);
    }

    pub fn field_blurred(&mut self, step: usize, now: Instant) {
        self.router.field_blurred(step, now);
    }

    pub fn palette_pointer_down(&mut self) {
        self.router.palette_pointer_down();
    }

    /// Route a palette token to the active field. Returns the step it went
    /// to, or `None` when there is nowhere to put it.
    pub fn palette_token_selected(&mut self, token: &str) -> Option<usize> {
        match self.router.palette_token_selected(token, &mut self.fields) {
            Ok(step) => {
                tracing::debug!(step, token, "palette token inserted");
                Some(step)
            }
            Err(e) => {
                tracing::debug!(error = %e, token, "palette token dropped");
                None
            }
        }
    }

    /// Advance scheduled focus transitions to `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.router.poll(now).is_some()
    }

    pub fn focus_state(&self) -> FocusState {
        self.router.state()
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.router.pending_deadline()
    }

    /// Step the palette is currently attached to.
    pub fn palette_anchor(&self) -> Option<usize> {
        self.router.active_step()
    }

    pub fn rows(&self) -> Vec<StepRow<'_>> {
        let Some(problem) = &self.problem else {
            return Vec::new();
        };
        let anchor = self.palette_anchor();
        problem
            .steps
            .iter()
            .map(|step| {
                let answer = self.fields.answer(step.index);
                StepRow {
                    step,
                    expression: answer.map_or("", |a| a.expression.as_str()),
                    markup: answer.and_then(|a| a.markup.as_deref()),
                    palette_visible: anchor == Some(step.index),
                }
            })
            .collect()
    }
}
