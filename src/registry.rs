use thiserror::Error;

use crate::focus::FocusRouter;
use crate::model::{AnswerState, Problem};
use crate::render::{convert_expression, ExpressionRenderer};

/// Commands an editable-expression widget accepts from the core.
pub trait FieldHandle {
    fn insert_token(&mut self, token: &str);
    fn take_focus(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no step {0} in the loaded problem")]
    UnknownStep(usize),
}

/// Per-step answer slots and widget handles for the loaded problem.
///
/// Both tables are flat vectors sized by [`FieldRegistry::seed`]; step `i`
/// lives in slot `i - 1`.
#[derive(Debug)]
pub struct FieldRegistry<H> {
    answers: Vec<AnswerState>,
    handles: Vec<Option<H>>,
}

impl<H> Default for FieldRegistry<H> {
    fn default() -> Self {
        Self {
            answers: Vec::new(),
            handles: Vec::new(),
        }
    }
}

impl<H: FieldHandle> FieldRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a freshly loaded problem: one empty answer per step, no
    /// handles, focus back to idle.
    pub fn seed(&mut self, problem: &Problem, router: &mut FocusRouter) {
        router.document_reloaded();
        let n = problem.step_count();
        self.answers = vec![AnswerState::default(); n];
        self.handles = std::iter::repeat_with(|| None).take(n).collect();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn answer(&self, step: usize) -> Option<&AnswerState> {
        step.checked_sub(1).and_then(|slot| self.answers.get(slot))
    }

    pub fn update_text(&mut self, step: usize, text: &str) -> Result<(), RegistryError> {
        let slot = self.slot(step)?;
        self.answers[slot].expression = text.to_string();
        Ok(())
    }

    pub fn convert<R: ExpressionRenderer + ?Sized>(
        &mut self,
        step: usize,
        renderer: &R,
    ) -> Result<&str, RegistryError> {
        let slot = self.slot(step)?;
        let answer = &mut self.answers[slot];
        let markup = answer.markup.insert(convert_expression(renderer, &answer.expression));
        Ok(markup.as_str())
    }

    pub fn register_handle(&mut self, step: usize, handle: H) -> Result<(), RegistryError> {
        let slot = self.slot(step)?;
        self.handles[slot] = Some(handle);
        Ok(())
    }

    pub fn handle(&self, step: usize) -> Option<&H> {
        step.checked_sub(1)
            .and_then(|slot| self.handles.get(slot))
            .and_then(Option::as_ref)
    }

    pub fn handle_mut(&mut self, step: usize) -> Option<&mut H> {
        step.checked_sub(1)
            .and_then(|slot| self.handles.get_mut(slot))
            .and_then(Option::as_mut)
    }

    /// Mounted handles with their step index, in step order.
    pub fn handles_mut(&mut self) -> impl Iterator<Item = (usize, &mut H)> {
        self.handles
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, h)| h.as_mut().map(|h| (slot + 1, h)))
    }

    fn slot(&self, step: usize) -> Result<usize, RegistryError> {
        match step.checked_sub(1) {
            Some(slot) if slot < self.answers.len() => Ok(slot),
            _ => Err(RegistryError::UnknownStep(step)),
        }
    }
}
