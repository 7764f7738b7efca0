#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub title: String,
    pub statement: String,
    pub steps: Vec<Step>,
}

impl Problem {
    pub fn step(&self, index: usize) -> Option<&Step> {
        index.checked_sub(1).and_then(|slot| self.steps.get(slot))
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 1-based position in document order.
    pub index: usize,
    pub statement: String,
}

/// Answer slot for one step.
///
/// `markup` is only written by an explicit conversion; editing the expression
/// afterwards leaves the old markup in place until the next conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerState {
    pub expression: String,
    pub markup: Option<String>,
}
