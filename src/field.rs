use std::rc::Rc;

use crate::registry::FieldHandle;

pub const DEFAULT_AUTO_COMMANDS: &[&str] = &[
    "sqrt", "alpha", "beta", "gamma", "theta", "pi", "phi", "sigma", "tau", "infinity",
    "partial", "delta",
];

pub const DEFAULT_AUTO_OPERATOR_NAMES: &[&str] = &["sin", "cos", "tan", "log", "ln", "exp"];

/// Words that are rewritten into LaTeX commands as they are typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCommands {
    commands: Vec<String>,
    operator_names: Vec<String>,
}

impl Default for AutoCommands {
    fn default() -> Self {
        Self::new(
            DEFAULT_AUTO_COMMANDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_AUTO_OPERATOR_NAMES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl AutoCommands {
    pub fn new(commands: Vec<String>, operator_names: Vec<String>) -> Self {
        Self {
            commands,
            operator_names,
        }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn operator_names(&self) -> &[String] {
        &self.operator_names
    }

    /// Longest configured word that `run` ends with.
    fn match_suffix(&self, run: &str) -> Option<&str> {
        self.commands
            .iter()
            .chain(self.operator_names.iter())
            .filter(|w| !w.is_empty() && run.ends_with(w.as_str()))
            .max_by_key(|w| w.len())
            .map(String::as_str)
    }
}

/// Single-line editable expression field.
///
/// Edits are reported through [`ExpressionField::take_change`] and focus
/// requests through [`ExpressionField::take_focus_request`]; the event loop
/// drains both after every input event.
#[derive(Debug, Clone)]
pub struct ExpressionField {
    text: String,
    /// Cursor position in chars.
    cursor: usize,
    auto: Rc<AutoCommands>,
    changed: bool,
    focus_requested: bool,
}

impl ExpressionField {
    pub fn new(initial: &str, auto: Rc<AutoCommands>) -> Self {
        Self {
            text: initial.to_string(),
            cursor: initial.chars().count(),
            auto,
            changed: false,
            focus_requested: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        if c.is_ascii_alphabetic() {
            self.apply_auto_command();
        }
        self.changed = true;
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
        self.changed = true;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.text.remove(at);
            self.changed = true;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.text.remove(at);
            self.changed = true;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn take_change(&mut self) -> Option<String> {
        if std::mem::take(&mut self.changed) {
            Some(self.text.clone())
        } else {
            None
        }
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Rewrite a just-typed trigger word before the cursor into `\word `.
    fn apply_auto_command(&mut self) {
        let before: Vec<char> = self.text.chars().take(self.cursor).collect();
        let run_start = before
            .iter()
            .rposition(|c| !c.is_ascii_alphabetic())
            .map_or(0, |p| p + 1);
        if run_start > 0 && before[run_start - 1] == '\\' {
            return;
        }
        let run: String = before[run_start..].iter().collect();
        let Some(word) = self.auto.match_suffix(&run) else {
            return;
        };

        let word_len = word.chars().count();
        let replacement = format!("\\{} ", word);
        let start = self.byte_offset(self.cursor - word_len);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, &replacement);
        self.cursor += 2;
    }
}

/// True when `token` ends in `\name`, which would swallow letters typed
/// right after it.
fn ends_with_command_name(token: &str) -> bool {
    let name_len = token
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    name_len > 0 && token[..token.len() - name_len].ends_with('\\')
}

impl FieldHandle for ExpressionField {
    fn insert_token(&mut self, token: &str) {
        self.insert_str(token);
        if ends_with_command_name(token) {
            self.insert_str(" ");
        }
    }

    fn take_focus(&mut self) {
        self.focus_requested = true;
    }
}
