use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteItem {
    pub label: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteGroup {
    pub title: String,
    pub items: Vec<PaletteItem>,
}

fn item(label: &str, symbol: &str) -> PaletteItem {
    PaletteItem {
        label: label.to_string(),
        symbol: symbol.to_string(),
    }
}

pub fn default_groups() -> Vec<PaletteGroup> {
    vec![
        PaletteGroup {
            title: "Operations".to_string(),
            items: vec![
                item("frac", r"\frac"),
                item("sqrt", r"\sqrt"),
                item("x^", r"^{\square}"),
                item("x_", r"_{\square}"),
                item("sin", r"\sin"),
                item("cos", r"\cos"),
                item("tan", r"\tan"),
                item("ln", r"\ln"),
            ],
        },
        PaletteGroup {
            title: "Symbols".to_string(),
            items: vec![
                item("π", r"\pi"),
                item("θ", r"\theta"),
                item("α", r"\alpha"),
                item("β", r"\beta"),
                item("γ", r"\gamma"),
            ],
        },
    ]
}

/// The floating symbol palette.
///
/// Holds only its own UI state. Choosing an item yields the item's token;
/// where that token goes is decided by the focus router.
#[derive(Debug, Clone)]
pub struct SymbolPalette {
    groups: Vec<PaletteGroup>,
    tab: usize,
    pressed: Option<usize>,
    offset: (i32, i32),
    drag_from: Option<(u16, u16)>,
}

impl Default for SymbolPalette {
    fn default() -> Self {
        Self::new(default_groups())
    }
}

impl SymbolPalette {
    pub fn new(groups: Vec<PaletteGroup>) -> Self {
        let groups = if groups.is_empty() {
            default_groups()
        } else {
            groups
        };
        Self {
            groups,
            tab: 0,
            pressed: None,
            offset: (0, 0),
            drag_from: None,
        }
    }

    pub fn groups(&self) -> &[PaletteGroup] {
        &self.groups
    }

    pub fn tab(&self) -> usize {
        self.tab
    }

    pub fn current_group(&self) -> &PaletteGroup {
        &self.groups[self.tab]
    }

    pub fn next_tab(&mut self) {
        self.tab = (self.tab + 1) % self.groups.len();
        self.pressed = None;
    }

    pub fn prev_tab(&mut self) {
        self.tab = (self.tab + self.groups.len() - 1) % self.groups.len();
        self.pressed = None;
    }

    pub fn select_tab(&mut self, tab: usize) {
        if tab < self.groups.len() {
            self.tab = tab;
            self.pressed = None;
        }
    }

    /// Token of item `idx` in the current tab.
    pub fn choose(&self, idx: usize) -> Option<String> {
        self.current_group()
            .items
            .get(idx)
            .map(|it| it.symbol.clone())
    }

    pub fn pressed(&self) -> Option<usize> {
        self.pressed
    }

    pub fn press_item(&mut self, idx: usize) {
        if idx < self.current_group().items.len() {
            self.pressed = Some(idx);
        }
    }

    /// Completes a click when released over the pressed item.
    pub fn release_item(&mut self, idx: Option<usize>) -> Option<String> {
        let pressed = self.pressed.take()?;
        if idx == Some(pressed) {
            self.choose(pressed)
        } else {
            None
        }
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn begin_drag(&mut self, column: u16, row: u16) {
        self.drag_from = Some((column, row));
    }

    pub fn drag_to(&mut self, column: u16, row: u16) {
        if let Some((from_col, from_row)) = self.drag_from {
            self.offset.0 += column as i32 - from_col as i32;
            self.offset.1 += row as i32 - from_row as i32;
            self.drag_from = Some((column, row));
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn reset_position(&mut self) {
        self.offset = (0, 0);
        self.drag_from = None;
    }
}
