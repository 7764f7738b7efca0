use ratatui::layout::Rect;

use termassign::palette::{default_groups, PaletteGroup, PaletteItem, SymbolPalette};
use termassign::ui::palette::{hit_test, palette_rect, PaletteHit, PALETTE_WIDTH};

#[test]
fn test_default_groups() {
    let groups = default_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, "Operations");
    assert_eq!(groups[0].items.len(), 8);
    assert_eq!(groups[0].items[0].symbol, r"\frac");
    assert_eq!(groups[0].items[2].symbol, r"^{\square}");
    assert_eq!(groups[1].title, "Symbols");
    let symbols: Vec<&str> = groups[1].items.iter().map(|i| i.symbol.as_str()).collect();
    assert_eq!(symbols, vec![r"\pi", r"\theta", r"\alpha", r"\beta", r"\gamma"]);
}

#[test]
fn test_empty_group_list_falls_back_to_defaults() {
    let palette = SymbolPalette::new(Vec::new());
    assert_eq!(palette.groups(), default_groups().as_slice());
}

#[test]
fn test_tabs_wrap() {
    let mut palette = SymbolPalette::default();
    assert_eq!(palette.tab(), 0);
    palette.next_tab();
    assert_eq!(palette.current_group().title, "Symbols");
    palette.next_tab();
    assert_eq!(palette.tab(), 0);
    palette.prev_tab();
    assert_eq!(palette.tab(), 1);
    palette.select_tab(7);
    assert_eq!(palette.tab(), 1);
}

#[test]
fn test_choose_reads_current_tab() {
    let mut palette = SymbolPalette::default();
    assert_eq!(palette.choose(1).as_deref(), Some(r"\sqrt"));
    palette.select_tab(1);
    assert_eq!(palette.choose(0).as_deref(), Some(r"\pi"));
    assert_eq!(palette.choose(5), None);
}

#[test]
fn test_click_is_press_and_release_on_same_item() {
    let mut palette = SymbolPalette::default();
    palette.press_item(4);
    assert_eq!(palette.pressed(), Some(4));
    assert_eq!(palette.release_item(Some(4)).as_deref(), Some(r"\sin"));
    assert_eq!(palette.pressed(), None);

    palette.press_item(4);
    assert_eq!(palette.release_item(Some(5)), None);
    palette.press_item(4);
    assert_eq!(palette.release_item(None), None);

    // Release without a press does nothing
    assert_eq!(palette.release_item(Some(4)), None);
}

#[test]
fn test_press_out_of_range_is_ignored() {
    let mut palette = SymbolPalette::default();
    palette.press_item(42);
    assert_eq!(palette.pressed(), None);
}

#[test]
fn test_switching_tab_cancels_press() {
    let mut palette = SymbolPalette::default();
    palette.press_item(0);
    palette.next_tab();
    assert_eq!(palette.release_item(Some(0)), None);
}

#[test]
fn test_drag_moves_offset() {
    let mut palette = SymbolPalette::default();
    assert!(!palette.is_dragging());
    palette.begin_drag(40, 10);
    palette.drag_to(45, 8);
    palette.drag_to(43, 9);
    palette.end_drag();

    assert!(!palette.is_dragging());
    assert_eq!(palette.offset(), (3, -1));

    // Movement after the drag ended is ignored
    palette.drag_to(0, 0);
    assert_eq!(palette.offset(), (3, -1));

    palette.reset_position();
    assert_eq!(palette.offset(), (0, 0));
}

#[test]
fn test_custom_groups() {
    let palette = SymbolPalette::new(vec![PaletteGroup {
        title: "Calc".to_string(),
        items: vec![PaletteItem {
            label: "∫".to_string(),
            symbol: r"\int".to_string(),
        }],
    }]);
    assert_eq!(palette.groups().len(), 1);
    assert_eq!(palette.choose(0).as_deref(), Some(r"\int"));
}

#[test]
fn test_overlay_sits_beside_field() {
    let palette = SymbolPalette::default();
    let bounds = Rect::new(0, 1, 120, 40);
    let field = Rect::new(2, 10, 56, 3);

    let rect = palette_rect(&palette, field, bounds);
    assert_eq!(rect.x, 59);
    assert_eq!(rect.y, 10);
    assert_eq!(rect.width, PALETTE_WIDTH);
    // Tallest tab plus borders and the tab row
    assert_eq!(rect.height, 11);
}

#[test]
fn test_overlay_stays_inside_bounds() {
    let mut palette = SymbolPalette::default();
    palette.begin_drag(10, 10);
    palette.drag_to(200, 200);
    palette.end_drag();

    let bounds = Rect::new(0, 1, 80, 24);
    let rect = palette_rect(&palette, Rect::new(2, 5, 56, 3), bounds);
    assert_eq!(rect.x + rect.width, 80);
    assert_eq!(rect.y + rect.height, 25);
}

#[test]
fn test_hit_test_regions() {
    let palette = SymbolPalette::default();
    let rect = Rect::new(60, 5, PALETTE_WIDTH, 11);

    assert_eq!(hit_test(&palette, rect, 59, 5), None);
    assert_eq!(hit_test(&palette, rect, 70, 5), Some(PaletteHit::TitleBar));
    // " Operations " starts right after the left border
    assert_eq!(hit_test(&palette, rect, 61, 6), Some(PaletteHit::Tab(0)));
    assert_eq!(hit_test(&palette, rect, 74, 6), Some(PaletteHit::Tab(1)));
    assert_eq!(hit_test(&palette, rect, 65, 7), Some(PaletteHit::Item(0)));
    assert_eq!(hit_test(&palette, rect, 65, 14), Some(PaletteHit::Item(7)));
    assert_eq!(hit_test(&palette, rect, 65, 15), Some(PaletteHit::Body));
}
