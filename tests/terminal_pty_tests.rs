//! End-to-end PTY-to-grid scenarios: spawn a real shell, feed it a command,
//! and check the decoded [`gridterm_grid::Grid`] afterward.

use std::time::{Duration, Instant};

use gridterm_grid::GLYPH_WIDE_CONT;
use gridterm_term::{SelectionMode, Terminal};
use gridterm_widgets::{base94_decode, base94_encode, WidgetManager};

/// Polls `drain_pty` until `pred` is satisfied or the timeout elapses.
fn wait_for(term: &mut Terminal, widgets: &mut WidgetManager, mut pred: impl FnMut(&Terminal) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        term.drain_pty(widgets).expect("drain_pty");
        if pred(term) {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("condition not met before timeout");
}

fn row_codepoints(term: &Terminal, row: u16, cols: u16) -> Vec<u32> {
    (0..cols)
        .map(|col| term.grid().get_cell(col, row).unwrap().glyph_index)
        .collect()
}

#[test]
fn hello_world_with_color_lands_in_the_grid() {
    let mut widgets = WidgetManager::new();
    let mut term = Terminal::start("printf '\\033[31mhi\\033[0m'", 20, 5).expect("start");

    wait_for(&mut term, &mut widgets, |t| {
        row_codepoints(t, 0, 20).iter().take(2).copied().eq(['h' as u32, 'i' as u32])
    });

    let cell = term.grid().get_cell(0, 0).unwrap();
    assert_eq!(cell.glyph_index, 'h' as u32);
    // SGR 31 (red) should resolve to the ANSI red entry, not the default fg.
    assert_eq!(cell.fg, [0xcd, 0x00, 0x00, 0xff]);
}

#[test]
fn wide_character_occupies_two_cells() {
    let mut widgets = WidgetManager::new();
    // U+4E2D ("中"), a double-width CJK character.
    let mut term = Terminal::start("printf '\\344\\270\\255'", 10, 3).expect("start");

    wait_for(&mut term, &mut widgets, |t| {
        t.grid().get_cell(0, 0).unwrap().glyph_index == 0x4E2D
    });

    let second = term.grid().get_cell(1, 0).unwrap();
    assert_eq!(second.glyph_index, GLYPH_WIDE_CONT);
}

#[test]
fn scrollback_grows_when_output_exceeds_the_screen() {
    let mut widgets = WidgetManager::new();
    let mut term = Terminal::start("seq 1 50", 20, 5).expect("start");

    // Wait for the shell to finish: last visible row should read "50".
    wait_for(&mut term, &mut widgets, |t| {
        row_codepoints(t, 4, 20).iter().take(2).copied().eq(['5' as u32, '0' as u32])
    });

    let before = row_codepoints(&term, 0, 20);
    term.scroll_up(1, &mut widgets);
    let after = row_codepoints(&term, 0, 20);

    // Scrolling back one line should pull an evicted row out of scrollback,
    // replacing what was on-screen — proof the ring actually captured history.
    assert_ne!(before, after);
}

#[test]
fn base94_round_trips_arbitrary_bytes() {
    let payload = b"widget create id=42 kind=plot\x00\x01\xff";
    let encoded = base94_encode(payload);
    assert!(encoded.is_ascii());
    let decoded = base94_decode(&encoded);
    assert_eq!(decoded, payload);
}

#[test]
fn widget_create_via_osc_marks_the_grid_and_relative_placement_advances_cursor() {
    struct Probe;
    impl gridterm_widgets::Widget for Probe {
        fn init(&mut self, _payload: &[u8]) -> anyhow::Result<()> {
            Ok(())
        }
        fn render(
            &mut self,
            _gpu: &dyn gridterm_widgets::GpuContext,
            _encoder: &mut wgpu::CommandEncoder,
            _frame_view: &wgpu::TextureView,
            _screen_size: (u32, u32),
            _pixel_rect: gridterm_widgets::PixelRect,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    let mut widgets = WidgetManager::new();
    widgets.register_plugin("probe", Box::new(|| Box::new(Probe)));

    let mut term = Terminal::start(
        "printf '\\033]99999;probe;A;2;2;3;3;\\007'",
        20,
        10,
    )
    .expect("start");

    wait_for(&mut term, &mut widgets, |t| t.grid().get_widget_id(2, 2) != 0);
    assert_eq!(term.grid().get_widget_id(4, 4), term.grid().get_widget_id(2, 2));

    // Relative placement (mode "R") advances the cursor by the widget's
    // height past wherever the cursor sits when the command is issued.
    let mut rel_term = Terminal::start(
        "printf 'xy\\033]99999;probe;R;0;0;4;3;\\007done'",
        20,
        10,
    )
    .expect("start");
    // The widget reports advance_lines=3 (its height); "done" should land on
    // row 3, not immediately after "xy" on row 0.
    wait_for(&mut rel_term, &mut widgets, |t| {
        row_codepoints(t, 3, 20).iter().take(4).copied().eq(['d' as u32, 'o' as u32, 'n' as u32, 'e' as u32])
    });
}

#[test]
fn selected_cells_get_fg_and_bg_swapped() {
    let mut widgets = WidgetManager::new();
    let mut term = Terminal::start("printf '\\033[31mhi\\033[0m there'", 20, 5).expect("start");

    wait_for(&mut term, &mut widgets, |t| {
        row_codepoints(t, 0, 20).iter().take(2).copied().eq(['h' as u32, 'i' as u32])
    });

    let before = term.grid().get_cell(0, 0).unwrap();
    let (before_fg, before_bg) = (before.fg, before.bg);

    term.start_selection(SelectionMode::Character, 0, 0);
    term.extend_selection(1, 0);
    term.drain_pty(&mut widgets).expect("drain_pty");

    let selected = term.grid().get_cell(0, 0).unwrap();
    assert_eq!(selected.fg, [before_bg[0], before_bg[1], before_bg[2], before_fg[3]]);
    assert_eq!(selected.bg, [before_fg[0], before_fg[1], before_fg[2]]);

    // A cell outside the selection keeps its original colors.
    let untouched = term.grid().get_cell(10, 0).unwrap();
    assert_ne!(untouched.fg, selected.fg);

    term.clear_selection();
    term.drain_pty(&mut widgets).expect("drain_pty");
    let restored = term.grid().get_cell(0, 0).unwrap();
    assert_eq!(restored.fg, before_fg);
    assert_eq!(restored.bg, before_bg);
}
