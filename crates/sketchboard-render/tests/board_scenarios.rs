//! End-to-end scenarios: a board driven by synthetic input, rendered into a display list.

use kurbo::{Point, Rect, Size, Vec2};
use sketchboard_core::items::{ItemStyle, SerializableColor};
use sketchboard_core::storage::ItemStore;
use sketchboard_core::transformer::HandleKind;
use sketchboard_core::{
    Board, BoardConfig, InputEvent, Item, ItemId, Layer, MemoryStore, Modifiers, Paint, PointerEvent,
    ToolKind, WheelEvent,
};
use sketchboard_render::{DisplayList, DrawCommand};

const EPS: f64 = 1e-9;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Board with an 800x600 surface, no move throttling and a shared memory store.
fn board() -> (Board, MemoryStore) {
    init_logger();
    let store = MemoryStore::new();
    let config = BoardConfig {
        move_throttle_ms: 0.0,
        ..Default::default()
    };
    let mut board = Board::new(config, Box::new(store.clone()));
    board.resize(Size::new(800.0, 600.0));
    (board, store)
}

/// Scripted pointer with a monotonically increasing clock.
struct Pointer {
    clock: f64,
}

impl Pointer {
    fn new() -> Self {
        Self { clock: 0.0 }
    }

    fn event(&mut self, x: f64, y: f64) -> PointerEvent {
        self.clock += 50.0;
        PointerEvent::new(Point::new(x, y)).at(self.clock)
    }

    fn down(&mut self, board: &mut Board, x: f64, y: f64) {
        let event = self.event(x, y);
        board.handle_event(&InputEvent::PointerDown(event));
    }

    fn shift_down(&mut self, board: &mut Board, x: f64, y: f64) {
        let event = self.event(x, y).with_modifiers(Modifiers::shift());
        board.handle_event(&InputEvent::PointerDown(event));
    }

    fn drag(&mut self, board: &mut Board, x: f64, y: f64) {
        let event = self.event(x, y);
        board.handle_event(&InputEvent::PointerMove(event));
    }

    fn up(&mut self, board: &mut Board, x: f64, y: f64) {
        let event = self.event(x, y);
        board.handle_event(&InputEvent::PointerUp(event));
    }

    fn click(&mut self, board: &mut Board, x: f64, y: f64) {
        self.down(board, x, y);
        self.up(board, x, y);
    }
}

fn filled() -> Paint {
    Paint {
        fill_color: Some(SerializableColor::new(250, 200, 80, 255)),
        ..Default::default()
    }
}

fn position(board: &Board, id: ItemId) -> Point {
    board.scene().get(id).unwrap().placement().position
}

#[test]
fn test_rectangle_session_commits_one_item() {
    for (from, to) in [
        (Point::new(100.0, 100.0), Point::new(150.0, 130.0)),
        (Point::new(150.0, 130.0), Point::new(100.0, 100.0)),
    ] {
        let (mut board, store) = board();
        let mut pointer = Pointer::new();
        board.set_tool(ToolKind::Rectangle);
        pointer.down(&mut board, from.x, from.y);
        pointer.drag(&mut board, to.x, to.y);
        pointer.up(&mut board, to.x, to.y);

        assert_eq!(board.scene().len(), 1);
        let id = board.scene().paint_order()[0];
        let props = board.scene().get(id).unwrap().get_props();
        assert_eq!(props.position, Point::new(100.0, 100.0));
        match &props.style {
            ItemStyle::Rectangle(style) => {
                assert_eq!(style.width, 50.0);
                assert_eq!(style.height, 30.0);
            }
            other => panic!("expected a rectangle, got {other:?}"),
        }
        assert!(board.scene().get(id).unwrap().is_interactive());
        assert_eq!(store.get(id), Some(props));
    }
}

#[test]
fn test_selection_replace_add_and_clear() {
    let (mut board, _) = board();
    let a = board.add_item(Item::rectangle(Point::new(100.0, 100.0), 40.0, 40.0, filled()));
    let b = board.add_item(Item::rectangle(Point::new(300.0, 100.0), 40.0, 40.0, filled()));
    let mut pointer = Pointer::new();

    pointer.click(&mut board, 120.0, 120.0);
    assert_eq!(board.transformer().selected_ids(), vec![a]);

    pointer.shift_down(&mut board, 320.0, 120.0);
    pointer.up(&mut board, 320.0, 120.0);
    assert_eq!(board.transformer().selected_ids(), vec![a, b]);

    pointer.click(&mut board, 320.0, 120.0);
    assert_eq!(board.transformer().selected_ids(), vec![b]);

    pointer.click(&mut board, 600.0, 500.0);
    assert!(board.transformer().is_empty());
}

#[test]
fn test_group_translate_preserves_offsets() {
    let (mut board, store) = board();
    // zoomed in so the handles around the group stay clear of the grab point
    board.viewport_mut().set_zoom(10.0);
    board.viewport_mut().offset = Vec2::new(100.0, 100.0);
    let a = board.add_item(Item::rectangle(Point::ZERO, 4.0, 4.0, filled()));
    let b = board.add_item(Item::rectangle(Point::new(10.0, 10.0), 4.0, 4.0, filled()));
    let mut pointer = Pointer::new();

    pointer.click(&mut board, 120.0, 120.0);
    pointer.shift_down(&mut board, 220.0, 220.0);
    pointer.up(&mut board, 220.0, 220.0);
    assert_eq!(board.transformer().selected_ids(), vec![a, b]);

    let writes = store.writes();
    // world (0, 0) to world (5, 5), through many small moves
    pointer.down(&mut board, 100.0, 100.0);
    for step in 1..=10 {
        let s = 100.0 + step as f64 * 5.0;
        pointer.drag(&mut board, s, s);
    }
    assert_eq!(store.writes(), writes);
    pointer.up(&mut board, 150.0, 150.0);

    assert_eq!(position(&board, a), Point::new(5.0, 5.0));
    assert_eq!(position(&board, b), Point::new(15.0, 15.0));
    assert_eq!(store.get(a).unwrap().position, Point::new(5.0, 5.0));
    assert_eq!(store.get(b).unwrap().position, Point::new(15.0, 15.0));
    assert_eq!(store.writes(), writes + 2);
}

#[test]
fn test_group_rotates_rigidly_about_shared_pivot() {
    let (mut board, _) = board();
    board.viewport_mut().offset = Vec2::new(300.0, 300.0);
    // single-sample strokes are dots centered on their position
    let a = board.add_item(Item::brush(Point::ZERO, Paint::default()));
    let b = board.add_item(Item::brush(Point::new(20.0, 0.0), Paint::default()));
    assert_eq!(board.select_in_rect(Rect::new(-10.0, -10.0, 30.0, 10.0)), 2);

    let pivot = board.transformer().center().unwrap();
    assert!((pivot - Point::new(10.0, 0.0)).hypot() < EPS);

    let knob = board
        .transformer()
        .handles(board.viewport())
        .into_iter()
        .find(|h| h.kind == HandleKind::Rotate)
        .unwrap()
        .position;
    let mut pointer = Pointer::new();
    pointer.down(&mut board, knob.x, knob.y);
    // cursor due right of the pivot: a quarter turn from the knob's rest position
    let right = board.viewport().world_to_screen(Point::new(100.0, 0.0));
    pointer.drag(&mut board, right.x, right.y);
    pointer.up(&mut board, right.x, right.y);

    let pa = position(&board, a);
    let pb = position(&board, b);
    assert!((pa - Point::new(10.0, -10.0)).hypot() < 1e-6, "{pa:?}");
    assert!((pb - Point::new(10.0, 10.0)).hypot() < 1e-6, "{pb:?}");
    for id in [a, b] {
        let angle = board.scene().get(id).unwrap().placement().angle;
        assert!((angle - 90.0).abs() < 1e-6);
    }
}

#[test]
fn test_listener_count_is_stable_across_tool_switches() {
    let (mut board, _) = board();
    let baseline = board.listener_count();
    assert!(baseline > 0);
    for _ in 0..5 {
        for kind in ToolKind::ALL {
            board.set_tool(kind);
            assert_eq!(board.listener_count(), baseline);
            assert_eq!(board.tools().router().owners(), vec![kind]);
        }
    }
}

#[test]
fn test_tool_switch_mid_stroke_discards_it() {
    let (mut board, store) = board();
    let mut pointer = Pointer::new();
    board.set_tool(ToolKind::Draw);
    pointer.down(&mut board, 10.0, 10.0);
    pointer.drag(&mut board, 40.0, 40.0);
    board.set_tool(ToolKind::Select);
    pointer.up(&mut board, 40.0, 40.0);
    assert!(board.scene().is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_erase_drag_removes_every_touched_item() {
    let (mut board, store) = board();
    let a = board.add_item(Item::rectangle(Point::new(100.0, 100.0), 40.0, 40.0, filled()));
    let b = board.add_item(Item::rectangle(Point::new(200.0, 100.0), 40.0, 40.0, filled()));
    let c = board.add_item(Item::rectangle(Point::new(100.0, 300.0), 40.0, 40.0, filled()));
    board.set_tool(ToolKind::Erase);

    let mut pointer = Pointer::new();
    pointer.down(&mut board, 120.0, 120.0);
    pointer.drag(&mut board, 170.0, 120.0);
    pointer.drag(&mut board, 220.0, 120.0);
    assert!(board.scene().get(a).unwrap().is_dimmed());
    assert!(board.scene().get(b).unwrap().is_dimmed());
    assert_eq!(board.scene().len(), 3);

    pointer.up(&mut board, 220.0, 120.0);
    assert_eq!(board.scene().paint_order(), vec![c]);
    assert!(store.get(a).is_none());
    assert!(store.get(b).is_none());
    assert!(store.get(c).is_some());
}

#[test]
fn test_frame_is_layered_and_background_follows_the_view() {
    let (mut board, _) = board();
    let a = board.add_item(Item::ellipse(Point::new(100.0, 100.0), 30.0, 20.0, filled()));
    board.select_in_rect(Rect::new(90.0, 90.0, 110.0, 110.0));
    assert!(board.transformer().contains(a));

    let mut list = DisplayList::new();
    board.render(&mut list);
    assert!(list.is_layer_ordered());
    assert_eq!(list.commands_in(Layer::Background).count(), 1);
    // fill and stroke
    assert_eq!(list.commands_in(Layer::Items).count(), 2);
    assert!(list.commands_in(Layer::Handles).count() > 9);
    assert_eq!(list.texture_count(), 1);

    // the tiled area covers the screen with room to spare
    let visible = board.viewport().visible_world_bounds();
    let tiled = match list.commands_in(Layer::Background).next() {
        Some(DrawCommand::Tiled { area, .. }) => *area,
        other => panic!("expected a tiled background, got {other:?}"),
    };
    assert!(tiled.contains(Point::new(visible.x0, visible.y0)));
    assert!(tiled.contains(Point::new(visible.x1 - EPS, visible.y1 - EPS)));

    let regenerations = board.background().regenerations();
    board.handle_event(&InputEvent::Wheel(WheelEvent {
        delta_y: -1.0,
        screen_point: Point::new(400.0, 300.0),
    }));
    assert!(board.background().regenerations() > regenerations);
    assert!((board.viewport().zoom() - 1.1).abs() < EPS);

    board.render(&mut list);
    // the tile texture is reused across frames
    assert_eq!(list.texture_count(), 1);
    assert_eq!(list.frames(), 2);

    board.release(&mut list);
    assert_eq!(list.texture_count(), 0);
}

#[test]
fn test_wheel_zoom_keeps_the_pivot_fixed() {
    let (mut board, _) = board();
    let pivot = Point::new(250.0, 420.0);
    let before = board.viewport().screen_to_world(pivot);
    for delta in [-3.0, -3.0, 5.0, -1.0] {
        board.handle_event(&InputEvent::Wheel(WheelEvent {
            delta_y: delta,
            screen_point: pivot,
        }));
        let after = board.viewport().screen_to_world(pivot);
        assert!((after - before).hypot() < 1e-9);
    }
}

#[test]
fn test_committed_items_survive_a_reload() {
    let (mut board, store) = board();
    let mut pointer = Pointer::new();

    board.set_tool(ToolKind::Draw);
    pointer.down(&mut board, 10.0, 10.0);
    for i in 1..=6 {
        pointer.drag(&mut board, 10.0 + i as f64 * 12.0, 10.0 + (i % 2) as f64 * 9.0);
    }
    pointer.up(&mut board, 90.0, 30.0);

    board.set_tool(ToolKind::Ellipse);
    pointer.down(&mut board, 200.0, 200.0);
    pointer.drag(&mut board, 260.0, 240.0);
    pointer.up(&mut board, 260.0, 240.0);
    assert_eq!(store.len(), 2);

    let mut reloaded = Board::new(BoardConfig::default(), Box::new(store.clone()));
    assert_eq!(reloaded.load_from_store().unwrap(), 2);
    for id in board.scene().paint_order() {
        let original = board.scene().get(id).unwrap();
        let restored = reloaded.scene().get(id).unwrap();
        assert_eq!(restored.get_props(), original.get_props());
        assert_eq!(restored.bounds(), original.bounds());
        assert!(restored.is_interactive());
    }
    assert_eq!(store.load_all().unwrap().len(), 2);
}
