//! The board: one scene, one viewport, one selection, one set of tools.
//!
//! [`Board`] is the explicit application object a host creates once per drawing
//! surface. It owns every piece of mutable state and is driven from a single event
//! thread through [`Board::handle_event`], which never fails: missing items are
//! no-ops, zoom is clamped and persistence errors are logged.

use crate::background::Background;
use crate::camera::Viewport;
use crate::config::BoardConfig;
use crate::error::BoardResult;
use crate::input::{InputEvent, KeyEvent, MouseButton, PointerEvent};
use crate::items::{Item, ItemId, ItemProps};
use crate::render::Renderer;
use crate::scene::Scene;
use crate::storage::ItemStore;
use crate::tools::{ToolBox, ToolKind};
use crate::transformer::Transformer;
use kurbo::{Point, Rect, Size, Vec2};

/// State shared by every tool.
pub struct BoardState {
    pub scene: Scene,
    pub transformer: Transformer,
    pub viewport: Viewport,
    pub background: Background,
    pub store: Box<dyn ItemStore>,
    pub config: BoardConfig,
}

impl std::fmt::Debug for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardState")
            .field("items", &self.scene.len())
            .field("selected", &self.transformer.selection().len())
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl BoardState {
    pub fn new(config: BoardConfig, store: Box<dyn ItemStore>) -> Self {
        Self {
            scene: Scene::new(),
            transformer: Transformer::new(config.transformer()),
            viewport: Viewport::new(config.min_zoom, config.max_zoom),
            background: Background::new(config.background.clone()),
            store,
            config,
        }
    }

    /// Hit-test tolerance in world units, constant on screen at every zoom.
    pub fn world_tolerance(&self) -> f64 {
        self.config.hit_tolerance / self.viewport.zoom()
    }

    /// Pan by a screen delta and refresh the background area.
    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.background.regenerate(&self.viewport);
    }

    /// Write the committed state of an item to the store.
    pub fn persist(&mut self, id: ItemId) {
        let Some(item) = self.scene.get(id) else {
            log::debug!("not persisting missing item {id}");
            return;
        };
        if !item.is_interactive() {
            return;
        }
        if let Err(e) = self.store.set_item(&item.get_props()) {
            log::warn!("failed to persist item {id}: {e}");
        }
    }

    pub fn persist_removal(&mut self, props: &ItemProps) {
        if let Err(e) = self.store.remove_item(props) {
            log::warn!("failed to remove item {} from storage: {e}", props.id);
        }
    }

    /// Destroy an item, drop it from the selection and from the store.
    ///
    /// Returns false if the item was already gone.
    pub fn delete_item(&mut self, id: ItemId) -> bool {
        let Some(item) = self.scene.get(id) else {
            return false;
        };
        let props = item.get_props();
        let was_committed = item.is_interactive();
        self.scene.remove(id);
        self.transformer.remove(&self.scene, id);
        if was_committed {
            self.persist_removal(&props);
        }
        log::debug!("deleted item {id}");
        true
    }
}

/// Viewport drag that bypasses the tools: middle button or two fingers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Navigation {
    Idle,
    Dragging { last: Point },
}

/// An interactive whiteboard.
#[derive(Debug)]
pub struct Board {
    state: BoardState,
    tools: ToolBox,
    navigation: Navigation,
}

impl Board {
    pub fn new(config: BoardConfig, store: Box<dyn ItemStore>) -> Self {
        let tools = ToolBox::new(config.move_throttle_ms);
        Self {
            state: BoardState::new(config, store),
            tools,
            navigation: Navigation::Idle,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.state.viewport
    }

    /// Direct viewport access for hosts that restore a saved view.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.state.viewport
    }

    pub fn transformer(&self) -> &Transformer {
        &self.state.transformer
    }

    pub fn transformer_mut(&mut self) -> &mut Transformer {
        &mut self.state.transformer
    }

    pub fn background(&self) -> &Background {
        &self.state.background
    }

    pub fn config(&self) -> &BoardConfig {
        &self.state.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.active()
    }

    pub fn tools(&self) -> &ToolBox {
        &self.tools
    }

    /// Number of installed tool listeners. Constant across tool switches.
    pub fn listener_count(&self) -> usize {
        self.tools.router().listener_count()
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        self.tools.set_tool(kind, &mut self.state);
    }

    /// Feed one input event through the board.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown(pointer) => self.pointer_down(pointer, event),
            InputEvent::PointerMove(pointer) => self.pointer_move(pointer, event),
            InputEvent::PointerUp(pointer) | InputEvent::PointerUpOutside(pointer) => {
                if self.navigation != Navigation::Idle {
                    self.navigation = Navigation::Idle;
                    if pointer.button == MouseButton::Middle || pointer.is_multi_touch() {
                        return;
                    }
                }
                self.tools.dispatch(&mut self.state, event);
            }
            InputEvent::Wheel(wheel) => {
                let step = self.state.config.zoom_step;
                self.state.viewport.zoom_at(wheel.delta_y, wheel.screen_point, step);
                self.state.background.regenerate(&self.state.viewport);
            }
            InputEvent::Pinch { center, scale } => {
                self.state.viewport.zoom_by(*scale, *center);
                self.state.background.regenerate(&self.state.viewport);
            }
            InputEvent::LongPress { .. } => self.tools.dispatch(&mut self.state, event),
            InputEvent::Key(key) => self.key(key),
        }
    }

    fn pointer_down(&mut self, pointer: &PointerEvent, event: &InputEvent) {
        if pointer.is_multi_touch() {
            // a second finger aborts whatever the single-pointer tool was doing
            self.tools.cancel_active(&mut self.state);
            self.navigation = Navigation::Dragging {
                last: pointer.screen_point,
            };
            return;
        }
        if pointer.button == MouseButton::Middle {
            self.navigation = Navigation::Dragging {
                last: pointer.screen_point,
            };
            return;
        }
        self.tools.dispatch(&mut self.state, event);
    }

    fn pointer_move(&mut self, pointer: &PointerEvent, event: &InputEvent) {
        if pointer.is_multi_touch() && self.tools.is_gesture_active() {
            self.tools.cancel_active(&mut self.state);
        }
        match self.navigation {
            Navigation::Dragging { last } => {
                self.state.pan(pointer.screen_point - last);
                self.navigation = Navigation::Dragging {
                    last: pointer.screen_point,
                };
            }
            Navigation::Idle if pointer.is_multi_touch() => {
                self.navigation = Navigation::Dragging {
                    last: pointer.screen_point,
                };
            }
            Navigation::Idle => self.tools.dispatch(&mut self.state, event),
        }
    }

    fn key(&mut self, key: &KeyEvent) {
        match key.key.as_str() {
            "Delete" | "Backspace" => {
                if !self.tools.is_gesture_active() {
                    self.delete_selected();
                }
            }
            "Escape" => {
                self.tools.cancel_active(&mut self.state);
                self.state.transformer.clear();
            }
            _ => {}
        }
    }

    /// Erase every selected item. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.state.transformer.selected_ids();
        let removed = ids.into_iter().filter(|id| self.state.delete_item(*id)).count();
        self.state.transformer.clear();
        removed
    }

    /// Replace the selection with every item intersecting a world rectangle.
    pub fn select_in_rect(&mut self, rect: Rect) -> usize {
        let ids = self.state.scene.items_in_rect(rect);
        let count = ids.len();
        self.state.transformer.set_selection(&self.state.scene, ids);
        count
    }

    /// Select every item intersecting the visible area.
    pub fn select_visible(&mut self) -> usize {
        self.select_in_rect(self.state.viewport.visible_world_bounds())
    }

    pub fn bring_to_front(&mut self, id: ItemId) {
        for changed in self.state.scene.bring_to_front(id) {
            self.state.persist(changed);
        }
    }

    pub fn send_to_back(&mut self, id: ItemId) {
        for changed in self.state.scene.send_to_back(id) {
            self.state.persist(changed);
        }
    }

    /// Insert a committed item, e.g. pasted or created programmatically, and persist it.
    pub fn add_item(&mut self, mut item: Item) -> ItemId {
        item.finalize();
        let id = self.state.scene.insert(item);
        self.state.persist(id);
        id
    }

    /// Rebuild the scene from the store. Returns the number of items loaded.
    pub fn load_from_store(&mut self) -> BoardResult<usize> {
        let records = self.state.store.load_all()?;
        self.tools.cancel_active(&mut self.state);
        self.state.transformer.clear();
        self.state.scene.clear();
        for props in &records {
            self.state.scene.insert(Item::from_props(props));
        }
        log::info!("loaded {} item(s) from storage", records.len());
        Ok(records.len())
    }

    pub fn resize(&mut self, size: Size) {
        self.state.viewport.resize(size);
        self.state.background.regenerate(&self.state.viewport);
    }

    /// Draw one frame: background, items in paint order, then handles.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let view = self.state.viewport.transform();
        renderer.begin_frame();
        self.state.background.regenerate(&self.state.viewport);
        self.state.background.draw(renderer, view);
        for item in self.state.scene.items_ordered() {
            item.draw(renderer, view);
        }
        self.state.transformer.draw(renderer, &self.state.viewport);
    }

    /// Release renderer resources held by the board.
    pub fn release(&mut self, renderer: &mut dyn Renderer) {
        self.state.background.release(renderer);
    }
}
