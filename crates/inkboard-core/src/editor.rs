//! Board editor: the interaction state machine and page lifecycle.
//!
//! The editor owns the current page's strokes, the viewport, selection and
//! undo history, and reduces raw pointer events into edits. It is
//! renderer-agnostic; the host draws from the editor's state and performs
//! the storage fetches the editor requests on page switches.

use std::collections::HashMap;
use std::mem;

use chrono::{SecondsFormat, Utc};
use kurbo::Point;
use uuid::Uuid;

use crate::bounds::stroke_bounds;
use crate::capture::{Brush, CaptureEngine};
use crate::hit::{stroke_at_point, strokes_in_lasso};
use crate::history::{History, Snapshot};
use crate::input::{Modifiers, MouseButton, PointerEvent, PointerId};
use crate::page::{Page, PageCache, PageContent, PageStyle, DEFAULT_BACKGROUND};
use crate::selection::Selection;
use crate::stroke::{Stroke, StrokeId, Tool, DEFAULT_FONT_SIZE};
use crate::transform::{
    drag_handle, handle_positions, move_stroke, resize_stroke, selection_box, Handle,
};
use crate::viewport::{Pinch, Viewport};

/// Screen-pixel distance separating a click from a drag. Measured in
/// screen space so the feel does not change with zoom.
pub const CLICK_DRAG_THRESHOLD: f64 = 5.0;

/// Screen-pixel radius for grabbing a resize handle.
pub const HANDLE_HIT_RADIUS: f64 = 8.0;

/// A side effect the host must perform for the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Open a text input at the given scene position.
    PlaceTextCursor { scene: Point },
}

/// A storage fetch the host should run after a page switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub page_id: String,
}

/// Appearance for newly inserted text.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// What the active pointer gesture is doing.
#[derive(Debug)]
enum Interaction {
    Idle,
    /// Pointer is down but has not crossed the click/drag threshold.
    Pending {
        pointer: PointerId,
        start_screen: Point,
        start_scene: Point,
    },
    /// Dragging the selected strokes.
    Moving {
        pointer: PointerId,
        last_scene: Point,
    },
    /// Dragging one resize handle of a single selected stroke.
    Resizing {
        pointer: PointerId,
        id: StrokeId,
        handle: Handle,
    },
    /// Sketching a lasso polygon.
    Lasso {
        pointer: PointerId,
        points: Vec<Point>,
    },
    /// Dragging the viewport.
    Panning {
        pointer: PointerId,
        last_screen: Point,
    },
    /// Two-finger pinch zoom.
    Pinching {
        first: PointerId,
        second: PointerId,
        pinch: Pinch,
    },
}

impl Interaction {
    fn owner(&self) -> Option<PointerId> {
        match *self {
            Interaction::Idle => None,
            Interaction::Pending { pointer, .. }
            | Interaction::Moving { pointer, .. }
            | Interaction::Resizing { pointer, .. }
            | Interaction::Lasso { pointer, .. }
            | Interaction::Panning { pointer, .. } => Some(pointer),
            Interaction::Pinching { .. } => None,
        }
    }
}

/// The whiteboard editor for one open board.
pub struct Editor {
    tool: Tool,
    brush: Brush,
    viewport: Viewport,
    capture: CaptureEngine,
    selection: Selection,

    strokes: Vec<Stroke>,
    background_color: String,
    page_style: PageStyle,

    history: History,
    cache: PageCache,
    pages: Vec<Page>,
    current_page_id: Option<String>,
    /// True while the current page awaits its first fetch (cache miss).
    loading: bool,

    interaction: Interaction,
    /// Last known screen position per live touch, for pinch tracking.
    touch_positions: HashMap<PointerId, Point>,
    text_editing: bool,
    dirty: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            tool: Tool::default(),
            brush: Brush::default(),
            viewport: Viewport::new(),
            capture: CaptureEngine::new(),
            selection: Selection::new(),
            strokes: Vec::new(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            page_style: PageStyle::default(),
            history: History::new(Snapshot {
                strokes: Vec::new(),
                background_color: DEFAULT_BACKGROUND.to_string(),
            }),
            cache: PageCache::new(),
            pages: Vec::new(),
            current_page_id: None,
            loading: false,
            interaction: Interaction::Idle,
            touch_positions: HashMap::new(),
            text_editing: false,
            dirty: false,
        }
    }

    // --- accessors ---

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn page_style(&self) -> PageStyle {
        self.page_style
    }

    pub fn current_page_id(&self) -> Option<&str> {
        self.current_page_id.as_deref()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn is_text_editing(&self) -> bool {
        self.text_editing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// In-progress strokes, for live rendering.
    pub fn active_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.capture.active_strokes()
    }

    /// True once any content changed since the flag was last taken.
    /// Hosts feed this into the auto-save manager.
    pub fn take_dirty(&mut self) -> bool {
        mem::take(&mut self.dirty)
    }

    // --- tool and brush ---

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        self.tool = tool;
        if !matches!(tool, Tool::Select | Tool::Lasso) {
            self.selection.clear();
        }
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    // --- content edits ---

    fn record_snapshot(&mut self) {
        self.history.record(Snapshot {
            strokes: self.strokes.clone(),
            background_color: self.background_color.clone(),
        });
        self.dirty = true;
    }

    fn commit_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
        self.record_snapshot();
    }

    /// Append a finished stroke (programmatic or imported).
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.commit_stroke(stroke);
    }

    /// Edit a stroke in place. Returns false when the id does not exist.
    pub fn update_stroke<F: FnOnce(&mut Stroke)>(&mut self, id: StrokeId, f: F) -> bool {
        let Some(stroke) = self.strokes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        f(stroke);
        self.record_snapshot();
        true
    }

    /// Resize one stroke to target bounds. Missing ids are no-ops.
    pub fn resize_stroke_to(&mut self, id: StrokeId, bounds: crate::bounds::Bounds) -> bool {
        self.update_stroke(id, |stroke| resize_stroke(stroke, bounds))
    }

    pub fn delete_strokes(&mut self, ids: &[StrokeId]) {
        let before = self.strokes.len();
        self.strokes.retain(|s| !ids.contains(&s.id));
        if self.strokes.len() == before {
            return;
        }
        for &id in ids {
            self.selection.remove(id);
        }
        self.record_snapshot();
    }

    /// Replace the stroke list wholesale (import).
    pub fn replace_all_strokes(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
        self.selection.clear();
        self.record_snapshot();
    }

    pub fn clear_page(&mut self) {
        if self.strokes.is_empty() {
            return;
        }
        self.strokes.clear();
        self.selection.clear();
        self.record_snapshot();
    }

    pub fn set_background_color(&mut self, color: &str) {
        if self.background_color == color {
            return;
        }
        self.background_color = color.to_string();
        self.record_snapshot();
    }

    /// Page style changes persist but are not undo steps.
    pub fn set_page_style(&mut self, style: PageStyle) {
        if self.page_style != style {
            self.page_style = style;
            self.dirty = true;
        }
    }

    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let ids: Vec<StrokeId> = self.selection.ids().to_vec();
        self.strokes.retain(|s| !ids.contains(&s.id));
        self.selection.clear();
        self.record_snapshot();
    }

    /// Commit a text entry started by `EditorAction::PlaceTextCursor`.
    /// Empty text ends the entry without creating a stroke.
    pub fn insert_text(&mut self, scene: Point, text: &str, style: &TextStyle) {
        self.text_editing = false;
        if text.trim().is_empty() {
            return;
        }
        let stroke = Stroke {
            id: Uuid::new_v4(),
            tool: Tool::Text,
            points: vec![scene],
            color: self.brush.color.clone(),
            // Text strokes store the font size as their width on the wire.
            width: style.font_size,
            opacity: 1.0,
            page_id: self.current_page_id.clone().unwrap_or_default(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            shape: None,
            text: Some(text.to_string()),
            font_family: Some(style.font_family.clone()),
            font_size: Some(style.font_size),
            font_weight: None,
            font_style: None,
            text_decoration: None,
            text_align: None,
        };
        self.commit_stroke(stroke);
    }

    /// The host opened its text input.
    pub fn begin_text_entry(&mut self) {
        self.text_editing = true;
    }

    /// The host dismissed its text input without committing.
    pub fn cancel_text_entry(&mut self) {
        self.text_editing = false;
    }

    // --- undo/redo ---

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.apply_snapshot(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.apply_snapshot(snapshot);
        true
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.strokes = snapshot.strokes;
        self.background_color = snapshot.background_color;
        // Drop selected ids that no longer exist.
        let keep: Vec<StrokeId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| self.strokes.iter().any(|s| s.id == *id))
            .collect();
        self.selection.set(keep);
        self.dirty = true;
    }

    // --- pages ---

    /// The current page's persistable content.
    pub fn snapshot_content(&self) -> PageContent {
        PageContent {
            strokes: self.strokes.clone(),
            background_color: self.background_color.clone(),
            page_style: self.page_style,
        }
    }

    /// Open a page with known content, bypassing cache and fetch.
    pub fn open_page(&mut self, page_id: &str, content: PageContent) {
        self.current_page_id = Some(page_id.to_string());
        self.cache.insert(page_id, content.clone());
        self.apply_content(content);
        self.loading = false;
    }

    fn apply_content(&mut self, content: PageContent) {
        self.strokes = content.strokes;
        self.background_color = content.background_color;
        self.page_style = content.page_style;
        self.selection.clear();
        self.capture.clear();
        self.interaction = Interaction::Idle;
        self.history.reset(Snapshot {
            strokes: self.strokes.clone(),
            background_color: self.background_color.clone(),
        });
        self.dirty = false;
    }

    /// Switch to another page.
    ///
    /// The outgoing page is snapshotted into the cache. The target is
    /// applied optimistically from the cache (or shown empty), and the
    /// returned fetch asks the host to revalidate against storage.
    pub fn switch_to(&mut self, page_id: &str) -> Option<PageFetch> {
        if self.current_page_id.as_deref() == Some(page_id) {
            return None;
        }
        if let Some(current) = self.current_page_id.clone() {
            self.cache.insert(&current, self.snapshot_content());
        }
        self.current_page_id = Some(page_id.to_string());
        match self.cache.get(page_id).cloned() {
            Some(cached) => {
                self.apply_content(cached);
                self.loading = false;
            }
            None => {
                self.apply_content(PageContent::default());
                self.loading = true;
            }
        }
        Some(PageFetch {
            page_id: page_id.to_string(),
        })
    }

    /// Register a page in the board's page list.
    pub fn add_page(&mut self, page: Page) {
        if self.pages.iter().any(|p| p.id == page.id) {
            return;
        }
        self.pages.push(page);
        self.pages.sort_by_key(|p| p.order);
    }

    /// Remove a page. If it was current, the nearest remaining neighbor is
    /// opened (previous in order, else next); the return value carries the
    /// resulting fetch, if any.
    pub fn remove_page(&mut self, page_id: &str) -> Option<PageFetch> {
        let index = self.pages.iter().position(|p| p.id == page_id)?;
        self.pages.remove(index);
        self.cache.remove(page_id);
        if self.current_page_id.as_deref() != Some(page_id) {
            return None;
        }
        let neighbor = self
            .pages
            .get(index.saturating_sub(1))
            .or_else(|| self.pages.get(index))
            .map(|p| p.id.clone());
        self.current_page_id = None;
        match neighbor {
            Some(id) => self.switch_to(&id),
            None => {
                self.apply_content(PageContent::default());
                None
            }
        }
    }

    /// Deliver the result of a `PageFetch`.
    ///
    /// The cache always takes the fresh content; the live state only does
    /// if the user is still on that page and has not edited it since the
    /// fetch was issued. Local edits win over the fetched copy.
    pub fn apply_fetched(&mut self, page_id: &str, content: PageContent) {
        self.cache.insert(page_id, content.clone());
        if self.current_page_id.as_deref() != Some(page_id) {
            log::debug!("Fetched {} after switching away; cached only", page_id);
            return;
        }
        // History is reset on every page switch, so any undoable step
        // means the page was edited while the fetch was in flight.
        if self.history.can_undo() {
            log::debug!("Fetched {} after local edits; cached only", page_id);
            self.loading = false;
            return;
        }
        self.apply_content(content);
        self.loading = false;
    }

    /// A `PageFetch` failed. The optimistic state stays on screen.
    pub fn fetch_failed(&mut self, page_id: &str, error: &dyn std::fmt::Display) {
        log::warn!("Failed to load page {}: {}", page_id, error);
        if self.current_page_id.as_deref() == Some(page_id) {
            self.loading = false;
        }
    }

    // --- pointer reduction ---

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<EditorAction> {
        match event {
            PointerEvent::Down {
                pointer,
                position,
                button,
                modifiers,
            } => self.pointer_down(pointer, position, button, modifiers),
            PointerEvent::Move {
                pointer, position, ..
            } => self.pointer_move(pointer, position),
            PointerEvent::Up {
                pointer, position, ..
            } => self.pointer_up(pointer, position),
            PointerEvent::Cancel { pointer } => {
                self.pointer_cancel(pointer);
                None
            }
        }
    }

    fn pointer_down(
        &mut self,
        pointer: PointerId,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Option<EditorAction> {
        if matches!(pointer, PointerId::Touch(_)) {
            self.touch_positions.insert(pointer, position);
        }
        // While a text input is open the host owns the pointer.
        if self.text_editing {
            return None;
        }
        if button == MouseButton::Middle || modifiers.space {
            self.interaction = Interaction::Panning {
                pointer,
                last_screen: position,
            };
            return None;
        }
        // Second touch in select mode starts a pinch.
        if self.tool == Tool::Select && matches!(pointer, PointerId::Touch(_)) {
            let other = self
                .touch_positions
                .iter()
                .find(|(id, _)| **id != pointer)
                .map(|(id, p)| (*id, *p));
            if let Some((other_id, other_pos)) = other {
                if let Some(pinch) = self.viewport.begin_pinch(other_pos, position) {
                    self.interaction = Interaction::Pinching {
                        first: other_id,
                        second: pointer,
                        pinch,
                    };
                }
                return None;
            }
        }

        let scene = self.viewport.screen_to_scene(position);
        match self.tool {
            Tool::Select => {
                if self.selection.len() == 1 {
                    if let Some((id, handle)) = self.handle_at(position) {
                        self.interaction = Interaction::Resizing {
                            pointer,
                            id,
                            handle,
                        };
                        return None;
                    }
                }
                if let Some(stroke) = stroke_at_point(scene, &self.strokes) {
                    let id = stroke.id;
                    if modifiers.shift {
                        self.selection.toggle(id);
                    } else if self.selection.contains(id) {
                        self.interaction = Interaction::Moving {
                            pointer,
                            last_scene: scene,
                        };
                    } else {
                        self.selection.set(vec![id]);
                    }
                    return None;
                }
                self.selection.clear();
                // Empty-canvas press: may become a pen drag.
                self.interaction = Interaction::Pending {
                    pointer,
                    start_screen: position,
                    start_scene: scene,
                };
                None
            }
            Tool::Lasso => {
                self.interaction = Interaction::Lasso {
                    pointer,
                    points: vec![scene],
                };
                None
            }
            _ => {
                match pointer {
                    // Mouse defers drawing until the drag threshold, so a
                    // plain click can become a text cursor instead.
                    PointerId::Mouse => {
                        self.interaction = Interaction::Pending {
                            pointer,
                            start_screen: position,
                            start_scene: scene,
                        };
                    }
                    PointerId::Touch(_) => {
                        let page_id = self.current_page_id.clone().unwrap_or_default();
                        self.capture
                            .begin(pointer, self.tool, scene, &self.brush, &page_id);
                    }
                }
                None
            }
        }
    }

    fn pointer_move(&mut self, pointer: PointerId, position: Point) -> Option<EditorAction> {
        if matches!(pointer, PointerId::Touch(_)) {
            self.touch_positions.insert(pointer, position);
        }

        let pinch_state = match &self.interaction {
            Interaction::Pinching {
                first,
                second,
                pinch,
            } => Some((*first, *second, pinch.clone())),
            _ => None,
        };
        if let Some((first, second, pinch)) = pinch_state {
            if pointer == first || pointer == second {
                if let (Some(&a), Some(&b)) = (
                    self.touch_positions.get(&first),
                    self.touch_positions.get(&second),
                ) {
                    self.viewport.update_pinch(&pinch, a, b);
                }
            }
            return None;
        }

        if self.interaction.owner() == Some(pointer) {
            let scene = self.viewport.screen_to_scene(position);
            match &mut self.interaction {
                Interaction::Panning { last_screen, .. } => {
                    let delta = position - *last_screen;
                    *last_screen = position;
                    self.viewport.pan(delta);
                    return None;
                }
                Interaction::Lasso { points, .. } => {
                    points.push(scene);
                    return None;
                }
                _ => {}
            }
            match self.interaction {
                Interaction::Moving { last_scene, .. } => {
                    let dx = scene.x - last_scene.x;
                    let dy = scene.y - last_scene.y;
                    if let Interaction::Moving { last_scene, .. } = &mut self.interaction {
                        *last_scene = scene;
                    }
                    let ids: Vec<StrokeId> = self.selection.ids().to_vec();
                    for stroke in self.strokes.iter_mut() {
                        if ids.contains(&stroke.id) {
                            move_stroke(stroke, dx, dy);
                        }
                    }
                    self.record_snapshot();
                    return None;
                }
                Interaction::Resizing { id, handle, .. } => {
                    if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id == id) {
                        let target = drag_handle(stroke, handle, scene);
                        resize_stroke(stroke, target);
                        self.record_snapshot();
                    }
                    return None;
                }
                Interaction::Pending {
                    start_screen,
                    start_scene,
                    ..
                } => {
                    if position.distance(start_screen) > CLICK_DRAG_THRESHOLD {
                        // A real drag: draw, auto-switching off the pointer
                        // tool.
                        if self.tool == Tool::Select {
                            self.tool = Tool::Pen;
                        }
                        self.interaction = Interaction::Idle;
                        let page_id = self.current_page_id.clone().unwrap_or_default();
                        self.capture
                            .begin(pointer, self.tool, start_scene, &self.brush, &page_id);
                    }
                }
                _ => {}
            }
        }

        if self.capture.is_active(pointer) {
            let scene = self.viewport.screen_to_scene(position);
            self.capture.append(pointer, scene);
        }
        None
    }

    fn pointer_up(&mut self, pointer: PointerId, position: Point) -> Option<EditorAction> {
        self.touch_positions.remove(&pointer);

        if let Interaction::Pinching { first, second, .. } = self.interaction {
            if pointer == first || pointer == second {
                self.interaction = Interaction::Idle;
            }
            return None;
        }

        let mut action = None;
        if self.interaction.owner() == Some(pointer) {
            match mem::replace(&mut self.interaction, Interaction::Idle) {
                Interaction::Lasso { points, .. } => {
                    let hits = strokes_in_lasso(&self.strokes, &points);
                    self.selection.set(hits);
                }
                Interaction::Pending { .. } => {
                    // A click that never crossed the threshold.
                    if self.tool != Tool::Select && !self.text_editing {
                        self.tool = Tool::Text;
                        action = Some(EditorAction::PlaceTextCursor {
                            scene: self.viewport.screen_to_scene(position),
                        });
                    }
                }
                _ => {}
            }
        }

        if let Some(stroke) = self.capture.finish(pointer) {
            self.commit_stroke(stroke);
        }
        action
    }

    fn pointer_cancel(&mut self, pointer: PointerId) {
        self.touch_positions.remove(&pointer);
        self.capture.cancel(pointer);
        let ends_interaction = match self.interaction {
            Interaction::Pinching { first, second, .. } => pointer == first || pointer == second,
            ref other => other.owner() == Some(pointer),
        };
        if ends_interaction {
            self.interaction = Interaction::Idle;
        }
    }

    /// Find a resize handle under a screen position. Handles exist only
    /// for a single-stroke selection.
    fn handle_at(&self, screen: Point) -> Option<(StrokeId, Handle)> {
        let id = *self.selection.ids().first()?;
        let stroke = self.strokes.iter().find(|s| s.id == id)?;
        let sel_box = selection_box(stroke);
        for (handle, scene_pos) in handle_positions(sel_box) {
            let screen_pos = self.viewport.scene_to_screen(scene_pos);
            if screen.distance(screen_pos) <= HANDLE_HIT_RADIUS {
                return Some((id, handle));
            }
        }
        None
    }

    /// Move every selected stroke by a scene-space delta.
    pub fn move_selection(&mut self, dx: f64, dy: f64) {
        if self.selection.is_empty() {
            return;
        }
        let ids: Vec<StrokeId> = self.selection.ids().to_vec();
        for stroke in self.strokes.iter_mut() {
            if ids.contains(&stroke.id) {
                move_stroke(stroke, dx, dy);
            }
        }
        self.record_snapshot();
    }

    /// Bounds of the whole selection, if anything is selected.
    pub fn selection_bounds(&self) -> Option<crate::bounds::Bounds> {
        let mut iter = self
            .strokes
            .iter()
            .filter(|s| self.selection.contains(s.id))
            .map(stroke_bounds);
        let first = iter.next()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x + first.width;
        let mut max_y = first.y + first.height;
        for b in iter {
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.x + b.width);
            max_y = max_y.max(b.y + b.height);
        }
        Some(crate::bounds::Bounds::new(
            min_x,
            min_y,
            max_x - min_x,
            max_y - min_y,
        ))
    }
}
