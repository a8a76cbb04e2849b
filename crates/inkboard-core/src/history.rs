//! Undo/redo history over board snapshots.
//!
//! A snapshot covers the stroke list and the background color. Two states
//! with the same stroke count and background are treated as one undo step:
//! moving or resizing existing strokes updates the present snapshot in
//! place instead of growing the undo stack, so undo steps line up with
//! add/delete/background edits.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::stroke::Stroke;

/// Maximum number of undo steps retained.
pub const HISTORY_LIMIT: usize = 64;

/// The undoable portion of board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub strokes: Vec<Stroke>,
    pub background_color: String,
}

/// Linear undo/redo stacks with an explicit present snapshot.
#[derive(Debug)]
pub struct History {
    past: Vec<Snapshot>,
    present: Snapshot,
    future: Vec<Snapshot>,
}

impl History {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
        }
    }

    fn coalesces_with_present(&self, state: &Snapshot) -> bool {
        state.strokes.len() == self.present.strokes.len()
            && state.background_color == self.present.background_color
    }

    /// Record the state after a mutation.
    ///
    /// States that coalesce with the present (same stroke count, same
    /// background) absorb into it; anything else becomes a new undo step
    /// and invalidates the redo stack. The oldest step falls off once the
    /// stack exceeds `HISTORY_LIMIT`.
    pub fn record(&mut self, state: Snapshot) {
        if self.coalesces_with_present(&state) {
            self.present = state;
            return;
        }
        self.past.push(mem::replace(&mut self.present, state));
        if self.past.len() > HISTORY_LIMIT {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Step back one snapshot. Returns the state to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let previous = self.past.pop()?;
        self.future.push(mem::replace(&mut self.present, previous));
        Some(&self.present)
    }

    /// Step forward one snapshot. Returns the state to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.future.pop()?;
        self.past.push(mem::replace(&mut self.present, next));
        Some(&self.present)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn present(&self) -> &Snapshot {
        &self.present
    }

    /// Replace the baseline and drop both stacks. Used on page switches so
    /// undo never crosses a page boundary.
    pub fn reset(&mut self, state: Snapshot) {
        self.past.clear();
        self.future.clear();
        self.present = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Tool;
    use crate::testutil::stroke_with_points;
    use kurbo::Point;

    fn snap(count: usize, bg: &str) -> Snapshot {
        let strokes = (0..count)
            .map(|i| stroke_with_points(Tool::Pen, vec![Point::new(i as f64, 0.0)]))
            .collect();
        Snapshot {
            strokes,
            background_color: bg.to_string(),
        }
    }

    #[test]
    fn test_add_creates_undo_step() {
        let mut history = History::new(snap(0, "#000"));
        history.record(snap(1, "#000"));
        assert!(history.can_undo());
        let restored = history.undo().unwrap();
        assert!(restored.strokes.is_empty());
    }

    #[test]
    fn test_move_coalesces_into_present() {
        let mut history = History::new(snap(0, "#000"));
        history.record(snap(1, "#000"));
        // Same count: a transform, absorbed without a new step.
        let mut moved = snap(1, "#000");
        moved.strokes[0].points[0] = Point::new(99.0, 99.0);
        history.record(moved);
        assert_eq!(history.present().strokes[0].points[0], Point::new(99.0, 99.0));

        // One undo jumps all the way back to the empty state.
        history.undo().unwrap();
        assert!(history.present().strokes.is_empty());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_background_change_creates_step() {
        let mut history = History::new(snap(1, "#000"));
        history.record(snap(1, "#fff"));
        assert!(history.can_undo());
        let restored = history.undo().unwrap();
        assert_eq!(restored.background_color, "#000");
    }

    #[test]
    fn test_redo_after_undo() {
        let mut history = History::new(snap(0, "#000"));
        history.record(snap(1, "#000"));
        history.record(snap(2, "#000"));
        history.undo().unwrap();
        assert_eq!(history.present().strokes.len(), 1);
        let restored = history.redo().unwrap();
        assert_eq!(restored.strokes.len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = History::new(snap(0, "#000"));
        history.record(snap(1, "#000"));
        history.undo().unwrap();
        assert!(history.can_redo());
        history.record(snap(3, "#000"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(snap(0, "#000"));
        for i in 1..=(HISTORY_LIMIT + 10) {
            history.record(snap(i, "#000"));
        }
        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, HISTORY_LIMIT);
        // The oldest reachable state is not the original empty one.
        assert_eq!(history.present().strokes.len(), 10);
    }

    #[test]
    fn test_reset_clears_stacks() {
        let mut history = History::new(snap(0, "#000"));
        history.record(snap(1, "#000"));
        history.undo().unwrap();
        history.reset(snap(5, "#123"));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.present().strokes.len(), 5);
    }
}
