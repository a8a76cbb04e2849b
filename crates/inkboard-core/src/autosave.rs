//! Debounced auto-save for page contents.
//!
//! Edits mark the page dirty; a save becomes due once the board has been
//! quiet for the debounce window. Save completions carry a generation
//! number so a slow save that finishes after a newer one started cannot
//! clobber the newer result (last write wins).

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::storage::{ContentStore, StoreResult};
use crate::page::PageContent;

/// Default quiet window before a dirty page is saved.
pub const DEFAULT_DEBOUNCE_SECS: u64 = 2;

/// Observable persistence state, for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing to save.
    Idle,
    /// Edits pending, debounce window still open.
    Pending,
    /// A save is in flight.
    Saving,
    /// The latest save completed.
    Saved,
    /// The latest save failed.
    Failed,
}

/// Manages debounced persistence of the current page.
pub struct AutoSaveManager<S: ContentStore> {
    store: Arc<S>,
    debounce: Duration,
    /// Time of the most recent edit, if unsaved.
    dirty_at: Option<Instant>,
    status: SaveStatus,
    /// Generation of the most recently started save.
    generation: u64,
}

impl<S: ContentStore> AutoSaveManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            debounce: Duration::from_secs(DEFAULT_DEBOUNCE_SECS),
            dirty_at: None,
            status: SaveStatus::Idle,
            generation: 0,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record an edit at `now`. Restarts the quiet window.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_at = Some(now);
        if self.status != SaveStatus::Saving {
            self.status = SaveStatus::Pending;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_at.is_some()
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// True once the page is dirty and the quiet window has elapsed.
    pub fn should_save(&self, now: Instant) -> bool {
        match self.dirty_at {
            Some(dirty_at) => now.duration_since(dirty_at) >= self.debounce,
            None => false,
        }
    }

    /// Begin a save attempt: clears the dirty mark and returns the
    /// generation to hand back to `finish_save`.
    pub fn begin_save(&mut self) -> u64 {
        self.dirty_at = None;
        self.status = SaveStatus::Saving;
        self.generation += 1;
        self.generation
    }

    /// Report a save completion. Completions from superseded generations
    /// are ignored so an old slow save cannot overwrite a newer outcome.
    pub fn finish_save(&mut self, generation: u64, result: &StoreResult<()>) {
        if generation != self.generation {
            log::debug!("Ignoring stale save completion (generation {})", generation);
            return;
        }
        match result {
            Ok(()) => {
                // New edits may have arrived while the save was in flight.
                self.status = if self.dirty_at.is_some() {
                    SaveStatus::Pending
                } else {
                    SaveStatus::Saved
                };
            }
            Err(e) => {
                log::warn!("Auto-save failed: {}", e);
                self.status = SaveStatus::Failed;
            }
        }
    }

    /// Save `content` if the debounce window has elapsed.
    /// Returns true if a save was performed.
    pub async fn maybe_save(
        &mut self,
        now: Instant,
        page_id: &str,
        content: &PageContent,
    ) -> StoreResult<bool> {
        if !self.should_save(now) {
            return Ok(false);
        }
        self.save(page_id, content).await?;
        Ok(true)
    }

    /// Save immediately, bypassing the debounce (page switch, shutdown).
    pub async fn save(&mut self, page_id: &str, content: &PageContent) -> StoreResult<()> {
        let generation = self.begin_save();
        let result = self.store.save(page_id, content).await;
        self.finish_save(generation, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};
    use crate::testutil::block_on;

    fn manager() -> AutoSaveManager<MemoryStore> {
        AutoSaveManager::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_clean_page_never_due() {
        let m = manager();
        assert!(!m.should_save(Instant::now()));
        assert_eq!(m.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_due_after_quiet_window() {
        let mut m = manager();
        let t0 = Instant::now();
        m.mark_dirty(t0);
        assert_eq!(m.status(), SaveStatus::Pending);
        assert!(!m.should_save(t0 + Duration::from_millis(1999)));
        assert!(m.should_save(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_new_edit_restarts_window() {
        let mut m = manager();
        let t0 = Instant::now();
        m.mark_dirty(t0);
        let t1 = t0 + Duration::from_millis(1500);
        m.mark_dirty(t1);
        assert!(!m.should_save(t0 + Duration::from_secs(2)));
        assert!(m.should_save(t1 + Duration::from_secs(2)));
    }

    #[test]
    fn test_maybe_save_persists_when_due() {
        let store = Arc::new(MemoryStore::new());
        let mut m = AutoSaveManager::new(store.clone());
        let t0 = Instant::now();
        m.mark_dirty(t0);

        let saved = block_on(m.maybe_save(t0, "p1", &PageContent::default())).unwrap();
        assert!(!saved);

        let saved =
            block_on(m.maybe_save(t0 + Duration::from_secs(3), "p1", &PageContent::default()))
                .unwrap();
        assert!(saved);
        assert!(!m.is_dirty());
        assert_eq!(m.status(), SaveStatus::Saved);
        assert!(block_on(store.exists("p1")).unwrap());
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut m = manager();
        m.mark_dirty(Instant::now());
        let old_gen = m.begin_save();
        let new_gen = m.begin_save();
        // The newer save finishes first.
        m.finish_save(new_gen, &Ok(()));
        assert_eq!(m.status(), SaveStatus::Saved);
        // The older save then fails; its completion must not apply.
        m.finish_save(old_gen, &Err(StoreError::Other("late".into())));
        assert_eq!(m.status(), SaveStatus::Saved);
    }

    #[test]
    fn test_edit_during_save_keeps_pending() {
        let mut m = manager();
        m.mark_dirty(Instant::now());
        let generation = m.begin_save();
        m.mark_dirty(Instant::now());
        m.finish_save(generation, &Ok(()));
        assert_eq!(m.status(), SaveStatus::Pending);
        assert!(m.is_dirty());
    }

    #[test]
    fn test_failed_save_reports_failure() {
        let mut m = manager();
        m.mark_dirty(Instant::now());
        let generation = m.begin_save();
        m.finish_save(generation, &Err(StoreError::Io("disk full".into())));
        assert_eq!(m.status(), SaveStatus::Failed);
    }
}
