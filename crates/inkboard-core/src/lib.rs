//! Inkboard Core Library
//!
//! Renderer-agnostic drawing, selection, transform and page logic for the
//! Inkboard whiteboard.

pub mod autosave;
pub mod bounds;
pub mod capture;
pub mod editor;
pub mod history;
pub mod hit;
pub mod import;
pub mod input;
pub mod page;
pub mod selection;
pub mod storage;
pub mod stroke;
pub mod transform;
pub mod viewport;

pub use autosave::{AutoSaveManager, SaveStatus};
pub use bounds::{hit_padding, padded_bounds, stroke_bounds, Bounds};
pub use capture::{Brush, CaptureEngine};
pub use editor::{Editor, EditorAction, PageFetch, TextStyle};
pub use history::{History, Snapshot};
pub use hit::{hit_test, stroke_at_point, strokes_in_lasso};
pub use import::{export_strokes, parse_content};
pub use input::{Modifiers, MouseButton, PointerEvent, PointerId};
pub use page::{Page, PageCache, PageContent, PageStyle};
pub use selection::Selection;
pub use storage::{ContentStore, FileStore, MemoryStore, StoreError};
pub use stroke::{ShapeKind, Stroke, StrokeId, Tool};
pub use transform::{move_stroke, resize_stroke, Corner, Edge, Handle};
pub use viewport::Viewport;

#[cfg(test)]
pub(crate) mod testutil {
    use kurbo::Point;
    use uuid::Uuid;

    use crate::stroke::{Stroke, Tool, DEFAULT_COLOR};

    /// A committed stroke with fixed metadata, for geometry-focused tests.
    pub(crate) fn stroke_with_points(tool: Tool, points: Vec<Point>) -> Stroke {
        Stroke {
            id: Uuid::new_v4(),
            tool,
            points,
            color: DEFAULT_COLOR.to_string(),
            width: 5.0,
            opacity: 1.0,
            page_id: "p1".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            shape: tool.shape_kind(),
            text: None,
            font_family: None,
            font_size: None,
            font_weight: None,
            font_style: None,
            text_decoration: None,
            text_align: None,
        }
    }

    /// Minimal blocking executor for the storage futures under test.
    pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }
}
