//! Viewport-side interaction for Sage.
//!
//! Everything the embedded code viewer owes the host UI besides pixels:
//! wheel-event ownership between the nested viewport and the ambient
//! surface, clipboard copy with toast feedback, the pending-notice queue,
//! query-overlay key routing, and a reference state sink the dispatcher
//! writes into.

mod clipboard;
mod input;
mod notice;
mod scroll;
mod state;

pub use clipboard::{
    COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE, ClipboardBackend, ClipboardError, SystemClipboard,
    copy_editor_contents,
};
pub use input::{QueryKeyAction, QuerySurface, query_key_action};
pub use notice::NoticeQueue;
pub use scroll::{
    EditorViewport, ViewportEdges, WHEEL_STEP_ROWS, WheelOutcome, WheelOwner, route_wheel,
    wheel_delta,
};
pub use state::ViewerState;

pub use sage_types::{Notice, NoticeKind, NoticePosition};
