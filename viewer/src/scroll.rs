//! Scroll ownership negotiation for the embedded code viewport.
//!
//! Two nested scrollable regions compete for every wheel event: the code
//! viewport and the ambient surface around it. Exactly one of them consumes
//! each event - the viewport owns it unless the viewport is already pinned
//! at the boundary the wheel is pushing toward, in which case the event is
//! released to the ambient surface untouched.
//!
//! Boundary state is recomputed from the live layout on every event.
//! Content length and viewport height change between events (resize,
//! reflow), so nothing here is cached.

use crossterm::event::MouseEventKind;

/// Rows of viewport movement per terminal wheel tick. Terminal scroll
/// events carry direction only; this supplies the magnitude.
pub const WHEEL_STEP_ROWS: i32 = 3;

/// Signed wheel delta for one mouse event, in rows. Negative is up.
/// `None` for non-wheel mouse events.
#[must_use]
pub fn wheel_delta(kind: MouseEventKind) -> Option<i32> {
    match kind {
        MouseEventKind::ScrollUp => Some(-WHEEL_STEP_ROWS),
        MouseEventKind::ScrollDown => Some(WHEEL_STEP_ROWS),
        _ => None,
    }
}

/// Boundary state of the viewport at the instant of one wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportEdges {
    /// The first content line is visible.
    pub at_top: bool,
    /// The last content line is visible.
    pub at_bottom: bool,
}

/// Which region consumes a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOwner {
    /// The viewport moves; the ambient surface must not.
    Viewport,
    /// The ambient surface scrolls; the viewport must not move.
    Page,
}

/// The ownership rule: release at the boundary the wheel pushes past,
/// consume everywhere else.
#[must_use]
pub fn route_wheel(edges: ViewportEdges, delta_y: i32) -> WheelOwner {
    if (edges.at_top && delta_y < 0) || (edges.at_bottom && delta_y > 0) {
        WheelOwner::Page
    } else {
        WheelOwner::Viewport
    }
}

/// Outcome of applying one wheel event to a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// The viewport consumed the event and now sits at `scroll_top`.
    Consumed { scroll_top: usize },
    /// The event was released to the ambient surface; the viewport did not
    /// move.
    Released,
}

/// Scroll model of the embedded code viewport: a window of `rows` visible
/// lines over `line_count` content lines.
#[derive(Debug, Clone, Copy)]
pub struct EditorViewport {
    line_count: usize,
    rows: usize,
    scroll_top: usize,
}

impl EditorViewport {
    #[must_use]
    pub fn new(line_count: usize, rows: usize) -> Self {
        Self {
            line_count,
            rows,
            scroll_top: 0,
        }
    }

    /// 1-based first and last visible content lines; `(0, 0)` when there is
    /// no content.
    #[must_use]
    pub fn visible_range(&self) -> (usize, usize) {
        if self.line_count == 0 {
            return (0, 0);
        }
        let first = self.scroll_top + 1;
        let last = (self.scroll_top + self.rows).min(self.line_count);
        (first, last)
    }

    /// Boundary state derived fresh from the current layout.
    #[must_use]
    pub fn edges(&self) -> ViewportEdges {
        let (first, last) = self.visible_range();
        ViewportEdges {
            at_top: first <= 1,
            at_bottom: last == self.line_count,
        }
    }

    #[must_use]
    pub const fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Content reflow: new line count, offset re-clamped.
    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
    }

    /// Viewport resize: new visible height, offset re-clamped.
    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
    }

    fn max_scroll_top(&self) -> usize {
        self.line_count.saturating_sub(self.rows)
    }

    /// Route one wheel event through [`route_wheel`] and apply it.
    /// Consumes and moves, or releases untouched - never both, never
    /// neither.
    pub fn handle_wheel(&mut self, delta_y: i32) -> WheelOutcome {
        match route_wheel(self.edges(), delta_y) {
            WheelOwner::Page => WheelOutcome::Released,
            WheelOwner::Viewport => {
                self.scroll_top = if delta_y < 0 {
                    self.scroll_top.saturating_sub(delta_y.unsigned_abs() as usize)
                } else {
                    (self.scroll_top + delta_y as usize).min(self.max_scroll_top())
                };
                WheelOutcome::Consumed {
                    scroll_top: self.scroll_top,
                }
            }
        }
    }
}
