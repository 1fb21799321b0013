//! Drag-and-drop tab reordering.
//! 分頁拖放重新排序。
//!
//! Each tab bar owns one [`DragReorderController`]. A gesture starts with
//! [`DragReorderController::begin_drag`], receives any number of
//! enter/over/leave notifications, and ends with either
//! [`DragReorderController::drop_on`] or [`DragReorderController::cancel`].
//! Both endings return the controller to [`DragState::Idle`].

use tracing::{debug, trace};

use crate::id::NodeId;
use crate::session::{ReorderOutcome, TabSession};

/// Gesture state of a tab bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        dragged: NodeId,
        /// Tab currently highlighted as the drop candidate.
        hovered: Option<NodeId>,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Reordered { from: usize, to: usize },
    Cancelled,
}

/// Translates drag gestures over a tab bar into tab moves.
/// 將分頁列上的拖放手勢轉換為分頁移動。
#[derive(Debug, Clone, Default)]
pub struct DragReorderController {
    state: DragState,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<&NodeId> {
        match &self.state {
            DragState::Dragging { dragged, .. } => Some(dragged),
            DragState::Idle => None,
        }
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        match &self.state {
            DragState::Dragging { hovered, .. } => hovered.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Whether `tab` should render the "about to receive drop" highlight.
    pub fn is_drop_candidate(&self, tab: &NodeId) -> bool {
        self.hovered() == Some(tab)
    }

    /// Starts dragging `tab`. A gesture already in flight is discarded.
    pub fn begin_drag(&mut self, tab: NodeId) {
        debug!(tab = %tab, "drag started");
        self.state = DragState::Dragging {
            dragged: tab,
            hovered: None,
        };
    }

    /// Pointer entered `target`. Returns `true` when the target accepts the
    /// drop, which is always the case while dragging.
    pub fn drag_enter(&mut self, target: &NodeId) -> bool {
        self.hover(target)
    }

    /// Pointer is moving over `target`. Same acceptance rule as
    /// [`drag_enter`](Self::drag_enter).
    pub fn drag_over(&mut self, target: &NodeId) -> bool {
        self.hover(target)
    }

    /// Pointer left `target` without dropping.
    pub fn drag_leave(&mut self, target: &NodeId) {
        if let DragState::Dragging { hovered, .. } = &mut self.state {
            if hovered.as_ref() == Some(target) {
                trace!(tab = %target, "drop candidate cleared");
                *hovered = None;
            }
        }
    }

    /// Drops the dragged tab on `target` and applies the move to `session`.
    /// 將拖曳中的分頁放到目標上，並套用至工作階段。
    ///
    /// Dropping while idle, on the dragged tab itself, or on a tab that is no
    /// longer open cancels the gesture without touching the order.
    pub fn drop_on(&mut self, target: &NodeId, session: &mut TabSession) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { dragged, .. } = state else {
            return DropOutcome::Cancelled;
        };
        match session.reorder_tabs(&dragged, target) {
            ReorderOutcome::Moved { from, to } => DropOutcome::Reordered { from, to },
            ReorderOutcome::Unchanged => {
                debug!(%dragged, drop_on = %target, "drop ignored");
                DropOutcome::Cancelled
            }
        }
    }

    /// Aborts the gesture, clearing every highlight.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    fn hover(&mut self, target: &NodeId) -> bool {
        match &mut self.state {
            DragState::Dragging { hovered, .. } => {
                if hovered.as_ref() != Some(target) {
                    trace!(tab = %target, "drop candidate");
                    *hovered = Some(target.clone());
                }
                true
            }
            DragState::Idle => false,
        }
    }
}
