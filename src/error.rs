//! Error taxonomy for tree and window operations.
//!
//! Every variant except `ModalHeld` is a precondition violation: the caller
//! asked for something the tree cannot do, such as an out-of-range index.
//! Operations report these before mutating anything, so an
//! `Err` always leaves the tree as it was.

use thiserror::Error;

use crate::dock::DockId;
use crate::sheet::{Detached, WidgetId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("widget {0:?} does not exist")]
    UnknownWidget(WidgetId),
    #[error("widget {0:?} cannot hold child widgets")]
    NotAWedge(WidgetId),
    #[error("widget {0:?} is not a container")]
    NotAContainer(WidgetId),
    #[error("widget {0:?} is not a window")]
    NotAWindow(WidgetId),
    #[error("widget {0:?} is not a grid sheet")]
    NotAGrid(WidgetId),
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("widget {widget:?} is not a member of {wedge:?}")]
    NotAMember { wedge: WidgetId, widget: WidgetId },
    #[error("widget {0:?} is already attached to a parent")]
    AlreadyAttached(WidgetId),
    #[error("attaching {widget:?} under {wedge:?} would make it its own ancestor")]
    WouldCycle { wedge: WidgetId, widget: WidgetId },
    #[error("the root widget cannot be detached or destroyed")]
    RootWidget,
    #[error("container target chain starting at {0:?} does not terminate")]
    TargetCycle(WidgetId),
    #[error("modal control is held by {0:?}")]
    ModalHeld(WidgetId),
    #[error("dock section {0:?} does not exist")]
    UnknownDock(DockId),
}

/// A refused insertion. The widget comes back still detached, so the caller
/// can place it elsewhere or discard it.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct Rejected {
    pub error: UiError,
    pub widget: Detached,
}

pub type Result<T, E = UiError> = std::result::Result<T, E>;
