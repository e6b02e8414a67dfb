//! Mouse input delivery.
//!
//! Handlers are chosen by a tagged dispatch on the widget kind. The
//! [`router::MouseRouter`] turns raw crossterm mouse events into the
//! click and three-phase drag inputs defined here.

pub mod arbiter;
pub mod router;

pub use arbiter::InputArbiter;
pub use router::MouseRouter;

use crate::frame::Opacity;
use crate::sheet::{WidgetId, WidgetKind};
use crate::ui::Ui;

/// Pointer state delivered to a handler.
///
/// `delta_x`/`delta_y` are the motion since the previous drag event.
/// A handler sets `abort` to stop the event from bubbling further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseEvent {
    pub pos_x: i32,
    pub pos_y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
    pub abort: bool,
}

impl MouseEvent {
    pub fn at(pos_x: i32, pos_y: i32) -> Self {
        Self {
            pos_x,
            pos_y,
            ..Self::default()
        }
    }

    pub fn with_delta(mut self, delta_x: i32, delta_y: i32) -> Self {
        self.delta_x = delta_x;
        self.delta_y = delta_y;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseInput {
    LeftClick,
    RightClick,
    LeftDragStart,
    LeftDrag,
    LeftDragEnd,
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Header(WidgetId),
    Sizer(WidgetId, bool),
    CloseButton(WidgetId),
    Window(WidgetId),
    Popup,
    Grid,
}

impl Ui {
    fn role(&self, widget: WidgetId) -> Option<Role> {
        let node = self.sheet().node(widget).ok()?;
        let role = match node.kind() {
            WidgetKind::WindowHeader => Role::Header(self.window_of(widget)?),
            WidgetKind::WindowSizer { left } => Role::Sizer(self.window_of(widget)?, *left),
            WidgetKind::CloseButton => Role::CloseButton(self.window_of(widget)?),
            WidgetKind::Window if self.is_window(widget) => Role::Window(widget),
            WidgetKind::Popup => Role::Popup,
            WidgetKind::GridSheet { .. } => Role::Grid,
            _ => return None,
        };
        Some(role)
    }

    /// Delivers `input` to `widget` alone. Returns whether it was consumed.
    pub fn dispatch(&mut self, widget: WidgetId, input: MouseInput, event: &mut MouseEvent) -> bool {
        self.settle();
        let Some(role) = self.role(widget) else {
            return false;
        };
        match (role, input) {
            (Role::Header(window), MouseInput::LeftClick) => self.header_click(window),
            (Role::Header(window), MouseInput::LeftDragStart) => self.header_drag_start(window),
            (Role::Header(window), MouseInput::LeftDrag) => self.header_drag(window, event),
            (Role::Header(window), MouseInput::LeftDragEnd) => self.header_drag_end(window, event),
            (Role::Sizer(window, _), MouseInput::LeftDragStart) => self.sizer_drag_start(window),
            (Role::Sizer(window, left), MouseInput::LeftDrag) => {
                self.sizer_drag(window, left, event)
            }
            (Role::Sizer(_, _), MouseInput::LeftDragEnd) => true,
            (Role::CloseButton(window), MouseInput::LeftClick) => {
                if let Err(err) = self.close(window) {
                    tracing::warn!(window = ?window, error = %err, "close button failed");
                }
                true
            }
            (Role::Window(window), MouseInput::LeftClick | MouseInput::RightClick) => {
                self.window_click(window)
            }
            (Role::Popup, MouseInput::LeftClick | MouseInput::RightClick) => {
                self.popup_click(widget, event)
            }
            (Role::Grid, MouseInput::LeftDragStart) => self
                .sheet_mut()
                .grid_drag_start(widget, event.pos_x, event.pos_y)
                .unwrap_or(false),
            (Role::Grid, MouseInput::LeftDrag) => self
                .sheet_mut()
                .grid_drag(widget, event.delta_x, event.delta_y)
                .unwrap_or(false),
            (Role::Grid, MouseInput::LeftDragEnd) => {
                self.sheet_mut().grid_drag_end(widget).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Abandons a drag owned by `handler` without running its end phase.
    pub(crate) fn cancel_drag(&mut self, handler: WidgetId) {
        match self.role(handler) {
            Some(Role::Header(window)) => {
                if let Err(err) = self.sheet_mut().set_opacity(window, Opacity::Opaque) {
                    tracing::warn!(window = ?window, error = %err, "failed to restore opacity");
                }
            }
            Some(Role::Grid) => {
                if let Err(err) = self.sheet_mut().grid_drag_end(handler) {
                    tracing::warn!(grid = ?handler, error = %err, "failed to end grid drag");
                }
            }
            _ => {}
        }
        tracing::debug!(widget = ?handler, "drag cancelled");
    }

    /// Offers `input` to `widget` and then to each ancestor until one
    /// consumes it or a handler aborts the event. Returns the consumer.
    pub fn dispatch_bubbling(
        &mut self,
        widget: WidgetId,
        input: MouseInput,
        event: &mut MouseEvent,
    ) -> Option<WidgetId> {
        let chain: Vec<WidgetId> = self.sheet().ancestors(widget).collect();
        for candidate in chain {
            if !self.sheet().contains(candidate) {
                continue;
            }
            if self.dispatch(candidate, input, event) {
                return Some(candidate);
            }
            if event.abort {
                return None;
            }
        }
        None
    }
}
