use crossterm::event::{Event, MouseButton, MouseEventKind};

use super::{MouseEvent, MouseInput};
use crate::sheet::WidgetId;
use crate::ui::Ui;

#[derive(Debug, Clone, Copy)]
struct Press {
    target: WidgetId,
    origin: (i32, i32),
    last: (i32, i32),
    dragging: bool,
    handler: Option<WidgetId>,
}

/// Turns crossterm mouse events into clicks and start/move/end drags.
///
/// A left press becomes a click if it is released without motion, or a drag
/// gesture owned by whichever widget consumed `LeftDragStart`.
#[derive(Debug, Default)]
pub struct MouseRouter {
    press: Option<Press>,
}

impl MouseRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    /// Feeds one terminal event. Returns whether any widget consumed it.
    pub fn handle(&mut self, ui: &mut Ui, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
        ui.settle();
        ui.set_pointer(x, y);

        if let Some(holder) = ui.modal_holder() {
            self.cancel(ui);
            let input = match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseInput::LeftClick,
                MouseEventKind::Down(MouseButton::Right) => MouseInput::RightClick,
                _ => return true,
            };
            let mut event = MouseEvent::at(x, y);
            return ui.dispatch(holder, input, &mut event);
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.cancel(ui);
                let Some(target) = ui.sheet().pinpoint(x, y) else {
                    return false;
                };
                self.press = Some(Press {
                    target,
                    origin: (x, y),
                    last: (x, y),
                    dragging: false,
                    handler: None,
                });
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag(ui, x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(press) = self.press.take() else {
                    return false;
                };
                let mut event = MouseEvent::at(x, y);
                if press.dragging {
                    return press.handler.is_some_and(|handler| {
                        ui.sheet().contains(handler)
                            && ui.dispatch(handler, MouseInput::LeftDragEnd, &mut event)
                    });
                }
                let target = if ui.sheet().contains(press.target) {
                    Some(press.target)
                } else {
                    ui.sheet().pinpoint(x, y)
                };
                target.is_some_and(|target| {
                    ui.dispatch_bubbling(target, MouseInput::LeftClick, &mut event)
                        .is_some()
                })
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.cancel(ui);
                let Some(target) = ui.sheet().pinpoint(x, y) else {
                    return false;
                };
                let mut event = MouseEvent::at(x, y);
                ui.dispatch_bubbling(target, MouseInput::RightClick, &mut event)
                    .is_some()
            }
            _ => false,
        }
    }

    fn drag(&mut self, ui: &mut Ui, x: i32, y: i32) -> bool {
        let Some(mut press) = self.press else {
            return false;
        };
        if !press.dragging {
            press.dragging = true;
            if ui.sheet().contains(press.target) {
                let mut start = MouseEvent::at(press.origin.0, press.origin.1);
                press.handler =
                    ui.dispatch_bubbling(press.target, MouseInput::LeftDragStart, &mut start);
            }
        }
        let Some(handler) = press.handler else {
            self.press = Some(press);
            return false;
        };
        if !ui.sheet().contains(handler) {
            tracing::debug!(widget = ?handler, "drag handler destroyed, cancelling drag");
            self.press = None;
            return false;
        }
        let mut event = MouseEvent::at(x, y).with_delta(x - press.last.0, y - press.last.1);
        press.last = (x, y);
        self.press = Some(press);
        ui.dispatch(handler, MouseInput::LeftDrag, &mut event)
    }

    /// Drops any press in progress, letting its drag handler restore its
    /// transient state.
    fn cancel(&mut self, ui: &mut Ui) {
        if let Some(press) = self.press.take()
            && press.dragging
            && let Some(handler) = press.handler
        {
            ui.cancel_drag(handler);
        }
    }
}
