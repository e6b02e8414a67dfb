use crate::frame::Opacity;
use crate::input::MouseEvent;
use crate::sheet::WidgetId;
use crate::ui::Ui;

impl Ui {
    /// Activates the window and raises it, docked or not.
    pub(crate) fn header_click(&mut self, window: WidgetId) -> bool {
        let Ok(record) = self.record_mut(window) else {
            return false;
        };
        record.state.activated = true;
        if let Err(err) = self.sheet_mut().move_to_top(window) {
            tracing::warn!(window = ?window, error = %err, "failed to raise window");
        }
        true
    }

    /// Starts a move: docked windows are undocked first, then the window is
    /// raised and made hollow so drop targets below it stay hittable.
    pub(crate) fn header_drag_start(&mut self, window: WidgetId) -> bool {
        if let Err(err) = self.undock(window) {
            tracing::warn!(window = ?window, error = %err, "undock on drag start failed");
        }
        let sheet = self.sheet_mut();
        let raised = sheet
            .move_to_top(window)
            .and_then(|()| sheet.set_opacity(window, Opacity::Hollow));
        if let Err(err) = raised {
            tracing::warn!(window = ?window, error = %err, "failed to lift window");
        }
        true
    }

    pub(crate) fn header_drag(&mut self, window: WidgetId, event: &MouseEvent) -> bool {
        let movable = self
            .window_state(window)
            .is_ok_and(|state| state.movable);
        if !movable {
            return true;
        }
        if let Ok(frame) = self.sheet_mut().frame_mut(window) {
            let (x, y) = frame.position();
            frame.set_position(x + event.delta_x, y + event.delta_y);
        }
        true
    }

    /// Docks into the section under the pointer when the window allows it,
    /// then restores opacity whatever the outcome.
    pub(crate) fn header_drag_end(&mut self, window: WidgetId, event: &MouseEvent) -> bool {
        let dockable = self
            .window_state(window)
            .is_ok_and(|state| state.dockable);
        if dockable && let Some(dock) = self.docktarget(event.pos_x, event.pos_y) {
            if let Err(err) = self.dock(window, dock) {
                tracing::warn!(window = ?window, dock = ?dock, error = %err, "dock on drop failed");
            }
        }
        if self.sheet().contains(window)
            && let Err(err) = self.sheet_mut().set_opacity(window, Opacity::Opaque)
        {
            tracing::warn!(window = ?window, error = %err, "failed to restore opacity");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseInput;
    use crate::window::{WindowBuilder, WindowState};

    #[test]
    fn immovable_window_consumes_drag_without_moving() {
        let mut ui = Ui::new(1000, 800);
        let root = ui.root();
        let state = WindowState {
            movable: false,
            ..WindowState::default()
        };
        let window = ui.open_window(root, WindowBuilder::new("Pinned").state(state)).unwrap();
        let header = ui.window_parts(window).unwrap().header;
        let before = ui.sheet().frame(window).unwrap().position();

        let mut event = MouseEvent::at(300, 230).with_delta(7, 7);
        assert!(ui.dispatch(header, MouseInput::LeftDrag, &mut event));
        assert_eq!(ui.sheet().frame(window).unwrap().position(), before);
    }

    #[test]
    fn drag_start_makes_window_hollow_until_drop() {
        let mut ui = Ui::new(1000, 800);
        let root = ui.root();
        let window = ui.open_window(root, WindowBuilder::new("A")).unwrap();
        let header = ui.window_parts(window).unwrap().header;

        let mut event = MouseEvent::at(300, 230);
        ui.dispatch(header, MouseInput::LeftDragStart, &mut event);
        assert_eq!(ui.sheet().frame(window).unwrap().opacity(), Opacity::Hollow);
        ui.dispatch(header, MouseInput::LeftDragEnd, &mut event);
        assert_eq!(ui.sheet().frame(window).unwrap().opacity(), Opacity::Opaque);
    }

    #[test]
    fn header_click_activates_and_raises() {
        let mut ui = Ui::new(1000, 800);
        let root = ui.root();
        let first = ui.open_window(root, WindowBuilder::new("First")).unwrap();
        let second = ui.open_window(root, WindowBuilder::new("Second")).unwrap();
        assert_eq!(ui.sheet().layers().last(), Some(&second));

        let header = ui.window_parts(first).unwrap().header;
        let mut event = MouseEvent::at(0, 0);
        assert!(ui.dispatch(header, MouseInput::LeftClick, &mut event));
        assert!(ui.window_state(first).unwrap().activated);
        assert_eq!(ui.sheet().layers().last(), Some(&first));
    }
}
