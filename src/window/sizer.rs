use crate::input::MouseEvent;
use crate::sheet::WidgetId;
use crate::ui::Ui;

impl Ui {
    pub(crate) fn sizer_drag_start(&mut self, window: WidgetId) -> bool {
        if let Err(err) = self.sheet_mut().move_to_top(window) {
            tracing::warn!(window = ?window, error = %err, "failed to raise window");
        }
        true
    }

    /// Resizes from the bottom-left (`left`) or bottom-right corner.
    ///
    /// The left handle keeps the right edge in place, so the origin only
    /// moves by as much as the width actually changed.
    pub(crate) fn sizer_drag(&mut self, window: WidgetId, left: bool, event: &MouseEvent) -> bool {
        let sizable = self
            .window_state(window)
            .is_ok_and(|state| state.sizable);
        if !sizable {
            return true;
        }
        let (min_width, min_height) = self.config().min_window_size;
        let Ok(frame) = self.sheet_mut().frame_mut(window) else {
            return true;
        };
        let (x, y) = frame.position();
        let (width, height) = frame.size();
        let new_height = (height + event.delta_y).max(min_height);
        if left {
            let new_width = (width - event.delta_x).max(min_width);
            frame.set_position(x + (width - new_width), y);
            frame.set_size(new_width, new_height);
        } else {
            let new_width = (width + event.delta_x).max(min_width);
            frame.set_size(new_width, new_height);
        }
        if let Err(err) = self.arrange_chrome(window) {
            tracing::warn!(window = ?window, error = %err, "failed to arrange window chrome");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseInput;
    use crate::window::WindowBuilder;

    fn drag(ui: &mut Ui, sizer: WidgetId, dx: i32, dy: i32) {
        let mut event = MouseEvent::at(0, 0).with_delta(dx, dy);
        assert!(ui.dispatch(sizer, MouseInput::LeftDrag, &mut event));
    }

    #[test]
    fn left_sizer_keeps_right_edge_fixed() {
        let mut ui = Ui::new(1000, 800);
        let root = ui.root();
        let window = ui.open_window(root, WindowBuilder::new("A").size(100, 100)).unwrap();
        let [left, _] = ui.window_parts(window).unwrap().sizers;
        let before = ui.sheet().frame(window).unwrap().rect();

        drag(&mut ui, left, -20, 5);
        let after = ui.sheet().frame(window).unwrap().rect();
        assert_eq!((after.width, after.height), (120, 105));
        assert_eq!(after.x, before.x - 20);
        assert_eq!(after.y, before.y);

        // Past the minimum the origin stops creeping.
        drag(&mut ui, left, 500, 0);
        let clamped = ui.sheet().frame(window).unwrap().rect();
        assert_eq!(clamped.width, 10);
        assert_eq!(
            clamped.x + i32::from(clamped.width),
            before.x + i32::from(before.width)
        );
    }

    #[test]
    fn right_sizer_changes_size_only() {
        let mut ui = Ui::new(1000, 800);
        let root = ui.root();
        let window = ui.open_window(root, WindowBuilder::new("A").size(100, 100)).unwrap();
        let [_, right] = ui.window_parts(window).unwrap().sizers;
        let before = ui.sheet().frame(window).unwrap().rect();

        drag(&mut ui, right, 15, -10);
        let after = ui.sheet().frame(window).unwrap().rect();
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert_eq!((after.width, after.height), (115, 90));
        let footer = ui.window_parts(window).unwrap().footer;
        assert_eq!(ui.sheet().frame(footer).unwrap().position(), (0, 82));
    }

    #[test]
    fn non_sizable_window_ignores_sizer_drags() {
        let mut ui = Ui::new(1000, 800);
        let root = ui.root();
        let window = ui.open_window(root, WindowBuilder::new("A")).unwrap();
        let [_, right] = ui.window_parts(window).unwrap().sizers;
        ui.toggle_resizable(window).unwrap();
        drag(&mut ui, right, 40, 40);
        assert_eq!(ui.sheet().frame(window).unwrap().size(), (480, 350));
    }
}
