use crate::error::{Result, UiError};
use crate::input::MouseEvent;
use crate::sheet::{WidgetId, WidgetKind};
use crate::ui::Ui;

impl Ui {
    /// Opens a popup at the pointer, holding modal control until it is
    /// dismissed by the next click.
    ///
    /// Fails with `ModalHeld`, leaving the tree untouched, while another
    /// widget holds modal control.
    pub fn open_popup(&mut self, parent: WidgetId) -> Result<WidgetId> {
        self.settle();
        if let Some(holder) = self.modal_holder() {
            return Err(UiError::ModalHeld(holder));
        }
        let (px, py) = self.pointer();
        let (x, y) = self.sheet().local_position(parent, px, py)?;
        let sheet = self.sheet_mut();
        let popup = sheet.spawn(parent, WidgetKind::Popup)?;
        sheet.frame_mut(popup)?.set_position(x, y);
        sheet.move_to_top(popup)?;
        self.arbiter.acquire(popup)?;
        tracing::debug!(popup = ?popup, x, y, "popup opened");
        Ok(popup)
    }

    /// Any click dismisses the popup and stops the click from going further.
    pub(crate) fn popup_click(&mut self, popup: WidgetId, event: &mut MouseEvent) -> bool {
        if !self.sheet().contains(popup) {
            return false;
        }
        event.abort = true;
        self.arbiter.release(popup);
        if let Err(err) = self.destroy(popup) {
            tracing::warn!(popup = ?popup, error = %err, "failed to destroy popup");
        }
        tracing::debug!(popup = ?popup, "popup dismissed");
        true
    }
}
