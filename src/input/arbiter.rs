use crate::error::{Result, UiError};
use crate::sheet::WidgetId;

/// Single holder of modal input control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputArbiter {
    holder: Option<WidgetId>,
}

impl InputArbiter {
    pub fn holder(&self) -> Option<WidgetId> {
        self.holder
    }

    /// Grants modal control to `widget`. Re-acquiring by the current holder
    /// succeeds; any other widget gets `ModalHeld`.
    pub fn acquire(&mut self, widget: WidgetId) -> Result<()> {
        match self.holder {
            Some(holder) if holder != widget => Err(UiError::ModalHeld(holder)),
            _ => {
                self.holder = Some(widget);
                tracing::debug!(widget = ?widget, "modal control acquired");
                Ok(())
            }
        }
    }

    /// Returns `false` when `widget` was not the holder.
    pub fn release(&mut self, widget: WidgetId) -> bool {
        if self.holder != Some(widget) {
            return false;
        }
        self.holder = None;
        tracing::debug!(widget = ?widget, "modal control released");
        true
    }
}
