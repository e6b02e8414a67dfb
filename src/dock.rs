//! Docking collaborator interface.
//!
//! A [`Docksection`] is a fixed layout slot that accepts floating windows.
//! The window core only ever asks a section to take or give back a window
//! and where, below a given point, the next drop would land. How a section
//! lays out its docked windows is entirely its own business.

use crate::sheet::{Sheet, WidgetId};

slotmap::new_key_type! {
    /// Handle to a dock section registered with [`crate::ui::Ui`].
    pub struct DockId;
}

pub trait Docksection {
    /// Accept `window`. The section may reparent it anywhere in the sheet.
    fn dock(&mut self, sheet: &mut Sheet, window: WidgetId);

    /// Give `window` back. Leaving it detached is allowed; the caller
    /// re-homes it to the root.
    fn undock(&mut self, sheet: &mut Sheet, window: WidgetId);

    /// A nested section that should receive a drop at the absolute point
    /// `(x, y)` instead of this one.
    fn docktarget(&self, _sheet: &Sheet, _x: i32, _y: i32) -> Option<DockId> {
        None
    }
}

pub(crate) struct DockEntry {
    pub(crate) anchor: WidgetId,
    pub(crate) section: Box<dyn Docksection>,
}
