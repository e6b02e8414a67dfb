//! `Ui`: the sheet plus everything that lives beside the widget tree.
//!
//! The [`Sheet`] only knows about widgets. Window records, registered dock
//! sections, the modal input arbiter and the last pointer position are kept
//! here so handlers can reach all of them through one `&mut Ui`.
//!
//! The sheet logs every handle it frees, whether through [`Ui::destroy`] or
//! a destroying edit made via [`Ui::sheet_mut`]. Each `Ui` entry point
//! drains that log first, so freed windows are forgotten, dock sections
//! anchored in a freed subtree are dropped, and a freed modal holder gives
//! up control.

use slotmap::{SecondaryMap, SlotMap};

use crate::config::UiConfig;
use crate::dock::{DockEntry, DockId, Docksection};
use crate::error::{Result, UiError};
use crate::input::InputArbiter;
use crate::sheet::{Sheet, WidgetId};
use crate::window::WindowRecord;

pub struct Ui {
    sheet: Sheet,
    config: UiConfig,
    pub(crate) windows: SecondaryMap<WidgetId, WindowRecord>,
    pub(crate) docks: SlotMap<DockId, DockEntry>,
    dock_anchors: SecondaryMap<WidgetId, DockId>,
    pub(crate) arbiter: InputArbiter,
    pointer: (i32, i32),
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("sheet", &self.sheet)
            .field("windows", &self.windows.len())
            .field("docks", &self.docks.len())
            .field("modal", &self.arbiter.holder())
            .finish()
    }
}

impl Ui {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(width, height, UiConfig::default())
    }

    pub fn with_config(width: u16, height: u16, config: UiConfig) -> Self {
        let mut sheet = Sheet::new(width, height);
        sheet.record_freed();
        Self {
            sheet,
            config,
            windows: SecondaryMap::new(),
            docks: SlotMap::with_key(),
            dock_anchors: SecondaryMap::new(),
            arbiter: InputArbiter::default(),
            pointer: (0, 0),
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    pub fn root(&self) -> WidgetId {
        self.sheet.root()
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Last absolute pointer position seen by the input layer.
    pub fn pointer(&self) -> (i32, i32) {
        self.pointer
    }

    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = (x, y);
    }

    /// Widget holding modal control. A holder freed behind the `Ui`'s back
    /// no longer counts.
    pub fn modal_holder(&self) -> Option<WidgetId> {
        self.arbiter
            .holder()
            .filter(|holder| self.sheet.contains(*holder))
    }

    /// Destroys `widget` and its subtree, pruning every side table that
    /// referenced a freed widget.
    pub fn destroy(&mut self, widget: WidgetId) -> Result<Vec<WidgetId>> {
        let freed = self.sheet.destroy(widget)?;
        self.settle();
        Ok(freed)
    }

    /// Forgets everything the sheet freed since the last call.
    pub(crate) fn settle(&mut self) {
        let freed = self.sheet.take_freed();
        if !freed.is_empty() {
            self.forget(&freed);
        }
    }

    fn forget(&mut self, freed: &[WidgetId]) {
        for &id in freed {
            self.windows.remove(id);
            if let Some(dock) = self.dock_anchors.remove(id) {
                self.docks.remove(dock);
                tracing::debug!(dock = ?dock, "dock section dropped with its anchor");
            }
            if self.arbiter.holder() == Some(id) {
                self.arbiter.release(id);
                tracing::debug!(widget = ?id, "modal holder freed, control released");
            }
        }
        let docks = &self.docks;
        for (_, record) in self.windows.iter_mut() {
            if record.dock.is_some_and(|dock| !docks.contains_key(dock)) {
                record.dock = None;
            }
        }
    }

    /// Registers `section` as the dock section anchored at `anchor`.
    ///
    /// Drops over `anchor` or any of its descendants resolve to this
    /// section unless a nearer anchor or the section's own `docktarget`
    /// says otherwise.
    pub fn add_docksection(
        &mut self,
        anchor: WidgetId,
        section: impl Docksection + 'static,
    ) -> Result<DockId> {
        self.settle();
        self.sheet.node(anchor)?;
        let dock = self.docks.insert(DockEntry {
            anchor,
            section: Box::new(section),
        });
        if let Some(previous) = self.dock_anchors.insert(anchor, dock) {
            self.docks.remove(previous);
        }
        tracing::debug!(dock = ?dock, anchor = ?anchor, "dock section added");
        Ok(dock)
    }

    /// Undocks every window held by `dock` and unregisters it.
    pub fn remove_docksection(&mut self, dock: DockId) -> Result<()> {
        self.settle();
        let entry = self.docks.get(dock).ok_or(UiError::UnknownDock(dock))?;
        let anchor = entry.anchor;
        let docked: Vec<WidgetId> = self
            .windows
            .iter()
            .filter(|(_, record)| record.dock == Some(dock))
            .map(|(window, _)| window)
            .collect();
        for window in docked {
            self.undock(window)?;
        }
        self.docks.remove(dock);
        self.dock_anchors.remove(anchor);
        tracing::debug!(dock = ?dock, "dock section removed");
        Ok(())
    }

    pub fn dock_anchor(&self, dock: DockId) -> Result<WidgetId> {
        self.docks
            .get(dock)
            .map(|entry| entry.anchor)
            .ok_or(UiError::UnknownDock(dock))
    }

    /// Dock section that should receive a window dropped at `(x, y)`.
    pub fn docktarget(&self, x: i32, y: i32) -> Option<DockId> {
        let hit = self.sheet.pinpoint(x, y)?;
        let dock = self
            .sheet
            .ancestors(hit)
            .find_map(|widget| self.dock_anchors.get(widget).copied())?;
        let entry = self.docks.get(dock)?;
        let nested = entry
            .section
            .docktarget(&self.sheet, x, y)
            .filter(|nested| self.docks.contains_key(*nested));
        Some(nested.unwrap_or(dock))
    }

    /// Runs `f` with the section registered as `dock` and the sheet.
    pub(crate) fn with_section<T>(
        &mut self,
        dock: DockId,
        f: impl FnOnce(&mut dyn Docksection, &mut Sheet) -> T,
    ) -> Result<T> {
        let entry = self.docks.get_mut(dock).ok_or(UiError::UnknownDock(dock))?;
        Ok(f(entry.section.as_mut(), &mut self.sheet))
    }

    pub fn is_window(&self, widget: WidgetId) -> bool {
        self.windows.contains_key(widget)
    }

    /// Nearest window containing `widget`, itself included.
    pub fn window_of(&self, widget: WidgetId) -> Option<WidgetId> {
        self.sheet
            .ancestors(widget)
            .find(|candidate| self.windows.contains_key(*candidate))
    }
}
