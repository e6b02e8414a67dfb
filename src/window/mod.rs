mod header;
mod popup;
mod sizer;

use ratatui::layout::Direction;

use crate::dock::DockId;
use crate::error::{Rejected, Result, UiError};
use crate::sheet::{Style, WidgetId, WidgetKind};
use crate::ui::Ui;

/// Independently toggleable window flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub movable: bool,
    pub sizable: bool,
    pub closable: bool,
    pub dockable: bool,
    /// Body sizes to its content and the window uses the wrap skin.
    pub shrink: bool,
    pub activated: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            movable: true,
            sizable: true,
            closable: true,
            dockable: false,
            shrink: false,
            activated: false,
        }
    }
}

/// Runs once while the window is still alive and already undocked.
pub type CloseCallback = Box<dyn FnOnce(&mut Ui, WidgetId)>;

pub struct WindowBuilder {
    title: String,
    state: WindowState,
    on_close: Option<CloseCallback>,
    dock: Option<DockId>,
    size: Option<(u16, u16)>,
}

impl WindowBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: WindowState::default(),
            on_close: None,
            dock: None,
            size: None,
        }
    }

    pub fn state(mut self, state: WindowState) -> Self {
        self.state = state;
        self
    }

    pub fn on_close(mut self, callback: impl FnOnce(&mut Ui, WidgetId) + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Opens the window docked into `dock` instead of centred.
    pub fn docked(mut self, dock: DockId) -> Self {
        self.dock = Some(dock);
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.size = Some((width, height));
        self
    }
}

/// Structural children every window is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParts {
    pub header: WidgetId,
    pub title: WidgetId,
    pub close: WidgetId,
    pub body: WidgetId,
    pub footer: WidgetId,
    /// Left then right.
    pub sizers: [WidgetId; 2],
}

pub(crate) struct WindowRecord {
    name: String,
    state: WindowState,
    parts: WindowParts,
    on_close: Option<CloseCallback>,
    pub(crate) dock: Option<DockId>,
    // movable, sizable
    pre_dock: Option<(bool, bool)>,
}

impl Ui {
    /// Builds a window under `parent`.
    ///
    /// Container parents receive it through their target, other wedges
    /// hold it structurally. Generic content added to the window later is
    /// routed into its body.
    pub fn open_window(&mut self, parent: WidgetId, builder: WindowBuilder) -> Result<WidgetId> {
        self.settle();
        let parent_kind = self.sheet().node(parent)?.kind().clone();
        if !parent_kind.is_wedge() {
            return Err(UiError::NotAWedge(parent));
        }
        if let Some(dock) = builder.dock {
            self.dock_anchor(dock)?;
        }

        let sheet = self.sheet_mut();
        let token = sheet.create(WidgetKind::Window);
        let window = if parent_kind.is_container() {
            match sheet.container_mut(parent)?.append(token) {
                Ok(window) => window,
                Err(Rejected { error, widget }) => {
                    sheet.discard(widget);
                    return Err(error);
                }
            }
        } else {
            let window = token.into_id();
            sheet.wedge_mut(parent)?.push(window)?;
            window
        };

        let header = sheet.spawn(window, WidgetKind::WindowHeader)?;
        let title = sheet.spawn(header, WidgetKind::Label(builder.title.clone()))?;
        let close = sheet.spawn(header, WidgetKind::CloseButton)?;
        let body = sheet.spawn(window, WidgetKind::ScrollSheet { wrap: false })?;
        sheet.set_style(body, Style::WINDOW_BODY)?;
        let footer = sheet.spawn(window, WidgetKind::WindowFooter)?;
        let left = sheet.spawn(footer, WidgetKind::WindowSizer { left: true })?;
        let right = sheet.spawn(footer, WidgetKind::WindowSizer { left: false })?;
        let body_target = sheet.target(body)?;
        sheet.set_container_target(window, body_target)?;

        let state = builder.state;
        if !state.closable {
            sheet.hide(close)?;
        }
        if !state.sizable {
            sheet.hide(footer)?;
        }
        if state.shrink {
            sheet.set_wrap(body, true)?;
            sheet.set_style(window, Style::WRAP_WINDOW)?;
        }

        let (width, height) = builder.size.unwrap_or(self.config().default_window_size);
        let sheet = self.sheet_mut();
        let frame = sheet.frame_mut(window)?;
        frame.set_fixed_size(Direction::Horizontal, i32::from(width));
        frame.set_fixed_size(Direction::Vertical, i32::from(height));
        if builder.dock.is_none() {
            let (parent_width, parent_height) = sheet.frame(parent)?.size();
            let x = (parent_width - i32::from(width)) / 2;
            let y = (parent_height - i32::from(height)) / 2;
            sheet.frame_mut(window)?.set_position(x, y);
        }

        self.windows.insert(
            window,
            WindowRecord {
                name: builder.title,
                state,
                parts: WindowParts {
                    header,
                    title,
                    close,
                    body,
                    footer,
                    sizers: [left, right],
                },
                on_close: builder.on_close,
                dock: None,
                pre_dock: None,
            },
        );
        self.arrange_chrome(window)?;
        self.sheet_mut().move_to_top(window)?;
        tracing::debug!(window = ?window, title = %self.window_name(window)?, "window opened");

        if let Some(dock) = builder.dock {
            self.dock(window, dock)?;
        }
        Ok(window)
    }

    fn record(&self, window: WidgetId) -> Result<&WindowRecord> {
        self.windows.get(window).ok_or(UiError::NotAWindow(window))
    }

    fn record_mut(&mut self, window: WidgetId) -> Result<&mut WindowRecord> {
        self.windows.get_mut(window).ok_or(UiError::NotAWindow(window))
    }

    pub fn window_state(&self, window: WidgetId) -> Result<WindowState> {
        Ok(self.record(window)?.state)
    }

    pub fn window_name(&self, window: WidgetId) -> Result<&str> {
        Ok(&self.record(window)?.name)
    }

    pub fn window_parts(&self, window: WidgetId) -> Result<WindowParts> {
        Ok(self.record(window)?.parts)
    }

    /// Section currently holding the window, if docked.
    pub fn window_dock(&self, window: WidgetId) -> Result<Option<DockId>> {
        Ok(self.record(window)?.dock)
    }

    pub fn set_title(&mut self, window: WidgetId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        let label = self.record(window)?.parts.title;
        self.sheet_mut().set_label(label, &title)?;
        self.record_mut(window)?.name = title;
        Ok(())
    }

    /// Returns the new `movable` value.
    pub fn toggle_movable(&mut self, window: WidgetId) -> Result<bool> {
        let state = &mut self.record_mut(window)?.state;
        state.movable = !state.movable;
        Ok(state.movable)
    }

    /// Flips `sizable`, showing or hiding the footer with it.
    pub fn toggle_resizable(&mut self, window: WidgetId) -> Result<bool> {
        let sizable = !self.record(window)?.state.sizable;
        self.set_sizable(window, sizable)?;
        Ok(sizable)
    }

    fn set_sizable(&mut self, window: WidgetId, sizable: bool) -> Result<()> {
        let record = self.record_mut(window)?;
        record.state.sizable = sizable;
        let footer = record.parts.footer;
        self.sheet_mut().set_hidden(footer, !sizable)?;
        self.arrange_chrome(window)
    }

    /// Shows or hides the close button. Returns the new `closable` value.
    pub fn toggle_closable(&mut self, window: WidgetId) -> Result<bool> {
        let close = self.record(window)?.parts.close;
        let closable = self.sheet().frame(close)?.hidden();
        self.sheet_mut().set_hidden(close, !closable)?;
        self.record_mut(window)?.state.closable = closable;
        Ok(closable)
    }

    /// Flips `shrink`: the body wraps its content and the window switches
    /// to the wrap skin, or back.
    pub fn toggle_wrap(&mut self, window: WidgetId) -> Result<bool> {
        let record = self.record_mut(window)?;
        record.state.shrink = !record.state.shrink;
        let shrink = record.state.shrink;
        let body = record.parts.body;
        let docked = record.dock.is_some();
        let sheet = self.sheet_mut();
        sheet.set_wrap(body, shrink)?;
        if !docked {
            let style = if shrink { Style::WRAP_WINDOW } else { Style::WINDOW };
            sheet.set_style(window, style)?;
        }
        Ok(shrink)
    }

    pub fn show_titlebar(&mut self, window: WidgetId) -> Result<()> {
        let header = self.record(window)?.parts.header;
        self.sheet_mut().show(header)?;
        self.arrange_chrome(window)
    }

    pub fn hide_titlebar(&mut self, window: WidgetId) -> Result<()> {
        let header = self.record(window)?.parts.header;
        self.sheet_mut().hide(header)?;
        self.arrange_chrome(window)
    }

    /// Places header, body and footer bands inside the window frame.
    pub(crate) fn arrange_chrome(&mut self, window: WidgetId) -> Result<()> {
        let parts = self.record(window)?.parts;
        let config = *self.config();
        let header_height = i32::from(config.header_height);
        let footer_height = i32::from(config.footer_height);
        let sizer_width = i32::from(config.sizer_width);

        let sheet = self.sheet_mut();
        let (width, height) = sheet.frame(window)?.size();
        let top = if sheet.frame(parts.header)?.hidden() {
            0
        } else {
            header_height
        };
        let bottom = if sheet.frame(parts.footer)?.hidden() {
            0
        } else {
            footer_height
        };

        let mut place = |id: WidgetId, x: i32, y: i32, w: i32, h: i32| -> Result<()> {
            let frame = sheet.frame_mut(id)?;
            frame.set_position(x, y);
            frame.set_size(w, h);
            Ok(())
        };
        place(parts.header, 0, 0, width, header_height)?;
        place(parts.title, 0, 0, width - header_height, header_height)?;
        place(parts.close, width - header_height, 0, header_height, header_height)?;
        place(parts.body, 0, top, width, height - top - bottom)?;
        place(parts.footer, 0, height - footer_height, width, footer_height)?;
        place(parts.sizers[0], 0, 0, sizer_width, footer_height)?;
        place(parts.sizers[1], width - sizer_width, 0, sizer_width, footer_height)?;
        Ok(())
    }

    /// Hands the window to `dock`.
    ///
    /// The window stops being movable or sizable until undocked; the flags
    /// it had are restored by [`Ui::undock`].
    pub fn dock(&mut self, window: WidgetId, dock: DockId) -> Result<()> {
        self.settle();
        let current = self.record(window)?.dock;
        self.dock_anchor(dock)?;
        if current == Some(dock) {
            return Ok(());
        }
        if current.is_some() {
            self.undock(window)?;
        }

        let record = self.record_mut(window)?;
        record.pre_dock = Some((record.state.movable, record.state.sizable));
        record.state.movable = false;
        record.dock = Some(dock);
        self.sheet_mut().set_style(window, Style::DOCK_WINDOW)?;
        self.set_sizable(window, false)?;
        self.with_section(dock, |section, sheet| section.dock(sheet, window))?;
        if self.sheet().contains(window) {
            self.arrange_chrome(window)?;
        }
        tracing::debug!(window = ?window, dock = ?dock, "window docked");
        Ok(())
    }

    /// Takes the window back from its dock section and leaves it floating
    /// at the same absolute position. No-op for floating windows.
    pub fn undock(&mut self, window: WidgetId) -> Result<()> {
        self.settle();
        let Some(dock) = self.record(window)?.dock else {
            return Ok(());
        };
        let (abs_x, abs_y) = self.sheet().absolute_position(window)?;
        if self.docks.contains_key(dock) {
            self.with_section(dock, |section, sheet| section.undock(sheet, window))?;
        }
        if !self.sheet().contains(window) {
            self.windows.remove(window);
            return Ok(());
        }

        let root = self.root();
        if self.sheet().node(window)?.parent().is_none() {
            self.sheet_mut().wedge_mut(root)?.push(window)?;
        }

        let record = self.record_mut(window)?;
        record.dock = None;
        let (movable, sizable) = record.pre_dock.take().unwrap_or((true, true));
        record.state.movable = movable;
        let style = if record.state.shrink {
            Style::WRAP_WINDOW
        } else {
            Style::WINDOW
        };
        self.sheet_mut().set_style(window, style)?;
        self.set_sizable(window, sizable)?;

        let sheet = self.sheet_mut();
        let parent = sheet.node(window)?.parent().unwrap_or(root);
        let (x, y) = sheet.local_position(parent, abs_x, abs_y)?;
        sheet.frame_mut(window)?.set_position(x, y);
        sheet.move_to_top(window)?;
        tracing::debug!(window = ?window, dock = ?dock, x, y, "window undocked");
        Ok(())
    }

    /// Undocks, runs the close callback and destroys the window, in that
    /// order.
    pub fn close(&mut self, window: WidgetId) -> Result<()> {
        self.settle();
        self.record(window)?;
        tracing::debug!(window = ?window, "closing window");
        self.undock(window)?;
        let callback = self
            .windows
            .get_mut(window)
            .and_then(|record| record.on_close.take());
        if let Some(callback) = callback {
            callback(self, window);
        }
        if self.sheet().contains(window) {
            self.destroy(window)?;
        } else {
            self.settle();
        }
        Ok(())
    }

    /// Click anywhere on the window: floating windows come to the front.
    pub(crate) fn window_click(&mut self, window: WidgetId) -> bool {
        if self.windows.get(window).is_some_and(|r| r.dock.is_none())
            && let Err(err) = self.sheet_mut().move_to_top(window)
        {
            tracing::warn!(window = ?window, error = %err, "failed to raise window");
        }
        true
    }
}
