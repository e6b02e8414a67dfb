use super::{Sheet, WidgetId, WidgetKind};
use crate::constants::MAX_TARGET_DEPTH;
use crate::error::{Rejected, Result, UiError};

/// Ownership of a widget that is not placed in any container.
///
/// Produced by [`Sheet::create`] and by non-destroying removals; consumed by
/// [`ContainerMut::insert`], [`ContainerMut::append`] or [`Sheet::discard`].
#[must_use = "a detached widget stays allocated until it is re-homed or discarded"]
#[derive(Debug, PartialEq, Eq)]
pub struct Detached(WidgetId);

impl Detached {
    pub(crate) fn new(id: WidgetId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> WidgetId {
        self.0
    }

    /// Gives up ownership and returns the bare handle, e.g. to place the
    /// widget structurally with [`super::WedgeMut::push`].
    pub fn into_id(self) -> WidgetId {
        self.0
    }
}

/// Called with `(sheet, container, widget)`.
pub type WidgetHook = Box<dyn FnMut(&mut Sheet, WidgetId, WidgetId)>;
/// Called with `(sheet, grid, prev, next)`.
pub type GridHook = Box<dyn FnMut(&mut Sheet, WidgetId, WidgetId, WidgetId)>;

#[derive(Default)]
pub(crate) struct ContainerHooks {
    pub(crate) on_add: Option<WidgetHook>,
    pub(crate) on_remove: Option<WidgetHook>,
    pub(crate) on_grid_resized: Option<GridHook>,
}

/// Mutable view over one container's owned children.
pub struct ContainerMut<'a> {
    sheet: &'a mut Sheet,
    id: WidgetId,
}

impl Sheet {
    pub fn container_mut(&mut self, id: WidgetId) -> Result<ContainerMut<'_>> {
        self.container_node(id)?;
        Ok(ContainerMut { sheet: self, id })
    }

    /// Widgets exclusively owned by `container`, in ownership order.
    pub fn container_contents(&self, container: WidgetId) -> Result<&[WidgetId]> {
        Ok(&self.container_node(container)?.owned)
    }

    /// Resolves the insertion target of `container` to its fixed point.
    pub fn target(&self, container: WidgetId) -> Result<WidgetId> {
        self.container_node(container)?;
        let mut current = container;
        for _ in 0..MAX_TARGET_DEPTH {
            let next = self.nodes[current].target.unwrap_or(current);
            if next == current || !self.nodes.contains_key(next) {
                return Ok(current);
            }
            current = next;
        }
        Err(UiError::TargetCycle(container))
    }

    /// Redirects insertions into `container` to `target`.
    ///
    /// Fails with `TargetCycle` (and leaves the previous target in place)
    /// when the new chain would not terminate.
    pub fn set_container_target(&mut self, container: WidgetId, target: WidgetId) -> Result<()> {
        self.container_node(container)?;
        self.container_node(target)?;
        let previous = self.nodes[container].target.replace(target);
        if let Err(err) = self.target(container) {
            self.nodes[container].target = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn on_add(
        &mut self,
        container: WidgetId,
        hook: impl FnMut(&mut Sheet, WidgetId, WidgetId) + 'static,
    ) -> Result<()> {
        self.container_node(container)?;
        self.hooks_mut(container)?.on_add = Some(Box::new(hook));
        Ok(())
    }

    pub fn on_remove(
        &mut self,
        container: WidgetId,
        hook: impl FnMut(&mut Sheet, WidgetId, WidgetId) + 'static,
    ) -> Result<()> {
        self.container_node(container)?;
        self.hooks_mut(container)?.on_remove = Some(Box::new(hook));
        Ok(())
    }

    pub(crate) fn hooks_mut(&mut self, id: WidgetId) -> Result<&mut ContainerHooks> {
        Ok(self
            .hooks
            .entry(id)
            .ok_or(UiError::UnknownWidget(id))?
            .or_default())
    }

    pub(crate) fn fire_add(&mut self, container: WidgetId, widget: WidgetId) {
        let Some(mut hook) = self.hooks.get_mut(container).and_then(|h| h.on_add.take()) else {
            return;
        };
        hook(self, container, widget);
        if let Ok(hooks) = self.hooks_mut(container)
            && hooks.on_add.is_none()
        {
            hooks.on_add = Some(hook);
        }
    }

    pub(crate) fn fire_remove(&mut self, container: WidgetId, widget: WidgetId) {
        let Some(mut hook) = self
            .hooks
            .get_mut(container)
            .and_then(|h| h.on_remove.take())
        else {
            return;
        };
        hook(self, container, widget);
        if let Ok(hooks) = self.hooks_mut(container)
            && hooks.on_remove.is_none()
        {
            hooks.on_remove = Some(hook);
        }
    }

    /// Frees a widget that was never re-homed.
    pub fn discard(&mut self, widget: Detached) -> Vec<WidgetId> {
        self.free_subtree(widget.into_id())
    }

    /// Makes `owner` the owner of `widget` at `slot` in its owned list and
    /// places the widget in `wedge` at the matching position.
    fn adopt(
        &mut self,
        owner: WidgetId,
        wedge: WidgetId,
        widget: Detached,
        slot: usize,
    ) -> Result<WidgetId, Rejected> {
        let id = widget.id();
        if let Err(error) = self.check_adopt(owner, wedge, id, slot) {
            return Err(Rejected { error, widget });
        }
        let owned = &self.nodes[owner].owned;
        // Mirror position: just before the next owned entry living in the
        // same wedge, else at the end.
        let position = owned[slot..]
            .iter()
            .find(|later| self.nodes[**later].parent == Some(wedge))
            .map(|later| self.nodes[*later].index)
            .unwrap_or(self.nodes[wedge].contents.len());
        if let Err(error) = self.link(wedge, id, position) {
            return Err(Rejected { error, widget });
        }
        let id = widget.into_id();
        self.nodes[owner].owned.insert(slot, id);
        self.nodes[id].owner = Some(owner);
        tracing::trace!(container = ?owner, widget = ?id, slot, "container adopted widget");
        self.fire_add(owner, id);
        Ok(id)
    }

    /// Frees `widget` when it was refused, passing the error through.
    fn adopt_or_discard(
        &mut self,
        owner: WidgetId,
        wedge: WidgetId,
        widget: Detached,
        slot: usize,
    ) -> Result<WidgetId> {
        self.adopt(owner, wedge, widget, slot)
            .map_err(|Rejected { error, widget }| {
                self.discard(widget);
                error
            })
    }

    fn check_adopt(&self, owner: WidgetId, wedge: WidgetId, id: WidgetId, slot: usize) -> Result<()> {
        let len = self.container_node(owner)?.owned.len();
        self.wedge_node(wedge)?;
        let node = self.node(id)?;
        if node.parent.is_some() || node.owner.is_some() {
            return Err(UiError::AlreadyAttached(id));
        }
        if slot > len {
            return Err(UiError::IndexOutOfRange { index: slot, len });
        }
        Ok(())
    }
}

impl ContainerMut<'_> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn target(&self) -> Result<WidgetId> {
        self.sheet.target(self.id)
    }

    /// Transfers `widget` into the target container at `index` of its owned
    /// list. Returns the widget's handle.
    ///
    /// A refused widget is handed back inside the error, still detached.
    pub fn insert(&mut self, widget: Detached, index: usize) -> Result<WidgetId, Rejected> {
        let target = match self.target() {
            Ok(target) => target,
            Err(error) => return Err(Rejected { error, widget }),
        };
        self.sheet.adopt(target, target, widget, index)
    }

    pub fn append(&mut self, widget: Detached) -> Result<WidgetId, Rejected> {
        let target = match self.target() {
            Ok(target) => target,
            Err(error) => return Err(Rejected { error, widget }),
        };
        let slot = self.sheet.nodes[target].owned.len();
        self.sheet.adopt(target, target, widget, slot)
    }

    /// Gives up ownership of `widget`.
    ///
    /// The remove hook runs while the widget is still in place. With
    /// `destroy` the widget is freed and `None` is returned; otherwise the
    /// caller receives the detached widget.
    pub fn release(&mut self, widget: WidgetId, destroy: bool) -> Result<Option<Detached>> {
        let target = self.target()?;
        let owner = self.sheet.node(widget)?.owner;
        let Some(owner) = owner.filter(|owner| *owner == self.id || *owner == target) else {
            return Err(UiError::NotAMember {
                wedge: self.id,
                widget,
            });
        };
        self.sheet.fire_remove(owner, widget);
        if !self.sheet.contains(widget) {
            return Ok(None);
        }
        if destroy {
            self.sheet.free_subtree(widget);
            tracing::trace!(container = ?owner, widget = ?widget, "released and destroyed widget");
            return Ok(None);
        }
        self.sheet.detach(widget);
        tracing::trace!(container = ?owner, widget = ?widget, "released widget");
        Ok(Some(Detached::new(widget)))
    }

    /// Destroys every widget owned by the target container.
    pub fn clear(&mut self) -> Result<()> {
        let target = self.target()?;
        let owned = self.sheet.nodes[target].owned.clone();
        for widget in owned {
            if self.sheet.contains(widget) {
                self.sheet.destroy(widget)?;
            }
        }
        Ok(())
    }

    /// Creates a widget of `kind` and appends it through the target.
    pub fn emplace(&mut self, kind: WidgetKind) -> Result<WidgetId> {
        let target = self.target()?;
        let widget = self.sheet.create(kind);
        let slot = self.sheet.nodes[target].owned.len();
        self.sheet.adopt_or_discard(target, target, widget, slot)
    }

    /// Creates a widget owned by this container itself, placed in `wedge`
    /// without going through the target.
    pub fn emplace_local(&mut self, wedge: WidgetId, kind: WidgetKind) -> Result<WidgetId> {
        self.sheet.wedge_node(wedge)?;
        let widget = self.sheet.create(kind);
        let slot = self.sheet.nodes[self.id].owned.len();
        self.sheet.adopt_or_discard(self.id, wedge, widget, slot)
    }
}
