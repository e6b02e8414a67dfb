//! The widget arena.
//!
//! A [`Sheet`] owns every widget node of one UI tree. Nodes reference each
//! other only through [`WidgetId`] handles, so the non-owning links of the
//! tree (parent, contents mirror, container target, drag references) can
//! never dangle: a handle to a freed widget simply stops resolving.
//!
//! Wedge operations (ordered, non-owning contents) live in `wedge`,
//! ownership and target indirection in `container`, and the grid boundary
//! drag in `grid`.

mod container;
mod grid;
mod wedge;

pub use container::{ContainerMut, Detached, GridHook, WidgetHook};
pub use grid::GridDrag;
pub use wedge::{TreeDump, Visitor, WedgeMut};

use ratatui::layout::Direction;
use slotmap::{SecondaryMap, SlotMap};

use crate::error::{Result, UiError};
use crate::frame::{FloatRect, Frame, Opacity};

use container::ContainerHooks;

slotmap::new_key_type! {
    /// Stable handle to a widget stored in a [`Sheet`].
    pub struct WidgetId;
}

/// Presentation skin name. The core switches skins but never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style(&'static str);

impl Style {
    pub const ROOT: Style = Style("RootSheet");
    pub const WIDGET: Style = Style("Widget");
    pub const LABEL: Style = Style("Label");
    pub const BUTTON: Style = Style("Button");
    pub const CLOSE_BUTTON: Style = Style("CloseButton");
    pub const SPACER: Style = Style("Spacer");
    pub const FILLER: Style = Style("Filler");
    pub const WEDGE: Style = Style("Wedge");
    pub const DECAL: Style = Style("Decal");
    pub const CONTAINER: Style = Style("Container");
    pub const WRAP_CONTROL: Style = Style("WrapControl");
    pub const OVERLAY: Style = Style("Overlay");
    pub const SCROLL_SHEET: Style = Style("ScrollSheet");
    pub const GRID_SHEET: Style = Style("GridSheet");
    pub const WINDOW: Style = Style("Window");
    pub const WRAP_WINDOW: Style = Style("WrapWindow");
    pub const DOCK_WINDOW: Style = Style("DockWindow");
    pub const WINDOW_HEADER: Style = Style("WindowHeader");
    pub const WINDOW_BODY: Style = Style("WindowBody");
    pub const WINDOW_FOOTER: Style = Style("WindowFooter");
    pub const WINDOW_SIZER_LEFT: Style = Style("WindowSizerLeft");
    pub const WINDOW_SIZER_RIGHT: Style = Style("WindowSizerRight");
    pub const POPUP: Style = Style("Popup");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    Root,
    Widget,
    Label(String),
    Button,
    CloseButton,
    Spacer,
    Filler,
    Wedge,
    Decal,
    Container,
    WrapControl,
    Overlay,
    ScrollSheet { wrap: bool },
    GridSheet { dim: Direction },
    Window,
    WindowHeader,
    WindowFooter,
    WindowSizer { left: bool },
    Popup,
}

impl WidgetKind {
    /// Whether the widget keeps an ordered list of child widgets.
    pub fn is_wedge(&self) -> bool {
        !matches!(
            self,
            WidgetKind::Widget
                | WidgetKind::Label(_)
                | WidgetKind::Button
                | WidgetKind::CloseButton
                | WidgetKind::Spacer
                | WidgetKind::Filler
                | WidgetKind::WindowSizer { .. }
        )
    }

    /// Whether the widget owns children and carries a container target.
    pub fn is_container(&self) -> bool {
        self.is_wedge() && !matches!(self, WidgetKind::Wedge | WidgetKind::Decal)
    }

    /// Whether the widget draws on its own z-ordered layer.
    pub fn is_layer(&self) -> bool {
        matches!(
            self,
            WidgetKind::Decal | WidgetKind::Overlay | WidgetKind::Window | WidgetKind::Popup
        )
    }

    pub fn default_style(&self) -> Style {
        match self {
            WidgetKind::Root => Style::ROOT,
            WidgetKind::Widget => Style::WIDGET,
            WidgetKind::Label(_) => Style::LABEL,
            WidgetKind::Button => Style::BUTTON,
            WidgetKind::CloseButton => Style::CLOSE_BUTTON,
            WidgetKind::Spacer => Style::SPACER,
            WidgetKind::Filler => Style::FILLER,
            WidgetKind::Wedge => Style::WEDGE,
            WidgetKind::Decal => Style::DECAL,
            WidgetKind::Container => Style::CONTAINER,
            WidgetKind::WrapControl => Style::WRAP_CONTROL,
            WidgetKind::Overlay => Style::OVERLAY,
            WidgetKind::ScrollSheet { .. } => Style::SCROLL_SHEET,
            WidgetKind::GridSheet { .. } => Style::GRID_SHEET,
            WidgetKind::Window => Style::WINDOW,
            WidgetKind::WindowHeader => Style::WINDOW_HEADER,
            WidgetKind::WindowFooter => Style::WINDOW_FOOTER,
            WidgetKind::WindowSizer { left: true } => Style::WINDOW_SIZER_LEFT,
            WidgetKind::WindowSizer { left: false } => Style::WINDOW_SIZER_RIGHT,
            WidgetKind::Popup => Style::POPUP,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: WidgetKind,
    style: Style,
    frame: Frame,
    parent: Option<WidgetId>,
    index: usize,
    mapped: bool,
    contents: Vec<WidgetId>,
    owner: Option<WidgetId>,
    owned: Vec<WidgetId>,
    target: Option<WidgetId>,
}

impl Node {
    fn new(kind: WidgetKind) -> Self {
        Self {
            style: kind.default_style(),
            kind,
            frame: Frame::default(),
            parent: None,
            index: 0,
            mapped: true,
            contents: Vec::new(),
            owner: None,
            owned: Vec::new(),
            target: None,
        }
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Recorded position inside the parent's contents.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mapped(&self) -> bool {
        self.mapped
    }

    /// Container that owns this widget, if any.
    pub fn owner(&self) -> Option<WidgetId> {
        self.owner
    }

    pub fn hidden(&self) -> bool {
        self.frame.hidden()
    }
}

pub struct Sheet {
    nodes: SlotMap<WidgetId, Node>,
    root: WidgetId,
    // bottom to top
    layers: Vec<WidgetId>,
    hooks: SecondaryMap<WidgetId, ContainerHooks>,
    grid_drags: SecondaryMap<WidgetId, GridDrag>,
    freed_log: Option<Vec<WidgetId>>,
}

impl std::fmt::Debug for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sheet")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("layers", &self.layers)
            .finish()
    }
}

impl Sheet {
    /// Creates a sheet whose root container covers `width` x `height`.
    pub fn new(width: u16, height: u16) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(|id| {
            let mut node = Node::new(WidgetKind::Root);
            node.target = Some(id);
            node.frame = Frame::new(FloatRect::new(0, 0, width, height));
            node
        });
        Self {
            nodes,
            root,
            layers: Vec::new(),
            hooks: SecondaryMap::new(),
            grid_drags: SecondaryMap::new(),
            freed_log: None,
        }
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: WidgetId) -> Result<&Node> {
        self.nodes.get(id).ok_or(UiError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(UiError::UnknownWidget(id))
    }

    pub(crate) fn wedge_node(&self, id: WidgetId) -> Result<&Node> {
        let node = self.node(id)?;
        if !node.kind.is_wedge() {
            return Err(UiError::NotAWedge(id));
        }
        Ok(node)
    }

    pub(crate) fn container_node(&self, id: WidgetId) -> Result<&Node> {
        let node = self.node(id)?;
        if !node.kind.is_container() {
            return Err(UiError::NotAContainer(id));
        }
        Ok(node)
    }

    /// Allocates a widget that is not yet placed anywhere in the tree.
    pub fn create(&mut self, kind: WidgetKind) -> Detached {
        let layer = kind.is_layer();
        let id = self.nodes.insert_with_key(|id| {
            let mut node = Node::new(kind);
            if node.kind.is_container() {
                node.target = Some(id);
            }
            node
        });
        if layer {
            self.layers.push(id);
        }
        Detached::new(id)
    }

    /// Creates a structural child of `parent` and pushes it into its contents.
    ///
    /// The child is not owned by any container; it lives as long as the
    /// subtree it was pushed into.
    pub fn spawn(&mut self, parent: WidgetId, kind: WidgetKind) -> Result<WidgetId> {
        self.wedge_node(parent)?;
        let id = self.create(kind).into_id();
        let position = self.nodes[parent].contents.len();
        self.link(parent, id, position)?;
        Ok(id)
    }

    /// Destroys `id` and its whole subtree. Returns every freed handle.
    pub fn destroy(&mut self, id: WidgetId) -> Result<Vec<WidgetId>> {
        if id == self.root {
            return Err(UiError::RootWidget);
        }
        if let Some(owner) = self.node(id)?.owner {
            self.fire_remove(owner, id);
        }
        if !self.contains(id) {
            return Ok(Vec::new());
        }
        let freed = self.free_subtree(id);
        tracing::trace!(widget = ?id, freed = freed.len(), "destroyed widget");
        Ok(freed)
    }

    pub(crate) fn free_subtree(&mut self, id: WidgetId) -> Vec<WidgetId> {
        let mut freed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if current == self.root {
                continue;
            }
            // Unlink from any surviving parent or owner outside the subtree.
            self.detach(current);
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            stack.extend(node.contents);
            stack.extend(node.owned);
            freed.push(current);
        }
        let nodes = &self.nodes;
        self.layers.retain(|layer| nodes.contains_key(*layer));
        self.grid_drags.retain(|grid, drag| {
            nodes.contains_key(grid) && nodes.contains_key(drag.prev) && nodes.contains_key(drag.next)
        });
        for id in &freed {
            self.hooks.remove(*id);
        }
        if let Some(log) = self.freed_log.as_mut() {
            log.extend_from_slice(&freed);
        }
        freed
    }

    /// Keeps every handle freed from now on until [`Sheet::take_freed`]
    /// drains it, whichever path destroyed the widget.
    pub(crate) fn record_freed(&mut self) {
        self.freed_log.get_or_insert_with(Vec::new);
    }

    pub(crate) fn take_freed(&mut self) -> Vec<WidgetId> {
        self.freed_log.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Unlinks `id` from its parent's contents and its owner's list without
    /// freeing it.
    pub(crate) fn detach(&mut self, id: WidgetId) {
        self.unlink(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if let Some(owner) = node.owner.take()
            && let Some(o) = self.nodes.get_mut(owner)
        {
            o.owned.retain(|child| *child != id);
        }
    }

    /// Removes `id` from its parent's contents, keeping its owner. Returns
    /// the former parent.
    pub(crate) fn unlink(&mut self, id: WidgetId) -> Option<WidgetId> {
        let node = self.nodes.get_mut(id)?;
        let parent = node.parent.take()?;
        node.index = 0;
        let removed_at = self.nodes.get_mut(parent).and_then(|p| {
            let position = p.contents.iter().position(|child| *child == id)?;
            p.contents.remove(position);
            Some(position)
        });
        if let Some(position) = removed_at {
            self.reindex_from(parent, position);
        }
        Some(parent)
    }

    pub(crate) fn reindex_from(&mut self, wedge: WidgetId, from: usize) {
        let Some(contents) = self.nodes.get(wedge).map(|node| node.contents.clone()) else {
            return;
        };
        for (index, child) in contents.iter().enumerate().skip(from) {
            if let Some(node) = self.nodes.get_mut(*child) {
                node.index = index;
            }
        }
    }

    /// Iterates `id` and then each of its ancestors up to the root.
    pub fn ancestors(&self, id: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |current| {
            self.nodes.get(*current).and_then(|node| node.parent)
        })
    }

    pub fn is_descendant(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether the widget is reachable from the root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        self.ancestors(id).last() == Some(self.root)
    }

    pub fn frame(&self, id: WidgetId) -> Result<&Frame> {
        Ok(&self.node(id)?.frame)
    }

    pub fn frame_mut(&mut self, id: WidgetId) -> Result<&mut Frame> {
        Ok(&mut self.node_mut(id)?.frame)
    }

    pub fn set_style(&mut self, id: WidgetId, style: Style) -> Result<()> {
        self.node_mut(id)?.style = style;
        Ok(())
    }

    /// Returns `true` when the visibility actually changed.
    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) -> Result<bool> {
        let frame = &mut self.node_mut(id)?.frame;
        let changed = frame.hidden() != hidden;
        frame.set_hidden(hidden);
        Ok(changed)
    }

    pub fn show(&mut self, id: WidgetId) -> Result<bool> {
        self.set_hidden(id, false)
    }

    pub fn hide(&mut self, id: WidgetId) -> Result<bool> {
        self.set_hidden(id, true)
    }

    pub(crate) fn set_wrap(&mut self, id: WidgetId, wrap: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if let WidgetKind::ScrollSheet { wrap: current } = &mut node.kind {
            *current = wrap;
        }
        Ok(())
    }

    pub(crate) fn set_label(&mut self, id: WidgetId, text: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        if let WidgetKind::Label(current) = &mut node.kind {
            *current = text.to_string();
        }
        Ok(())
    }

    pub fn absolute_position(&self, id: WidgetId) -> Result<(i32, i32)> {
        self.node(id)?;
        Ok(self.ancestors(id).fold((0, 0), |(x, y), current| {
            let (dx, dy) = self.nodes[current].frame.position();
            (x + dx, y + dy)
        }))
    }

    pub fn absolute_rect(&self, id: WidgetId) -> Result<FloatRect> {
        let (x, y) = self.absolute_position(id)?;
        let rect = self.node(id)?.frame.rect();
        Ok(FloatRect { x, y, ..rect })
    }

    /// Converts an absolute point into `id`'s coordinate space.
    pub fn local_position(&self, id: WidgetId, x: i32, y: i32) -> Result<(i32, i32)> {
        let (ox, oy) = self.absolute_position(id)?;
        Ok((x - ox, y - oy))
    }

    /// Nearest layer containing `id` (itself included), or the root.
    pub fn layer_of(&self, id: WidgetId) -> Result<WidgetId> {
        self.node(id)?;
        Ok(self
            .ancestors(id)
            .find(|current| self.nodes[*current].kind.is_layer())
            .unwrap_or(self.root))
    }

    /// Layers from bottom to top.
    pub fn layers(&self) -> &[WidgetId] {
        &self.layers
    }

    /// Raises the layer of `id`, together with the layers nested in it, to
    /// the top of the z-order.
    pub fn move_to_top(&mut self, id: WidgetId) -> Result<()> {
        let layer = self.layer_of(id)?;
        if layer == self.root {
            return Ok(());
        }
        let (raised, rest): (Vec<WidgetId>, Vec<WidgetId>) = self
            .layers
            .iter()
            .copied()
            .partition(|candidate| self.is_descendant(*candidate, layer));
        self.layers = rest;
        self.layers.extend(raised);
        Ok(())
    }

    pub fn set_opacity(&mut self, id: WidgetId, opacity: Opacity) -> Result<()> {
        let layer = self.layer_of(id)?;
        self.nodes[layer].frame.set_opacity(opacity);
        Ok(())
    }

    /// Deepest visible widget under the absolute point `(x, y)`.
    ///
    /// Layers are tested top-down before the base tree; hollow layers are
    /// transparent to the test.
    pub fn pinpoint(&self, x: i32, y: i32) -> Option<WidgetId> {
        for &layer in self.layers.iter().rev() {
            if !self.layer_hittable(layer) {
                continue;
            }
            let origin = self.nodes[layer]
                .parent
                .and_then(|parent| self.absolute_position(parent).ok())
                .unwrap_or((0, 0));
            if let Some(hit) = self.hit_node(layer, origin, x, y) {
                return Some(hit);
            }
        }
        self.hit_node(self.root, (0, 0), x, y)
    }

    fn layer_hittable(&self, layer: WidgetId) -> bool {
        let Some(node) = self.nodes.get(layer) else {
            return false;
        };
        if node.frame.opacity() == Opacity::Hollow || !self.is_attached(layer) {
            return false;
        }
        self.ancestors(layer).all(|current| {
            let node = &self.nodes[current];
            !node.frame.hidden() && node.mapped
        })
    }

    fn hit_node(&self, id: WidgetId, origin: (i32, i32), x: i32, y: i32) -> Option<WidgetId> {
        let node = self.nodes.get(id)?;
        if node.frame.hidden() || !node.mapped {
            return None;
        }
        let rect = node.frame.rect().offset(origin.0, origin.1);
        if !rect.contains(x, y) {
            return None;
        }
        for child in node.contents.iter().rev() {
            if self
                .nodes
                .get(*child)
                .is_some_and(|child| child.kind.is_layer())
            {
                continue;
            }
            if let Some(hit) = self.hit_node(*child, (rect.x, rect.y), x, y) {
                return Some(hit);
            }
        }
        Some(id)
    }
}
