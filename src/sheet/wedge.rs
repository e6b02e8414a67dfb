use std::fmt::Write as _;

use super::{Detached, Sheet, WidgetId, WidgetKind};
use crate::error::{Result, UiError};

/// Mutable view over one wedge's ordered contents.
pub struct WedgeMut<'a> {
    sheet: &'a mut Sheet,
    id: WidgetId,
}

impl Sheet {
    pub fn wedge_mut(&mut self, id: WidgetId) -> Result<WedgeMut<'_>> {
        self.wedge_node(id)?;
        Ok(WedgeMut { sheet: self, id })
    }

    pub fn contents(&self, wedge: WidgetId) -> Result<&[WidgetId]> {
        Ok(&self.wedge_node(wedge)?.contents)
    }

    pub fn count(&self, wedge: WidgetId) -> Result<usize> {
        Ok(self.wedge_node(wedge)?.contents.len())
    }

    pub fn at(&self, wedge: WidgetId, index: usize) -> Result<WidgetId> {
        let contents = &self.wedge_node(wedge)?.contents;
        contents
            .get(index)
            .copied()
            .ok_or(UiError::IndexOutOfRange {
                index,
                len: contents.len(),
            })
    }

    /// Moves an attached widget to the end of `wedge`, keeping its owner.
    pub fn reparent(&mut self, widget: WidgetId, wedge: WidgetId) -> Result<()> {
        self.wedge_node(wedge)?;
        if widget == self.root {
            return Err(UiError::RootWidget);
        }
        self.node(widget)?;
        if self.is_descendant(wedge, widget) {
            return Err(UiError::WouldCycle { wedge, widget });
        }
        self.unlink(widget);
        let position = self.nodes[wedge].contents.len();
        self.link(wedge, widget, position)?;
        tracing::trace!(widget = ?widget, wedge = ?wedge, "reparented widget");
        Ok(())
    }

    /// Places an unattached widget at `position` in `wedge`'s contents.
    pub(crate) fn link(&mut self, wedge: WidgetId, id: WidgetId, position: usize) -> Result<()> {
        let len = self.wedge_node(wedge)?.contents.len();
        if id == self.root {
            return Err(UiError::RootWidget);
        }
        if self.node(id)?.parent.is_some() {
            return Err(UiError::AlreadyAttached(id));
        }
        if self.is_descendant(wedge, id) {
            return Err(UiError::WouldCycle { wedge, widget: id });
        }
        if position > len {
            return Err(UiError::IndexOutOfRange {
                index: position,
                len,
            });
        }
        self.nodes[wedge].contents.insert(position, id);
        self.nodes[id].parent = Some(wedge);
        self.reindex_from(wedge, position);
        Ok(())
    }

    /// Reorders each affected owner's list so its entries living in `wedge`
    /// follow the wedge's display order.
    fn resync_owners(&mut self, wedge: WidgetId) {
        let mut owners: Vec<WidgetId> = self.nodes[wedge]
            .contents
            .iter()
            .filter_map(|child| self.nodes[*child].owner)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        for owner in owners {
            let Some(owned) = self.nodes.get(owner).map(|node| node.owned.clone()) else {
                continue;
            };
            let slots: Vec<usize> = owned
                .iter()
                .enumerate()
                .filter(|(_, child)| self.nodes[**child].parent == Some(wedge))
                .map(|(slot, _)| slot)
                .collect();
            let mut local: Vec<WidgetId> = slots.iter().map(|slot| owned[*slot]).collect();
            local.sort_by_key(|child| self.nodes[*child].index);
            let node = &mut self.nodes[owner];
            for (slot, child) in slots.into_iter().zip(local) {
                node.owned[slot] = child;
            }
        }
    }

    /// Walks `wedge`'s contents in order, depth-first where the visitor asks
    /// to descend.
    pub fn visit<V: Visitor + ?Sized>(&self, wedge: WidgetId, visitor: &mut V) -> Result<()> {
        self.visit_at(wedge, visitor, 0)
    }

    fn visit_at<V: Visitor + ?Sized>(
        &self,
        wedge: WidgetId,
        visitor: &mut V,
        depth: usize,
    ) -> Result<()> {
        for &child in &self.wedge_node(wedge)?.contents {
            let kind = &self.nodes[child].kind;
            let descend = if kind.is_container() {
                visitor.container(self, child, depth)
            } else if kind.is_wedge() {
                visitor.wedge(self, child, depth)
            } else {
                visitor.widget(self, child, depth);
                false
            };
            if descend {
                self.visit_at(child, visitor, depth + 1)?;
            }
        }
        Ok(())
    }
}

impl WedgeMut<'_> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn count(&self) -> usize {
        self.sheet.nodes[self.id].contents.len()
    }

    /// Appends an unattached widget. The wedge does not take ownership.
    pub fn push(&mut self, widget: WidgetId) -> Result<()> {
        let position = self.count();
        self.insert(widget, position)
    }

    /// Inserts an unattached widget at `index` (`0..=count`).
    pub fn insert(&mut self, widget: WidgetId, index: usize) -> Result<()> {
        self.sheet.link(self.id, widget, index)?;
        tracing::trace!(wedge = ?self.id, widget = ?widget, index, "inserted widget");
        Ok(())
    }

    /// Removes `widget` from the contents.
    ///
    /// With `destroy` the widget and its subtree are freed and `None` is
    /// returned. Otherwise the widget stays alive, detached and unowned, and
    /// the returned token must be re-homed by the caller.
    pub fn remove(&mut self, widget: WidgetId, destroy: bool) -> Result<Option<Detached>> {
        if self.sheet.node(widget)?.parent != Some(self.id) {
            return Err(UiError::NotAMember {
                wedge: self.id,
                widget,
            });
        }
        if destroy {
            self.sheet.destroy(widget)?;
            return Ok(None);
        }
        if let Some(owner) = self.sheet.nodes[widget].owner {
            self.sheet.fire_remove(owner, widget);
        }
        if !self.sheet.contains(widget) {
            return Ok(None);
        }
        self.sheet.detach(widget);
        tracing::trace!(wedge = ?self.id, widget = ?widget, "removed widget");
        Ok(Some(Detached::new(widget)))
    }

    /// Recomputes recorded positions for entries at or after `from`.
    pub fn reindex(&mut self, from: usize) -> Result<()> {
        let len = self.count();
        if from > len {
            return Err(UiError::IndexOutOfRange { index: from, len });
        }
        self.sheet.reindex_from(self.id, from);
        Ok(())
    }

    /// Moves the entry at `from` to `to`, shifting the entries in between.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let contents = &mut self.sheet.nodes[self.id].contents;
        if from < to {
            contents[from..=to].rotate_left(1);
        } else {
            contents[to..=from].rotate_right(1);
        }
        self.sheet.reindex_from(self.id, from.min(to));
        self.sheet.resync_owners(self.id);
        Ok(())
    }

    pub fn swap(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        self.sheet.nodes[self.id].contents.swap(from, to);
        self.sheet.reindex_from(self.id, from.min(to));
        self.sheet.resync_owners(self.id);
        Ok(())
    }

    /// Takes the wedge out of hit-testing and drawing without touching its
    /// contents.
    pub fn unmap(&mut self) {
        self.sheet.nodes[self.id].mapped = false;
    }

    pub fn map(&mut self) {
        self.sheet.nodes[self.id].mapped = true;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.count();
        if index >= len {
            return Err(UiError::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}

/// Traversal callbacks, dispatched on widget capability.
///
/// `wedge` and `container` return whether the walk should descend into the
/// widget's contents.
pub trait Visitor {
    fn widget(&mut self, sheet: &Sheet, id: WidgetId, depth: usize);

    fn wedge(&mut self, sheet: &Sheet, id: WidgetId, depth: usize) -> bool {
        self.widget(sheet, id, depth);
        true
    }

    fn container(&mut self, sheet: &Sheet, id: WidgetId, depth: usize) -> bool {
        self.wedge(sheet, id, depth)
    }
}

/// Renders a subtree as indented style names, one widget per line.
#[derive(Debug, Default)]
pub struct TreeDump {
    out: String,
}

impl TreeDump {
    pub fn dump(sheet: &Sheet, root: WidgetId) -> Result<String> {
        let mut dump = TreeDump::default();
        dump.widget(sheet, root, 0);
        if sheet.node(root)?.kind.is_wedge() {
            sheet.visit_at(root, &mut dump, 1)?;
        }
        Ok(dump.out)
    }
}

impl Visitor for TreeDump {
    fn widget(&mut self, sheet: &Sheet, id: WidgetId, depth: usize) {
        let Ok(node) = sheet.node(id) else {
            return;
        };
        let _ = write!(self.out, "{:indent$}{}", "", node.style.name(), indent = depth * 2);
        if let WidgetKind::Label(text) = &node.kind {
            let _ = write!(self.out, " {text:?}");
        }
        if node.frame.hidden() {
            self.out.push_str(" (hidden)");
        }
        self.out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn positions_match(sheet: &Sheet, wedge: WidgetId) -> bool {
        sheet
            .contents(wedge)
            .unwrap()
            .iter()
            .enumerate()
            .all(|(index, child)| {
                let node = sheet.node(*child).unwrap();
                node.index() == index && node.parent() == Some(wedge)
            })
    }

    fn loose(sheet: &mut Sheet) -> WidgetId {
        sheet.create(WidgetKind::Widget).into_id()
    }

    #[test]
    fn push_insert_remove_keep_positions_dense() {
        let mut sheet = Sheet::new(100, 100);
        let wedge = sheet.spawn(sheet.root(), WidgetKind::Wedge).unwrap();
        let a = loose(&mut sheet);
        let b = loose(&mut sheet);
        let c = loose(&mut sheet);
        {
            let mut w = sheet.wedge_mut(wedge).unwrap();
            w.push(a).unwrap();
            w.push(c).unwrap();
            w.insert(b, 1).unwrap();
        }
        assert_eq!(sheet.contents(wedge).unwrap(), &[a, b, c]);
        assert!(positions_match(&sheet, wedge));

        let token = sheet.wedge_mut(wedge).unwrap().remove(b, false).unwrap();
        assert_eq!(token.map(Detached::into_id), Some(b));
        assert!(sheet.contains(b));
        assert_eq!(sheet.node(b).unwrap().parent(), None);
        assert_eq!(sheet.count(wedge).unwrap(), 2);
        assert!(positions_match(&sheet, wedge));

        sheet.wedge_mut(wedge).unwrap().remove(a, true).unwrap();
        assert!(!sheet.contains(a));
        assert_eq!(sheet.contents(wedge).unwrap(), &[c]);
        assert!(positions_match(&sheet, wedge));
    }

    #[test]
    fn out_of_range_and_non_member_fail_without_mutation() {
        let mut sheet = Sheet::new(100, 100);
        let wedge = sheet.spawn(sheet.root(), WidgetKind::Wedge).unwrap();
        let a = loose(&mut sheet);
        let stranger = loose(&mut sheet);
        let mut w = sheet.wedge_mut(wedge).unwrap();
        assert_eq!(
            w.insert(a, 1),
            Err(UiError::IndexOutOfRange { index: 1, len: 0 })
        );
        w.push(a).unwrap();
        assert_eq!(
            w.remove(stranger, false).err(),
            Some(UiError::NotAMember {
                wedge,
                widget: stranger
            })
        );
        assert_eq!(w.push(a), Err(UiError::AlreadyAttached(a)));
        assert!(w.move_entry(0, 1).is_err());
        assert!(w.swap(1, 0).is_err());
        assert_eq!(w.count(), 1);
    }

    #[test]
    fn pushing_an_ancestor_is_rejected() {
        let mut sheet = Sheet::new(100, 100);
        let root = sheet.root();
        let outer = sheet.create(WidgetKind::Wedge).into_id();
        let inner = sheet.spawn(outer, WidgetKind::Wedge).unwrap();
        assert_eq!(
            sheet.wedge_mut(inner).unwrap().push(outer),
            Err(UiError::WouldCycle {
                wedge: inner,
                widget: outer
            })
        );
        assert_eq!(
            sheet.wedge_mut(inner).unwrap().push(root),
            Err(UiError::RootWidget)
        );
    }

    #[test]
    fn move_and_swap_preserve_relative_order() {
        let mut sheet = Sheet::new(100, 100);
        let wedge = sheet.spawn(sheet.root(), WidgetKind::Wedge).unwrap();
        let ids: Vec<WidgetId> = (0..5)
            .map(|_| sheet.spawn(wedge, WidgetKind::Widget).unwrap())
            .collect();

        sheet.wedge_mut(wedge).unwrap().move_entry(0, 3).unwrap();
        assert_eq!(
            sheet.contents(wedge).unwrap(),
            &[ids[1], ids[2], ids[3], ids[0], ids[4]]
        );
        sheet.wedge_mut(wedge).unwrap().move_entry(4, 0).unwrap();
        assert_eq!(
            sheet.contents(wedge).unwrap(),
            &[ids[4], ids[1], ids[2], ids[3], ids[0]]
        );
        sheet.wedge_mut(wedge).unwrap().swap(0, 4).unwrap();
        assert_eq!(
            sheet.contents(wedge).unwrap(),
            &[ids[0], ids[1], ids[2], ids[3], ids[4]]
        );
        assert!(positions_match(&sheet, wedge));
        sheet.wedge_mut(wedge).unwrap().reindex(5).unwrap();
        assert!(sheet.wedge_mut(wedge).unwrap().reindex(6).is_err());
    }

    #[test]
    fn unmap_hides_from_hit_testing_but_keeps_contents() {
        let mut sheet = Sheet::new(100, 100);
        let wedge = sheet.spawn(sheet.root(), WidgetKind::Wedge).unwrap();
        let child = sheet.spawn(wedge, WidgetKind::Widget).unwrap();
        sheet
            .frame_mut(wedge)
            .unwrap()
            .set_size(10, 10);
        sheet.frame_mut(child).unwrap().set_size(10, 10);
        assert_eq!(sheet.pinpoint(1, 1), Some(child));
        sheet.wedge_mut(wedge).unwrap().unmap();
        assert_eq!(sheet.pinpoint(1, 1), Some(sheet.root()));
        assert_eq!(sheet.contents(wedge).unwrap(), &[child]);
        sheet.wedge_mut(wedge).unwrap().map();
        assert_eq!(sheet.pinpoint(1, 1), Some(child));
    }

    #[test]
    fn tree_dump_lists_contents_depth_first() {
        let mut sheet = Sheet::new(100, 100);
        let root = sheet.root();
        let wrap = sheet.spawn(root, WidgetKind::WrapControl).unwrap();
        sheet
            .spawn(wrap, WidgetKind::Label("Name".to_string()))
            .unwrap();
        let spacer = sheet.spawn(wrap, WidgetKind::Spacer).unwrap();
        sheet.hide(spacer).unwrap();
        sheet.spawn(root, WidgetKind::Filler).unwrap();

        let expected = indoc! {r#"
            RootSheet
              WrapControl
                Label "Name"
                Spacer (hidden)
              Filler
        "#};
        assert_eq!(TreeDump::dump(&sheet, root).unwrap(), expected);
    }

    #[test]
    fn visitor_can_prune_descent() {
        struct Shallow(Vec<WidgetId>);
        impl Visitor for Shallow {
            fn widget(&mut self, _: &Sheet, id: WidgetId, _: usize) {
                self.0.push(id);
            }
            fn container(&mut self, sheet: &Sheet, id: WidgetId, depth: usize) -> bool {
                self.widget(sheet, id, depth);
                false
            }
        }
        let mut sheet = Sheet::new(100, 100);
        let root = sheet.root();
        let container = sheet.spawn(root, WidgetKind::Container).unwrap();
        sheet.spawn(container, WidgetKind::Widget).unwrap();
        let wedge = sheet.spawn(root, WidgetKind::Wedge).unwrap();
        let leaf = sheet.spawn(wedge, WidgetKind::Widget).unwrap();

        let mut visitor = Shallow(Vec::new());
        sheet.visit(root, &mut visitor).unwrap();
        assert_eq!(visitor.0, vec![container, wedge, leaf]);
    }

    #[test]
    fn interleaved_owners_follow_wedge_order_after_moves() {
        let mut sheet = Sheet::new(100, 100);
        let root = sheet.root();
        let wedge = sheet.spawn(root, WidgetKind::Wedge).unwrap();
        let left = sheet.spawn(root, WidgetKind::Container).unwrap();
        let right = sheet.spawn(root, WidgetKind::Container).unwrap();
        let place = |sheet: &mut Sheet, owner: WidgetId| {
            sheet
                .container_mut(owner)
                .unwrap()
                .emplace_local(wedge, WidgetKind::Widget)
                .unwrap()
        };
        let a1 = place(&mut sheet, left);
        let b1 = place(&mut sheet, right);
        let a2 = place(&mut sheet, left);
        let b2 = place(&mut sheet, right);
        assert_eq!(sheet.contents(wedge).unwrap(), &[a1, b1, a2, b2]);

        sheet.wedge_mut(wedge).unwrap().move_entry(3, 0).unwrap();
        sheet.wedge_mut(wedge).unwrap().swap(1, 3).unwrap();
        assert_eq!(sheet.contents(wedge).unwrap(), &[b2, a2, b1, a1]);
        assert_eq!(sheet.container_contents(left).unwrap(), &[a2, a1]);
        assert_eq!(sheet.container_contents(right).unwrap(), &[b2, b1]);
        assert!(positions_match(&sheet, wedge));
    }
}
