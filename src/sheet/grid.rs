use ratatui::layout::Direction;

use super::{Sheet, WidgetId, WidgetKind};
use crate::constants::GRID_MIN_EXTENT;
use crate::error::{Result, UiError};
use crate::frame::shift_boundary;

/// The two adjacent cells whose shared boundary is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDrag {
    pub prev: WidgetId,
    pub next: WidgetId,
}

impl Sheet {
    pub fn grid_dim(&self, grid: WidgetId) -> Result<Direction> {
        match self.node(grid)?.kind {
            WidgetKind::GridSheet { dim } => Ok(dim),
            _ => Err(UiError::NotAGrid(grid)),
        }
    }

    pub fn on_grid_resized(
        &mut self,
        grid: WidgetId,
        hook: impl FnMut(&mut Sheet, WidgetId, WidgetId, WidgetId) + 'static,
    ) -> Result<()> {
        self.grid_dim(grid)?;
        self.hooks_mut(grid)?.on_grid_resized = Some(Box::new(hook));
        Ok(())
    }

    pub fn grid_drag_state(&self, grid: WidgetId) -> Option<GridDrag> {
        self.grid_drags.get(grid).copied()
    }

    /// Captures the boundary nearest to the absolute point `(x, y)`.
    ///
    /// Returns `false` when the grid has fewer than two visible cells.
    pub fn grid_drag_start(&mut self, grid: WidgetId, x: i32, y: i32) -> Result<bool> {
        let dim = self.grid_dim(grid)?;
        let (lx, ly) = self.local_position(grid, x, y)?;
        let pointer = match dim {
            Direction::Horizontal => lx,
            Direction::Vertical => ly,
        };
        let cells: Vec<WidgetId> = self.nodes[grid]
            .contents
            .iter()
            .copied()
            .filter(|cell| {
                let node = &self.nodes[*cell];
                !node.frame.hidden() && node.mapped && !node.kind.is_layer()
            })
            .collect();
        let nearest = cells
            .windows(2)
            .min_by_key(|pair| (self.nodes[pair[1]].frame.dposition(dim) - pointer).abs());
        let Some(&[prev, next]) = nearest else {
            return Ok(false);
        };
        self.grid_drags.insert(grid, GridDrag { prev, next });
        tracing::trace!(grid = ?grid, prev = ?prev, next = ?next, "grid drag started");
        Ok(true)
    }

    /// Moves the captured boundary by the delta along the grid dimension.
    ///
    /// A drag whose cells were destroyed or moved out of the grid is
    /// cancelled and reports `false`.
    pub fn grid_drag(&mut self, grid: WidgetId, dx: i32, dy: i32) -> Result<bool> {
        let dim = self.grid_dim(grid)?;
        let Some(drag) = self.grid_drags.get(grid).copied() else {
            return Ok(false);
        };
        let in_grid = |id: WidgetId| self.nodes.get(id).is_some_and(|n| n.parent == Some(grid));
        if !in_grid(drag.prev) || !in_grid(drag.next) {
            self.grid_drags.remove(grid);
            return Ok(false);
        }
        let delta = match dim {
            Direction::Horizontal => dx,
            Direction::Vertical => dy,
        };
        let mut prev = self.nodes[drag.prev].frame;
        let mut next = self.nodes[drag.next].frame;
        let applied = shift_boundary(&mut prev, &mut next, dim, delta, GRID_MIN_EXTENT);
        self.nodes[drag.prev].frame = prev;
        self.nodes[drag.next].frame = next;
        if applied != 0 {
            self.fire_grid_resized(grid, drag.prev, drag.next);
        }
        Ok(true)
    }

    pub fn grid_drag_end(&mut self, grid: WidgetId) -> Result<bool> {
        self.grid_dim(grid)?;
        Ok(self.grid_drags.remove(grid).is_some())
    }

    fn fire_grid_resized(&mut self, grid: WidgetId, prev: WidgetId, next: WidgetId) {
        let Some(mut hook) = self
            .hooks
            .get_mut(grid)
            .and_then(|h| h.on_grid_resized.take())
        else {
            return;
        };
        hook(self, grid, prev, next);
        if let Ok(hooks) = self.hooks_mut(grid)
            && hooks.on_grid_resized.is_none()
        {
            hooks.on_grid_resized = Some(hook);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::frame::{FloatRect, Frame};

    fn columns(sheet: &mut Sheet) -> (WidgetId, [WidgetId; 3]) {
        let root = sheet.root();
        let grid = sheet
            .spawn(root, WidgetKind::GridSheet { dim: Direction::Horizontal })
            .unwrap();
        *sheet.frame_mut(grid).unwrap() = Frame::new(FloatRect::new(10, 0, 90, 20));
        let mut cells = [grid; 3];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = sheet.container_mut(grid).unwrap().emplace(WidgetKind::Container).unwrap();
            *sheet.frame_mut(*cell).unwrap() =
                Frame::new(FloatRect::new(30 * i as i32, 0, 30, 20));
        }
        (grid, cells)
    }

    #[test]
    fn drag_picks_nearest_boundary_and_notifies() {
        let mut sheet = Sheet::new(200, 50);
        let (grid, cells) = columns(&mut sheet);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        sheet
            .on_grid_resized(grid, move |_, _, prev, next| {
                assert_eq!((prev, next), (cells[1], cells[2]));
                seen.set(seen.get() + 1);
            })
            .unwrap();

        // Boundary between cells 1 and 2 sits at local x=60, absolute x=70.
        assert!(sheet.grid_drag_start(grid, 68, 5).unwrap());
        assert_eq!(
            sheet.grid_drag_state(grid),
            Some(GridDrag { prev: cells[1], next: cells[2] })
        );
        assert!(sheet.grid_drag(grid, 5, 99).unwrap());
        assert_eq!(sheet.frame(cells[1]).unwrap().rect(), FloatRect::new(30, 0, 35, 20));
        assert_eq!(sheet.frame(cells[2]).unwrap().rect(), FloatRect::new(65, 0, 25, 20));
        assert_eq!(calls.get(), 1);

        // Clamped at the minimum extent; a no-op shift does not notify.
        sheet.grid_drag(grid, 100, 0).unwrap();
        assert_eq!(sheet.frame(cells[2]).unwrap().dsize(Direction::Horizontal), GRID_MIN_EXTENT);
        sheet.grid_drag(grid, 1, 0).unwrap();
        assert_eq!(calls.get(), 2);

        assert!(sheet.grid_drag_end(grid).unwrap());
        assert_eq!(sheet.grid_drag_state(grid), None);
        assert!(!sheet.grid_drag(grid, 1, 0).unwrap());
    }

    #[test]
    fn destroying_a_dragged_cell_cancels_the_drag() {
        let mut sheet = Sheet::new(200, 50);
        let (grid, cells) = columns(&mut sheet);
        assert!(sheet.grid_drag_start(grid, 38, 5).unwrap());
        sheet.destroy(cells[1]).unwrap();
        assert_eq!(sheet.grid_drag_state(grid), None);
        assert!(!sheet.grid_drag(grid, 3, 0).unwrap());
    }

    #[test]
    fn grid_operations_reject_other_kinds() {
        let mut sheet = Sheet::new(10, 10);
        let root = sheet.root();
        assert_eq!(sheet.grid_drag_start(root, 0, 0), Err(UiError::NotAGrid(root)));
    }
}
