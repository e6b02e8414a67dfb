use ratatui::layout::{Direction, Rect};

/// Signed frame origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        x >= self.x
            && x < self.x + i32::from(self.width)
            && y >= self.y
            && y < self.y + i32::from(self.height)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Part of the rect that falls inside `bounds`, as a screen `Rect`.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let left = self.x.max(i32::from(bounds.x));
        let top = self.y.max(i32::from(bounds.y));
        let right = (self.x + i32::from(self.width))
            .min(i32::from(bounds.x) + i32::from(bounds.width));
        let bottom = (self.y + i32::from(self.height))
            .min(i32::from(bounds.y) + i32::from(bounds.height));
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Opacity {
    #[default]
    Opaque,
    /// Translucent and transparent to hit-testing.
    Hollow,
}

/// Geometry record of a single widget. The position is relative to the
/// parent wedge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    rect: FloatRect,
    fixed_width: bool,
    fixed_height: bool,
    hidden: bool,
    opacity: Opacity,
}

impl Frame {
    pub fn new(rect: FloatRect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn position(&self) -> (i32, i32) {
        (self.rect.x, self.rect.y)
    }

    pub fn size(&self) -> (i32, i32) {
        (i32::from(self.rect.width), i32::from(self.rect.height))
    }

    pub fn dposition(&self, dim: Direction) -> i32 {
        match dim {
            Direction::Horizontal => self.rect.x,
            Direction::Vertical => self.rect.y,
        }
    }

    pub fn dsize(&self, dim: Direction) -> i32 {
        match dim {
            Direction::Horizontal => i32::from(self.rect.width),
            Direction::Vertical => i32::from(self.rect.height),
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn set_position_dim(&mut self, dim: Direction, value: i32) {
        match dim {
            Direction::Horizontal => self.rect.x = value,
            Direction::Vertical => self.rect.y = value,
        }
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.rect.width = clamp_extent(width);
        self.rect.height = clamp_extent(height);
    }

    pub fn set_size_dim(&mut self, dim: Direction, value: i32) {
        match dim {
            Direction::Horizontal => self.rect.width = clamp_extent(value),
            Direction::Vertical => self.rect.height = clamp_extent(value),
        }
    }

    /// Sets the extent along `dim` and pins it against layout changes.
    pub fn set_fixed_size(&mut self, dim: Direction, value: i32) {
        self.set_size_dim(dim, value);
        match dim {
            Direction::Horizontal => self.fixed_width = true,
            Direction::Vertical => self.fixed_height = true,
        }
    }

    pub fn is_fixed(&self, dim: Direction) -> bool {
        match dim {
            Direction::Horizontal => self.fixed_width,
            Direction::Vertical => self.fixed_height,
        }
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: Opacity) {
        self.opacity = opacity;
    }
}

fn clamp_extent(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

/// Moves the boundary shared by two adjacent frames by `delta` along `dim`.
///
/// `prev` grows by the applied amount and `next` shrinks by it, with its
/// origin following the boundary. Neither frame drops below `min_extent`.
/// Returns the delta actually applied.
pub fn shift_boundary(
    prev: &mut Frame,
    next: &mut Frame,
    dim: Direction,
    delta: i32,
    min_extent: i32,
) -> i32 {
    let prev_extent = prev.dsize(dim);
    let next_extent = next.dsize(dim);
    let max_shrink = (prev_extent - min_extent).max(0);
    let max_grow = (next_extent - min_extent).max(0);
    let applied = delta.clamp(-max_shrink, max_grow);
    if applied == 0 {
        return 0;
    }
    prev.set_size_dim(dim, prev_extent + applied);
    next.set_size_dim(dim, next_extent - applied);
    next.set_position_dim(dim, next.dposition(dim) + applied);
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_excludes_far_edges_and_empty_rects() {
        let r = FloatRect::new(-2, 3, 4, 2);
        assert!(r.contains(-2, 3));
        assert!(r.contains(1, 4));
        assert!(!r.contains(2, 4));
        assert!(!r.contains(0, 5));
        assert!(!FloatRect::new(0, 0, 0, 5).contains(0, 0));
    }

    #[test]
    fn visible_in_clips_negative_offsets() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let visible = FloatRect::new(-5, 3, 20, 6).visible_in(bounds);
        assert_eq!(
            visible,
            Rect {
                x: 0,
                y: 3,
                width: 15,
                height: 6
            }
        );
        assert_eq!(
            FloatRect::new(100, 100, 5, 5).visible_in(bounds),
            Rect::default()
        );
    }

    #[test]
    fn set_size_saturates_instead_of_wrapping() {
        let mut frame = Frame::default();
        frame.set_size(-4, 70_000);
        assert_eq!(frame.size(), (0, i32::from(u16::MAX)));
    }

    #[test]
    fn fixed_size_marks_only_its_dimension() {
        let mut frame = Frame::default();
        frame.set_fixed_size(Direction::Horizontal, 480);
        assert!(frame.is_fixed(Direction::Horizontal));
        assert!(!frame.is_fixed(Direction::Vertical));
        assert_eq!(frame.dsize(Direction::Horizontal), 480);
    }

    #[test]
    fn shift_boundary_moves_next_origin_with_boundary() {
        let mut prev = Frame::new(FloatRect::new(0, 0, 50, 10));
        let mut next = Frame::new(FloatRect::new(50, 0, 50, 10));
        let applied = shift_boundary(&mut prev, &mut next, Direction::Horizontal, 7, 4);
        assert_eq!(applied, 7);
        assert_eq!(prev.rect(), FloatRect::new(0, 0, 57, 10));
        assert_eq!(next.rect(), FloatRect::new(57, 0, 43, 10));
    }

    #[test]
    fn shift_boundary_clamps_to_min_extent() {
        let mut prev = Frame::new(FloatRect::new(0, 0, 10, 20));
        let mut next = Frame::new(FloatRect::new(0, 20, 10, 20));
        let applied = shift_boundary(&mut prev, &mut next, Direction::Vertical, -100, 4);
        assert_eq!(applied, -16);
        assert_eq!(prev.dsize(Direction::Vertical), 4);
        assert_eq!(next.dsize(Direction::Vertical), 36);
        assert_eq!(next.dposition(Direction::Vertical), 4);

        // Already at the limit: nothing moves.
        assert_eq!(
            shift_boundary(&mut prev, &mut next, Direction::Vertical, -1, 4),
            0
        );
    }
}
