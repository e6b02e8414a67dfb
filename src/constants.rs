//! Shared crate-wide constants.

/// Width given to a freshly opened window that was not created docked.
pub const DEFAULT_WINDOW_WIDTH: u16 = 480;

/// Height given to a freshly opened window that was not created docked.
pub const DEFAULT_WINDOW_HEIGHT: u16 = 350;

/// Smallest width a window sizer drag may produce.
///
/// Units: frame units. Applies to every sizer drag regardless of how far
/// past the limit the pointer travels.
pub const MIN_WINDOW_WIDTH: i32 = 10;

/// Smallest height a window sizer drag may produce.
///
/// Units: frame units.
pub const MIN_WINDOW_HEIGHT: i32 = 25;

/// Height of the window header band (title and close button).
pub const WINDOW_HEADER_HEIGHT: u16 = 20;

/// Height of the window footer band that carries the two sizers.
pub const WINDOW_FOOTER_HEIGHT: u16 = 8;

/// Width of each footer sizer handle.
pub const WINDOW_SIZER_WIDTH: u16 = 8;

/// Minimum extent a grid cell keeps along the grid dimension while its
/// boundary is dragged.
pub const GRID_MIN_EXTENT: i32 = 4;

/// Upper bound on container target indirection hops.
///
/// Resolving a target chain longer than this is reported as a cycle rather
/// than looping forever on a misconfigured chain.
pub const MAX_TARGET_DEPTH: usize = 64;
