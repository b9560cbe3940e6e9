//! Tissue coordinates, relative shifts, extents and per-axis settings.

use std::fmt;

/// Absolute position of a cell in the tissue grid.
///
/// `x` and `y` select the column; `c` is the position along the columnar
/// axis. Columnar coordinates at or beyond the columnar length address the
/// sensory-cell extension (see
/// [`TissueShape::kind_at_columnar`](crate::TissueShape::kind_at_columnar)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TissueCoordinates {
    /// Coordinate along the x axis.
    pub x: u32,
    /// Coordinate along the y axis.
    pub y: u32,
    /// Coordinate along the columnar axis.
    pub c: u32,
}

impl TissueCoordinates {
    /// Create coordinates from the three axis values.
    pub const fn new(x: u32, y: u32, c: u32) -> Self {
        Self { x, y, c }
    }
}

impl fmt::Display for TissueCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.c)
    }
}

/// A signed offset between two tissue positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShiftInCoordinates {
    /// Offset along the x axis.
    pub dx: i32,
    /// Offset along the y axis.
    pub dy: i32,
    /// Offset along the columnar axis.
    pub dc: i32,
}

impl ShiftInCoordinates {
    /// The zero shift, addressing the position itself.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a shift from the three axis offsets.
    pub const fn new(dx: i32, dy: i32, dc: i32) -> Self {
        Self { dx, dy, dc }
    }
}

/// Number of positions along each axis of the tissue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TissueExtents {
    /// Cells along the x axis.
    pub x: u32,
    /// Cells along the y axis.
    pub y: u32,
    /// Cells along the columnar axis (sum over tissue kinds).
    pub columnar: u32,
}

impl TissueExtents {
    /// Number of `(x, y)` columns.
    pub fn num_columns(&self) -> u64 {
        self.x as u64 * self.y as u64
    }

    /// Number of `(x, y, c)` positions.
    pub fn num_positions(&self) -> u64 {
        self.num_columns() * self.columnar as u64
    }

    /// Whether `coords` lies inside the tissue proper.
    pub fn contains(&self, coords: TissueCoordinates) -> bool {
        coords.x < self.x && coords.y < self.y && coords.c < self.columnar
    }
}

/// Per-axis neighbourhood radius of a cell kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Radius {
    /// Radius along the x axis.
    pub x: u32,
    /// Radius along the y axis.
    pub y: u32,
    /// Radius along the columnar axis.
    pub columnar: u32,
}

impl Radius {
    /// Create a radius from the three axis values.
    pub const fn new(x: u32, y: u32, columnar: u32) -> Self {
        Self { x, y, columnar }
    }
}

/// Which axes wrap around (torus) instead of clamping at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TorusAxes {
    /// The x axis wraps.
    pub x: bool,
    /// The y axis wraps.
    pub y: bool,
    /// The columnar axis wraps.
    pub columnar: bool,
}

impl TorusAxes {
    /// No axis wraps.
    pub const NONE: Self = Self {
        x: false,
        y: false,
        columnar: false,
    };

    /// The x and y axes wrap; the columnar axis clamps.
    pub const XY: Self = Self {
        x: true,
        y: true,
        columnar: false,
    };
}
