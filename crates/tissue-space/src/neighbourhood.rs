//! The clipped box of relative shifts around a position.

use tissue_core::{Radius, ShiftInCoordinates, TissueCoordinates, TissueExtents, TorusAxes};

use crate::shift::{clip_shift, shift_coordinates};

/// Neighbourhood of a position: its centre plus the lowest and highest
/// admissible shift along every axis.
///
/// On flat axes the box is clipped to the tissue, so it is asymmetric near
/// a boundary. On torus axes it spans `[-R, R]` and lookups wrap; a radius
/// of half the axis length or more visits some positions twice.
///
/// ```
/// use tissue_core::{Radius, ShiftInCoordinates, TissueCoordinates, TissueExtents, TorusAxes};
/// use tissue_space::SpatialNeighbourhood;
///
/// let extents = TissueExtents { x: 10, y: 10, columnar: 1 };
/// let n = SpatialNeighbourhood::around(
///     TissueCoordinates::new(0, 0, 0),
///     Radius::new(3, 3, 0),
///     extents,
///     TorusAxes { x: true, y: false, columnar: false },
/// );
/// assert_eq!(n.low(), ShiftInCoordinates::new(-3, 0, 0));
/// let far = n.resolve(ShiftInCoordinates::new(-3, 0, 0)).unwrap();
/// assert_eq!(far.x, 7);
/// assert!(n.resolve(ShiftInCoordinates::new(0, -1, 0)).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpatialNeighbourhood {
    center: TissueCoordinates,
    low: ShiftInCoordinates,
    high: ShiftInCoordinates,
    extents: TissueExtents,
    torus: TorusAxes,
}

fn signed(radius: u32) -> i32 {
    i32::try_from(radius).unwrap_or(i32::MAX)
}

impl SpatialNeighbourhood {
    /// Neighbourhood of `radius` around `center`.
    ///
    /// # Panics
    ///
    /// Panics if `center` lies outside `extents`.
    pub fn around(
        center: TissueCoordinates,
        radius: Radius,
        extents: TissueExtents,
        torus: TorusAxes,
    ) -> Self {
        let (rx, ry, rc) = (signed(radius.x), signed(radius.y), signed(radius.columnar));
        Self {
            center,
            low: ShiftInCoordinates {
                dx: clip_shift(-rx, center.x, extents.x, torus.x),
                dy: clip_shift(-ry, center.y, extents.y, torus.y),
                dc: clip_shift(-rc, center.c, extents.columnar, torus.columnar),
            },
            high: ShiftInCoordinates {
                dx: clip_shift(rx, center.x, extents.x, torus.x),
                dy: clip_shift(ry, center.y, extents.y, torus.y),
                dc: clip_shift(rc, center.c, extents.columnar, torus.columnar),
            },
            extents,
            torus,
        }
    }

    /// The centre position.
    pub fn center(&self) -> TissueCoordinates {
        self.center
    }

    /// Lowest admissible shift per axis (each component `<= 0`).
    pub fn low(&self) -> ShiftInCoordinates {
        self.low
    }

    /// Highest admissible shift per axis (each component `>= 0`).
    pub fn high(&self) -> ShiftInCoordinates {
        self.high
    }

    /// Whether `shift` lies inside the clipped box.
    pub fn contains(&self, shift: ShiftInCoordinates) -> bool {
        (self.low.dx..=self.high.dx).contains(&shift.dx)
            && (self.low.dy..=self.high.dy).contains(&shift.dy)
            && (self.low.dc..=self.high.dc).contains(&shift.dc)
    }

    /// Absolute coordinates of `shift`, or `None` outside the box.
    pub fn resolve(&self, shift: ShiftInCoordinates) -> Option<TissueCoordinates> {
        if !self.contains(shift) {
            return None;
        }
        shift_coordinates(self.center, shift, self.extents, self.torus)
    }

    /// Number of shifts in the box.
    pub fn len(&self) -> u64 {
        let span = |lo: i32, hi: i32| (hi as i64 - lo as i64 + 1) as u64;
        span(self.low.dx, self.high.dx)
            * span(self.low.dy, self.high.dy)
            * span(self.low.dc, self.high.dc)
    }

    /// Never true: the zero shift is always inside.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every shift in the box, `dx` fastest, then `dy`, then `dc`.
    pub fn shifts(&self) -> impl Iterator<Item = ShiftInCoordinates> + '_ {
        (self.low.dc..=self.high.dc).flat_map(move |dc| {
            (self.low.dy..=self.high.dy).flat_map(move |dy| {
                (self.low.dx..=self.high.dx).map(move |dx| ShiftInCoordinates { dx, dy, dc })
            })
        })
    }
}
