//! Signed shifts along tissue axes.

use tissue_core::{ShiftInCoordinates, TissueCoordinates, TissueExtents, TorusAxes};

/// Clip `shift` so that it stays on an axis of length `len`.
///
/// On a torus axis every shift is reachable and is returned unchanged.
/// Otherwise the shift is clamped so that `coord + shift` lies in
/// `[0, len - 1]`; near a boundary the neighbourhood silently shrinks.
///
/// ```
/// use tissue_space::clip_shift;
///
/// assert_eq!(clip_shift(-3, 1, 10, false), -1);
/// assert_eq!(clip_shift(3, 8, 10, false), 1);
/// assert_eq!(clip_shift(-3, 0, 10, true), -3);
/// ```
///
/// # Panics
///
/// Panics if `len == 0` or `coord >= len`.
pub fn clip_shift(shift: i32, coord: u32, len: u32, torus: bool) -> i32 {
    assert!(coord < len, "coordinate {coord} outside axis of length {len}");
    if torus {
        return shift;
    }
    let target = (coord as i64 + shift as i64).clamp(0, len as i64 - 1);
    (target - coord as i64) as i32
}

/// Apply `shift` to `coord` on an axis of length `len`.
///
/// Torus axes wrap modulo `len`. On other axes `None` is returned when the
/// result falls off the axis.
///
/// # Panics
///
/// Panics if `len == 0`.
pub fn shift_coordinate(coord: u32, shift: i32, len: u32, torus: bool) -> Option<u32> {
    assert!(len > 0, "axis of length zero");
    let target = coord as i64 + shift as i64;
    if torus {
        Some(target.rem_euclid(len as i64) as u32)
    } else if (0..len as i64).contains(&target) {
        Some(target as u32)
    } else {
        None
    }
}

/// Apply a three-axis shift, or `None` if any axis falls off.
pub fn shift_coordinates(
    coords: TissueCoordinates,
    shift: ShiftInCoordinates,
    extents: TissueExtents,
    torus: TorusAxes,
) -> Option<TissueCoordinates> {
    Some(TissueCoordinates {
        x: shift_coordinate(coords.x, shift.dx, extents.x, torus.x)?,
        y: shift_coordinate(coords.y, shift.dy, extents.y, torus.y)?,
        c: shift_coordinate(coords.c, shift.dc, extents.columnar, torus.columnar)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn torus_example_wraps_to_far_side() {
        let low = clip_shift(-3, 0, 10, true);
        assert_eq!(low, -3);
        assert_eq!(shift_coordinate(0, low, 10, true), Some(7));
    }

    #[test]
    fn clamping_near_both_edges() {
        assert_eq!(clip_shift(-3, 0, 10, false), 0);
        assert_eq!(clip_shift(3, 9, 10, false), 0);
        assert_eq!(clip_shift(-3, 5, 10, false), -3);
        assert_eq!(clip_shift(2, 0, 1, false), 0);
    }

    #[test]
    fn shifting_off_a_flat_axis_is_none() {
        assert_eq!(shift_coordinate(0, -1, 4, false), None);
        assert_eq!(shift_coordinate(3, 1, 4, false), None);
        assert_eq!(shift_coordinate(3, 1, 4, true), Some(0));
        assert_eq!(shift_coordinate(1, -9, 4, true), Some(0));
    }

    #[test]
    fn three_axis_shift_fails_on_any_axis() {
        let e = TissueExtents {
            x: 4,
            y: 4,
            columnar: 3,
        };
        let at = TissueCoordinates::new(0, 0, 2);
        assert_eq!(
            shift_coordinates(at, ShiftInCoordinates::new(-1, -1, 0), e, TorusAxes::XY),
            Some(TissueCoordinates::new(3, 3, 2))
        );
        assert_eq!(
            shift_coordinates(at, ShiftInCoordinates::new(0, 0, 1), e, TorusAxes::XY),
            None
        );
    }

    proptest! {
        #[test]
        fn clipped_shift_stays_on_axis(len in 1u32..50, coord_seed in 0u32..50, shift in -60i32..60) {
            let coord = coord_seed % len;
            let clipped = clip_shift(shift, coord, len, false);
            let target = coord as i64 + clipped as i64;
            prop_assert!((0..len as i64).contains(&target));
            prop_assert!(clipped.abs() <= shift.abs());
            prop_assert_eq!(shift_coordinate(coord, clipped, len, false), Some(target as u32));
        }

        #[test]
        fn torus_shift_is_periodic(len in 1u32..50, coord_seed in 0u32..50, shift in -60i32..60) {
            let coord = coord_seed % len;
            let a = shift_coordinate(coord, shift, len, true);
            let b = shift_coordinate(coord, shift + len as i32, len, true);
            prop_assert_eq!(a, b);
        }
    }
}
