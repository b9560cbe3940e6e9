//! Column permutations applied while spreading synapses.

use crate::error::ConnectError;

/// Maps each `(x, y)` column of the grid onto another column.
///
/// Spreading walks the cycles of the permutation formed by this map and a
/// fixed offset, so it should be a bijection of the grid. A result outside
/// the grid fails the spread with [`ConnectError::ShiftOutOfRange`].
pub trait ColumnShift: Sync {
    /// Column that `(x, y)` maps to.
    fn shift(&self, x: u32, y: u32) -> (u32, u32);
}

/// The identity map: spreading then depends on the offset alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityShift;

impl ColumnShift for IdentityShift {
    fn shift(&self, x: u32, y: u32) -> (u32, u32) {
        (x, y)
    }
}

impl<F> ColumnShift for F
where
    F: Fn(u32, u32) -> (u32, u32) + Sync,
{
    fn shift(&self, x: u32, y: u32) -> (u32, u32) {
        self(x, y)
    }
}

/// An explicit column permutation, validated on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnShiftTable {
    x_len: u32,
    y_len: u32,
    targets: Vec<(u32, u32)>,
}

impl ColumnShiftTable {
    /// Build from row-major targets: entry `x + x_len * y` is the image of
    /// `(x, y)`.
    pub fn new(x_len: u32, y_len: u32, targets: Vec<(u32, u32)>) -> Result<Self, ConnectError> {
        let columns = x_len as usize * y_len as usize;
        if targets.len() != columns {
            return Err(ConnectError::InvalidShiftTable {
                reason: format!("{} targets for {columns} columns", targets.len()),
            });
        }
        let mut hit = vec![false; columns];
        for (i, &(tx, ty)) in targets.iter().enumerate() {
            if tx >= x_len || ty >= y_len {
                return Err(ConnectError::InvalidShiftTable {
                    reason: format!("entry {i} maps to ({tx}, {ty}) outside the grid"),
                });
            }
            let j = (tx + x_len * ty) as usize;
            if hit[j] {
                return Err(ConnectError::InvalidShiftTable {
                    reason: format!("column ({tx}, {ty}) is hit twice"),
                });
            }
            hit[j] = true;
        }
        Ok(Self {
            x_len,
            y_len,
            targets,
        })
    }

    /// Build by evaluating `f` on every column.
    pub fn from_fn<F>(x_len: u32, y_len: u32, f: F) -> Result<Self, ConnectError>
    where
        F: Fn(u32, u32) -> (u32, u32),
    {
        let mut targets = Vec::with_capacity(x_len as usize * y_len as usize);
        for y in 0..y_len {
            for x in 0..x_len {
                targets.push(f(x, y));
            }
        }
        Self::new(x_len, y_len, targets)
    }

    /// Rigid translation by `(dx, dy)` with wrap-around.
    pub fn translation(x_len: u32, y_len: u32, dx: i32, dy: i32) -> Result<Self, ConnectError> {
        Self::from_fn(x_len, y_len, |x, y| {
            (
                (x as i64 + dx as i64).rem_euclid(x_len as i64) as u32,
                (y as i64 + dy as i64).rem_euclid(y_len as i64) as u32,
            )
        })
    }

    /// Grid width.
    pub fn x_len(&self) -> u32 {
        self.x_len
    }

    /// Grid height.
    pub fn y_len(&self) -> u32 {
        self.y_len
    }
}

impl ColumnShift for ColumnShiftTable {
    fn shift(&self, x: u32, y: u32) -> (u32, u32) {
        if x >= self.x_len || y >= self.y_len {
            return (x, y);
        }
        self.targets[(x + self.x_len * y) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_shifts() {
        let swap = |x: u32, y: u32| (y, x);
        assert_eq!(ColumnShift::shift(&swap, 1, 2), (2, 1));
        assert_eq!(IdentityShift.shift(4, 5), (4, 5));
    }

    #[test]
    fn translation_wraps() {
        let t = ColumnShiftTable::translation(4, 3, 1, -1).unwrap();
        assert_eq!(t.shift(3, 0), (0, 2));
        assert_eq!(t.shift(0, 1), (1, 0));
    }

    #[test]
    fn non_bijections_are_rejected() {
        let err = ColumnShiftTable::from_fn(3, 3, |x, _| (x, 0)).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidShiftTable { .. }));
        assert!(err.to_string().contains("hit twice"));
        assert!(ColumnShiftTable::from_fn(2, 2, |x, y| (x + 1, y)).is_err());
        assert!(ColumnShiftTable::new(2, 2, vec![(0, 0)]).is_err());
    }
}
