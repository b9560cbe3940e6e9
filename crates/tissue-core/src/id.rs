//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a kind of cell.
///
/// Tissue kinds occupy `0..K` and partition the columnar axis in order.
/// Sensory kinds follow at `K..K+S`; they have no columnar range of their
/// own and live in the flat sensory-cell array instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KindOfCell(pub u16);

impl KindOfCell {
    /// The kind as a `usize` index into per-kind tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KindOfCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for KindOfCell {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_displays_as_number() {
        assert_eq!(KindOfCell(3).to_string(), "3");
        assert_eq!(KindOfCell::from(7).index(), 7);
    }
}
