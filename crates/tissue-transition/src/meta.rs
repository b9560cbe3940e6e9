//! Static metadata of the position being updated.

use tissue_core::{KindOfCell, Radius, TissueCoordinates, TissueShape};

/// Where a transition is being applied and what kind of cell lives there.
#[derive(Clone, Copy, Debug)]
pub struct PositionMeta<'a> {
    shape: &'a TissueShape,
    coords: TissueCoordinates,
    kind: KindOfCell,
    slot: Option<u32>,
}

impl<'a> PositionMeta<'a> {
    /// Metadata for `coords`, optionally for one territory `slot`.
    pub fn new(shape: &'a TissueShape, coords: TissueCoordinates, slot: Option<u32>) -> Self {
        Self {
            shape,
            coords,
            kind: shape.kind_at_columnar(coords.c),
            slot,
        }
    }

    /// Coordinates of the position.
    pub fn coords(&self) -> TissueCoordinates {
        self.coords
    }

    /// Kind of the cell at the position.
    pub fn kind(&self) -> KindOfCell {
        self.kind
    }

    /// Territory slot, for synapse passes.
    pub fn slot(&self) -> Option<u32> {
        self.slot
    }

    /// Index of the cell among the cells of its kind in the column.
    pub fn relative_index(&self) -> u32 {
        self.coords.c - self.shape.first_columnar_coord_of_kind(self.kind)
    }

    /// Neighbourhood radius of the kind.
    pub fn radius(&self) -> Radius {
        self.shape.neighbourhood_radius(self.kind)
    }

    /// Territory size of the kind.
    pub fn territory_size(&self) -> u32 {
        self.shape.territory_size(self.kind)
    }

    /// The full shape.
    pub fn shape(&self) -> &'a TissueShape {
        self.shape
    }
}
