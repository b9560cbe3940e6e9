//! Resolution of relative shifts and territory lookups to spans of the
//! read view.

use tissue_arena::TissueState;
use tissue_core::{
    BitsRef, KindOfCell, ShiftInCoordinates, TerritorialState, TissueCoordinates,
};
use tissue_space::SpatialNeighbourhood;

use crate::transition::NeighbourCategory;

/// Neighbourhood of one position, bound to the store view it reads from.
///
/// `get(0, 0, 0)` is the position itself. Shifts outside the clipped box
/// resolve to `None`.
///
/// Besides spatial lookups it exposes the territory of the cell at the
/// centre: its synapses, their territorial states and the list
/// delimiters. In synapse passes it is bound to one slot and also
/// resolves the cell that slot's synapse sources from. Every lookup reads
/// the same view, so a frozen pass sees pre-pass values throughout.
#[derive(Clone, Copy)]
pub struct Neighbourhood<'a> {
    view: &'a TissueState,
    spatial: SpatialNeighbourhood,
    category: NeighbourCategory,
    slot: Option<u32>,
}

impl<'a> Neighbourhood<'a> {
    /// Bind `spatial` to `view`, resolving to `category` spans.
    pub fn new(
        view: &'a TissueState,
        spatial: SpatialNeighbourhood,
        category: NeighbourCategory,
    ) -> Self {
        Self {
            view,
            spatial,
            category,
            slot: None,
        }
    }

    /// The same neighbourhood bound to territory `slot` of the centre cell.
    pub fn for_slot(self, slot: u32) -> Self {
        Self {
            slot: Some(slot),
            ..self
        }
    }

    /// Territory slot this neighbourhood is bound to, in synapse passes.
    pub fn slot(&self) -> Option<u32> {
        self.slot
    }

    /// Read-only span of the neighbour at `(dx, dy, dc)`.
    pub fn get(&self, dx: i32, dy: i32, dc: i32) -> Option<BitsRef<'a>> {
        self.get_shift(ShiftInCoordinates::new(dx, dy, dc))
    }

    /// Read-only span of the neighbour at `shift`.
    pub fn get_shift(&self, shift: ShiftInCoordinates) -> Option<BitsRef<'a>> {
        let at = self.spatial.resolve(shift)?;
        let bits = match self.category {
            NeighbourCategory::Cell => self.view.cell(at),
            NeighbourCategory::Signalling => self.view.signalling(at),
        };
        Some(bits.as_ref())
    }

    /// Absolute coordinates of the neighbour at `(dx, dy, dc)`.
    pub fn coords_at(&self, dx: i32, dy: i32, dc: i32) -> Option<TissueCoordinates> {
        self.spatial.resolve(ShiftInCoordinates::new(dx, dy, dc))
    }

    /// Kind of the neighbour at `(dx, dy, dc)`.
    pub fn kind_at(&self, dx: i32, dy: i32, dc: i32) -> Option<KindOfCell> {
        self.coords_at(dx, dy, dc)
            .map(|at| self.view.shape().kind_at_columnar(at.c))
    }

    /// Lowest admissible shift.
    pub fn low(&self) -> ShiftInCoordinates {
        self.spatial.low()
    }

    /// Highest admissible shift.
    pub fn high(&self) -> ShiftInCoordinates {
        self.spatial.high()
    }

    /// Every admissible shift, `dx` fastest.
    pub fn shifts(&self) -> impl Iterator<Item = ShiftInCoordinates> + '_ {
        self.spatial.shifts()
    }

    /// The underlying clipped box.
    pub fn spatial(&self) -> &SpatialNeighbourhood {
        &self.spatial
    }

    /// What lookups resolve to.
    pub fn category(&self) -> NeighbourCategory {
        self.category
    }

    /// State of the cell owning the territory, i.e. the centre cell.
    pub fn territory_cell(&self) -> BitsRef<'a> {
        self.view.cell(self.spatial.center()).as_ref()
    }

    /// State of the cell the bound slot's synapse sources from.
    ///
    /// Columnar coordinates past the tissue address sensory cells, whose
    /// `x` and `y` are ignored. `None` when unbound, or when the stored
    /// coordinates address nothing.
    pub fn source_cell(&self) -> Option<BitsRef<'a>> {
        self.resolve_source().map(|(_, bits)| bits)
    }

    /// Kind of the cell the bound slot's synapse sources from.
    pub fn source_kind(&self) -> Option<KindOfCell> {
        self.resolve_source().map(|(kind, _)| kind)
    }

    /// State of synapse `slot` in the centre cell's territory.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below the territory size of the centre kind.
    pub fn territory_synapse(&self, slot: u32) -> BitsRef<'a> {
        self.view.synapse(self.spatial.center(), slot).as_ref()
    }

    /// Territorial state of synapse `slot` in the centre cell's territory,
    /// `None` for an unused code.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below the territory size of the centre kind.
    pub fn territorial_state(&self, slot: u32) -> Option<TerritorialState> {
        let bits = self.view.territorial_state(self.spatial.center(), slot);
        TerritorialState::from_bits(bits.value())
    }

    /// Delimiter `index` between the territorial lists of the centre cell.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`tissue_core::NUM_DELIMITERS`].
    pub fn delimiter(&self, index: u32) -> BitsRef<'a> {
        self.view.delimiter(self.spatial.center(), index).as_ref()
    }

    /// Number of synapse slots in the centre cell's territory.
    pub fn territory_size(&self) -> u32 {
        let shape = self.view.shape();
        shape.territory_size(shape.kind_at_columnar(self.spatial.center().c))
    }

    fn resolve_source(&self) -> Option<(KindOfCell, BitsRef<'a>)> {
        let slot = self.slot?;
        let shape = self.view.shape();
        let source = self.view.source_of_synapse(self.spatial.center(), slot);
        let kind = shape.try_kind_at_columnar(source.c)?;
        if shape.is_tissue_kind(kind) {
            if source.x >= shape.x_extent() || source.y >= shape.y_extent() {
                return None;
            }
            Some((kind, self.view.cell(source).as_ref()))
        } else {
            let index = source.c - shape.columnar_extent();
            Some((kind, self.view.sensory_cell(index).as_ref()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tissue_core::write_tissue_coordinates_to_bits;
    use tissue_test_utils::two_kind_shape;

    fn around(store: &TissueState, centre: TissueCoordinates) -> Neighbourhood<'_> {
        let shape = store.shape();
        let spatial = SpatialNeighbourhood::around(
            centre,
            shape.neighbourhood_radius(shape.kind_at_columnar(centre.c)),
            shape.extents(),
            shape.torus_axes(),
        );
        Neighbourhood::new(store, spatial, NeighbourCategory::Cell)
    }

    #[test]
    fn lookups_resolve_through_the_torus() {
        let shape = Arc::new(two_kind_shape());
        let store = TissueState::new(Arc::clone(&shape)).unwrap();
        let centre = TissueCoordinates::new(0, 0, 0);
        store.cell(TissueCoordinates::new(3, 0, 0)).set_value(17);
        store.signalling(centre).set_value(5);

        let spatial = SpatialNeighbourhood::around(
            centre,
            shape.neighbourhood_radius(KindOfCell(0)),
            shape.extents(),
            shape.torus_axes(),
        );
        let cells = Neighbourhood::new(&store, spatial, NeighbourCategory::Cell);
        assert_eq!(cells.get(-1, 0, 0).map(|b| b.value()), Some(17));
        assert_eq!(cells.coords_at(-1, -1, 0), Some(TissueCoordinates::new(3, 2, 0)));
        assert!(cells.get(0, 0, -1).is_none());
        assert_eq!(cells.kind_at(0, 0, 1), Some(KindOfCell(0)));

        let signals = Neighbourhood::new(&store, spatial, NeighbourCategory::Signalling);
        assert_eq!(signals.get(0, 0, 0).map(|b| b.value()), Some(5));
        assert_eq!(signals.shifts().count(), 3 * 3 * 2);
    }

    #[test]
    fn synapse_slots_resolve_their_source_cells() {
        let shape = Arc::new(two_kind_shape());
        let store = TissueState::new(Arc::clone(&shape)).unwrap();
        let centre = TissueCoordinates::new(2, 1, 3);
        let tissue_source = TissueCoordinates::new(0, 2, 1);
        store.cell(centre).set_value(41);
        store.cell(tissue_source).set_value(200);
        store.sensory_cell(3).set_value(9);
        write_tissue_coordinates_to_bits(tissue_source, &store.source_coordinates(centre, 0));
        write_tissue_coordinates_to_bits(
            TissueCoordinates::new(0, 0, shape.columnar_coord_of_sensory_cell(3)),
            &store.source_coordinates(centre, 1),
        );

        let n = around(&store, centre);
        assert_eq!(n.slot(), None);
        assert!(n.source_cell().is_none());
        assert_eq!(n.territory_cell().value(), 41);

        let first = n.for_slot(0);
        assert_eq!(first.source_cell().map(|b| b.value()), Some(200));
        assert_eq!(first.source_kind(), Some(KindOfCell(0)));
        assert_eq!(first.territory_cell().value(), 41);

        let second = n.for_slot(1);
        assert_eq!(second.source_cell().map(|b| b.value()), Some(9));
        assert_eq!(second.source_kind(), Some(KindOfCell(3)));
    }

    #[test]
    fn sources_addressing_nothing_resolve_to_none() {
        let shape = Arc::new(two_kind_shape());
        let store = TissueState::new(Arc::clone(&shape)).unwrap();
        let centre = TissueCoordinates::new(0, 0, 0);
        let past_sensory = shape.columnar_extent() + shape.num_sensory_cells();
        write_tissue_coordinates_to_bits(
            TissueCoordinates::new(0, 0, past_sensory),
            &store.source_coordinates(centre, 0),
        );
        write_tissue_coordinates_to_bits(
            TissueCoordinates::new(shape.x_extent(), 0, 1),
            &store.source_coordinates(centre, 1),
        );
        let n = around(&store, centre);
        assert!(n.for_slot(0).source_cell().is_none());
        assert!(n.for_slot(1).source_cell().is_none());
        assert!(n.for_slot(2).source_cell().is_some());
    }

    #[test]
    fn territory_lookups_read_the_centre_cell() {
        let shape = Arc::new(two_kind_shape());
        let store = TissueState::new(Arc::clone(&shape)).unwrap();
        let centre = TissueCoordinates::new(3, 2, 1);
        for slot in 0..3 {
            store.synapse(centre, slot).set_value(slot as u64 + 10);
        }
        store
            .territorial_state(centre, 1)
            .set_value(TerritorialState::MigrationAlongNegativeYAxis.to_bits());
        store.territorial_state(centre, 2).set_value(7);
        store.delimiter(centre, 4).set_value(2);

        let n = around(&store, centre);
        assert_eq!(n.territory_size(), 3);
        let synapses: Vec<u64> = (0..3).map(|s| n.territory_synapse(s).value()).collect();
        assert_eq!(synapses, vec![10, 11, 12]);
        assert_eq!(
            n.territorial_state(0),
            Some(TerritorialState::SignalDeliveryToCellOfTerritory)
        );
        assert_eq!(
            n.territorial_state(1),
            Some(TerritorialState::MigrationAlongNegativeYAxis)
        );
        assert_eq!(n.territorial_state(2), None);
        assert_eq!(n.delimiter(4).value(), 2);
        assert_eq!(n.delimiter(0).value(), 0);
    }
}
