//! The packed tissue state store.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tissue_core::{
    read_tissue_coordinates_from_bits, Bits, KindOfCell, TissueCoordinates, TissueShape,
};

use crate::error::ArenaError;
use crate::layout::{DataCategory, LayoutPlan};
use crate::slice::HomogenousSlice;

/// Position of one element: a slice and an element index inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementLocation {
    /// Index of the homogenous slice.
    pub slice: usize,
    /// Index of the element inside the slice.
    pub element: u64,
}

/// All mutable state of a tissue, bit-packed into homogenous slices.
///
/// Every accessor returns a [`Bits`] span sized to exactly the declared width
/// of the requested element. Spans of distinct elements never overlap, so
/// workers may write disjoint elements concurrently through `&TissueState`.
///
/// Out-of-range coordinates, slots and indices are programming errors and
/// panic.
pub struct TissueState {
    shape: Arc<TissueShape>,
    layout: LayoutPlan,
    slices: Vec<HomogenousSlice>,
    poisoned: AtomicBool,
}

impl TissueState {
    /// Allocate a zeroed store for `shape`.
    pub fn new(shape: Arc<TissueShape>) -> Result<Self, ArenaError> {
        let layout = LayoutPlan::new(&shape)?;
        let slices = layout
            .slice_sizes()
            .map(|(bits, elements)| HomogenousSlice::new(bits, elements))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            total_bits = layout.total_bits(),
            slices = slices.len(),
            columns = shape.extents().num_columns(),
            "tissue state allocated"
        );
        Ok(Self {
            shape,
            layout,
            slices,
            poisoned: AtomicBool::new(false),
        })
    }

    /// The shape the store was laid out for.
    pub fn shape(&self) -> &TissueShape {
        &self.shape
    }

    /// Shared handle to the shape.
    pub fn shape_arc(&self) -> &Arc<TissueShape> {
        &self.shape
    }

    /// The layout plan.
    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    /// The homogenous slices in layout order.
    pub fn slices(&self) -> &[HomogenousSlice] {
        &self.slices
    }

    /// Total packed bits.
    pub fn num_bits(&self) -> u64 {
        self.layout.total_bits()
    }

    /// Bytes of backing memory over all slices.
    pub fn memory_bytes(&self) -> usize {
        self.slices.iter().map(HomogenousSlice::memory_bytes).sum()
    }

    /// Width of one field of a source-cell coordinate triple.
    pub fn source_coordinate_bits(&self) -> u32 {
        self.shape.source_coordinate_bits()
    }

    /// Width of one delimiter number of tissue kind `kind`.
    pub fn delimiter_bits(&self, kind: KindOfCell) -> u32 {
        self.shape.delimiter_bits(kind)
    }

    /// Location of element `sub_index` of the per-cell `category` at `coords`.
    ///
    /// # Panics
    ///
    /// Panics if `coords` lies outside the tissue, `category` is flat, or
    /// `sub_index` exceeds the elements stored per cell.
    pub fn locate(
        &self,
        category: DataCategory,
        coords: TissueCoordinates,
        sub_index: u32,
    ) -> ElementLocation {
        let extents = self.shape.extents();
        assert!(
            extents.contains(coords),
            "coordinates {coords} outside tissue of {}x{}x{}",
            extents.x,
            extents.y,
            extents.columnar
        );
        let kind = self.shape.kind_at_columnar(coords.c);
        let placement = self.layout.placement(category, kind);
        assert!(
            sub_index < placement.elements_per_cell,
            "{category:?} index {sub_index} out of range for kind {kind} ({} per cell)",
            placement.elements_per_cell
        );
        let local_c = (coords.c - self.shape.first_columnar_coord_of_kind(kind)) as u64;
        let cell = (local_c * extents.y as u64 + coords.y as u64) * extents.x as u64
            + coords.x as u64;
        ElementLocation {
            slice: placement.slice,
            element: placement.base
                + cell * placement.elements_per_cell as u64
                + sub_index as u64,
        }
    }

    /// Location of element `index` of the flat `category`.
    ///
    /// # Panics
    ///
    /// Panics if `category` is not flat or `index` is out of range.
    pub fn locate_flat(&self, category: DataCategory, index: u32) -> ElementLocation {
        let placement = self.layout.flat_placement(category);
        assert!(
            (index as u64) < placement.num_elements,
            "{category:?} index {index} out of range ({} elements)",
            placement.num_elements
        );
        ElementLocation {
            slice: placement.slice,
            element: placement.base + index as u64,
        }
    }

    /// Span of the element at `location`.
    pub fn element(&self, location: ElementLocation) -> Bits<'_> {
        self.slices[location.slice].element(location.element)
    }

    /// State of the tissue cell at `coords`.
    pub fn cell(&self, coords: TissueCoordinates) -> Bits<'_> {
        self.element(self.locate(DataCategory::Cell, coords, 0))
    }

    /// State of cell `relative_index` of `kind` in column `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not a tissue kind or `relative_index` is not below
    /// its cells per column.
    pub fn cell_of_kind(&self, x: u32, y: u32, kind: KindOfCell, relative_index: u32) -> Bits<'_> {
        assert!(
            relative_index < self.shape.cells_per_column(kind),
            "cell {relative_index} out of range for kind {kind}"
        );
        let c = self.shape.first_columnar_coord_of_kind(kind) + relative_index;
        self.cell(TissueCoordinates::new(x, y, c))
    }

    /// State of synapse `slot` in the territory of the cell at `coords`.
    pub fn synapse(&self, coords: TissueCoordinates, slot: u32) -> Bits<'_> {
        self.element(self.locate(DataCategory::Synapse, coords, slot))
    }

    /// Territorial state of synapse `slot` in the territory of the cell at `coords`.
    pub fn territorial_state(&self, coords: TissueCoordinates, slot: u32) -> Bits<'_> {
        self.element(self.locate(DataCategory::TerritorialState, coords, slot))
    }

    /// Packed source-cell coordinates of synapse `slot` in the territory of
    /// the cell at `coords`.
    pub fn source_coordinates(&self, coords: TissueCoordinates, slot: u32) -> Bits<'_> {
        self.element(self.locate(DataCategory::SourceCoordinates, coords, slot))
    }

    /// Decoded source-cell coordinates of synapse `slot` at `coords`.
    pub fn source_of_synapse(&self, coords: TissueCoordinates, slot: u32) -> TissueCoordinates {
        read_tissue_coordinates_from_bits(self.source_coordinates(coords, slot).as_ref())
    }

    /// Signalling state of the cell at `coords`.
    pub fn signalling(&self, coords: TissueCoordinates) -> Bits<'_> {
        self.element(self.locate(DataCategory::Signalling, coords, 0))
    }

    /// Delimiter `index` between the territorial lists of the cell at `coords`.
    pub fn delimiter(&self, coords: TissueCoordinates, index: u32) -> Bits<'_> {
        self.element(self.locate(DataCategory::Delimiter, coords, index))
    }

    /// State of sensory cell `index`.
    pub fn sensory_cell(&self, index: u32) -> Bits<'_> {
        self.element(self.locate_flat(DataCategory::SensoryCell, index))
    }

    /// State of synapse to muscle `index`.
    pub fn muscle_synapse(&self, index: u32) -> Bits<'_> {
        self.element(self.locate_flat(DataCategory::MuscleSynapse, index))
    }

    /// Packed source-cell coordinates of synapse to muscle `index`.
    pub fn muscle_source_coordinates(&self, index: u32) -> Bits<'_> {
        self.element(self.locate_flat(DataCategory::MuscleSourceCoordinates, index))
    }

    /// Decoded source-cell coordinates of synapse to muscle `index`.
    pub fn source_of_muscle_synapse(&self, index: u32) -> TissueCoordinates {
        read_tissue_coordinates_from_bits(self.muscle_source_coordinates(index).as_ref())
    }

    /// Zero every bit of the store.
    pub fn clear(&self) {
        for slice in &self.slices {
            slice.clear();
        }
    }

    /// Deep copy of the current contents.
    pub fn snapshot(&self) -> Self {
        Self {
            shape: Arc::clone(&self.shape),
            layout: self.layout.clone(),
            slices: self.slices.clone(),
            poisoned: AtomicBool::new(self.is_poisoned()),
        }
    }

    /// Whether a pass failed part-way and left the store partially updated.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    /// Mark the store as partially updated.
    pub fn mark_poisoned(&self) {
        self.poisoned.store(true, Ordering::Release);
    }
}

impl Clone for TissueState {
    fn clone(&self) -> Self {
        self.snapshot()
    }
}

impl PartialEq for TissueState {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.slices == other.slices
    }
}

impl Eq for TissueState {}

impl fmt::Debug for TissueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TissueState")
            .field("extents", &self.shape.extents())
            .field("slices", &self.slices.len())
            .field("num_bits", &self.num_bits())
            .field("poisoned", &self.is_poisoned())
            .finish()
    }
}
