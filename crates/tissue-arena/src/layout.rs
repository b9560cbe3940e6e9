//! Layout plan: where every data category of every kind lives.
//!
//! The plan is computed once from a [`TissueShape`]. Each `(category, kind)`
//! pair gets a [`Placement`]: a contiguous run of elements inside the
//! homogenous slice for its element width. Categories of equal width share a
//! slice, so the number of slices equals the number of distinct widths.

use indexmap::IndexMap;
use tissue_core::{KindOfCell, TerritorialState, TissueShape, NUM_DELIMITERS};

use crate::error::ArenaError;

/// Kinds of data kept in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataCategory {
    /// Cell state, one per tissue cell.
    Cell,
    /// Synapse state, one per territory slot.
    Synapse,
    /// Territorial state, one per territory slot.
    TerritorialState,
    /// Source-cell coordinate triple, one per territory slot.
    SourceCoordinates,
    /// Signalling state, one per tissue cell.
    Signalling,
    /// Delimiters between territorial lists, [`NUM_DELIMITERS`] per cell.
    Delimiter,
    /// Sensory cell state (flat array).
    SensoryCell,
    /// Synapse to a muscle (flat array).
    MuscleSynapse,
    /// Source-cell coordinates of a synapse to a muscle (flat array).
    MuscleSourceCoordinates,
}

impl DataCategory {
    /// Categories stored per tissue cell, for every tissue kind.
    pub const PER_KIND: [Self; 6] = [
        Self::Cell,
        Self::Synapse,
        Self::TerritorialState,
        Self::SourceCoordinates,
        Self::Signalling,
        Self::Delimiter,
    ];

    /// Categories stored as flat arrays.
    pub const FLAT: [Self; 3] = [
        Self::SensoryCell,
        Self::MuscleSynapse,
        Self::MuscleSourceCoordinates,
    ];

    /// Whether the category is a flat array rather than per tissue cell.
    pub fn is_flat(self) -> bool {
        Self::FLAT.contains(&self)
    }

    fn per_kind_index(self) -> usize {
        Self::PER_KIND
            .iter()
            .position(|c| *c == self)
            .unwrap_or_else(|| panic!("{self:?} is not a per-kind category"))
    }

    fn flat_index(self) -> usize {
        Self::FLAT
            .iter()
            .position(|c| *c == self)
            .unwrap_or_else(|| panic!("{self:?} is not a flat category"))
    }
}

/// Location of one `(category, kind)` run inside a homogenous slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Index of the slice (in [`LayoutPlan::slice_widths`] order).
    pub slice: usize,
    /// Index of the first element of the run.
    pub base: u64,
    /// Elements per tissue cell (1 for flat arrays).
    pub elements_per_cell: u32,
    /// Width of every element.
    pub element_bits: u32,
    /// Number of elements in the run.
    pub num_elements: u64,
}

/// Complete mapping from data categories to slice positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    per_kind: Vec<[Placement; 6]>,
    flat: [Placement; 3],
    slices: IndexMap<u32, u64>,
    total_bits: u64,
}

impl LayoutPlan {
    /// Compute the plan for `shape`.
    pub fn new(shape: &TissueShape) -> Result<Self, ArenaError> {
        let mut slices: IndexMap<u32, u64> = IndexMap::new();
        let columns = (shape.x_extent() as u64)
            .checked_mul(shape.y_extent() as u64)
            .ok_or(ArenaError::BitCountOverflow { what: "columns" })?;
        let coords_bits = 3 * shape.source_coordinate_bits();

        let mut per_kind = Vec::with_capacity(shape.num_tissue_kinds() as usize);
        for kind in shape.tissue_kinds() {
            let cells = columns
                .checked_mul(shape.cells_per_column(kind) as u64)
                .ok_or(ArenaError::BitCountOverflow { what: "tissue cells" })?;
            let territory = shape.territory_size(kind);
            let mut row = [Placement {
                slice: 0,
                base: 0,
                elements_per_cell: 0,
                element_bits: 0,
                num_elements: 0,
            }; 6];
            for (i, category) in DataCategory::PER_KIND.into_iter().enumerate() {
                let (width, per_cell) = match category {
                    DataCategory::Cell => (shape.cell_bits(kind), 1),
                    DataCategory::Synapse => (shape.synapse_bits(kind), territory),
                    DataCategory::TerritorialState => (TerritorialState::NUM_BITS, territory),
                    DataCategory::SourceCoordinates => (coords_bits, territory),
                    DataCategory::Signalling => (shape.signalling_bits(kind), 1),
                    DataCategory::Delimiter => (shape.delimiter_bits(kind), NUM_DELIMITERS),
                    _ => unreachable!("flat category in per-kind list"),
                };
                let count = cells
                    .checked_mul(per_cell as u64)
                    .ok_or(ArenaError::BitCountOverflow { what: "territories" })?;
                row[i] = reserve(&mut slices, width, per_cell, count)?;
            }
            per_kind.push(row);
        }

        let flat = [
            reserve(
                &mut slices,
                shape.sensory_cell_bits(),
                1,
                shape.num_sensory_cells() as u64,
            )?,
            reserve(
                &mut slices,
                shape.muscle_synapse_bits(),
                1,
                shape.num_muscle_synapses() as u64,
            )?,
            reserve(
                &mut slices,
                coords_bits,
                1,
                shape.num_muscle_synapses() as u64,
            )?,
        ];

        let mut total_bits: u64 = 0;
        for (&width, &elements) in &slices {
            total_bits = elements
                .checked_mul(width as u64)
                .and_then(|bits| total_bits.checked_add(bits))
                .ok_or(ArenaError::BitCountOverflow { what: "tissue state" })?;
        }

        Ok(Self {
            per_kind,
            flat,
            slices,
            total_bits,
        })
    }

    /// Placement of a per-kind category of tissue kind `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `category` is flat or `kind` is not a tissue kind.
    pub fn placement(&self, category: DataCategory, kind: KindOfCell) -> Placement {
        self.per_kind[kind.index()][category.per_kind_index()]
    }

    /// Placement of a flat category.
    ///
    /// # Panics
    ///
    /// Panics if `category` is not flat.
    pub fn flat_placement(&self, category: DataCategory) -> Placement {
        self.flat[category.flat_index()]
    }

    /// Distinct element widths in slice order.
    pub fn slice_widths(&self) -> impl Iterator<Item = u32> + '_ {
        self.slices.keys().copied()
    }

    /// `(element_bits, num_elements)` for every slice, in slice order.
    pub fn slice_sizes(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.slices.iter().map(|(&w, &n)| (w, n))
    }

    /// Number of homogenous slices.
    pub fn num_slices(&self) -> usize {
        self.slices.len()
    }

    /// Total packed bits over all slices.
    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }
}

/// Append a run of `count` elements of `width` bits to the slice for that
/// width, creating the slice on first use.
fn reserve(
    slices: &mut IndexMap<u32, u64>,
    width: u32,
    elements_per_cell: u32,
    count: u64,
) -> Result<Placement, ArenaError> {
    let entry = slices.entry(width);
    let slice = entry.index();
    let size = entry.or_insert(0);
    let base = *size;
    *size = base
        .checked_add(count)
        .ok_or(ArenaError::BitCountOverflow { what: "homogenous slice" })?;
    Ok(Placement {
        slice,
        base,
        elements_per_cell,
        element_bits: width,
        num_elements: count,
    })
}
