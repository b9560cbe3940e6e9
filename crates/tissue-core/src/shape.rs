//! The immutable shape configuration of a tissue.
//!
//! [`TissueShape`] describes everything that is fixed for the lifetime of a
//! tissue: grid extents, the cell kinds and how they partition the columnar
//! axis, per-kind bit widths, territory sizes and neighbourhood radii, torus
//! flags, and the flat sensory-cell and muscle-synapse arrays. It is built
//! once through [`TissueShapeBuilder`], validated, and then only read.

use smallvec::SmallVec;

use crate::coords::{Radius, TissueExtents, TorusAxes};
use crate::error::ShapeError;
use crate::id::KindOfCell;

/// Declaration of one kind of tissue cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TissueCellKind {
    /// Cells of this kind stacked in every column.
    pub cells_per_column: u32,
    /// Synapse slots in the territory of each cell.
    pub synapses_in_territory: u32,
    /// Width of the packed cell state.
    pub bits_per_cell: u32,
    /// Width of the packed synapse state.
    pub bits_per_synapse: u32,
    /// Width of the packed signalling state.
    pub bits_per_signalling: u32,
    /// Neighbourhood radius used by transition passes.
    pub neighbourhood_radius: Radius,
}

/// Minimum bits needed to represent `max_value` (at least one).
pub fn bits_to_represent(max_value: u64) -> u32 {
    (u64::BITS - max_value.leading_zeros()).max(1)
}

/// Validated, immutable shape of a tissue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TissueShape {
    x_extent: u32,
    y_extent: u32,
    torus: TorusAxes,
    tissue_kinds: SmallVec<[TissueCellKind; 8]>,
    sensory_counts: SmallVec<[u32; 8]>,
    bits_per_sensory_cell: u32,
    num_muscle_synapses: u32,
    bits_per_muscle_synapse: u32,

    columnar_extent: u32,
    first_columnar_coord: SmallVec<[u32; 8]>,
    first_sensory_index: SmallVec<[u32; 8]>,
    num_sensory_cells: u32,
    source_coordinate_bits: u32,
    bits_per_delimiter_number: SmallVec<[u32; 8]>,
}

impl TissueShape {
    /// Start building a shape with `x × y` columns.
    pub fn builder(x_extent: u32, y_extent: u32) -> TissueShapeBuilder {
        TissueShapeBuilder {
            x_extent,
            y_extent,
            torus: TorusAxes::NONE,
            tissue_kinds: SmallVec::new(),
            sensory_counts: SmallVec::new(),
            bits_per_sensory_cell: 1,
            num_muscle_synapses: 0,
            bits_per_muscle_synapse: 1,
        }
    }

    /// Cells along the x axis.
    pub fn x_extent(&self) -> u32 {
        self.x_extent
    }

    /// Cells along the y axis.
    pub fn y_extent(&self) -> u32 {
        self.y_extent
    }

    /// Cells along the columnar axis, summed over tissue kinds.
    pub fn columnar_extent(&self) -> u32 {
        self.columnar_extent
    }

    /// Extents of the tissue proper.
    pub fn extents(&self) -> TissueExtents {
        TissueExtents {
            x: self.x_extent,
            y: self.y_extent,
            columnar: self.columnar_extent,
        }
    }

    /// Torus flags of all three axes.
    pub fn torus_axes(&self) -> TorusAxes {
        self.torus
    }

    /// Number of tissue kinds (`K`).
    pub fn num_tissue_kinds(&self) -> u16 {
        self.tissue_kinds.len() as u16
    }

    /// Number of sensory kinds (`S`).
    pub fn num_sensory_kinds(&self) -> u16 {
        self.sensory_counts.len() as u16
    }

    /// Number of all kinds (`K + S`).
    pub fn num_kinds(&self) -> u16 {
        self.num_tissue_kinds() + self.num_sensory_kinds()
    }

    /// The first sensory kind, equal to `K`.
    pub fn first_sensory_kind(&self) -> KindOfCell {
        KindOfCell(self.num_tissue_kinds())
    }

    /// Whether `kind` is a tissue kind.
    pub fn is_tissue_kind(&self, kind: KindOfCell) -> bool {
        kind.index() < self.tissue_kinds.len()
    }

    /// Whether `kind` is a sensory kind.
    pub fn is_sensory_kind(&self, kind: KindOfCell) -> bool {
        !self.is_tissue_kind(kind) && kind.0 < self.num_kinds()
    }

    /// All tissue kinds in columnar order.
    pub fn tissue_kinds(&self) -> impl Iterator<Item = KindOfCell> {
        (0..self.num_tissue_kinds()).map(KindOfCell)
    }

    /// The declaration of tissue kind `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not a tissue kind.
    pub fn tissue_kind(&self, kind: KindOfCell) -> &TissueCellKind {
        &self.tissue_kinds[kind.index()]
    }

    /// Cells of tissue kind `kind` in every column.
    pub fn cells_per_column(&self, kind: KindOfCell) -> u32 {
        self.tissue_kind(kind).cells_per_column
    }

    /// Cells of sensory kind `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not a sensory kind.
    pub fn sensory_cells_of_kind(&self, kind: KindOfCell) -> u32 {
        assert!(self.is_sensory_kind(kind), "kind {kind} is not a sensory kind");
        self.sensory_counts[kind.index() - self.tissue_kinds.len()]
    }

    /// Cells of any kind: per column for tissue kinds, in total for sensory ones.
    pub fn cells_of_kind(&self, kind: KindOfCell) -> u32 {
        if self.is_tissue_kind(kind) {
            self.cells_per_column(kind)
        } else {
            self.sensory_cells_of_kind(kind)
        }
    }

    /// Synapse slots in the territory of each cell of tissue kind `kind`.
    pub fn territory_size(&self, kind: KindOfCell) -> u32 {
        self.tissue_kind(kind).synapses_in_territory
    }

    /// Width of the packed state of a cell of tissue kind `kind`.
    pub fn cell_bits(&self, kind: KindOfCell) -> u32 {
        self.tissue_kind(kind).bits_per_cell
    }

    /// Width of the packed state of a synapse in a territory of kind `kind`.
    pub fn synapse_bits(&self, kind: KindOfCell) -> u32 {
        self.tissue_kind(kind).bits_per_synapse
    }

    /// Width of the packed signalling state of kind `kind`.
    pub fn signalling_bits(&self, kind: KindOfCell) -> u32 {
        self.tissue_kind(kind).bits_per_signalling
    }

    /// Neighbourhood radius of tissue kind `kind`.
    pub fn neighbourhood_radius(&self, kind: KindOfCell) -> Radius {
        self.tissue_kind(kind).neighbourhood_radius
    }

    /// Total number of sensory cells over all sensory kinds.
    pub fn num_sensory_cells(&self) -> u32 {
        self.num_sensory_cells
    }

    /// Width of the packed state of a sensory cell.
    pub fn sensory_cell_bits(&self) -> u32 {
        self.bits_per_sensory_cell
    }

    /// Number of synapses to muscles.
    pub fn num_muscle_synapses(&self) -> u32 {
        self.num_muscle_synapses
    }

    /// Width of the packed state of a synapse to a muscle.
    pub fn muscle_synapse_bits(&self) -> u32 {
        self.bits_per_muscle_synapse
    }

    /// Width of one field of a packed source-cell coordinate triple.
    pub fn source_coordinate_bits(&self) -> u32 {
        self.source_coordinate_bits
    }

    /// Width of one delimiter number in a territory of kind `kind`.
    pub fn delimiter_bits(&self, kind: KindOfCell) -> u32 {
        self.bits_per_delimiter_number[kind.index()]
    }

    /// Columnar coordinate of the lowest cell of tissue kind `kind`.
    pub fn first_columnar_coord_of_kind(&self, kind: KindOfCell) -> u32 {
        self.first_columnar_coord[kind.index()]
    }

    /// Index into the sensory array of the first cell of sensory kind `kind`.
    pub fn first_sensory_index_of_kind(&self, kind: KindOfCell) -> u32 {
        assert!(self.is_sensory_kind(kind), "kind {kind} is not a sensory kind");
        self.first_sensory_index[kind.index() - self.tissue_kinds.len()]
    }

    /// Columnar coordinate used to reference sensory cell `index` as a source.
    pub fn columnar_coord_of_sensory_cell(&self, index: u32) -> u32 {
        self.columnar_extent + index
    }

    /// Kind of the cell at columnar coordinate `c`.
    ///
    /// Coordinates below the columnar length resolve to tissue kinds;
    /// coordinates in `[C, C + sensory cells)` resolve to sensory kinds.
    ///
    /// # Panics
    ///
    /// Panics if `c` lies beyond the sensory extension.
    pub fn kind_at_columnar(&self, c: u32) -> KindOfCell {
        self.try_kind_at_columnar(c)
            .unwrap_or_else(|| panic!("columnar coordinate {c} beyond tissue and sensory cells"))
    }

    /// Kind of the cell at columnar coordinate `c`, or `None` past the
    /// sensory extension.
    pub fn try_kind_at_columnar(&self, c: u32) -> Option<KindOfCell> {
        if c < self.columnar_extent {
            let k = self.first_columnar_coord.partition_point(|&first| first <= c) - 1;
            return Some(KindOfCell(k as u16));
        }
        let index = c - self.columnar_extent;
        if index >= self.num_sensory_cells {
            return None;
        }
        let j = self.first_sensory_index.partition_point(|&first| first <= index) - 1;
        Some(KindOfCell((self.tissue_kinds.len() + j) as u16))
    }
}

/// Builder for [`TissueShape`].
///
/// Required: at least one tissue kind. Defaults: no torus axes, no sensory
/// cells, no muscle synapses, one bit per sensory cell and muscle synapse.
#[derive(Clone, Debug)]
pub struct TissueShapeBuilder {
    x_extent: u32,
    y_extent: u32,
    torus: TorusAxes,
    tissue_kinds: SmallVec<[TissueCellKind; 8]>,
    sensory_counts: SmallVec<[u32; 8]>,
    bits_per_sensory_cell: u32,
    num_muscle_synapses: u32,
    bits_per_muscle_synapse: u32,
}

impl TissueShapeBuilder {
    /// Set which axes wrap.
    pub fn torus(mut self, torus: TorusAxes) -> Self {
        self.torus = torus;
        self
    }

    /// Append a tissue kind; kinds are stacked along the columnar axis in
    /// declaration order.
    pub fn tissue_kind(mut self, kind: TissueCellKind) -> Self {
        self.tissue_kinds.push(kind);
        self
    }

    /// Append a sensory kind with `num_cells` cells.
    pub fn sensory_kind(mut self, num_cells: u32) -> Self {
        self.sensory_counts.push(num_cells);
        self
    }

    /// Width of the packed state of every sensory cell.
    pub fn bits_per_sensory_cell(mut self, bits: u32) -> Self {
        self.bits_per_sensory_cell = bits;
        self
    }

    /// Number and width of synapses to muscles.
    pub fn synapses_to_muscles(mut self, count: u32, bits_per_synapse: u32) -> Self {
        self.num_muscle_synapses = count;
        self.bits_per_muscle_synapse = bits_per_synapse;
        self
    }

    /// Validate the declaration and derive the per-kind tables.
    pub fn build(self) -> Result<TissueShape, ShapeError> {
        if self.x_extent == 0 {
            return Err(ShapeError::EmptyAxis { axis: "x" });
        }
        if self.y_extent == 0 {
            return Err(ShapeError::EmptyAxis { axis: "y" });
        }
        if self.tissue_kinds.is_empty() {
            return Err(ShapeError::NoTissueKinds);
        }
        let total_kinds = self.tissue_kinds.len() + self.sensory_counts.len();
        if total_kinds > u16::MAX as usize {
            return Err(ShapeError::TooManyKinds { count: total_kinds });
        }

        let mut first_columnar_coord = SmallVec::new();
        let mut bits_per_delimiter_number = SmallVec::new();
        let mut columnar: u32 = 0;
        for (i, decl) in self.tissue_kinds.iter().enumerate() {
            let kind = KindOfCell(i as u16);
            if decl.cells_per_column == 0 {
                return Err(ShapeError::EmptyKind { kind });
            }
            if decl.synapses_in_territory == 0 {
                return Err(ShapeError::ZeroTerritory { kind });
            }
            for (field, bits) in [
                ("cell", decl.bits_per_cell),
                ("synapse", decl.bits_per_synapse),
                ("signalling", decl.bits_per_signalling),
            ] {
                if bits == 0 {
                    return Err(ShapeError::ZeroBitWidth {
                        field,
                        kind: Some(kind),
                    });
                }
            }
            first_columnar_coord.push(columnar);
            bits_per_delimiter_number.push(bits_to_represent(decl.synapses_in_territory as u64));
            columnar = columnar.checked_add(decl.cells_per_column).ok_or_else(|| {
                ShapeError::CoordinateOverflow {
                    reason: "columnar axis length exceeds u32".to_string(),
                }
            })?;
        }

        let mut first_sensory_index = SmallVec::new();
        let mut num_sensory_cells: u32 = 0;
        for &count in &self.sensory_counts {
            first_sensory_index.push(num_sensory_cells);
            num_sensory_cells = num_sensory_cells.checked_add(count).ok_or_else(|| {
                ShapeError::CoordinateOverflow {
                    reason: "sensory cell count exceeds u32".to_string(),
                }
            })?;
        }
        if num_sensory_cells > 0 && self.bits_per_sensory_cell == 0 {
            return Err(ShapeError::ZeroBitWidth {
                field: "sensory cell",
                kind: None,
            });
        }
        if self.num_muscle_synapses > 0 && self.bits_per_muscle_synapse == 0 {
            return Err(ShapeError::ZeroBitWidth {
                field: "muscle synapse",
                kind: None,
            });
        }

        // Sensory sources are addressed past the end of the columnar axis.
        let max_columnar = columnar
            .checked_add(num_sensory_cells)
            .ok_or_else(|| ShapeError::CoordinateOverflow {
                reason: "columnar length plus sensory cells exceeds u32".to_string(),
            })?
            - 1;
        let max_coordinate = (self.x_extent - 1)
            .max(self.y_extent - 1)
            .max(max_columnar);

        Ok(TissueShape {
            x_extent: self.x_extent,
            y_extent: self.y_extent,
            torus: self.torus,
            tissue_kinds: self.tissue_kinds,
            sensory_counts: self.sensory_counts,
            bits_per_sensory_cell: self.bits_per_sensory_cell,
            num_muscle_synapses: self.num_muscle_synapses,
            bits_per_muscle_synapse: self.bits_per_muscle_synapse,
            columnar_extent: columnar,
            first_columnar_coord,
            first_sensory_index,
            num_sensory_cells,
            source_coordinate_bits: bits_to_represent(max_coordinate as u64),
            bits_per_delimiter_number,
        })
    }
}
