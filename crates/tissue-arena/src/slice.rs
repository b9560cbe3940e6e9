//! Homogenous slices: packed arrays of equal-width elements.

use tissue_core::{BitBuffer, Bits};

use crate::error::ArenaError;

/// A packed array of `num_elements` elements, each `element_bits` wide.
///
/// Element `i` occupies bits `[i * element_bits, (i + 1) * element_bits)`
/// of the backing buffer. Elements never overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomogenousSlice {
    element_bits: u32,
    num_elements: u64,
    buffer: BitBuffer,
}

impl HomogenousSlice {
    /// Allocate a zeroed slice.
    pub fn new(element_bits: u32, num_elements: u64) -> Result<Self, ArenaError> {
        let num_bits = num_elements
            .checked_mul(element_bits as u64)
            .ok_or(ArenaError::BitCountOverflow {
                what: "homogenous slice",
            })?;
        let buffer = BitBuffer::zeroed(num_bits).ok_or(ArenaError::AllocationTooLarge {
            element_bits,
            num_bits,
        })?;
        Ok(Self {
            element_bits,
            num_elements,
            buffer,
        })
    }

    /// Width of every element.
    pub fn element_bits(&self) -> u32 {
        self.element_bits
    }

    /// Number of elements.
    pub fn num_elements(&self) -> u64 {
        self.num_elements
    }

    /// Total bits held by the slice.
    pub fn num_bits(&self) -> u64 {
        self.buffer.num_bits()
    }

    /// Bytes of backing memory.
    pub fn memory_bytes(&self) -> usize {
        self.buffer.memory_bytes()
    }

    /// Span of element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_elements`.
    pub fn element(&self, index: u64) -> Bits<'_> {
        assert!(
            index < self.num_elements,
            "element {index} out of range for slice of {} elements",
            self.num_elements
        );
        self.buffer
            .span(index * self.element_bits as u64, self.element_bits)
    }

    /// Zero every element.
    pub fn clear(&self) {
        self.buffer.clear();
    }
}
