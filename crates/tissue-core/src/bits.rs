//! Packed bit storage and non-owning bit-span accessors.
//!
//! A [`BitBuffer`] owns a zero-initialised run of bits held in `AtomicU64`
//! words. [`Bits`] and [`BitsRef`] are lightweight `(buffer, first bit,
//! length)` views into it; they never expose raw addresses.
//!
//! # Bit order
//!
//! Bit `i` of a buffer is bit `i % 64` of word `i / 64` (LSB-first). A value
//! written at span offset `o` with width `w` stores its bit `k` at span bit
//! `o + k`. Reads reverse this exactly, so every `write`/`read` pair with the
//! same offset and width round-trips.
//!
//! # Concurrency
//!
//! Elements of different widths share words, so two workers updating
//! disjoint bit ranges may touch the same word. Every word update is a
//! single relaxed compare-and-swap over the masked bits, which keeps such
//! writes race-free without locks. Ordering between workers is only
//! established by thread join. A value spanning two words may be observed
//! half-written by a concurrent reader.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::TissueCoordinates;

const WORD_BITS: u64 = u64::BITS as u64;

/// Mask of the `width` low bits (`1 <= width <= 64`).
#[inline]
fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Owned, zero-initialised storage of a fixed number of bits.
pub struct BitBuffer {
    words: Box<[AtomicU64]>,
    num_bits: u64,
}

impl BitBuffer {
    /// Allocate a zeroed buffer of `num_bits` bits.
    ///
    /// Returns `None` when the word count does not fit the host `usize`.
    pub fn zeroed(num_bits: u64) -> Option<Self> {
        let num_words = usize::try_from(num_bits.div_ceil(WORD_BITS)).ok()?;
        let words: Box<[AtomicU64]> = (0..num_words).map(|_| AtomicU64::new(0)).collect();
        Some(Self { words, num_bits })
    }

    /// Number of addressable bits.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Memory used by the backing words, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }

    /// A writable view of `num_bits` bits starting at `first_bit`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the buffer.
    pub fn span(&self, first_bit: u64, num_bits: u32) -> Bits<'_> {
        assert!(
            first_bit
                .checked_add(num_bits as u64)
                .is_some_and(|end| end <= self.num_bits),
            "bit span [{first_bit}, +{num_bits}) exceeds buffer of {} bits",
            self.num_bits
        );
        Bits {
            buffer: self,
            first_bit,
            num_bits,
        }
    }

    /// Zero every bit.
    pub fn clear(&self) {
        for word in self.words.iter() {
            word.store(0, Ordering::Relaxed);
        }
    }

    fn read_raw(&self, first_bit: u64, width: u32) -> u64 {
        let word = (first_bit / WORD_BITS) as usize;
        let shift = (first_bit % WORD_BITS) as u32;
        let taken = u64::BITS - shift;
        let mut value = self.words[word].load(Ordering::Relaxed) >> shift;
        if width > taken {
            value |= self.words[word + 1].load(Ordering::Relaxed) << taken;
        }
        value & low_mask(width)
    }

    fn write_raw(&self, first_bit: u64, width: u32, value: u64) {
        let word = (first_bit / WORD_BITS) as usize;
        let shift = (first_bit % WORD_BITS) as u32;
        let taken = u64::BITS - shift;
        let lo_mask = low_mask(width.min(taken)) << shift;
        Self::update_word(&self.words[word], lo_mask, value << shift);
        if width > taken {
            let hi_mask = low_mask(width - taken);
            Self::update_word(&self.words[word + 1], hi_mask, value >> taken);
        }
    }

    #[inline]
    fn update_word(word: &AtomicU64, mask: u64, bits: u64) {
        // The closure never returns None, so the update cannot fail.
        let _ = word.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |old| {
            Some((old & !mask) | (bits & mask))
        });
    }
}

impl Clone for BitBuffer {
    fn clone(&self) -> Self {
        let words: Box<[AtomicU64]> = self
            .words
            .iter()
            .map(|w| AtomicU64::new(w.load(Ordering::Relaxed)))
            .collect();
        Self {
            words,
            num_bits: self.num_bits,
        }
    }
}

impl PartialEq for BitBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.num_bits == other.num_bits
            && self
                .words
                .iter()
                .zip(other.words.iter())
                .all(|(a, b)| a.load(Ordering::Relaxed) == b.load(Ordering::Relaxed))
    }
}

impl Eq for BitBuffer {}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitBuffer")
            .field("num_bits", &self.num_bits)
            .field("words", &self.words.len())
            .finish()
    }
}

fn check_access(span_bits: u32, offset: u32, width: u32) {
    assert!(
        (1..=64).contains(&width),
        "bit width {width} outside [1, 64]"
    );
    assert!(
        offset as u64 + width as u64 <= span_bits as u64,
        "access [{offset}, +{width}) exceeds span of {span_bits} bits"
    );
}

/// Writable view of consecutive bits inside a [`BitBuffer`].
///
/// Writing goes through `&self`; see the module docs for the concurrency
/// contract.
pub struct Bits<'a> {
    buffer: &'a BitBuffer,
    first_bit: u64,
    num_bits: u32,
}

impl<'a> Bits<'a> {
    /// Length of the span in bits.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Read `width` bits at `offset` as an unsigned integer.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= width <= 64` and `offset + width <= num_bits()`.
    pub fn read(&self, offset: u32, width: u32) -> u64 {
        self.as_ref().read(offset, width)
    }

    /// Write the `width`-bit unsigned `value` at `offset`.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= width <= 64`, `offset + width <= num_bits()` and
    /// `value < 2^width`.
    pub fn write(&self, offset: u32, width: u32, value: u64) {
        check_access(self.num_bits, offset, width);
        assert!(
            value & !low_mask(width) == 0,
            "value {value} does not fit in {width} bits"
        );
        self.buffer
            .write_raw(self.first_bit + offset as u64, width, value);
    }

    /// Read the whole span (at most 64 bits) as one value.
    pub fn value(&self) -> u64 {
        self.read(0, self.num_bits)
    }

    /// Overwrite the whole span (at most 64 bits) with `value`.
    pub fn set_value(&self, value: u64) {
        self.write(0, self.num_bits, value);
    }

    /// Zero every bit of the span.
    pub fn clear(&self) {
        let mut offset = 0;
        while offset < self.num_bits {
            let width = (self.num_bits - offset).min(64);
            self.write(offset, width, 0);
            offset += width;
        }
    }

    /// Copy the contents of `source`, which must have the same length.
    pub fn copy_from(&self, source: BitsRef<'_>) {
        assert_eq!(
            self.num_bits, source.num_bits,
            "copy between spans of different lengths"
        );
        let mut offset = 0;
        while offset < self.num_bits {
            let width = (self.num_bits - offset).min(64);
            self.write(offset, width, source.read(offset, width));
            offset += width;
        }
    }

    /// Read-only view of the same bits.
    pub fn as_ref(&self) -> BitsRef<'a> {
        BitsRef {
            buffer: self.buffer,
            first_bit: self.first_bit,
            num_bits: self.num_bits,
        }
    }
}

impl fmt::Debug for Bits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

/// Read-only view of consecutive bits inside a [`BitBuffer`].
#[derive(Clone, Copy)]
pub struct BitsRef<'a> {
    buffer: &'a BitBuffer,
    first_bit: u64,
    num_bits: u32,
}

impl<'a> BitsRef<'a> {
    /// Length of the span in bits.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Read `width` bits at `offset` as an unsigned integer.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= width <= 64` and `offset + width <= num_bits()`.
    pub fn read(&self, offset: u32, width: u32) -> u64 {
        check_access(self.num_bits, offset, width);
        self.buffer.read_raw(self.first_bit + offset as u64, width)
    }

    /// Read the whole span (at most 64 bits) as one value.
    pub fn value(&self) -> u64 {
        self.read(0, self.num_bits)
    }

    /// Position of the span's first bit inside its buffer.
    pub fn first_bit(&self) -> u64 {
        self.first_bit
    }
}

impl<'a> From<&Bits<'a>> for BitsRef<'a> {
    fn from(bits: &Bits<'a>) -> Self {
        bits.as_ref()
    }
}

impl fmt::Debug for BitsRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bits")
            .field("first_bit", &self.first_bit)
            .field("num_bits", &self.num_bits)
            .finish()
    }
}

/// Store `value` in `width` bits of `bits` starting at `offset`.
pub fn value_to_bits(value: u64, bits: &Bits<'_>, offset: u32, width: u32) {
    bits.write(offset, width, value);
}

/// Load the `width`-bit value stored in `bits` at `offset`.
pub fn bits_to_value(bits: BitsRef<'_>, offset: u32, width: u32) -> u64 {
    bits.read(offset, width)
}

/// Width of one field of a packed coordinate triple.
fn coordinate_field_bits(span_bits: u32) -> u32 {
    let field = span_bits / 3;
    assert!(
        field > 0 && field * 3 == span_bits,
        "coordinate span of {span_bits} bits is not three equal fields"
    );
    field
}

/// Pack `coords` as `x | y | c` into a `3 × w` bit span.
pub fn write_tissue_coordinates_to_bits(coords: TissueCoordinates, bits: &Bits<'_>) {
    let w = coordinate_field_bits(bits.num_bits());
    bits.write(0, w, coords.x as u64);
    bits.write(w, w, coords.y as u64);
    bits.write(2 * w, w, coords.c as u64);
}

/// Unpack a `3 × w` bit span written by [`write_tissue_coordinates_to_bits`].
pub fn read_tissue_coordinates_from_bits(bits: BitsRef<'_>) -> TissueCoordinates {
    let w = coordinate_field_bits(bits.num_bits());
    TissueCoordinates {
        x: bits.read(0, w) as u32,
        y: bits.read(w, w) as u32,
        c: bits.read(2 * w, w) as u32,
    }
}

/// Read only the x field of a packed coordinate triple.
pub fn read_x_coord_from_bits(bits: BitsRef<'_>) -> u32 {
    let w = coordinate_field_bits(bits.num_bits());
    bits.read(0, w) as u32
}

/// Read only the y field of a packed coordinate triple.
pub fn read_y_coord_from_bits(bits: BitsRef<'_>) -> u32 {
    let w = coordinate_field_bits(bits.num_bits());
    bits.read(w, w) as u32
}

/// Read only the columnar field of a packed coordinate triple.
pub fn read_columnar_coord_from_bits(bits: BitsRef<'_>) -> u32 {
    let w = coordinate_field_bits(bits.num_bits());
    bits.read(2 * w, w) as u32
}

/// Overwrite the x and y fields of a packed triple, keeping the columnar one.
pub fn write_column_to_bits(x: u32, y: u32, bits: &Bits<'_>) {
    let w = coordinate_field_bits(bits.num_bits());
    bits.write(0, w, x as u64);
    bits.write(w, w, y as u64);
}
