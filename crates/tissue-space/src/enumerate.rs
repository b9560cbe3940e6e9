//! Position enumeration and the interleaved worker partition.
//!
//! Positions are numbered `x + X * (y + Y * c)`. Worker `i` of `N` visits
//! linear indices `i, i + N, i + 2N, …`, so any worker count yields a
//! disjoint cover in which no two workers differ by more than one item.

use std::iter::FusedIterator;

use tissue_core::{TissueCoordinates, TissueExtents};

/// Linear index of `coords`.
pub fn linear_index(coords: TissueCoordinates, extents: TissueExtents) -> u64 {
    (coords.c as u64 * extents.y as u64 + coords.y as u64) * extents.x as u64 + coords.x as u64
}

/// Coordinates of linear index `linear`.
///
/// # Panics
///
/// Panics if `linear` is not below `extents.num_positions()`.
pub fn coordinates_of(linear: u64, extents: TissueExtents) -> TissueCoordinates {
    assert!(
        linear < extents.num_positions(),
        "linear index {linear} outside tissue of {} positions",
        extents.num_positions()
    );
    let x_len = extents.x as u64;
    let y_len = extents.y as u64;
    TissueCoordinates {
        x: (linear % x_len) as u32,
        y: ((linear / x_len) % y_len) as u32,
        c: (linear / (x_len * y_len)) as u32,
    }
}

/// Advance `coords` by `stride` positions.
///
/// Returns `false`, leaving `coords` untouched, when the tissue is
/// exhausted.
pub fn go_to_next_coordinates(
    coords: &mut TissueCoordinates,
    stride: u64,
    extents: TissueExtents,
) -> bool {
    let next = linear_index(*coords, extents).saturating_add(stride);
    if next >= extents.num_positions() {
        return false;
    }
    *coords = coordinates_of(next, extents);
    true
}

/// Advance column `(x, y)` by `stride` columns, `x` fastest.
///
/// Returns `false`, leaving the column untouched, when all columns are
/// exhausted.
pub fn go_to_next_column(x: &mut u32, y: &mut u32, stride: u64, x_len: u32, y_len: u32) -> bool {
    let next = (*y as u64 * x_len as u64 + *x as u64).saturating_add(stride);
    if next >= x_len as u64 * y_len as u64 {
        return false;
    }
    *x = (next % x_len as u64) as u32;
    *y = (next / x_len as u64) as u32;
    true
}

/// Indices `start, start + stride, …` below `end`.
#[derive(Clone, Debug)]
pub struct StridedRange {
    next: u64,
    end: u64,
    stride: u64,
}

impl StridedRange {
    /// The share of worker `worker` out of `workers` in `0..end`.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(worker: usize, workers: usize, end: u64) -> Self {
        assert!(workers > 0, "strided range over zero workers");
        Self {
            next: worker as u64,
            end,
            stride: workers as u64,
        }
    }
}

impl Iterator for StridedRange {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next;
        self.next = self.next.saturating_add(self.stride);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.end {
            0
        } else {
            (self.end - self.next).div_ceil(self.stride)
        };
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl FusedIterator for StridedRange {}

/// Items of a strided share of `0..end` starting at `worker`.
fn share_len(worker: usize, workers: usize, end: u64) -> u64 {
    assert!(workers > 0, "strided range over zero workers");
    let first = worker as u64;
    if first >= end {
        0
    } else {
        (end - first).div_ceil(workers as u64)
    }
}

/// The positions of one worker's partition, in increasing linear order.
#[derive(Clone, Debug)]
pub struct StridedPositions {
    next: TissueCoordinates,
    remaining: u64,
    stride: u64,
    extents: TissueExtents,
}

impl StridedPositions {
    /// Positions of worker `worker` out of `workers`.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(worker: usize, workers: usize, extents: TissueExtents) -> Self {
        let remaining = share_len(worker, workers, extents.num_positions());
        let next = if remaining > 0 {
            coordinates_of(worker as u64, extents)
        } else {
            TissueCoordinates::default()
        };
        Self {
            next,
            remaining,
            stride: workers as u64,
            extents,
        }
    }
}

impl Iterator for StridedPositions {
    type Item = TissueCoordinates;

    fn next(&mut self) -> Option<TissueCoordinates> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 && !go_to_next_coordinates(&mut self.next, self.stride, self.extents)
        {
            self.remaining = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl FusedIterator for StridedPositions {}

/// The `(x, y)` columns of one worker's partition.
#[derive(Clone, Debug)]
pub struct StridedColumns {
    x: u32,
    y: u32,
    remaining: u64,
    stride: u64,
    x_len: u32,
    y_len: u32,
}

impl StridedColumns {
    /// Columns of worker `worker` out of `workers`.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(worker: usize, workers: usize, x_len: u32, y_len: u32) -> Self {
        let remaining = share_len(worker, workers, x_len as u64 * y_len as u64);
        let (x, y) = if remaining > 0 {
            let first = worker as u64;
            ((first % x_len as u64) as u32, (first / x_len as u64) as u32)
        } else {
            (0, 0)
        };
        Self {
            x,
            y,
            remaining,
            stride: workers as u64,
            x_len,
            y_len,
        }
    }
}

impl Iterator for StridedColumns {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.remaining == 0 {
            return None;
        }
        let current = (self.x, self.y);
        self.remaining -= 1;
        if self.remaining > 0
            && !go_to_next_column(&mut self.x, &mut self.y, self.stride, self.x_len, self.y_len)
        {
            self.remaining = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl FusedIterator for StridedColumns {}
