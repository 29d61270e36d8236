use crate::layout::StridedView;

/// Bijective reordering of a block. `deinterleave` undoes `interleave` exactly.
pub trait Interleaver {
    fn size(&self) -> usize;

    fn interleave<T: Copy>(&self, natural: &[T], interleaved: &mut [T]);

    fn deinterleave<T: Copy>(&self, interleaved: &[T], natural: &mut [T]);
}

/// Row-major to column-major transposition: column `c` of the natural block becomes
/// the contiguous lane `c * n_rows .. (c + 1) * n_rows` of the interleaved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowColumnInterleaver {
    n_rows: usize,
    n_cols: usize,
}

impl RowColumnInterleaver {
    #[must_use]
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self { n_rows, n_cols }
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }
}

impl Interleaver for RowColumnInterleaver {
    fn size(&self) -> usize {
        self.n_rows * self.n_cols
    }

    fn interleave<T: Copy>(&self, natural: &[T], interleaved: &mut [T]) {
        debug_assert_eq!(natural.len(), self.size());
        debug_assert_eq!(interleaved.len(), self.size());
        for (c, lane) in interleaved.chunks_exact_mut(self.n_rows).enumerate() {
            StridedView::column(c, self.n_rows, self.n_cols).gather(natural, lane);
        }
    }

    fn deinterleave<T: Copy>(&self, interleaved: &[T], natural: &mut [T]) {
        debug_assert_eq!(natural.len(), self.size());
        debug_assert_eq!(interleaved.len(), self.size());
        for (c, lane) in interleaved.chunks_exact(self.n_rows).enumerate() {
            StridedView::column(c, self.n_rows, self.n_cols).scatter(lane, natural);
        }
    }
}
