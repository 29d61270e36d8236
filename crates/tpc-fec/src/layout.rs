/// A lane through a flat row-major block: `len` positions starting at `offset`,
/// `stride` apart. Rows have stride 1, columns have stride `n_cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedView {
    pub offset: usize,
    pub len: usize,
    pub stride: usize,
}

impl StridedView {
    #[must_use]
    pub fn row(index: usize, n_cols: usize) -> Self {
        Self {
            offset: index * n_cols,
            len: n_cols,
            stride: 1,
        }
    }

    #[must_use]
    pub fn column(index: usize, n_rows: usize, n_cols: usize) -> Self {
        Self {
            offset: index,
            len: n_rows,
            stride: n_cols,
        }
    }

    /// Flat index of the `i`-th position of the lane.
    #[inline]
    #[must_use]
    pub fn index(&self, i: usize) -> usize {
        debug_assert!(i < self.len);
        self.offset + i * self.stride
    }

    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1 || self.len <= 1
    }

    /// Borrows a contiguous lane out of `block`.
    #[must_use]
    pub fn slice<'a, T>(&self, block: &'a [T]) -> &'a [T] {
        debug_assert!(self.is_contiguous());
        &block[self.offset..self.offset + self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| self.index(i))
    }

    pub fn gather<T: Copy>(&self, src: &[T], dst: &mut [T]) {
        for (d, i) in dst.iter_mut().zip(self.iter()) {
            *d = src[i];
        }
    }

    pub fn scatter<T: Copy>(&self, src: &[T], dst: &mut [T]) {
        for (&s, i) in src.iter().zip(self.iter()) {
            dst[i] = s;
        }
    }
}
