use tpc_core::OutputMode;
use tracing::{debug, trace};

use crate::FecError;
use crate::chase::{ChaseParams, ChaseSearch};
use crate::hiho::ComponentDecoder;
use crate::interleaver::{Interleaver, RowColumnInterleaver};
use crate::layout::StridedView;
use crate::soft::{HardBit, SoftValue};

/// Result of [`ChasePyndiahDecoder::decode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<B, R> {
    Soft(Vec<R>),
    Hard(Vec<B>),
}

/// Iterative soft-input decoder for a product code whose rows are protected by
/// `hiho_r` and columns by `hiho_c`, each optionally extended by a parity bit.
///
/// The block is stored row-major; `pi` transposes it so that columns can be decoded
/// as contiguous lanes. Scratch buffers are sized at construction: one instance
/// decodes one frame at a time, and every frame must have the construction-time
/// block length.
#[derive(Debug)]
pub struct ChasePyndiahDecoder<B, R, Dr, Dc = Dr, I = RowColumnInterleaver> {
    n_ite: usize,
    pi: I,
    hiho_r: Dr,
    hiho_c: Dc,
    parity_extended: bool,
    search: ChaseSearch<B, R>,
    y_n_i: Vec<R>,
    y_n_pi: Vec<R>,
    y_n_cha_i: Vec<R>,
}

impl<B, R, Dr, Dc, I> ChasePyndiahDecoder<B, R, Dr, Dc, I>
where
    B: HardBit,
    R: SoftValue,
    Dr: ComponentDecoder<B>,
    Dc: ComponentDecoder<B>,
    I: Interleaver,
{
    pub fn new(
        n_ite: usize,
        pi: I,
        hiho_r: Dr,
        hiho_c: Dc,
        params: ChaseParams<R>,
    ) -> Result<Self, FecError> {
        if n_ite == 0 {
            return Err(FecError::invalid_argument(
                "n_ite",
                n_ite,
                "has to be at least 1",
            ));
        }

        let (row_n, col_n) = (hiho_r.n(), hiho_c.n());
        let size = pi.size();
        let parity_extended = if size == row_n * col_n {
            false
        } else if size == (row_n + 1) * (col_n + 1) {
            true
        } else {
            return Err(FecError::invalid_argument(
                "interleaver size",
                size,
                format!(
                    "has to be {} or {} for component lengths {row_n} x {col_n}",
                    row_n * col_n,
                    (row_n + 1) * (col_n + 1)
                ),
            ));
        };

        let search = ChaseSearch::new(params, row_n, col_n, parity_extended)?;

        debug!(
            row_n,
            row_k = hiho_r.k(),
            col_n,
            col_k = hiho_c.k(),
            parity_extended,
            n_ite,
            p = params.n_least_reliable_positions,
            n_competitors = params.n_competitors,
            "chase-pyndiah decoder ready"
        );

        Ok(Self {
            n_ite,
            pi,
            hiho_r,
            hiho_c,
            parity_extended,
            search,
            y_n_i: vec![R::zero(); size],
            y_n_pi: vec![R::zero(); size],
            y_n_cha_i: vec![R::zero(); size],
        })
    }

    /// Block length, parity bits included.
    #[must_use]
    pub fn n(&self) -> usize {
        self.pi.size()
    }

    /// Information bits per frame.
    #[must_use]
    pub fn k(&self) -> usize {
        self.hiho_r.k() * self.hiho_c.k()
    }

    /// Positions per row.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.hiho_r.n() + usize::from(self.parity_extended)
    }

    /// Positions per column.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.hiho_c.n() + usize::from(self.parity_extended)
    }

    #[must_use]
    pub fn parity_extended(&self) -> bool {
        self.parity_extended
    }

    #[must_use]
    pub fn n_iterations(&self) -> usize {
        self.n_ite
    }

    /// Scratch of the last lane searched.
    #[must_use]
    pub fn search(&self) -> &ChaseSearch<B, R> {
        &self.search
    }

    /// Refined soft values for the whole block.
    pub fn decode_siso(&mut self, y_n: &[R], y_n_out: &mut [R]) {
        self.run(y_n, OutputMode::Soft, &mut []);
        y_n_out.copy_from_slice(&self.y_n_i);
    }

    /// Hard information bits, `k()` of them, row-major.
    pub fn decode_siho(&mut self, y_n: &[R], v_k: &mut [B]) {
        debug_assert_eq!(v_k.len(), self.k());
        self.run(y_n, OutputMode::HardInfo, v_k);
    }

    /// Hard bits over the whole block.
    pub fn decode_siho_cw(&mut self, y_n: &[R], v_n: &mut [B]) {
        debug_assert_eq!(v_n.len(), self.n());
        self.run(y_n, OutputMode::HardCodeword, v_n);
    }

    pub fn decode(&mut self, y_n: &[R], mode: OutputMode) -> Decoded<B, R> {
        match mode {
            OutputMode::Soft => {
                let mut out = vec![R::zero(); self.n()];
                self.decode_siso(y_n, &mut out);
                Decoded::Soft(out)
            }
            OutputMode::HardInfo => {
                let mut out = vec![B::zero(); self.k()];
                self.decode_siho(y_n, &mut out);
                Decoded::Hard(out)
            }
            OutputMode::HardCodeword => {
                let mut out = vec![B::zero(); self.n()];
                self.decode_siho_cw(y_n, &mut out);
                Decoded::Hard(out)
            }
        }
    }

    fn run(&mut self, y_n: &[R], mode: OutputMode, hard_out: &mut [B]) {
        debug_assert_eq!(y_n.len(), self.n());
        debug_assert_eq!(mode.is_terminal(), !hard_out.is_empty());

        let n_cols = self.n_cols();
        let n_rows = self.n_rows();
        let Self {
            n_ite,
            pi,
            hiho_r,
            hiho_c,
            search,
            y_n_i,
            y_n_pi,
            y_n_cha_i,
            ..
        } = self;
        let n_ite = *n_ite;

        y_n_i.copy_from_slice(y_n);
        pi.interleave(y_n, y_n_cha_i.as_mut_slice()); // channel values, column-major

        for ite in 0..n_ite {
            trace!(ite, ?mode, "product code iteration");

            pi.interleave(y_n_i.as_slice(), y_n_pi.as_mut_slice()); // columns become rows

            for (r_cha, r_soft) in y_n_cha_i
                .chunks_exact(n_rows)
                .zip(y_n_pi.chunks_exact_mut(n_rows))
            {
                search.decode_row_siso(r_cha, r_soft, &*hiho_c);
            }

            pi.deinterleave(y_n_pi.as_slice(), y_n_i.as_mut_slice()); // rows go back as columns

            let last = ite + 1 == n_ite;
            match mode {
                OutputMode::HardInfo if last => {
                    let first_info_row = hiho_c.n() - hiho_c.k();
                    for (j, v_k) in hard_out
                        .chunks_exact_mut(hiho_r.k())
                        .take(hiho_c.k())
                        .enumerate()
                    {
                        let row = StridedView::row(first_info_row + j, n_cols);
                        search.decode_row_siho(row.slice(y_n_i.as_slice()), v_k, &*hiho_r, true);
                    }
                }
                OutputMode::HardCodeword if last => {
                    for (r_prime, v_n) in y_n_i
                        .chunks_exact(n_cols)
                        .zip(hard_out.chunks_exact_mut(n_cols))
                    {
                        search.decode_row_siho(r_prime, v_n, &*hiho_r, false);
                    }
                }
                _ => {
                    for (r_cha, r_soft) in y_n
                        .chunks_exact(n_cols)
                        .zip(y_n_i.chunks_exact_mut(n_cols))
                    {
                        search.decode_row_siso(r_cha, r_soft, &*hiho_r);
                    }
                }
            }
        }
    }
}
