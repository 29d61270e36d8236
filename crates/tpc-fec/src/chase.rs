//! Chase search over one row or column of the product code, and the Pyndiah
//! reliability estimate built from its ranked candidates.
//!
//! A search runs in four steps on the lane handed to it:
//!
//! 1. hard-decide the soft input,
//! 2. keep the `p` least reliable positions (parity bit excluded),
//! 3. force those positions to every `p`-bit pattern and correct each pattern
//!    through the component decoder, giving `2^p` candidate codewords,
//! 4. rank candidates by the summed magnitude of the positions where they disagree
//!    with the soft input.
//!
//! All buffers are sized once in [`ChaseSearch::new`] and reused by every lane.

use core::cmp::Ordering;
use std::collections::TryReserveError;

use crate::FecError;
use crate::hiho::ComponentDecoder;
use crate::soft::{HardBit, SoftValue, bit, compute_parity, hard_bit, hard_decide};

/// Decoder parameters shared by the row and column searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseParams<R> {
    /// Number of least reliable positions `p`; `2^p` test vectors are built.
    pub n_least_reliable_positions: usize,
    /// Candidates (decided word included) looked at when estimating reliabilities.
    pub n_competitors: usize,
    /// Damping applied to the extrinsic update.
    pub alpha: R,
    /// Skip the search when the hard decision already is a codeword.
    pub syndrome_fast_path: bool,
}

impl<R: SoftValue> ChaseParams<R> {
    /// Checks `p` against the shorter component code and `n_competitors` against `2^p`.
    /// Returns the number of test vectors.
    pub fn validate(&self, row_n: usize, col_n: usize) -> Result<usize, FecError> {
        let p = self.n_least_reliable_positions;
        if p == 0 || p >= row_n || p >= col_n {
            return Err(FecError::invalid_argument(
                "n_least_reliable_positions",
                p,
                format!(
                    "has to be positive and lower than the row and column code lengths \
                     (row N = {row_n}, column N = {col_n})"
                ),
            ));
        }

        let n_test_vectors = u32::try_from(p)
            .ok()
            .and_then(|p| 1usize.checked_shl(p))
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                FecError::invalid_argument(
                    "n_least_reliable_positions",
                    p,
                    format!("2^p test vectors must fit in usize ({} bits)", usize::BITS),
                )
            })?;

        if self.n_competitors == 0 || self.n_competitors > n_test_vectors {
            return Err(FecError::invalid_argument(
                "n_competitors",
                self.n_competitors,
                format!(
                    "has to be positive and lower or equal than the number of test vectors \
                     ({n_test_vectors})"
                ),
            ));
        }

        if !self.alpha.is_finite() || self.alpha < R::zero() {
            return Err(FecError::invalid_argument(
                "alpha",
                format!("{:?}", self.alpha),
                "has to be a finite, non-negative value",
            ));
        }

        Ok(n_test_vectors)
    }
}

/// A retained weak position of the lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastReliablePosition<R> {
    pub magnitude: R,
    pub index: usize,
}

/// A candidate codeword ranked by its distance to the soft input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Competitor<R> {
    pub metric: R,
    pub candidate: usize,
}

/// Scratch state of the Chase search, reused by every row and column.
#[derive(Debug, Clone)]
pub struct ChaseSearch<B, R> {
    params: ChaseParams<R>,
    parity_extended: bool,
    n_test_vectors: usize,
    least_reliable_pos: Vec<LeastReliablePosition<R>>,
    hard_rprime: Vec<B>,
    test_vect: Vec<B>,
    metrics: Vec<R>,
    competitors: Vec<Competitor<R>>,
    lane_len: usize,
}

impl<B: HardBit, R: SoftValue> ChaseSearch<B, R> {
    /// Sizes the scratch for lanes of at most `max(row_n, col_n) + 1` positions.
    pub fn new(
        params: ChaseParams<R>,
        row_n: usize,
        col_n: usize,
        parity_extended: bool,
    ) -> Result<Self, FecError> {
        let n_test_vectors = params.validate(row_n, col_n)?;
        // +1 for the parity bit, if any
        let lane_capacity = row_n.max(col_n) + 1;

        let too_large = || {
            FecError::invalid_argument(
                "n_least_reliable_positions",
                params.n_least_reliable_positions,
                format!(
                    "2^p candidate buffers of {lane_capacity} positions each cannot be allocated"
                ),
            )
        };
        let test_vect_len = n_test_vectors
            .checked_mul(lane_capacity)
            .ok_or_else(too_large)?;
        let test_vect = scratch(B::zero(), test_vect_len).map_err(|_| too_large())?;
        let metrics = scratch(R::zero(), n_test_vectors).map_err(|_| too_large())?;
        let competitors = scratch(
            Competitor {
                metric: R::zero(),
                candidate: 0,
            },
            n_test_vectors,
        )
        .map_err(|_| too_large())?;

        Ok(Self {
            params,
            parity_extended,
            n_test_vectors,
            least_reliable_pos: vec![
                LeastReliablePosition {
                    magnitude: R::infinity(),
                    index: 0,
                };
                params.n_least_reliable_positions
            ],
            hard_rprime: vec![B::zero(); lane_capacity],
            test_vect,
            metrics,
            competitors,
            lane_len: 0,
        })
    }

    #[must_use]
    pub fn params(&self) -> &ChaseParams<R> {
        &self.params
    }

    #[must_use]
    pub fn n_test_vectors(&self) -> usize {
        self.n_test_vectors
    }

    #[must_use]
    pub fn parity_extended(&self) -> bool {
        self.parity_extended
    }

    /// Positions kept by the last search, weakest first.
    #[must_use]
    pub fn least_reliable(&self) -> &[LeastReliablePosition<R>] {
        &self.least_reliable_pos
    }

    /// Candidate codeword `c` of the last search.
    #[must_use]
    pub fn candidate(&self, c: usize) -> &[B] {
        &self.test_vect[c * self.lane_len..(c + 1) * self.lane_len]
    }

    /// Metric of candidate `c`, in candidate order.
    #[must_use]
    pub fn metric(&self, c: usize) -> R {
        self.metrics[c]
    }

    /// All candidates ranked by ascending metric.
    #[must_use]
    pub fn competitors(&self) -> &[Competitor<R>] {
        &self.competitors
    }

    /// The lowest-metric candidate.
    #[must_use]
    pub fn decided_word(&self) -> &[B] {
        self.candidate(self.competitors[0].candidate)
    }

    /// Hard decision of the last lane, as left by the search.
    #[must_use]
    pub fn hard_decision(&self) -> &[B] {
        &self.hard_rprime[..self.lane_len]
    }

    /// Runs the search over `r_prime`. Returns `true` only when the fast path is
    /// enabled and the hard decision already is a codeword, in which case no
    /// candidates are built.
    pub fn decode_chase<D: ComponentDecoder<B> + ?Sized>(
        &mut self,
        r_prime: &[R],
        hiho: &D,
    ) -> bool {
        let size = r_prime.len();
        debug_assert!(size <= self.hard_rprime.len());
        self.lane_len = size;

        hard_decide(r_prime, &mut self.hard_rprime[..size]);

        // candidate 0 doubles as scratch; it is rebuilt whenever the search runs
        if self.params.syndrome_fast_path
            && hiho.is_codeword(
                &self.hard_rprime[..size],
                self.parity_extended,
                &mut self.test_vect[..size],
            )
        {
            return true;
        }

        self.find_least_reliable_pos(&r_prime[..hiho.n()]); // without parity bit if any
        self.compute_test_vectors(hiho, size);
        self.compute_metrics(r_prime);

        false
    }

    /// Soft-output lane decode: `r_soft` holds the previous soft values on entry and
    /// the updated ones on return.
    pub fn decode_row_siso<D: ComponentDecoder<B> + ?Sized>(
        &mut self,
        r_cha: &[R],
        r_soft: &mut [R],
        hiho: &D,
    ) {
        if self.decode_chase(r_soft, hiho) {
            // already a codeword: soft values go through unchanged
            return;
        }

        self.compute_reliability(r_cha, r_soft);
    }

    /// Hard-output lane decode. Writes the information bits (`return_k`) or the
    /// whole lane into `out`.
    pub fn decode_row_siho<D: ComponentDecoder<B> + ?Sized>(
        &mut self,
        r_prime: &[R],
        out: &mut [B],
        hiho: &D,
        return_k: bool,
    ) {
        let range = if return_k {
            hiho.n() - hiho.k()..hiho.n()
        } else {
            0..r_prime.len()
        };
        let len = range.len();

        if self.decode_chase(r_prime, hiho) {
            out[..len].copy_from_slice(&self.hard_rprime[range]);
            return;
        }

        out[..len].copy_from_slice(&self.decided_word()[range]);
    }

    /// Keeps the `p` smallest magnitudes of `r_prime`, sorted ascending. Equal
    /// magnitudes never displace an earlier position.
    pub fn find_least_reliable_pos(&mut self, r_prime: &[R]) {
        let size = r_prime.len();
        for slot in &mut self.least_reliable_pos {
            slot.magnitude = R::infinity();
            slot.index = size;
        }

        for (i, value) in r_prime.iter().enumerate() {
            let magnitude = value.abs();
            if let Some(at) = self
                .least_reliable_pos
                .iter()
                .position(|slot| magnitude < slot.magnitude)
            {
                self.least_reliable_pos.pop();
                self.least_reliable_pos.insert(
                    at,
                    LeastReliablePosition {
                        magnitude,
                        index: i,
                    },
                );
            }
        }
    }

    /// Builds candidate `c` for every `c < 2^p`: bit `i` of `c` is forced at the
    /// `i`-th least reliable position before correction.
    pub fn compute_test_vectors<D: ComponentDecoder<B> + ?Sized>(&mut self, hiho: &D, size: usize) {
        let n = hiho.n();
        self.lane_len = size;

        for c in 0..self.n_test_vectors {
            self.apply_candidate(c, n);

            let tv = &mut self.test_vect[c * size..(c + 1) * size];
            hiho.decode_hiho_cw(&self.hard_rprime[..size], &mut tv[..n]); // parity bit is ignored by the decoder

            if self.parity_extended {
                tv[n] = compute_parity(&tv[..n]);
            }
        }
    }

    fn apply_candidate(&mut self, c: usize, n: usize) {
        for (i, slot) in self.least_reliable_pos.iter().enumerate() {
            // a slot still holding the sentinel saw no finite magnitude
            if slot.index < n {
                self.hard_rprime[slot.index] = bit((c >> i) & 1 == 1);
            }
        }
    }

    /// Scores each candidate against `r_prime` and ranks them. Ties keep candidate order.
    pub fn compute_metrics(&mut self, r_prime: &[R]) {
        let size = r_prime.len();
        debug_assert_eq!(size, self.lane_len);

        for (c, metric) in self.metrics.iter_mut().enumerate() {
            let tv = &self.test_vect[c * size..(c + 1) * size];
            *metric = r_prime
                .iter()
                .zip(tv)
                .filter(|&(&r, &b)| hard_bit::<B, R>(r) != b)
                .fold(R::zero(), |acc, (r, _)| acc + r.abs());
        }

        for (c, competitor) in self.competitors.iter_mut().enumerate() {
            competitor.metric = self.metrics[c];
            competitor.candidate = c;
        }

        self.competitors
            .sort_by(|a, b| a.metric.partial_cmp(&b.metric).unwrap_or(Ordering::Equal));
    }

    /// Pyndiah update of `r_soft` in place, from the ranked candidates of the last
    /// search and the channel values `r_cha`.
    pub fn compute_reliability(&self, r_cha: &[R], r_soft: &mut [R]) {
        let decided = self.competitors[0];
        let dw = self.candidate(decided.candidate);

        let beta = self
            .least_reliable_pos
            .iter()
            .fold(R::zero(), |acc, slot| acc + slot.magnitude);

        let rivals = &self.competitors[1..self.params.n_competitors];

        for (i, (soft, &cha)) in r_soft.iter_mut().zip(r_cha).enumerate() {
            let db = dw[i];

            let mut reliability = match rivals
                .iter()
                .find(|rival| self.candidate(rival.candidate)[i] != db)
            {
                Some(rival) => rival.metric - decided.metric,
                None => (soft.abs() + beta - decided.metric).max(R::zero()),
            };

            if db != B::zero() {
                reliability = -reliability;
            }

            *soft = cha + self.params.alpha * (reliability - *soft);
        }
    }
}

fn scratch<T: Clone>(value: T, len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, value);
    Ok(buf)
}
