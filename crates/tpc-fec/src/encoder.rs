use tpc_core::ProductCodeProfile;

use crate::FecError;
use crate::soft::{HardBit, compute_parity};

/// Systematic encoder of the single-parity-check product code: `k_col` rows of
/// `k_row` information bits, each row closed by its parity bit, plus a final row of
/// column parities. The corner bit checks both the last row and the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpcProductEncoder {
    k_row: usize,
    k_col: usize,
}

impl SpcProductEncoder {
    #[must_use]
    pub fn new(k_row: usize, k_col: usize) -> Self {
        Self { k_row, k_col }
    }

    pub fn from_profile(code: &ProductCodeProfile) -> Result<Self, FecError> {
        if !code.parity_extended {
            return Err(FecError::invalid_argument(
                "parity_extended",
                code.parity_extended,
                "single-parity-check product codes need the parity extension",
            ));
        }
        for (name, component) in [("row.k", code.row), ("col.k", code.col)] {
            if component.k != component.n {
                return Err(FecError::invalid_argument(
                    name,
                    component.k,
                    format!("has to equal N ({}) for a single-parity-check product", component.n),
                ));
            }
        }
        Ok(Self::new(usize::from(code.row.k), usize::from(code.col.k)))
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k_row * self.k_col
    }

    #[must_use]
    pub fn n(&self) -> usize {
        (self.k_row + 1) * (self.k_col + 1)
    }

    /// `info` is row-major `k_col x k_row`; `codeword` receives the
    /// `(k_col + 1) x (k_row + 1)` block.
    pub fn encode<B: HardBit>(&self, info: &[B], codeword: &mut [B]) {
        debug_assert_eq!(info.len(), self.k());
        debug_assert_eq!(codeword.len(), self.n());

        let n_cols = self.k_row + 1;
        for (bits, row) in info
            .chunks_exact(self.k_row)
            .zip(codeword.chunks_exact_mut(n_cols))
        {
            row[..self.k_row].copy_from_slice(bits);
            row[self.k_row] = compute_parity(bits);
        }

        let (body, last) = codeword.split_at_mut(self.k_col * n_cols);
        for (c, parity) in last.iter_mut().enumerate() {
            *parity = body
                .iter()
                .skip(c)
                .step_by(n_cols)
                .fold(B::zero(), |acc, &b| acc ^ b);
        }
    }
}
