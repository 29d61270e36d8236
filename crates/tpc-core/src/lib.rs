#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

pub const DEFAULT_INFO_BITS: u16 = 8;
pub const DEFAULT_ITERATIONS: u8 = 4;
pub const DEFAULT_ALPHA: f32 = 0.5;
pub const DEFAULT_LEAST_RELIABLE_POSITIONS: u8 = 3;

/// Numeric width of the hard-bit / soft-value pair a decoder is instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Bits32,
    Bits64,
}

impl Precision {
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    #[must_use]
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::Bits32),
            64 => Some(Self::Bits64),
            _ => None,
        }
    }
}

/// What a decode call hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Refined soft values over the whole block.
    Soft,
    /// Hard bits restricted to the `K_row * K_col` information bits.
    HardInfo,
    /// Hard bits over the whole block, parity included.
    HardCodeword,
}

impl OutputMode {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Soft)
    }
}

/// One dimension's component code: block length `n` and information length `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProfile {
    pub n: u16,
    pub k: u16,
}

impl ComponentProfile {
    #[must_use]
    pub fn uncoded(n: u16) -> Self {
        Self { n, k: n }
    }

    #[must_use]
    pub fn redundancy(&self) -> u16 {
        self.n.saturating_sub(self.k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCodeProfile {
    pub row: ComponentProfile,
    pub col: ComponentProfile,
    pub parity_extended: bool,
}

impl ProductCodeProfile {
    /// Positions per row, trailing parity bit included.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        usize::from(self.row.n) + usize::from(self.parity_extended)
    }

    /// Positions per column, trailing parity bit included.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        usize::from(self.col.n) + usize::from(self.parity_extended)
    }

    #[must_use]
    pub fn block_len(&self) -> usize {
        self.n_rows() * self.n_cols()
    }

    #[must_use]
    pub fn info_len(&self) -> usize {
        usize::from(self.row.k) * usize::from(self.col.k)
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.info_len() as f32 / self.block_len() as f32
    }
}

impl Default for ProductCodeProfile {
    fn default() -> Self {
        Self {
            row: ComponentProfile::uncoded(DEFAULT_INFO_BITS),
            col: ComponentProfile::uncoded(DEFAULT_INFO_BITS),
            parity_extended: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChaseProfile {
    pub n_iterations: u8,
    pub alpha: f32,
    pub n_least_reliable_positions: u8,
    /// `None` keeps every test vector as a competitor.
    pub n_competitors: Option<u16>,
    #[serde(default)]
    pub syndrome_fast_path: bool,
}

impl ChaseProfile {
    #[must_use]
    pub fn n_test_vectors(&self) -> usize {
        1usize
            .checked_shl(u32::from(self.n_least_reliable_positions))
            .unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn resolved_competitors(&self) -> usize {
        self.n_competitors
            .map_or_else(|| self.n_test_vectors(), usize::from)
    }
}

impl Default for ChaseProfile {
    fn default() -> Self {
        Self {
            n_iterations: DEFAULT_ITERATIONS,
            alpha: DEFAULT_ALPHA,
            n_least_reliable_positions: DEFAULT_LEAST_RELIABLE_POSITIONS,
            n_competitors: None,
            syndrome_fast_path: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpcProfile {
    pub code: ProductCodeProfile,
    pub chase: ChaseProfile,
    pub precision: Precision,
}

impl Default for TpcProfile {
    fn default() -> Self {
        Self {
            code: ProductCodeProfile::default(),
            chase: ChaseProfile::default(),
            precision: Precision::Bits32,
        }
    }
}
