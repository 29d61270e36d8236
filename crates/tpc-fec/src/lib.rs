#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! Chase-Pyndiah decoding of two-dimensional product codes.
//!
//! [`ChasePyndiahDecoder`] alternates column and row passes over a received block.
//! Each pass runs a [`ChaseSearch`] per lane: the least reliable positions of the
//! lane are perturbed, every perturbation is corrected by the lane's
//! [`ComponentDecoder`], and the ranked candidates yield either refined soft values
//! or, on the last pass, hard bits.

pub mod builder;
pub mod chase;
pub mod decoder;
pub mod encoder;
pub mod hiho;
pub mod interleaver;
pub mod layout;
pub mod soft;

use core::fmt::Display;

use thiserror::Error;

pub use builder::{PrecisionVisitor, SpcProductDecoder, build_decoder, with_precision};
pub use chase::{ChaseParams, ChaseSearch, Competitor, LeastReliablePosition};
pub use decoder::{ChasePyndiahDecoder, Decoded};
pub use encoder::SpcProductEncoder;
pub use hiho::{ComponentDecoder, PassThroughHiho};
pub use interleaver::{Interleaver, RowColumnInterleaver};
pub use layout::StridedView;
pub use soft::{HardBit, SoftValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FecError {
    #[error("invalid argument '{name}' = {value}: {bound}")]
    InvalidArgument {
        name: &'static str,
        value: String,
        bound: String,
    },
    #[error("{value} is not representable in the selected soft-value type")]
    Precision { value: String },
}

impl FecError {
    pub(crate) fn invalid_argument(
        name: &'static str,
        value: impl Display,
        bound: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            name,
            value: value.to_string(),
            bound: bound.into(),
        }
    }
}
