use tpc_core::{ChaseProfile, Precision, ProductCodeProfile, TpcProfile};

use crate::FecError;
use crate::chase::ChaseParams;
use crate::decoder::ChasePyndiahDecoder;
use crate::hiho::PassThroughHiho;
use crate::interleaver::RowColumnInterleaver;
use crate::soft::{HardBit, SoftValue};

/// Decoder of the single-parity-check product code, the one product code the
/// crate can build from a profile alone.
pub type SpcProductDecoder<B, R> =
    ChasePyndiahDecoder<B, R, PassThroughHiho, PassThroughHiho, RowColumnInterleaver>;

pub fn chase_params<R: SoftValue>(chase: &ChaseProfile) -> Result<ChaseParams<R>, FecError> {
    let alpha = <R as num_traits::NumCast>::from(chase.alpha).ok_or(FecError::Precision {
        value: chase.alpha.to_string(),
    })?;

    Ok(ChaseParams {
        n_least_reliable_positions: usize::from(chase.n_least_reliable_positions),
        n_competitors: chase.resolved_competitors(),
        alpha,
        syndrome_fast_path: chase.syndrome_fast_path,
    })
}

#[must_use]
pub fn interleaver(code: &ProductCodeProfile) -> RowColumnInterleaver {
    RowColumnInterleaver::new(code.n_rows(), code.n_cols())
}

pub fn build_decoder<B: HardBit, R: SoftValue>(
    profile: &TpcProfile,
) -> Result<SpcProductDecoder<B, R>, FecError> {
    let code = &profile.code;
    for (name, component) in [("row.k", code.row), ("col.k", code.col)] {
        if component.k != component.n {
            return Err(FecError::invalid_argument(
                name,
                component.k,
                format!(
                    "only rate-one components (k = N = {}) are built from a profile; \
                     use ChasePyndiahDecoder::new with a ComponentDecoder otherwise",
                    component.n
                ),
            ));
        }
    }

    ChasePyndiahDecoder::new(
        usize::from(profile.chase.n_iterations),
        interleaver(code),
        PassThroughHiho::new(usize::from(code.row.n)),
        PassThroughHiho::new(usize::from(code.col.n)),
        chase_params(&profile.chase)?,
    )
}

/// Code that is generic over the hard-bit / soft-value pair.
pub trait PrecisionVisitor {
    type Output;

    fn visit<B: HardBit, R: SoftValue>(self) -> Self::Output;
}

/// Resolves `precision` once and runs `visitor` with the matching types.
pub fn with_precision<V: PrecisionVisitor>(precision: Precision, visitor: V) -> V::Output {
    match precision {
        Precision::Bits32 => visitor.visit::<u32, f32>(),
        Precision::Bits64 => visitor.visit::<u64, f64>(),
    }
}
