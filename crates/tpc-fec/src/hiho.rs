use crate::soft::{HardBit, compute_parity};

/// Hard-input hard-output decoder for one dimension of the product code.
///
/// Implementations must be deterministic. `hard_in` may be one position longer than
/// [`ComponentDecoder::n`] when the code is parity-extended; that trailing bit is ignored.
pub trait ComponentDecoder<B: HardBit> {
    /// Codeword length, parity extension excluded.
    fn n(&self) -> usize;

    /// Information length. Information bits sit at positions `n - k .. n`.
    fn k(&self) -> usize;

    /// Corrects `hard_in` and writes the first `n` positions of the codeword.
    fn decode_hiho_cw(&self, hard_in: &[B], codeword: &mut [B]);

    /// Whether `hard` already is a codeword: decoding leaves it unchanged and, when
    /// `parity_extended`, its last bit matches the parity of the first `n`.
    /// `scratch` holds at least `n` positions and is clobbered.
    fn is_codeword(&self, hard: &[B], parity_extended: bool, scratch: &mut [B]) -> bool {
        let n = self.n();
        let codeword = &mut scratch[..n];
        self.decode_hiho_cw(hard, codeword);
        if codeword[..] != hard[..n] {
            return false;
        }
        !parity_extended || compute_parity(&hard[..n]) == hard[n]
    }
}

impl<B: HardBit, D: ComponentDecoder<B> + ?Sized> ComponentDecoder<B> for &D {
    fn n(&self) -> usize {
        (**self).n()
    }

    fn k(&self) -> usize {
        (**self).k()
    }

    fn decode_hiho_cw(&self, hard_in: &[B], codeword: &mut [B]) {
        (**self).decode_hiho_cw(hard_in, codeword);
    }

    fn is_codeword(&self, hard: &[B], parity_extended: bool, scratch: &mut [B]) -> bool {
        (**self).is_codeword(hard, parity_extended, scratch)
    }
}

impl<B: HardBit, D: ComponentDecoder<B> + ?Sized> ComponentDecoder<B> for Box<D> {
    fn n(&self) -> usize {
        (**self).n()
    }

    fn k(&self) -> usize {
        (**self).k()
    }

    fn decode_hiho_cw(&self, hard_in: &[B], codeword: &mut [B]) {
        (**self).decode_hiho_cw(hard_in, codeword);
    }

    fn is_codeword(&self, hard: &[B], parity_extended: bool, scratch: &mut [B]) -> bool {
        (**self).is_codeword(hard, parity_extended, scratch)
    }
}

/// Rate-one component: every word is a codeword and decoding returns its input.
/// With parity extension the product of two of these is the single-parity-check
/// product code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassThroughHiho {
    n: usize,
}

impl PassThroughHiho {
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl<B: HardBit> ComponentDecoder<B> for PassThroughHiho {
    fn n(&self) -> usize {
        self.n
    }

    fn k(&self) -> usize {
        self.n
    }

    fn decode_hiho_cw(&self, hard_in: &[B], codeword: &mut [B]) {
        codeword[..self.n].copy_from_slice(&hard_in[..self.n]);
    }

    fn is_codeword(&self, hard: &[B], parity_extended: bool, _scratch: &mut [B]) -> bool {
        !parity_extended || compute_parity(&hard[..self.n]) == hard[self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_ignores_parity_slot() {
        let hiho = PassThroughHiho::new(3);
        let mut cw = [7u8; 3];
        hiho.decode_hiho_cw(&[1u8, 0, 1, 1], &mut cw);
        assert_eq!(cw, [1, 0, 1]);
    }

    #[test]
    fn codeword_check_follows_parity() {
        let hiho = PassThroughHiho::new(3);
        let mut scratch = [0u8; 3];
        assert!(hiho.is_codeword(&[1u8, 1, 0], false, &mut scratch));
        assert!(hiho.is_codeword(&[1u8, 1, 0, 0], true, &mut scratch));
        assert!(!hiho.is_codeword(&[1u8, 1, 0, 1], true, &mut scratch));
    }

    /// Repetition code of length 3: majority vote.
    struct Repetition3;

    impl ComponentDecoder<u8> for Repetition3 {
        fn n(&self) -> usize {
            3
        }

        fn k(&self) -> usize {
            1
        }

        fn decode_hiho_cw(&self, hard_in: &[u8], codeword: &mut [u8]) {
            let one = u8::from(hard_in[..3].iter().filter(|&&b| b == 1).count() >= 2);
            codeword[..3].fill(one);
        }
    }

    #[test]
    fn default_codeword_check_uses_scratch() {
        let mut scratch = [9u8; 5];
        assert!(Repetition3.is_codeword(&[1, 1, 1], false, &mut scratch));
        assert!(!Repetition3.is_codeword(&[1, 0, 1], false, &mut scratch));
        assert_eq!(scratch[..3], [1, 1, 1]);
        assert_eq!(scratch[3..], [9, 9]);

        assert!(Repetition3.is_codeword(&[1, 1, 1, 1], true, &mut scratch));
        assert!(!Repetition3.is_codeword(&[1, 1, 1, 0], true, &mut scratch));
        assert!((&Repetition3).is_codeword(&[0, 0, 0], false, &mut scratch));
    }

    #[test]
    fn boxed_decoder_forwards() {
        let boxed: Box<dyn ComponentDecoder<u64>> = Box::new(PassThroughHiho::new(2));
        assert_eq!(boxed.n(), 2);
        assert_eq!(boxed.k(), 2);
        let mut cw = [0u64; 2];
        boxed.decode_hiho_cw(&[1, 0], &mut cw);
        assert_eq!(cw, [1, 0]);
    }
}
