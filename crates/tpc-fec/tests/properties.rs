//! Property tests for the Chase search building blocks and the interleaver.

use proptest::prelude::*;
use tpc_fec::soft::{compute_parity, hard_bit};
use tpc_fec::{ChaseParams, ChaseSearch, Interleaver, PassThroughHiho, RowColumnInterleaver};

/// Keeps the `2^p` candidate buffers small.
const MAX_P: usize = 8;

fn search(p: usize, n: usize, parity_extended: bool) -> ChaseSearch<u8, f32> {
    ChaseSearch::new(
        ChaseParams {
            n_least_reliable_positions: p,
            n_competitors: 1 << p,
            alpha: 0.5,
            syndrome_fast_path: false,
        },
        n,
        n,
        parity_extended,
    )
    .expect("valid parameters")
}

fn soft_lane(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-8.0f32..8.0, 3..max_len)
}

proptest! {
    /// The retained positions are the `p` smallest magnitudes, earliest index first on ties.
    #[test]
    fn least_reliable_matches_brute_force(values in soft_lane(48), p_seed in 0usize..64) {
        let p = 1 + p_seed % (values.len() - 1).min(MAX_P);
        let mut s = search(p, values.len(), false);
        s.find_least_reliable_pos(&values);

        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[a].abs().partial_cmp(&values[b].abs()).unwrap());
        order.truncate(p);

        let kept = s.least_reliable();
        prop_assert_eq!(kept.len(), p);
        prop_assert!(kept.windows(2).all(|w| w[0].magnitude <= w[1].magnitude));
        let kept_idx: Vec<usize> = kept.iter().map(|slot| slot.index).collect();
        prop_assert_eq!(kept_idx, order);
    }

    /// Ties in magnitude are frequent on quantized inputs.
    #[test]
    fn least_reliable_on_quantized_input(raw in proptest::collection::vec(-3i8..=3, 4..32), p_seed in 0usize..8) {
        let values: Vec<f32> = raw.iter().map(|&v| f32::from(v)).collect();
        let p = 1 + p_seed % (values.len() - 1).min(MAX_P);
        let mut s = search(p, values.len(), false);
        s.find_least_reliable_pos(&values);

        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[a].abs().partial_cmp(&values[b].abs()).unwrap());
        order.truncate(p);

        let kept_idx: Vec<usize> = s.least_reliable().iter().map(|slot| slot.index).collect();
        prop_assert_eq!(kept_idx, order);
    }

    #[test]
    fn candidates_metrics_and_ranking(
        values in soft_lane(14),
        p_seed in 0usize..16,
        parity_extended in any::<bool>(),
    ) {
        let n = values.len() - usize::from(parity_extended);
        prop_assume!(n >= 2);
        let p = 1 + p_seed % (n - 1).min(5);
        let hiho = PassThroughHiho::new(n);
        let mut s = search(p, n, parity_extended);

        prop_assert!(!s.decode_chase(&values, &hiho));
        prop_assert_eq!(s.n_test_vectors(), 1 << p);
        prop_assert_eq!(s.competitors().len(), 1 << p);

        for c in 0..s.n_test_vectors() {
            let cw = s.candidate(c);
            prop_assert_eq!(cw.len(), values.len());
            if parity_extended {
                prop_assert_eq!(cw[n], compute_parity(&cw[..n]));
            }
            for (i, slot) in s.least_reliable().iter().enumerate() {
                prop_assert_eq!(cw[slot.index], u8::from((c >> i) & 1 == 1));
            }

            let expected: f32 = values
                .iter()
                .zip(cw)
                .filter(|&(&r, &b)| hard_bit::<u8, f32>(r) != b)
                .map(|(r, _)| r.abs())
                .sum();
            prop_assert!((s.metric(c) - expected).abs() <= 1e-4 * (1.0 + expected));
        }

        let ranked = s.competitors();
        let best = ranked[0].metric;
        prop_assert!(ranked.iter().all(|comp| best <= comp.metric));
        for w in ranked.windows(2) {
            prop_assert!(w[0].metric <= w[1].metric);
            if w[0].metric == w[1].metric {
                prop_assert!(w[0].candidate < w[1].candidate);
            }
        }

        let mut seen: Vec<usize> = ranked.iter().map(|comp| comp.candidate).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..1 << p).collect::<Vec<_>>());
        prop_assert_eq!(s.decided_word(), s.candidate(ranked[0].candidate));
    }

    #[test]
    fn deinterleave_inverts_interleave(
        n_rows in 1usize..12,
        n_cols in 1usize..12,
        seed in proptest::collection::vec(-100.0f64..100.0, 144),
    ) {
        let pi = RowColumnInterleaver::new(n_rows, n_cols);
        let src = &seed[..pi.size()];
        let mut mid = vec![0.0; pi.size()];
        let mut back = vec![0.0; pi.size()];
        pi.interleave(src, &mut mid);
        pi.deinterleave(&mid, &mut back);
        prop_assert_eq!(&back[..], src);

        // and the other way round
        pi.deinterleave(src, &mut mid);
        pi.interleave(&mid, &mut back);
        prop_assert_eq!(&back[..], src);
    }
}
