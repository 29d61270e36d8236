use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use tpc_core::{ComponentProfile, Precision, TpcProfile};
use tpc_fec::{
    FecError, HardBit, PrecisionVisitor, SoftValue, SpcProductDecoder, SpcProductEncoder,
    build_decoder, with_precision,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tpc-lab",
    about = "BER/FER sweep of the Chase-Pyndiah product code decoder over BPSK/AWGN"
)]
struct Cli {
    /// JSON `TpcProfile`; flags below override its fields.
    #[arg(long)]
    profile: Option<PathBuf>,
    #[arg(long, default_value_t = 200)]
    trials: usize,
    #[arg(long, default_value_t = 1.0)]
    ebn0_start: f32,
    #[arg(long, default_value_t = 5.0)]
    ebn0_end: f32,
    #[arg(long, default_value_t = 0.5)]
    ebn0_step: f32,
    /// Information bits per row and per column.
    #[arg(long)]
    info_bits: Option<u16>,
    #[arg(long)]
    iterations: Option<u8>,
    #[arg(long)]
    alpha: Option<f32>,
    #[arg(long)]
    least_reliable: Option<u8>,
    #[arg(long)]
    competitors: Option<u16>,
    #[arg(long)]
    fast_path: bool,
    /// Hard/soft value width in bits: 32 or 64.
    #[arg(long, value_parser = parse_precision)]
    precision: Option<Precision>,
    #[arg(long, default_value_t = 0x7C0D_2026)]
    seed: u64,
}

fn parse_precision(s: &str) -> Result<Precision, String> {
    let bits: u32 = s.parse().map_err(|e| format!("{s}: {e}"))?;
    Precision::from_bits(bits)
        .ok_or_else(|| format!("unsupported precision {bits}, use 32 or 64"))
}

#[derive(Debug, Clone)]
struct Config {
    trials: usize,
    ebn0_start: f32,
    ebn0_end: f32,
    ebn0_step: f32,
    seed: u64,
}

#[derive(Default)]
struct Stats {
    total_bits: usize,
    bit_errors: usize,
    frames: usize,
    frame_errors: usize,
    channel_errors: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = resolve_profile(&cli)?;
    let cfg = Config {
        trials: cli.trials.max(1),
        ebn0_start: cli.ebn0_start,
        ebn0_end: cli.ebn0_end,
        ebn0_step: cli.ebn0_step.max(0.05),
        seed: cli.seed,
    };

    println!("tpc-lab sweep");
    println!(
        "  code: ({}x{}) -> ({}x{}) rate={:.3} redundancy={}/{} parity_extended={}",
        profile.code.col.k,
        profile.code.row.k,
        profile.code.n_rows(),
        profile.code.n_cols(),
        profile.code.rate(),
        profile.code.col.redundancy(),
        profile.code.row.redundancy(),
        profile.code.parity_extended
    );
    println!(
        "  chase: iterations={} alpha={:.2} p={} competitors={} fast_path={} precision={}",
        profile.chase.n_iterations,
        profile.chase.alpha,
        profile.chase.n_least_reliable_positions,
        profile.chase.resolved_competitors(),
        profile.chase.syndrome_fast_path,
        profile.precision.bits()
    );
    println!("  columns: ebn0_db, channel_ber, ber, fer");

    with_precision(profile.precision, Sweep { cfg, profile })?;
    Ok(())
}

fn resolve_profile(cli: &Cli) -> Result<TpcProfile, Box<dyn std::error::Error>> {
    let mut profile = match &cli.profile {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let profile: TpcProfile = serde_json::from_str(&text)?;
            info!(path = %path.display(), "loaded profile");
            profile
        }
        None => TpcProfile::default(),
    };

    if let Some(k) = cli.info_bits {
        profile.code.row = ComponentProfile::uncoded(k);
        profile.code.col = ComponentProfile::uncoded(k);
    }
    if let Some(n) = cli.iterations {
        profile.chase.n_iterations = n;
    }
    if let Some(alpha) = cli.alpha {
        profile.chase.alpha = alpha;
    }
    if let Some(p) = cli.least_reliable {
        profile.chase.n_least_reliable_positions = p;
    }
    if cli.competitors.is_some() {
        profile.chase.n_competitors = cli.competitors;
    }
    if cli.fast_path {
        profile.chase.syndrome_fast_path = true;
    }
    if let Some(precision) = cli.precision {
        profile.precision = precision;
    }

    debug!(?profile, "resolved profile");
    Ok(profile)
}

struct Sweep {
    cfg: Config,
    profile: TpcProfile,
}

impl PrecisionVisitor for Sweep {
    type Output = Result<(), FecError>;

    fn visit<B: HardBit, R: SoftValue>(self) -> Self::Output {
        let Self { cfg, profile } = self;
        let mut dec = build_decoder::<B, R>(&profile)?;
        let enc = SpcProductEncoder::from_profile(&profile.code)?;
        let mut rng = StdRng::seed_from_u64(cfg.seed);

        let mut frame = Frame::<B, R>::new(&enc);
        for ebn0 in ebn0_points(&cfg) {
            let sigma = noise_sigma(ebn0, profile.code.rate());
            let mut stats = Stats::default();
            for _ in 0..cfg.trials {
                frame.run_trial(&enc, &mut dec, sigma, &mut rng, &mut stats);
            }

            let cber = ratio(stats.channel_errors, stats.frames * enc.n());
            let ber = ratio(stats.bit_errors, stats.total_bits);
            let fer = ratio(stats.frame_errors, stats.frames);
            println!("  {ebn0:6.2}, {cber:0.6}, {ber:0.6}, {fer:0.6}");
        }
        Ok(())
    }
}

/// Per-frame buffers, allocated once for the whole sweep.
struct Frame<B, R> {
    info: Vec<B>,
    codeword: Vec<B>,
    llr: Vec<R>,
    decoded: Vec<B>,
}

impl<B: HardBit, R: SoftValue> Frame<B, R> {
    fn new(enc: &SpcProductEncoder) -> Self {
        Self {
            info: vec![B::zero(); enc.k()],
            codeword: vec![B::zero(); enc.n()],
            llr: vec![R::zero(); enc.n()],
            decoded: vec![B::zero(); enc.k()],
        }
    }

    fn run_trial(
        &mut self,
        enc: &SpcProductEncoder,
        dec: &mut SpcProductDecoder<B, R>,
        sigma: f64,
        rng: &mut StdRng,
        stats: &mut Stats,
    ) {
        for bit in &mut self.info {
            *bit = if rng.random::<bool>() { B::one() } else { B::zero() };
        }
        enc.encode(&self.info, &mut self.codeword);

        let scale = 2.0 / (sigma * sigma);
        for (llr, &bit) in self.llr.iter_mut().zip(&self.codeword) {
            // bit 0 -> +1, bit 1 -> -1
            let symbol = if bit == B::zero() { 1.0 } else { -1.0 };
            let y = symbol + sigma * box_muller(rng);
            if (y < 0.0) != (bit != B::zero()) {
                stats.channel_errors += 1;
            }
            *llr = <R as num_traits::NumCast>::from(scale * y).unwrap_or_default();
        }

        dec.decode_siho(&self.llr, &mut self.decoded);

        let errors = self
            .decoded
            .iter()
            .zip(&self.info)
            .filter(|(a, b)| a != b)
            .count();
        stats.frames += 1;
        stats.total_bits += self.info.len();
        stats.bit_errors += errors;
        if errors > 0 {
            stats.frame_errors += 1;
        }
    }
}

fn noise_sigma(ebn0_db: f32, rate: f32) -> f64 {
    let ebn0 = 10f64.powf(f64::from(ebn0_db) / 10.0);
    (1.0 / (2.0 * f64::from(rate) * ebn0)).sqrt()
}

fn ebn0_points(cfg: &Config) -> Vec<f32> {
    if cfg.ebn0_start >= cfg.ebn0_end {
        return vec![cfg.ebn0_start];
    }

    let mut out = Vec::new();
    let mut e = cfg.ebn0_start;
    while e <= cfg.ebn0_end + 1e-3 {
        out.push(e);
        e += cfg.ebn0_step;
    }
    out
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn box_muller(rng: &mut impl Rng) -> f64 {
    let u1 = rng.random::<f64>().max(1e-12);
    let u2 = rng.random::<f64>();
    (-2.0f64 * u1.ln()).sqrt() * (2.0f64 * core::f64::consts::PI * u2).cos()
}
