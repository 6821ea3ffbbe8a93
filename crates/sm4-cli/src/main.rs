//! Command-line interface for SM4 with selectable substitution backends.

#![forbid(unsafe_code)]

mod hexio;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sm4_accel::{best_backend, is_supported, supported_backends, Backend, Sm4, Sm4Config};
use sm4_core::{ParseBackendError, BLOCK_SIZE};

/// SM4 CLI.
#[derive(Parser)]
#[command(
    name = "sm4",
    version,
    author,
    about = "SM4 block cipher with table, AES-NI and GFNI backends"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt whole 16-byte blocks (ECB, no padding).
    Enc(CryptArgs),
    /// Decrypt whole 16-byte blocks (ECB, no padding).
    Dec(CryptArgs),
    /// Compare a backend against the reference tables on random keys and data.
    Check {
        /// Backend to test; defaults to the best one available.
        #[arg(long, default_value = "auto")]
        backend: BackendChoice,
        /// Number of random keys to test.
        #[arg(long, default_value_t = 64)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List every backend and whether this CPU supports it.
    Backends,
    /// Measure throughput of each supported backend.
    Speed {
        /// Blocks encrypted per backend.
        #[arg(long, default_value_t = 1 << 16)]
        blocks: usize,
        /// Restrict the run to one backend.
        #[arg(long, default_value = "all")]
        backend: SpeedTarget,
    },
    /// Encrypt and decrypt five random blocks under a random key.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
        /// Backend to run on.
        #[arg(long, default_value = "auto")]
        backend: BackendChoice,
    },
}

#[derive(Args)]
struct CryptArgs {
    /// SM4 key as 32 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// Input data as hex.
    #[arg(long, value_name = "HEX", conflicts_with = "input", required_unless_present = "input")]
    data_hex: Option<String>,
    /// Input file (length must be a multiple of 16 bytes).
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Write raw bytes here instead of printing hex.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// auto, reference, aesni or gfni.
    #[arg(long, default_value = "auto")]
    backend: BackendChoice,
}

/// `--backend` value: a specific backend, or `auto` for the best supported one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct BackendChoice(Option<Backend>);

impl BackendChoice {
    fn config(self) -> Sm4Config {
        Sm4Config { backend: self.0 }
    }

    fn resolve(self) -> Backend {
        self.0.unwrap_or_else(best_backend)
    }
}

impl FromStr for BackendChoice {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(Self(None))
        } else {
            s.parse().map(|b| Self(Some(b)))
        }
    }
}

/// `speed --backend` value: one backend or every supported one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SpeedTarget(Option<Backend>);

impl SpeedTarget {
    fn backends(self) -> Vec<Backend> {
        match self.0 {
            Some(b) => vec![b],
            None => supported_backends(),
        }
    }
}

impl FromStr for SpeedTarget {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self(None))
        } else {
            s.parse().map(|b| Self(Some(b)))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc(args) => cmd_crypt(Direction::Encrypt, &args),
        Commands::Dec(args) => cmd_crypt(Direction::Decrypt, &args),
        Commands::Check {
            backend,
            samples,
            seed,
        } => cmd_check(backend.resolve(), samples, seed),
        Commands::Backends => cmd_backends(),
        Commands::Speed { blocks, backend } => cmd_speed(blocks, backend),
        Commands::Demo { seed, backend } => cmd_demo(seed, backend),
    }
}

fn cmd_crypt(direction: Direction, args: &CryptArgs) -> Result<()> {
    let data = match (&args.data_hex, &args.input) {
        (Some(text), _) => hexio::decode(text).context("decode --data-hex")?,
        (None, Some(path)) => fs::read(path).with_context(|| format!("read {}", path.display()))?,
        (None, None) => bail!("one of --data-hex or --input is required"),
    };
    let out = crypt(direction, &args.key_hex, args.backend, &data)?;
    match &args.output {
        Some(path) => fs::write(path, &out).with_context(|| format!("write {}", path.display()))?,
        None => println!("{}", hexio::encode(&out)),
    }
    Ok(())
}

fn crypt(direction: Direction, key_hex: &str, backend: BackendChoice, data: &[u8]) -> Result<Vec<u8>> {
    let key = hexio::decode(key_hex).context("decode --key-hex")?;
    let sm4 = Sm4::with_config(&key, backend.config()).context("set up cipher")?;
    info!(
        "{direction:?} {} blocks on {} backend",
        data.len() / BLOCK_SIZE,
        sm4.backend()
    );
    let out = match direction {
        Direction::Encrypt => sm4.encrypt(data),
        Direction::Decrypt => sm4.decrypt(data),
    };
    out.context("process input")
}

fn cmd_check(backend: Backend, samples: usize, seed: Option<u64>) -> Result<()> {
    info!("checking {backend} backend on {samples} samples");
    check_backend(backend, samples, &mut seeded_rng(seed))?;
    println!("{backend}: {samples} samples match the reference backend");
    Ok(())
}

/// Compares `backend` with the reference on single blocks and on 1..=9 block buffers,
/// which covers full lane batches and every tail length.
fn check_backend(backend: Backend, samples: usize, rng: &mut impl RngCore) -> Result<()> {
    for sample in 0..samples {
        let mut key = [0u8; 16];
        rng.fill_bytes(&mut key);
        let reference = Sm4::new(&key, Backend::Reference)?;
        let candidate = Sm4::new(&key, backend)?;
        if candidate.round_keys() != reference.round_keys() {
            bail!("sample {sample}: round keys differ from reference");
        }

        let mut data = vec![0u8; rng.gen_range(1..=9) * BLOCK_SIZE];
        rng.fill_bytes(&mut data);
        let block: [u8; 16] = data[..BLOCK_SIZE].try_into()?;
        if candidate.encrypt_block(&block) != reference.encrypt_block(&block) {
            bail!("sample {sample}: single-block ciphertext differs from reference");
        }
        let ct = candidate.encrypt(&data)?;
        if ct != reference.encrypt(&data)? {
            bail!(
                "sample {sample}: {}-block ciphertext differs from reference",
                data.len() / BLOCK_SIZE
            );
        }
        if candidate.decrypt(&ct)? != data {
            bail!("sample {sample}: decryption did not restore the plaintext");
        }
    }
    Ok(())
}

fn cmd_backends() -> Result<()> {
    let best = best_backend();
    for backend in Backend::ALL {
        let status = if is_supported(backend) { "supported" } else { "unavailable" };
        let marker = if backend == best { " (default)" } else { "" };
        println!("{:<10} {status}{marker}", backend.name());
    }
    Ok(())
}

/// Byte length of a `speed` buffer holding `blocks` blocks.
fn speed_buffer_len(blocks: usize) -> Result<usize> {
    if blocks == 0 {
        bail!("--blocks must be at least 1");
    }
    match blocks.checked_mul(BLOCK_SIZE) {
        Some(len) => Ok(len),
        None => bail!("--blocks {blocks} is too large"),
    }
}

fn cmd_speed(blocks: usize, target: SpeedTarget) -> Result<()> {
    let len = speed_buffer_len(blocks)?;
    let mut rng = seeded_rng(None);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);

    for backend in target.backends() {
        let sm4 = Sm4::new(&key, backend)?;
        info!("timing {blocks} blocks on {backend}");
        let mut buf = data.clone();
        let start = Instant::now();
        sm4.encrypt_in_place(&mut buf)?;
        let elapsed = start.elapsed();
        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        let mib_s = buf.len() as f64 / (1024.0 * 1024.0) / secs;
        println!(
            "{:<10} {blocks:>9} blocks  {:>10.3} ms  {mib_s:>9.1} MiB/s",
            backend.name(),
            elapsed.as_secs_f64() * 1e3
        );
    }
    Ok(())
}

fn cmd_demo(seed: Option<u64>, backend: BackendChoice) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let sm4 = Sm4::with_config(&key, backend.config())?;

    let mut plaintext = [0u8; 5 * BLOCK_SIZE];
    rng.fill_bytes(&mut plaintext);
    let ciphertext = sm4.encrypt(&plaintext)?;
    let decrypted = sm4.decrypt(&ciphertext)?;

    println!("backend: {}", sm4.backend());
    println!("demo key: {}", hexio::encode(&key));
    println!("plaintext: {}", hexio::encode(&plaintext));
    println!("ciphertext: {}", hexio::encode(&ciphertext));
    println!("decrypted: {}", hexio::encode(&decrypted));
    if decrypted != plaintext {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    let mut seed_bytes = [0u8; 32];
    match seed {
        Some(value) => seed_bytes[..8].copy_from_slice(&value.to_le_bytes()),
        None => rand::rngs::OsRng.fill_bytes(&mut seed_bytes),
    }
    ChaCha20Rng::from_seed(seed_bytes)
}
