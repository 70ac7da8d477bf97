//! Keyseal demo binary.
//!
//! # Usage
//!
//! ```bash
//! # Default message, fresh OS randomness
//! keyseal-demo
//!
//! # Custom message with a reproducible run
//! keyseal-demo --message "meet at noon" --seed 42
//! ```

use std::io::{self, Write as _};

use clap::Parser;
use keyseal_demo::Report;
use keyseal_session::{OsRandom, RandomSource, SeededRandom, Session, SessionConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Alice and Bob agree on a key and exchange one sealed message
#[derive(Parser, Debug)]
#[command(name = "keyseal-demo")]
#[command(about = "X25519 key agreement, HKDF-SHA256 derivation and AES-256-GCM round-trip")]
#[command(version)]
struct Args {
    /// Message Alice sends (empty uses the default greeting)
    #[arg(short, long, default_value = "")]
    message: String,

    /// HKDF context label
    #[arg(long)]
    label: Option<String>,

    /// HKDF salt (absent means an all-zero salt)
    #[arg(long)]
    salt: Option<String>,

    /// Seed for a reproducible run. Never use for real traffic.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default();
        if let Some(label) = &self.label {
            config = config.with_context_label(label.as_bytes());
        }
        if let Some(salt) = &self.salt {
            config = config.with_salt(salt.as_bytes());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let report = match args.seed {
        Some(seed) => {
            tracing::warn!(seed, "Using seeded randomness - output is reproducible");
            run(&args, &mut SeededRandom::from_u64(seed))?
        },
        None => run(&args, &mut OsRandom::new())?,
    };

    let mut stdout = io::stdout().lock();
    report.write_to(&mut stdout)?;
    stdout.flush()?;

    Ok(())
}

fn run<R: RandomSource>(args: &Args, rng: &mut R) -> Result<Report, Box<dyn std::error::Error>> {
    let mut session = Session::new(args.session_config());

    match session.run(rng, &args.message) {
        Ok(outcome) => {
            tracing::info!("Session complete");
            Ok(Report::from_outcome(&outcome))
        },
        Err(err) => {
            tracing::error!(error = %err, state = ?session.state(), "Session failed");
            Err(err.into())
        },
    }
}
