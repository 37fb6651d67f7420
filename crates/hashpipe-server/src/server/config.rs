use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use hashpipe::PipelineConfig;

/// Runtime configuration for the `hashpipe-server` binary.
///
/// These settings control how much work the server buffers, how many workers
/// persist it, and how long persistence takes. All values are parsed from CLI
/// arguments or environment variables, with defaults suitable for a single
/// instance.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hashpipe-server",
    version,
    about = "An HTTP service that hashes values and persists them asynchronously"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:3000"))]
    pub server_addr: String,

    /// Maximum number of hash requests waiting for a worker.
    ///
    /// Once this many requests are pending, further `POST /hash` requests are
    /// rejected with `429 Too Many Requests` until a worker frees a slot.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 100_000)]
    pub queue_capacity: usize,

    /// Number of worker tasks persisting hashes concurrently.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 1_000)]
    pub num_workers: usize,

    /// Milliseconds a worker waits before a hash becomes readable.
    ///
    /// Environment variable: `PROCESSING_DELAY_MS`
    #[arg(long, env = "PROCESSING_DELAY_MS", default_value_t = 5_000)]
    pub processing_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub pipeline: PipelineConfig,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.queue_capacity == 0 {
            bail!("QUEUE_CAPACITY must be greater than 0");
        }

        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.server_addr.trim().is_empty() {
            bail!("SERVER_ADDR must not be empty");
        }

        let pipeline = PipelineConfig::new(
            args.queue_capacity,
            args.num_workers,
            Duration::from_millis(args.processing_delay_ms),
        );
        pipeline.validate()?;

        Ok(Self {
            server_addr: args.server_addr,
            pipeline,
        })
    }
}
