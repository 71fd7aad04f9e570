use clap::Parser;

use crate::common::config::{parse_cutoff, AppConfig, HttpConfig, RetryConfig, ServerConfig};
use crate::common::errors::Result;

/// Restore trashed items on a WebDAV file-hosting server back to their
/// original locations, recreating any destination directories that no longer
/// exist. Entries deleted strictly before the cutoff are left in the trash.
#[derive(Debug, Parser)]
#[command(name = "oxirestore", version, about)]
pub struct Cli {
    /// Base URL of the server, e.g. https://cloud.example.org
    #[arg(long, env = "OC_SERVER_URL")]
    pub server_url: String,

    /// Account whose trash is restored
    #[arg(long, env = "OC_USER")]
    pub user: String,

    /// Password or app token for the account
    #[arg(long, env = "OC_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Restore cutoff: ISO-8601 instant or date-only (UTC midnight)
    #[arg(long, env = "OC_RESTORE_CUTOFF")]
    pub cutoff: String,

    /// Shard assigned to this worker process
    #[arg(long, env = "OC_SHARD", default_value_t = 0)]
    pub shard: u32,

    /// Total number of shards all workers agreed on
    #[arg(long, env = "OC_SHARDS", default_value_t = 1)]
    pub shards: u32,

    /// First plan position to process (post-shard, zero-based)
    #[arg(long, default_value_t = 0)]
    pub from: usize,

    /// Last plan position to process, inclusive
    #[arg(long)]
    pub to: Option<usize>,

    /// Only restore entries whose destination path starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Disable TLS certificate verification (NOT recommended)
    #[arg(long, default_value_t = false)]
    pub insecure_tls: bool,

    /// Attempt budget per MOVE/MKCOL operation
    #[arg(long, default_value_t = 4)]
    pub max_attempts: u32,

    /// Base delay between retries in milliseconds (grows linearly per attempt)
    #[arg(long, default_value_t = 300)]
    pub retry_base_ms: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print the final summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<AppConfig> {
        let cutoff = parse_cutoff(&self.cutoff)?;
        Ok(AppConfig {
            server: ServerConfig {
                base_url: self.server_url,
                username: self.user,
                password: self.password,
            },
            cutoff,
            shard: self.shard,
            total_shards: self.shards,
            range_from: self.from,
            range_to: self.to,
            prefix: self.prefix,
            retry: RetryConfig {
                max_attempts: self.max_attempts,
                base_delay_ms: self.retry_base_ms,
            },
            http: HttpConfig {
                timeout_secs: self.timeout_secs,
                verify_tls: !self.insecure_tls,
            },
        })
    }
}
