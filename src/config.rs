use std::path::PathBuf;
use std::time::Duration;

pub const RP_NAME: &str = "clasp";
pub const USER_HANDLE: &str = "local-user";
pub const USER_DISPLAY: &str = "Local User";
/// How long a platform prompt may stay open before it resolves as a failure.
pub const PROMPT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(clap::Parser, Debug, Clone)]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Relying-party identifier binding the credential to this application.
    #[arg(long, default_value = "localhost")]
    pub rp_id: String,
    /// Profile whose lock record is used.
    #[arg(long, default_value = "default")]
    pub profile: String,
    #[arg(long, default_value = "pinentry")]
    pub pinentry: String,
    /// Override the data directory (defaults to the XDG data dir).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Re-lock automatically after this many seconds unlocked; 0 disables.
    #[arg(long, default_value_t = 0)]
    pub auto_relock_secs: u64,
    /// Delete the stored credential and lock flag for the profile, then exit.
    #[arg(long)]
    pub wipe: bool,
}
