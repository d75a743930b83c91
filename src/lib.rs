pub mod autolock;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod lock;
pub mod shell;
pub mod store;

pub use error::{Error, Result};
pub use gateway::ProofOfPresence;
pub use lock::{AppLock, LockState};

fn data_dir(cfg: &config::Config) -> anyhow::Result<std::path::PathBuf> {
    if let Some(dir) = &cfg.data_dir {
        return Ok(dir.clone());
    }
    Ok(directories::ProjectDirs::from("", "", "clasp")
        .ok_or_else(|| anyhow::anyhow!("cannot determine XDG data dir"))?
        .data_dir()
        .to_path_buf())
}

pub async fn wipe(cfg: config::Config) -> anyhow::Result<()> {
    let data_dir = data_dir(&cfg)?;
    let record = data_dir.join("profiles").join(format!("{}.json", cfg.profile));
    if record.exists() {
        std::fs::remove_file(&record)?;
        println!(
            "Deleted lock record for profile '{}' ({})",
            cfg.profile,
            record.display()
        );
    } else {
        println!("No lock record stored for profile '{}'", cfg.profile);
    }
    Ok(())
}

pub async fn run(cfg: config::Config) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;
    let level = match cfg.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .init();

    tracing::info!("Starting clasp");

    // Preflight checks
    diagnostics::check(&cfg)?;

    let data_dir = data_dir(&cfg)?;
    std::fs::create_dir_all(&data_dir)?;

    // Single-instance lock
    let lock_dir = std::env::var("XDG_RUNTIME_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| data_dir.clone());
    let lock_path = lock_dir.join("clasp.lock");
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&lock_path)?;
    let mut instance_lock = fd_lock::RwLock::new(lock_file);
    let _guard = instance_lock.try_write().map_err(|_| {
        anyhow::anyhow!("clasp is already running (lock: {})", lock_path.display())
    })?;

    let store = store::DiskStore::open(data_dir.join("profiles"))?;
    let gateway =
        gateway::AuthenticatorGateway::new(gateway::PinentryClient::new(cfg.pinentry.clone()));
    let app = lock::AppLock::load(
        store,
        gateway,
        cfg.profile.clone(),
        cfg.rp_id.clone(),
        config::USER_DISPLAY.to_string(),
    )?;
    tracing::info!(
        state = ?app.state(),
        has_credential = app.has_credential(),
        "Lock state loaded"
    );

    let auto = (cfg.auto_relock_secs > 0)
        .then(|| autolock::AutoRelock::new(std::time::Duration::from_secs(cfg.auto_relock_secs)));

    shell::run(std::sync::Arc::new(app), auto).await
}
