use crate::config::Config;

pub fn check(cfg: &Config) -> anyhow::Result<()> {
    let mut errors: Vec<String> = Vec::new();

    // Check 1: pinentry binary found. Without it there is no platform
    // authenticator interface at all.
    match std::process::Command::new(&cfg.pinentry)
        .arg("--version")
        .output()
    {
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "pinentry binary not found: '{}': {e}\n  \
             → install pinentry, or point --pinentry at the binary",
            cfg.pinentry
        )),
    }

    // Check 2: data dir creatable/writable
    if let Some(dir) = &cfg.data_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {}
            Err(e) => errors.push(format!("cannot create data dir {}: {e}", dir.display())),
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        eprintln!("ERROR: {err}");
    }
    anyhow::bail!("{} preflight check(s) failed", errors.len());
}
