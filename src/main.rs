use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cfg = clasp::config::Config::parse();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            if cfg.wipe {
                clasp::wipe(cfg).await
            } else {
                clasp::run(cfg).await
            }
        })
}
