use env_logger::Env;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = textscape::DemoConfig::from_env();
    log::info!(
        "Starting textscape with assets from {}",
        config.assets_dir.display()
    );

    textscape::TextscapeApp::new(config)?.run()
}
