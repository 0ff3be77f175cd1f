use anyhow::Result;

mod demo;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = demo::DemoConfig::from_env()?;
    let frames = config.frames;
    let mut state = demo::DemoState::new(config)?;

    for _ in 0..frames {
        state.update()?;
    }
    state.report();

    Ok(())
}
