mod cli;
mod input;
mod logging;
mod pipeline;
mod profile;
mod replay;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
