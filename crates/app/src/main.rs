use engine::Session;

mod command;
mod error;
mod settings;
mod shell;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spendlog={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let session = if settings.app.seed_sample_data {
        tracing::info!("seeding sample expenses");
        Session::sample()
    } else {
        Session::new()
    };
    tracing::info!(session = %session.id(), records = session.len(), "session ready");

    shell::Shell::new(session, settings.scheduler.settle())
        .run()
        .await
}
