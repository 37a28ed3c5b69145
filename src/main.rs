use clap::{Parser, Subcommand};
use qmusic::{ApiConfig, AppContext, CacheConfig, util::log::initialize_logging};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Home page recommendations
    Recommend,
    /// Playlist collections
    Discs,
    /// Songs of the pinned collection
    Songs,
    /// Player state seeded from the local cache
    State,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    setup()?;
    let cli = Cli::parse();

    let ctx = AppContext::new(ApiConfig::from_env(), &CacheConfig::from_env())?;
    let output = match cli.command {
        Command::Recommend => ctx.api.get_recommend().await?,
        Command::Discs => ctx.api.get_disc_list().await?,
        Command::Songs => ctx.api.get_song_list().await?,
        Command::State => serde_json::to_value(&*ctx.store.read().await)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    initialize_logging()
}
