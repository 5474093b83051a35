use crate::prelude::*;
use clap::Parser;

mod config;
mod error;
mod list;
mod prelude;
mod provider;
mod resources;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "List subjects, classes and departments from the campus administration backend"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Backend base URL
    #[clap(long, env = "BACKEND_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "CAMPUS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List the records of a resource
    List(crate::list::ListOptions),

    /// Show which filters each resource sends to the backend
    Resources(crate::resources::ResourcesOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::List(options) => crate::list::run(options, app.global).await,
        SubCommands::Resources(options) => crate::resources::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
