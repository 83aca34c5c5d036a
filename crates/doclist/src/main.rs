use crate::prelude::*;
use clap::Parser;

mod browse;
mod catalog;
mod error;
mod list;
mod prelude;
mod render;

/// Catalog used when neither `--api-url` nor `DOCLIST_API_URL` is given
pub const DEFAULT_API_URL: &str = "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Filter and sort a doctor catalog, with the view kept in a shareable query string"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Catalog URL returning a JSON array of doctors
    #[clap(long, env = "DOCLIST_API_URL", global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Catalog request timeout in seconds
    #[clap(long, env = "DOCLIST_TIMEOUT", global = true, default_value = "30")]
    timeout: u64,

    /// Whether to display additional information.
    #[clap(long, env = "DOCLIST_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Print the doctors matching a query string and filter flags
    List(crate::list::ListOptions),

    /// Interactive session: filter, sort and navigate like the web page
    Browse(crate::browse::BrowseOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::List(options) => crate::list::run(options, app.global).await,
        SubCommands::Browse(options) => crate::browse::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
