use clap::Parser;
use photo_locator::PhotoLocator;
use photo_locator::app::App;
use photo_locator::features::presentation::Presenter;
use photo_locator::logging;
use std::time::Duration;
use tracing::info;

mod cli;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = cli::Cli::parse();
    logging::init(cli.verbose)?;

    let locator = PhotoLocator::builder()
        .maybe_exiftool_path(cli.exiftool)
        .endpoint(cli.endpoint)
        .user_agent(cli.user_agent)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .zoom(cli.zoom)
        .accept_png(cli.accept_png)
        .build()?;

    let open_browser = !cli.no_browser;
    let presenter = if cli.no_dialog || cli.json {
        Presenter::Console {
            open_browser,
            json: cli.json,
        }
    } else {
        Presenter::Dialog { open_browser }
    };

    info!("photo_locator {} ready", env!("CARGO_PKG_VERSION"));
    App::new(locator, presenter).run(cli.path).await;
    Ok(())
}
