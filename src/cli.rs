use clap::Parser;
use photo_locator::features::geocoding::{
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_ZOOM,
};
use std::path::PathBuf;

/// Show where a photo was taken, using its EXIF GPS tags.
///
/// Without a PATH a file dialog is shown repeatedly until it is cancelled.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Photo to locate.
    pub path: Option<PathBuf>,

    /// exiftool executable to run instead of the one on the PATH.
    #[clap(long, env = "PHOTO_LOCATOR_EXIFTOOL")]
    pub exiftool: Option<PathBuf>,

    /// Reverse-geocoding endpoint.
    #[clap(long, env = "PHOTO_LOCATOR_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// User agent sent to the geocoding service.
    #[clap(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Geocoding request timeout in seconds, at least one.
    #[clap(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Address detail level.
    #[clap(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Also accept PNG files.
    #[clap(long)]
    pub accept_png: bool,

    /// Do not open the map link in the browser.
    #[clap(long)]
    pub no_browser: bool,

    /// Print to the console instead of showing dialogs.
    #[clap(long)]
    pub no_dialog: bool,

    /// Print the result as JSON, implies `--no-dialog`.
    #[clap(long)]
    pub json: bool,

    /// Log at debug level unless `RUST_LOG` is set.
    #[clap(short, long)]
    pub verbose: bool,
}
