use crate::PhotoLocatorError;
use crate::features::extraction::{DEFAULT_EXIFTOOL, ExifToolCli, MetadataReader, parse_gps_output};
use crate::features::geocoding::{
    DEFAULT_COURTESY_DELAY, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_ZOOM,
    Nominatim, ReverseGeocoder,
};
use crate::features::presentation::format_summary;
use crate::features::validation::validate_image;
use crate::structs::LocateResult;
use bon::bon;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Steps of a single locate run. Any failing guard aborts the run back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FileChosen,
    Validated,
    MetadataExtracted,
    CoordinatesParsed,
    AddressResolved,
    Displayed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Runs the full pipeline for one photo against the given collaborators.
///
/// The image is validated on the blocking pool before the metadata reader is invoked, and the coordinates are
/// range checked before the geocoder is called. Nothing is retried.
#[instrument(skip(reader, geocoder), fields(file = %path.display()))]
pub async fn locate_with<M, G>(
    reader: &M,
    geocoder: &G,
    path: &Path,
    accept_png: bool,
) -> Result<LocateResult, PhotoLocatorError>
where
    M: MetadataReader + Sync,
    G: ReverseGeocoder + Sync,
{
    debug!(stage = %Stage::FileChosen);

    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || validate_image(&owned, accept_png))
        .await
        .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;
    debug!(stage = %Stage::Validated);

    let report = reader.read(path).await?;
    debug!(stage = %Stage::MetadataExtracted, bytes = report.len());

    let coordinates = parse_gps_output(&report)?;
    debug!(stage = %Stage::CoordinatesParsed, %coordinates);

    let address = geocoder.reverse(coordinates).await?;
    debug!(stage = %Stage::AddressResolved, fields = address.len());

    Ok(LocateResult {
        path: path.to_path_buf(),
        summary: format_summary(&coordinates, &address),
        map_link: coordinates.map_link(),
        coordinates,
        address,
    })
}

/// The main entry point: finds where a photo was taken.
///
/// Holds the configured metadata tool and geocoding client. Create it once and reuse it for
/// every photo the user picks.
///
/// ```rust,no_run
/// # use photo_locator::{PhotoLocator, PhotoLocatorError};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), PhotoLocatorError> {
/// let locator = PhotoLocator::builder().build()?;
/// let result = locator.locate(Path::new("assets/pittsburgh.jpg")).await?;
/// println!("{}", result.summary);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PhotoLocator {
    exiftool: ExifToolCli,
    geocoder: Nominatim,
    accept_png: bool,
}

#[bon]
impl PhotoLocator {
    /// Constructs a `PhotoLocator` via a builder pattern.
    ///
    /// # Builder Arguments
    ///
    /// * `exiftool_path: Option<PathBuf>` - A specific `exiftool` executable. If `None`, `exiftool` is looked up in the PATH.
    /// * `endpoint: String` - (Default: the public Nominatim `/reverse` URL) Reverse-geocoding endpoint.
    /// * `user_agent: String` - Client identification sent with every geocoding request.
    /// * `timeout: Duration` - (Default: 5 s) Bound on the geocoding request.
    /// * `zoom: u8` - (Default: `18`) Detail level of the returned address.
    /// * `courtesy_delay: Duration` - (Default: 1 s) Pause after each geocoding request.
    /// * `accept_png: bool` - (Default: `false`) Also accept `.png` files.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoLocatorError::HttpClient`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        exiftool_path: Option<PathBuf>,
        #[builder(into, default = DEFAULT_ENDPOINT.to_string())] endpoint: String,
        #[builder(into, default = DEFAULT_USER_AGENT.to_string())] user_agent: String,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
        #[builder(default = DEFAULT_ZOOM)] zoom: u8,
        #[builder(default = DEFAULT_COURTESY_DELAY)] courtesy_delay: Duration,
        #[builder(default)] accept_png: bool,
    ) -> Result<Self, PhotoLocatorError> {
        let exiftool = ExifToolCli::new(exiftool_path.unwrap_or_else(|| DEFAULT_EXIFTOOL.into()));
        let geocoder = Nominatim::builder()
            .endpoint(endpoint)
            .user_agent(user_agent)
            .timeout(timeout)
            .zoom(zoom)
            .courtesy_delay(courtesy_delay)
            .build()?;
        Ok(Self {
            exiftool,
            geocoder,
            accept_png,
        })
    }

    pub fn accept_png(&self) -> bool {
        self.accept_png
    }

    /// Validates the photo, reads its GPS position and resolves it to an address.
    ///
    /// # Errors
    ///
    /// Any [`PhotoLocatorError`] except `HttpClient`; the first failing step ends the run.
    pub async fn locate(&self, path: &Path) -> Result<LocateResult, PhotoLocatorError> {
        locate_with(&self.exiftool, &self.geocoder, path, self.accept_png).await
    }
}
