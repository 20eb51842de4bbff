//! # Photo Locator
//!
//! Find out where a photo was taken.
//!
//! The GPS position is read from the photo's EXIF metadata with the external `exiftool`
//! program, converted to decimal degrees, and reverse-geocoded with the public Nominatim
//! service into a readable address together with a map link.
//!
//! ## Key Features
//!
//! - **Validation**: Only files that decode as images and carry a JPEG extension are processed.
//! - **GPS Parsing**: Degree/minute/second values such as `40 deg 26' 46.00" N` become signed decimal degrees.
//! - **Reverse Geocoding**: Country, region, city and street for the position, looked up politely
//!   (identifying user agent, bounded timeout, at most one request per second).
//! - **Presentation**: A short summary and a Google Maps link, shown in a dialog or on the console.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use photo_locator::PhotoLocator;
//!
//! #[tokio::main]
//! async fn main() -> color_eyre::Result<()> {
//!     let locator = PhotoLocator::builder().build()?;
//!     let result = locator.locate(Path::new("assets/pittsburgh.jpg")).await?;
//!
//!     println!("{}", result.summary);
//!     println!("Coordinates: {}", result.coordinates);
//!
//!     Ok(())
//! }
//! ```

pub mod app;
mod error;
pub mod features;
pub mod logging;
pub mod photo_locator;
pub mod structs;

pub use error::PhotoLocatorError;
pub use features::coordinates::Coordinates;
pub use features::geocoding::Address;
pub use photo_locator::PhotoLocator;
pub use structs::LocateResult;
