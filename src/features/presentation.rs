use crate::PhotoLocatorError;
use crate::features::coordinates::Coordinates;
use crate::features::geocoding::Address;
use crate::structs::LocateResult;
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};
use serde_json::{Value, json};
use tracing::{error, info, warn};

pub const NO_DETAILS: &str = "No address details available";

/// Builds the multi-line address summary shown to the user.
///
/// Fields appear in a fixed order and only when present; the map link is always last.
pub fn format_summary(coordinates: &Coordinates, address: &Address) -> String {
    let mut lines = Vec::new();
    if let Some(country) = address.get("country") {
        lines.push(format!("Country: {country}"));
    }
    if let Some(state) = address.get("state") {
        lines.push(format!("Region: {state}"));
    }
    if let Some(city) = address
        .get("city")
        .or_else(|| address.get("town"))
        .or_else(|| address.get("village"))
    {
        lines.push(format!("City: {city}"));
    }
    if let Some(road) = address.get("road") {
        lines.push(format!("Street: {road}"));
    }
    if lines.is_empty() {
        lines.push(NO_DETAILS.to_string());
    }
    lines.push(format!("Map: {}", coordinates.map_link()));
    lines.join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub title: &'static str,
    pub body: String,
    pub severity: Severity,
}

/// Maps each failure kind to the message a user sees for it.
pub fn user_message(error: &PhotoLocatorError) -> UserMessage {
    use PhotoLocatorError::*;

    let (title, body) = match error {
        NotAnImage { .. } => ("Not an image", "The selected file is not an image.".to_string()),
        UnsupportedFormat { mime, .. } => (
            "Unsupported format",
            format!("Only JPEG photos are supported (got {mime})."),
        ),
        ToolNotFound { tool } => (
            "exiftool missing",
            format!(
                "The metadata tool '{}' could not be found. Install exiftool and make sure it is on the PATH.",
                tool.display()
            ),
        ),
        ExtractionFailed { reason } => (
            "Metadata error",
            format!("Reading the photo metadata failed: {reason}"),
        ),
        DecodeError(_) => (
            "Metadata error",
            "The metadata tool produced output that is not valid text.".to_string(),
        ),
        NoGpsData => ("No GPS", "No GPS data found in this photo.".to_string()),
        InvalidCoordinates {
            latitude,
            longitude,
        } => (
            "Invalid coordinates",
            format!("The photo contains invalid coordinates ({latitude}, {longitude})."),
        ),
        NetworkError(_) => (
            "Address lookup failed",
            "Could not reach the geocoding service. Check your connection and try again."
                .to_string(),
        ),
        ResponseParseError(_) => (
            "Address lookup failed",
            "The geocoding service returned an unreadable response.".to_string(),
        ),
        HttpClient(_) => ("Error", error.to_string()),
    };
    let severity = match error {
        NoGpsData => Severity::Warning,
        _ => Severity::Error,
    };
    UserMessage {
        title,
        body,
        severity,
    }
}

pub const UNEXPECTED_KIND: &str = "Unexpected";

/// JSON document printed on stdout for a failure when results are printed as JSON.
pub fn error_json(kind: &str, message: &UserMessage) -> Value {
    json!({
        "error": {
            "kind": kind,
            "title": message.title,
            "message": message.body,
        }
    })
}

/// Where results and failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presenter {
    /// Modal message dialogs.
    Dialog { open_browser: bool },
    /// Plain text on stdout/stderr, or JSON on stdout for both results and failures.
    Console { open_browser: bool, json: bool },
}

impl Presenter {
    fn open_browser(&self) -> bool {
        match *self {
            Self::Dialog { open_browser } | Self::Console { open_browser, .. } => open_browser,
        }
    }

    pub async fn show_result(&self, result: &LocateResult) {
        match *self {
            Self::Dialog { .. } => {
                show_dialog(MessageLevel::Info, "Address", &result.summary).await;
            }
            Self::Console { json: true, .. } => match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{json}"),
                Err(e) => error!("could not serialize result: {e}"),
            },
            Self::Console { json: false, .. } => println!("{}", result.summary),
        }

        if self.open_browser() {
            if let Err(e) = opener::open_browser(&result.map_link) {
                warn!(link = %result.map_link, "could not open the browser: {e}");
            }
        }
    }

    pub async fn show_error(&self, error: &PhotoLocatorError) {
        let message = user_message(error);
        match message.severity {
            Severity::Warning => warn!("{error}"),
            Severity::Error => error!("{error}"),
        }
        self.show_message(error.kind(), &message).await;
    }

    /// Reports a failure outside the error taxonomy, such as a panicked pipeline task.
    pub async fn show_unexpected(&self, detail: &str) {
        error!("unexpected failure: {detail}");
        let message = UserMessage {
            title: "Unexpected error",
            body: format!("Something went wrong: {detail}"),
            severity: Severity::Error,
        };
        self.show_message(UNEXPECTED_KIND, &message).await;
    }

    async fn show_message(&self, kind: &str, message: &UserMessage) {
        match self {
            Self::Dialog { .. } => {
                let level = match message.severity {
                    Severity::Warning => MessageLevel::Warning,
                    Severity::Error => MessageLevel::Error,
                };
                show_dialog(level, message.title, &message.body).await;
            }
            Self::Console { json: true, .. } => println!("{}", error_json(kind, message)),
            Self::Console { json: false, .. } => {
                eprintln!("{}: {}", message.title, message.body)
            }
        }
    }
}

async fn show_dialog(level: MessageLevel, title: &str, body: &str) {
    info!(title, "showing dialog");
    AsyncMessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(body)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}
