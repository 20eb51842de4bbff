use crate::PhotoLocator;
use crate::features::presentation::Presenter;
use crate::features::validation::accepted_extensions;
use crate::photo_locator::Stage;
use rfd::AsyncFileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Application context, created once at startup and shared by every photo selection.
pub struct App {
    locator: Arc<PhotoLocator>,
    presenter: Presenter,
}

impl App {
    pub fn new(locator: PhotoLocator, presenter: Presenter) -> Self {
        Self {
            locator: Arc::new(locator),
            presenter,
        }
    }

    /// Locates `path` once, or keeps asking for photos until the file dialog is cancelled.
    pub async fn run(&self, path: Option<PathBuf>) {
        if let Some(path) = path {
            self.handle(path).await;
            return;
        }
        while let Some(path) = self.choose_photo().await {
            self.handle(path).await;
        }
        info!("no photo selected, exiting");
    }

    async fn choose_photo(&self) -> Option<PathBuf> {
        AsyncFileDialog::new()
            .set_title("Choose a photo")
            .add_filter("Photos", accepted_extensions(self.locator.accept_png()))
            .pick_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    /// Runs one photo through the pipeline on a worker task and reports the outcome.
    ///
    /// Returns the stage the run ended in: `Displayed` on success, `Idle` after any failure.
    pub async fn handle(&self, path: PathBuf) -> Stage {
        info!(file = %path.display(), "locating photo");
        let locator = Arc::clone(&self.locator);
        let job = tokio::spawn(async move { locator.locate(&path).await });

        let stage = match job.await {
            Ok(Ok(result)) => {
                self.presenter.show_result(&result).await;
                Stage::Displayed
            }
            Ok(Err(error)) => {
                self.presenter.show_error(&error).await;
                Stage::Idle
            }
            Err(join_error) => {
                let detail = if join_error.is_panic() {
                    "the lookup task panicked".to_string()
                } else {
                    join_error.to_string()
                };
                self.presenter.show_unexpected(&detail).await;
                Stage::Idle
            }
        };
        debug!(%stage, "run finished");
        stage
    }
}
