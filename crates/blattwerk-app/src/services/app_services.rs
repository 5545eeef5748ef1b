// SPDX-License-Identifier: MIT
//
// Service layer — config persistence, batch intake plumbing, and artifact
// delivery, kept off the UI thread where the work blocks.
//
// The struct is cheaply cloneable (Arc-wrapped config) so it can be passed
// into closures and async blocks without lifetime issues.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use blattwerk_core::error::Result;
use blattwerk_core::intake::{image_media_type_for, FileIntake, FileSource, IntakeReport, PickedFile};
use blattwerk_core::AppConfig;
use blattwerk_document::ExportArtifact;

use super::data_dir;

/// Shared services accessible from all components via `use_context`.
#[derive(Clone)]
pub struct AppServices {
    config: Arc<Mutex<AppConfig>>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Initialise the service layer. Call once at app startup.
    pub fn init() -> Self {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = load_config(&dir).unwrap_or_else(|| {
            info!("no stored config — using defaults");
            AppConfig::default()
        });

        Self {
            config: Arc::new(Mutex::new(config)),
            data_dir: dir,
        }
    }

    // -- Config persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().expect("config lock poisoned") = config.clone();
        persist_config(&self.data_dir, config)
    }

    // -- Intake --------------------------------------------------------------

    /// Ingest files picked through the file dialog.
    ///
    /// Stat and read happen on a blocking task. `current_total` is the
    /// collection's byte total when the batch started; the caller appends
    /// the report's accepted items to the live collection when the task
    /// settles, so removals made mid-batch are never overwritten.
    pub async fn ingest_paths(&self, current_total: u64, paths: Vec<PathBuf>) -> IntakeReport {
        tokio::task::spawn_blocking(move || {
            let batch: Vec<PickedFile> = paths
                .into_iter()
                .map(|path| {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "unknown".into());
                    // A failed stat becomes a read failure inside intake.
                    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    PickedFile {
                        name,
                        size,
                        media_type: None,
                        source: FileSource::Path(path),
                    }
                })
                .collect();

            FileIntake::new().ingest(current_total, batch)
        })
        .await
        .expect("intake task panicked")
    }

    /// Ingest files dropped onto the form. Each entry carries the bytes
    /// the webview's file engine produced, or `None` when the engine
    /// failed to read the file — those surface as read failures instead
    /// of vanishing silently.
    pub fn ingest_dropped(
        &self,
        current_total: u64,
        files: Vec<(String, Option<Vec<u8>>)>,
    ) -> IntakeReport {
        let batch: Vec<PickedFile> = files
            .into_iter()
            .map(|(name, bytes)| PickedFile {
                media_type: image_media_type_for(&name).map(str::to_owned),
                size: bytes.as_ref().map(|b| b.len() as u64).unwrap_or(0),
                source: match bytes {
                    Some(bytes) => FileSource::Memory(bytes),
                    None => FileSource::Failed("the file engine could not read the file".into()),
                },
                name,
            })
            .collect();
        FileIntake::new().ingest(current_total, batch)
    }

    // -- Delivery ------------------------------------------------------------

    /// Hand the finished artifact to the platform: a save-as dialog on
    /// desktop, the exports directory where dialogs are unavailable.
    ///
    /// Returns the written path, or `None` when the user cancelled.
    pub fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<PathBuf>> {
        #[cfg(not(any(target_os = "ios", target_os = "android")))]
        {
            let Some(path) = rfd::FileDialog::new()
                .set_file_name(&artifact.file_name)
                .add_filter("PDF", &["pdf"])
                .save_file()
            else {
                info!("save dialog cancelled");
                return Ok(None);
            };
            std::fs::write(&path, artifact.bytes.as_slice())?;
            info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact saved");
            Ok(Some(path))
        }
        #[cfg(any(target_os = "ios", target_os = "android"))]
        {
            let path = data_dir::data_subdir("exports").join(&artifact.file_name);
            std::fs::write(&path, artifact.bytes.as_slice())?;
            info!(path = %path.display(), "artifact written to exports directory");
            Ok(Some(path))
        }
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &std::path::Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(error = %err, "stored config unreadable — using defaults");
            None
        }
    }
}

fn persist_config(data_dir: &std::path::Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.dark_mode = Some(true);
        config.default_output_name = "vacation".into();

        persist_config(dir.path(), &config).unwrap();
        let loaded = load_config(dir.path()).unwrap();
        assert_eq!(loaded.dark_mode, Some(true));
        assert_eq!(loaded.default_output_name, "vacation");
    }

    #[test]
    fn missing_config_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(dir.path()).is_none());
    }

    use blattwerk_core::error::BlattwerkError;
    use blattwerk_core::ImageCollection;
    use std::io::Write;

    fn services() -> AppServices {
        AppServices {
            config: Arc::new(Mutex::new(AppConfig::default())),
            data_dir: PathBuf::from("/tmp"),
        }
    }

    #[tokio::test]
    async fn ingest_paths_reports_missing_files() {
        let report = services()
            .ingest_paths(0, vec![PathBuf::from("/nonexistent/photo.png")])
            .await;
        assert!(report.accepted.is_empty());
        assert!(report.last_error.is_some());
    }

    #[tokio::test]
    async fn removal_during_batch_read_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.png");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[9, 9, 9]).unwrap();

        let mut collection = ImageCollection::new();
        collection.push(blattwerk_core::StagedImage::new(vec![0u8; 4], 4, "image/png"));
        let doomed = collection.items()[0].id;

        let current_total = collection.total_size();
        let report = services().ingest_paths(current_total, vec![path]).await;

        // The user removed an image while the batch was being read.
        collection.remove(doomed);
        collection.extend(report.accepted);

        assert_eq!(collection.len(), 1);
        assert!(collection.iter().all(|item| item.id != doomed));
    }

    #[test]
    fn dropped_files_are_ingested_in_memory() {
        let report = services().ingest_dropped(
            0,
            vec![
                ("a.png".into(), Some(vec![1, 2, 3])),
                ("notes.txt".into(), Some(vec![4, 5])),
            ],
        );
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted_size(), 3);
    }

    #[test]
    fn unreadable_dropped_file_surfaces_read_failure() {
        let report = services().ingest_dropped(
            0,
            vec![("broken.png".into(), None), ("ok.png".into(), Some(vec![7]))],
        );
        assert_eq!(report.accepted.len(), 1);
        match report.last_error {
            Some(BlattwerkError::ReadFailure { ref name, .. }) => assert_eq!(name, "broken.png"),
            other => panic!("expected ReadFailure, got {other:?}"),
        }
    }
}
