//! Concurrent template loader
//!
//! ```text
//! dir ──discover──> [A.lrp, B.lrp, C.lrp]
//!                     │      │      │        one task per file
//!                   read   read   read       (no ordering)
//!                   parse  parse  parse      (fully parallel)
//!                     └──────┼──────┘
//!                            v
//!                   TemplateStore::insert    (one lock per file)
//! ```
//!
//! [`TemplateLoader::load`] returns as soon as the tasks are spawned. A failed
//! file never aborts its siblings.

use crate::config::LoaderConfig;
use crate::error::IngestError;
use crate::parser::TemplateParser;
use crate::store::{StoreError, TemplateStore};
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Discovered template file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateFile {
    /// Full file path
    pub path: PathBuf,
    /// File name without extension
    pub template_name: String,
}

/// Spawned ingestion of one file
#[derive(Debug)]
pub struct PendingTemplate {
    /// File being ingested
    pub file: TemplateFile,
    /// Task handle
    pub handle: JoinHandle<Result<(), IngestError>>,
}

/// Handles of all ingestion tasks started by one [`TemplateLoader::load`]
///
/// Dropping the handles detaches the tasks; they still run to completion.
#[derive(Debug)]
pub struct IngestionHandles {
    pending: Vec<PendingTemplate>,
}

impl IngestionHandles {
    /// Number of spawned tasks
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if no file was found
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Files being ingested
    pub fn files(&self) -> impl Iterator<Item = &TemplateFile> {
        self.pending.iter().map(|p| &p.file)
    }

    /// Raw task handles
    #[must_use]
    pub fn into_inner(self) -> Vec<PendingTemplate> {
        self.pending
    }

    /// Wait for every task and collect the outcome
    pub async fn join_all(self) -> IngestionReport {
        let outcomes = futures::future::join_all(
            self.pending
                .into_iter()
                .map(|p| async move { (p.file, p.handle.await) }),
        )
        .await;

        let mut report = IngestionReport::default();
        for (file, outcome) in outcomes {
            match outcome {
                Ok(Ok(())) => report.loaded.push(file.template_name),
                Ok(Err(err)) => report.failures.push(err),
                Err(join_err) => report.failures.push(IngestError::TaskFailed {
                    path: file.path,
                    message: join_err.to_string(),
                }),
            }
        }

        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "template ingestion finished"
        );
        report
    }
}

/// Outcome of a full ingestion run
#[derive(Debug, Default)]
pub struct IngestionReport {
    /// Template names inserted into the store
    pub loaded: Vec<String>,
    /// Per-file failures
    pub failures: Vec<IngestError>,
}

impl IngestionReport {
    /// Check if every file was ingested
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure for a given file, if any
    #[must_use]
    pub fn failure_for(&self, path: &Path) -> Option<&IngestError> {
        self.failures.iter().find(|err| err.path() == path)
    }

    /// Name collisions
    pub fn duplicates(&self) -> impl Iterator<Item = &IngestError> {
        self.failures.iter().filter(|err| err.is_duplicate())
    }
}

/// Template directory loader
#[derive(Clone)]
pub struct TemplateLoader {
    parser: Arc<dyn TemplateParser>,
    config: LoaderConfig,
}

impl TemplateLoader {
    /// Create loader with default configuration
    #[must_use]
    pub fn new(parser: impl TemplateParser) -> Self {
        Self {
            parser: Arc::new(parser),
            config: LoaderConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loader configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// List template files in `dir` (not recursive)
    ///
    /// Files are returned sorted by path. Entries that cannot be read are
    /// logged and skipped.
    ///
    /// # Errors
    /// - `IngestError::Discovery` if the directory cannot be listed
    pub fn discover(&self, dir: impl AsRef<Path>) -> Result<Vec<TemplateFile>, IngestError> {
        let dir = dir.as_ref();
        let entries =
            std::fs::read_dir(dir).map_err(|e| IngestError::discovery_error(dir, e))?;

        let files = self.select_templates(dir, entries.map(|entry| entry.map(|e| e.path())));
        tracing::debug!(dir = %dir.display(), count = files.len(), "discovered templates");
        Ok(files)
    }

    fn select_templates(
        &self,
        dir: &Path,
        entries: impl IntoIterator<Item = io::Result<PathBuf>>,
    ) -> Vec<TemplateFile> {
        let extension = self.config.bare_extension();

        let mut files = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };

            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !matches || !path.is_file() {
                continue;
            }

            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => files.push(TemplateFile {
                    template_name: stem.to_string(),
                    path,
                }),
                None => tracing::warn!(path = %path.display(), "skipping template with non utf-8 name"),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Start ingesting every template in `dir` into `store`
    ///
    /// Spawns one task per file on the current Tokio runtime and returns
    /// without waiting for them.
    ///
    /// # Errors
    /// - `IngestError::NoRuntime` if called outside a Tokio runtime
    /// - `IngestError::Discovery` if the directory cannot be listed
    pub fn load(
        &self,
        dir: impl AsRef<Path>,
        store: Arc<TemplateStore>,
    ) -> Result<IngestionHandles, IngestError> {
        let runtime = Handle::try_current().map_err(|source| IngestError::NoRuntime {
            dir: dir.as_ref().to_path_buf(),
            source,
        })?;
        let files = self.discover(dir.as_ref())?;
        tracing::info!(
            dir = %dir.as_ref().display(),
            count = files.len(),
            "loading templates"
        );

        let pending = files
            .into_iter()
            .map(|file| {
                let parser = Arc::clone(&self.parser);
                let store = Arc::clone(&store);
                let max_file_size = self.config.max_file_size;
                let task_file = file.clone();

                let handle = runtime.spawn(async move {
                    ingest(parser.as_ref(), &task_file, &store, max_file_size).await
                });
                PendingTemplate { file, handle }
            })
            .collect();

        Ok(IngestionHandles { pending })
    }

    /// Ingest a single template file into `store`
    ///
    /// # Errors
    /// - `IngestError::Io` / `IngestError::TooLarge` on read problems
    /// - `IngestError::Malformed` if the parser rejects the content
    /// - `IngestError::DuplicateTemplate` if the name is already stored
    pub async fn read_template(
        &self,
        file: &TemplateFile,
        store: &TemplateStore,
    ) -> Result<(), IngestError> {
        ingest(self.parser.as_ref(), file, store, self.config.max_file_size).await
    }
}

impl fmt::Debug for TemplateLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn ingest(
    parser: &dyn TemplateParser,
    file: &TemplateFile,
    store: &TemplateStore,
    max_file_size: u64,
) -> Result<(), IngestError> {
    let result = read_and_insert(parser, file, store, max_file_size).await;
    if let Err(err) = &result {
        tracing::warn!(template = %file.template_name, error = %err, "template rejected");
    }
    result
}

async fn read_and_insert(
    parser: &dyn TemplateParser,
    file: &TemplateFile,
    store: &TemplateStore,
    max_file_size: u64,
) -> Result<(), IngestError> {
    let path = &file.path;

    let size = tokio::fs::metadata(path)
        .await
        .map_err(|e| IngestError::io_error(path, e))?
        .len();
    if size > max_file_size {
        return Err(IngestError::TooLarge {
            path: path.clone(),
            size,
            max: max_file_size,
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IngestError::io_error(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    if matches!(text, Cow::Owned(_)) {
        tracing::warn!(template = %file.template_name, "invalid utf-8 replaced in template");
    }

    // Parsing stays outside the store lock
    let record = parser
        .parse(text.trim_start_matches('\u{feff}'))
        .map_err(|source| IngestError::Malformed {
            path: path.clone(),
            source,
        })?;
    let version = record.version.clone();

    match store.insert(file.template_name.as_str(), record) {
        Ok(set_version) => {
            if set_version {
                tracing::info!(template = %file.template_name, %version, "canonical template version set");
            }
            tracing::debug!(template = %file.template_name, "template loaded");
            Ok(())
        }
        Err(StoreError::Duplicate { name }) => Err(IngestError::DuplicateTemplate {
            name,
            path: path.clone(),
        }),
    }
}
