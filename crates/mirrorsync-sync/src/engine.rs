//! One-way synchronization engine
//!
//! The [`SyncEngine`] makes a destination directory mirror the flat file
//! set of a source directory, one pass at a time.
//!
//! ## Pass Flow
//!
//! 1. **Snapshot**: List source, then destination
//! 2. **Plan**: Partition names into add / remove / update candidates
//! 3. **Apply**: Adds, then removes, then updates. Each executed action
//!    is reported as soon as it succeeds.
//!
//! ## Failure Isolation
//!
//! A failed listing aborts the pass. A failed file operation only skips
//! that file: the error is collected in [`PassReport::errors`] and the
//! remaining plan still runs. A failed audit write is collected too, but
//! the action it describes stays in [`PassReport::actions`].
//!
//! The engine keeps no state between passes. Anything a pass misses is
//! picked up by the next one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use mirrorsync_audit::SyncReporter;
use mirrorsync_core::{
    config::Config,
    domain::{
        ActionKind, ActionPlan, DirectorySnapshot, FileName, FsError, PassId, SyncAction,
        UpdateOutcome,
    },
    ports::local_filesystem::ILocalFileSystem,
};
use tracing::{debug, info, instrument, warn};

use crate::filesystem::LocalFileSystemAdapter;
use crate::SyncError;

// ============================================================================
// PassReport
// ============================================================================

/// Summary of a completed synchronization pass
#[derive(Debug)]
pub struct PassReport {
    /// Identifier attached to every diagnostic event of the pass
    pub pass_id: PassId,
    /// Actions that executed, in execution order
    pub actions: Vec<SyncAction>,
    /// Per-file errors (non-fatal)
    pub errors: Vec<SyncError>,
    /// Update candidates whose contents already matched
    pub unchanged: usize,
    /// Wall-clock duration of the pass in milliseconds
    pub duration_ms: u64,
}

impl PassReport {
    fn new(pass_id: PassId) -> Self {
        Self {
            pass_id,
            actions: Vec::new(),
            errors: Vec::new(),
            unchanged: 0,
            duration_ms: 0,
        }
    }

    /// Number of executed actions of the given kind
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind == kind).count()
    }

    /// True when the pass executed nothing and hit no errors
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty() && self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Actions a pass would execute, computed without executing them
#[derive(Debug, Default)]
pub struct PassPreview {
    /// Actions in execution order
    pub actions: Vec<SyncAction>,
    /// Update candidates that could not be compared
    pub errors: Vec<SyncError>,
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Single-pass synchronization of one directory pair
pub struct SyncEngine {
    source: PathBuf,
    destination: PathBuf,
    filesystem: Arc<dyn ILocalFileSystem>,
    reporter: SyncReporter,
}

impl SyncEngine {
    /// Creates an engine for `source` → `destination`
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        filesystem: Arc<dyn ILocalFileSystem>,
        reporter: SyncReporter,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            filesystem,
            reporter,
        }
    }

    /// Creates an engine over the real filesystem using the paths,
    /// comparison mode and log sinks from `config`
    ///
    /// The config is not validated here; call [`Config::validate`] first.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.sync.source.clone(),
            config.sync.destination.clone(),
            Arc::new(LocalFileSystemAdapter::with_comparison(
                config.sync.comparison,
            )),
            SyncReporter::from_config(config),
        )
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    // ========================================================================
    // run_one_pass()
    // ========================================================================

    /// Runs one synchronization pass
    ///
    /// # Errors
    /// Returns [`SyncError::Snapshot`] if either directory cannot be
    /// listed. Per-file failures are returned inside the [`PassReport`].
    pub async fn run_one_pass(&self) -> Result<PassReport, SyncError> {
        self.run_pass(PassId::new()).await
    }

    #[instrument(
        skip(self, pass_id),
        fields(%pass_id, source = %self.source.display(), destination = %self.destination.display())
    )]
    async fn run_pass(&self, pass_id: PassId) -> Result<PassReport, SyncError> {
        let start = Instant::now();
        let mut report = PassReport::new(pass_id);

        let plan = self.plan().await?;
        info!(
            to_add = plan.to_add().len(),
            to_remove = plan.to_remove().len(),
            to_update = plan.to_update().len(),
            "Pass planned"
        );

        // Step 1: files only in source
        for name in plan.to_add() {
            match self
                .filesystem
                .add_file(name, &self.source, &self.destination)
                .await
            {
                Ok(()) => self.record(&mut report, SyncAction::add(name.clone())).await,
                Err(source) => push_failure(&mut report, ActionKind::Add, name, source),
            }
        }

        // Step 2: files only in destination
        for name in plan.to_remove() {
            match self.filesystem.remove_file(name, &self.destination).await {
                Ok(()) => {
                    self.record(&mut report, SyncAction::remove(name.clone()))
                        .await
                }
                Err(source) => push_failure(&mut report, ActionKind::Remove, name, source),
            }
        }

        // Step 3: files in both, rewritten only when contents differ
        for name in plan.to_update() {
            match self
                .filesystem
                .update_file(name, &self.source, &self.destination)
                .await
            {
                Ok(UpdateOutcome::Replaced) => {
                    self.record(&mut report, SyncAction::update(name.clone()))
                        .await
                }
                Ok(UpdateOutcome::Unchanged) => report.unchanged += 1,
                Err(source) => push_failure(&mut report, ActionKind::Update, name, source),
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pass_id = %report.pass_id,
            added = report.count(ActionKind::Add),
            removed = report.count(ActionKind::Remove),
            updated = report.count(ActionKind::Update),
            unchanged = report.unchanged,
            errors = report.errors.len(),
            duration_ms = report.duration_ms,
            "Pass completed"
        );

        Ok(report)
    }

    // ========================================================================
    // preview_pass()
    // ========================================================================

    /// Computes the actions a pass would execute, without executing them
    ///
    /// Update candidates are compared, so only files that would actually
    /// be rewritten are returned. A candidate that cannot be compared is
    /// collected in [`PassPreview::errors`] and the rest are still
    /// previewed. Nothing is modified or reported.
    ///
    /// # Errors
    /// Returns [`SyncError::Snapshot`] if either directory cannot be listed.
    #[instrument(skip(self))]
    pub async fn preview_pass(&self) -> Result<PassPreview, SyncError> {
        let plan = self.plan().await?;
        let mut preview = PassPreview {
            actions: Vec::with_capacity(plan.len()),
            errors: Vec::new(),
        };

        preview
            .actions
            .extend(plan.to_add().iter().cloned().map(SyncAction::add));
        preview
            .actions
            .extend(plan.to_remove().iter().cloned().map(SyncAction::remove));

        for name in plan.to_update() {
            match self
                .filesystem
                .files_identical(&self.source.join(name), &self.destination.join(name))
                .await
            {
                Ok(true) => {}
                Ok(false) => preview.actions.push(SyncAction::update(name.clone())),
                Err(source) => {
                    let err = SyncError::FileOperation {
                        kind: ActionKind::Update,
                        file_name: name.clone(),
                        source,
                    };
                    warn!(error = %err, "Cannot compare update candidate");
                    preview.errors.push(err);
                }
            }
        }

        debug!(
            actions = preview.actions.len(),
            errors = preview.errors.len(),
            "Preview computed"
        );
        Ok(preview)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn plan(&self) -> Result<ActionPlan, SyncError> {
        let source = self.snapshot(&self.source).await?;
        let destination = self.snapshot(&self.destination).await?;
        Ok(ActionPlan::new(&source, &destination))
    }

    async fn snapshot(&self, dir: &Path) -> Result<DirectorySnapshot, SyncError> {
        self.filesystem
            .snapshot(dir)
            .await
            .map_err(|source| SyncError::Snapshot {
                dir: dir.to_path_buf(),
                source,
            })
    }

    /// Reports an executed action and records it, whether or not the
    /// audit line made it to every sink
    async fn record(&self, report: &mut PassReport, action: SyncAction) {
        if let Err(source) = self.reporter.report(&action).await {
            warn!(
                file = %action.file_name,
                error = %source,
                "Action executed but not fully reported"
            );
            report.errors.push(SyncError::Report {
                file_name: action.file_name.clone(),
                source,
            });
        }
        report.actions.push(action);
    }
}

fn push_failure(report: &mut PassReport, kind: ActionKind, name: &FileName, source: FsError) {
    let err = SyncError::FileOperation {
        kind,
        file_name: name.clone(),
        source,
    };
    warn!(error = %err, "File operation failed");
    report.errors.push(err);
}

// ============================================================================
// Unit tests
// ============================================================================

#[cfg(test)]
mod tests {
    use mirrorsync_audit::MemoryLogSink;
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        _tmp: TempDir,
        src: PathBuf,
        dst: PathBuf,
        log: Arc<MemoryLogSink>,
        engine: SyncEngine,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();

        let log = Arc::new(MemoryLogSink::new("memory"));
        let engine = SyncEngine::new(
            &src,
            &dst,
            Arc::new(LocalFileSystemAdapter::new()),
            SyncReporter::file_only(log.clone()),
        );
        Fixture {
            _tmp: tmp,
            src,
            dst,
            log,
            engine,
        }
    }

    #[test]
    fn test_pass_report_counters() {
        let mut report = PassReport::new(PassId::new());
        assert!(report.is_clean());
        assert!(!report.has_errors());

        report.actions.push(SyncAction::add(FileName::new("a").unwrap()));
        report.actions.push(SyncAction::add(FileName::new("b").unwrap()));
        report
            .actions
            .push(SyncAction::remove(FileName::new("c").unwrap()));

        assert_eq!(report.count(ActionKind::Add), 2);
        assert_eq!(report.count(ActionKind::Remove), 1);
        assert_eq!(report.count(ActionKind::Update), 0);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_pass_applies_add_remove_update_in_order() {
        let f = fixture();
        std::fs::write(f.src.join("b-new.txt"), "new").unwrap();
        std::fs::write(f.src.join("a-changed.txt"), "v2").unwrap();
        std::fs::write(f.dst.join("a-changed.txt"), "v1").unwrap();
        std::fs::write(f.dst.join("c-stale.txt"), "old").unwrap();

        let report = f.engine.run_one_pass().await.unwrap();

        let kinds: Vec<ActionKind> = report.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Add, ActionKind::Remove, ActionKind::Update]
        );
        assert!(!report.has_errors());

        let lines = f.log.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("File b-new.txt has been added to source folder"));
        assert!(lines[1].contains("File c-stale.txt has been removed from source folder"));
        assert!(lines[2].contains("File a-changed.txt has been updated in source folder"));
    }

    #[tokio::test]
    async fn test_identical_candidates_count_as_unchanged() {
        let f = fixture();
        std::fs::write(f.src.join("w.txt"), "same").unwrap();
        std::fs::write(f.dst.join("w.txt"), "same").unwrap();

        let report = f.engine.run_one_pass().await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.unchanged, 1);
        assert!(f.log.lines().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_aborts_pass() {
        let f = fixture();
        std::fs::remove_dir(&f.src).unwrap();

        let err = f.engine.run_one_pass().await.unwrap_err();
        assert!(matches!(err, SyncError::Snapshot { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_preview_does_not_touch_anything() {
        let f = fixture();
        std::fs::write(f.src.join("x.txt"), "hi").unwrap();
        std::fs::write(f.src.join("z.txt"), "v2").unwrap();
        std::fs::write(f.dst.join("z.txt"), "v1").unwrap();
        std::fs::write(f.src.join("w.txt"), "same").unwrap();
        std::fs::write(f.dst.join("w.txt"), "same").unwrap();
        std::fs::write(f.dst.join("y.txt"), "old").unwrap();

        let preview = f.engine.preview_pass().await.unwrap();

        assert!(preview.errors.is_empty());
        assert_eq!(
            preview.actions,
            vec![
                SyncAction::add(FileName::new("x.txt").unwrap()),
                SyncAction::remove(FileName::new("y.txt").unwrap()),
                SyncAction::update(FileName::new("z.txt").unwrap()),
            ]
        );
        assert!(!f.dst.join("x.txt").exists());
        assert!(f.dst.join("y.txt").exists());
        assert_eq!(std::fs::read_to_string(f.dst.join("z.txt")).unwrap(), "v1");
        assert!(f.log.lines().is_empty());
    }

    /// Real filesystem, except that comparing `unreadable` always fails
    struct UnreadableCandidate {
        inner: LocalFileSystemAdapter,
        unreadable: FileName,
    }

    #[async_trait::async_trait]
    impl ILocalFileSystem for UnreadableCandidate {
        async fn snapshot(&self, dir: &Path) -> Result<DirectorySnapshot, FsError> {
            self.inner.snapshot(dir).await
        }

        async fn files_identical(
            &self,
            source: &Path,
            destination: &Path,
        ) -> Result<bool, FsError> {
            if source.ends_with(self.unreadable.as_str()) {
                return Err(FsError::PermissionDenied(source.to_path_buf()));
            }
            self.inner.files_identical(source, destination).await
        }

        async fn add_file(&self, name: &FileName, src: &Path, dst: &Path) -> Result<(), FsError> {
            self.inner.add_file(name, src, dst).await
        }

        async fn remove_file(&self, name: &FileName, dst: &Path) -> Result<(), FsError> {
            self.inner.remove_file(name, dst).await
        }

        async fn update_file(
            &self,
            name: &FileName,
            src: &Path,
            dst: &Path,
        ) -> Result<UpdateOutcome, FsError> {
            self.inner.update_file(name, src, dst).await
        }
    }

    #[tokio::test]
    async fn test_preview_collects_uncomparable_candidate() {
        let f = fixture();
        std::fs::write(f.src.join("a.txt"), "new").unwrap();
        std::fs::write(f.dst.join("stale.txt"), "old").unwrap();
        std::fs::write(f.src.join("locked.txt"), "v2").unwrap();
        std::fs::write(f.dst.join("locked.txt"), "v1").unwrap();
        std::fs::write(f.src.join("m.txt"), "v2").unwrap();
        std::fs::write(f.dst.join("m.txt"), "v1").unwrap();

        let engine = SyncEngine::new(
            &f.src,
            &f.dst,
            Arc::new(UnreadableCandidate {
                inner: LocalFileSystemAdapter::new(),
                unreadable: FileName::new("locked.txt").unwrap(),
            }),
            SyncReporter::file_only(f.log.clone()),
        );

        let preview = engine.preview_pass().await.unwrap();

        assert_eq!(
            preview.actions,
            vec![
                SyncAction::add(FileName::new("a.txt").unwrap()),
                SyncAction::remove(FileName::new("stale.txt").unwrap()),
                SyncAction::update(FileName::new("m.txt").unwrap()),
            ]
        );
        assert_eq!(preview.errors.len(), 1);
        assert_eq!(
            preview.errors[0].file_name().map(FileName::as_str),
            Some("locked.txt")
        );
        assert!(preview.errors[0].is_permission_denied());
        assert!(f.log.lines().is_empty());
    }

    #[test]
    fn test_from_config_uses_configured_paths() {
        let mut config = Config::default();
        config.sync.source = PathBuf::from("/data/in");
        config.sync.destination = PathBuf::from("/data/out");

        let engine = SyncEngine::from_config(&config);
        assert_eq!(engine.source(), Path::new("/data/in"));
        assert_eq!(engine.destination(), Path::new("/data/out"));
    }
}
