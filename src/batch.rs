//! # Batch rendering
//!
//! This module renders every stored document of a folder tree into an HTML
//! file. Jobs are spawned onto the runtime with a bounded number in flight;
//! a job that fails is logged and counted but does not stop the others.

use crate::config::{Folder, Location};
use crate::render::Renderer;
use crate::util::Counter;
use derive_new::new;
use displaydoc::Display;
use futures_util::stream::{self, StreamExt};
use slug::slugify;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, info_span, warn};
use tracing_futures::Instrument;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
/// job#{0}
pub struct JobID(u64);

impl From<JobID> for u64 {
    fn from(j_id: JobID) -> u64 {
        j_id.0
    }
}

impl From<u64> for JobID {
    fn from(id: u64) -> JobID {
        JobID(id)
    }
}

/// Error when rendering a batch
#[derive(Debug, Error, Display)]
pub enum BatchError {
    /// Could not list {0:?}: {1}
    ListDir(PathBuf, #[source] io::Error),
    /// Could not read {0:?}: {1}
    Read(PathBuf, #[source] io::Error),
    /// Could not write {0:?}: {1}
    Write(PathBuf, #[source] io::Error),
}

/// The file extensions of stored documents
const DOCUMENT_EXTENSIONS: &[&str] = &["json", "txt"];

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

/// The slug for documents whose name has no usable characters
const FALLBACK_SLUG: &str = "untitled";

fn slug_of(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    match slugify(stem) {
        slug if slug.is_empty() => String::from(FALLBACK_SLUG),
        slug => slug,
    }
}

/// The HTML file for a document in a folder
pub fn target_path(output: &Path, source: &Path) -> PathBuf {
    output.join(format!("{}.html", slug_of(source)))
}

/// Pick a target no other document has taken yet.
///
/// The first document keeps the plain slug, later ones get the source
/// extension appended, then a counter.
fn claim_target(taken: &mut HashSet<PathBuf>, output: &Path, source: &Path) -> PathBuf {
    let target = target_path(output, source);
    if taken.insert(target.clone()) {
        return target;
    }
    let ext = source
        .extension()
        .map(|ext| slugify(ext.to_string_lossy()))
        .unwrap_or_default();
    let base = format!("{}-{}", slug_of(source), ext);
    let mut candidate = output.join(format!("{}.html", base));
    let mut n = 2;
    while !taken.insert(candidate.clone()) {
        candidate = output.join(format!("{}-{}.html", base, n));
        n += 1;
    }
    warn!("{:?} would overwrite {:?}, writing {:?}", source, target, candidate);
    candidate
}

/// Find the stored document for a file name in a directory
pub async fn find_document(dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = dir.join(name);
    if is_document(&direct) && fs::metadata(&direct).await.is_ok() {
        return Some(direct);
    }
    for ext in DOCUMENT_EXTENSIONS {
        let candidate = dir.join(format!("{}.{}", name, ext));
        if fs::metadata(&candidate).await.is_ok() {
            return Some(candidate);
        }
    }
    None
}

/// A single document to render
#[derive(Debug, Clone, new)]
pub struct Job {
    pub id: JobID,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Job {
    async fn run(self, renderer: Arc<Renderer>) -> Result<PathBuf, BatchError> {
        let text = fs::read_to_string(&self.source)
            .await
            .map_err(|e| BatchError::Read(self.source.clone(), e))?;
        let rich = renderer.render(text);
        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BatchError::Write(parent.to_owned(), e))?;
        }
        fs::write(&self.target, rich.html)
            .await
            .map_err(|e| BatchError::Write(self.target.clone(), e))?;
        Ok(self.target)
    }
}

/// The outcome of a batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub rendered: usize,
    pub failed: usize,
}

/// Renders many documents at once
#[derive(Debug, new)]
pub struct Batch {
    renderer: Arc<Renderer>,
    concurrency: usize,
}

impl Batch {
    /// List the documents of a folder tree
    pub async fn collect_jobs(&self, folder: &Folder, root: Location) -> Result<Vec<Job>, BatchError> {
        let mut found = Vec::new();
        for loc in folder.locations(root) {
            let mut entries = match fs::read_dir(&loc.source).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("Skipping missing folder {:?}", loc.source);
                    continue;
                }
                Err(e) => return Err(BatchError::ListDir(loc.source, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| BatchError::ListDir(loc.source.clone(), e))?
            {
                let path = entry.path();
                let is_file = entry.file_type().await.map_or(false, |ft| ft.is_file());
                if is_file && is_document(&path) {
                    found.push((path, loc.output.clone()));
                }
            }
        }
        found.sort();

        let mut next_id = Counter::<JobID>::default();
        let mut taken = HashSet::new();
        let jobs = found
            .into_iter()
            .map(|(source, output)| {
                let target = claim_target(&mut taken, &output, &source);
                Job::new(next_id.next(), source, target)
            })
            .collect();
        Ok(jobs)
    }

    /// Render all jobs
    pub async fn run(&self, jobs: Vec<Job>) -> BatchReport {
        let total = jobs.len();
        let results: Vec<_> = stream::iter(jobs)
            .map(|job| {
                let span = info_span!("job", id = %job.id, source = ?job.source);
                tokio::spawn(job.run(self.renderer.clone()).instrument(span))
            })
            .buffer_unordered(self.concurrency.max(1))
            .collect()
            .await;

        let mut report = BatchReport::default();
        for result in results {
            match result {
                Ok(Ok(target)) => {
                    debug!("Wrote {:?}", target);
                    report.rendered += 1;
                }
                Ok(Err(err)) => {
                    error!("{}", err);
                    report.failed += 1;
                }
                Err(err) => {
                    error!("Render task failed: {}", err);
                    report.failed += 1;
                }
            }
        }
        info!(
            "Rendered {} of {} documents ({} failed)",
            report.rendered, total, report.failed
        );
        report
    }
}
