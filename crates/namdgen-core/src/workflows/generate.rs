use crate::core::io::traits::RunSink;
use crate::core::models::catalog::Catalog;
use crate::core::models::system::SystemSpec;
use crate::engine::config::GlobalParams;
use crate::engine::progress::{ProgressReporter, is_milestone};
use crate::engine::synthesizer::synthesize;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub systems: usize,
    pub replicas: u32,
    pub documents_written: usize,
    pub manifest_path: PathBuf,
}

/// Every `(system, replica)` pair of a batch, catalog order first, then ascending replica.
pub fn jobs<'a>(catalog: &'a Catalog, params: &GlobalParams) -> Vec<(&'a SystemSpec, u32)> {
    let replicas = params.replicas;
    catalog
        .iter()
        .flat_map(|system| (0..replicas).map(move |replica| (system, replica)))
        .collect()
}

/// Generates the whole batch sequentially.
///
/// Each config is synthesized, written through `sink`, and recorded in the manifest before the
/// next one is produced; the manifest is flushed once at the end. The first sink error aborts
/// the batch and is returned unchanged, leaving the manifest unwritten.
#[instrument(skip_all, name = "generate_workflow", fields(systems = catalog.len(), replicas = params.replicas))]
pub fn run<S: RunSink>(
    catalog: &Catalog,
    params: &GlobalParams,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<GenerationSummary, S::Error> {
    let total = catalog.len() * params.replicas as usize;
    begin(reporter, total);

    let mut written = 0usize;
    for system in catalog {
        for replica in 0..params.replicas {
            let record = synthesize(system, replica, params);
            debug!(
                "Synthesized {} (seed {})",
                record.entry.file_name, record.seed
            );
            sink.write_document(&record.entry.file_name, &record.document)?;
            written += 1;
            advance(reporter, &record.entry.file_name, written, total);
            sink.append_manifest_row(record.entry);
        }
    }

    finish(catalog, params, sink, reporter, written)
}

/// Generates the whole batch on the rayon thread pool.
///
/// Documents are synthesized and written concurrently; their file names are disjoint by
/// construction. Manifest rows are collected in job order and appended afterwards, so the
/// manifest is identical to the one [`run`] produces.
#[instrument(skip_all, name = "generate_workflow_parallel", fields(systems = catalog.len(), replicas = params.replicas))]
pub fn run_parallel<S>(
    catalog: &Catalog,
    params: &GlobalParams,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<GenerationSummary, S::Error>
where
    S: RunSink + Sync,
    S::Error: Send,
{
    let jobs = jobs(catalog, params);
    let total = jobs.len();
    begin(reporter, total);

    let counter = AtomicUsize::new(0);
    let shared: &S = &*sink;
    let entries = jobs
        .par_iter()
        .map(|&(system, replica)| {
            let record = synthesize(system, replica, params);
            shared.write_document(&record.entry.file_name, &record.document)?;
            let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
            advance(reporter, &record.entry.file_name, done, total);
            Ok(record.entry)
        })
        .collect::<Result<Vec<_>, S::Error>>()?;

    let written = entries.len();
    for entry in entries {
        sink.append_manifest_row(entry);
    }

    finish(catalog, params, sink, reporter, written)
}

fn begin(reporter: &ProgressReporter, total: usize) {
    info!("Generating {} configs.", total);
    reporter.batch_started(total as u64);
}

fn advance(reporter: &ProgressReporter, file_name: &str, done: usize, total: usize) {
    let (done, total) = (done as u64, total as u64);
    if is_milestone(done) {
        info!("Generated {}/{} configs...", done, total);
    }
    reporter.config_written(file_name, done, total);
}

fn finish<S: RunSink>(
    catalog: &Catalog,
    params: &GlobalParams,
    sink: &mut S,
    reporter: &ProgressReporter,
    written: usize,
) -> Result<GenerationSummary, S::Error> {
    let manifest_path = sink.flush_manifest()?;
    reporter.manifest_written(&manifest_path);
    reporter.batch_finished(written as u64);

    info!(
        "Wrote {} configs and manifest {:?}.",
        written, &manifest_path
    );
    Ok(GenerationSummary {
        systems: catalog.len(),
        replicas: params.replicas,
        documents_written: written,
        manifest_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::directory::{DirectorySink, verify_output};
    use crate::core::io::manifest::{MANIFEST_FILE_NAME, Manifest, ManifestEntry};
    use crate::core::models::system::SizeClass;
    use crate::engine::config::GlobalParamsBuilder;
    use crate::engine::progress::Progress;
    use std::collections::{BTreeMap, HashSet};
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Default)]
    struct MemorySink {
        documents: Mutex<BTreeMap<String, String>>,
        order: Mutex<Vec<String>>,
        manifest: Manifest,
        flushed: bool,
        fail_on: Option<String>,
    }

    impl RunSink for MemorySink {
        type Error = io::Error;

        fn write_document(&self, file_name: &str, content: &str) -> Result<(), Self::Error> {
            if self.fail_on.as_deref() == Some(file_name) {
                return Err(io::Error::other("disk full"));
            }
            self.order.lock().unwrap().push(file_name.to_string());
            self.documents
                .lock()
                .unwrap()
                .insert(file_name.to_string(), content.to_string());
            Ok(())
        }

        fn append_manifest_row(&mut self, entry: ManifestEntry) {
            self.manifest.push(entry);
        }

        fn flush_manifest(&mut self) -> Result<PathBuf, Self::Error> {
            self.flushed = true;
            Ok(PathBuf::from(MANIFEST_FILE_NAME))
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            SystemSpec::new("alpha_300K", 300.0, SizeClass::Tiny),
            SystemSpec::new("beta_350K", 350.0, SizeClass::Medium),
            SystemSpec::new("gamma_300K", 300.0, SizeClass::Xlarge),
        ])
        .unwrap()
    }

    fn params(replicas: u32) -> GlobalParams {
        GlobalParamsBuilder::new().replicas(replicas).build().unwrap()
    }

    #[test]
    fn jobs_iterate_catalog_then_replicas() {
        let catalog = small_catalog();
        let jobs = jobs(&catalog, &params(2));
        let labels: Vec<_> = jobs
            .iter()
            .map(|(s, r)| format!("{}#{}", s.name, r))
            .collect();
        assert_eq!(
            labels,
            vec![
                "alpha_300K#0",
                "alpha_300K#1",
                "beta_350K#0",
                "beta_350K#1",
                "gamma_300K#0",
                "gamma_300K#1",
            ]
        );
    }

    #[test]
    fn sequential_run_writes_every_document_in_order() {
        let catalog = small_catalog();
        let params = params(3);
        let mut sink = MemorySink::default();

        let summary = run(&catalog, &params, &mut sink, &ProgressReporter::new()).unwrap();

        assert_eq!(summary.documents_written, 9);
        assert_eq!(summary.systems, 3);
        assert_eq!(summary.replicas, 3);
        assert!(sink.flushed);

        let order = sink.order.lock().unwrap().clone();
        let manifest_names: Vec<_> = sink
            .manifest
            .entries()
            .iter()
            .map(|e| e.file_name.clone())
            .collect();
        assert_eq!(order, manifest_names);
        assert_eq!(order.first().unwrap(), "alpha_300K_rep00.namd");
        assert_eq!(order.last().unwrap(), "gamma_300K_rep02.namd");

        let unique: HashSet<_> = manifest_names.iter().collect();
        assert_eq!(unique.len(), manifest_names.len());
        let documents = sink.documents.lock().unwrap();
        assert!(manifest_names.iter().all(|n| documents.contains_key(n)));
    }

    #[test]
    fn reference_batch_has_250_manifest_rows() {
        let catalog = Catalog::reference();
        let mut sink = MemorySink::default();
        let summary = run(
            &catalog,
            &GlobalParams::default(),
            &mut sink,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(summary.documents_written, 250);
        assert_eq!(sink.manifest.len(), 250);
        assert_eq!(sink.documents.lock().unwrap().len(), 250);
    }

    #[test]
    fn first_write_error_aborts_without_flushing() {
        let catalog = small_catalog();
        let mut sink = MemorySink {
            fail_on: Some("beta_350K_rep00.namd".to_string()),
            ..Default::default()
        };

        let result = run(&catalog, &params(2), &mut sink, &ProgressReporter::new());

        assert!(result.is_err());
        assert!(!sink.flushed);
        assert_eq!(sink.manifest.len(), 2);
        assert_eq!(sink.order.lock().unwrap().len(), 2);
    }

    #[test]
    fn progress_reports_a_milestone_every_fifty_configs() {
        let catalog = Catalog::reference();
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p: &Progress| {
            recorder.lock().unwrap().push(p.clone());
        }));

        run(
            &catalog,
            &GlobalParams::default(),
            &mut MemorySink::default(),
            &reporter,
        )
        .unwrap();

        let events = events.lock().unwrap();
        let milestones: Vec<_> = events
            .iter()
            .filter(|p| matches!(p, Progress::Milestone { .. }))
            .map(ToString::to_string)
            .collect();
        assert_eq!(milestones.len(), 5);
        assert_eq!(milestones[0], "Generated 50/250 configs...");
        assert_eq!(milestones[4], "Generated 250/250 configs...");

        let written: Vec<_> = events
            .iter()
            .filter_map(|p| match p {
                Progress::ConfigWritten {
                    file_name, done, ..
                } => Some((file_name.as_str(), *done)),
                _ => None,
            })
            .collect();
        assert_eq!(written.len(), 250);
        assert_eq!(written[0], ("regime0_1RC7_300K_rep00.namd", 1));
        assert_eq!(written[249].1, 250);

        assert_eq!(events.first(), Some(&Progress::BatchStart { total: 250 }));
        assert!(matches!(
            events[events.len() - 2],
            Progress::ManifestWritten { .. }
        ));
        assert_eq!(events.last(), Some(&Progress::BatchFinish { written: 250 }));
    }

    #[test]
    fn sinks_may_use_their_own_error_type() {
        #[derive(Debug, thiserror::Error)]
        #[error("sink refused {0}")]
        struct Refused(String);

        #[derive(Default)]
        struct RefusingSink {
            rows: usize,
        }

        impl RunSink for RefusingSink {
            type Error = Refused;

            fn write_document(&self, file_name: &str, _content: &str) -> Result<(), Refused> {
                if file_name.starts_with("beta") {
                    Err(Refused(file_name.to_string()))
                } else {
                    Ok(())
                }
            }

            fn append_manifest_row(&mut self, _entry: ManifestEntry) {
                self.rows += 1;
            }

            fn flush_manifest(&mut self) -> Result<PathBuf, Refused> {
                Ok(PathBuf::from(MANIFEST_FILE_NAME))
            }
        }

        let mut sink = RefusingSink::default();
        let err = run(&small_catalog(), &params(2), &mut sink, &ProgressReporter::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "sink refused beta_350K_rep00.namd");
        assert_eq!(sink.rows, 2);
    }

    #[test]
    fn directory_run_produces_a_verifiable_output_tree() {
        let dir = tempdir().unwrap();
        let catalog = small_catalog();
        let params = params(4);
        let mut sink = DirectorySink::create(dir.path().join("namd_configs")).unwrap();

        let summary = run(&catalog, &params, &mut sink, &ProgressReporter::new()).unwrap();

        assert_eq!(
            summary.manifest_path,
            dir.path().join("namd_configs").join(MANIFEST_FILE_NAME)
        );
        let report = verify_output(dir.path().join("namd_configs"), Some(12)).unwrap();
        assert!(report.is_complete(), "{:?}", report);

        let doc = fs::read_to_string(dir.path().join("namd_configs/beta_350K_rep02.namd")).unwrap();
        assert!(doc.contains("outputName beta_350K_rep02\n"));
        assert!(doc.contains("pairlistdist 12.5\n"));
    }

    #[test]
    fn parallel_run_matches_sequential_output() {
        let sequential_dir = tempdir().unwrap();
        let parallel_dir = tempdir().unwrap();
        let catalog = Catalog::reference();
        let params = GlobalParams::default();

        let mut sequential = DirectorySink::create(sequential_dir.path()).unwrap();
        run(&catalog, &params, &mut sequential, &ProgressReporter::new()).unwrap();

        let mut parallel = DirectorySink::create(parallel_dir.path()).unwrap();
        let summary =
            run_parallel(&catalog, &params, &mut parallel, &ProgressReporter::new()).unwrap();
        assert_eq!(summary.documents_written, 250);

        let read = |dir: &std::path::Path, name: &str| fs::read_to_string(dir.join(name)).unwrap();
        assert_eq!(
            read(sequential_dir.path(), MANIFEST_FILE_NAME),
            read(parallel_dir.path(), MANIFEST_FILE_NAME)
        );
        for entry in sequential.manifest().entries() {
            assert_eq!(
                read(sequential_dir.path(), &entry.file_name),
                read(parallel_dir.path(), &entry.file_name)
            );
        }
    }

    #[test]
    fn parallel_run_propagates_write_errors() {
        let catalog = small_catalog();
        let mut sink = MemorySink {
            fail_on: Some("gamma_300K_rep01.namd".to_string()),
            ..Default::default()
        };
        let result = run_parallel(&catalog, &params(2), &mut sink, &ProgressReporter::new());
        assert!(result.is_err());
        assert!(!sink.flushed);
        assert!(sink.manifest.is_empty());
    }
}
