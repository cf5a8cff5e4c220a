//! Parallel per-file job runner.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Worker threads for a `--jobs` value; 0 means every core.
pub fn thread_count(jobs: usize) -> usize {
    if jobs == 0 {
        num_cpus::get()
    } else {
        jobs
    }
}

/// Outcome of a batch over `total` files.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Plural noun for the processed items ("images", "videos").
    pub kind: String,
    pub total: usize,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed {}/{} {} successfully",
            self.succeeded(),
            self.total,
            self.kind
        )
    }
}

/// Plan the output of every file, in input order.
///
/// A file whose planned output was already claimed by an earlier file gets an
/// error naming that file instead of a path, so two jobs never write the same
/// destination.
pub fn plan_outputs<P>(files: &[PathBuf], plan: P) -> Vec<std::result::Result<PathBuf, String>>
where
    P: Fn(&Path) -> PathBuf,
{
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    files
        .iter()
        .map(|file| {
            let output = plan(file);
            match claimed.get(&output) {
                Some(first) => Err(format!(
                    "output {:?} is already produced from {:?}",
                    output, first
                )),
                None => {
                    claimed.insert(output.clone(), file);
                    Ok(output)
                }
            }
        })
        .collect()
}

/// Run `job` over every file on a dedicated pool of `jobs` threads.
///
/// Outputs come from `plan` and are checked for collisions before anything
/// runs. Each file is independent: a failure is logged and recorded, and the
/// remaining files still run. Results are reported in input order.
pub fn run_batch<P, F>(
    files: &[PathBuf],
    jobs: usize,
    kind: &str,
    plan: P,
    job: F,
) -> Result<BatchReport>
where
    P: Fn(&Path) -> PathBuf,
    F: Fn(&Path, &Path) -> Result<PathBuf> + Sync,
{
    let threads = thread_count(jobs);
    tracing::debug!("Processing {} {} on {} thread(s)", files.len(), kind, threads);

    let planned = plan_outputs(files, plan);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build worker pool")?;

    let results: Vec<(PathBuf, Result<PathBuf>)> = pool.install(|| {
        files
            .par_iter()
            .zip(planned.par_iter())
            .map(|(file, output)| {
                let result = match output {
                    Ok(output) => {
                        tracing::info!("Processing {:?}", file);
                        job(file, output)
                    }
                    Err(collision) => Err(anyhow::anyhow!("{}", collision)),
                };
                (file.clone(), result)
            })
            .collect()
    });

    let mut report = BatchReport {
        kind: kind.to_string(),
        total: files.len(),
        outputs: Vec::new(),
        failures: Vec::new(),
    };

    for (file, result) in results {
        match result {
            Ok(output) => {
                tracing::info!("✓ {:?} -> {:?}", file, output);
                report.outputs.push(output);
            }
            Err(e) => {
                tracing::error!("✗ {:?}: {:#}", file, e);
                report.failures.push((file, format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}
