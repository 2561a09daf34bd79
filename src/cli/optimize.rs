//! `vectrace optimize`: rewrite existing tracer output in place.
//!
//! Files are independent, so they are rewritten in parallel, each by its
//! own clone of the optimizer. A failed file keeps its tracer output.

use std::path::PathBuf;

use anyhow::Result;
use rayon::prelude::*;

use crate::{
    cli::OptimizeArgs,
    config::VectraceConfig,
    error::{Stage, StageError},
    log,
    logger::ProgressLine,
    optimize::{OptimizeError, OptimizeReport, Optimizer, Rgb},
    utils::fmt::{human_size, plural_count},
};

pub fn run(config: &VectraceConfig, args: &OptimizeArgs) -> Result<()> {
    if let Some(background) = &args.background
        && Rgb::from_hex(background).is_none()
    {
        return Err(StageError::new(
            Stage::Configuration,
            anyhow::anyhow!("background `{background}` is not six hex digits"),
        )
        .into());
    }

    let grouping = args.grouping.unwrap_or(config.optimize.grouping);
    let optimizer = Optimizer::new(grouping)
        .background(args.background.clone())
        .centerline(args.centerline);

    let results = optimize_all(&optimizer, &args.files);

    let mut reports = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                failed += 1;
                log!("error"; "{}: {}", path.display(), err);
            }
        }
    }
    print_reports(&reports, args.json)?;

    if failed > 0 {
        return Err(StageError::new(
            Stage::Rewrite,
            anyhow::anyhow!(
                "{} of {} could not be rewritten",
                failed,
                plural_count(args.files.len(), "file")
            ),
        )
        .into());
    }
    Ok(())
}

/// Rewrite every file, keeping input order in the result.
fn optimize_all(
    optimizer: &Optimizer,
    files: &[PathBuf],
) -> Vec<(PathBuf, Result<OptimizeReport, OptimizeError>)> {
    let progress = ProgressLine::new("optimize", &[("svg", files.len())]);

    let results = files
        .par_iter()
        .map_with(optimizer.clone(), |optimizer, path| {
            let result = optimizer.optimize_file(path);
            progress.inc("svg");
            (path.clone(), result)
        })
        .collect();

    progress.finish();
    results
}

/// Print reports as one JSON array or as a line per file.
pub fn print_reports(reports: &[OptimizeReport], json: bool) -> Result<()> {
    if json {
        let text = match reports {
            [report] => serde_json::to_string_pretty(report)?,
            _ => serde_json::to_string_pretty(reports)?,
        };
        println!("{text}");
        return Ok(());
    }

    for report in reports {
        log!(
            "optimize"; "{}: {}, {} ({}), {}",
            report.output.display(),
            plural_count(report.path_count, "path"),
            plural_count(report.palette.len(), "color"),
            report.grouping.as_str(),
            human_size(report.size)
        );
    }
    Ok(())
}
