//! `vectrace trace`: trace one image, then rewrite the SVG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::{
    cli::{
        TraceArgs,
        common::{AppContext, optimizer_for},
        optimize::print_reports,
    },
    command::BACKGROUND_COLOR,
    error::{Stage, StageError, StageExt},
    log,
    optimize::{OptimizeReport, SvgDocument},
    tracer::{Tracer, set_files},
    utils::fmt::{human_size, plural_count},
};

/// Tracer output kept as written, with an optional background added.
#[derive(Debug, Serialize)]
struct RawReport {
    output: PathBuf,
    path_count: usize,
    size: u64,
}

pub fn run(ctx: &AppContext, args: &TraceArgs) -> Result<()> {
    let mut command = ctx.build_command(&args.overrides)?;

    let input = &args.input;
    if !input.is_file() {
        return Err(StageError::new(
            Stage::Configuration,
            anyhow::anyhow!("input file `{}` does not exist", input.display()),
        )
        .into());
    }
    let output = output_path(input, args.output.as_deref()).stage(Stage::Configuration)?;
    set_files(&mut command, input, &output).stage(Stage::Configuration)?;

    let tracer = Tracer::locate(&ctx.config.tracer.program)
        .stage(Stage::Invocation)?
        .keep_previous(ctx.config.tracer.keep_previous);
    let outcome = tracer.trace(&command).stage(Stage::Invocation)?;
    if let Some(previous) = &outcome.previous {
        log!("trace"; "previous result kept as {}", previous.display());
    }

    if args.raw || !ctx.config.optimize.enable {
        let report = keep_raw(&command, &outcome.output).stage(Stage::Rewrite)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            log!(
                "trace"; "{}: {}, {}",
                report.output.display(),
                plural_count(report.path_count, "path"),
                human_size(report.size)
            );
        }
        return Ok(());
    }

    let grouping = args.grouping.unwrap_or(ctx.config.optimize.grouping);
    let optimizer = optimizer_for(&command, grouping)?;
    let report: OptimizeReport = optimizer
        .optimize_file(&outcome.output)
        .stage(Stage::Rewrite)?;
    print_reports(&[report], args.json)
}

/// `-o` as given, or the input with an `.svg` extension.
fn output_path(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let output = output.map_or_else(|| input.with_extension("svg"), Path::to_path_buf);
    if output == input {
        bail!(
            "output would overwrite the input `{}`, pass --output",
            input.display()
        );
    }
    Ok(output)
}

/// Leave the tracer output alone apart from an optional background.
fn keep_raw(command: &crate::command::Command, output: &Path) -> Result<RawReport> {
    let mut doc = SvgDocument::load(output)?;

    let size = if command.parameter_enabled(BACKGROUND_COLOR)? {
        doc.insert_background(command.parameter_value(BACKGROUND_COLOR)?);
        let text = doc.to_svg();
        std::fs::write(output, &text)
            .with_context(|| format!("cannot write {}", output.display()))?;
        text.len() as u64
    } else {
        std::fs::metadata(output)
            .with_context(|| format!("cannot read {}", output.display()))?
            .len()
    };

    Ok(RawReport {
        output: output.to_path_buf(),
        path_count: doc.paths().count(),
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::ParamOverrides, command::Schema, config::VectraceConfig};

    #[test]
    fn test_output_path_default() {
        assert_eq!(
            output_path(Path::new("art/logo.png"), None).unwrap(),
            PathBuf::from("art/logo.svg")
        );
        assert_eq!(
            output_path(Path::new("a.png"), Some(Path::new("b.svg"))).unwrap(),
            PathBuf::from("b.svg")
        );
    }

    #[test]
    fn test_output_path_would_overwrite_input() {
        assert!(output_path(Path::new("logo.svg"), None).is_err());
    }

    #[test]
    fn test_keep_raw_with_background() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.svg");
        std::fs::write(
            &output,
            r#"<svg width="3" height="3"><path style="fill:#000000; stroke:none;" d="M0 0"/></svg>"#,
        )
        .unwrap();

        let ctx = AppContext {
            config: VectraceConfig::default(),
            schema: Schema::embedded().unwrap(),
        };
        let overrides = ParamOverrides {
            set: vec![(BACKGROUND_COLOR.into(), "FFFFFF".into())],
            ..Default::default()
        };
        let command = ctx.build_command(&overrides).unwrap();

        let report = keep_raw(&command, &output).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(report.path_count, 1);
        assert_eq!(report.size, written.len() as u64);
        assert!(written.contains(r##"<rect width="3" height="3" fill="#FFFFFF"/>"##));
    }

    #[test]
    fn test_keep_raw_untouched_without_background() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.svg");
        let original = r#"<svg width="3" height="3"></svg>"#;
        std::fs::write(&output, original).unwrap();

        let command = Schema::embedded()
            .unwrap()
            .build_command("autotrace", None)
            .unwrap();
        let report = keep_raw(&command, &output).unwrap();
        assert_eq!(report.path_count, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), original);
    }
}
