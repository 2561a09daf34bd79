//! `vectrace params`: the tracer in use and the parameter table of the
//! active schema.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::{
    cli::common::AppContext,
    command::{ParameterSpec, Schema},
    tracer::Tracer,
};

pub fn run(ctx: &AppContext) -> Result<()> {
    println!("{}", tracer_line(&ctx.config.tracer.program));
    print_table(&ctx.schema);
    Ok(())
}

/// `tracer: /usr/bin/autotrace (AutoTrace version 0.31.10)`, or a note that
/// the program is missing. Tracing needs it, listing parameters does not.
fn tracer_line(program: &str) -> String {
    let status = match Tracer::locate(program) {
        Ok(tracer) => {
            let version = tracer
                .version()
                .unwrap_or_else(|| "version unknown".to_owned());
            format!("{} ({version})", tracer.path().display())
        }
        Err(_) => format!("{program} (not installed)"),
    };
    format!("{} {status}", "tracer:".bold())
}

fn print_table(schema: &Schema) {
    let width = schema
        .parameters()
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or_default();

    for spec in schema.parameters() {
        let state = if spec.initially_enabled() { "on " } else { "off" };
        println!(
            "{:<width$}  {}  {}",
            spec.name.bold(),
            state.dimmed(),
            details(spec)
        );
        if !spec.description.is_empty() {
            println!("{:<width$}  {}", "", spec.description.dimmed());
        }
    }
}

/// Default and range, e.g. `100 [0..180]`, or `switch`.
fn details(spec: &ParameterSpec) -> String {
    if spec.is_file() {
        return "file".into();
    }
    if spec.is_flag() {
        return "switch".into();
    }
    match &spec.range {
        Some(range) => format!("{} [{}..{}]", spec.default, range.min, range.max),
        None => spec.default.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details() {
        let schema = Schema::embedded().unwrap();
        let details_of = |name: &str| details(schema.get(name).unwrap());

        assert_eq!(details_of("input-file"), "file");
        assert_eq!(details_of("centerline"), "switch");
        assert_eq!(details_of("output-format"), "svg");
        assert_eq!(details_of("corner-always-threshold"), "60 [0..180]");
    }

    #[test]
    fn test_tracer_line_missing_program() {
        let line = tracer_line("vectrace-no-such-tracer");
        let line = crate::utils::exec::strip_ansi(&line);
        assert_eq!(line, "tracer: vectrace-no-such-tracer (not installed)");
    }

    #[cfg(unix)]
    #[test]
    fn test_tracer_line_reports_version() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autotrace");
        std::fs::write(&path, "#!/bin/sh\necho 'AutoTrace version 0.31.10'\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let line = tracer_line(&path.to_string_lossy());
        let line = crate::utils::exec::strip_ansi(&line);
        assert!(line.starts_with("tracer: "));
        assert!(line.ends_with("(AutoTrace version 0.31.10)"));
    }
}
