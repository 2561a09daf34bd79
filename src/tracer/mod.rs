//! External tracer invocation.
//!
//! The tracer is located on `PATH` once, then run with the argument vector
//! of a [`Command`]. The program token of the command is replaced by the
//! resolved executable so the run does not depend on a second lookup.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    command::{Command, CommandError, INPUT_FILE, OUTPUT_FILE},
    debug, log,
    utils::{
        exec::{Cmd, EMPTY_FILTER, FilterRule, SILENT_FILTER, format_error},
        path::backup_path,
    },
};

/// AutoTrace prints its progress on stderr even when it succeeds.
const TRACER_FILTER: FilterRule = FilterRule::new(&["Loading", "Tracing", "Writing"]);

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("`{0}` is not installed or not on PATH, install it or set `tracer.program`")]
    NotInstalled(String, #[source] which::Error),

    #[error("input file `{0}` does not exist")]
    MissingInput(PathBuf),

    #[error("no output file is set")]
    NoOutputFile,

    #[error("failed to start `{0}`")]
    Spawn(String, #[source] io::Error),

    #[error("{0}")]
    Failed(String),

    #[error("`{program}` finished but did not write `{}`", .output.display())]
    NoOutput { program: String, output: PathBuf },

    #[error("failed to keep previous result `{0}`")]
    Backup(PathBuf, #[source] io::Error),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceOutcome {
    pub output: PathBuf,
    /// Where the earlier result at `output` was moved to.
    pub previous: Option<PathBuf>,
}

/// A located tracer executable.
#[derive(Debug, Clone)]
pub struct Tracer {
    name: String,
    path: PathBuf,
    keep_previous: bool,
}

impl Tracer {
    /// Resolve `program` on `PATH`, or as a path when it contains a separator.
    pub fn locate(program: &str) -> Result<Self, TraceError> {
        let path = which::which(program)
            .map_err(|err| TraceError::NotInstalled(program.to_owned(), err))?;
        debug!("trace"; "using {}", path.display());

        Ok(Self {
            name: program.to_owned(),
            path,
            keep_previous: false,
        })
    }

    /// Move an existing output file aside before tracing.
    pub fn keep_previous(mut self, keep: bool) -> Self {
        self.keep_previous = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First line the tracer prints for `-version`, if it answers at all.
    pub fn version(&self) -> Option<String> {
        let output = Cmd::new(&self.path)
            .arg("-version")
            .filter(&SILENT_FILTER)
            .run()
            .ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        stdout
            .lines()
            .chain(stderr.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_owned)
    }

    /// Run the tracer with the current settings of `command`.
    pub fn trace(&self, command: &Command) -> Result<TraceOutcome, TraceError> {
        let input = PathBuf::from(command.parameter_value(INPUT_FILE)?);
        if !input.is_file() {
            return Err(TraceError::MissingInput(input));
        }

        let output = command.parameter_value(OUTPUT_FILE)?;
        if !command.parameter_enabled(OUTPUT_FILE)? || output.is_empty() {
            return Err(TraceError::NoOutputFile);
        }
        let output = PathBuf::from(output);

        let previous = if self.keep_previous && output.exists() {
            let backup = backup_path(&output);
            fs::rename(&output, &backup).map_err(|err| TraceError::Backup(backup.clone(), err))?;
            debug!("trace"; "kept previous result as {}", backup.display());
            Some(backup)
        } else {
            None
        };

        let argv = command.command_args()?;
        log!("trace"; "{}", input.display());
        debug!("trace"; "{}", argv.join(" "));

        let result = Cmd::new(&self.path)
            .args(&argv[1..])
            .filter(&TRACER_FILTER)
            .output()
            .map_err(|err| TraceError::Spawn(self.name.clone(), err))?;

        if !result.status.success() {
            return Err(TraceError::Failed(format_error(
                &self.name,
                &result,
                &EMPTY_FILTER,
            )));
        }
        if !output.is_file() {
            return Err(TraceError::NoOutput {
                program: self.name.clone(),
                output,
            });
        }

        Ok(TraceOutcome { output, previous })
    }
}

/// Point `command` at `input` and `output`, enabling the output file.
pub fn set_files(command: &mut Command, input: &Path, output: &Path) -> Result<(), CommandError> {
    command.set_parameter_value(INPUT_FILE, &input.to_string_lossy(), true)?;
    command.set_parameter_value(OUTPUT_FILE, &output.to_string_lossy(), true)?;
    command.set_parameter_enabled(OUTPUT_FILE, true, true)
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;
    use crate::command::Schema;

    const FAKE_TRACER: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -output-file) out="$2"; shift 2 ;;
    -version) echo "AutoTrace version 0.31.10"; exit 0 ;;
    *) shift ;;
  esac
done
printf '<svg width="2" height="2"><path style="fill:#FF0000; stroke:none;" d="M0 0 L2 0 L0 0 z"/></svg>' > "$out"
"#;

    const FAILING_TRACER: &str = "#!/bin/sh\necho 'cannot read input' >&2\nexit 2\n";

    const SILENT_TRACER: &str = "#!/bin/sh\nexit 0\n";

    fn script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn command(dir: &Path) -> (Command, PathBuf) {
        let input = dir.join("in.png");
        fs::write(&input, b"png").unwrap();
        let output = dir.join("out.svg");

        let mut command = Schema::embedded()
            .unwrap()
            .build_command("autotrace", None)
            .unwrap();
        set_files(&mut command, &input, &output).unwrap();
        (command, output)
    }

    #[test]
    fn test_not_installed() {
        assert!(matches!(
            Tracer::locate("vectrace-no-such-tracer"),
            Err(TraceError::NotInstalled(..))
        ));
    }

    #[test]
    fn test_trace_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", FAKE_TRACER)).unwrap();
        let (command, output) = command(dir.path());

        let outcome = tracer.trace(&command).unwrap();
        assert_eq!(outcome.output, output);
        assert_eq!(outcome.previous, None);
        assert!(fs::read_to_string(&output).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_keep_previous() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", FAKE_TRACER))
            .unwrap()
            .keep_previous(true);
        let (command, output) = command(dir.path());
        fs::write(&output, "old").unwrap();

        let outcome = tracer.trace(&command).unwrap();
        let backup = dir.path().join("out.svg~");
        assert_eq!(outcome.previous.as_deref(), Some(backup.as_path()));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        assert!(fs::read_to_string(&output).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", FAKE_TRACER)).unwrap();
        let (mut command, _) = command(dir.path());
        command
            .set_parameter_value(INPUT_FILE, "/nonexistent/in.png", false)
            .unwrap();

        assert!(matches!(
            tracer.trace(&command),
            Err(TraceError::MissingInput(_))
        ));
    }

    #[test]
    fn test_output_file_required() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", FAKE_TRACER)).unwrap();
        let (mut command, _) = command(dir.path());
        command.set_parameter_enabled(OUTPUT_FILE, false, false).unwrap();

        assert!(matches!(
            tracer.trace(&command),
            Err(TraceError::NoOutputFile)
        ));
    }

    #[test]
    fn test_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", FAILING_TRACER)).unwrap();
        let (command, _) = command(dir.path());

        let err = tracer.trace(&command).unwrap_err();
        assert!(matches!(err, TraceError::Failed(_)));
        assert!(err.to_string().contains("cannot read input"));
    }

    #[test]
    fn test_success_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", SILENT_TRACER)).unwrap();
        let (command, _) = command(dir.path());

        assert!(matches!(
            tracer.trace(&command),
            Err(TraceError::NoOutput { .. })
        ));
    }

    #[test]
    fn test_version() {
        let dir = tempfile::tempdir().unwrap();
        let tracer = Tracer::locate(&script(dir.path(), "tracer", FAKE_TRACER)).unwrap();
        assert_eq!(
            tracer.version().as_deref(),
            Some("AutoTrace version 0.31.10")
        );
    }

    #[test]
    fn test_set_files() {
        let dir = tempfile::tempdir().unwrap();
        let (command, output) = command(dir.path());
        let argv = command.command_args().unwrap();
        assert_eq!(argv.last().map(String::as_str), dir.path().join("in.png").to_str());
        let at = argv.iter().position(|a| a == "-output-file").unwrap();
        assert_eq!(argv[at + 1], output.to_string_lossy());
    }
}
