//! A single named tool parameter.

use std::cmp::Ordering;

use super::{CommandError, INPUT_FILE, OUTPUT_FILE};

/// Named tool parameter with an immutable default.
///
/// A parameter whose default is empty is flag-style: it renders as a bare
/// `-name` and never takes a value from a parsed command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    pub(super) enabled: bool,
    default_value: String,
    pub(super) value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, enabled: bool, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            enabled,
            default_value: value.clone(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn is_input_file(&self) -> bool {
        self.name == INPUT_FILE
    }

    pub fn is_output_file(&self) -> bool {
        self.name == OUTPUT_FILE
    }

    /// Either of the two file parameters.
    pub fn is_file(&self) -> bool {
        self.is_input_file() || self.is_output_file()
    }

    pub fn is_flag(&self) -> bool {
        !self.is_file() && self.default_value.is_empty()
    }

    /// Reject values that `setting()` could not render back unambiguously.
    pub fn check_value(&self, value: &str) -> Result<(), CommandError> {
        if self.is_file() {
            return Ok(());
        }
        check_token(self.is_flag(), value).map_err(|reason| CommandError::InvalidValue {
            name: self.name.clone(),
            value: value.to_owned(),
            reason,
        })
    }

    /// Option token for argv, `-name`. Empty for the input file.
    pub fn option(&self) -> String {
        if self.is_input_file() {
            String::new()
        } else {
            format!("-{}", self.name)
        }
    }

    /// Text this parameter contributes to a command string.
    ///
    /// Disabled parameters contribute nothing. File values containing a
    /// space are double-quoted.
    pub fn setting(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        if self.is_input_file() {
            return quote_if_spaced(&self.value);
        }

        let option = self.option();
        match self.value.as_str() {
            "" => option,
            value if self.is_output_file() => format!("{option} {}", quote_if_spaced(value)),
            value => format!("{option} {value}"),
        }
    }

    /// Append this parameter's argv tokens. Values are never quoted.
    pub fn push_args(&self, argv: &mut Vec<String>) {
        if !self.enabled {
            return;
        }
        let option = self.option();
        if !option.is_empty() {
            argv.push(option);
        }
        if !self.value.is_empty() {
            argv.push(self.value.clone());
        }
    }
}

/// A switch takes no value. Any other non-file value is one bare token.
pub(super) fn check_token(flag: bool, value: &str) -> Result<(), &'static str> {
    if flag {
        return if value.is_empty() {
            Ok(())
        } else {
            Err("is a switch and takes no value")
        };
    }
    if value.is_empty() {
        Err("requires a value")
    } else if value.contains(char::is_whitespace) {
        Err("cannot contain whitespace")
    } else if value.starts_with('-') && value.parse::<f64>().is_err() {
        Err("cannot start with `-` unless it is a number")
    } else {
        Ok(())
    }
}

fn quote_if_spaced(value: &str) -> String {
    if value.contains(' ') {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}

/// Parameter order: `input-file` sorts after everything, other names by bytes.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (a == INPUT_FILE, b == INPUT_FILE) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

impl Ord for Parameter {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_names(&self.name, &other.name)
    }
}

impl PartialOrd for Parameter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
