//! The command model: an ordered, fixed-size set of tool parameters.

use super::{
    CommandError, CommandListener, INPUT_FILE, OUTPUT_FILE, Parameter,
    parameter::compare_names,
    parse::{self, Setting},
};

/// Tool invocation built from named parameters.
///
/// Parameters are added one at a time up to a fixed capacity. Adding the
/// last one seals the command: parameters are sorted (`input-file` last,
/// others by name) and every later lookup is a binary search. Lookups on an
/// unsealed command fail with [`CommandError::Incomplete`].
pub struct Command {
    program: String,
    capacity: usize,
    parameters: Vec<Parameter>,
    sealed: bool,
    default_command: String,
    listener: Option<Box<dyn CommandListener + Send>>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("program", &self.program)
            .field("capacity", &self.capacity)
            .field("parameters", &self.parameters)
            .field("sealed", &self.sealed)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(program: impl Into<String>, capacity: usize) -> Self {
        Self {
            program: program.into(),
            capacity,
            parameters: Vec::with_capacity(capacity),
            sealed: false,
            default_command: String::new(),
            listener: None,
        }
    }

    /// Attach the change observer, replacing any previous one.
    pub fn set_listener(&mut self, listener: Option<Box<dyn CommandListener + Send>>) {
        self.listener = listener;
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Parameters in command order. Only meaningful once sealed.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Add a parameter whose default is `value`.
    ///
    /// The final addition sorts the parameters and validates the set.
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        enabled: bool,
        value: impl Into<String>,
    ) -> Result<(), CommandError> {
        if self.parameters.len() == self.capacity {
            return Err(CommandError::Capacity(self.capacity));
        }

        self.parameters.push(Parameter::new(name, enabled, value));

        if self.parameters.len() == self.capacity {
            self.seal()?;
        }
        Ok(())
    }

    fn seal(&mut self) -> Result<(), CommandError> {
        self.parameters.sort();

        if let Some(pair) = self
            .parameters
            .windows(2)
            .find(|pair| pair[0].name() == pair[1].name())
        {
            return Err(CommandError::Duplicate(pair[0].name().to_owned()));
        }
        for required in [INPUT_FILE, OUTPUT_FILE] {
            if self.search(required).is_err() {
                return Err(CommandError::MissingFileParameter(required));
            }
        }

        self.sealed = true;
        self.default_command = self.command()?;
        Ok(())
    }

    /// Command string of the freshly sealed command, before any change.
    pub fn default_command(&self) -> &str {
        &self.default_command
    }

    /// Restore defaults: reset values, then the initial enabled flags.
    pub fn restore_defaults(&mut self) -> Result<(), CommandError> {
        self.set_default_values()?;
        let default_command = self.default_command.clone();
        self.set_command(&default_command)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    fn search(&self, name: &str) -> Result<usize, usize> {
        self.parameters
            .binary_search_by(|p| compare_names(p.name(), name))
    }

    fn index_of(&self, name: &str) -> Result<usize, CommandError> {
        if !self.sealed {
            return Err(CommandError::Incomplete {
                added: self.parameters.len(),
                capacity: self.capacity,
            });
        }
        self.search(name)
            .map_err(|_| CommandError::NotFound(name.to_owned()))
    }

    pub fn parameter(&self, name: &str) -> Result<&Parameter, CommandError> {
        self.index_of(name).map(|i| &self.parameters[i])
    }

    pub fn parameter_enabled(&self, name: &str) -> Result<bool, CommandError> {
        self.parameter(name).map(Parameter::enabled)
    }

    pub fn parameter_value(&self, name: &str) -> Result<&str, CommandError> {
        self.parameter(name).map(Parameter::value)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Set the enabled flag. With `notify`, the listener hears about it even
    /// when the flag did not change.
    pub fn set_parameter_enabled(
        &mut self,
        name: &str,
        enabled: bool,
        notify: bool,
    ) -> Result<(), CommandError> {
        let index = self.index_of(name)?;
        let parameter = &mut self.parameters[index];
        parameter.enabled = enabled;

        if notify && let Some(listener) = self.listener.as_mut() {
            listener.enabled_changed(&self.parameters[index]);
        }
        Ok(())
    }

    /// Set the value. Setting an equal value is a no-op and never notifies.
    ///
    /// Switches only accept an empty value and every other non-file
    /// parameter needs a single non-empty token, so the command string
    /// always parses back to the same state.
    pub fn set_parameter_value(
        &mut self,
        name: &str,
        value: &str,
        notify: bool,
    ) -> Result<(), CommandError> {
        let index = self.index_of(name)?;
        let parameter = &mut self.parameters[index];
        parameter.check_value(value)?;
        if parameter.value == value {
            return Ok(());
        }
        parameter.value = value.to_owned();

        if notify && let Some(listener) = self.listener.as_mut() {
            listener.value_changed(&self.parameters[index]);
        }
        Ok(())
    }

    /// Reset every value except the two file parameters to its default.
    ///
    /// Enabled flags are left alone.
    pub fn set_default_values(&mut self) -> Result<(), CommandError> {
        let names: Vec<String> = self
            .sealed_parameters()?
            .iter()
            .filter(|p| !p.is_file())
            .map(|p| p.name().to_owned())
            .collect();

        for name in names {
            let default = self.parameter(&name)?.default_value().to_owned();
            self.set_parameter_value(&name, &default, true)?;
        }
        Ok(())
    }

    fn sealed_parameters(&self) -> Result<&[Parameter], CommandError> {
        if self.sealed {
            Ok(&self.parameters)
        } else {
            Err(CommandError::Incomplete {
                added: self.parameters.len(),
                capacity: self.capacity,
            })
        }
    }

    // ========================================================================
    // Synthesis
    // ========================================================================

    /// Human-readable command string, e.g. `autotrace -centerline in.png`.
    pub fn command(&self) -> Result<String, CommandError> {
        let parameters = self.sealed_parameters()?;
        let mut parts = vec![self.program.clone()];
        parts.extend(
            parameters
                .iter()
                .map(Parameter::setting)
                .filter(|s| !s.is_empty()),
        );
        Ok(parts.join(" "))
    }

    /// Argument vector for process spawning: program, then per enabled
    /// parameter its option and value tokens, unquoted.
    pub fn command_args(&self) -> Result<Vec<String>, CommandError> {
        let parameters = self.sealed_parameters()?;
        let mut argv = vec![self.program.clone()];
        for parameter in parameters {
            parameter.push_args(&mut argv);
        }
        Ok(argv)
    }

    /// Restore state from a command string produced by [`Command::command`].
    ///
    /// Every parameter except `input-file` is disabled, then each `-name` in
    /// the string is enabled and given the following value. The output file
    /// value and the trailing input file are not assigned. The whole string
    /// is parsed before any state changes, so a rejected string leaves the
    /// command untouched.
    pub fn set_command(&mut self, command: &str) -> Result<(), CommandError> {
        let parameters = self.sealed_parameters()?;
        let settings = parse::parse(command, |name| {
            self.search(name).ok().map(|i| &parameters[i])
        })?;

        let names: Vec<String> = parameters
            .iter()
            .filter(|p| !p.is_input_file())
            .map(|p| p.name().to_owned())
            .collect();
        for name in &names {
            self.set_parameter_enabled(name, false, true)?;
        }

        for Setting { name, value } in settings {
            self.set_parameter_enabled(&name, true, true)?;
            if let Some(value) = value
                && !self.parameter(&name)?.is_file()
            {
                self.set_parameter_value(&name, &value, true)?;
            }
        }
        Ok(())
    }
}
