//! Application context shared by the subcommands.

use crossbeam::channel::{Receiver, unbounded};

use crate::{
    cli::{Cli, ParamOverrides},
    command::{BACKGROUND_COLOR, CENTERLINE, Command, CommandListener, ParameterEvent, Schema},
    config::VectraceConfig,
    debug,
    error::{Stage, StageError, StageExt},
    logger,
    optimize::{Grouping, Optimizer},
    profile::ProfileStore,
};

/// Everything a subcommand needs, loaded once in `main`.
pub struct AppContext {
    pub config: VectraceConfig,
    pub schema: Schema,
}

impl AppContext {
    /// Load the config file and the parameter schema it points at.
    pub fn load(cli: &Cli) -> Result<Self, StageError> {
        let config = VectraceConfig::load(&cli.config).stage(Stage::Configuration)?;
        let schema = Schema::load_or_embedded(config.tracer.schema_path())
            .stage(Stage::Configuration)?;
        debug!("config"; "{} tracer parameters", schema.len());
        Ok(Self { config, schema })
    }

    pub fn open_profiles(&self) -> Result<ProfileStore, StageError> {
        ProfileStore::open(&self.config.profiles.path).stage(Stage::Configuration)
    }

    /// Build a command from the schema and apply `overrides`.
    ///
    /// Every enabled value is checked against the schema afterwards, so a
    /// profile saved with an older schema cannot smuggle in a bad value.
    pub fn build_command(&self, overrides: &ParamOverrides) -> Result<Command, StageError> {
        let events = logger::is_verbose().then(unbounded::<ParameterEvent>);
        let listener = events
            .as_ref()
            .map(|(tx, _)| Box::new(tx.clone()) as Box<dyn CommandListener + Send>);

        let mut command = self
            .schema
            .build_command(&self.config.tracer.program, listener)
            .stage(Stage::Configuration)?;

        self.apply_overrides(&mut command, overrides)
            .map_err(|err| StageError::new(Stage::Configuration, err))?;

        if let Some((_, rx)) = &events {
            log_events(rx);
        }
        command.set_listener(None);
        Ok(command)
    }

    fn apply_overrides(
        &self,
        command: &mut Command,
        overrides: &ParamOverrides,
    ) -> anyhow::Result<()> {
        if let Some(name) = &overrides.profile {
            ProfileStore::open(&self.config.profiles.path)?.apply(name, command)?;
        }

        for name in &overrides.enable {
            self.check_adjustable(name)?;
            command.set_parameter_enabled(name, true, true)?;
        }
        for name in &overrides.disable {
            self.check_adjustable(name)?;
            command.set_parameter_enabled(name, false, true)?;
        }
        for (name, value) in &overrides.set {
            self.check_adjustable(name)?;
            self.schema.check_value(name, value)?;
            command.set_parameter_value(name, value, true)?;
            command.set_parameter_enabled(name, true, true)?;
        }

        for parameter in command.parameters().iter().filter(|p| p.enabled()) {
            self.schema.check_value(parameter.name(), parameter.value())?;
        }
        Ok(())
    }

    /// File parameters are set from the positional input and `--output`.
    fn check_adjustable(&self, name: &str) -> anyhow::Result<()> {
        let spec = self
            .schema
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown parameter `{name}`"))?;
        if spec.is_file() {
            anyhow::bail!("`{name}` is set from the command line arguments, not with overrides");
        }
        if !spec.optional {
            anyhow::bail!("`{name}` is always passed and cannot be switched");
        }
        Ok(())
    }
}

/// Optimizer for output traced with `command`.
pub fn optimizer_for(command: &Command, grouping: Grouping) -> Result<Optimizer, StageError> {
    let centerline = command
        .parameter_enabled(CENTERLINE)
        .stage(Stage::Configuration)?;
    let background = if command
        .parameter_enabled(BACKGROUND_COLOR)
        .stage(Stage::Configuration)?
    {
        Some(
            command
                .parameter_value(BACKGROUND_COLOR)
                .stage(Stage::Configuration)?
                .to_owned(),
        )
    } else {
        None
    };

    Ok(Optimizer::new(grouping)
        .background(background)
        .centerline(centerline))
}

fn log_events(rx: &Receiver<ParameterEvent>) {
    for event in rx.try_iter() {
        let name = event.name();
        match &event {
            ParameterEvent::Enabled { enabled, .. } => {
                debug!("param"; "{name} {}", if *enabled { "on" } else { "off" });
            }
            ParameterEvent::Value { value, .. } => {
                debug!("param"; "{name} = {value:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::INPUT_FILE;

    fn context() -> AppContext {
        AppContext {
            config: VectraceConfig::default(),
            schema: Schema::embedded().unwrap(),
        }
    }

    #[test]
    fn test_overrides_applied_in_order() {
        let overrides = ParamOverrides {
            enable: vec!["centerline".into(), "color-count".into()],
            disable: vec!["color-count".into()],
            set: vec![("corner-threshold".into(), "90".into())],
            ..Default::default()
        };
        let command = context().build_command(&overrides).unwrap();

        assert!(command.parameter_enabled("centerline").unwrap());
        assert!(!command.parameter_enabled("color-count").unwrap());
        assert!(command.parameter_enabled("corner-threshold").unwrap());
        assert_eq!(command.parameter_value("corner-threshold").unwrap(), "90");
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        let overrides = ParamOverrides {
            set: vec![("corner-threshold".into(), "400".into())],
            ..Default::default()
        };
        let err = context().build_command(&overrides).unwrap_err();
        assert_eq!(err.stage, Stage::Configuration);
        assert!(err.to_string().contains("corner-threshold"));
    }

    #[test]
    fn test_file_parameters_not_adjustable() {
        let overrides = ParamOverrides {
            set: vec![(INPUT_FILE.into(), "x.png".into())],
            ..Default::default()
        };
        assert!(context().build_command(&overrides).is_err());

        let overrides = ParamOverrides {
            disable: vec!["output-format".into()],
            ..Default::default()
        };
        assert!(context().build_command(&overrides).is_err());
    }

    #[test]
    fn test_unknown_parameter() {
        let overrides = ParamOverrides {
            enable: vec!["no-such-option".into()],
            ..Default::default()
        };
        let err = context().build_command(&overrides).unwrap_err();
        assert!(err.to_string().contains("no-such-option"));
    }

    #[test]
    fn test_profile_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context();
        ctx.config.profiles.path = dir.path().join("profiles.toml");

        let mut store = ctx.open_profiles().unwrap();
        let mut sketch = ctx.build_command(&ParamOverrides::default()).unwrap();
        sketch.set_parameter_enabled(CENTERLINE, true, false).unwrap();
        store.save("sketch", &sketch).unwrap();
        store.flush().unwrap();

        let overrides = ParamOverrides {
            profile: Some("sketch".into()),
            ..Default::default()
        };
        let command = ctx.build_command(&overrides).unwrap();
        assert!(command.parameter_enabled(CENTERLINE).unwrap());
    }

    #[test]
    fn test_optimizer_settings_from_command() {
        let overrides = ParamOverrides {
            enable: vec![CENTERLINE.into()],
            set: vec![(BACKGROUND_COLOR.into(), "EEEEEE".into())],
            ..Default::default()
        };
        let command = context().build_command(&overrides).unwrap();
        let optimizer = optimizer_for(&command, Grouping::Flat).unwrap();

        let doc = crate::optimize::SvgDocument::parse(
            r#"<svg width="1" height="1"><path style="stroke:#000000; fill:none;" d="M0 0"/></svg>"#,
        )
        .unwrap();
        let rendered = optimizer.render(&doc).unwrap();
        assert!(rendered.svg.contains(r##"<rect fill="#EEEEEE""##));
        assert!(rendered.svg.contains(r##"stroke="#000000""##));
    }
}
