//! `vectrace profile`: list, show, save and delete settings profiles.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::{
    cli::{ParamOverrides, ProfileAction, common::AppContext},
    error::{Stage, StageExt},
    log,
    profile::{DEFAULT_PROFILE, ProfileStore},
};

pub fn run(ctx: &AppContext, action: &ProfileAction) -> Result<()> {
    let mut store = ctx.open_profiles()?;

    match action {
        ProfileAction::List => {
            for name in store.names() {
                if name == DEFAULT_PROFILE {
                    println!("{}", name.dimmed());
                } else {
                    println!("{name}");
                }
            }
        }
        ProfileAction::Show { name } => println!("{}", show(ctx, &store, name)?),
        ProfileAction::Save { name, overrides } => save(ctx, &mut store, name, overrides)?,
        ProfileAction::Delete { name } => {
            store.delete(name).stage(Stage::Configuration)?;
            store.flush().stage(Stage::Configuration)?;
            log!("profile"; "deleted {name}");
        }
    }
    Ok(())
}

/// Command string for `name`. `default` is computed, never stored.
fn show(ctx: &AppContext, store: &ProfileStore, name: &str) -> Result<String> {
    if name == DEFAULT_PROFILE {
        let command = ctx.build_command(&ParamOverrides::default())?;
        return Ok(command.default_command().to_owned());
    }
    store
        .get(name)
        .map(str::to_owned)
        .ok_or_else(|| anyhow::anyhow!("no profile named `{name}`"))
        .stage(Stage::Configuration)
        .map_err(Into::into)
}

fn save(
    ctx: &AppContext,
    store: &mut ProfileStore,
    name: &str,
    overrides: &ParamOverrides,
) -> Result<()> {
    let command = ctx.build_command(overrides)?;
    let replaced = store.save(name, &command).stage(Stage::Configuration)?;
    store.flush().stage(Stage::Configuration)?;

    let verb = if replaced { "updated" } else { "saved" };
    log!("profile"; "{verb} {name} in {}", store.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::Schema, config::VectraceConfig};

    fn context(dir: &std::path::Path) -> AppContext {
        let mut config = VectraceConfig::default();
        config.profiles.path = dir.join("profiles.toml");
        AppContext {
            config,
            schema: Schema::embedded().unwrap(),
        }
    }

    #[test]
    fn test_save_show_delete() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let overrides = ParamOverrides {
            enable: vec!["centerline".into()],
            ..Default::default()
        };
        run(
            &ctx,
            &ProfileAction::Save {
                name: "sketch".into(),
                overrides,
            },
        )
        .unwrap();

        let store = ctx.open_profiles().unwrap();
        let shown = show(&ctx, &store, "sketch").unwrap();
        assert!(shown.contains("-centerline"));

        run(
            &ctx,
            &ProfileAction::Delete {
                name: "sketch".into(),
            },
        )
        .unwrap();
        let store = ctx.open_profiles().unwrap();
        assert!(show(&ctx, &store, "sketch").is_err());
    }

    #[test]
    fn test_show_default() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let store = ctx.open_profiles().unwrap();
        assert_eq!(
            show(&ctx, &store, DEFAULT_PROFILE).unwrap(),
            "autotrace -output-file -output-format svg"
        );
    }
}
