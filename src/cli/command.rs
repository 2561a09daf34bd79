//! `vectrace command`: show what would be run.

use anyhow::Result;

use crate::cli::{ParamOverrides, common::AppContext};

pub fn run(ctx: &AppContext, overrides: &ParamOverrides, argv: bool) -> Result<()> {
    let command = ctx.build_command(overrides)?;
    if argv {
        for token in command.command_args()? {
            println!("{token}");
        }
    } else {
        println!("{}", command.command()?);
    }
    Ok(())
}
