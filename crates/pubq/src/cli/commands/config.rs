//! Implementation of `pubq config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows the contributing config files and the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let painter = ctx.painter;

    if config.sources.is_empty() {
        println!("{}", painter.dim("# no config files found, using defaults"));
    } else {
        println!("{}", painter.dim("# config files, highest precedence first:"));
        for source in &config.sources {
            let scope = if source.is_global { "global" } else { "local" };
            println!(
                "{}",
                painter.dim(&format!("#   {} ({scope})", source.path.display()))
            );
        }
    }
    println!();
    print!("{}", painter.toml(&config.settings_to_toml()));

    for warning in config.validate() {
        eprintln!("{}", painter.warning(&format!("warning: {warning}")));
    }

    ExitCode::SUCCESS
}
