use clap::Parser;
use miette::Result;
use qct::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => qct::cli::commands::init::run(args),
        Commands::Exg(cmd) => qct::cli::commands::exg::run(cmd),
        Commands::Ord(cmd) => qct::cli::commands::ord::run(cmd),
        Commands::Control(args) => qct::cli::commands::control::run(args),
        Commands::Log(cmd) => qct::cli::commands::log::run(cmd),
    }
}
