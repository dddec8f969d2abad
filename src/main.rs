use clap::Parser;
use fua::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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
    let global = cli.global;

    match cli.command {
        Commands::Document(cmd) => fua::cli::commands::document::run(cmd, &global),
        Commands::Content(cmd) => fua::cli::commands::content::run(cmd, &global),
        Commands::Car(cmd) => fua::cli::commands::car::run(cmd, &global),
        Commands::Config(cmd) => fua::cli::commands::config::run(cmd, &global),
    }
}
