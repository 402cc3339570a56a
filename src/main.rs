use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use udyam::cli::{Cli, Commands};

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

    // Logs go to stderr so they never mix with wizard output or payloads
    let default_level = if global.verbose { "udyam=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Fill(args) => udyam::cli::commands::fill::run(args, &global),
        Commands::Check(args) => udyam::cli::commands::check::run(args, &global),
        Commands::Validate(args) => udyam::cli::commands::validate::run(args, &global),
        Commands::Schema(cmd) => udyam::cli::commands::schema::run(cmd, &global),
        Commands::Config(cmd) => udyam::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => udyam::cli::commands::completions::run(args),
    }
}
