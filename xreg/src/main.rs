mod cli;
mod commands;
mod dns;
mod error;
mod profiles;
mod util;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use cli::{CliOpts, Commands, DnsCommand, ProfileCommand};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(opts: CliOpts) -> error::Result<()> {
    let registry = opts.registry.as_path();
    let profiles = opts.profiles.as_path();

    match opts.cmd {
        Commands::List { json, orphans } => commands::list(registry, json, orphans),
        Commands::Get { key } => commands::get(registry, &key),
        Commands::Set {
            value_type,
            key,
            value,
        } => commands::set(registry, value_type, &key, &value),
        Commands::Dns { cmd } => match cmd {
            DnsCommand::Show { json } => commands::dns::show(registry, json),
            DnsCommand::Set {
                mode,
                primary,
                secondary,
            } => commands::dns::set(registry, mode, primary, secondary),
        },
        Commands::Profile { cmd } => match cmd {
            ProfileCommand::List => commands::profile::list(profiles, registry),
            ProfileCommand::Add {
                name,
                primary,
                secondary,
            } => commands::profile::add(profiles, name, primary, secondary),
            ProfileCommand::Remove { name } => commands::profile::remove(profiles, &name),
            ProfileCommand::Apply { name } => commands::profile::apply(profiles, registry, &name),
        },
    }
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    run(opts)?;
    Ok(())
}
