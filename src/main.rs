mod calendar;
mod cli;
mod error;
mod fmt;
mod grid;
mod importer;
mod models;
#[cfg(feature = "pdf")]
mod pdf;
mod profile;
mod schema;
#[cfg(feature = "xlsx")]
mod xlsx;

use clap::{CommandFactory, Parser};

#[cfg(any(feature = "pdf", feature = "xlsx"))]
use cli::ExportCommands;
use cli::{Cli, Commands, ProfileCommands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        #[cfg(any(feature = "pdf", feature = "xlsx"))]
        Commands::Export { command } => match command {
            #[cfg(feature = "pdf")]
            ExportCommands::Pdf {
                request,
                rows,
                month,
                category,
                product,
                kind,
                profile,
                output,
            } => cli::export::pdf(request, rows, month, &category, &product, &kind, profile, output),
            #[cfg(feature = "xlsx")]
            ExportCommands::Xlsx {
                request,
                rows,
                month,
                category,
                product,
                kind,
                profile,
                output,
            } => cli::export::xlsx(request, rows, month, &category, &product, &kind, profile, output),
        },
        Commands::Report {
            request,
            rows,
            month,
            category,
            product,
            kind,
        } => cli::report::preview(request, rows, month, &category, &product, &kind),
        Commands::Profile { command } => match command {
            ProfileCommands::Show => cli::profile::show(),
            ProfileCommands::Set { file } => cli::profile::set(&file),
            ProfileCommands::Clear => cli::profile::clear(),
        },
        #[cfg(any(feature = "pdf", feature = "xlsx"))]
        Commands::Demo { output_dir } => cli::demo::run(output_dir),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "alokasi", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
