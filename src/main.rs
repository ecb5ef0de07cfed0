use clap::Parser;
use spectra_ingest::cli::{args::Args, commands};
use std::process;
use tracing::debug;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(summary) => {
            debug!(
                "Done: {} files, {} failed, {} points, {} warnings in {:?}",
                summary.files_processed,
                summary.files_failed,
                summary.points_written,
                summary.warnings_raised,
                summary.processing_time
            );
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Spectra Ingest - Spectral Data File Importer");
    println!("============================================");
    println!();
    println!("Turn FITS tables, JCAMP-DX spectra and spectrometer CSV/TSV exports");
    println!("into canonical X/Y series with units and a record of every decision.");
    println!();
    println!("USAGE:");
    println!("    spectra-ingest <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    preview     Inspect a file and propose an X/Y mapping");
    println!("    commit      Parse a file into a canonical X/Y series (JSON)");
    println!("    scan        Preview every file below a directory");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # See what the importer makes of a file:");
    println!("    spectra-ingest preview spectrum.csv");
    println!();
    println!("    # Commit with an explicit mapping and units:");
    println!("    spectra-ingest commit spectrum.csv -x 0 -y 2 --x-unit nm -o spectrum.json");
    println!();
    println!("    # Pick the HDU of a multi-table FITS file:");
    println!("    spectra-ingest commit lightcurve.fits.gz --hdu 1");
    println!();
    println!("    # Survey a directory of uploads:");
    println!("    spectra-ingest scan ./uploads");
    println!();
    println!("For detailed help on any command, use:");
    println!("    spectra-ingest <COMMAND> --help");
}
