mod classify;
mod utils;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "strandhmm";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Strand state (CC/WC/WW) classification of genomic bins in single-cell Strand-seq data.")
        .subcommand_required(true)
        .subcommand(classify::cli::create_classify_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // CLASSIFY
        //
        Some((classify::cli::CLASSIFY_CMD, matches)) => {
            classify::handlers::run_classify(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
