use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub const CLASSIFY_CMD: &str = "classify";
pub const DEFAULT_OUT: &str = "out.txt";
pub const DEFAULT_MAPQ: &str = "10";
pub const DEFAULT_WINDOW: &str = "1000000";

pub fn create_classify_cli() -> Command {
    Command::new(CLASSIFY_CMD)
        .about("Count Crick and Watson reads per bin and assign a strand state to every bin of every cell.")
        .arg(
            Arg::new("bams")
                .value_name("BAM")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("One BAM file per cell, each with a single SM tag"),
        )
        .arg(
            Arg::new("mapq")
                .short('q')
                .long("mapq")
                .value_parser(value_parser!(u8))
                .default_value(DEFAULT_MAPQ)
                .help("Minimum mapping quality"),
        )
        .arg(
            Arg::new("window")
                .short('w')
                .long("window")
                .value_parser(value_parser!(u32))
                .default_value(DEFAULT_WINDOW)
                .conflicts_with("bins")
                .help("Width of fixed size bins in bp"),
        )
        .arg(
            Arg::new("bins")
                .short('b')
                .long("bins")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("exclude")
                .help("BED file of variable width bins"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .value_parser(value_parser!(PathBuf))
                .help("Chromosomes or regions to leave out of fixed size bins"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUT)
                .help("Labeled count table, gzipped when ending in .gz"),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .value_parser(value_parser!(PathBuf))
                .help("Write a summary of every cell"),
        )
        .arg(
            Arg::new("sample-info")
                .short('S')
                .long("sample-info")
                .value_parser(value_parser!(PathBuf))
                .help("Write the fitted dispersion of every sample"),
        )
        .arg(
            Arg::new("removed-bins")
                .short('R')
                .long("removed-bins")
                .value_parser(value_parser!(PathBuf))
                .help("Write bins excluded by the quality filter as BED"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file overriding model constants"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(value_parser!(usize))
                .help("Number of worker threads (default: one per core)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug messages"),
        )
}
