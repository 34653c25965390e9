use crate::cli::{Command, Verbosity};
use crate::Cli;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn parse_barcode() {
    let input = ["barcodeforge", "barcode", "-l", "paths.tsv", "-v", "debug"];
    let args = Cli::parse_from(input);
    assert_eq!(args.verbosity, Verbosity::Debug);
    assert_eq!(args.verbosity.to_string(), "debug");

    let Command::Barcode(args) = args.command else { panic!("expected the barcode command") };
    assert_eq!(args.lineage_paths, PathBuf::from("paths.tsv"));
    assert_eq!(args.output, PathBuf::from("barcode.csv"));
    assert_eq!(args.prefix, None);
}

#[test]
fn parse_reroot_defaults() {
    let input = [
        "barcodeforge",
        "reroot",
        "--sample-mutations",
        "samplePaths.txt",
        "--reference",
        "ref.fasta",
        "--sequences",
        "aln.fasta.zst",
        "--lineage-paths",
        "lineagePaths.txt",
    ];
    let Command::Reroot(args) = Cli::parse_from(input).command else {
        panic!("expected the reroot command")
    };
    assert_eq!(args.sequences, PathBuf::from("aln.fasta.zst"));
    assert_eq!(args.output_additional, PathBuf::from("additional_mutations.tsv"));
    assert_eq!(args.output_lineage_paths, PathBuf::from("rerooted_lineage_paths.txt"));
}

#[test]
fn reroot_requires_inputs() {
    assert!(Cli::try_parse_from(["barcodeforge", "reroot", "-s", "samplePaths.txt"]).is_err());
    assert!(Cli::try_parse_from(["barcodeforge", "check"]).is_err());
}
