use crate::path::{format_path, parse_path, parse_sample_mutations, LineagePaths, SampleMutations};
use color_eyre::eyre::{Report, Result};

fn to_strings(steps: &[Vec<crate::mutation::Substitution>]) -> Vec<Vec<String>> {
    steps.iter().map(|s| s.iter().map(|m| m.to_string()).collect()).collect()
}

#[test]
fn parse_path_whitespace_and_delimiters() {
    assert_eq!(parse_path(" > T123C >G456A> "), [vec!["T123C"], vec!["G456A"]]);
    assert_eq!(parse_path("A1T,C2G>G3A"), [vec!["A1T", "C2G"], vec!["G3A"]]);
    // blank path entries survive parsing, they are dropped as empty barcode columns
    assert_eq!(parse_path("C241T >  > C3037T"), [vec!["C241T"], vec![""], vec!["C3037T"]]);
}

#[test]
fn parse_path_round_trip() {
    let raw = ">T123C>G456A,C789T>A1G";
    let steps = parse_path(raw);
    assert_eq!(format_path(&steps), "T123C > G456A,C789T > A1G");
    assert_eq!(parse_path(&format_path(&steps)), steps);
}

#[test]
fn sample_mutations_reversed() -> Result<(), Report> {
    let steps = parse_sample_mutations("gene1:A123T,C456G")?;
    assert_eq!(to_strings(&steps), [vec!["A123T", "C456G"]]);

    let steps = parse_sample_mutations("node_1:A1G>node_2:G1T,C5A node_3:T7C")?;
    assert_eq!(to_strings(&steps), [vec!["T7C"], vec!["G1T", "C5A"], vec!["A1G"]]);
    Ok(())
}

#[test]
fn sample_mutations_skip_empty_steps() -> Result<(), Report> {
    assert!(parse_sample_mutations("")?.is_empty());
    // labels without mutations, and dangling commas
    let steps = parse_sample_mutations("node_1:>node_2:A1T,:C2G")?;
    assert_eq!(to_strings(&steps), [vec!["A1T"]]);
    Ok(())
}

#[test]
fn sample_mutations_invalid() {
    assert!(parse_sample_mutations("node_1:AXT").is_err());
}

#[test]
fn read_write_lineage_paths() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("lineagePaths.txt");
    std::fs::write(
        &input,
        "clade\tfrom_tree_root\nA\t>T123C>G456A\nB\t>C789T\nEmpty\nA\t>A1T\n",
    )?;

    let mut paths = LineagePaths::read(&input)?;
    assert_eq!(paths.paths.len(), 4);
    assert_eq!(paths.paths[2].steps, [vec![""]]);

    paths.dedup();
    let clades: Vec<_> = paths.paths.iter().map(|p| p.clade.as_str()).collect();
    assert_eq!(clades, ["B", "Empty", "A"]);

    let output = dir.path().join("out.tsv");
    paths.write(&output)?;
    let expected = "clade\tfrom_tree_root\nB\tC789T\nEmpty\t\nA\tA1T\n";
    assert_eq!(std::fs::read_to_string(&output)?, expected);
    Ok(())
}

#[test]
fn read_lineage_paths_missing_header() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("bad.tsv");
    std::fs::write(&input, "name\tpath\nA\t>T123C\n")?;
    assert!(LineagePaths::read(&input).is_err());
    Ok(())
}

#[test]
fn read_sample_mutations() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("samplePaths.txt");
    std::fs::write(&input, "sampleA\tgene1:A123T,C456G\nsampleB\tgene1:G789A\nsampleC\t\n")?;

    let samples = SampleMutations::read(&input)?;
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].sample, "sampleA");
    assert_eq!(samples[0].mutations.as_deref(), Some("gene1:A123T,C456G"));
    assert_eq!(samples[2].mutations, None);
    assert!(samples[2].steps()?.is_empty());
    Ok(())
}
