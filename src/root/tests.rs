use crate::error::Error;
use crate::path::{parse_sample_mutations, SampleMutations};
use crate::root::{self, AdditionalMutations, RootMutation};
use crate::sequence::Record;
use color_eyre::eyre::{Report, Result};
use std::collections::BTreeMap;

fn record(id: &str, sequence: &str) -> Record {
    Record { id: id.to_string(), sequence: sequence.chars().collect(), genome_length: sequence.len() }
}

fn sample(id: &str, mutations: Option<&str>) -> SampleMutations {
    SampleMutations { sample: id.to_string(), mutations: mutations.map(String::from) }
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn reverse_to_root_single_step() -> Result<(), Report> {
    let steps = parse_sample_mutations("gene1:A1G,C2T")?;
    let root_muts = root::reverse_to_root(&steps);
    let expected = BTreeMap::from([
        (1, RootMutation { base: 'G', root: 'A' }),
        (2, RootMutation { base: 'T', root: 'C' }),
    ]);
    assert_eq!(root_muts, expected);
    assert!(root::reverse_to_root(&[]).is_empty());
    Ok(())
}

#[test]
fn reverse_to_root_reversion() -> Result<(), Report> {
    // root --A5G--> node --G5A--> tip: the tip base and the root base are both A
    let steps = parse_sample_mutations("node_1:A5G>node_2:G5A")?;
    let root_muts = root::reverse_to_root(&steps);
    assert_eq!(root_muts[&5], RootMutation { base: 'A', root: 'A' });
    Ok(())
}

#[test]
fn construct_root_sequence() -> Result<(), Report> {
    let tip = record("tip", "GATTACA");
    let root_muts = BTreeMap::from([
        (1, RootMutation { base: 'G', root: 'A' }),
        (3, RootMutation { base: 'T', root: 'C' }),
    ]);
    let observed = root::construct_root_sequence(&root_muts, &tip)?;
    assert_eq!(observed, chars("AACTACA"));

    let outside = BTreeMap::from([(8, RootMutation { base: 'G', root: 'A' })]);
    assert!(root::construct_root_sequence(&outside, &tip).is_err());
    Ok(())
}

#[test]
fn derive_root_sequence_majority() -> Result<(), Report> {
    let candidates = [chars("AGTC"), chars("AGCC"), chars("AATC")];
    assert_eq!(root::derive_root_sequence(&candidates)?, chars("AGTC"));
    Ok(())
}

#[test]
fn derive_root_sequence_ties_and_ambiguity() -> Result<(), Report> {
    // pos 1: tie between C and A, C seen first
    // pos 2: R is dropped since candidates disagree
    // pos 3: unanimous ambiguity codes are kept
    // pos 4: nothing survives the filter
    let candidates = [chars("CRYR"), chars("AGYY")];
    assert_eq!(root::derive_root_sequence(&candidates)?, chars("CGYN"));
    Ok(())
}

#[test]
fn derive_root_sequence_errors() {
    let observed = root::derive_root_sequence(&[]).unwrap_err();
    assert_eq!(observed.downcast_ref::<Error>(), Some(&Error::NoRootSequence));

    let unaligned = [chars("ACGT"), chars("ACG")];
    assert!(root::derive_root_sequence(&unaligned).is_err());
}

#[test]
fn compare_sequences() {
    let additional = AdditionalMutations::from_comparison(&chars("ACGTACGT"), &chars("GCGNCCGt"));
    // position 4 is skipped (N), position 8 matches ignoring case
    assert_eq!(additional.tokens(), ["A1G", "A5C"]);
}

#[test]
fn direct_mode_reference_present() -> Result<(), Report> {
    let reference = record("ref_genome", "AAAAAAAAAA");
    let samples = [sample("ref_genome", Some("geneX:A1T")), sample("sampleA", Some("gene1:A2G"))];

    let additional = root::additional_mutations(&samples, &reference, &BTreeMap::new())?;
    let expected = BTreeMap::from([(
        1,
        root::AdditionalMutation { coord: 1, reference: 'T', root: 'A' },
    )]);
    assert_eq!(additional.mutations, expected);
    Ok(())
}

#[test]
fn inference_mode_no_differences() -> Result<(), Report> {
    let reference = record("ref_genome", "AAAAAAAAAA");
    let samples = [
        sample("sampleA", Some("gene1:A2T,A8G")),
        sample("sampleB", Some("gene1:A7G")),
        sample("sampleC", None),
    ];
    let sequences = BTreeMap::from([
        ("sampleA".to_string(), record("sampleA", "ATAAAAAGAA")),
        ("sampleB".to_string(), record("sampleB", "AAAAAAGAAA")),
        ("sampleC".to_string(), record("sampleC", "AAAAAAAAAA")),
    ]);

    let additional = root::additional_mutations(&samples, &reference, &sequences)?;
    assert!(additional.is_empty());
    Ok(())
}

#[test]
fn inference_mode_root_differs() -> Result<(), Report> {
    // both samples descend from a root with C at position 3
    let reference = record("ref_genome", "AAAAA");
    let samples = [
        sample("sampleA", Some("node_1:C3G")),
        sample("sampleB", Some("node_1:A1T")),
        sample("sampleMissing", Some("node_1:C3T")),
    ];
    let sequences = BTreeMap::from([
        ("sampleA".to_string(), record("sampleA", "AAGAA")),
        ("sampleB".to_string(), record("sampleB", "TACAA")),
    ]);

    let root_sequence = root::infer_root_sequence(&samples, &sequences)?;
    assert_eq!(root_sequence, chars("AACAA"));

    let additional = root::additional_mutations(&samples, &reference, &sequences)?;
    assert_eq!(additional.tokens(), ["A3C"]);
    Ok(())
}

#[test]
fn inference_mode_no_overlap() {
    let reference = record("ref_genome", "AAAAAAAAAA");
    let samples = [sample("sampleD", Some("gene1:A1T")), sample("sampleE", Some("gene1:C2G"))];
    let sequences = BTreeMap::from([
        ("sampleA".to_string(), record("sampleA", "ATGC")),
        ("sampleB".to_string(), record("sampleB", "CGTA")),
    ]);

    let observed = root::additional_mutations(&samples, &reference, &sequences).unwrap_err();
    assert_eq!(observed.downcast_ref::<Error>(), Some(&Error::NoRootSequence));
}

#[test]
fn additional_mutations_table() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("additional_mutations.tsv");

    let mut additional = AdditionalMutations::new();
    additional.insert(10, 'G', 'A');
    additional.insert(1, 'T', 'A');
    additional.write(&path)?;

    assert_eq!(std::fs::read_to_string(&path)?, "position\tref\troot\n1\tT\tA\n10\tG\tA\n");
    assert_eq!(AdditionalMutations::read(&path)?, additional);

    // headers are written even without mutations
    AdditionalMutations::new().write(&path)?;
    assert_eq!(std::fs::read_to_string(&path)?, "position\tref\troot\n");
    assert!(AdditionalMutations::read(&path)?.is_empty());
    Ok(())
}
