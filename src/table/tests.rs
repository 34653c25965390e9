use crate::Table;
use color_eyre::eyre::{Report, Result};

#[test]
fn write_then_read_tsv() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("table.tsv");

    let mut table = Table::new();
    table.headers = vec!["position", "ref", "root"];
    table.add_row(vec!["1", "T", "A"])?;
    table.write(&path, None)?;

    assert_eq!(std::fs::read_to_string(&path)?, "position\tref\troot\n1\tT\tA\n");

    let observed = Table::read(&path, None, true)?;
    assert_eq!(observed.headers, ["position", "ref", "root"]);
    assert_eq!(observed.rows, [["1", "T", "A"]]);
    assert_eq!(observed.get("root", 0)?, Some(&"A".to_string()));
    Ok(())
}

#[test]
fn read_without_headers_keeps_short_rows() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample_muts.txt");
    std::fs::write(&path, "sampleA\tgene1:A123T\r\nsampleC\n\n")?;

    let table = Table::read(&path, None, false)?;
    assert!(table.headers.is_empty());
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1], ["sampleC"]);
    Ok(())
}

#[test]
fn add_row_wrong_size() {
    let mut table = Table::new();
    table.headers = vec!["1", "2"];
    assert!(table.add_row(vec!["A"]).is_err());
}

#[test]
fn markdown() -> Result<(), Report> {
    let mut table = Table::new();
    table.headers = vec!["1", "2"];
    table.add_row(vec!["A", "BB"])?;
    let expected = "| 1 | 2  |\n|---|----|\n| A | BB |\n";
    assert_eq!(table.to_markdown(), expected);
    Ok(())
}

#[test]
fn write_then_read_quoted_csv() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("table.csv");

    let mut table = Table::new();
    table.headers = vec!["", "T123C"];
    table.add_row(vec!["A,1", "1"])?;
    table.add_row(vec!["say \"B\"", "0"])?;
    table.write(&path, None)?;

    let expected = ",T123C\n\"A,1\",1\n\"say \"\"B\"\"\",0\n";
    assert_eq!(std::fs::read_to_string(&path)?, expected);

    let observed = Table::read(&path, None, true)?;
    assert_eq!(observed.headers, ["", "T123C"]);
    assert_eq!(observed.rows, [["A,1", "1"], ["say \"B\"", "0"]]);
    Ok(())
}
