use crate::mutation::{flip, flip_site, position, site, Substitution};
use color_eyre::eyre::{Report, Result};
use std::str::FromStr;

#[test]
fn substitution_display() -> Result<(), Report> {
    let sub = Substitution::from_str("C241T")?;
    assert_eq!(sub, Substitution { coord: 241, reference: 'C', alt: 'T' });
    assert_eq!(sub.to_string(), "C241T");
    assert_eq!(flip(&sub.to_string()), "T241C");
    Ok(())
}

#[test]
fn substitution_invalid() {
    assert!(Substitution::from_str("A1").is_err());
    assert!(Substitution::from_str("AxyT").is_err());
    assert!(Substitution::from_str("A0T").is_err());
}

#[test]
fn flip_is_involution() {
    for token in ["A123T", "G1C", "T29903A", "A1A"] {
        assert_eq!(flip(&flip(token)), token);
    }
    assert_eq!(flip("A123T"), "T123A");
}

#[test]
fn site_helpers() {
    assert_eq!(site("A1G"), "A1");
    assert_eq!(flip_site("A1G"), "G1");
    // A1G continues into G1T
    assert_eq!(flip_site("A1G"), site("G1T"));
    assert_eq!(site(""), "");
    assert_eq!(flip_site(""), "");
}

#[test]
fn position_parse() -> Result<(), Report> {
    assert_eq!(position("A123T")?, 123);
    assert!(position("").is_err());
    assert!(position("AT").is_err());
    Ok(())
}
