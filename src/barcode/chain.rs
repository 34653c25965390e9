//! Collapse consecutive mutations at the same site into one net mutation.
//!
//! A lineage that acquires `A1G` and later `G1T` has a net change of `A1T`
//! relative to the reference.

use crate::barcode::Barcodes;
use crate::mutation::{self, alt, flip, flip_site, site};
use color_eyre::eyre::{Report, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Two mutations at the same site, where the second continues from the alt base of the first.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Chain {
    pub first: String,
    pub second: String,
    /// Reference base of `first`, and alt base of `second`.
    pub combined: String,
}

impl Chain {
    /// Returns a chain if `second` continues from `first`, and does not simply revert it.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::barcode::Chain;
    ///
    /// let chain = Chain::new("A1G", "G1T").unwrap();
    /// assert_eq!(chain.combined, "A1T");
    /// // reversions are not chains
    /// assert!(Chain::new("A1G", "G1A").is_none());
    /// assert!(Chain::new("A1G", "C1T").is_none());
    /// ```
    pub fn new(first: &str, second: &str) -> Option<Self> {
        if flip_site(first) != site(second) || flip(first) == second {
            return None;
        }
        let combined = format!("{}{}", site(first), alt(second)?);
        Some(Chain { first: first.to_string(), second: second.to_string(), combined })
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} + {} => {}", self.first, self.second, self.combined)
    }
}

impl Barcodes {
    /// Returns the lineages in which both mutations of the chain are present.
    fn chain_lineages(&self, chain: &Chain) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(&chain.first) > 0 && row.get(&chain.second) > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Find chains that are observed together in at least one lineage.
    ///
    /// Only the first chain found for each combined genomic position is kept.
    pub fn identify_chains(&self) -> Result<Vec<Chain>, Report> {
        // columns by site (ex. G1), in column order
        let mut by_site: BTreeMap<&str, Vec<&String>> = BTreeMap::new();
        self.mutations.iter().for_each(|m| by_site.entry(site(m)).or_default().push(m));

        let mut positions = BTreeSet::new();
        let mut chains = Vec::new();

        for first in &self.mutations {
            let Some(seconds) = by_site.get(flip_site(first).as_str()) else { continue };
            for second in seconds {
                let Some(chain) = Chain::new(first, second) else { continue };
                if self.chain_lineages(&chain).is_empty() {
                    continue;
                }
                if positions.insert(mutation::position(&chain.combined)?) {
                    chains.push(chain);
                }
            }
        }

        Ok(chains)
    }

    /// Combine chained mutations until none remain.
    ///
    /// In every lineage where both mutations of a chain are present, the combined
    /// mutation is incremented and both constituents are decremented. Empty columns
    /// and reversions are then cleaned up, and chains are searched for again.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::barcode::Barcodes;
    /// use barcodeforge::path::{LineagePath, LineagePaths};
    ///
    /// let mut paths = LineagePaths::new();
    /// paths.paths.push(LineagePath::new("A", ">A1G>G1T"));
    ///
    /// let mut barcodes = Barcodes::from_paths(&paths);
    /// barcodes.check_mutation_chain()?;
    /// assert_eq!(barcodes.mutations, ["A1T"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn check_mutation_chain(&mut self) -> Result<(), Report> {
        let mut chains = self.identify_chains()?;

        while !chains.is_empty() {
            let mut columns: BTreeSet<String> = self.mutations.iter().cloned().collect();
            for chain in &chains {
                // lineages are evaluated after the previous chain was applied
                let lineages = self.chain_lineages(chain);
                debug!("Combining chain {chain} in {} lineages.", lineages.len());

                if columns.insert(chain.combined.clone()) {
                    self.mutations.push(chain.combined.clone());
                }
                for i in lineages {
                    let row = &mut self.rows[i];
                    row.add(&chain.combined, 1);
                    row.subtract(&chain.first, 1);
                    row.subtract(&chain.second, 1);
                }
            }

            self.drop_empty_columns();
            // combining can lead back to the reference base
            self.reversion_checking();
            chains = self.identify_chains()?;
        }

        Ok(())
    }
}
