//! `barcodeforge` creates lineage-defining mutation **barcodes** from phylogenetic placement paths.
//!
//! A barcode is a matrix of lineages by mutations, which describes the mutations
//! that characterize each lineage relative to the reference genome. Barcodes are
//! built in two steps:
//!
//! 1. [`reroot`]: Find the mutations between the reference and the root of the placement
//!    tree, either from the reference's own placement or by reconstructing the root from
//!    the aligned samples. These mutations are inserted into every lineage path.
//!
//! 1. [`barcode`]: Count the mutations on every lineage path, then collapse mutations
//!    that are later reverted, and mutations that stack on the same site, so that only
//!    each lineage's net changes remain.
//!
//! ## Examples
//!
//! ```rust
//! use barcodeforge::barcode::Barcodes;
//! use barcodeforge::path::{LineagePath, LineagePaths};
//!
//! let mut paths = LineagePaths::new();
//! paths.paths.push(LineagePath::new("A", ">T123C>G456A>C123T"));
//! paths.paths.push(LineagePath::new("B", ">C789T"));
//!
//! let mut barcodes = Barcodes::from_paths(&paths);
//! barcodes.reversion_checking();
//! barcodes.check_mutation_chain()?;
//! barcodes.finalize(None)?;
//!
//! assert_eq!(barcodes.mutations, ["G456A", "C789T"]);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

pub mod barcode;
pub mod cli;
pub mod error;
pub mod mutation;
pub mod path;
pub mod reroot;
pub mod root;
pub mod sequence;
pub mod table;
pub mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::error::Error;
#[doc(inline)]
pub use table::Table;
