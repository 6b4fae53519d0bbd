//! Rule-based weak labeling.
//!
//! `CategoryCatalog` holds the per-category signals, `RuleScorer` turns them
//! into a weighted score per category, and `WeakLabeler` picks the winner.
//! Runs offline only; it never feeds the online predictor.

pub mod catalog;
pub mod labeler;
pub mod scorer;

pub use catalog::{CatalogFile, CategoryCatalog, CategoryDefinition, CategoryRules};
pub use labeler::WeakLabeler;
pub use scorer::RuleScorer;
