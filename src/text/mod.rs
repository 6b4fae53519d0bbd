//! Text normalization: the canonical representation fed to both the rule
//! scorer and the statistical feature transformer.

pub mod lemma;
pub mod normalizer;
pub mod stop_words;

pub use normalizer::TextNormalizer;
