//! Email categorizer: rule-based weak labeling feeding a TF-IDF + Naive
//! Bayes classifier, served over HTTP.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod service;
pub mod text;
