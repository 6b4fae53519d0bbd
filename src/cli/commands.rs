//! Command implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::args::*;
use crate::config::ServiceConfig;
use crate::corpus;
use crate::model::{InferenceEngine, LabeledExample, ModelTrainer, TrainingConfig};
use crate::pipeline::types::Email;
use crate::rules::{CategoryCatalog, WeakLabeler};
use crate::service;
use crate::text::TextNormalizer;

/// Execute a CLI command.
pub async fn execute_command(args: CategorizerArgs) -> Result<()> {
    match args.command {
        Command::Label(label_args) => label(label_args),
        Command::Train(train_args) => train(train_args),
        Command::Predict(predict_args) => predict(predict_args),
        Command::Serve(serve_args) => serve(serve_args).await,
    }
}

/// Weak-label raw emails and write the training dataset.
fn label(args: LabelArgs) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => CategoryCatalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => CategoryCatalog::default_catalog(),
    };
    info!(version = %catalog.version(), categories = catalog.len(), "Catalog loaded");

    let emails = corpus::read_emails(&args.input)
        .with_context(|| format!("reading emails from {}", args.input.display()))?;
    let examples = label_emails(&WeakLabeler::new(Arc::new(catalog)), &emails, args.min_confidence);
    corpus::write_labeled(&args.output, &examples)
        .with_context(|| format!("writing dataset {}", args.output.display()))?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for example in &examples {
        *counts.entry(example.category.as_str()).or_insert(0) += 1;
    }
    println!("Labeled {} of {} emails", examples.len(), emails.len());
    for (category, count) in counts {
        println!("  {category}: {count}");
    }
    Ok(())
}

/// Label and normalize emails, keeping those above `min_confidence` with
/// non-empty text.
pub fn label_emails(
    labeler: &WeakLabeler,
    emails: &[Email],
    min_confidence: f64,
) -> Vec<LabeledExample> {
    let normalizer = TextNormalizer::new();
    let decisions = labeler.label_batch(emails);

    let mut skipped = 0usize;
    let examples: Vec<LabeledExample> = emails
        .iter()
        .zip(decisions)
        .filter_map(|(email, decision)| {
            let text = normalizer.clean_email(&email.subject, &email.body);
            if decision.confidence < min_confidence || text.is_empty() {
                skipped += 1;
                return None;
            }
            Some(LabeledExample::new(text, decision.category))
        })
        .collect();

    if skipped > 0 {
        warn!(skipped, min_confidence, "Emails left out of the dataset");
    }
    examples
}

/// Train, evaluate and save a model.
fn train(args: TrainArgs) -> Result<()> {
    let examples = corpus::read_labeled(&args.dataset)
        .with_context(|| format!("reading dataset {}", args.dataset.display()))?;
    let trainer = ModelTrainer::new(TrainingConfig {
        max_features: args.max_features,
        alpha: args.alpha,
        test_fraction: args.test_fraction,
        seed: args.seed,
    });

    let outcome = trainer.run(&examples).context("training failed")?;
    outcome.artifact.save(&args.output)?;

    println!(
        "Trained on {} examples, evaluated on {}",
        outcome.train_size, outcome.test_size
    );
    match &outcome.report {
        Some(report) => println!("\n{report}"),
        None => println!("No held-out examples; evaluation skipped"),
    }
    println!("Model saved to {}", args.output.display());
    Ok(())
}

/// Categorize one email and print the result as JSON.
fn predict(args: PredictArgs) -> Result<()> {
    let engine = InferenceEngine::load(&args.model).context("loading model")?;
    let email = Email::new("cli", args.subject, args.body);
    let prediction = engine.predict_detailed(&email.text(), args.alternatives)?;
    let json = serde_json::to_string_pretty(&prediction)?;
    println!("{json}");
    Ok(())
}

/// Load the model, then serve until shutdown. A bad artifact stops here,
/// before any port is bound.
async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = ServiceConfig::from_env();
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let engine = InferenceEngine::load(&config.model_path).context("loading model")?;
    service::serve(config, engine).await.context("server stopped")?;
    Ok(())
}
