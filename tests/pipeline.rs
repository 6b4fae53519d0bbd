//! End-to-end tests: weak labeling → training → artifact → inference.

use std::sync::Arc;

use email_categorizer::cli::commands::label_emails;
use email_categorizer::corpus;
use email_categorizer::error::ConfigError;
use email_categorizer::model::{InferenceEngine, ModelTrainer, TrainingConfig};
use email_categorizer::pipeline::{Categorizer, ConfidenceKind, Email};
use email_categorizer::rules::{CategoryCatalog, WeakLabeler};

fn raw_emails() -> Vec<Email> {
    vec![
        Email::new("f1", "Invoice due", "Please pay your invoice").with_sender("billing@invoice.acme.com"),
        Email::new("f2", "Your bank statement", "Your account balance and credit summary")
            .with_sender("alerts@bank.example.com"),
        Email::new("f3", "Payment received", "We received your payment for the invoice")
            .with_sender("noreply@paypal.com"),
        Email::new("f4", "Tax statement ready", "Your investment and tax documents")
            .with_sender("docs@finance.example.com"),
        Email::new("s1", "Order shipped", "Your order is on its way, tracking attached")
            .with_sender("ship@amazon.com"),
        Email::new("s2", "Order confirmation", "Thanks for your purchase of this product")
            .with_sender("orders@shop.example.com"),
        Email::new("s3", "Delivery update", "Your delivery tracking number for the order")
            .with_sender("info@store.example.com"),
        Email::new("s4", "Big sale", "Discount deal on every item in your cart")
            .with_sender("deals@ebay.com"),
        Email::new("h1", "Appointment reminder", "Your doctor appointment at the clinic")
            .with_sender("frontdesk@clinic.example.com"),
        Email::new("h2", "Prescription ready", "Your medication prescription is ready")
            .with_sender("pharmacy@health.example.com"),
        Email::new("h3", "Medical results", "Your patient portal has new medical results")
            .with_sender("portal@hospital.example.com"),
    ]
}

#[test]
fn labels_train_save_load_and_predict() {
    let dir = tempfile::tempdir().unwrap();
    let labeler = WeakLabeler::new(Arc::new(CategoryCatalog::default_catalog()));

    let examples = label_emails(&labeler, &raw_emails(), 0.0);
    assert_eq!(examples.len(), 11);
    assert!(examples.iter().all(|e| !e.text.is_empty()));

    let dataset = dir.path().join("labeled.jsonl");
    corpus::write_labeled(&dataset, &examples).unwrap();
    let examples = corpus::read_labeled(&dataset).unwrap();

    let trainer = ModelTrainer::new(TrainingConfig {
        test_fraction: 0.0,
        ..TrainingConfig::default()
    });
    let outcome = trainer.run(&examples).unwrap();
    assert!(outcome.report.is_none());

    let model_path = dir.path().join("models").join("email_classifier.json");
    outcome.artifact.save(&model_path).unwrap();

    let engine = InferenceEngine::load(&model_path).unwrap();
    assert_eq!(engine.labels(), &["FINANCE", "HEALTH", "SHOPPING"]);

    let (category, confidence) = engine.predict("Invoice payment from your bank").unwrap();
    assert_eq!(category, "FINANCE");
    assert!(confidence > 0.0 && confidence <= 1.0);

    let (category, _) = engine.predict("Your order has shipped, track the delivery").unwrap();
    assert_eq!(category, "SHOPPING");

    let (category, _) = engine.predict("Doctor appointment at the clinic").unwrap();
    assert_eq!(category, "HEALTH");
}

#[test]
fn both_strategies_share_the_categorizer_capability() {
    let labeler = WeakLabeler::new(Arc::new(CategoryCatalog::default_catalog()));
    let examples = label_emails(&labeler, &raw_emails(), 0.0);
    let artifact = ModelTrainer::default().train_examples(&examples).unwrap();
    let engine = InferenceEngine::from_artifact(artifact).unwrap();

    let strategies: Vec<Box<dyn Categorizer>> = vec![Box::new(labeler), Box::new(engine)];
    let email = Email::new("x", "Invoice due", "Please pay your invoice")
        .with_sender("billing@invoice.acme.com");

    let kinds: Vec<ConfidenceKind> = strategies
        .iter()
        .map(|s| s.categorize(&email).unwrap().kind)
        .collect();
    assert_eq!(kinds, vec![ConfidenceKind::RuleScore, ConfidenceKind::Probability]);
    for strategy in &strategies {
        assert_eq!(strategy.categorize(&email).unwrap().category, "FINANCE");
    }
}

#[test]
fn startup_fails_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let err = InferenceEngine::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::ArtifactMissing { .. }));
}

#[test]
fn startup_fails_on_malformed_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"version": "1", "vectorizer": null}"#).unwrap();
    let err = InferenceEngine::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedArtifact { .. }));
}

#[test]
fn eml_corpus_feeds_the_labeler() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("001.eml"),
        "From: Billing <billing@invoice.acme.com>\r\nSubject: Invoice due\r\nMessage-ID: <m1@acme.com>\r\n\r\nPlease pay your invoice.\r\n",
    )
    .unwrap();

    let emails = corpus::read_emails(dir.path()).unwrap();
    let labeler = WeakLabeler::new(Arc::new(CategoryCatalog::default_catalog()));
    let decision = labeler.label(&emails[0]);
    assert_eq!(decision.email_id, "m1@acme.com");
    assert_eq!(decision.category, "FINANCE");
    assert_eq!(decision.score, 21);
}
