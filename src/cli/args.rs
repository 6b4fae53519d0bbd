//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Email categorizer: weak labeling, training and serving.
#[derive(Parser, Debug, Clone)]
#[command(name = "email-categorizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Categorize emails with rule-based weak labels and a Naive Bayes model")]
pub struct CategorizerArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CategorizerArgs {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Weak-label raw emails into a training dataset
    Label(LabelArgs),

    /// Train and evaluate a model on a labeled dataset
    Train(TrainArgs),

    /// Categorize a single email with a trained model
    Predict(PredictArgs),

    /// Serve the categorization HTTP API
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// JSON Lines file of emails, or a directory of .eml files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the labeled dataset (JSON Lines)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Drop emails whose rule confidence is below this value
    #[arg(long, default_value_t = 0.0)]
    pub min_confidence: f64,

    /// Category catalog JSON; the built-in catalog is used when omitted
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled dataset (JSON Lines of {"text", "category"})
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "./models/email_classifier.json")]
    pub output: PathBuf,

    /// Share of examples held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Shuffle seed for the train/test split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Vocabulary cap for the TF-IDF vectorizer
    #[arg(long, default_value_t = 1000)]
    pub max_features: usize,

    /// Laplace smoothing for Naive Bayes
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Model artifact path
    #[arg(
        short,
        long,
        env = "CATEGORIZER_MODEL_PATH",
        default_value = "./models/email_classifier.json"
    )]
    pub model: PathBuf,

    #[arg(short, long, default_value = "")]
    pub subject: String,

    #[arg(short, long, default_value = "")]
    pub body: String,

    /// Runner-up categories to report
    #[arg(long, default_value_t = 2)]
    pub alternatives: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Override CATEGORIZER_MODEL_PATH
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Override CATEGORIZER_PORT
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_train_defaults() {
        let args = CategorizerArgs::parse_from(["email-categorizer", "train", "--dataset", "d.jsonl"]);
        let Command::Train(train) = args.command else {
            panic!("expected train");
        };
        assert_eq!(train.test_fraction, 0.2);
        assert_eq!(train.seed, 42);
        assert_eq!(train.max_features, 1000);
        assert_eq!(train.output, PathBuf::from("./models/email_classifier.json"));
    }

    #[test]
    fn verbosity_selects_log_filter() {
        let args = CategorizerArgs::parse_from(["email-categorizer", "-vv", "serve"]);
        assert_eq!(args.default_log_filter(), "trace");
        let args = CategorizerArgs::parse_from(["email-categorizer", "serve", "--quiet"]);
        assert_eq!(args.default_log_filter(), "error");
    }

    #[test]
    fn label_requires_input_and_output() {
        assert!(CategorizerArgs::try_parse_from(["email-categorizer", "label"]).is_err());
        let args = CategorizerArgs::parse_from([
            "email-categorizer",
            "label",
            "-i",
            "mail/",
            "-o",
            "labeled.jsonl",
            "--min-confidence",
            "0.5",
        ]);
        let Command::Label(label) = args.command else {
            panic!("expected label");
        };
        assert_eq!(label.min_confidence, 0.5);
        assert!(label.catalog.is_none());
    }
}
