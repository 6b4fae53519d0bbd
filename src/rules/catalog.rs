//! Category catalog: the per-category signal table used by the rule scorer.
//!
//! The catalog is an ordered, immutable value. Its order is the declared
//! tie-break priority of the weak labeler, and its names are the label space.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CorpusError, Error};

/// Version tag of the built-in catalog.
pub const DEFAULT_CATALOG_VERSION: &str = "2024.1";

/// A subject-line regex with its source text (kept for factor messages).
#[derive(Debug, Clone)]
pub struct SubjectPattern {
    pub pattern: String,
    pub regex: Regex,
}

/// Signals for one category.
#[derive(Debug, Clone)]
pub struct CategoryDefinition {
    pub name: String,
    /// Substrings matched against the lowercased sender address.
    pub sender_domains: Vec<String>,
    /// Substrings matched against the normalized subject + body.
    pub keywords: Vec<String>,
    /// Regexes matched against the raw lowercased subject.
    pub subject_patterns: Vec<SubjectPattern>,
    /// Substrings matched against lowercased header values.
    pub header_indicators: Vec<String>,
}

/// Serializable form of a category definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRules {
    pub name: String,
    #[serde(default, alias = "senders")]
    pub sender_domains: Vec<String>,
    #[serde(default, alias = "strong_keywords")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub subject_patterns: Vec<String>,
    #[serde(default)]
    pub header_indicators: Vec<String>,
}

/// Serializable form of a whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    pub categories: Vec<CategoryRules>,
}

impl CategoryDefinition {
    /// Build a definition, compiling subject patterns and dropping
    /// duplicate signals while keeping first-seen order.
    pub fn new(rules: CategoryRules) -> Result<Self, CatalogError> {
        let subject_patterns = dedup(rules.subject_patterns)
            .into_iter()
            .map(|pattern| {
                Regex::new(&pattern)
                    .map(|regex| SubjectPattern {
                        pattern: pattern.clone(),
                        regex,
                    })
                    .map_err(|source| CatalogError::InvalidPattern {
                        category: rules.name.clone(),
                        pattern,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sender_domains: dedup(lowercase(rules.sender_domains)),
            keywords: dedup(lowercase(rules.keywords)),
            header_indicators: dedup(lowercase(rules.header_indicators)),
            subject_patterns,
            name: rules.name,
        })
    }
}

/// Ordered, versioned set of category definitions.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    version: String,
    categories: Vec<CategoryDefinition>,
}

impl CategoryCatalog {
    /// Create a catalog. Order of `categories` is the tie-break priority.
    pub fn new(
        version: impl Into<String>,
        categories: Vec<CategoryDefinition>,
    ) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for def in &categories {
            if !seen.insert(def.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(def.name.clone()));
            }
        }
        Ok(Self {
            version: version.into(),
            categories,
        })
    }

    /// Build a catalog from its serializable form.
    pub fn from_rules(rules: CatalogFile) -> Result<Self, CatalogError> {
        let categories = rules
            .categories
            .into_iter()
            .map(CategoryDefinition::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules.version, categories)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(CorpusError::from)?;
        let rules: CatalogFile = serde_json::from_str(&raw).map_err(CorpusError::from)?;
        Ok(Self::from_rules(rules)?)
    }

    /// The built-in email category catalog.
    pub fn default_catalog() -> Self {
        Self::from_rules(default_rules()).expect("built-in catalog is valid")
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Categories in priority order.
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    /// Category names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

fn lowercase(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.to_lowercase()).collect()
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn rules(
    name: &str,
    senders: &[&str],
    keywords: &[&str],
    subject_patterns: &[&str],
    header_indicators: &[&str],
) -> CategoryRules {
    let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    CategoryRules {
        name: name.to_string(),
        sender_domains: owned(senders),
        keywords: owned(keywords),
        subject_patterns: owned(subject_patterns),
        header_indicators: owned(header_indicators),
    }
}

fn default_rules() -> CatalogFile {
    let categories = vec![
        rules(
            "PERSONAL",
            &["@gmail.com", "@yahoo.com", "@hotmail.com", "@outlook.com"],
            &[
                "family", "personal", "friend", "dinner", "lunch", "weekend", "vacation",
                "holiday", "birthday", "social", "meetup",
            ],
            &[r"\b(hey|hi|hello)\b", r"personal matter", r"family|friend"],
            &["personal", "private", "confidential"],
        ),
        rules(
            "CAREER",
            &[
                "@linkedin.com", "@indeed.com", "@careers.", "@recruit.", "@talent.", "@hr.",
                "@jobs.",
            ],
            &[
                "job", "career", "position", "opportunity", "resume", "cv", "interview",
                "recruitment", "hiring", "salary", "application", "qualification", "experience",
                "skill",
            ],
            &[
                r"job (opportunity|opening|position)",
                r"career|position|vacancy",
                r"interview|recruitment",
            ],
            &["job", "career", "recruitment", "employment"],
        ),
        rules(
            "FINANCE",
            &[
                "@bank.", "@paypal.", "@billing.", "@finance.", "@accounting.", "@invoice.",
                "@tax.",
            ],
            &[
                "transaction", "payment", "pay", "invoice", "bank", "financial", "account",
                "balance", "credit", "debit", "statement", "tax", "investment", "money", "fund",
            ],
            &[
                r"payment|invoice|transaction",
                r"financial|statement|balance",
                r"tax|investment",
            ],
            &["finance", "banking", "payment", "invoice"],
        ),
        rules(
            "SHOPPING",
            &[
                "@amazon.", "@ebay.", "@walmart.", "@shop.", "@store.", "@retail.", "@order.",
            ],
            &[
                "order", "purchase", "delivery", "shipping", "tracking", "item", "product",
                "cart", "buy", "price", "discount", "deal", "sale", "shop",
            ],
            &[
                r"order (confirmation|status|shipped)",
                r"delivery|tracking",
                r"purchase|shopping",
            ],
            &["order", "purchase", "shipping", "delivery"],
        ),
        rules(
            "HEALTH",
            &[
                "@hospital.", "@clinic.", "@healthcare.", "@medical.", "@health.", "@doctor.",
            ],
            &[
                "appointment", "medical", "health", "doctor", "clinic", "prescription",
                "medication", "treatment", "insurance", "patient", "healthcare", "wellness",
            ],
            &[
                r"medical|health|appointment",
                r"doctor|clinic|hospital",
                r"prescription|medication",
            ],
            &["medical", "health", "healthcare", "appointment"],
        ),
        rules(
            "SUBSCRIPTIONS",
            &[
                "@netflix.", "@spotify.", "@subscription.", "@service.", "@membership.",
            ],
            &[
                "subscription", "membership", "renewal", "plan", "service", "account",
                "streaming", "monthly", "annual", "autorenewal", "premium",
            ],
            &[
                r"subscription|membership",
                r"renewal|plan|service",
                r"account (status|update)",
            ],
            &["subscription", "membership", "service", "account"],
        ),
        rules(
            "BUSINESS COMMUNICATION",
            &[
                "@company.", "@corp.", "@business.", "@team.", "@hr.", "@consulting.",
            ],
            &[
                "meeting", "agenda", "project", "business", "collaboration", "team", "report",
                "proposal", "task", "update", "deadline", "strategy", "client", "conference",
                "presentation",
            ],
            &[
                r"project|report|business",
                r"collaboration|meeting|update",
                r"proposal|deadline|strategy",
            ],
            &["business", "project", "team", "update", "meeting"],
        ),
    ];

    CatalogFile {
        version: DEFAULT_CATALOG_VERSION.to_string(),
        categories,
    }
}
