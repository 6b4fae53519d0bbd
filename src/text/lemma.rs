//! Dictionary + rule lemmatizer.
//!
//! Irregular forms are looked up first, then regular plural suffixes are
//! reduced. Every output is a fixed point: `lemmatize(lemmatize(w)) ==
//! lemmatize(w)`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular inflections mapped to their base form. Values never end in
/// `s` and never appear as keys.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("paid", "pay"),
    ("bought", "buy"),
    ("sent", "send"),
    ("went", "go"),
    ("got", "get"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("ran", "run"),
    ("running", "run"),
    ("met", "meet"),
    ("sold", "sell"),
    ("spent", "spend"),
    ("won", "win"),
    ("lost", "lose"),
    ("felt", "feel"),
    ("told", "tell"),
    ("thought", "think"),
    ("brought", "bring"),
    ("kept", "keep"),
    ("began", "begin"),
    ("begun", "begin"),
    ("wrote", "write"),
    ("written", "write"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("knew", "know"),
    ("known", "know"),
    ("held", "hold"),
    ("heard", "hear"),
    ("found", "find"),
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("shipped", "ship"),
    ("ordered", "order"),
    ("purchased", "purchase"),
    ("delivered", "deliver"),
    ("scheduled", "schedule"),
    ("renewed", "renew"),
    ("booked", "book"),
    ("received", "receive"),
    ("applied", "apply"),
    ("hired", "hire"),
    ("grabbed", "grab"),
    ("charged", "charge"),
    ("billed", "bill"),
    ("tracked", "track"),
    ("cancelled", "cancel"),
    ("canceled", "cancel"),
    ("confirmed", "confirm"),
    ("attached", "attach"),
];

static IRREGULAR: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_FORMS.iter().copied().collect());

/// Reduce a lowercase word to its lemma.
pub fn lemmatize(word: &str) -> String {
    if let Some(base) = IRREGULAR.get(word) {
        return (*base).to_string();
    }
    let singular = singularize(word);
    match IRREGULAR.get(singular.as_str()) {
        Some(base) => (*base).to_string(),
        None => singular,
    }
}

/// Regular English plural reduction.
fn singularize(word: &str) -> String {
    if word.len() <= 3 || !word.ends_with('s') {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["sses", "ches", "shes", "xes", "zes"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return word[..word.len() - 2].to_string();
    }
    word[..word.len() - 1].to_string()
}
