//! English stop-word and closed-class word lists.
//!
//! `ENGLISH_STOP_WORDS` is shared by the normalizer and the TF-IDF
//! vectorizer. `CLOSED_CLASS_WORDS` holds function words that never carry
//! category content (interjections, contraction fragments, common adverbs)
//! and are only dropped by the normalizer's part-of-speech filter.

use std::collections::HashSet;
use std::sync::LazyLock;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amount",
    "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "ca", "call", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "due", "during", "each", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "first", "five", "for", "former",
    "formerly", "forty", "four", "from", "front", "full", "further", "get", "give", "go", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "quite", "rather", "re", "really", "regarding", "same",
    "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should",
    "show", "side", "since", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "third", "this", "those", "though",
    "three", "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward",
    "towards", "twelve", "twenty", "two", "under", "unless", "until", "up", "upon", "us", "used",
    "using", "various", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

const CLOSED_CLASS_WORDS: &[&str] = &[
    // interjections
    "hey", "hi", "hello", "oh", "ok", "okay", "yes", "yeah", "wow", "hmm", "dear", "regards",
    // contraction fragments left after punctuation removal
    "lets", "dont", "im", "ive", "id", "youre", "youve", "youll", "thats", "cant", "wont",
    "isnt", "arent", "didnt", "doesnt", "wasnt", "werent", "couldnt", "shouldnt", "wouldnt",
    "theyre", "weve", "ll", "ve", "nt",
    // adverbs
    "soon", "today", "tomorrow", "tonight", "yesterday", "maybe", "actually", "probably",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

static CLOSED_CLASS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| CLOSED_CLASS_WORDS.iter().copied().collect());

/// Whether `word` (lowercase) is an English stop-word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Whether `word` (lowercase) is a function word the normalizer never keeps.
pub fn is_closed_class(word: &str) -> bool {
    is_stop_word(word) || CLOSED_CLASS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_function_words_are_stop_words() {
        for w in ["the", "and", "your", "please", "due", "this"] {
            assert!(is_stop_word(w), "{w} should be a stop-word");
        }
    }

    #[test]
    fn category_keywords_are_not_stop_words() {
        for w in ["invoice", "pay", "dinner", "weekend", "order", "account", "meeting", "plan"] {
            assert!(!is_closed_class(w), "{w} must survive normalization");
        }
    }

    #[test]
    fn interjections_are_closed_class_only() {
        assert!(is_closed_class("hey"));
        assert!(!is_stop_word("hey"));
    }
}
