/*!
 * Per-language stop-word sets.
 *
 * Each language gets a base dictionary of function words plus a hand-curated
 * extension list: pronouns, auxiliaries, high-frequency function words, and
 * the common irregular verb forms a learner never wants on a flashcard.
 * English is the fallback for unrecognized tags.
 */

use once_cell::sync::Lazy;
use std::collections::HashSet;

// @const: English base dictionary
static ENGLISH_BASE: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "you",
    "your", "yours", "yourself", "yourselves",
];

// @const: English curated extras (pronouns, numbers, irregular verb forms)
static ENGLISH_EXTRA: &[&str] = &[
    "us", "one", "two", "three", "first", "second",
    "done", "wont", "would",
    "go", "went", "gone", "going",
    "say", "said", "says",
    "get", "got", "getting",
    "make", "made", "making",
    "know", "knew", "known", "knowing",
    "take", "took", "taken", "taking",
    "see", "saw", "seen", "seeing",
    "come", "came", "coming",
    "think", "thought", "thinking",
    "look", "looked", "looking",
    "want", "wanted", "wanting",
    "give", "gave", "given", "giving",
    "use", "used", "using",
    "find", "found", "finding",
    "tell", "told", "telling",
    "ask", "asked", "asking",
    "work", "worked", "working",
    "seem", "seemed", "seeming",
    "feel", "felt", "feeling",
    "try", "tried", "trying",
    "leave", "left", "leaving",
    "call", "called", "calling",
    "next", "back",
];

// @const: Portuguese base dictionary
static PORTUGUESE_BASE: &[&str] = &[
    "de", "a", "o", "que", "e", "do", "da", "em", "um", "para", "é", "com", "não", "uma",
    "os", "no", "se", "na", "por", "mais", "as", "dos", "como", "mas", "foi", "ao", "ele",
    "das", "tem", "à", "seu", "sua", "ou", "ser", "quando", "muito", "há", "nos", "já",
    "está", "eu", "também", "só", "pelo", "pela", "até", "isso", "ela", "entre", "era",
    "depois", "sem", "mesmo", "aos", "ter", "seus", "quem", "nas", "me", "esse", "eles",
    "estão", "você", "tinha", "foram", "essa", "num", "nem", "suas", "meu", "às", "minha",
    "têm", "numa", "pelos", "elas", "havia", "seja", "qual", "será", "nós", "tenho", "lhe",
    "deles", "essas", "esses", "pelas", "este", "fosse", "dele", "tu", "te", "vocês", "vos",
    "lhes", "meus", "minhas", "teu", "tua", "teus", "tuas", "nosso", "nossa", "nossos",
    "nossas",
];

// @const: Portuguese curated extras (clitics, auxiliaries, time/place adverbs)
static PORTUGUESE_EXTRA: &[&str] = &[
    "uns", "umas", "sob", "sobre",
    "vós", "vosso",
    "estar", "haver", "são",
    "fazer", "ir", "vir", "ver", "dar", "dizer",
    "aqui", "ali", "lá", "agora", "então", "antes", "hoje", "ontem", "amanhã",
    "sim", "talvez", "jamais", "nunca", "sempre",
    "pouco", "menos",
];

static ENGLISH: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ENGLISH_BASE
        .iter()
        .chain(ENGLISH_EXTRA.iter())
        .copied()
        .collect()
});

static PORTUGUESE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    PORTUGUESE_BASE
        .iter()
        .chain(PORTUGUESE_EXTRA.iter())
        .copied()
        .collect()
});

/// Select the stop-word set for a language tag.
///
/// Accepts ISO codes and display names ("pt", "por", "Portuguese",
/// "Português"); anything unrecognized falls back to English.
pub fn stop_words(language: &str) -> &'static HashSet<&'static str> {
    match language.trim().to_lowercase().as_str() {
        "pt" | "por" | "portuguese" | "português" | "portugues" => &PORTUGUESE,
        _ => &ENGLISH,
    }
}
