use std::collections::HashMap;
use std::sync::Arc;

/// One affect dictionary layer. Earlier layers win: merging only fills words
/// the higher-priority layers left unscored.
pub struct LexiconLayer {
    pub name: &'static str,
    pub entries: &'static [(&'static str, f64)],
}

/// Informal/slang overlay. Highest priority for English chat text because
/// chat usage routinely flips formal polarity ("sick", "killing it").
const INFORMAL_OVERLAY: LexiconLayer = LexiconLayer {
    name: "informal",
    entries: &[
        ("lol", 0.4),
        ("lmao", 0.5),
        ("rofl", 0.5),
        ("haha", 0.4),
        ("hahaha", 0.5),
        ("hehe", 0.3),
        ("xd", 0.3),
        ("yay", 0.7),
        ("woohoo", 0.8),
        ("yesss", 0.6),
        ("omg", 0.2),
        ("wow", 0.4),
        ("cool", 0.5),
        ("sick", 0.4),
        ("dope", 0.5),
        ("lit", 0.5),
        ("fire", 0.5),
        ("slay", 0.5),
        ("goat", 0.6),
        ("based", 0.4),
        ("cute", 0.6),
        ("adorable", 0.7),
        ("bestie", 0.5),
        ("thx", 0.4),
        ("ty", 0.4),
        ("np", 0.2),
        ("meh", -0.3),
        ("ugh", -0.5),
        ("eww", -0.6),
        ("yikes", -0.4),
        ("cringe", -0.5),
        ("smh", -0.4),
        ("wtf", -0.5),
        ("ffs", -0.6),
        ("damn", -0.3),
        ("sucks", -0.6),
        ("trash", -0.6),
        ("mid", -0.3),
        ("bruh", -0.2),
        ("whatever", -0.3),
        ("ghosted", -0.6),
        ("salty", -0.4),
        ("toxic", -0.7),
    ],
};

/// General English affect layer.
const ENGLISH_BASE: LexiconLayer = LexiconLayer {
    name: "english",
    entries: &[
        ("love", 0.9),
        ("adore", 0.9),
        ("amazing", 0.8),
        ("awesome", 0.8),
        ("wonderful", 0.8),
        ("fantastic", 0.8),
        ("perfect", 0.8),
        ("beautiful", 0.7),
        ("excellent", 0.8),
        ("brilliant", 0.7),
        ("great", 0.7),
        ("good", 0.5),
        ("nice", 0.5),
        ("sweet", 0.5),
        ("happy", 0.7),
        ("glad", 0.6),
        ("excited", 0.7),
        ("thrilled", 0.8),
        ("delighted", 0.8),
        ("grateful", 0.7),
        ("thanks", 0.5),
        ("thank", 0.5),
        ("appreciate", 0.6),
        ("proud", 0.6),
        ("fun", 0.6),
        ("funny", 0.5),
        ("enjoy", 0.6),
        ("enjoyed", 0.6),
        ("like", 0.4),
        ("liked", 0.4),
        ("best", 0.6),
        ("better", 0.3),
        ("win", 0.5),
        ("winning", 0.5),
        ("success", 0.6),
        ("miss", 0.2),
        ("missed", 0.2),
        ("hug", 0.6),
        ("kiss", 0.7),
        ("dear", 0.4),
        ("darling", 0.7),
        ("honey", 0.5),
        ("babe", 0.5),
        ("sorry", -0.2),
        ("apologize", -0.1),
        ("sad", -0.7),
        ("unhappy", -0.7),
        ("miserable", -0.8),
        ("depressed", -0.8),
        ("crying", -0.7),
        ("cried", -0.7),
        ("tears", -0.5),
        ("hurt", -0.6),
        ("hurts", -0.6),
        ("pain", -0.6),
        ("painful", -0.6),
        ("hate", -0.9),
        ("hated", -0.9),
        ("angry", -0.7),
        ("mad", -0.6),
        ("furious", -0.8),
        ("annoyed", -0.5),
        ("annoying", -0.5),
        ("irritated", -0.5),
        ("frustrated", -0.6),
        ("upset", -0.6),
        ("disappointed", -0.6),
        ("disappointing", -0.6),
        ("terrible", -0.8),
        ("horrible", -0.8),
        ("awful", -0.8),
        ("worst", -0.8),
        ("bad", -0.5),
        ("worse", -0.5),
        ("wrong", -0.4),
        ("problem", -0.3),
        ("problems", -0.3),
        ("fail", -0.6),
        ("failed", -0.6),
        ("failure", -0.7),
        ("stupid", -0.6),
        ("idiot", -0.7),
        ("dumb", -0.5),
        ("ridiculous", -0.5),
        ("pathetic", -0.7),
        ("useless", -0.6),
        ("worthless", -0.8),
        ("scared", -0.6),
        ("afraid", -0.6),
        ("worried", -0.5),
        ("worry", -0.4),
        ("anxious", -0.6),
        ("stress", -0.5),
        ("stressed", -0.6),
        ("tired", -0.4),
        ("exhausted", -0.5),
        ("sick", -0.5),
        ("lonely", -0.7),
        ("alone", -0.4),
        ("bored", -0.4),
        ("boring", -0.4),
        ("jealous", -0.5),
        ("guilty", -0.5),
        ("ashamed", -0.6),
        ("regret", -0.5),
        ("broke", -0.4),
        ("broken", -0.6),
        ("lost", -0.4),
        ("lie", -0.6),
        ("lied", -0.7),
        ("liar", -0.8),
        ("cheat", -0.8),
        ("cheated", -0.8),
        ("betrayed", -0.8),
        ("ignore", -0.5),
        ("ignored", -0.6),
        ("ignoring", -0.6),
        ("fight", -0.5),
        ("fighting", -0.5),
        ("argue", -0.5),
        ("arguing", -0.5),
        ("argument", -0.5),
        ("fine", 0.1),
        ("okay", 0.1),
        ("calm", 0.3),
        ("peace", 0.4),
        ("relax", 0.3),
        ("safe", 0.3),
        ("hope", 0.4),
        ("hopefully", 0.3),
        ("please", 0.1),
        ("welcome", 0.3),
        ("congratulations", 0.8),
        ("congrats", 0.7),
        ("celebrate", 0.7),
        ("birthday", 0.4),
        ("gift", 0.5),
        ("surprise", 0.3),
    ],
};

/// Emoji affect layer. Language independent, lowest priority so a textual
/// layer can never be shadowed by it.
const EMOJI_AFFECT: LexiconLayer = LexiconLayer {
    name: "emoji",
    entries: &[
        ("😀", 0.6),
        ("😁", 0.6),
        ("😂", 0.6),
        ("🤣", 0.6),
        ("😊", 0.6),
        ("😍", 0.9),
        ("🥰", 0.9),
        ("😘", 0.8),
        ("😗", 0.5),
        ("🙂", 0.3),
        ("😉", 0.4),
        ("😎", 0.5),
        ("🤗", 0.6),
        ("🥳", 0.8),
        ("🎉", 0.7),
        ("❤️", 0.9),
        ("❤", 0.9),
        ("💕", 0.8),
        ("💖", 0.8),
        ("💯", 0.6),
        ("👍", 0.5),
        ("🙏", 0.4),
        ("🔥", 0.5),
        ("✨", 0.4),
        ("😐", -0.1),
        ("😑", -0.3),
        ("🙄", -0.4),
        ("😒", -0.5),
        ("😕", -0.3),
        ("☹️", -0.5),
        ("😞", -0.6),
        ("😔", -0.5),
        ("😢", -0.7),
        ("😭", -0.7),
        ("😠", -0.7),
        ("😡", -0.8),
        ("🤬", -0.9),
        ("💔", -0.8),
        ("👎", -0.5),
        ("😴", -0.2),
        ("😤", -0.5),
        ("😰", -0.5),
        ("😨", -0.6),
        ("😱", -0.5),
    ],
};

/// Negation markers that invert a scored word within the lookback window.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "cannot", "can't", "cant", "don't", "dont", "doesn't",
    "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt", "aren't", "arent", "wasn't",
    "wasnt", "weren't", "werent", "couldn't", "couldnt", "wouldn't", "wouldnt", "shouldn't",
    "shouldnt", "ain't", "aint", "hardly", "barely",
];

/// Suffixes tried, longest first, when a token misses the dictionary.
const STRIP_SUFFIXES: &[&str] = &["ingly", "edly", "ing", "est", "ed", "ly", "er", "es", "s"];

/// A merged, ready-to-query affect dictionary.
pub struct Lexicon {
    scores: HashMap<&'static str, f64>,
}

impl Lexicon {
    /// Merges the given layers first-match-wins in priority order.
    pub fn merge(layers: &[&LexiconLayer]) -> Self {
        let mut scores = HashMap::new();
        for layer in layers {
            for (word, score) in layer.entries {
                scores.entry(*word).or_insert(*score);
            }
        }
        Self { scores }
    }

    /// Direct lookup, then inflection-stripped retries. Dropped final "e"
    /// forms ("loving", "adored") are restored before the stem lookup.
    pub fn score(&self, token: &str) -> Option<f64> {
        if let Some(score) = self.scores.get(token) {
            return Some(*score);
        }
        for suffix in STRIP_SUFFIXES {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.chars().count() < 3 {
                    continue;
                }
                if let Some(score) = self.scores.get(stem) {
                    return Some(*score);
                }
                let restored = format!("{stem}e");
                if let Some(score) = self.scores.get(restored.as_str()) {
                    return Some(*score);
                }
            }
        }
        None
    }

    pub fn is_negation(&self, token: &str) -> bool {
        NEGATIONS.contains(&token)
    }

    pub fn entry_count(&self) -> usize {
        self.scores.len()
    }
}

/// Caller-owned memoization of merged lexicons, keyed by language code.
///
/// Replaces the module-global caches of the original design: lifetime and
/// invalidation belong to whoever owns the cache, and repeated analyses can
/// share one instance without hidden process-wide state.
#[derive(Default)]
pub struct LexiconCache {
    built: HashMap<String, Arc<Lexicon>>,
}

impl LexiconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the merged lexicon for a detected language code, building and
    /// memoizing it on first use. Unknown languages fall back to the emoji
    /// layer plus the English base, which still scores emoji and loanwords.
    pub fn get_or_build(&mut self, language_code: &str) -> Arc<Lexicon> {
        if let Some(existing) = self.built.get(language_code) {
            return Arc::clone(existing);
        }
        let lexicon = Arc::new(match language_code {
            "eng" => Lexicon::merge(&[&INFORMAL_OVERLAY, &ENGLISH_BASE, &EMOJI_AFFECT]),
            _ => Lexicon::merge(&[&EMOJI_AFFECT, &ENGLISH_BASE]),
        });
        self.built
            .insert(language_code.to_string(), Arc::clone(&lexicon));
        lexicon
    }

    pub fn len(&self) -> usize {
        self.built.len()
    }

    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }
}
