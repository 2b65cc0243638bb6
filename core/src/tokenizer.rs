use crate::stemmer::stem;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // Tokens are separated by space, tab, newline, carriage return and form feed only.
    static ref TOKEN_RE: Regex = Regex::new(r"[^ \t\n\r\x0C]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Options for the token pipeline shared by indexing and querying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Drop English stopwords before stemming.
    pub remove_stopwords: bool,
}

fn is_stopword(lowered: &str) -> bool {
    let bare = lowered.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
    STOPWORDS.contains(bare)
}

/// Lowercase, stem, then keep only the alphabetic characters of the stem.
///
/// May return an empty string (e.g. for `"1999"` or `"--"`).
pub fn normalize(token: &str) -> String {
    let lowered = token.to_lowercase();
    normalize_lowered(&lowered)
}

fn normalize_lowered(lowered: &str) -> String {
    stem(lowered).chars().filter(|c| c.is_alphabetic()).collect()
}

/// Raw whitespace-delimited tokens of `text`, line by line.
pub fn raw_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| TOKEN_RE.find_iter(line).map(|m| m.as_str()))
}

/// Run the full pipeline over `text`, yielding the non-empty terms in order.
pub fn analyze(text: &str, config: &AnalyzerConfig) -> Vec<String> {
    let mut terms = Vec::new();
    for token in raw_tokens(text) {
        let lowered = token.to_lowercase();
        if config.remove_stopwords && is_stopword(&lowered) {
            continue;
        }
        let term = normalize_lowered(&lowered);
        if term.is_empty() {
            continue;
        }
        terms.push(term);
    }
    terms
}
