use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{M}\p{N}_]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","able","about","across","after","all","almost","also","am","among","an","and","any","are","as","at",
            "be","because","been","but","by",
            "can","cannot","could",
            "dear","did","do","does",
            "either","else","ever","every",
            "for","from",
            "get","got",
            "had","has","have","he","her","hers","him","his","how","however",
            "i","if","in","into","is","it","its",
            "just",
            "least","let","like","likely",
            "may","me","might","most","must","my",
            "neither","no","nor","not",
            "of","off","often","on","only","or","other","our","own",
            "rather",
            "said","say","says","she","should","since","so","some",
            "than","that","the","their","them","then","there","these","they","this","tis","to","too","twas",
            "us",
            "wants","was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "yet","you","your"
        ];
        words.iter().copied().collect()
    };
}

/// Whether `token` (already lowercased) belongs to the fixed stopword set.
pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Lowercasing shared by the tokenizer and the document store so ids stay consistent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Tokenize text into (term, position) pairs: lowercase, split on runs of non-word
/// characters, drop stopwords.
///
/// Positions count every token, stopwords included, so gaps between surviving terms
/// reflect their real distance in the text.
pub fn tokenize(text: &str) -> Vec<(String, u32)> {
    let normalized = normalize(text);
    let mut tokens = Vec::new();
    for (pos, mat) in RE.find_iter(&normalized).enumerate() {
        let token = mat.as_str();
        if is_stopword(token) { continue; }
        tokens.push((token.to_string(), pos as u32));
    }
    tokens
}

/// Terms of `text` in order, positions discarded. Used for queries.
pub fn terms(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|(t, _)| t).collect()
}
