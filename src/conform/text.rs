/*!
 * Word-level helpers shared by the splitter, the balancer and the scorer.
 *
 * Captions are handled as sequences of whitespace-separated tokens. A token
 * longer than the line limit can never be placed on a line, so tokenizing
 * hard-breaks it into hyphenated pieces that each fit.
 */

/// Ellipsis written as three dots
pub const ELLIPSIS: &str = "...";

/// Ellipsis written as the single Unicode character
pub const ELLIPSIS_CHAR: char = '…';

/// Split text into tokens, breaking any token longer than `max_chars`
pub fn tokenize(text: &str, max_chars: usize) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        if word.chars().count() <= max_chars || max_chars < 2 {
            tokens.push(word.to_string());
            continue;
        }

        let chars: Vec<char> = word.chars().collect();
        let mut pieces = chars.chunks(max_chars - 1).peekable();
        while let Some(piece) = pieces.next() {
            let mut token: String = piece.iter().collect();
            if pieces.peek().is_some() {
                token.push('-');
            }
            tokens.push(token);
        }
    }
    tokens
}

/// Character length of the words once joined by single spaces
pub fn joined_len<S: AsRef<str>>(words: &[S]) -> usize {
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.as_ref().chars().count()).sum::<usize>() + words.len() - 1
}

/// Join words by single spaces
pub fn join<S: AsRef<str>>(words: &[S]) -> String {
    words.iter().map(|w| w.as_ref()).collect::<Vec<_>>().join(" ")
}

/// Whether the words can be wrapped into `max_lines` lines of `max_chars`
///
/// Greedy filling is optimal for this question: a line that takes as many
/// words as fit never makes a later line longer.
pub fn fits_lines<S: AsRef<str>>(words: &[S], max_chars: usize, max_lines: usize) -> bool {
    let mut lines = 0;
    let mut current = 0;
    for word in words {
        let len = word.as_ref().chars().count();
        if len > max_chars {
            return false;
        }
        if current == 0 {
            lines += 1;
            current = len;
        } else if current + 1 + len <= max_chars {
            current += 1 + len;
        } else {
            lines += 1;
            current = len;
        }
        if lines > max_lines {
            return false;
        }
    }
    true
}

/// Number of leading words that fit on one line of `max_chars`
pub fn greedy_prefix<S: AsRef<str>>(words: &[S], max_chars: usize) -> usize {
    let mut count = 0;
    let mut current = 0;
    for word in words {
        let len = word.as_ref().chars().count();
        let next = if count == 0 { len } else { current + 1 + len };
        if next > max_chars {
            break;
        }
        current = next;
        count += 1;
    }
    count
}

/// Whether a word closes a sentence (`.`, `?`, `!` or an ellipsis)
pub fn ends_sentence(word: &str) -> bool {
    let word = strip_closing_quotes(word);
    word.ends_with(['.', '?', '!', ELLIPSIS_CHAR])
}

/// Whether a word closes a clause (`,`, `;`, `:` or an em-dash)
pub fn ends_clause(word: &str) -> bool {
    let word = strip_closing_quotes(word);
    word.ends_with([',', ';', ':', '—'])
}

/// Lowercased word without surrounding punctuation or continuation dots
pub fn bare_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .trim_matches(['\'', '-'])
        .to_lowercase()
}

/// Add continuation markers without whitespace between marker and text.
///
/// A marker already present at a continued edge is kept, and any space
/// between it and the text is dropped, so "honestly ..." becomes "honestly...".
pub fn mark_continuation(text: &str, continues_previous: bool, continues_next: bool) -> String {
    let mut body = text.trim();
    let mut prefix = "";
    let mut suffix = "";

    if continues_previous {
        let (marker, rest) = leading_marker(body);
        prefix = marker.unwrap_or(ELLIPSIS);
        body = rest.trim_start();
    }
    if continues_next && !body.is_empty() {
        let (rest, marker) = trailing_marker(body);
        suffix = marker.unwrap_or(ELLIPSIS);
        body = rest.trim_end();
    }

    format!("{prefix}{body}{suffix}")
}

fn leading_marker(text: &str) -> (Option<&str>, &str) {
    if let Some(rest) = text.strip_prefix(ELLIPSIS) {
        (Some(ELLIPSIS), rest)
    } else if let Some(rest) = text.strip_prefix(ELLIPSIS_CHAR) {
        (Some("…"), rest)
    } else {
        (None, text)
    }
}

fn trailing_marker(text: &str) -> (&str, Option<&str>) {
    if let Some(rest) = text.strip_suffix(ELLIPSIS) {
        (rest, Some(ELLIPSIS))
    } else if let Some(rest) = text.strip_suffix(ELLIPSIS_CHAR) {
        (rest, Some("…"))
    } else {
        (text, None)
    }
}

fn strip_closing_quotes(word: &str) -> &str {
    word.trim_end_matches(['"', '\'', ')', ']', '”', '’'])
}
