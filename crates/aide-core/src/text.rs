//! Text shaping shared by the dispatcher and its collaborators.

const QUESTION_WORDS: &[&str] = &[
    "how", "what", "who", "where", "when", "why", "which", "whose", "whom", "can you", "what's",
    "where's", "how's",
];

/// Turn a topic into a safe file stem.
///
/// Lowercases, maps whitespace to `_`, and drops path separators and anything
/// else that is not alphanumeric, `-`, `_` or `.`. Leading dots are removed so
/// the result can never name a parent or hidden entry.
pub fn sanitize_filename(topic: &str) -> String {
    let mut stem = String::with_capacity(topic.len());
    for ch in topic.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            stem.push('_');
        } else if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            stem.push(ch);
        }
    }

    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem.to_string()
    }
}

/// Normalise a merged query before it goes to the responder: capitalised and
/// terminated with `?` for questions, `.` otherwise.
pub fn polish_query(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    let is_question = QUESTION_WORDS
        .iter()
        .any(|w| lowered.split_whitespace().any(|t| t == *w) || lowered.starts_with(&format!("{} ", w)));

    let body = lowered.trim_end_matches(['.', '?', '!']);
    let mut polished = String::with_capacity(body.len() + 1);
    let mut chars = body.chars();
    if let Some(first) = chars.next() {
        polished.extend(first.to_uppercase());
        polished.push_str(chars.as_str());
    }
    polished.push(if is_question { '?' } else { '.' });
    polished
}

const STOP_TOKEN: &str = "</s>";

/// Remove end-of-sequence tokens, keeping the layout intact.
pub fn strip_stop_tokens(text: &str) -> String {
    text.replace(STOP_TOKEN, "")
}

/// Strip end-of-sequence tokens and blank lines from a chat answer.
pub fn tidy_answer(answer: &str) -> String {
    strip_stop_tokens(answer)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Love Letter"), "love_letter");
        assert_eq!(sanitize_filename("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("a\\b/c d"), "abc_d");
        assert_eq!(sanitize_filename("///"), "untitled");
    }

    #[test]
    fn test_polish_query() {
        assert_eq!(polish_query("what is the capital of france"), "What is the capital of france?");
        assert_eq!(polish_query("tell me a joke"), "Tell me a joke.");
        assert_eq!(polish_query("can you help me."), "Can you help me?");
    }

    #[test]
    fn test_tidy_answer() {
        assert_eq!(tidy_answer("Hello\n\n  \nworld</s>"), "Hello\nworld");
    }

    #[test]
    fn test_strip_stop_tokens_keeps_paragraphs() {
        assert_eq!(
            strip_stop_tokens("Dear Sam,\n\nThank you.</s>\n\nBest,\nAlex"),
            "Dear Sam,\n\nThank you.\n\nBest,\nAlex"
        );
    }
}
