//! Sentence-bounded chunking of long page text.
//!
//! A sentence ends right after `.`, `!` or `?` when the next character is
//! whitespace. Sentences are packed greedily into chunks of at most
//! `max_size` characters, joined by one space. A sentence is never split:
//! one that is longer than `max_size` on its own becomes its own chunk.

/// Split `text` into trimmed, non-empty sentences, in order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(_, next)) = chars.peek() {
            if next.is_whitespace() {
                let end = i + c.len_utf8();
                push_trimmed(&mut sentences, &text[start..end]);
                start = end;
            }
        }
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, s: &'a str) {
    let s = s.trim();
    if !s.is_empty() {
        out.push(s);
    }
}

/// Pack the sentences of `text` into chunks of at most `max_size` characters.
///
/// Lengths count `char`s. `max_size` of 0 behaves like 1, which puts every
/// sentence in its own chunk.
pub fn chunk(text: &str, max_size: usize) -> Vec<String> {
    let max_size = max_size.max(1);
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0usize;

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if buffer.is_empty() {
            buffer.push_str(sentence);
            buffer_len = len;
        } else if buffer_len + 1 + len > max_size {
            chunks.push(std::mem::take(&mut buffer));
            buffer.push_str(sentence);
            buffer_len = len;
        } else {
            buffer.push(' ');
            buffer.push_str(sentence);
            buffer_len += 1 + len;
        }
    }
    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    debug_assert!(chunks.iter().all(|c| !c.is_empty()), "empty chunk produced");
    chunks
}
