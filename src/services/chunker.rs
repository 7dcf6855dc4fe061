//! Document chunking for knowledge base uploads.
//!
//! Splits on blank-line paragraph boundaries, packing paragraphs into
//! chunks up to a character budget. Oversized paragraphs are hard-split.
//! Adjacent chunks share a character overlap so sentences cut at a chunk
//! boundary stay searchable.

/// Split `text` into chunks of at most `max_chars`, carrying `overlap`
/// characters from the tail of each chunk into the next.
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    assert!(max_chars > 0);
    let overlap = overlap.min(max_chars / 2);

    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut push_current = |current: &mut String, chunks: &mut Vec<String>| {
        if !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
        }
        current.clear();
    };

    for paragraph in paragraphs {
        if paragraph.chars().count() > max_chars {
            // Flush what we have, then hard-split the long paragraph
            push_current(&mut current, &mut chunks);
            let glyphs: Vec<char> = paragraph.chars().collect();
            let mut start = 0;
            while start < glyphs.len() {
                let end = (start + max_chars).min(glyphs.len());
                chunks.push(glyphs[start..end].iter().collect::<String>());
                if end == glyphs.len() {
                    break;
                }
                start = end.saturating_sub(overlap);
            }
            continue;
        }

        let would_be = if current.is_empty() {
            paragraph.chars().count()
        } else {
            current.chars().count() + 2 + paragraph.chars().count()
        };

        if would_be > max_chars {
            // Shrink the carried tail so the next chunk still fits its budget
            let budget = max_chars.saturating_sub(paragraph.chars().count() + 2);
            let tail: String = tail_chars(&current, overlap.min(budget));
            push_current(&mut current, &mut chunks);
            if !tail.is_empty() {
                current.push_str(&tail);
                current.push_str("\n\n");
            }
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    push_current(&mut current, &mut chunks);
    chunks
}

fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let glyphs: Vec<char> = s.chars().collect();
    let start = glyphs.len().saturating_sub(n);
    glyphs[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("hello world", 100, 10);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100, 10).is_empty());
        assert!(chunk_text("\n\n\n\n", 100, 10).is_empty());
    }

    #[test]
    fn paragraphs_pack_until_budget() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = chunk_text(text, 12, 0);
        // "aaaa\n\nbbbb" is 10 chars, adding "cccc" would exceed 12
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "aaaa\n\nbbbb");
        assert_eq!(chunks[1], "cccc");
    }

    #[test]
    fn chunks_respect_max_size() {
        let text = "word ".repeat(500);
        for chunk in chunk_text(&text, 100, 20) {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn oversized_paragraph_is_hard_split_with_overlap() {
        let text = "x".repeat(250);
        let chunks = chunk_text(&text, 100, 20);
        assert!(chunks.len() >= 3);
        // Each split carries the previous tail
        assert_eq!(&chunks[1][..20], &chunks[0][80..]);
    }

    #[test]
    fn overlap_carries_between_packed_chunks() {
        let text = format!("{}\n\n{}", "a".repeat(90), "b".repeat(80));
        let chunks = chunk_text(&text, 100, 10);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].starts_with(&"a".repeat(10)));
        assert!(chunks[1].chars().count() <= 100);
    }
}
