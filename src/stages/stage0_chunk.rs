/// Configuration for Stage 0 chunking
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum fragment size in characters
    pub max_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { max_chars: 8000 }
    }
}

/// Size statistics for a chunked transcript
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkStats {
    pub fragments: usize,
    pub largest_chars: usize,
    pub total_chars: usize,
}

/// Execute Stage 0: split a transcript into word-safe fragments
///
/// Words are whitespace-separated tokens and are never split. A fragment only
/// exceeds `max_chars` when it holds a single word longer than the limit.
/// Joining the fragments with single spaces gives back the token sequence.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
            continue;
        }

        if current_chars + 1 + word_chars <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            fragments.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }

    if !current.is_empty() {
        fragments.push(current);
    }

    fragments
}

pub fn chunk_stats(fragments: &[String]) -> ChunkStats {
    let sizes: Vec<usize> = fragments.iter().map(|f| f.chars().count()).collect();
    ChunkStats {
        fragments: fragments.len(),
        largest_chars: sizes.iter().copied().max().unwrap_or(0),
        total_chars: sizes.iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_input() {
        assert!(split_text("", 100).is_empty());
        assert!(split_text("   \n\t ", 100).is_empty());
    }

    #[test]
    fn test_round_trip_and_limit() {
        let text = "[00:00] Hola a todos\n[05:00] Hablamos   del presupuesto [05:30] Se decide aprobar el presupuesto";
        for max in [12, 20, 33, 1000] {
            let fragments = split_text(text, max);
            assert_eq!(fragments.join(" "), normalized(text));
            for fragment in &fragments {
                assert!(fragment.chars().count() <= max, "{} > {}", fragment, max);
                assert!(!fragment.is_empty());
            }
        }
    }

    #[test]
    fn test_exact_fit() {
        let fragments = split_text("abc def ghi", 7);
        assert_eq!(fragments, vec!["abc def", "ghi"]);
    }

    #[test]
    fn test_oversized_word_gets_own_fragment() {
        let fragments = split_text("a supercalifragilistic b", 5);
        assert_eq!(fragments, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_multibyte_counts_characters() {
        // 14 characters but 16 bytes
        let fragments = split_text("acción reunión", 14);
        assert_eq!(fragments.len(), 1);
        let fragments = split_text("acción reunión", 13);
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let text = "uno dos tres cuatro cinco seis siete ocho nueve diez";
        assert_eq!(split_text(text, 9), split_text(text, 9));
    }

    #[test]
    fn test_chunk_stats() {
        let fragments = split_text("abc def ghi", 7);
        let stats = chunk_stats(&fragments);
        assert_eq!(stats.fragments, 2);
        assert_eq!(stats.largest_chars, 7);
        assert_eq!(stats.total_chars, 10);
    }
}
