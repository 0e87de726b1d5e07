//! Property tests for the recursive chunker.

use docqa_rag::RecursiveChunker;
use proptest::prelude::*;

/// Text built from words, punctuation and breaks, with some non-ASCII.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-zäöü]{1,12}",
            2 => Just(" ".to_string()),
            1 => Just(". ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\n\n".to_string()),
        ],
        1..120,
    )
    .prop_map(|parts| parts.concat())
    .prop_filter("non-blank", |text| !text.trim().is_empty())
}

/// Chunk size and an overlap strictly smaller than it.
fn arb_params() -> impl Strategy<Value = (usize, usize)> {
    (1usize..80).prop_flat_map(|size| (Just(size), 0..size))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn chunks_never_exceed_the_size_limit(text in arb_text(), (size, overlap) in arb_params()) {
        let chunker = RecursiveChunker::new(size, overlap).unwrap();
        for chunk in chunker.split(&text) {
            prop_assert!(char_len(chunk) <= size, "{:?} longer than {}", chunk, size);
            prop_assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn adjacent_chunks_share_exactly_the_overlap(
        text in arb_text(),
        (size, overlap) in arb_params(),
    ) {
        let chunker = RecursiveChunker::new(size, overlap).unwrap();
        let chunks: Vec<&str> = chunker.split(&text).collect();
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let head: Vec<char> = pair[1].chars().take(overlap).collect();
            prop_assert_eq!(&prev[prev.len() - overlap..], head.as_slice());
        }
    }

    #[test]
    fn dropping_the_overlap_reconstructs_the_text(
        text in arb_text(),
        (size, overlap) in arb_params(),
    ) {
        let mut chunks = RecursiveChunker::new(size, overlap).unwrap().split(&text);
        let mut rebuilt = chunks.next().unwrap_or_default().to_string();
        for chunk in chunks {
            rebuilt.extend(chunk.chars().skip(overlap));
        }
        prop_assert_eq!(rebuilt, text);
    }
}
