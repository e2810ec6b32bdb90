// Chunking invariants over arbitrary input

use proptest::prelude::*;
use ragdex::core::chunking::{get_chunker, ChunkParams, ChunkingStrategy};
use ragdex::core::types::DocumentChunk;

const STRATEGIES: [ChunkingStrategy; 4] = [
    ChunkingStrategy::Fixed,
    ChunkingStrategy::Semantic,
    ChunkingStrategy::Code,
    ChunkingStrategy::Paragraph,
];

fn assert_positions(chunks: &[DocumentChunk], text: &str) {
    let len = text.chars().count();
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.metadata.chunk_index, i);
        assert_eq!(chunk.metadata.total_chunks, chunks.len());
        assert!(chunk.metadata.char_start <= chunk.metadata.char_end);
        assert!(chunk.metadata.char_end <= len);
    }
}

#[test]
fn test_empty_text_yields_no_chunks() {
    for strategy in STRATEGIES {
        let chunker = get_chunker(strategy, ChunkParams::default());
        assert!(chunker.chunk("", None).is_empty(), "{strategy}");
    }
}

#[test]
fn test_oversized_function_stays_whole() {
    let mut body = String::new();
    for i in 0..60 {
        body.push_str(&format!("    let v{i} = {i} * 2;\n"));
    }
    let text = format!("fn small() {{\n    1\n}}\n\nfn big() {{\n{body}}}\n");

    let chunker = get_chunker(
        ChunkingStrategy::Code,
        ChunkParams::new(300, 50, 20).with_language("rust"),
    );
    let chunks = chunker.chunk(&text, None);

    let big = chunks
        .iter()
        .find(|c| c.text.contains("fn big"))
        .expect("big function chunk");
    assert!(big.text.chars().count() > 300);
    assert!(big.text.trim_end().ends_with('}'));
    assert_eq!(big.metadata.chunk_type, "code_block");
    assert_positions(&chunks, &text);
}

#[test]
fn test_fixed_overlap_larger_than_size_terminates() {
    let text = "word ".repeat(500);
    let chunker = get_chunker(ChunkingStrategy::Fixed, ChunkParams::new(50, 80, 1));
    let chunks = chunker.chunk(&text, None);

    assert!(!chunks.is_empty());
    assert!(chunks.len() <= text.len());
    assert_positions(&chunks, &text);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_strategy_keeps_positions_valid(
        text in "[a-zA-Z0-9 .!?{}()\n\té日🚀]{0,1500}",
        size in 1usize..400,
        overlap in 0usize..500,
        min in 0usize..60,
    ) {
        for strategy in STRATEGIES {
            let chunker = get_chunker(strategy, ChunkParams::new(size, overlap, min));
            let chunks = chunker.chunk(&text, None);
            assert_positions(&chunks, &text);
        }
    }

    #[test]
    fn prop_fixed_chunk_text_matches_span(
        text in "[a-z .!?\n日é]{1,1200}",
        size in 1usize..300,
        overlap in 0usize..300,
    ) {
        let chunker = get_chunker(ChunkingStrategy::Fixed, ChunkParams::new(size, overlap, 0));
        for chunk in chunker.chunk(&text, None) {
            let span: String = text
                .chars()
                .skip(chunk.metadata.char_start)
                .take(chunk.metadata.char_end - chunk.metadata.char_start)
                .collect();
            prop_assert_eq!(chunk.text, span);
        }
    }
}
