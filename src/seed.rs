use crate::bank::{BankEntry, InMemoryQuestionBank};

/// Head of a corpus frequency list, enough for demos to feel real at the
/// frequent end. Past it the demo bank falls back to synthetic fillers.
const COMMON_WORDS: &[(&str, &str)] = &[
    ("the", "definite article"),
    ("be", "to exist or occur"),
    ("time", "the indefinite continued progress of events"),
    ("people", "human beings in general"),
    ("way", "a method or manner of doing something"),
    ("water", "the liquid that forms seas and rain"),
    ("long", "measuring a great distance end to end"),
    ("little", "small in size or amount"),
    ("world", "the earth and all its inhabitants"),
    ("school", "an institution for education"),
    ("family", "a group of related people"),
    ("night", "the period of darkness between sunset and sunrise"),
    ("music", "vocal or instrumental sounds arranged with harmony"),
    ("question", "a sentence worded to elicit information"),
    ("mountain", "a large natural elevation of the earth's surface"),
    ("window", "an opening in a wall fitted with glass"),
    ("language", "a system of communication used by a community"),
    ("morning", "the early part of the day"),
    ("garden", "a piece of ground used to grow plants"),
    ("journey", "an act of travelling from one place to another"),
];

/// Bank for local runs and route tests: real entries for the most frequent
/// ranks, synthetic entries for the rest, one per rank so demo sessions
/// never hit the nearest-rank fallback.
pub fn demo_bank(max_rank: u32) -> InMemoryQuestionBank {
    let mut bank = InMemoryQuestionBank::new();
    for rank in 1..=max_rank {
        bank.insert(rank, demo_entry(rank));
    }
    tracing::debug!(entries = bank.len(), max_rank, "demo question bank seeded");
    bank
}

fn demo_entry(rank: u32) -> BankEntry {
    let (word, correct_meaning) = match COMMON_WORDS.get(rank as usize - 1) {
        Some((word, meaning)) => ((*word).to_string(), (*meaning).to_string()),
        None => (
            format!("lexeme-{rank:05}"),
            format!("definition of lexeme {rank}"),
        ),
    };

    // Distractors are meanings of other ranks, offset far enough past the
    // word list tail to never collide with the correct meaning.
    let distractors = (1..=3u32)
        .map(|i| {
            let other = rank + 20 + i * 37;
            format!("definition of lexeme {other}")
        })
        .collect();

    BankEntry {
        word,
        correct_meaning,
        distractors,
    }
}
