use std::collections::HashMap;

/// One lexicon entry the bank can build a question from.
#[derive(Debug, Clone)]
pub struct BankEntry {
    pub word: String,
    pub correct_meaning: String,
    pub distractors: Vec<String>,
}

/// External question source, keyed by frequency rank. The engine never
/// generates question text; it only asks the bank and handles `None` with a
/// nearest-rank retry.
pub trait QuestionBank: Send + Sync {
    fn question_for_rank(&self, rank: u32) -> Option<BankEntry>;
    fn max_rank(&self) -> u32;
}

/// Map-backed bank, used by the bundled demo lexicon and by tests. Sparse
/// regions are simply absent keys.
#[derive(Default)]
pub struct InMemoryQuestionBank {
    entries: HashMap<u32, BankEntry>,
    max_rank: u32,
}

impl InMemoryQuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (u32, BankEntry)>) -> Self {
        let mut bank = Self::new();
        for (rank, entry) in entries {
            bank.insert(rank, entry);
        }
        bank
    }

    pub fn insert(&mut self, rank: u32, entry: BankEntry) {
        self.max_rank = self.max_rank.max(rank);
        self.entries.insert(rank, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QuestionBank for InMemoryQuestionBank {
    fn question_for_rank(&self, rank: u32) -> Option<BankEntry> {
        self.entries.get(&rank).cloned()
    }

    fn max_rank(&self) -> u32 {
        self.max_rank
    }
}
