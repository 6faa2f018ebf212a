use crate::engine::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    LowerBound, // Beta cutoff (fail-high)
    UpperBound, // Alpha cutoff (fail-low)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub flag: TTFlag,
}

/// Fixed-size, direct-mapped cache of search results.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    mask: usize,
}

/// Bounds on the slot count, whatever size the config asks for.
const MIN_ENTRIES: usize = 1 << 10;
const MAX_ENTRIES: usize = 1 << 26;

/// Largest power of two whose entries fit in `size_mb`, clamped to the bounds.
fn entry_count(size_mb: usize) -> usize {
    let entry_size = std::mem::size_of::<Option<TTEntry>>();
    let budget = size_mb.saturating_mul(1024 * 1024) / entry_size;
    let budget = budget.clamp(MIN_ENTRIES, MAX_ENTRIES);
    1 << budget.ilog2()
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let size = entry_count(size_mb);
        Self {
            entries: vec![None; size],
            mask: size - 1,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn slot(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.entries[self.slot(key)].filter(|e| e.key == key)
    }

    /// A stored score usable at `depth` inside the window `(alpha, beta)`.
    pub fn lookup(&self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.probe(key)?;
        if entry.depth < depth {
            return None;
        }
        match entry.flag {
            TTFlag::Exact => Some(entry.score),
            TTFlag::LowerBound if entry.score >= beta => Some(entry.score),
            TTFlag::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Best move recorded for `key`, if the slot still holds that position.
    pub fn best_move(&self, key: u64) -> Option<Move> {
        self.probe(key).and_then(|e| e.best_move)
    }

    pub fn store(
        &mut self,
        key: u64,
        best_move: Option<Move>,
        score: i32,
        depth: u8,
        flag: TTFlag,
    ) {
        let idx = self.slot(key);
        let slot = &mut self.entries[idx];

        // Overwrite on collision; for the same position keep the deeper result
        let replace = match slot {
            None => true,
            Some(entry) => entry.key != key || depth >= entry.depth,
        };
        if replace {
            *slot = Some(TTEntry {
                key,
                best_move,
                score,
                depth,
                flag,
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
