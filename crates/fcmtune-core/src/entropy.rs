// crates/fcmtune-core/src/entropy.rs
//
// Empirical entropy of a symbol sequence.
//
//   H(X)   = -sum_s p(s) log2 p(s),                p(s) = count(s) / N
//   H(Y|X) =  sum_c p(c) H(Y | X = c),             p(c) = count(c) / (N - k)
//   R      =  1 - H(Y|X) / H(X)                    (0 when H(X) == 0)
//
// Contexts are the k symbols preceding each scored position, so positions
// k..N are scored and there are N - k observations in total.
//
// Tables are ordered maps: the floating-point sums are then accumulated in a
// fixed order and repeated runs agree bit for bit.

use std::collections::BTreeMap;

use serde::Serialize;

/// Context -> (next symbol -> count), borrowing contexts from the sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<'a, T: Ord> {
    k: usize,
    total: u64,
    contexts: BTreeMap<&'a [T], BTreeMap<T, u64>>,
}

impl<'a, T: Ord + Copy> FrequencyTable<'a, T> {
    pub fn build(seq: &'a [T], k: usize) -> Self {
        let mut contexts: BTreeMap<&'a [T], BTreeMap<T, u64>> = BTreeMap::new();
        let mut total = 0u64;

        if seq.len() > k {
            for i in 0..seq.len() - k {
                let ctx = &seq[i..i + k];
                let sym = seq[i + k];
                *contexts.entry(ctx).or_default().entry(sym).or_insert(0) += 1;
                total += 1;
            }
        }

        Self { k, total, contexts }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of (context, symbol) observations, i.e. max(N - k, 0).
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct_contexts(&self) -> usize {
        self.contexts.len()
    }

    pub fn get(&self, ctx: &[T]) -> Option<&BTreeMap<T, u64>> {
        self.contexts.get(ctx)
    }

    /// How often `ctx` was followed by any symbol.
    pub fn context_count(&self, ctx: &[T]) -> u64 {
        self.get(ctx).map(|m| m.values().sum()).unwrap_or(0)
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, &'a [T], BTreeMap<T, u64>> {
        self.contexts.iter()
    }

    /// Weighted sum of per-context entropies. `None` when nothing was observed.
    pub fn conditional_entropy(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let total = self.total as f64;
        let mut h = 0.0;
        for next in self.contexts.values() {
            let n_ctx: u64 = next.values().sum();
            let p_ctx = (n_ctx as f64) / total;
            h += p_ctx * entropy_of_counts(next.values().copied(), n_ctx);
        }
        Some(h)
    }
}

/// Shannon entropy of a count distribution in bits. Zero counts are skipped;
/// a zero total yields 0.
pub fn entropy_of_counts<I>(counts: I, total: u64) -> f64
where
    I: IntoIterator<Item = u64>,
{
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut ent = 0.0;
    for c in counts {
        if c == 0 {
            continue;
        }
        let p = (c as f64) / total;
        ent -= p * p.log2();
    }
    // -0.0 for constant sequences
    ent.max(0.0)
}

/// Zero-order entropy H(X). Returns 0.0 for an empty sequence.
pub fn shannon_entropy<T: Ord + Copy>(seq: &[T]) -> f64 {
    let mut hist: BTreeMap<T, u64> = BTreeMap::new();
    for &s in seq {
        *hist.entry(s).or_insert(0) += 1;
    }
    entropy_of_counts(hist.into_values(), seq.len() as u64)
}

/// Order-k conditional entropy H(Y|X).
///
/// Undefined (`None`) when `seq.len() <= k`: there is no position with a full
/// context. `k == 0` conditions on the empty context and equals H(X).
pub fn conditional_entropy<T: Ord + Copy>(seq: &[T], k: usize) -> Option<f64> {
    FrequencyTable::build(seq, k).conditional_entropy()
}

/// R = 1 - H(Y|X)/H(X), or 0 when H(X) is not positive.
///
/// Clamped to [0, 1]; for real input H(Y|X) <= H(X) and only rounding can
/// push the ratio outside that range.
pub fn redundancy(h_x: f64, h_yx: f64) -> f64 {
    if h_x.is_nan() || h_x <= 0.0 || !h_yx.is_finite() {
        return 0.0;
    }
    (1.0 - h_yx / h_x).clamp(0.0, 1.0)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntropyReport {
    pub k: usize,
    pub symbols: usize,
    pub alphabet: usize,
    pub distinct_contexts: usize,
    pub shannon: f64,
    /// `None` when the sequence is not longer than k.
    pub conditional: Option<f64>,
    pub redundancy: f64,
}

impl EntropyReport {
    pub fn measure<T: Ord + Copy>(seq: &[T], k: usize) -> Self {
        let table = FrequencyTable::build(seq, k);
        let alphabet = seq.iter().copied().collect::<std::collections::BTreeSet<T>>().len();
        let shannon = shannon_entropy(seq);
        let conditional = table.conditional_entropy();
        let redundancy = conditional.map(|h| redundancy(shannon, h)).unwrap_or(0.0);

        tracing::debug!(
            k,
            symbols = seq.len(),
            alphabet,
            contexts = table.distinct_contexts(),
            "entropy measured"
        );

        Self {
            k: table.k(),
            symbols: seq.len(),
            alphabet,
            distinct_contexts: table.distinct_contexts(),
            shannon,
            conditional,
            redundancy,
        }
    }
}
