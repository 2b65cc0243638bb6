//! Log-weighted TF-IDF cosine ranking.
//!
//! Query weights: `w(t) = (1 + ln tf_q) * ln(N / df)`, L2-normalised over the query terms that
//! occur in the index. Document side: `tf(d, t) / norm(d)` where `norm(d)` is the length of the
//! document's `1 + ln tf` vector over every term it contains.

use crate::error::SearchError;
use crate::index::InvertedIndex;
use crate::query::QueryVector;
use crate::DocId;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringMode {
    /// Divide each document's contribution by its norm once.
    #[default]
    Cosine,
    /// Divide by the norm a second time after accumulation, reproducing older rankings.
    LegacyDoubleNorm,
}

impl FromStr for ScoringMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "cosine" => Ok(Self::Cosine),
            "legacy_double_norm" | "legacy" => Ok(Self::LegacyDoubleNorm),
            other => Err(SearchError::Configuration(format!("unknown scoring mode `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// `(1 + ln tf)` for `tf >= 1`, zero otherwise.
#[inline]
pub fn log_tf(tf: u32) -> f64 {
    if tf > 0 {
        1.0 + (tf as f64).ln()
    } else {
        0.0
    }
}

/// Euclidean length of every document's log-tf vector, indexed by `DocId`.
///
/// Terms are summed in lexicographic order so a rebuild gives the same bits.
pub fn document_norms(index: &InvertedIndex) -> Vec<f64> {
    let mut norms = vec![0.0f64; index.num_docs()];
    for (_, entry) in index.sorted_terms() {
        for p in &entry.postings {
            let w = log_tf(p.tf);
            norms[p.doc_id as usize] += w * w;
        }
    }
    for n in norms.iter_mut() {
        *n = n.sqrt();
    }
    norms
}

pub struct Scorer<'a> {
    index: &'a InvertedIndex,
    mode: ScoringMode,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a InvertedIndex, mode: ScoringMode) -> Self {
        Self { index, mode }
    }

    /// Normalised query weights. Terms absent from the index get no entry at all,
    /// so their IDF is never computed. Keys are ordered, which fixes the summation order.
    pub fn query_weights(&self, query: &QueryVector) -> BTreeMap<String, f64> {
        let n = self.index.num_docs() as f64;
        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        for (term, &tf_q) in &query.terms {
            let Some(entry) = self.index.get(term) else {
                continue;
            };
            let idf = (n / entry.document_frequency() as f64).ln();
            weights.insert(term.clone(), log_tf(tf_q) * idf);
        }
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        for w in weights.values_mut() {
            *w = if norm > 0.0 { *w / norm } else { 0.0 };
        }
        weights
    }

    /// Score every document and return them best first; ties keep document-set order.
    pub fn rank(&self, query: &QueryVector) -> Vec<ScoredDoc> {
        let weights = self.query_weights(query);
        let norms = &self.index.doc_norms;
        let mut scores = vec![0.0f64; self.index.num_docs()];

        for (term, &qw) in &weights {
            if qw == 0.0 {
                continue;
            }
            let Some(entry) = self.index.get(term) else {
                continue;
            };
            for p in &entry.postings {
                let norm = norms.get(p.doc_id as usize).copied().unwrap_or(0.0);
                if norm == 0.0 {
                    continue;
                }
                scores[p.doc_id as usize] += (p.tf as f64 / norm) * qw;
            }
        }

        if self.mode == ScoringMode::LegacyDoubleNorm {
            for (score, &norm) in scores.iter_mut().zip(norms.iter()) {
                if norm > 0.0 {
                    *score /= norm;
                }
            }
        }

        let mut ranked: Vec<ScoredDoc> = scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| ScoredDoc { doc_id: i as DocId, score })
            .collect();
        // `sort_by` is stable, so equal scores stay in document-set order.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        tracing::debug!(query_terms = query.len(), matched_terms = weights.len(), "ranked documents");
        ranked
    }
}
