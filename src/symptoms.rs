use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{PlagueError, Result};

/// Index into the symptom catalog
pub type SymptomId = usize;

const SYMPTOM_NAMES: [&str; 8] = [
    "Cough", "Fever", "Rash", "Boils", "Delirium", "Chills", "Sneezing", "Pallor",
];

/// Ordered symptom ids and the cue each one displays. Immutable once built.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    names: Vec<String>,
}

impl SymptomCatalog {
    pub fn new(count: usize) -> Self {
        let names = (0..count)
            .map(|i| match SYMPTOM_NAMES.get(i) {
                Some(name) => name.to_string(),
                None => format!("Symptom {}", i),
            })
            .collect();
        SymptomCatalog { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: SymptomId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: SymptomId) -> bool {
        id < self.names.len()
    }
}

/// Draw `k` pairwise-distinct ids from `[0, n)` by rejection sampling.
///
/// Each draw is a uniform index; it is kept only if not already chosen.
/// `k > n` could never finish, so it is reported as a configuration error.
pub fn sample_distinct<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> Result<Vec<SymptomId>> {
    if k > n {
        return Err(PlagueError::Config(format!(
            "cannot draw {} distinct symptoms from a catalog of {}",
            k, n
        )));
    }

    let mut chosen = Vec::with_capacity(k);
    while chosen.len() < k {
        let candidate = rng.gen_range(0..n);
        if !chosen.contains(&candidate) {
            chosen.push(candidate);
        }
    }
    Ok(chosen)
}

/// The symptom set every infected patient of a session shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlagueSignature {
    symptoms: Vec<SymptomId>,
}

impl PlagueSignature {
    /// Drawn once per session start
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, catalog: &SymptomCatalog, count: usize) -> Result<Arc<Self>> {
        let symptoms = sample_distinct(rng, catalog.len(), count)?;
        tracing::info!(?symptoms, "Plague signature drawn");
        Ok(Arc::new(PlagueSignature { symptoms }))
    }

    pub fn from_symptoms(symptoms: Vec<SymptomId>) -> Self {
        PlagueSignature { symptoms }
    }

    pub fn symptoms(&self) -> &[SymptomId] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_sample_returns_k_distinct_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in 1..10 {
            for k in 0..=n {
                let ids = sample_distinct(&mut rng, n, k).unwrap();
                assert_eq!(ids.len(), k);
                let unique: HashSet<_> = ids.iter().copied().collect();
                assert_eq!(unique.len(), k);
                assert!(ids.iter().all(|&id| id < n));
            }
        }
    }

    #[test]
    fn test_sample_full_catalog_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = sample_distinct(&mut rng, 6, 6).unwrap();
        ids.sort();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sample_rejects_k_above_n() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(sample_distinct(&mut rng, 3, 4), Err(PlagueError::Config(_))));
    }

    #[test]
    fn test_signature_five_choose_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let catalog = SymptomCatalog::new(5);
        let signature = PlagueSignature::draw(&mut rng, &catalog, 3).unwrap();

        assert_eq!(signature.len(), 3);
        let unique: HashSet<_> = signature.symptoms().iter().copied().collect();
        assert_eq!(unique.len(), 3);
        assert!(signature.symptoms().iter().all(|&id| catalog.contains(id)));
    }

    #[test]
    fn test_catalog_names() {
        let catalog = SymptomCatalog::new(10);
        assert_eq!(catalog.name(0), Some("Cough"));
        assert_eq!(catalog.name(9), Some("Symptom 9"));
        assert_eq!(catalog.name(10), None);
    }
}
