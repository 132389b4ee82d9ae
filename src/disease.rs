use rand::Rng;
use std::sync::Arc;

use crate::config::DiseaseConfig;
use crate::error::Result;
use crate::symptoms::{sample_distinct, PlagueSignature, SymptomCatalog, SymptomId};

/// Symptoms carried by one patient
#[derive(Debug, Clone, PartialEq)]
pub enum SymptomSet {
    /// The session-wide plague signature, shared with every infected patient
    Plague(Arc<PlagueSignature>),
    /// An independently sampled set for a healthy patient
    Ordinary(Vec<SymptomId>),
}

impl SymptomSet {
    pub fn ids(&self) -> &[SymptomId] {
        match self {
            SymptomSet::Plague(signature) => signature.symptoms(),
            SymptomSet::Ordinary(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    pub fn is_plague(&self) -> bool {
        matches!(self, SymptomSet::Plague(_))
    }
}

/// Session-level disease state: the catalog, the drawn plague and the
/// settings used to assign symptoms to newly spawned patients.
#[derive(Debug, Clone)]
pub struct Disease {
    pub config: DiseaseConfig,
    pub catalog: SymptomCatalog,
    pub plague: Arc<PlagueSignature>,
}

impl Disease {
    /// Build the catalog and draw this session's plague signature
    pub fn new<R: Rng + ?Sized>(config: DiseaseConfig, rng: &mut R) -> Result<Self> {
        let catalog = SymptomCatalog::new(config.symptom_count);
        let plague = PlagueSignature::draw(rng, &catalog, config.plague_symptom_count)?;
        Ok(Disease { config, catalog, plague })
    }

    /// Rebuild around an existing signature (used when restoring a snapshot)
    pub fn with_signature(config: DiseaseConfig, plague: PlagueSignature) -> Self {
        let catalog = SymptomCatalog::new(config.symptom_count);
        Disease {
            config,
            catalog,
            plague: Arc::new(plague),
        }
    }

    /// One-shot assignment for a new patient.
    ///
    /// The draw is in `1..10` and compared against `plague_chance` (0..=10),
    /// so the effective probability is `(plague_chance - 1) / 9`.
    pub fn assign<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SymptomSet> {
        let roll: u32 = rng.gen_range(1..10);
        if roll < self.config.plague_chance {
            return Ok(SymptomSet::Plague(Arc::clone(&self.plague)));
        }

        let count = rng.gen_range(1..=self.config.max_symptom_count);
        let ids = sample_distinct(rng, self.catalog.len(), count)?;
        Ok(SymptomSet::Ordinary(ids))
    }
}
