use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use parking_lot::{Mutex, RwLock};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::graph::LearningGraph;
use crate::core::mastery::MasteryStore;
use crate::core::planner::StudyPlanner;
use crate::core::srs::RevisionScheduler;
use crate::core::EngineConfig;

/// Shared application state. Each store sits behind its own lock and the
/// route handlers are the only writers, which keeps every mutation a single
/// entry point per store.
#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    engine_config: EngineConfig,
    mastery: Arc<RwLock<MasteryStore>>,
    revision: Arc<RwLock<RevisionScheduler>>,
    graphs: Arc<RwLock<BTreeMap<String, LearningGraph>>>,
    planner: Arc<RwLock<StudyPlanner>>,
    drift_rng: Arc<Mutex<ChaCha8Rng>>,
}

impl AppState {
    pub fn new(engine_config: EngineConfig, drift_seed: Option<u64>) -> Self {
        let drift_rng = match drift_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            mastery: Arc::new(RwLock::new(MasteryStore::new(engine_config.clone()))),
            revision: Arc::new(RwLock::new(RevisionScheduler::new())),
            graphs: Arc::new(RwLock::new(BTreeMap::new())),
            planner: Arc::new(RwLock::new(StudyPlanner::new())),
            drift_rng: Arc::new(Mutex::new(drift_rng)),
            engine_config,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    pub fn mastery(&self) -> &RwLock<MasteryStore> {
        &self.mastery
    }

    pub fn revision(&self) -> &RwLock<RevisionScheduler> {
        &self.revision
    }

    pub fn graphs(&self) -> &RwLock<BTreeMap<String, LearningGraph>> {
        &self.graphs
    }

    pub fn planner(&self) -> &RwLock<StudyPlanner> {
        &self.planner
    }

    pub fn drift_rng(&self) -> &Mutex<ChaCha8Rng> {
        &self.drift_rng
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default(), None)
    }
}
