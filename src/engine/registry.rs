//! `Registry`: the process-wide map from environment name to its live
//! `Engine`, resolving the ownership diamond between callers that each hold
//! a name and expect to reach the same underlying storage.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, RwLock},
    time::Duration,
};

use crate::{config, err_at, util, Result};

use super::{transport, Engine};

/// One registered environment: its live engine plus the background thread
/// folding its buffer into segment storage every `flush_interval_ms`.
struct Entry {
    engine: Arc<Engine>,
    #[allow(dead_code)]
    transporter: util::Thread<(), (), ()>,
}

pub struct Registry {
    root: PathBuf,
    flush_interval_ms: u64,
    engines: RwLock<HashMap<String, Entry>>,
}

impl Registry {
    pub fn new(root: PathBuf) -> Registry {
        Registry { root, flush_interval_ms: config::FLUSH_INTERVAL_MS, engines: RwLock::new(HashMap::new()) }
    }

    pub fn set_flush_interval_ms(mut self, ms: u64) -> Registry {
        self.flush_interval_ms = ms;
        self
    }

    /// Return the named environment's engine, creating it on first use.
    pub fn get_or_create(&self, name: &str) -> Result<Arc<Engine>> {
        if let Some(entry) = self.engines.read().unwrap().get(name) {
            return Ok(entry.engine.clone());
        }

        let mut engines = self.engines.write().unwrap();
        if let Some(entry) = engines.get(name) {
            return Ok(entry.engine.clone());
        }

        let dir = self.root.join(name);
        let engine = Arc::new(if dir.join("table").join("MANIFEST").exists() {
            Engine::load(name, dir)?
        } else {
            Engine::create(name, dir)?
        });
        let transporter = transport::spawn(engine.clone(), Duration::from_millis(self.flush_interval_ms));
        engines.insert(name.to_string(), Entry { engine: engine.clone(), transporter });
        Ok(engine)
    }

    pub fn get(&self, name: &str) -> Result<Arc<Engine>> {
        match self.engines.read().unwrap().get(name) {
            Some(entry) => Ok(entry.engine.clone()),
            None => err_at!(InvalidArgument, msg: "no such environment {:?}", name),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.engines.read().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;
