//! Pair registry
//!
//! Creates pairs with deterministic label-derived addresses and hands out
//! shared references. One pair per ordered leg combination.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use ember_core::{Address, Fungible};

use crate::error::{AmmError, Result};
use crate::pair::Pair;

#[derive(Default)]
pub struct AmmFactory {
    pairs: RwLock<HashMap<(String, String), Arc<Pair>>>,
}

impl AmmFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the pair for (asset0, asset1); fails if it already exists
    pub fn create_pair(
        &self,
        asset0: Arc<dyn Fungible>,
        asset1: Arc<dyn Fungible>,
    ) -> Result<Arc<Pair>> {
        let key = (asset0.label(), asset1.label());
        let mut pairs = self.pairs.write();
        if pairs.contains_key(&key) {
            return Err(AmmError::PairExists);
        }
        let address = Address::from_label(&format!("pair:{}:{}", key.0, key.1));
        let pair = Arc::new(Pair::new(address, asset0, asset1));
        pairs.insert(key.clone(), pair.clone());
        info!(pair = %address, leg0 = %key.0, leg1 = %key.1, "pair created");
        Ok(pair)
    }

    pub fn get_pair(&self, label0: &str, label1: &str) -> Option<Arc<Pair>> {
        self.pairs
            .read()
            .get(&(label0.to_string(), label1.to_string()))
            .cloned()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.read().len()
    }
}
