//! Shared costing state for concurrent callers
//!
//! Each structure sits behind its own `RwLock`: any number of readers may
//! query at once, writers are exclusive. Access goes through closures so a
//! guard never outlives the call.

use std::sync::{PoisonError, RwLock};

use crate::core::rates::RateTable;
use crate::core::registry::SourcingRegistry;
use crate::core::resolver::RateResolver;

#[derive(Debug, Default)]
pub struct CostingSession {
    registry: RwLock<SourcingRegistry>,
    rates: RwLock<RateTable>,
}

impl CostingSession {
    pub fn new(registry: SourcingRegistry, rates: RateTable) -> Self {
        Self {
            registry: RwLock::new(registry),
            rates: RwLock::new(rates),
        }
    }

    /// Run a query against the rate table
    pub fn read_rates<T>(&self, f: impl FnOnce(RateResolver<'_>) -> T) -> T {
        let guard = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        f(RateResolver::new(&guard))
    }

    /// Mutate the rate table
    pub fn write_rates<T>(&self, f: impl FnOnce(&mut RateTable) -> T) -> T {
        let mut guard = self.rates.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn read_registry<T>(&self, f: impl FnOnce(&SourcingRegistry) -> T) -> T {
        let guard = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write_registry<T>(&self, f: impl FnOnce(&mut SourcingRegistry) -> T) -> T {
        let mut guard = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Take back ownership of both structures
    pub fn into_parts(self) -> (SourcingRegistry, RateTable) {
        (
            self.registry
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            self.rates.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::material::NewMaterial;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_writers_keep_cells_unique() {
        let session = Arc::new(CostingSession::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    for _ in 0..50 {
                        session.write_rates(|t| {
                            t.set_rate("BODY", "CI", "2", "SAND CAST", "IRONCORE", i as f64)
                        });
                        let seen = session
                            .read_rates(|r| r.has_rates_for_combo("BODY", "SAND CAST", "IRONCORE"));
                        assert!(seen);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let count = session.read_rates(|r| r.entries_for_cell("BODY", "CI", "2").len());
        assert_eq!(count, 1);
    }

    #[test]
    fn test_registry_access() {
        let session = CostingSession::default();
        let id =
            session.write_registry(|reg| reg.add_material(NewMaterial::new("BODY", 1.0, None)));
        session.write_registry(|reg| reg.add_supplier_to_process(&id, "SAND CAST", "IRONCORE"));

        let suppliers =
            session.read_registry(|reg| reg.get(&id).unwrap().sourcing[0].suppliers.clone());
        assert_eq!(suppliers, vec!["IRONCORE"]);

        let (registry, rates) = session.into_parts();
        assert_eq!(registry.len(), 1);
        assert!(rates.is_empty());
    }
}
