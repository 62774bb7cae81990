use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::debug;

use super::{ColumnMap, CsvRecord};

/// Per-instance cache of column maps, one per concrete record type.
///
/// Maps declared through [`CsvRecord::column_map`] are built lazily on
/// first use; [`MapRegistry::register`] installs a map eagerly, overriding
/// the type's own declaration.
#[derive(Default)]
pub struct MapRegistry {
    maps: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached map for `T`, building it from
    /// [`CsvRecord::column_map`] on the first call.
    pub fn get_or_create<T: CsvRecord>(&self) -> Arc<ColumnMap<T>> {
        if let Ok(maps) = self.maps.read() {
            if let Some(existing) = maps.get(&TypeId::of::<T>()) {
                if let Ok(map) = Arc::clone(existing).downcast::<ColumnMap<T>>() {
                    return map;
                }
            }
        }

        let built = Arc::new(T::column_map());
        debug!(
            "built column map for {} ({} mappings)",
            std::any::type_name::<T>(),
            built.len()
        );
        if let Ok(mut maps) = self.maps.write() {
            // Another path may have inserted concurrently; first one wins.
            let entry = maps
                .entry(TypeId::of::<T>())
                .or_insert_with(|| built.clone());
            if let Ok(map) = Arc::clone(entry).downcast::<ColumnMap<T>>() {
                return map;
            }
        }
        built
    }

    /// Installs `map` for `T`, overriding the type's own declaration for
    /// every later [`MapRegistry::get_or_create`] call.
    pub fn register<T: CsvRecord>(&self, map: ColumnMap<T>) {
        if let Ok(mut maps) = self.maps.write() {
            maps.insert(TypeId::of::<T>(), Arc::new(map));
        }
    }
}
