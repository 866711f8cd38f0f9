use dashmap::DashMap;
use std::sync::Arc;

use crate::error::CacheError;

use super::coordinator::Group;
use super::source::SourceFn;

/// Process-wide directory of named groups. Handlers receive it explicitly;
/// there is no global.
pub struct Registry {
    groups: DashMap<String, Arc<Group>>,
}

impl Registry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            groups: DashMap::new(),
        })
    }

    /// Creates a group and registers it, replacing any previous group of the
    /// same name.
    pub fn new_group(
        &self,
        name: &str,
        cache_bytes: usize,
        source: SourceFn,
    ) -> Result<Arc<Group>, CacheError> {
        if name.is_empty() {
            return Err(CacheError::InvalidArgument(
                "namespace name must not be empty".to_string(),
            ));
        }

        let group = Arc::new(Group::new(name, cache_bytes, source));
        self.groups.insert(name.to_string(), group.clone());
        tracing::info!("registered namespace {}", name);
        Ok(group)
    }

    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
