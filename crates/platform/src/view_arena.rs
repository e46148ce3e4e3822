use core_types::InstanceId;
use router_api::{DEFAULT_OUTLET, MatchedRecord, Route, ViewTree};
use std::collections::HashMap;

/// Flat store of view instances and the records they are mounted for.
///
/// Instances mounted for a record stay mounted until explicitly unmounted,
/// the way cached (keep-alive) views behave.
#[derive(Debug, Default)]
pub struct ViewArena {
    parents: HashMap<InstanceId, Option<InstanceId>>,
    mounted: HashMap<(String, String), InstanceId>,
    next: u64,
}

impl ViewArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance that is not mounted for any record.
    pub fn spawn(&mut self, parent: Option<InstanceId>) -> InstanceId {
        self.next += 1;
        let id = InstanceId::from_raw(self.next);
        self.parents.insert(id, parent);
        id
    }

    /// Mount a fresh instance for `record` in `outlet`, replacing whatever
    /// was mounted there.
    pub fn mount(
        &mut self,
        record: &MatchedRecord,
        outlet: &str,
        parent: Option<InstanceId>,
    ) -> InstanceId {
        let id = self.spawn(parent);
        self.mounted
            .insert((record.path.clone(), outlet.to_string()), id);
        id
    }

    pub fn unmount(&mut self, record: &MatchedRecord, outlet: &str) -> Option<InstanceId> {
        let id = self
            .mounted
            .remove(&(record.path.clone(), outlet.to_string()))?;
        self.parents.remove(&id);
        Some(id)
    }

    /// Mount every record of `route` in the default outlet, each under the
    /// previous one and the first under `root`. Records already mounted keep
    /// their instance.
    pub fn mount_route(&mut self, route: &Route, root: InstanceId) -> Vec<InstanceId> {
        let mut parent = root;
        let mut ids = Vec::with_capacity(route.matched.len());
        for record in &route.matched {
            let id = match self.mounted(record, DEFAULT_OUTLET) {
                Some(id) => id,
                None => self.mount(record, DEFAULT_OUTLET, Some(parent)),
            };
            ids.push(id);
            parent = id;
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl ViewTree for ViewArena {
    fn parent(&self, instance: InstanceId) -> Option<InstanceId> {
        self.parents.get(&instance).copied().flatten()
    }

    fn mounted(&self, record: &MatchedRecord, outlet: &str) -> Option<InstanceId> {
        self.mounted
            .get(&(record.path.clone(), outlet.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_api::{Query, ancestors};

    #[test]
    fn mount_route_chains_parents_and_reuses_instances() {
        let mut arena = ViewArena::new();
        let root = arena.spawn(None);
        let route = Route::new(
            "/tabs/a",
            Query::new(),
            "",
            vec![MatchedRecord::new("/tabs"), MatchedRecord::new("/tabs/a")],
        );

        let ids = arena.mount_route(&route, root);
        let chain: Vec<_> = ancestors(&arena, ids[1]).collect();
        assert_eq!(chain, [ids[1], ids[0], root]);

        let again = arena.mount_route(&route, root);
        assert_eq!(again, ids);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn unmount_forgets_instance() {
        let mut arena = ViewArena::new();
        let record = MatchedRecord::new("/x");
        let id = arena.mount(&record, "side", None);
        assert_eq!(arena.mounted(&record, "side"), Some(id));
        assert_eq!(arena.mounted(&record, DEFAULT_OUTLET), None);
        assert_eq!(arena.unmount(&record, "side"), Some(id));
        assert!(arena.is_empty());
    }
}
