use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Registry of users with a sync run in flight.
///
/// A second trigger for a user holding a permit is rejected at the HTTP
/// boundary instead of racing the running pipeline.
#[derive(Clone, Default)]
pub struct ActiveSyncs {
    inner: Arc<DashMap<i32, ()>>,
}

impl ActiveSyncs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the user's slot. Returns `None` while another run holds it.
    pub fn try_begin(&self, user_id: i32) -> Option<SyncPermit> {
        match self.inner.entry(user_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(SyncPermit {
                    user_id,
                    registry: Arc::clone(&self.inner),
                })
            }
        }
    }
}

/// Exclusive claim on one user's sync slot; released on drop, so the slot
/// frees no matter how the pipeline task ends.
pub struct SyncPermit {
    user_id: i32,
    registry: Arc<DashMap<i32, ()>>,
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.registry.remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_for_same_user_is_rejected() {
        let syncs = ActiveSyncs::new();
        let permit = syncs.try_begin(1);
        assert!(permit.is_some());
        assert!(syncs.try_begin(1).is_none());
    }

    #[test]
    fn different_users_do_not_contend() {
        let syncs = ActiveSyncs::new();
        let _a = syncs.try_begin(1).unwrap();
        assert!(syncs.try_begin(2).is_some());
    }

    #[test]
    fn dropping_the_permit_frees_the_slot() {
        let syncs = ActiveSyncs::new();
        drop(syncs.try_begin(1).unwrap());
        assert!(syncs.try_begin(1).is_some());
    }
}
