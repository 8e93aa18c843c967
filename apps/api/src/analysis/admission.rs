use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

/// At most one in-flight analysis per document.
#[derive(Debug, Clone, Default)]
pub struct AdmissionControl {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl AdmissionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the document already has an analysis in flight.
    pub fn try_admit(&self, document_id: Uuid) -> Option<AdmissionGuard> {
        if !self.lock().insert(document_id) {
            return None;
        }
        Some(AdmissionGuard {
            control: self.clone(),
            document_id,
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        // The set stays consistent even if a holder panicked.
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the document's slot when dropped.
#[derive(Debug)]
pub struct AdmissionGuard {
    control: AdmissionControl,
    document_id: Uuid,
}

impl Drop for AdmissionGuard {
    fn drop(&mut self) {
        self.control.lock().remove(&self.document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_admission_rejected_until_release() {
        let control = AdmissionControl::new();
        let doc = Uuid::new_v4();

        let guard = control.try_admit(doc);
        assert!(guard.is_some());
        assert!(control.try_admit(doc).is_none());

        drop(guard);
        assert!(control.try_admit(doc).is_some());
    }

    #[test]
    fn test_documents_are_independent() {
        let control = AdmissionControl::new();
        let _a = control.try_admit(Uuid::new_v4()).unwrap();
        assert!(control.try_admit(Uuid::new_v4()).is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let control = AdmissionControl::new();
        let doc = Uuid::new_v4();
        let _guard = control.clone().try_admit(doc).unwrap();
        assert!(control.try_admit(doc).is_none());
    }
}
