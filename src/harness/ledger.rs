//! Cleanup ledger for resources tests create.

/// Ordered record of resource names a test created, with a watermark
/// separating entries already handed to cleanup from those still
/// pending.
///
/// The ledger backs two guarantees: cleanup is strictly sequential (the
/// delete callback runs for one name at a time, in creation order), and
/// draining twice never re-deletes. Each entry is handed to the callback
/// exactly once, even when an earlier callback failed.
#[derive(Debug, Default)]
pub struct CleanupLedger {
    names: Vec<String>,
    watermark: usize,
}

impl CleanupLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every name ever registered, drained or not.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Mutable access to the name pool, for sharing with
    /// [`crate::harness::idgen::generate_id`] so generated names are
    /// automatically scheduled for cleanup.
    pub fn pool(&mut self) -> &mut Vec<String> {
        &mut self.names
    }

    /// Names not yet handed to cleanup.
    #[must_use]
    pub fn pending(&self) -> &[String] {
        &self.names[self.watermark..]
    }

    /// How many entries cleanup already consumed.
    #[must_use]
    pub fn watermark(&self) -> usize {
        self.watermark
    }

    /// Runs `delete` over every pending name in creation order and
    /// returns how many callbacks completed. The watermark advances
    /// before each callback, so an entry is never re-issued; a failed
    /// callback stops the drain with later entries still pending.
    ///
    /// A CLI invocation that exits non-zero is not a callback failure.
    /// Cleanup of already-deleted resources is expected to report errors
    /// and must not halt the drain; callbacks should reserve `Err` for
    /// harness-level trouble.
    ///
    /// # Errors
    ///
    /// Propagates the first error the callback returns.
    pub fn drain<F, E>(&mut self, mut delete: F) -> Result<usize, E>
    where
        F: FnMut(&str) -> Result<(), E>,
    {
        let mut drained = 0;
        while self.watermark < self.names.len() {
            let name = self.names[self.watermark].clone();
            self.watermark += 1;
            delete(&name)?;
            drained += 1;
        }
        Ok(drained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_visits_pending_names_in_creation_order() {
        let mut ledger = CleanupLedger::new();
        ledger.pool().push("TestGroup1".to_string());
        ledger.pool().push("TestGroup2".to_string());

        let mut seen = Vec::new();
        let drained: Result<usize, ()> = ledger.drain(|name| {
            seen.push(name.to_string());
            Ok(())
        });
        assert_eq!(drained, Ok(2));
        assert_eq!(seen, vec!["TestGroup1".to_string(), "TestGroup2".to_string()]);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn second_drain_is_a_no_op() {
        let mut ledger = CleanupLedger::new();
        ledger.pool().push("TestGroup1".to_string());
        let _: Result<usize, ()> = ledger.drain(|_| Ok(()));

        let mut calls = 0;
        let drained: Result<usize, ()> = ledger.drain(|_| {
            calls += 1;
            Ok(())
        });
        assert_eq!(drained, Ok(0));
        assert_eq!(calls, 0);
    }

    #[test]
    fn names_added_after_a_drain_are_picked_up_by_the_next() {
        let mut ledger = CleanupLedger::new();
        ledger.pool().push("TestGroup1".to_string());
        let _: Result<usize, ()> = ledger.drain(|_| Ok(()));

        ledger.pool().push("TestGroup2".to_string());
        assert_eq!(ledger.pending(), ["TestGroup2".to_string()]);
        let mut seen = Vec::new();
        let drained: Result<usize, ()> = ledger.drain(|name| {
            seen.push(name.to_string());
            Ok(())
        });
        assert_eq!(drained, Ok(1));
        assert_eq!(seen, vec!["TestGroup2".to_string()]);
    }

    #[test]
    fn failed_callback_consumes_its_entry_but_keeps_the_rest_pending() {
        let mut ledger = CleanupLedger::new();
        ledger.pool().push("TestGroup1".to_string());
        ledger.pool().push("TestGroup2".to_string());

        let result = ledger.drain(|name| {
            if name == "TestGroup1" {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(ledger.watermark(), 1);
        assert_eq!(ledger.pending(), ["TestGroup2".to_string()]);
    }
}
