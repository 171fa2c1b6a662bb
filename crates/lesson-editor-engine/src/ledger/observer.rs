use super::edit::LedgerSnapshot;

/// Receives the full ledger state after every mutation.
///
/// Notifications are fire-and-forget and arrive in mutation order; the most
/// recent snapshot is authoritative.
pub trait LedgerObserver {
    fn ledger_changed(&mut self, snapshot: &LedgerSnapshot);
}

impl<F> LedgerObserver for F
where
    F: FnMut(&LedgerSnapshot),
{
    fn ledger_changed(&mut self, snapshot: &LedgerSnapshot) {
        self(snapshot)
    }
}
