use crate::clock::SharedClock;
use crate::commands::WidgetKind;

/// Mints `kind-<millis>` widget instance ids and block ids.
///
/// Stamps are strictly increasing for the lifetime of the minter, so two
/// widgets inserted within the same millisecond still get distinct ids.
pub struct IdMinter {
    clock: SharedClock,
    last: i64,
}

impl IdMinter {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            last: i64::MIN,
        }
    }

    pub fn mint(&mut self, kind: WidgetKind) -> String {
        self.mint_prefixed(kind.as_str())
    }

    /// Mints `<prefix>-<millis>`, sharing the stamp sequence with [`mint`](Self::mint).
    pub fn mint_prefixed(&mut self, prefix: &str) -> String {
        let now = self.clock.now_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        format!("{prefix}-{}", self.last)
    }
}
