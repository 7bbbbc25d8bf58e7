//! Internal connection identifier.
//!
//! Keys the [`super::ConnectionRegistry`] and tags log lines. Clients never
//! see it: relayed frames carry no sender identity.

use std::fmt;

use uuid::Uuid;

/// Random (v4) identifier assigned when a socket is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_random_v4() {
        let id = ConnectionId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn many_accepted_sockets_get_distinct_keys() {
        let ids: HashSet<ConnectionId> = (0..256).map(|_| ConnectionId::default()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn log_field_is_the_hyphenated_uuid() {
        let id = ConnectionId::new();
        assert_eq!(format!("{id}"), id.as_uuid().hyphenated().to_string());
    }
}
