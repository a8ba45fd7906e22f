use crate::models::song::Health;

/// Liveness only: reports OK without touching the store.
pub fn health() -> Health {
    Health { status: "OK" }
}
