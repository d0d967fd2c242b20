use explorer_protocol::turn::Capability;
use explorer_protocol::turn::Role;
use explorer_protocol::turn::Turn;

/// In-memory transcript of one interactive run. The store is created after
/// configuration succeeds, owned by the application, and passed explicitly;
/// there is exactly one writer, so no locking is involved.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// The oldest turns are at the beginning of the vector.
    turns: Vec<Turn>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Every turn in insertion order.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// The turns belonging to one capability page, in insertion order.
    pub fn history_for(&self, capability: Capability) -> Vec<&Turn> {
        self.turns
            .iter()
            .filter(|turn| turn.capability == capability)
            .collect()
    }

    /// Number of agent turns recorded for a capability; one per successful
    /// adapter call.
    pub fn agent_turns_for(&self, capability: Capability) -> usize {
        self.turns
            .iter()
            .filter(|turn| turn.capability == capability && turn.role == Role::Agent)
            .count()
    }

    /// Drop every turn recorded for `capability` (the page-level clear).
    pub fn clear(&mut self, capability: Capability) {
        self.turns.retain(|turn| turn.capability != capability);
    }

    /// Discard the whole session.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}
