//! Room naming.

use bizhub_core::types::ActorId;

/// Builds and parses per-actor room names of the form `<prefix>:<actor_id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScheme {
    prefix: String,
}

impl TopicScheme {
    /// Scheme with the given prefix, without the trailing colon.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches(':').to_string(),
        }
    }

    /// The room every session of `actor_id` joins.
    pub fn for_actor(&self, actor_id: ActorId) -> String {
        format!("{}:{actor_id}", self.prefix)
    }

    /// Recover the actor from a room name of this scheme.
    pub fn parse(&self, topic: &str) -> Option<ActorId> {
        let (prefix, id) = topic.split_once(':')?;
        if prefix != self.prefix {
            return None;
        }
        id.parse().ok()
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for TopicScheme {
    fn default() -> Self {
        Self::new("notif")
    }
}
