//! The session registry: who is connected, under what name.

use chatrelay_transport::SessionId;

use crate::{Session, SessionError};

/// The authoritative, insertion-ordered collection of live sessions.
///
/// Backed by a `Vec` rather than a map: the roster broadcast reports
/// usernames in connection-arrival order, so the registry preserves
/// that order structurally instead of sorting on demand. Linear scans
/// are fine at chat-server scale.
///
/// # Invariants
///
/// - A session id appears at most once, from accept until disconnect.
/// - At most one session holds any given non-empty username at a time
///   (exact, case-sensitive match). Enforced by the router's connect
///   and rename logic; the registry supplies the collision check.
/// - The empty username is exempt — any number of unnamed sessions may
///   coexist.
///
/// # Concurrency note
///
/// `SessionRegistry` is NOT thread-safe by itself, and deliberately so:
/// it is owned by the single relay task, and every mutation happens on
/// that one control path. Mutual exclusion is structural, so there is
/// no hidden locking here.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
}

impl SessionRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly accepted connection as an unnamed session.
    ///
    /// # Errors
    /// Returns [`SessionError::DuplicateSession`] if the id is already
    /// registered. Ids come from a monotonic counter, so hitting this
    /// indicates a wiring bug rather than a runtime race.
    pub fn insert(&mut self, id: SessionId) -> Result<(), SessionError> {
        if self.contains(id) {
            return Err(SessionError::DuplicateSession(id));
        }
        self.sessions.push(Session::new(id));
        Ok(())
    }

    /// Removes a session, returning it (buffered input and all).
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no such session exists.
    pub fn remove(&mut self, id: SessionId) -> Result<Session, SessionError> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(SessionError::NotFound(id))?;
        Ok(self.sessions.remove(index))
    }

    /// Looks up a session by id.
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Looks up a session by id, mutably.
    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Returns `true` if the id is currently registered.
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    /// Returns `true` if any session OTHER than `requester` currently
    /// holds `username`.
    ///
    /// The empty string never collides: unnamed sessions are exempt
    /// from the uniqueness rule.
    pub fn username_taken_by_other(
        &self,
        username: &str,
        requester: SessionId,
    ) -> bool {
        if username.is_empty() {
            return false;
        }
        self.sessions
            .iter()
            .any(|s| s.id != requester && s.username == username)
    }

    /// Ids of every session whose username exactly equals `username`,
    /// in registry order.
    ///
    /// Usually zero or one, but uniqueness is enforced upstream, not
    /// re-checked here — and the empty username legitimately matches
    /// several unnamed sessions.
    pub fn ids_with_username(&self, username: &str) -> Vec<SessionId> {
        self.sessions
            .iter()
            .filter(|s| s.username == username)
            .map(|s| s.id)
            .collect()
    }

    /// Full username snapshot in insertion order, with an empty field
    /// for each unnamed session.
    pub fn usernames(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.username.clone()).collect()
    }

    /// Point-in-time snapshot of registered ids, for broadcast
    /// iteration that must tolerate concurrent removal.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|s| s.id).collect()
    }

    /// Returns the number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(id: u64) -> SessionId {
        SessionId::new(id)
    }

    /// Registers a session and gives it a name.
    fn insert_named(registry: &mut SessionRegistry, id: u64, name: &str) {
        registry.insert(sid(id)).expect("insert should succeed");
        registry
            .get_mut(sid(id))
            .expect("just inserted")
            .username = name.to_string();
    }

    #[test]
    fn test_insert_registers_unnamed_session() {
        let mut registry = SessionRegistry::new();
        registry.insert(sid(1)).expect("should succeed");

        let session = registry.get(sid(1)).expect("should exist");
        assert!(!session.is_named());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_id_returns_error() {
        let mut registry = SessionRegistry::new();
        registry.insert(sid(1)).expect("first insert");

        let result = registry.insert(sid(1));
        assert!(matches!(
            result,
            Err(SessionError::DuplicateSession(id)) if id == sid(1)
        ));
        assert_eq!(registry.len(), 1, "registry must be unchanged");
    }

    #[test]
    fn test_remove_returns_session_and_unregisters() {
        let mut registry = SessionRegistry::new();
        insert_named(&mut registry, 1, "alice");

        let session = registry.remove(sid(1)).expect("should succeed");
        assert_eq!(session.username, "alice");
        assert!(registry.is_empty());
        assert!(!registry.contains(sid(1)));
    }

    #[test]
    fn test_remove_unknown_id_returns_not_found() {
        let mut registry = SessionRegistry::new();
        let result = registry.remove(sid(99));
        assert!(matches!(
            result,
            Err(SessionError::NotFound(id)) if id == sid(99)
        ));
    }

    #[test]
    fn test_usernames_preserve_insertion_order() {
        let mut registry = SessionRegistry::new();
        insert_named(&mut registry, 1, "alice");
        registry.insert(sid(2)).expect("insert"); // stays unnamed
        insert_named(&mut registry, 3, "carol");

        assert_eq!(registry.usernames(), vec!["alice", "", "carol"]);
    }

    #[test]
    fn test_order_survives_removal_of_middle_session() {
        let mut registry = SessionRegistry::new();
        insert_named(&mut registry, 1, "alice");
        insert_named(&mut registry, 2, "bob");
        insert_named(&mut registry, 3, "carol");

        registry.remove(sid(2)).expect("remove");

        assert_eq!(registry.usernames(), vec!["alice", "carol"]);
        assert_eq!(registry.ids(), vec![sid(1), sid(3)]);
    }

    #[test]
    fn test_username_taken_by_other_excludes_requester() {
        let mut registry = SessionRegistry::new();
        insert_named(&mut registry, 1, "alice");

        // Someone else holds "alice" → taken.
        assert!(registry.username_taken_by_other("alice", sid(2)));
        // The holder itself asking about its own name → not taken.
        assert!(!registry.username_taken_by_other("alice", sid(1)));
        // Nobody holds "bob".
        assert!(!registry.username_taken_by_other("bob", sid(2)));
    }

    #[test]
    fn test_empty_username_never_collides() {
        let mut registry = SessionRegistry::new();
        registry.insert(sid(1)).expect("insert");
        registry.insert(sid(2)).expect("insert");

        // Two unnamed sessions coexist, and "" is never taken.
        assert!(!registry.username_taken_by_other("", sid(3)));
    }

    #[test]
    fn test_ids_with_username_matches_exactly() {
        let mut registry = SessionRegistry::new();
        insert_named(&mut registry, 1, "alice");
        insert_named(&mut registry, 2, "Alice"); // different: case-sensitive
        registry.insert(sid(3)).expect("insert"); // unnamed

        assert_eq!(registry.ids_with_username("alice"), vec![sid(1)]);
        assert_eq!(registry.ids_with_username("Alice"), vec![sid(2)]);
        assert_eq!(registry.ids_with_username(""), vec![sid(3)]);
        assert!(registry.ids_with_username("bob").is_empty());
    }
}
