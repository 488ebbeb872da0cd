use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::draft::MealDraft;

/// A commit that wrote its meal header but not yet all of its line items.
/// `written` holds the food ids whose line items are already persisted, so a
/// retry completes the meal instead of duplicating rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub meal_id: Uuid,
    pub written: Vec<Uuid>,
}

/// One meal-composition session: the draft value plus any half-finished
/// commit. Owned by exactly one user.
#[derive(Debug, Clone)]
pub struct DraftSession {
    pub user_id: Uuid,
    pub draft: MealDraft,
    pub pending: Option<PendingCommit>,
}

/// In-process registry of composition sessions, keyed by an explicit handle
/// handed to the client when the flow is entered. The mutex is only held for
/// synchronous closures, never across an await.
#[derive(Clone, Default)]
pub struct DraftSessions {
    inner: Arc<Mutex<HashMap<Uuid, DraftSession>>>,
}

impl DraftSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session with an empty draft and return its handle.
    pub fn open(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        let session = DraftSession {
            user_id,
            draft: MealDraft::default(),
            pending: None,
        };
        self.lock().insert(id, session);
        id
    }

    /// Snapshot a session. `None` when the handle is unknown or owned by a
    /// different user (the two are indistinguishable to callers).
    pub fn get(&self, id: Uuid, user_id: Uuid) -> Option<DraftSession> {
        self.lock()
            .get(&id)
            .filter(|s| s.user_id == user_id)
            .cloned()
    }

    /// Run a closure against a session, returning its result. Used both for
    /// draft reducers and for pending-commit bookkeeping.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        user_id: Uuid,
        f: impl FnOnce(&mut DraftSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id).filter(|s| s.user_id == user_id)?;
        Some(f(session))
    }

    /// Apply a draft reducer and return the updated draft.
    pub fn update_draft(
        &self,
        id: Uuid,
        user_id: Uuid,
        f: impl FnOnce(MealDraft) -> MealDraft,
    ) -> Option<MealDraft> {
        self.with_session(id, user_id, |session| {
            session.draft = f(std::mem::take(&mut session.draft));
            session.draft.clone()
        })
    }

    /// Close a session, returning its final state so the caller can abandon
    /// any half-written meal.
    pub fn close(&self, id: Uuid, user_id: Uuid) -> Option<DraftSession> {
        let mut sessions = self.lock();
        if sessions.get(&id).map(|s| s.user_id) != Some(user_id) {
            return None;
        }
        sessions.remove(&id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, DraftSession>> {
        self.inner.lock().expect("draft sessions lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::draft::DraftItem;

    fn oats(food_id: Uuid) -> DraftItem {
        DraftItem {
            food_id,
            name: "Oats".into(),
            amount_g: 50.0,
            kcal_per_100g: 370.0,
            carb_per_100g: 60.0,
            fat_per_100g: 7.0,
            protein_per_100g: 13.0,
        }
    }

    #[test]
    fn open_update_close_roundtrip() {
        let sessions = DraftSessions::new();
        let user = Uuid::new_v4();
        let id = sessions.open(user);

        let food = Uuid::new_v4();
        let draft = sessions
            .update_draft(id, user, |d| d.add_item(oats(food)).set_meal_name("Breakfast"))
            .expect("session exists");
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.meal_name, "Breakfast");

        let closed = sessions.close(id, user).expect("session closes");
        assert_eq!(closed.draft.items.len(), 1);
        assert!(sessions.get(id, user).is_none());
    }

    #[test]
    fn foreign_user_cannot_touch_a_session() {
        let sessions = DraftSessions::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let id = sessions.open(owner);

        assert!(sessions.get(id, intruder).is_none());
        assert!(sessions.update_draft(id, intruder, |d| d).is_none());
        assert!(sessions.close(id, intruder).is_none());
        // still there for the owner
        assert!(sessions.get(id, owner).is_some());
    }

    #[test]
    fn pending_commit_survives_until_cleared() {
        let sessions = DraftSessions::new();
        let user = Uuid::new_v4();
        let id = sessions.open(user);
        let meal_id = Uuid::new_v4();

        sessions
            .with_session(id, user, |s| {
                s.pending = Some(PendingCommit { meal_id, written: vec![] });
            })
            .expect("session exists");

        let snapshot = sessions.get(id, user).expect("session exists");
        assert_eq!(snapshot.pending.as_ref().map(|p| p.meal_id), Some(meal_id));

        sessions
            .with_session(id, user, |s| s.pending = None)
            .expect("session exists");
        assert!(sessions.get(id, user).expect("session exists").pending.is_none());
    }
}
