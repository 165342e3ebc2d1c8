//! The activity registry.
//!
//! All the activities live in memory for the lifetime of the process. Every
//! operation runs inside [`watch::Sender::send_if_modified`], so the check and
//! the mutation happen under the same lock and a failed operation leaves the
//! registry untouched.

use std::path::PathBuf;

use mergington_shared::{Activities, ActivityRecord, Config};
use thiserror::Error;
use tokio::sync::watch;

/// Why a signup or an unregistration was refused.
///
/// The messages are sent to clients as-is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student is already signed up for this activity")]
    AlreadySignedUp,
    #[error("Student is not registered for this activity")]
    NotRegistered,
}

/// See [the module-level documentation][self].
pub struct State {
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    activities: watch::Sender<Activities>,
}

impl State {
    pub fn new(static_dir: PathBuf, activities: Activities) -> Self {
        Self {
            static_dir,
            activities: watch::Sender::new(activities),
        }
    }

    pub fn from_config(config: Config) -> Self {
        let state = Self::new(config.http.static_dir, Activities::new());
        for (name, record) in config.activities {
            state.insert_activity(name, record);
        }
        state
    }

    /// Snapshot of the whole registry.
    pub fn list(&self) -> Activities {
        self.activities.borrow().clone()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<ActivityRecord> {
        self.activities.borrow().get(name).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Activities> {
        self.activities.subscribe()
    }

    /// Adds `email` at the end of the participants of `activity`.
    ///
    /// Capacity is not checked. Returns the number of free places left.
    pub fn signup(&self, activity: &str, email: &str) -> Result<usize, RegistryError> {
        self.modify_activity(activity, |record| {
            if record.is_participant(email) {
                return Err(RegistryError::AlreadySignedUp);
            }
            record.participants.push(email.to_owned());
            Ok(record.spots_left())
        })
    }

    /// Removes `email` from the participants of `activity`, keeping the order of the others.
    pub fn unregister(&self, activity: &str, email: &str) -> Result<(), RegistryError> {
        self.modify_activity(activity, |record| {
            let Some(pos) = record.participants.iter().position(|p| p == email) else {
                return Err(RegistryError::NotRegistered);
            };
            record.participants.remove(pos);
            Ok(())
        })
    }

    /// Adds or replaces an activity, returning the previous record.
    pub fn insert_activity(&self, name: String, record: ActivityRecord) -> Option<ActivityRecord> {
        let mut old = None;
        self.activities.send_modify(|activities| {
            old = activities.insert(name, record);
        });
        old
    }

    /// Not routed, activities only go away with the process.
    #[cfg(test)]
    pub fn remove_activity(&self, name: &str) -> Option<ActivityRecord> {
        let mut old = None;
        self.activities.send_if_modified(|activities| {
            old = activities.shift_remove(name);
            old.is_some()
        });
        old
    }

    fn modify_activity<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut ActivityRecord) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut res = Err(RegistryError::ActivityNotFound);
        self.activities.send_if_modified(|activities| {
            if let Some(record) = activities.get_mut(name) {
                res = f(record);
            }
            res.is_ok()
        });
        res
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mergington_shared::seed_activities;

    use super::*;

    fn state() -> State {
        State::new(PathBuf::from("static"), seed_activities())
    }

    fn participants(state: &State, name: &str) -> Vec<String> {
        state.get(name).unwrap().participants
    }

    #[test]
    fn signup_appends_in_order() {
        let state = state();
        state.signup("Chess Club", "new@mergington.edu").unwrap();
        assert_eq!(
            participants(&state, "Chess Club"),
            [
                "michael@mergington.edu",
                "daniel@mergington.edu",
                "new@mergington.edu"
            ]
        );
    }

    #[test]
    fn duplicate_signup_is_refused() {
        let state = state();
        assert_eq!(state.signup("Chess Club", "new@x.edu"), Ok(9));
        assert_eq!(
            state.signup("Chess Club", "new@x.edu"),
            Err(RegistryError::AlreadySignedUp)
        );
        assert_eq!(participants(&state, "Chess Club").len(), 3);
        state.unregister("Chess Club", "new@x.edu").unwrap();
        assert_eq!(participants(&state, "Chess Club").len(), 2);
    }

    #[test]
    fn unknown_activity_is_a_noop() {
        let state = state();
        let before = state.list();
        assert_eq!(
            state.signup("Nope", "a@x.edu"),
            Err(RegistryError::ActivityNotFound)
        );
        assert_eq!(
            state.unregister("Nope", "a@x.edu"),
            Err(RegistryError::ActivityNotFound)
        );
        assert_eq!(
            state.signup("chess club", "a@x.edu"),
            Err(RegistryError::ActivityNotFound)
        );
        assert_eq!(state.list(), before);
    }

    #[test]
    fn unregister_keeps_the_order_of_the_others() {
        let state = state();
        state.signup("Chess Club", "new@mergington.edu").unwrap();
        state
            .unregister("Chess Club", "michael@mergington.edu")
            .unwrap();
        assert_eq!(
            participants(&state, "Chess Club"),
            ["daniel@mergington.edu", "new@mergington.edu"]
        );
    }

    #[test]
    fn unregister_unknown_email_is_refused() {
        let state = state();
        assert_eq!(
            state.unregister("Chess Club", "nobody@mergington.edu"),
            Err(RegistryError::NotRegistered)
        );
        assert_eq!(participants(&state, "Chess Club").len(), 2);
    }

    #[test]
    fn unregister_then_signup_round_trips() {
        let state = state();
        let before = participants(&state, "Drama Club");
        state.unregister("Drama Club", "grace@mergington.edu").unwrap();
        state.signup("Drama Club", "grace@mergington.edu").unwrap();
        assert_eq!(participants(&state, "Drama Club"), before);

        state.signup("Drama Club", "flow@mergington.edu").unwrap();
        state.unregister("Drama Club", "flow@mergington.edu").unwrap();
        assert_eq!(participants(&state, "Drama Club"), before);
    }

    #[test]
    fn capacity_is_not_enforced() {
        let state = state();
        let max = state.get("Math Olympiad").unwrap().max_participants as usize;
        for i in 0..max - 2 {
            state
                .signup("Math Olympiad", &format!("student{i}@mergington.edu"))
                .unwrap();
        }
        assert_eq!(
            state.signup("Math Olympiad", "overflow@mergington.edu"),
            Ok(0)
        );
        assert_eq!(participants(&state, "Math Olympiad").len(), max + 1);
    }

    #[test]
    fn counts_follow_signups_and_unregistrations() {
        let state = state();
        let initial = participants(&state, "Science Club").len();
        for i in 0..5 {
            state
                .signup("Science Club", &format!("s{i}@mergington.edu"))
                .unwrap();
        }
        for i in 0..3 {
            state
                .unregister("Science Club", &format!("s{i}@mergington.edu"))
                .unwrap();
        }
        assert_eq!(participants(&state, "Science Club").len(), initial + 5 - 3);
    }

    #[test]
    fn failed_operations_do_not_notify() {
        let state = state();
        let rx = state.subscribe();
        assert_eq!(
            state.signup("Chess Club", "michael@mergington.edu"),
            Err(RegistryError::AlreadySignedUp)
        );
        assert_eq!(
            state.unregister("Chess Club", "ghost@mergington.edu"),
            Err(RegistryError::NotRegistered)
        );
        assert!(!rx.has_changed().unwrap());
        state.signup("Chess Club", "ghost@mergington.edu").unwrap();
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn insert_and_remove_activity() {
        let state = state();
        let record = ActivityRecord {
            description: "Test activity with no participants".to_owned(),
            schedule: "Never".to_owned(),
            max_participants: 10,
            participants: Vec::new(),
        };
        assert!(state
            .insert_activity("Empty Test Activity".to_owned(), record.clone())
            .is_none());
        state.signup("Empty Test Activity", "first@mergington.edu").unwrap();
        state
            .unregister("Empty Test Activity", "first@mergington.edu")
            .unwrap();
        assert_eq!(state.remove_activity("Empty Test Activity"), Some(record));
        assert_eq!(state.remove_activity("Empty Test Activity"), None);
        assert_eq!(state.list(), seed_activities());
    }

    #[test]
    fn concurrent_identical_signups_succeed_once() {
        let state = Arc::new(state());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || state.signup("Soccer Team", "race@mergington.edu"))
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(participants(&state, "Soccer Team").len(), 3);
    }
}
