pub mod config;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use config::*;

/// One extracurricular activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub description: String,
    /// Human readable, e.g. "Fridays, 3:30 PM - 5:00 PM".
    pub schedule: String,
    /// Advisory only, signups are never refused because an activity is full.
    pub max_participants: u32,
    /// Emails of the enrolled students, in signup order.
    pub participants: Vec<String>,
}

impl ActivityRecord {
    pub fn is_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    /// Number of free places, zero once the activity is full or overbooked.
    pub fn spots_left(&self) -> usize {
        (self.max_participants as usize).saturating_sub(self.participants.len())
    }
}

/// All the activities by name, in insertion order.
///
/// Names are case-sensitive.
pub type Activities = IndexMap<String, ActivityRecord>;

/// Body of a successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Detail {
    pub detail: String,
}

fn record(description: &str, schedule: &str, max: u32, participants: [&str; 2]) -> ActivityRecord {
    ActivityRecord {
        description: description.to_owned(),
        schedule: schedule.to_owned(),
        max_participants: max,
        participants: participants.iter().map(|p| (*p).to_owned()).collect(),
    }
}

/// The activities the registry starts with when the configuration has none.
pub fn seed_activities() -> Activities {
    [
        (
            "Chess Club",
            record(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                ["michael@mergington.edu", "daniel@mergington.edu"],
            ),
        ),
        (
            "Programming Class",
            record(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                ["emma@mergington.edu", "sophia@mergington.edu"],
            ),
        ),
        (
            "Gym Class",
            record(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                ["john@mergington.edu", "olivia@mergington.edu"],
            ),
        ),
        (
            "Soccer Team",
            record(
                "Join the school soccer team and compete in matches",
                "Wednesdays, 4:00 PM - 5:30 PM",
                22,
                ["lucas@mergington.edu", "mia@mergington.edu"],
            ),
        ),
        (
            "Basketball Club",
            record(
                "Practice basketball skills and play friendly games",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
                ["liam@mergington.edu", "ava@mergington.edu"],
            ),
        ),
        (
            "Art Workshop",
            record(
                "Explore painting, drawing, and sculpture techniques",
                "Mondays, 4:00 PM - 5:30 PM",
                18,
                ["ella@mergington.edu", "jack@mergington.edu"],
            ),
        ),
        (
            "Drama Club",
            record(
                "Act, direct, and produce school plays and performances",
                "Tuesdays, 3:30 PM - 5:00 PM",
                20,
                ["noah@mergington.edu", "grace@mergington.edu"],
            ),
        ),
        (
            "Math Olympiad",
            record(
                "Prepare for math competitions and solve challenging problems",
                "Fridays, 4:00 PM - 5:30 PM",
                15,
                ["ben@mergington.edu", "chloe@mergington.edu"],
            ),
        ),
        (
            "Science Club",
            record(
                "Conduct experiments and explore scientific concepts",
                "Wednesdays, 3:30 PM - 5:00 PM",
                16,
                ["ethan@mergington.edu", "zoe@mergington.edu"],
            ),
        ),
    ]
    .into_iter()
    .map(|(name, record)| (name.to_owned(), record))
    .collect()
}
