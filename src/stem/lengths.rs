use crate::profiles::Profile;
use serde::Serialize;

/// Reachable stem length per profile.
///
/// Entries start unset and are written at most once; later writes for an
/// already known profile are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LengthTable {
    entries: [Option<i32>; Profile::COUNT],
}

impl LengthTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, profile: Profile) -> Option<i32> {
        self.entries.get(profile.index()).copied().flatten()
    }

    /// Records `length` unless the profile already has a value.
    pub fn set_if_unset(&mut self, profile: Profile, length: i32) -> bool {
        match self.entries.get_mut(profile.index()) {
            Some(slot @ None) => {
                *slot = Some(length);
                true
            }
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Profile, Option<i32>)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, &len)| (Profile(i as u8), len))
    }
}
