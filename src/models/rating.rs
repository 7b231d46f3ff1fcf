//! Self-assessed recall rating, 1 (struggled) to 5 (perfect).
use super::scheduler::SchedulerError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, SchedulerError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SchedulerError::InvalidRating(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Ratings 1-3 may displace comfortable (4-5) reviews from a full day.
    pub fn is_high_priority(self) -> bool {
        self.0 <= 3
    }

    /// Rating a bumped victim carries forward: a 4 drops to 3, everything else keeps its value.
    pub fn demoted(self) -> Self {
        if self.0 == 4 { Self(3) } else { self }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
