//! Sort keys and ordering for rocket listings.

use std::cmp::Ordering;

use rocket_types::RocketState;

use crate::error::RocketError;

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Type,
    Speed,
    Mission,
    LastUpdateTime,
}

impl SortField {
    /// Returns the canonical query-parameter spelling of this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Type => "type",
            Self::Speed => "speed",
            Self::Mission => "mission",
            Self::LastUpdateTime => "lastUpdateTime",
        }
    }

    /// Compares two states by this field, ascending.
    pub fn compare(self, a: &RocketState, b: &RocketState) -> Ordering {
        match self {
            // Byte order of a UUID matches the order of its hyphenated
            // lowercase string form.
            Self::Id => a.id.cmp(&b.id),
            Self::Type => a.rocket_type.cmp(&b.rocket_type),
            Self::Speed => a.speed.cmp(&b.speed),
            Self::Mission => a.mission.cmp(&b.mission),
            Self::LastUpdateTime => a.last_update_time.cmp(&b.last_update_time),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortField {
    type Err = RocketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "type" => Ok(Self::Type),
            "speed" => Ok(Self::Speed),
            "mission" => Ok(Self::Mission),
            "lastupdatetime" => Ok(Self::LastUpdateTime),
            _ => Err(RocketError::UnknownSortField(s.to_string())),
        }
    }
}

/// Direction of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Lenient parse used by the string-keyed listing: anything that is not
    /// `desc` (any case) is ascending.
    pub fn from_lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = RocketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(RocketError::UnknownSortOrder(s.to_string()))
        }
    }
}

/// Orders `states` in place by `field` in the given direction.
///
/// Ties keep no particular order; there is no secondary key.
pub fn sort_states(states: &mut [RocketState], field: SortField, order: SortOrder) {
    states.sort_by(|a, b| {
        let ordering = field.compare(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
