//! Directory search criteria and detail views.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use super::{Course, EnrollmentDetails};

/// Field a directory listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Course code.
    Code,
    /// Course name.
    Name,
    /// Credit count.
    Credits,
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Directory ordering. Defaults to course code ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSort {
    /// Field to order by.
    pub key: SortKey,
    /// Direction to order in.
    pub direction: SortDirection,
}

impl Default for CourseSort {
    fn default() -> Self {
        Self {
            key: SortKey::Code,
            direction: SortDirection::Ascending,
        }
    }
}

/// Error returned for an unrecognised sort token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSort(pub String);

impl FromStr for CourseSort {
    type Err = UnknownSort;

    /// Parse one of `code`, `code_desc`, `name`, `name_desc`, `credits`,
    /// `credits_desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s {
            "code" => (SortKey::Code, SortDirection::Ascending),
            "code_desc" => (SortKey::Code, SortDirection::Descending),
            "name" => (SortKey::Name, SortDirection::Ascending),
            "name_desc" => (SortKey::Name, SortDirection::Descending),
            "credits" => (SortKey::Credits, SortDirection::Ascending),
            "credits_desc" => (SortKey::Credits, SortDirection::Descending),
            other => return Err(UnknownSort(other.to_owned())),
        };
        Ok(Self { key, direction })
    }
}

impl CourseSort {
    /// Compare two courses under this ordering, tie-breaking on code.
    #[must_use]
    pub fn compare(&self, a: &Course, b: &Course) -> Ordering {
        let primary = match self.key {
            SortKey::Code => a.code.cmp(&b.code),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Credits => a.credits.cmp(&b.credits),
        };
        let ordered = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        ordered.then_with(|| a.code.cmp(&b.code))
    }
}

/// Directory search request over active courses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSearch {
    term: Option<String>,
    /// Requested ordering.
    pub sort: CourseSort,
}

impl CourseSearch {
    /// Build a search; a blank term matches everything.
    #[must_use]
    pub fn new(term: Option<&str>, sort: CourseSort) -> Self {
        let term = term
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Self { term, sort }
    }

    /// Trimmed, non-empty search term.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Case-insensitive substring match on code, name, or instructor.
    /// Inactive courses never match.
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        if !course.active {
            return false;
        }
        let Some(term) = self.term.as_deref() else {
            return true;
        };
        let needle = term.to_lowercase();
        [course.code.as_str(), course.name.as_str(), course.instructor.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Who is asking for course details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsScope {
    /// Catalogue visitors: active courses only, no roster.
    Public,
    /// Administrators: any course, with roster.
    Administrative,
}

/// A course with, for administrators, its ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    /// The course record.
    pub course: Course,
    /// Seats left.
    pub seats_remaining: u32,
    /// Ledger entries with student names; omitted for the public scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<EnrollmentDetails>>,
}
