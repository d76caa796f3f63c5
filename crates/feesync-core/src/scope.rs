//! The active filter scope and partial updates to it.

use feesync_http::FeeQuery;
use serde::Serialize;

/// The (school, class, month, search) tuple driving what is loaded
/// and displayed. Transient UI state; owned by the session and
/// mutated only through [`crate::FeeSession::set_filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterScope {
    pub school_id: Option<String>,
    pub student_class: Option<String>,
    pub month: Option<String>,
    pub search_term: String,
}

impl FilterScope {
    /// A reload only makes sense once a school or a class is chosen.
    /// Both unset means "not yet filtered", which is distinct from
    /// "filtered to an empty result".
    #[inline]
    #[must_use]
    pub fn wants_reload(&self) -> bool {
        self.school_id.is_some() || self.student_class.is_some()
    }

    pub fn to_query(&self) -> FeeQuery {
        FeeQuery {
            school_id: self.school_id.clone(),
            student_class: self.student_class.clone(),
            month: self.month.clone(),
        }
    }

    /// Merge a partial update. Returns true if a reload-relevant
    /// field (school, class or month) actually changed value.
    pub fn apply(&mut self, patch: ScopePatch) -> bool {
        let mut relevant = false;
        if let Some(school_id) = patch.school_id {
            relevant |= set_field(&mut self.school_id, school_id);
        }
        if let Some(class) = patch.student_class {
            relevant |= set_field(&mut self.student_class, class);
        }
        if let Some(month) = patch.month {
            relevant |= set_field(&mut self.month, month);
        }
        if let Some(term) = patch.search_term {
            self.search_term = term;
        }
        relevant
    }
}

/// Normalize: selecting the empty option in a dropdown clears the
/// filter, so `""` and "unset" are the same state.
fn set_field(slot: &mut Option<String>, value: String) -> bool {
    let next = if value.is_empty() { None } else { Some(value) };
    if *slot == next {
        false
    } else {
        *slot = next;
        true
    }
}

/// A partial [`FilterScope`] update; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopePatch {
    pub school_id: Option<String>,
    pub student_class: Option<String>,
    pub month: Option<String>,
    pub search_term: Option<String>,
}

impl ScopePatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    pub fn class(mut self, student_class: impl Into<String>) -> Self {
        self.student_class = Some(student_class.into());
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }
}
