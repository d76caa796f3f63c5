//! Scope parameters for the fee list endpoint.

/// Query parameters for `GET /fees`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeQuery {
    pub school_id: Option<String>,
    pub student_class: Option<String>,
    pub month: Option<String>,
}

impl FeeQuery {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    pub fn with_class(mut self, student_class: impl Into<String>) -> Self {
        self.student_class = Some(student_class.into());
        self
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    /// Query-string pairs in the order the gateway documents them.
    /// The `sort` key is fixed: the server pre-sorts by class.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(school_id) = &self.school_id {
            params.push(("school_id", school_id.clone()));
        }
        if let Some(class) = &self.student_class {
            params.push(("class", class.clone()));
        }
        if let Some(month) = &self.month {
            params.push(("month", month.clone()));
        }
        params.push(("sort", "student_class".to_string()));
        params
    }
}
