use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct TimeflowUrl(String);

impl AsRef<str> for TimeflowUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TimeflowUrl {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_week_start(&self, week_start: &NaiveDate) -> Self {
        let sep = if self.0.contains('?') { '&' } else { '?' };
        Self(format!(
            "{}{}week_start={}",
            self.0,
            sep,
            week_start.format("%Y-%m-%d")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_normalizes_slashes() {
        let url = TimeflowUrl::new("http://localhost:8000/");
        assert_eq!(
            url.append_path("/api/timesheet/check").as_ref(),
            "http://localhost:8000/api/timesheet/check"
        );
    }

    #[test]
    fn week_start_query_uses_iso_date() {
        let url = TimeflowUrl::new("http://localhost:8000").append_path("api/timesheet/check");
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(
            url.with_week_start(&date).as_ref(),
            "http://localhost:8000/api/timesheet/check?week_start=2026-08-24"
        );
    }
}
