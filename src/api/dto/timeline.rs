use crate::error::{AppError, Result};
use crate::timeline::{TimeRange, TypeFilter};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub range: Option<String>,
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
    pub now: Option<String>,
}

impl TimelineQuery {
    pub fn range(&self) -> Result<TimeRange> {
        match self.range.as_deref() {
            None => Ok(TimeRange::default()),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }

    pub fn type_filter(&self) -> Result<TypeFilter> {
        match self.type_filter.as_deref() {
            None => Ok(TypeFilter::All),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }

    pub fn now(&self) -> Result<Option<DateTime<Utc>>> {
        parse_instant(self.now.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub now: Option<String>,
}

impl StatsQuery {
    pub fn now(&self) -> Result<Option<DateTime<Utc>>> {
        parse_instant(self.now.as_deref())
    }
}

fn parse_instant(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|e| AppError::Validation(format!("Invalid 'now' timestamp '{}': {}", raw, e)))
    })
    .transpose()
}
