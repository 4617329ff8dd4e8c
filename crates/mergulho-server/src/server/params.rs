//! Query-string parameters.
//!
//! Every parameter is taken as text and interpreted leniently: an HTML
//! filter form submits blank fields, and a blank or malformed number is
//! treated as if it had not been sent.

use serde::Deserialize;

use mergulho_core::page::DEFAULT_PAGE_SIZE;
use mergulho_core::sightings::SightingFilter;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn int(value: &Option<String>) -> Option<i64> {
    non_blank(value).and_then(|s| s.parse().ok())
}

fn flag(value: &Option<String>) -> bool {
    non_blank(value).is_some_and(|s| {
        ["true", "1", "yes", "on"]
            .iter()
            .any(|t| s.eq_ignore_ascii_case(t))
    })
}

/// `?format=` alone, for single-document routes.
#[derive(Debug, Default, Deserialize)]
pub struct FormatParams {
    pub format: Option<String>,
}

/// Parameters shared by both listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub format: Option<String>,
    pub count: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> i64 {
        int(&self.page).unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        int(&self.page_size).unwrap_or(DEFAULT_PAGE_SIZE as i64)
    }

    pub fn count(&self) -> bool {
        flag(&self.count)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SightingParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub dia_registro: Option<String>,
    pub mes_registro: Option<String>,
    pub ano_registro: Option<String>,
}

impl SightingParams {
    pub fn filter(&self) -> SightingFilter {
        SightingFilter {
            day: int(&self.dia_registro),
            month: int(&self.mes_registro),
            year: int(&self.ano_registro),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TelemetryParams {
    #[serde(flatten)]
    pub list: ListParams,
    pub oid: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

impl TelemetryParams {
    /// The device filter. Blank means no filter.
    pub fn oid(&self) -> Option<&str> {
        self.oid.as_deref().filter(|s| !s.trim().is_empty())
    }
}
