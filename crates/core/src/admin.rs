//! Declarative admin console registration and change-list rules.
//!
//! A [`ModelAdmin`] says which columns the console lists, filters, searches
//! and drills down by. The helpers below turn raw query-string values into
//! checked orderings, date ranges and page windows; the repository layer
//! only ever sees column names taken from the registration itself.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::CoreError;

/// Admin registration for one model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelAdmin {
    /// Table / model name.
    pub model: &'static str,
    /// URL segment under `/admin`.
    pub path: &'static str,
    pub verbose_name_plural: &'static str,
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub date_hierarchy: Option<&'static str>,
    pub list_per_page: i64,
    /// Default ordering, `-` prefix for descending.
    pub ordering: &'static str,
}

pub const EXPENSE_ADMIN: ModelAdmin = ModelAdmin {
    model: "expense",
    path: "expenses",
    verbose_name_plural: "Expenses",
    list_display: &[
        "expense_id",
        "expense_name",
        "expense_amount",
        "expense_category",
        "expense_date",
    ],
    list_filter: &["expense_category", "expense_date"],
    search_fields: &["expense_name", "expense_category"],
    date_hierarchy: Some("expense_date"),
    list_per_page: 100,
    ordering: "-expense_id",
};

/// Every model registered with the console.
pub const REGISTRY: &[ModelAdmin] = &[EXPENSE_ADMIN];

/// A checked change-list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    /// Always one of the registration's `list_display` columns.
    pub field: &'static str,
    pub descending: bool,
}

impl ModelAdmin {
    /// Resolve the `o` query parameter, falling back to the default ordering.
    pub fn ordering(&self, requested: Option<&str>) -> Result<Ordering, CoreError> {
        let raw = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.ordering);
        let (name, descending) = match raw.strip_prefix('-') {
            Some(name) => (name, true),
            None => (raw, false),
        };
        let field = self
            .list_display
            .iter()
            .copied()
            .find(|f| *f == name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Cannot order by '{raw}'. Choices are: {}",
                    self.list_display.join(", ")
                ))
            })?;
        Ok(Ordering { field, descending })
    }
}

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Relative choices offered by the date list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeFilter {
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl DateRangeFilter {
    pub const ALL: [DateRangeFilter; 4] = [
        DateRangeFilter::Today,
        DateRangeFilter::Past7Days,
        DateRangeFilter::ThisMonth,
        DateRangeFilter::ThisYear,
    ];

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == raw)
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown date filter '{raw}'"))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Past7Days => "past_7_days",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Past7Days => "Past 7 days",
            Self::ThisMonth => "This month",
            Self::ThisYear => "This year",
        }
    }

    /// Date range this choice covers relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> Result<DateBounds, CoreError> {
        let tomorrow = today.succ_opt().ok_or_else(out_of_range)?;
        let bounds = match self {
            Self::Today => DateBounds {
                start: today,
                end: tomorrow,
            },
            Self::Past7Days => DateBounds {
                start: today.checked_sub_days(Days::new(7)).ok_or_else(out_of_range)?,
                end: tomorrow,
            },
            Self::ThisMonth => {
                let start = today.with_day(1).ok_or_else(out_of_range)?;
                DateBounds {
                    start,
                    end: next_month_start(start)?,
                }
            }
            Self::ThisYear => DateBounds {
                start: ymd(today.year(), 1, 1)?,
                end: ymd(today.year() + 1, 1, 1)?,
            },
        };
        Ok(bounds)
    }
}

/// What the date hierarchy lists at the current drilldown depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrilldownLevel {
    Years,
    Months { year: i32 },
    Days { year: i32, month: u32 },
    /// A single day is selected; there is nothing further to drill into.
    Day,
}

/// Date-hierarchy selection from `year` / `month` / `day` query params.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateDrilldown {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateDrilldown {
    /// A month needs a year and a day needs a month; the selection must be a
    /// real calendar date.
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Result<Self, CoreError> {
        match (year, month, day) {
            (None, Some(_), _) | (_, None, Some(_)) => {
                return Err(CoreError::Validation(
                    "Date drilldown requires year before month and month before day".into(),
                ))
            }
            (Some(y), m, d) => {
                ymd(y, m.unwrap_or(1), d.unwrap_or(1))?;
            }
            (None, None, None) => {}
        }
        Ok(Self { year, month, day })
    }

    pub fn level(&self) -> DrilldownLevel {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), None) => DrilldownLevel::Days { year, month },
            (Some(year), None, _) => DrilldownLevel::Months { year },
            (Some(_), Some(_), Some(_)) => DrilldownLevel::Day,
            (None, _, _) => DrilldownLevel::Years,
        }
    }

    /// Date range selected by the drilldown, or `None` when nothing is selected.
    pub fn bounds(&self) -> Result<Option<DateBounds>, CoreError> {
        let Some(year) = self.year else {
            return Ok(None);
        };
        let bounds = match (self.month, self.day) {
            (None, _) => DateBounds {
                start: ymd(year, 1, 1)?,
                end: ymd(year + 1, 1, 1)?,
            },
            (Some(month), None) => {
                let start = ymd(year, month, 1)?;
                DateBounds {
                    start,
                    end: next_month_start(start)?,
                }
            }
            (Some(month), Some(day)) => {
                let start = ymd(year, month, day)?;
                DateBounds {
                    start,
                    end: start.succ_opt().ok_or_else(out_of_range)?,
                }
            }
        };
        Ok(Some(bounds))
    }
}

/// Offset/limit window for one change-list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Zero-based page index.
    pub page: i64,
    pub num_pages: i64,
    #[serde(skip)]
    pub limit: i64,
    #[serde(skip)]
    pub offset: i64,
}

/// Compute the window for zero-based `page` over `count` rows.
pub fn page_window(count: i64, page: Option<i64>, per_page: i64) -> Result<PageWindow, CoreError> {
    let per_page = per_page.max(1);
    let num_pages = ((count.max(0) + per_page - 1) / per_page).max(1);
    let page = page.unwrap_or(0);
    if page < 0 || page >= num_pages {
        return Err(CoreError::Validation(format!(
            "Invalid page {page}. There are {num_pages} page(s)."
        )));
    }
    Ok(PageWindow {
        page,
        num_pages,
        limit: per_page,
        offset: page * per_page,
    })
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        CoreError::Validation(format!("Invalid date {year:04}-{month:02}-{day:02}"))
    })
}

fn next_month_start(first: NaiveDate) -> Result<NaiveDate, CoreError> {
    if first.month() == 12 {
        ymd(first.year() + 1, 1, 1)
    } else {
        ymd(first.year(), first.month() + 1, 1)
    }
}

fn out_of_range() -> CoreError {
    CoreError::Validation("Date out of range".into())
}
