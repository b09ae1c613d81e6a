//! Test fixtures: a deterministic calendar and request helpers.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dayoff_calendar::{CalendarError, CalendarResult, HolidayCalendar, is_weekend};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::Date;
use time::macros::date;
use tower::ServiceExt;

/// Last year the test calendar has data for.
pub const LAST_CALENDAR_YEAR: i32 = 2030;

/// Calendar with weekends plus a fixed set of holidays and make-up workdays.
///
/// Years after [`LAST_CALENDAR_YEAR`] are unsupported. Counts its calls so
/// tests can check it was not consulted.
pub struct FixedCalendar {
    holidays: BTreeSet<Date>,
    workdays: BTreeSet<Date>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FixedCalendar {
    pub fn new() -> Self {
        Self {
            // National Day week 2024, and a Monday holiday
            holidays: [
                date!(2024 - 10 - 01),
                date!(2024 - 10 - 02),
                date!(2024 - 10 - 03),
                date!(2024 - 06 - 10),
            ]
            .into_iter()
            .collect(),
            // Make-up workday on a Sunday
            workdays: [date!(2024 - 09 - 29)].into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HolidayCalendar for FixedCalendar {
    fn name(&self) -> &str {
        "fixed"
    }

    fn is_holiday(&self, date: Date) -> CalendarResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if date.year() > LAST_CALENDAR_YEAR {
            return Err(CalendarError::UnsupportedYear(date.year()));
        }
        if self.holidays.contains(&date) {
            return Ok(true);
        }
        if self.workdays.contains(&date) {
            return Ok(false);
        }
        Ok(is_weekend(date))
    }
}

/// Send a request and return status and body text.
#[allow(dead_code)]
pub async fn text_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    accept: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(accept) = accept {
        builder = builder.header("Accept", accept);
    }

    let request = builder.body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Send a request asking for JSON and parse the body.
#[allow(dead_code)]
pub async fn json_request(router: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let (status, body) = text_request(router, method, uri, Some("application/json")).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::Null)
    };
    (status, json)
}
