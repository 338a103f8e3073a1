//! Continuous scales mapping data values onto plot coordinates.
//!
//! A degenerate domain (both ends equal) maps every input to the middle of the range.

use chrono::{DateTime, Days, FixedOffset, TimeZone};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    fn normalize(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            0.5
        } else {
            (value - self.domain.0) / span
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.range.0 + self.normalize(value) * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        let t = if span == 0.0 { 0.5 } else { (px - self.range.0) / span };
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}

/// Square-root scale used for dot radii so area tracks the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((domain.0.max(0.0).sqrt(), domain.1.max(0.0).sqrt()), range),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.inner.apply(value.max(0.0).sqrt())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, range: (f64, f64)) -> Self {
        Self {
            start,
            end,
            linear: LinearScale::new(
                (start.timestamp_millis() as f64, end.timestamp_millis() as f64),
                range,
            ),
        }
    }

    /// Extend the domain outward to whole days in the offset of the domain start.
    /// The result always spans at least one day.
    pub fn nice(self) -> Self {
        let offset = *self.start.offset();
        let floor = midnight(&self.start.with_timezone(&offset));
        let end_local = self.end.with_timezone(&offset);
        let end_midnight = midnight(&end_local);
        let ceil = if end_midnight == end_local && end_midnight > floor {
            end_midnight
        } else {
            end_midnight
                .checked_add_days(Days::new(1))
                .unwrap_or(end_local)
        };
        Self::new(floor, ceil, self.linear.range)
    }

    pub fn domain(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (self.start, self.end)
    }

    pub fn range(&self) -> (f64, f64) {
        self.linear.range
    }

    pub fn apply(&self, value: &DateTime<FixedOffset>) -> f64 {
        self.linear.apply(value.timestamp_millis() as f64)
    }

    pub fn invert(&self, px: f64) -> DateTime<FixedOffset> {
        let millis = self.linear.invert(px).round() as i64;
        self.start
            .offset()
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or(self.start)
    }
}

fn midnight(dt: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| dt.offset().from_local_datetime(&naive).single())
        .unwrap_or(*dt)
}
