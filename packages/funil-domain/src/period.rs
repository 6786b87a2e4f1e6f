use time::{Date, Month, OffsetDateTime, Time};

/// UTC boundaries of a calendar month as a half-open interval
/// `[start, end)`, so the last instant of the month is included by
/// filtering with `< end`.
pub fn month_bounds(year: i32, month: u8) -> Option<(OffsetDateTime, OffsetDateTime)> {
	let month = Month::try_from(month).ok()?;
	let start = Date::from_calendar_date(year, month, 1).ok()?.with_time(Time::MIDNIGHT).assume_utc();
	let (next_year, next_month) = match month {
		Month::December => (year.checked_add(1)?, Month::January),
		_ => (year, month.next()),
	};
	let end = Date::from_calendar_date(next_year, next_month, 1)
		.ok()?
		.with_time(Time::MIDNIGHT)
		.assume_utc();

	Some((start, end))
}
