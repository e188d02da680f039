//! Input sanitization applied to form fields before they reach the store.

use time::{format_description::well_known::Iso8601, Date, OffsetDateTime, PrimitiveDateTime};

/// Trim surrounding whitespace and neutralize HTML markup.
pub fn trim_escape(value: &str) -> String {
    handlebars::html_escape(value.trim())
}

/// Parse an ISO-8601 calendar, week or ordinal date, or a date-time, keeping the date part.
pub fn parse_iso8601_date(value: &str) -> Option<Date> {
    let value = value.trim();

    Date::parse(value, &Iso8601::PARSING)
        .or_else(|_| OffsetDateTime::parse(value, &Iso8601::PARSING).map(OffsetDateTime::date))
        .or_else(|_| PrimitiveDateTime::parse(value, &Iso8601::PARSING).map(PrimitiveDateTime::date))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn trims_and_escapes_markup() {
        assert_eq!(trim_escape("  Penguin <b>Classics</b>  "), "Penguin &lt;b&gt;Classics&lt;/b&gt;");
        assert_eq!(trim_escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(trim_escape("   "), "");
    }

    #[test]
    fn parses_plain_dates() {
        let date = parse_iso8601_date("2026-11-01").unwrap();
        assert_eq!(date, Date::from_calendar_date(2026, Month::November, 1).unwrap());
    }

    #[test]
    fn parses_date_times() {
        let expected = Date::from_calendar_date(2026, Month::March, 9).unwrap();
        assert_eq!(parse_iso8601_date("2026-03-09T10:30:00Z"), Some(expected));
        assert_eq!(parse_iso8601_date("2026-03-09T10:30:00+02:00"), Some(expected));
        assert_eq!(parse_iso8601_date("2026-03-09T10:30"), Some(expected));
        assert_eq!(parse_iso8601_date("2026-03-09T10:30:00.5"), Some(expected));
        assert_eq!(parse_iso8601_date("2026-03-09T10:30:00.123"), Some(expected));
        assert_eq!(
            parse_iso8601_date("2026-11-01T10:30Z"),
            Some(Date::from_calendar_date(2026, Month::November, 1).unwrap())
        );
    }

    #[test]
    fn parses_basic_week_and_ordinal_forms() {
        let expected = Date::from_calendar_date(2026, Month::November, 1).unwrap();
        assert_eq!(parse_iso8601_date("20261101"), Some(expected));
        assert_eq!(parse_iso8601_date("2026-W44-7"), Some(expected));
        assert_eq!(parse_iso8601_date("2026-305"), Some(expected));
    }

    #[test]
    fn rejects_non_iso_dates() {
        assert_eq!(parse_iso8601_date("next tuesday"), None);
        assert_eq!(parse_iso8601_date("01/11/2026"), None);
        assert_eq!(parse_iso8601_date("2026-02-30"), None);
        assert_eq!(parse_iso8601_date(""), None);
    }
}
