use chrono::{Datelike as _, Days, NaiveDate, Weekday};
use pure_rust_locales::Locale;

use crate::locale::weekday_short;

/// How a day is shown in the calendar grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayKind {
    /// Padding day from the previous or next month.
    OtherMonth,

    /// A day in the viewed month.
    SameMonth,

    /// Today, when it falls in the viewed month.
    SameMonthToday,

    /// The selected date.
    Current,
}

/// One cell of the calendar grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub kind: DayKind,
}

/// The weekday a week starts on, given as a day index where 0 is Sunday.
///
/// Indices past 6 wrap around.
pub fn week_start_day(index: u32) -> Weekday {
    const FROM_SUNDAY: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];
    FROM_SUNDAY[(index % 7) as usize]
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or_else(|| {
            // The last representable month.
            (28..=31)
                .rev()
                .find_map(|day| first.with_day(day))
                .unwrap_or(first)
        })
}

/// Days from `week_start` to the weekday of `date`, in `0..7`.
fn days_into_week(date: NaiveDate, week_start: Weekday) -> u32 {
    (7 + date.weekday().num_days_from_sunday() - week_start.num_days_from_sunday()) % 7
}

fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = days_into_week(date, week_start);
    date.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(date)
}

fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let forward = 6 - days_into_week(date, week_start);
    date.checked_add_days(Days::new(u64::from(forward)))
        .unwrap_or(date)
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// The days to show for `view_month`, padded to whole weeks.
///
/// `week_start` is a day index where 0 is Sunday, taken modulo 7.
/// The result always holds between 28 and 42 cells, in ascending order.
pub fn build_grid(
    view_month: NaiveDate,
    week_start: u32,
    selected: NaiveDate,
    today: NaiveDate,
) -> Vec<DayCell> {
    let week_start = week_start_day(week_start);
    let first = start_of_week(first_of_month(view_month), week_start);
    let last = end_of_week(last_of_month(view_month), week_start);

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let kind = if date == selected {
                DayKind::Current
            } else if same_month(date, view_month) {
                if date == today {
                    DayKind::SameMonthToday
                } else {
                    DayKind::SameMonth
                }
            } else {
                DayKind::OtherMonth
            };
            DayCell { date, kind }
        })
        .collect()
}

/// Abbreviated weekday names, starting at `week_start` (0 is Sunday).
pub fn weekday_header(week_start: u32, locale: Locale) -> [&'static str; 7] {
    let first = week_start_day(week_start);
    let mut names = [""; 7];
    let mut weekday = first;
    for name in &mut names {
        *name = weekday_short(locale, weekday);
        weekday = weekday.succ();
    }
    names
}

/// Split a grid into rows of seven days.
pub fn weeks(cells: &[DayCell]) -> impl Iterator<Item = &[DayCell]> {
    cells.chunks(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn grid_covers_whole_weeks() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let view = date(year, month, 1);
                for week_start in 0..7 {
                    let cells = build_grid(view, week_start, date(1900, 1, 1), date(1900, 1, 1));

                    assert_eq!(cells.len() % 7, 0, "{view} / {week_start}");
                    assert!((28..=42).contains(&cells.len()), "{view} / {week_start}");
                    assert_eq!(
                        cells[0].date.weekday(),
                        week_start_day(week_start),
                        "{view} / {week_start}"
                    );

                    let in_month: Vec<u32> = cells
                        .iter()
                        .filter(|cell| same_month(cell.date, view))
                        .map(|cell| cell.date.day())
                        .collect();
                    let expected: Vec<u32> = (1..=last_of_month(view).day()).collect();
                    assert_eq!(in_month, expected, "{view} / {week_start}");

                    assert!(cells.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
                }
            }
        }
    }

    #[test]
    fn february_starting_on_week_start_has_four_rows() {
        // 2015-02-01 was a Sunday.
        let cells = build_grid(date(2015, 2, 1), 0, date(2015, 2, 10), date(2015, 2, 10));
        assert_eq!(cells.len(), 28);
        assert_eq!(cells[0].date, date(2015, 2, 1));
        assert_eq!(cells[27].date, date(2015, 2, 28));
    }

    #[test]
    fn week_start_wraps() {
        let a = build_grid(date(2024, 3, 1), 1, date(2024, 3, 15), date(2024, 3, 10));
        let b = build_grid(date(2024, 3, 1), 8, date(2024, 3, 15), date(2024, 3, 10));
        assert_eq!(a, b);
    }

    #[test]
    fn classification() {
        let today = date(2024, 3, 10);
        let selected = date(2024, 3, 15);
        let cells = build_grid(date(2024, 3, 1), 1, selected, today);

        assert_eq!(cells[0].date, date(2024, 2, 26));
        assert_eq!(cells.last().unwrap().date, date(2024, 3, 31));

        let kind_of = |d: NaiveDate| cells.iter().find(|c| c.date == d).unwrap().kind;
        assert_eq!(kind_of(date(2024, 2, 26)), DayKind::OtherMonth);
        assert_eq!(kind_of(date(2024, 3, 1)), DayKind::SameMonth);
        assert_eq!(kind_of(today), DayKind::SameMonthToday);
        assert_eq!(kind_of(selected), DayKind::Current);

        let current = cells.iter().filter(|c| c.kind == DayKind::Current).count();
        assert_eq!(current, 1);
        let today_cells = cells
            .iter()
            .filter(|c| c.kind == DayKind::SameMonthToday)
            .count();
        assert_eq!(today_cells, 1);
    }

    #[test]
    fn selected_beats_today() {
        let day = date(2024, 3, 10);
        let cells = build_grid(date(2024, 3, 1), 0, day, day);
        let kinds: Vec<DayKind> = cells
            .iter()
            .filter(|c| c.date == day)
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds, vec![DayKind::Current]);
        assert!(!cells.iter().any(|c| c.kind == DayKind::SameMonthToday));
    }

    #[test]
    fn selected_in_padding_is_current() {
        let cells = build_grid(date(2024, 3, 1), 1, date(2024, 2, 27), date(2024, 2, 27));
        assert_eq!(cells[1].kind, DayKind::Current);
        // Today outside the viewed month is just padding.
        let cells = build_grid(date(2024, 3, 1), 1, date(2024, 5, 1), date(2024, 2, 27));
        assert_eq!(cells[1].kind, DayKind::OtherMonth);
    }

    #[test]
    fn header_starts_at_week_start() {
        assert_eq!(
            weekday_header(0, Locale::en_US),
            ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        );
        assert_eq!(
            weekday_header(1, Locale::en_US),
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        );
        assert_eq!(weekday_header(13, Locale::en_US)[0], "Sat");
    }

    #[test]
    fn rows_of_seven() {
        let cells = build_grid(date(2024, 3, 1), 1, date(2024, 3, 15), date(2024, 3, 10));
        let rows: Vec<&[DayCell]> = weeks(&cells).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.len() == 7));
    }

    #[test]
    fn last_day_of_month() {
        assert_eq!(last_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(last_of_month(date(2023, 2, 10)), date(2023, 2, 28));
        assert_eq!(last_of_month(date(2024, 12, 31)), date(2024, 12, 31));
    }
}
