use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn week_start(day: NaiveDate) -> NaiveDate {
    let days_from_saturday = (day.weekday().num_days_from_monday() + 2) % 7;
    day - Duration::days(days_from_saturday as i64)
}

pub fn week_end(day: NaiveDate) -> NaiveDate {
    week_start(day) + Duration::days(6)
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("first day of month must be valid")
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    first_day_of_month(year, month) + Duration::days(days_in_month(year, month) as i64 - 1)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("next year date should be valid")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).expect("next month date should be valid")
    };
    (first_of_next - Duration::days(1)).day()
}

pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let mut year = year;
    let mut month = month as i32 + delta;
    while month > 12 {
        year += 1;
        month -= 12;
    }
    while month < 1 {
        year -= 1;
        month += 12;
    }
    (year, month as u32)
}

pub fn weeks_in_month(year: i32, month: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let last_day = last_day_of_month(year, month);
    let mut weeks = Vec::new();
    let mut start = week_start(first_day_of_month(year, month));
    while start <= last_day {
        weeks.push((start, start + Duration::days(6)));
        start += Duration::days(7);
    }
    weeks
}

pub fn week_month(start: NaiveDate, end: NaiveDate) -> (i32, u32) {
    let mut counts: Vec<((i32, u32), u32)> = Vec::new();
    let mut day = start;
    while day <= end {
        if !is_weekend(day) {
            let key = (day.year(), day.month());
            match counts.iter_mut().find(|(month, _)| *month == key) {
                Some((_, count)) => *count += 1,
                None => counts.push((key, 1)),
            }
        }
        day += Duration::days(1);
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(month, _)| month)
        .unwrap_or((start.year(), start.month()))
}

pub fn count_weekdays(start: NaiveDate, end: NaiveDate, filter_month: Option<u32>) -> u32 {
    let mut count = 0;
    let mut day = start;
    while day <= end {
        let in_month = filter_month.map_or(true, |month| day.month() == month);
        if !is_weekend(day) && in_month {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

pub fn company_year_start(today: NaiveDate) -> NaiveDate {
    let year = if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    };
    NaiveDate::from_ymd_opt(year, 9, 1).expect("september start should be valid")
}

pub fn company_year_months(start: NaiveDate) -> Vec<(i32, u32)> {
    (0..12)
        .map(|offset| shift_month(start.year(), start.month(), offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        company_year_months, company_year_start, count_weekdays, days_in_month, shift_month,
        week_month, week_start, weeks_in_month,
    };

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn weeks_run_saturday_to_friday() {
        assert_eq!(week_start(day(2025, 8, 30)), day(2025, 8, 30));
        assert_eq!(week_start(day(2025, 8, 31)), day(2025, 8, 30));
        assert_eq!(week_start(day(2025, 9, 1)), day(2025, 8, 30));
        assert_eq!(week_start(day(2025, 9, 5)), day(2025, 8, 30));
        assert_eq!(week_start(day(2025, 9, 6)), day(2025, 9, 6));
    }

    #[test]
    fn month_windows_cover_every_day_of_the_month() {
        let weeks = weeks_in_month(2025, 9);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0], (day(2025, 8, 30), day(2025, 9, 5)));
        assert_eq!(weeks[4], (day(2025, 9, 27), day(2025, 10, 3)));
    }

    #[test]
    fn week_belongs_to_the_month_holding_most_weekdays() {
        assert_eq!(week_month(day(2025, 8, 30), day(2025, 9, 5)), (2025, 9));
        assert_eq!(week_month(day(2026, 1, 10), day(2026, 1, 16)), (2026, 1));
        assert_eq!(week_month(day(2026, 1, 31), day(2026, 2, 6)), (2026, 2));
    }

    #[test]
    fn counts_weekdays_with_optional_month_filter() {
        assert_eq!(count_weekdays(day(2026, 1, 24), day(2026, 1, 30), None), 5);
        assert_eq!(
            count_weekdays(day(2026, 1, 31), day(2026, 2, 6), Some(2)),
            5
        );
        assert_eq!(count_weekdays(day(2025, 9, 1), day(2025, 9, 30), None), 22);
    }

    #[test]
    fn shifts_months_across_year_boundaries() {
        assert_eq!(shift_month(2025, 12, 1), (2026, 1));
        assert_eq!(shift_month(2025, 1, -1), (2024, 12));
        assert_eq!(shift_month(2025, 6, 18), (2026, 12));
        assert_eq!(shift_month(2025, 6, -18), (2023, 12));
    }

    #[test]
    fn month_lengths_respect_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 9), 30);
    }

    #[test]
    fn company_year_starts_in_september() {
        assert_eq!(company_year_start(day(2025, 9, 1)), day(2025, 9, 1));
        assert_eq!(company_year_start(day(2025, 8, 31)), day(2024, 9, 1));
        assert_eq!(company_year_start(day(2026, 2, 14)), day(2025, 9, 1));

        let months = company_year_months(day(2025, 9, 1));
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], (2025, 9));
        assert_eq!(months[11], (2026, 8));
    }
}
