use chrono::NaiveDate;

use crate::calendar::is_weekend;

const ENGLAND_BANK_HOLIDAYS: &[(i32, u32, u32, &str)] = &[
    (2023, 1, 2, "New Year's Day (substitute day)"),
    (2023, 4, 7, "Good Friday"),
    (2023, 4, 10, "Easter Monday"),
    (2023, 5, 1, "Early May bank holiday"),
    (2023, 5, 8, "Bank holiday for the coronation of King Charles III"),
    (2023, 5, 29, "Spring bank holiday"),
    (2023, 8, 28, "Summer bank holiday"),
    (2023, 12, 25, "Christmas Day"),
    (2023, 12, 26, "Boxing Day"),
    (2024, 1, 1, "New Year's Day"),
    (2024, 3, 29, "Good Friday"),
    (2024, 4, 1, "Easter Monday"),
    (2024, 5, 6, "Early May bank holiday"),
    (2024, 5, 27, "Spring bank holiday"),
    (2024, 8, 26, "Summer bank holiday"),
    (2024, 12, 25, "Christmas Day"),
    (2024, 12, 26, "Boxing Day"),
    (2025, 1, 1, "New Year's Day"),
    (2025, 4, 18, "Good Friday"),
    (2025, 4, 21, "Easter Monday"),
    (2025, 5, 5, "Early May bank holiday"),
    (2025, 5, 26, "Spring bank holiday"),
    (2025, 8, 25, "Summer bank holiday"),
    (2025, 12, 25, "Christmas Day"),
    (2025, 12, 26, "Boxing Day"),
    (2026, 1, 1, "New Year's Day"),
    (2026, 4, 3, "Good Friday"),
    (2026, 4, 6, "Easter Monday"),
    (2026, 5, 4, "Early May bank holiday"),
    (2026, 5, 25, "Spring bank holiday"),
    (2026, 8, 31, "Summer bank holiday"),
    (2026, 12, 25, "Christmas Day"),
    (2026, 12, 28, "Boxing Day (substitute day)"),
    (2027, 1, 1, "New Year's Day"),
    (2027, 3, 26, "Good Friday"),
    (2027, 3, 29, "Easter Monday"),
    (2027, 5, 3, "Early May bank holiday"),
    (2027, 5, 31, "Spring bank holiday"),
    (2027, 8, 30, "Summer bank holiday"),
    (2027, 12, 27, "Christmas Day (substitute day)"),
    (2027, 12, 28, "Boxing Day (substitute day)"),
];

pub fn holiday_name(day: NaiveDate) -> Option<&'static str> {
    ENGLAND_BANK_HOLIDAYS
        .iter()
        .find(|&&(year, month, date, _)| {
            NaiveDate::from_ymd_opt(year, month, date) == Some(day)
        })
        .map(|&(_, _, _, name)| name)
}

pub fn weekday_holidays(year: i32, month: u32) -> Vec<(NaiveDate, &'static str)> {
    ENGLAND_BANK_HOLIDAYS
        .iter()
        .filter(|&&(holiday_year, holiday_month, _, _)| {
            holiday_year == year && holiday_month == month
        })
        .filter_map(|&(holiday_year, holiday_month, holiday_day, name)| {
            let day = NaiveDate::from_ymd_opt(holiday_year, holiday_month, holiday_day)
                .expect("holiday date must be valid");
            (!is_weekend(day)).then_some((day, name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{holiday_name, weekday_holidays};

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn looks_up_holidays_by_date() {
        assert_eq!(holiday_name(day(2025, 12, 25)), Some("Christmas Day"));
        assert_eq!(holiday_name(day(2025, 12, 24)), None);
        assert_eq!(
            holiday_name(day(2026, 12, 28)),
            Some("Boxing Day (substitute day)")
        );
    }

    #[test]
    fn lists_weekday_holidays_for_a_month() {
        let may = weekday_holidays(2025, 5);
        assert_eq!(
            may,
            vec![
                (day(2025, 5, 5), "Early May bank holiday"),
                (day(2025, 5, 26), "Spring bank holiday"),
            ]
        );
        assert!(weekday_holidays(2030, 1).is_empty());
    }
}
