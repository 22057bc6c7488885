use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustType {
    Leave,
    Sick,
    Training,
    PublicHoliday,
}

impl AdjustType {
    pub const ALL: [AdjustType; 4] = [
        AdjustType::Leave,
        AdjustType::Sick,
        AdjustType::Training,
        AdjustType::PublicHoliday,
    ];

    pub fn from_code(code: &str) -> Option<AdjustType> {
        match code {
            "L" => Some(AdjustType::Leave),
            "S" => Some(AdjustType::Sick),
            "T" => Some(AdjustType::Training),
            "P" => Some(AdjustType::PublicHoliday),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            AdjustType::Leave => "L",
            AdjustType::Sick => "S",
            AdjustType::Training => "T",
            AdjustType::PublicHoliday => "P",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdjustType::Leave => "Leave",
            AdjustType::Sick => "Sick",
            AdjustType::Training => "Training",
            AdjustType::PublicHoliday => "Public Holiday",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub clock_in: Option<NaiveTime>,
    pub lunch_minutes: Option<i64>,
    pub clock_out: Option<NaiveTime>,
    pub adjustment_minutes: Option<i64>,
    pub adjust_type: Option<AdjustType>,
    pub comment: Option<String>,
}

impl TimeEntry {
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_week: date.format("%a").to_string(),
            clock_in: None,
            lunch_minutes: None,
            clock_out: None,
            adjustment_minutes: None,
            adjust_type: None,
            comment: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.clock_in.is_none() && self.clock_out.is_none() && self.adjustment_minutes.is_none()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.day_of_week.as_str(), "Sat" | "Sun")
    }

    pub fn worked_minutes(&self) -> i64 {
        match (self.clock_in, self.clock_out) {
            (Some(clock_in), Some(clock_out)) => {
                let span = clock_out.signed_duration_since(clock_in).num_minutes();
                span - self.lunch_minutes.unwrap_or(0)
            }
            _ => 0,
        }
    }

    pub fn worked_hours(&self) -> Decimal {
        hours_from_minutes(self.worked_minutes())
    }

    pub fn adjusted_hours(&self) -> Decimal {
        hours_from_minutes(self.adjustment_minutes.unwrap_or(0))
    }

    pub fn total_hours(&self) -> Decimal {
        self.worked_hours() + self.adjusted_hours()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub hourly_rate: Decimal,
    pub currency: String,
    pub standard_day_hours: Decimal,
    pub vat_rate: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hourly_rate: dec!(97),
            currency: "GBP".to_string(),
            standard_day_hours: dec!(7.5),
            vat_rate: dec!(0.20),
        }
    }
}

impl Config {
    pub fn standard_day_minutes(&self) -> i64 {
        minutes_from_hours(self.standard_day_hours)
    }

    pub fn currency_symbol(&self) -> &str {
        match self.currency.as_str() {
            "GBP" => "£",
            "USD" => "$",
            "EUR" => "€",
            other => other,
        }
    }

    pub fn net_amount(&self, hours: Decimal) -> Decimal {
        (hours * self.hourly_rate).round_dp(2)
    }

    pub fn vat_amount(&self, net: Decimal) -> Decimal {
        (net * self.vat_rate).round_dp(2)
    }

    pub fn gross_amount(&self, net: Decimal) -> Decimal {
        net + self.vat_amount(net)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub description: String,
    pub archived: bool,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketAllocation {
    pub ticket_id: String,
    pub date: NaiveDate,
    pub hours: Decimal,
    pub entered_on_client: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStatus {
    NoWork,
    Unallocated,
    Under,
    Over,
    Exact,
}

impl AllocationStatus {
    pub fn marker(self) -> &'static str {
        match self {
            AllocationStatus::NoWork => "-",
            AllocationStatus::Unallocated => "?",
            AllocationStatus::Under => "↓",
            AllocationStatus::Over => "↑",
            AllocationStatus::Exact => "✓",
        }
    }
}

pub fn allocation_status(worked: Decimal, allocated: Decimal) -> AllocationStatus {
    if worked <= Decimal::ZERO {
        AllocationStatus::NoWork
    } else if allocated.is_zero() {
        AllocationStatus::Unallocated
    } else if allocated < worked {
        AllocationStatus::Under
    } else if allocated > worked {
        AllocationStatus::Over
    } else {
        AllocationStatus::Exact
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekTotals {
    pub worked: Decimal,
    pub leave: Decimal,
    pub sick: Decimal,
    pub training: Decimal,
    pub public_holiday: Decimal,
}

impl WeekTotals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a TimeEntry>) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            totals.worked += entry.worked_hours();
            let adjusted = entry.adjusted_hours();
            match entry.adjust_type {
                Some(AdjustType::Leave) => totals.leave += adjusted,
                Some(AdjustType::Sick) => totals.sick += adjusted,
                Some(AdjustType::Training) => totals.training += adjusted,
                Some(AdjustType::PublicHoliday) => totals.public_holiday += adjusted,
                None => {}
            }
        }
        totals
    }

    pub fn total(&self) -> Decimal {
        self.worked + self.leave + self.sick + self.training + self.public_holiday
    }

    pub fn target(&self, weekdays: u32, standard_day_hours: Decimal) -> Decimal {
        Decimal::from(weekdays) * standard_day_hours - self.public_holiday
    }
}

pub fn hours_from_minutes(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / dec!(60)).round_dp(2)
}

pub fn minutes_from_hours(hours: Decimal) -> i64 {
    (hours * dec!(60)).round_dp(0).to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    use super::{
        AdjustType, AllocationStatus, Config, TimeEntry, WeekTotals, allocation_status,
        hours_from_minutes, minutes_from_hours,
    };

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn worked_entry(clock_in: NaiveTime, lunch: i64, clock_out: NaiveTime) -> TimeEntry {
        TimeEntry {
            clock_in: Some(clock_in),
            lunch_minutes: Some(lunch),
            clock_out: Some(clock_out),
            ..TimeEntry::blank(day(2025, 9, 1))
        }
    }

    #[test]
    fn computes_worked_hours_from_clocks_and_lunch() {
        let entry = worked_entry(time(9, 0), 30, time(17, 0));
        assert_eq!(entry.worked_hours(), dec!(7.50));
        assert_eq!(entry.total_hours(), dec!(7.50));
    }

    #[test]
    fn worked_hours_need_both_clocks() {
        let mut entry = TimeEntry::blank(day(2025, 9, 1));
        entry.clock_in = Some(time(9, 0));
        entry.lunch_minutes = Some(30);
        assert_eq!(entry.worked_hours(), dec!(0));
    }

    #[test]
    fn keeps_negative_spans_without_clamping() {
        let entry = worked_entry(time(17, 0), 0, time(9, 0));
        assert_eq!(entry.worked_hours(), dec!(-8.00));
    }

    #[test]
    fn rounds_fractional_hours_to_two_places() {
        let entry = worked_entry(time(9, 0), 0, time(9, 50));
        assert_eq!(entry.worked_hours(), dec!(0.83));
    }

    #[test]
    fn adjustment_counts_toward_total_hours() {
        let mut entry = TimeEntry::blank(day(2025, 9, 1));
        entry.adjustment_minutes = Some(450);
        entry.adjust_type = Some(AdjustType::Leave);
        assert_eq!(entry.adjusted_hours(), dec!(7.50));
        assert_eq!(entry.total_hours(), dec!(7.50));
    }

    #[test]
    fn blank_entries_carry_the_weekday_label() {
        let entry = TimeEntry::blank(day(2025, 9, 1));
        assert_eq!(entry.day_of_week, "Mon");
        assert!(entry.is_blank());
        assert!(!entry.is_weekend());

        let saturday = TimeEntry::blank(day(2025, 8, 30));
        assert_eq!(saturday.day_of_week, "Sat");
        assert!(saturday.is_weekend());
    }

    #[test]
    fn clocked_or_adjusted_entries_are_not_blank() {
        let mut clocked = TimeEntry::blank(day(2026, 1, 27));
        clocked.clock_in = Some(time(9, 0));
        assert!(!clocked.is_blank());

        let mut adjusted = TimeEntry::blank(day(2026, 1, 27));
        adjusted.adjustment_minutes = Some(450);
        adjusted.adjust_type = Some(AdjustType::Leave);
        assert!(!adjusted.is_blank());
    }

    #[test]
    fn adjust_codes_round_trip() {
        for adjust_type in AdjustType::ALL {
            assert_eq!(AdjustType::from_code(adjust_type.code()), Some(adjust_type));
        }
        assert_eq!(AdjustType::from_code("X"), None);
        assert_eq!(AdjustType::PublicHoliday.label(), "Public Holiday");
    }

    #[test]
    fn grades_allocation_against_worked_hours() {
        assert_eq!(allocation_status(dec!(0), dec!(0)), AllocationStatus::NoWork);
        assert_eq!(
            allocation_status(dec!(7.5), dec!(0)),
            AllocationStatus::Unallocated
        );
        assert_eq!(allocation_status(dec!(7.5), dec!(5)), AllocationStatus::Under);
        assert_eq!(allocation_status(dec!(7.5), dec!(10)), AllocationStatus::Over);
        assert_eq!(
            allocation_status(dec!(7.5), dec!(7.5)),
            AllocationStatus::Exact
        );
        assert_eq!(AllocationStatus::Under.marker(), "↓");
        assert_eq!(AllocationStatus::NoWork.marker(), "-");
    }

    #[test]
    fn splits_week_totals_by_adjust_type() {
        let mut leave = TimeEntry::blank(day(2025, 9, 1));
        leave.adjustment_minutes = Some(450);
        leave.adjust_type = Some(AdjustType::Leave);

        let mut holiday = TimeEntry::blank(day(2025, 9, 2));
        holiday.adjustment_minutes = Some(450);
        holiday.adjust_type = Some(AdjustType::PublicHoliday);

        let mut untyped = TimeEntry::blank(day(2025, 9, 3));
        untyped.adjustment_minutes = Some(60);

        let worked = worked_entry(time(9, 0), 30, time(17, 0));

        let totals = WeekTotals::from_entries([&worked, &leave, &holiday, &untyped]);
        assert_eq!(totals.worked, dec!(7.50));
        assert_eq!(totals.leave, dec!(7.50));
        assert_eq!(totals.public_holiday, dec!(7.50));
        assert_eq!(totals.total(), dec!(22.50));
    }

    #[test]
    fn week_target_subtracts_public_holidays() {
        let mut totals = WeekTotals::default();
        assert_eq!(totals.target(4, dec!(7.5)), dec!(30.0));
        totals.public_holiday = dec!(7.5);
        assert_eq!(totals.target(5, dec!(7.5)), dec!(30.0));
    }

    #[test]
    fn billing_amounts_use_the_configured_rates() {
        let config = Config::default();
        assert_eq!(config.hourly_rate, dec!(97));
        assert_eq!(config.standard_day_minutes(), 450);
        assert_eq!(config.currency_symbol(), "£");

        let net = config.net_amount(dec!(7.5));
        assert_eq!(net, dec!(727.50));
        assert_eq!(config.vat_amount(net), dec!(145.50));
        assert_eq!(config.gross_amount(net), dec!(873.00));
    }

    #[test]
    fn converts_between_minutes_and_hours() {
        assert_eq!(hours_from_minutes(450), dec!(7.50));
        assert_eq!(hours_from_minutes(-30), dec!(-0.50));
        assert_eq!(minutes_from_hours(dec!(7.5)), 450);
        assert_eq!(minutes_from_hours(dec!(0.83)), 50);
    }
}
