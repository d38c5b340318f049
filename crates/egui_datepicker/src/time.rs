use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike as _};
use serde::{Deserialize, Serialize};

/// A column of the time view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TimePart {
    Hour,
    Minute,

    /// AM / PM, only shown in 12-hour mode.
    Meridiem,
}

impl TimePart {
    pub fn name(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Meridiem => "meridiem",
        }
    }
}

/// Which way a time part is moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Increment,
    Decrement,
}

/// How the time view lists and shows values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeFormat {
    /// 12-hour clock with an AM/PM column.
    pub meridiem: bool,

    /// Minutes move in steps of this size. Divides 60.
    pub minute_interval: u32,
}

impl TimeFormat {
    /// The columns shown, left to right.
    pub fn parts(&self) -> &'static [TimePart] {
        if self.meridiem {
            &[TimePart::Hour, TimePart::Minute, TimePart::Meridiem]
        } else {
            &[TimePart::Hour, TimePart::Minute]
        }
    }

    fn interval(&self) -> u32 {
        self.minute_interval.clamp(1, 60)
    }

    /// The options of a column, top to bottom.
    ///
    /// Hours are `11, 10, …, 01, 12` on a 12-hour clock and `23, …, 00` otherwise,
    /// minutes count down from `60 - minute_interval` to `00`.
    pub fn options(&self, part: TimePart) -> Vec<String> {
        match part {
            TimePart::Hour if self.meridiem => (1..12)
                .rev()
                .map(|hour| format!("{hour:02}"))
                .chain(std::iter::once("12".to_owned()))
                .collect(),
            TimePart::Hour => (0..24).rev().map(|hour| format!("{hour:02}")).collect(),
            TimePart::Minute => (0..60)
                .step_by(self.interval() as usize)
                .rev()
                .map(|minute| format!("{minute:02}"))
                .collect(),
            TimePart::Meridiem => vec!["PM".to_owned(), "AM".to_owned()],
        }
    }

    /// How `time` reads in the given column.
    pub fn display(&self, part: TimePart, time: NaiveTime) -> String {
        match part {
            TimePart::Hour if self.meridiem => format!("{:02}", time.hour12().1),
            TimePart::Hour => format!("{:02}", time.hour()),
            TimePart::Minute => format!("{:02}", time.minute()),
            TimePart::Meridiem => {
                if time.hour12().0 {
                    "PM".to_owned()
                } else {
                    "AM".to_owned()
                }
            }
        }
    }

    /// How far one step of `part` moves the time.
    pub fn step_size(&self, part: TimePart) -> TimeDelta {
        match part {
            TimePart::Hour => TimeDelta::hours(1),
            TimePart::Minute => TimeDelta::minutes(i64::from(self.interval())),
            TimePart::Meridiem => TimeDelta::hours(12),
        }
    }

    /// Move `at` by one step of `part`.
    ///
    /// Minutes carry into the hour and hours into the date. Moving the meridiem shifts
    /// the time by twelve hours, so the 12-hour numeral stays the same. At the ends of
    /// the calendar the value stays put.
    pub fn adjust(&self, at: NaiveDateTime, part: TimePart, step: Step) -> NaiveDateTime {
        let delta = self.step_size(part);
        let moved = match step {
            Step::Increment => at.checked_add_signed(delta),
            Step::Decrement => at.checked_sub_signed(delta),
        };
        moved.unwrap_or(at)
    }

    /// Round the minutes down to the interval and drop the seconds.
    pub fn snap(&self, time: NaiveTime) -> NaiveTime {
        let minute = time.minute() - time.minute() % self.interval();
        NaiveTime::from_hms_opt(time.hour(), minute, 0).unwrap_or(time)
    }
}

/// Whether the increment and decrement buttons of a column can be pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Stepper {
    pub increment_enabled: bool,
    pub decrement_enabled: bool,
}

impl Default for Stepper {
    fn default() -> Self {
        Self {
            increment_enabled: true,
            decrement_enabled: false,
        }
    }
}

/// The [`Stepper`] of every column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeSteppers {
    hour: Stepper,
    minute: Stepper,
    meridiem: Stepper,
}

impl TimeSteppers {
    /// Buttons are disabled when the shown value is at the matching end of the list.
    pub fn for_time(format: &TimeFormat, time: NaiveTime) -> Self {
        let stepper = |part: TimePart| {
            let options = format.options(part);
            let shown = format.display(part, time);
            Stepper {
                increment_enabled: options.first() != Some(&shown),
                decrement_enabled: options.last() != Some(&shown),
            }
        };
        Self {
            hour: stepper(TimePart::Hour),
            minute: stepper(TimePart::Minute),
            meridiem: stepper(TimePart::Meridiem),
        }
    }

    pub fn get(&self, part: TimePart) -> Stepper {
        match part {
            TimePart::Hour => self.hour,
            TimePart::Minute => self.minute,
            TimePart::Meridiem => self.meridiem,
        }
    }

    fn get_mut(&mut self, part: TimePart) -> &mut Stepper {
        match part {
            TimePart::Hour => &mut self.hour,
            TimePart::Minute => &mut self.minute,
            TimePart::Meridiem => &mut self.meridiem,
        }
    }

    /// Update a column after it moved to `time`.
    ///
    /// A step always re-enables the opposite button. The button used is disabled once
    /// the value reaches its end of the list.
    pub fn after_step(&mut self, format: &TimeFormat, part: TimePart, step: Step, time: NaiveTime) {
        let options = format.options(part);
        let shown = format.display(part, time);
        let stepper = self.get_mut(part);
        match step {
            Step::Increment => {
                stepper.decrement_enabled = true;
                stepper.increment_enabled = options.first() != Some(&shown);
            }
            Step::Decrement => {
                stepper.increment_enabled = true;
                stepper.decrement_enabled = options.last() != Some(&shown);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H24: TimeFormat = TimeFormat {
        meridiem: false,
        minute_interval: 15,
    };

    const H12: TimeFormat = TimeFormat {
        meridiem: true,
        minute_interval: 15,
    };

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn on(day: u32, time: NaiveTime) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_time(time)
    }

    fn adjusted(format: TimeFormat, time: NaiveTime, part: TimePart, step: Step) -> NaiveTime {
        format.adjust(on(15, time), part, step).time()
    }

    #[test]
    fn listed_options() {
        assert_eq!(
            H12.options(TimePart::Hour),
            ["11", "10", "09", "08", "07", "06", "05", "04", "03", "02", "01", "12"]
        );
        let hours = H24.options(TimePart::Hour);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours.first().map(String::as_str), Some("23"));
        assert_eq!(hours.last().map(String::as_str), Some("00"));
        assert_eq!(H12.options(TimePart::Minute), ["45", "30", "15", "00"]);
        let five = TimeFormat {
            meridiem: false,
            minute_interval: 5,
        };
        assert_eq!(five.options(TimePart::Minute).len(), 12);
        assert_eq!(H12.options(TimePart::Meridiem), ["PM", "AM"]);
        assert_eq!(H12.parts().len(), 3);
        assert_eq!(H24.parts(), [TimePart::Hour, TimePart::Minute]);
    }

    #[test]
    fn hour_carries_into_the_date() {
        let at = on(15, hm(23, 30));
        assert_eq!(H24.adjust(at, TimePart::Hour, Step::Increment), on(16, hm(0, 30)));
        let at = on(15, hm(0, 30));
        assert_eq!(H24.adjust(at, TimePart::Hour, Step::Decrement), on(14, hm(23, 30)));
    }

    #[test]
    fn minute_carries_into_the_hour() {
        let at = on(15, hm(10, 45));
        assert_eq!(H24.adjust(at, TimePart::Minute, Step::Increment), on(15, hm(11, 0)));
        let at = on(15, hm(10, 0));
        assert_eq!(H24.adjust(at, TimePart::Minute, Step::Decrement), on(15, hm(9, 45)));
        assert_eq!(
            adjusted(H24, hm(10, 15), TimePart::Minute, Step::Increment),
            hm(10, 30)
        );
        let at = on(15, hm(23, 45));
        assert_eq!(H24.adjust(at, TimePart::Minute, Step::Increment), on(16, hm(0, 0)));
    }

    #[test]
    fn stays_put_at_calendar_end() {
        let at = NaiveDateTime::MAX;
        assert_eq!(H24.adjust(at, TimePart::Hour, Step::Increment), at);
    }

    #[test]
    fn meridiem_keeps_numeral() {
        let morning = hm(10, 15);
        let evening = adjusted(H12, morning, TimePart::Meridiem, Step::Increment);
        assert_eq!(evening, hm(22, 15));
        assert_eq!(H12.display(TimePart::Hour, morning), "10");
        assert_eq!(H12.display(TimePart::Hour, evening), "10");
        assert_eq!(H12.display(TimePart::Meridiem, morning), "AM");
        assert_eq!(H12.display(TimePart::Meridiem, evening), "PM");
        assert_eq!(adjusted(H12, evening, TimePart::Meridiem, Step::Decrement), morning);
    }

    #[test]
    fn twelve_hour_display() {
        assert_eq!(H12.display(TimePart::Hour, hm(0, 0)), "12");
        assert_eq!(H12.display(TimePart::Hour, hm(12, 0)), "12");
        assert_eq!(H12.display(TimePart::Hour, hm(13, 0)), "01");
        assert_eq!(H24.display(TimePart::Hour, hm(13, 0)), "13");
    }

    #[test]
    fn snapping() {
        let time = NaiveTime::from_hms_opt(9, 37, 12).unwrap();
        assert_eq!(H24.snap(time), hm(9, 30));
    }

    #[test]
    fn increment_past_top_reenables_decrement() {
        let mut steppers = TimeSteppers::for_time(&H24, hm(23, 0));
        assert!(!steppers.get(TimePart::Hour).increment_enabled);

        let time = adjusted(H24, hm(23, 0), TimePart::Hour, Step::Increment);
        steppers.after_step(&H24, TimePart::Hour, Step::Increment, time);
        assert_eq!(time, hm(0, 0));
        let hour = steppers.get(TimePart::Hour);
        assert!(hour.decrement_enabled);
        assert!(hour.increment_enabled);
    }

    #[test]
    fn steppers_disable_at_list_ends() {
        let mut steppers = TimeSteppers::for_time(&H12, hm(10, 30));
        assert!(steppers.get(TimePart::Minute).increment_enabled);
        assert!(steppers.get(TimePart::Minute).decrement_enabled);

        let time = adjusted(H12, hm(10, 30), TimePart::Minute, Step::Increment);
        steppers.after_step(&H12, TimePart::Minute, Step::Increment, time);
        assert!(!steppers.get(TimePart::Minute).increment_enabled);

        let time = adjusted(H12, time, TimePart::Minute, Step::Decrement);
        let time = adjusted(H12, time, TimePart::Minute, Step::Decrement);
        let time = adjusted(H12, time, TimePart::Minute, Step::Decrement);
        steppers.after_step(&H12, TimePart::Minute, Step::Decrement, time);
        assert_eq!(time, hm(10, 0));
        let minute = steppers.get(TimePart::Minute);
        assert!(minute.increment_enabled);
        assert!(!minute.decrement_enabled);

        let time = adjusted(H12, time, TimePart::Meridiem, Step::Increment);
        steppers.after_step(&H12, TimePart::Meridiem, Step::Increment, time);
        assert!(!steppers.get(TimePart::Meridiem).increment_enabled);
        assert!(steppers.get(TimePart::Meridiem).decrement_enabled);
    }
}
