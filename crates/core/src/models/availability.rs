use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};

/// Weekdays in storage order, Monday first. Indexes match
/// [`Weekday::num_days_from_monday`].
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekday names in wire order, aligned with [`WEEKDAYS`].
pub const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Serde adapter for wall-clock times. Serializes as `"HH:MM"`, accepts
/// `"HH:MM"` or `"HH:MM:SS"` on input.
pub mod wall_clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|_| serde::de::Error::custom(format!("invalid wall-clock time {raw:?}")))
    }
}

/// A half-open `[start, end)` span of wall-clock time within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "wall_clock")]
    pub start: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> ScheduleResult<Self> {
        if start >= end {
            return Err(ScheduleError::Validation(format!(
                "window start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M"),
            )));
        }
        Ok(TimeWindow { start, end })
    }

    /// Half-open overlap test against another window on the same day.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A tutor's recurring weekly availability, interpreted in their home
/// timezone. Windows are kept sorted by start time within each day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyAvailability {
    timezone: Tz,
    windows: [Vec<TimeWindow>; 7],
}

impl WeeklyAvailability {
    /// Builds a validated availability pattern. Rejects windows with
    /// `start >= end` and windows that overlap within the same day;
    /// back-to-back windows are allowed.
    pub fn new(timezone: Tz, mut windows: [Vec<TimeWindow>; 7]) -> ScheduleResult<Self> {
        for (day, day_windows) in windows.iter_mut().enumerate() {
            for window in day_windows.iter() {
                if window.start >= window.end {
                    return Err(ScheduleError::Validation(format!(
                        "window start {} must be before end {} on {}",
                        window.start.format("%H:%M"),
                        window.end.format("%H:%M"),
                        DAY_NAMES[day],
                    )));
                }
            }
            day_windows.sort_by_key(|w| w.start);
            for pair in day_windows.windows(2) {
                if pair[0].overlaps(&pair[1]) {
                    return Err(ScheduleError::Validation(format!(
                        "availability windows overlap on {}",
                        DAY_NAMES[day],
                    )));
                }
            }
        }
        Ok(WeeklyAvailability { timezone, windows })
    }

    pub fn empty(timezone: Tz) -> Self {
        WeeklyAvailability {
            timezone,
            windows: Default::default(),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Windows for one weekday, sorted by start time.
    pub fn windows_for(&self, weekday: Weekday) -> &[TimeWindow] {
        &self.windows[weekday.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.windows.iter().all(|day| day.is_empty())
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Wire representation of a weekly availability pattern. Days absent from the
/// payload mean "not available that day".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub monday: Vec<TimeWindow>,
    #[serde(default)]
    pub tuesday: Vec<TimeWindow>,
    #[serde(default)]
    pub wednesday: Vec<TimeWindow>,
    #[serde(default)]
    pub thursday: Vec<TimeWindow>,
    #[serde(default)]
    pub friday: Vec<TimeWindow>,
    #[serde(default)]
    pub saturday: Vec<TimeWindow>,
    #[serde(default)]
    pub sunday: Vec<TimeWindow>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        WeeklySchedule {
            monday: Vec::new(),
            tuesday: Vec::new(),
            wednesday: Vec::new(),
            thursday: Vec::new(),
            friday: Vec::new(),
            saturday: Vec::new(),
            sunday: Vec::new(),
            timezone: default_timezone(),
        }
    }
}

impl TryFrom<WeeklySchedule> for WeeklyAvailability {
    type Error = ScheduleError;

    fn try_from(schedule: WeeklySchedule) -> ScheduleResult<Self> {
        let timezone: Tz = schedule
            .timezone
            .parse()
            .map_err(|_| ScheduleError::Validation(format!(
                "unknown timezone {:?}",
                schedule.timezone
            )))?;
        WeeklyAvailability::new(
            timezone,
            [
                schedule.monday,
                schedule.tuesday,
                schedule.wednesday,
                schedule.thursday,
                schedule.friday,
                schedule.saturday,
                schedule.sunday,
            ],
        )
    }
}

impl From<&WeeklyAvailability> for WeeklySchedule {
    fn from(availability: &WeeklyAvailability) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] =
            availability.windows.clone();
        WeeklySchedule {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
            timezone: availability.timezone.name().to_string(),
        }
    }
}
