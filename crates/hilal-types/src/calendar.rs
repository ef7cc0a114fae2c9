use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::HijriDate;

/// One day of an estimated calendar: the Gregorian day and the Hijri date it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstimatedHijriDay {
    pub gregorian: NaiveDate,
    pub hijri: HijriDate,
}

impl EstimatedHijriDay {
    pub fn new(gregorian: NaiveDate, hijri: HijriDate) -> Self {
        Self { gregorian, hijri }
    }
}
