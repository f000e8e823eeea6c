use chrono::{DateTime, Utc};

pub trait TimeSource {
    // Return the current instant in UTC
    fn current_time(&self) -> DateTime<Utc>;
}

#[derive(Clone)]
pub struct SystemTime {}

impl TimeSource for SystemTime {
    fn current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant, used to pin "now" in tests.
#[cfg(test)]
#[derive(Clone)]
pub struct FixedTime {
    pub time: DateTime<Utc>,
}

#[cfg(test)]
impl TimeSource for FixedTime {
    fn current_time(&self) -> DateTime<Utc> {
        self.time
    }
}
