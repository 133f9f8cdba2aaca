use std::ops::{Add, AddAssign, Sub, SubAssign};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

pub type UnitType = u64;
pub const UNITS_PER_SECOND: UnitType = NANOS_PER_SECOND as UnitType;
pub const UNITS_PER_MILLI: UnitType = UNITS_PER_SECOND / 1_000;

///! High resolution monotonic time
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub struct ClockTime(UnitType);

impl ClockTime {
  pub fn zero() -> ClockTime {
    ClockTime(0)
  }

  pub fn new(units: UnitType) -> ClockTime {
    ClockTime(units)
  }

  pub fn from_seconds(seconds: f64) -> ClockTime {
    ClockTime((seconds * UNITS_PER_SECOND as f64).round() as UnitType)
  }

  pub fn from_millis(millis: u64) -> ClockTime {
    ClockTime(millis * UNITS_PER_MILLI)
  }

  pub fn units(&self) -> UnitType {
    self.0
  }

  pub fn to_seconds(&self) -> f64 {
    self.0 as f64 / UNITS_PER_SECOND as f64
  }
}

impl Add for ClockTime {
  type Output = ClockTime;

  fn add(self, rhs: ClockTime) -> ClockTime {
    ClockTime(self.0 + rhs.0)
  }
}

impl AddAssign for ClockTime {
  fn add_assign(&mut self, rhs: ClockTime) {
    *self = *self + rhs;
  }
}

impl Sub for ClockTime {
  type Output = ClockTime;

  fn sub(self, rhs: ClockTime) -> ClockTime {
    ClockTime(self.0 - self.0.min(rhs.0))
  }
}

impl SubAssign for ClockTime {
  fn sub_assign(&mut self, rhs: ClockTime) {
    *self = *self - rhs;
  }
}

#[cfg(test)]
mod test {
  use super::ClockTime;

  #[test]
  pub fn clock_time_new() {
    let time = ClockTime::new(15);
    assert_eq!(time.units(), 15);
  }

  #[test]
  pub fn clock_time_zero() {
    let time = ClockTime::zero();
    assert_eq!(time.units(), 0);
  }

  #[test]
  pub fn clock_time_from_seconds() {
    let time = ClockTime::from_seconds(1.5);
    assert_eq!(time.units(), 1_500_000_000);
  }

  #[test]
  pub fn clock_time_from_millis() {
    let time = ClockTime::from_millis(100);
    assert_eq!(time.units(), 100_000_000);
  }

  #[test]
  pub fn clock_time_to_seconds() {
    let time = ClockTime::from_millis(2_150);
    assert_eq!(time.to_seconds(), 2.15);
  }

  #[test]
  pub fn clock_time_add() {
    let time1 = ClockTime::new(15);
    let time2 = ClockTime::new(5);
    assert_eq!(time1 + time2, ClockTime::new(20));
  }

  #[test]
  pub fn clock_time_add_assign() {
    let mut time1 = ClockTime::new(15);
    time1 += ClockTime::new(5);
    assert_eq!(time1, ClockTime::new(20));
  }

  #[test]
  pub fn clock_time_sub() {
    let time1 = ClockTime::new(15);
    let time2 = ClockTime::new(5);
    assert_eq!(time1 - time2, ClockTime::new(10));
  }

  #[test]
  pub fn clock_time_sub_saturates() {
    let time1 = ClockTime::new(5);
    let time2 = ClockTime::new(15);
    assert_eq!(time1 - time2, ClockTime::zero());
  }

  #[test]
  pub fn clock_time_ord() {
    let time1 = ClockTime::from_millis(40);
    let time2 = ClockTime::from_millis(100);
    assert!(time1 < time2);
  }
}
