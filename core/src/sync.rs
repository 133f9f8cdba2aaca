use crate::time::{ClockTime, Seconds};
use crate::track::TrackIndex;

///! A set of tracks required to transition in phase.
///!
///! The first member is the drift reference: its playback position is the
///! one the other members are snapped to.
pub struct SyncGroup {
  name: String,
  members: Vec<TrackIndex>,
}

impl SyncGroup {
  pub fn new<T>(name: T, members: Vec<TrackIndex>) -> SyncGroup
  where
    T: Into<String>,
  {
    SyncGroup {
      name: name.into(),
      members,
    }
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn members(&self) -> &[TrackIndex] {
    self.members.as_slice()
  }

  pub fn reference(&self) -> TrackIndex {
    self.members[0]
  }
}

///! Bounded wait armed when a group member finishes its clip before its
///! siblings. When it expires, pending members transition alone.
pub struct SiblingWait {
  pub group: usize,
  pub deadline: ClockTime,
}

/// Periodic position comparison between sync-group members. When two active
/// surfaces diverge beyond the tolerance, the follower is snapped onto the
/// reference position. A unilateral copy keeps the correction imperceptible
/// during fast motion content.
pub struct DriftCorrector {
  interval: ClockTime,
  tolerance: Seconds,
  next_check: ClockTime,
}

impl DriftCorrector {
  pub fn new(interval: ClockTime, tolerance: Seconds) -> DriftCorrector {
    DriftCorrector {
      interval,
      tolerance,
      next_check: ClockTime::zero(),
    }
  }

  pub fn is_due(&self, now: ClockTime) -> bool {
    now >= self.next_check
  }

  pub fn schedule_next(&mut self, now: ClockTime) {
    self.next_check = now + self.interval;
  }

  /// The position to copy onto the follower, if the divergence exceeds the
  /// tolerance.
  pub fn correction(&self, reference: Seconds, follower: Seconds) -> Option<Seconds> {
    if (follower - reference).abs() > self.tolerance {
      Some(reference)
    } else {
      None
    }
  }
}
