use std::mem;

use log::{debug, info, trace, warn};

use failure::{Error, Fail};

use crate::config::Config;
use crate::surface::PlaybackSurface;
use crate::sync::{DriftCorrector, SiblingWait, SyncGroup};
use crate::time::ClockTime;
use crate::track::{GroupIndex, Track, TrackIndex};

/// Number of rendering frames between scheduling a buffer swap and issuing
/// play, so the host has committed the position reset before the standby
/// surface becomes visible.
const SWAP_FRAME_TICKS: u8 = 2;

#[derive(Debug, Fail)]
pub enum EngineError {
  #[fail(display = "Expected {} surface pairs but got {}", expected, actual)]
  SurfaceCountMismatch { expected: usize, actual: usize },

  #[fail(display = "Track {} has an empty clip sequence", name)]
  EmptySequence { name: String },

  #[fail(display = "Sync group {} needs at least two tracks", name)]
  GroupTooSmall { name: String },
}

///! A buffer swap deferred by a fixed number of rendering frames.
///!
///! A coupled transition lists every member of its sync group, so that all
///! of them swap within the same `on_frame` call.
struct FrameBarrier {
  ticks: u8,
  tracks: Vec<TrackIndex>,
}

/// The Loop Synchronizer. Owns the track collection and coordinates
/// double-buffered clip transitions, the synchronized startup gate, coupled
/// sync-group transitions and periodic drift correction.
///
/// Single-threaded and event-driven: the host forwards surface `ready` and
/// `ended` notifications, calls `on_frame` once per rendering frame and
/// `poll` on a fixed cadence with the current time.
pub struct LoopEngine<S> {
  tracks: Vec<Track<S>>,
  groups: Vec<SyncGroup>,
  started: bool,
  sibling_wait: ClockTime,
  barriers: Vec<FrameBarrier>,
  waits: Vec<SiblingWait>,
  drift: DriftCorrector,
}

impl<S: PlaybackSurface> LoopEngine<S> {
  pub fn new(config: &Config, surfaces: Vec<(S, S)>) -> Result<LoopEngine<S>, Error> {
    if surfaces.len() != config.tracks.len() {
      return Err(
        EngineError::SurfaceCountMismatch {
          expected: config.tracks.len(),
          actual: surfaces.len(),
        }
        .into(),
      );
    }

    let mut group_names: Vec<String> = Vec::new();
    let mut group_members: Vec<Vec<TrackIndex>> = Vec::new();
    let mut track_groups: Vec<Option<GroupIndex>> = Vec::new();

    for (index, track_config) in config.tracks.iter().enumerate() {
      if track_config.clips.is_empty() {
        return Err(
          EngineError::EmptySequence {
            name: track_config.name.clone(),
          }
          .into(),
        );
      }

      let group = track_config.group.as_ref().map(|name| {
        match group_names.iter().position(|known| known == name) {
          Some(found) => {
            group_members[found].push(index);
            found
          }
          None => {
            group_names.push(name.clone());
            group_members.push(vec![index]);
            group_names.len() - 1
          }
        }
      });
      track_groups.push(group);
    }

    for (name, members) in group_names.iter().zip(group_members.iter()) {
      if members.len() < 2 {
        return Err(EngineError::GroupTooSmall { name: name.clone() }.into());
      }
    }

    let groups = group_names
      .into_iter()
      .zip(group_members.into_iter())
      .map(|(name, members)| SyncGroup::new(name, members))
      .collect();

    let mut tracks = Vec::with_capacity(config.tracks.len());
    for ((track_config, group), (first, second)) in config
      .tracks
      .iter()
      .zip(track_groups.into_iter())
      .zip(surfaces.into_iter())
    {
      tracks.push(Track::new(
        track_config,
        config.playback.rate,
        group,
        first,
        second,
      ));
    }

    Ok(LoopEngine {
      tracks,
      groups,
      started: false,
      sibling_wait: ClockTime::from_millis(config.sync.sibling_wait_ms),
      barriers: Vec::new(),
      waits: Vec::new(),
      drift: DriftCorrector::new(
        ClockTime::from_millis(config.sync.drift_check_interval_ms),
        config.sync.drift_tolerance,
      ),
    })
  }

  pub fn num_tracks(&self) -> usize {
    self.tracks.len()
  }

  pub fn tracks(&self) -> &[Track<S>] {
    self.tracks.as_slice()
  }

  pub fn is_started(&self) -> bool {
    self.started
  }

  pub fn get_active_surface_index(&self, track: TrackIndex) -> usize {
    self.tracks[track].get_active_surface_index()
  }

  pub fn get_cursor_index(&self, track: TrackIndex) -> usize {
    self.tracks[track].get_cursor_index()
  }

  /// A surface reported that its current frame is decodable. Drives the
  /// startup gate; ignored once playback has started.
  pub fn on_surface_ready(&mut self, track: TrackIndex) {
    if self.started {
      return;
    }
    match self.tracks.get_mut(track) {
      Some(track) => track.mark_ready(),
      None => return,
    };

    let all_ready = self
      .tracks
      .iter()
      .all(|track| track.is_ready() && track.active_surface().has_current_data());
    if all_ready {
      self.start_all();
    }
  }

  /// Start every track in the same call. One-shot: subsequent calls are
  /// no-ops. Also the entry point for an explicit user-initiated start.
  pub fn start_all(&mut self) {
    if self.started {
      return;
    }
    self.started = true;

    info!("Starting {} tracks in unison", self.tracks.len());
    for track in self.tracks.iter_mut() {
      track.begin_playback();
    }
  }

  /// The active surface of a track reached the end of its clip.
  pub fn on_clip_ended(&mut self, track: TrackIndex, now: ClockTime) {
    let group = {
      let entry = match self.tracks.get_mut(track) {
        Some(entry) => entry,
        None => return,
      };
      if !entry.finish_clip() {
        return;
      }
      entry.get_group()
    };

    match group {
      Some(group) => self.coupled_transition(group, now),
      None => self.schedule_swap(vec![track]),
    }
  }

  /// Coupled transition: swap only once every member of the group finished
  /// its clip, or give up on stragglers after a bounded wait.
  fn coupled_transition(&mut self, group: GroupIndex, now: ClockTime) {
    let all_pending = self.groups[group]
      .members()
      .iter()
      .all(|&member| self.tracks[member].is_pending());

    if all_pending {
      self.waits.retain(|wait| wait.group != group);
      let members = self.groups[group].members().to_vec();
      debug!(
        "Sync group {}: all members pending, swapping together",
        self.groups[group].get_name()
      );
      self.schedule_swap(members);
    } else if !self.waits.iter().any(|wait| wait.group == group) {
      trace!(
        "Sync group {}: waiting for siblings",
        self.groups[group].get_name()
      );
      self.waits.push(SiblingWait {
        group,
        deadline: now + self.sibling_wait,
      });
    }
  }

  fn schedule_swap(&mut self, tracks: Vec<TrackIndex>) {
    for &index in tracks.iter() {
      self.tracks[index].begin_swap();
    }
    self.barriers.push(FrameBarrier {
      ticks: SWAP_FRAME_TICKS,
      tracks,
    });
  }

  /// Called by the host once per rendering frame. Fires due barriers; every
  /// track listed on a barrier swaps within this same call.
  pub fn on_frame(&mut self) {
    if self.barriers.is_empty() {
      return;
    }

    let barriers = mem::replace(&mut self.barriers, Vec::new());
    for mut barrier in barriers {
      barrier.ticks -= 1;
      if barrier.ticks == 0 {
        for index in barrier.tracks {
          self.tracks[index].perform_swap();
          debug!(
            "Track {}: swapped to clip {}",
            self.tracks[index].get_name(),
            self.tracks[index].get_cursor_index()
          );
        }
      } else {
        self.barriers.push(barrier);
      }
    }
  }

  /// Fixed-cadence timer entry point: expires sibling waits and runs the
  /// periodic drift check when due.
  pub fn poll(&mut self, now: ClockTime) {
    self.fire_expired_waits(now);

    if self.drift.is_due(now) {
      self.correct_drift();
      self.drift.schedule_next(now);
    }
  }

  fn fire_expired_waits(&mut self, now: ClockTime) {
    let mut expired: Vec<GroupIndex> = Vec::new();
    self.waits.retain(|wait| {
      if wait.deadline <= now {
        expired.push(wait.group);
        false
      } else {
        true
      }
    });

    for group in expired {
      let pending: Vec<TrackIndex> = self.groups[group]
        .members()
        .iter()
        .cloned()
        .filter(|&member| self.tracks[member].is_pending())
        .collect();
      if !pending.is_empty() {
        warn!(
          "Sync group {}: sibling wait expired, transitioning {} track(s) alone",
          self.groups[group].get_name(),
          pending.len()
        );
        self.schedule_swap(pending);
      }
    }
  }

  fn correct_drift(&mut self) {
    for group_index in 0..self.groups.len() {
      let reference_index = self.groups[group_index].reference();
      let (reference_position, reference_playable) = {
        let surface = self.tracks[reference_index].active_surface();
        (
          surface.get_position(),
          surface.is_playing() && surface.has_current_data(),
        )
      };
      if !reference_playable {
        continue;
      }

      let followers: Vec<TrackIndex> = self.groups[group_index].members()[1..].to_vec();
      for member in followers {
        let correction = {
          let surface = self.tracks[member].active_surface();
          if surface.is_playing() && surface.has_current_data() {
            self.drift.correction(reference_position, surface.get_position())
          } else {
            None
          }
        };
        if let Some(position) = correction {
          debug!(
            "Track {}: drift correction to {:.3}s",
            self.tracks[member].get_name(),
            position
          );
          self.tracks[member].active_surface_mut().set_position(position);
        }
      }
    }
  }

  /// Teardown: cancel deferred swaps and waits and pause every surface, so
  /// nothing operates on released sinks afterwards.
  pub fn close(&mut self) {
    info!("Closing the loop engine ...");

    self.barriers.clear();
    self.waits.clear();
    for track in self.tracks.iter_mut() {
      track.pause_all();
    }
  }
}
