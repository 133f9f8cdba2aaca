pub mod buffers;
pub mod sequence;

use log::trace;

use crate::config::Track as TrackConfig;
use crate::surface::PlaybackSurface;
use crate::track::buffers::BufferPair;
use crate::track::sequence::{ClipSequence, SequenceCursor};

pub type TrackIndex = usize;

pub type GroupIndex = usize;

///! Per-track playback state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
  Idle,
  Preloading,
  ReadyToStart,
  Playing,
  ClipEnding,
  Swapping,
}

/// A logical looping channel composed of an ordered cyclic sequence of
/// clips, played through a double-buffered pair of surfaces.
pub struct Track<S> {
  name: String,
  sequence: ClipSequence,
  cursor: SequenceCursor,
  rate: f64,
  muted: bool,
  group: Option<GroupIndex>,
  buffers: BufferPair<S>,
  state: TrackState,
  pending: bool,
}

impl<S: PlaybackSurface> Track<S> {
  /// Assigns the first clip to the active surface and the following clip to
  /// the standby surface. Playback is not started here.
  pub fn new(
    config: &TrackConfig,
    default_rate: f64,
    group: Option<GroupIndex>,
    first: S,
    second: S,
  ) -> Track<S> {
    let sequence = ClipSequence::new(config.clips.clone());
    let cursor = SequenceCursor::new(sequence.len());
    let rate = config.rate.unwrap_or(default_rate);

    let mut buffers = BufferPair::new(first, second);
    buffers.active_mut().load(sequence.get_clip(0));
    buffers.standby_mut().load(sequence.get_clip(cursor.next_index()));
    for surface in buffers.each_mut() {
      surface.set_rate(rate);
      surface.set_muted(config.muted);
    }

    Track {
      name: config.name.clone(),
      sequence,
      cursor,
      rate,
      muted: config.muted,
      group,
      buffers,
      state: TrackState::Preloading,
      pending: false,
    }
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_state(&self) -> TrackState {
    self.state
  }

  pub fn get_group(&self) -> Option<GroupIndex> {
    self.group
  }

  pub fn get_cursor_index(&self) -> usize {
    self.cursor.get_index()
  }

  pub fn get_active_surface_index(&self) -> usize {
    self.buffers.get_active_index()
  }

  pub fn active_surface(&self) -> &S {
    self.buffers.active()
  }

  pub fn active_surface_mut(&mut self) -> &mut S {
    self.buffers.active_mut()
  }

  pub fn is_pending(&self) -> bool {
    self.pending
  }

  pub fn mark_ready(&mut self) {
    if self.state == TrackState::Idle || self.state == TrackState::Preloading {
      self.state = TrackState::ReadyToStart;
    }
  }

  pub fn is_ready(&self) -> bool {
    self.state == TrackState::ReadyToStart
  }

  /// Reset the active surface to the start and begin playback. A rejected
  /// start leaves the track paused; the next transition will retry.
  pub fn begin_playback(&mut self) {
    let rate = self.rate;
    let active = self.buffers.active_mut();
    active.set_rate(rate);
    active.set_position(0.0);
    if let Err(err) = active.play() {
      trace!("Track {}: {}", self.name, err);
    }
    self.state = TrackState::Playing;
  }

  /// The active surface reached the end of its clip. Returns false when the
  /// notification arrives outside of normal playback (mount/unmount races,
  /// a swap already in flight) and must be ignored.
  pub fn finish_clip(&mut self) -> bool {
    if self.state != TrackState::Playing {
      return false;
    }
    self.state = TrackState::ClipEnding;
    self.pending = true;
    true
  }

  pub fn begin_swap(&mut self) {
    self.state = TrackState::Swapping;
  }

  /// The double-buffer handoff: the standby surface (already holding the
  /// next clip) restarts from zero and becomes active, while the former
  /// active surface starts preloading the clip two positions ahead.
  pub fn perform_swap(&mut self) {
    self.cursor.advance();

    {
      let standby = self.buffers.standby_mut();
      standby.set_position(0.0);
      if let Err(err) = standby.play() {
        trace!("Track {}: {}", self.name, err);
      }
    }
    self.buffers.swap_roles();

    let upcoming = self.cursor.next_index();
    let rate = self.rate;
    let muted = self.muted;
    let standby = self.buffers.standby_mut();
    standby.load(self.sequence.get_clip(upcoming));
    standby.set_rate(rate);
    standby.set_muted(muted);

    self.pending = false;
    self.state = TrackState::Playing;
  }

  pub fn pause_all(&mut self) {
    for surface in self.buffers.each_mut() {
      surface.pause();
    }
  }
}
