use failure::Fail;

use crate::time::Seconds;

///! A clip is identified by its configured asset name
pub type ClipId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
  Active,
  Standby,
}

#[derive(Debug, Fail)]
pub enum PlaybackError {
  #[fail(display = "Playback start rejected by the host: {}", cause)]
  StartRejected { cause: String },
}

/// A playback sink owned by a track. The host media layer implements this
/// for its media elements and reports `ready`/`ended` notifications back to
/// the engine through `LoopEngine::on_surface_ready` and
/// `LoopEngine::on_clip_ended`.
pub trait PlaybackSurface {
  /// Start fetching a clip into this surface. Resets readiness and position.
  fn load(&mut self, clip: &str);

  fn set_rate(&mut self, rate: f64);

  fn set_muted(&mut self, muted: bool);

  fn set_position(&mut self, position: Seconds);

  fn get_position(&self) -> Seconds;

  /// Begin playback. The host may reject the request (ex. autoplay policy);
  /// the engine swallows the error and relies on the next natural trigger.
  fn play(&mut self) -> Result<(), PlaybackError>;

  fn pause(&mut self);

  fn is_playing(&self) -> bool;

  /// Whether the current frame is decodable (HAVE_CURRENT_DATA or better).
  fn has_current_data(&self) -> bool;
}
