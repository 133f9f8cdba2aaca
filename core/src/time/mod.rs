pub mod clock;

pub use self::clock::ClockTime;

pub type Seconds = f64;
