//! Playback timing helpers for animation previews

use crate::layout::Animation;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Shortest frame time accepted for playback, in milliseconds
pub const MIN_FRAME_MS: u32 = 50;

/// Longest frame time accepted for playback, in milliseconds
pub const MAX_FRAME_MS: u32 = 2000;

/// Named playback speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimingPreset {
    VerySlow,
    Slow,
    #[default]
    Normal,
    Fast,
    VeryFast,
}

impl TimingPreset {
    pub const ALL: [TimingPreset; 5] =
        [TimingPreset::VerySlow, TimingPreset::Slow, TimingPreset::Normal, TimingPreset::Fast, TimingPreset::VeryFast];

    /// Milliseconds per frame
    pub fn frame_ms(self) -> u32 {
        match self {
            TimingPreset::VerySlow => 500,
            TimingPreset::Slow => 300,
            TimingPreset::Normal => 200,
            TimingPreset::Fast => 150,
            TimingPreset::VeryFast => 100,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            TimingPreset::VerySlow => "very-slow",
            TimingPreset::Slow => "slow",
            TimingPreset::Normal => "normal",
            TimingPreset::Fast => "fast",
            TimingPreset::VeryFast => "very-fast",
        }
    }
}

impl fmt::Display for TimingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TimingPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        TimingPreset::ALL
            .into_iter()
            .find(|p| p.id() == normalized)
            .ok_or_else(|| format!("unknown timing preset '{}'", s))
    }
}

/// Frames per second for a frame time, rounded; `None` for zero.
pub fn ms_to_fps(ms: u32) -> Option<u32> {
    (ms > 0).then(|| (1000.0 / ms as f64).round() as u32)
}

/// Frame time in milliseconds for a frame rate, rounded; `None` for zero.
pub fn fps_to_ms(fps: u32) -> Option<u32> {
    (fps > 0).then(|| (1000.0 / fps as f64).round() as u32)
}

pub fn is_valid_timing(ms: u32) -> bool {
    (MIN_FRAME_MS..=MAX_FRAME_MS).contains(&ms)
}

/// Length of one full cycle
pub fn animation_duration(frame_count: u32, frame_ms: u32) -> Duration {
    Duration::from_millis(frame_count as u64 * frame_ms as u64)
}

/// Suggested frame time: short cycles play slower, long ones faster.
pub fn recommended_frame_ms(frame_count: u32) -> u32 {
    match frame_count {
        0..=3 => 150,
        10.. => 100,
        _ => 200,
    }
}

/// Frame indices for one loop.
///
/// Ping-pong appends the interior frames in reverse so the end points are
/// not shown twice in a row; it has no effect with two frames or fewer.
///
/// ```
/// use lpc_spritegen::timing::frame_sequence;
///
/// assert_eq!(frame_sequence(4, false), vec![0, 1, 2, 3]);
/// assert_eq!(frame_sequence(4, true), vec![0, 1, 2, 3, 2, 1]);
/// ```
pub fn frame_sequence(frame_count: u32, ping_pong: bool) -> Vec<u32> {
    let mut frames: Vec<u32> = (0..frame_count).collect();
    if ping_pong && frame_count > 2 {
        frames.extend((1..frame_count - 1).rev());
    }
    frames
}

/// True when `count` matches the registered frame count of `animation`.
pub fn validate_frame_count(animation: Animation, count: u32) -> bool {
    animation.frame_count() == count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(TimingPreset::default().frame_ms(), 200);
        assert_eq!("very_slow".parse::<TimingPreset>().unwrap(), TimingPreset::VerySlow);
        assert_eq!("Fast".parse::<TimingPreset>().unwrap().frame_ms(), 150);
        assert!("warp".parse::<TimingPreset>().is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(ms_to_fps(200), Some(5));
        assert_eq!(ms_to_fps(150), Some(7));
        assert_eq!(fps_to_ms(60), Some(17));
        assert_eq!(ms_to_fps(0), None);
        assert_eq!(fps_to_ms(0), None);
    }

    #[test]
    fn test_valid_timing_bounds() {
        assert!(!is_valid_timing(49));
        assert!(is_valid_timing(50));
        assert!(is_valid_timing(2000));
        assert!(!is_valid_timing(2001));
    }

    #[test]
    fn test_frame_sequence() {
        assert_eq!(frame_sequence(0, true), Vec::<u32>::new());
        assert_eq!(frame_sequence(2, true), vec![0, 1]);
        assert_eq!(frame_sequence(3, true), vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_duration_and_recommendation() {
        assert_eq!(animation_duration(9, 200), Duration::from_millis(1800));
        assert_eq!(recommended_frame_ms(Animation::Climb.frame_count()), 150);
        assert_eq!(recommended_frame_ms(Animation::Walk.frame_count()), 200);
        assert_eq!(recommended_frame_ms(Animation::Shoot.frame_count()), 100);
    }

    #[test]
    fn test_validate_frame_count() {
        assert!(validate_frame_count(Animation::Walk, 9));
        assert!(!validate_frame_count(Animation::Walk, 8));
    }
}
