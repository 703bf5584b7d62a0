//! Per-frame pixel nudges for placeholder frames
//!
//! Real LPC art carries its own motion, but placeholder geometry is the
//! same picture for every frame. These tables bob, lift and recoil it so a
//! placeholder sheet still reads as an animation.

use crate::layout::{Animation, Direction};
use serde::Serialize;

/// Pixel displacement applied to a placeholder frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameOffset {
    pub x: i32,
    pub y: i32,
}

const fn o(x: i32, y: i32) -> FrameOffset {
    FrameOffset { x, y }
}

const WALK: [FrameOffset; 9] =
    [o(0, 0), o(1, 0), o(0, 1), o(-1, 0), o(0, 0), o(-1, 0), o(0, 1), o(1, 0), o(0, 0)];
const RUN: [FrameOffset; 8] =
    [o(0, -1), o(2, -1), o(0, 0), o(-2, -1), o(0, -1), o(-2, -1), o(0, 0), o(2, -1)];
const JUMP: [FrameOffset; 9] =
    [o(0, 0), o(0, -2), o(0, -4), o(0, -6), o(0, -6), o(0, -4), o(0, -2), o(0, 0), o(0, 0)];
const IDLE: [FrameOffset; 6] = [o(0, 0), o(0, 1), o(0, 0), o(0, 1), o(0, 0), o(0, 1)];
const SIT: [FrameOffset; 1] = [o(0, 4)];
const CAST: [FrameOffset; 7] = [o(0, 0), o(0, -1), o(0, -2), o(0, -2), o(0, -1), o(0, 0), o(0, 0)];
const SLASH: [FrameOffset; 6] = [o(0, 0), o(1, -1), o(2, -2), o(1, -1), o(0, 0), o(0, 0)];
const THRUST: [FrameOffset; 8] =
    [o(0, 0), o(0, -1), o(0, -2), o(0, -3), o(0, -2), o(0, -1), o(0, 0), o(0, 0)];
const SHOOT: [FrameOffset; 13] = [
    o(0, 0),
    o(0, 0),
    o(0, 0),
    o(0, 0),
    o(0, 0),
    o(0, -1),
    o(0, -1),
    o(0, -1),
    o(0, 0),
    o(0, 0),
    o(0, 0),
    o(0, 0),
    o(0, 0),
];
const HURT: [FrameOffset; 6] = [o(-2, 1), o(-1, 0), o(0, -1), o(1, 0), o(0, 1), o(0, 0)];
const CLIMB: [FrameOffset; 3] = [o(0, 0), o(0, -1), o(0, -2)];

/// The offset cycle for an animation
pub fn offset_table(animation: Animation) -> &'static [FrameOffset] {
    match animation {
        Animation::Walk => &WALK,
        Animation::Run => &RUN,
        Animation::Jump => &JUMP,
        Animation::Idle => &IDLE,
        Animation::Sit => &SIT,
        Animation::Cast => &CAST,
        Animation::Slash => &SLASH,
        Animation::Thrust => &THRUST,
        Animation::Shoot => &SHOOT,
        Animation::Hurt => &HURT,
        Animation::Climb => &CLIMB,
    }
}

/// Offset for a placeholder frame.
///
/// Indices past the end of the table wrap around. The direction is accepted
/// for symmetry with the compositor; no table currently varies by facing.
pub fn frame_offset(animation: Animation, frame: u32, _direction: Direction) -> FrameOffset {
    let table = offset_table(animation);
    table.get(frame as usize % table.len()).copied().unwrap_or_default()
}

/// Offset lookup by animation id; unknown ids give a zero offset.
pub fn frame_offset_for_id(animation_id: &str, frame: u32, direction: Direction) -> FrameOffset {
    match Animation::from_id(animation_id) {
        Some(animation) => frame_offset(animation, frame, direction),
        None => FrameOffset::default(),
    }
}
