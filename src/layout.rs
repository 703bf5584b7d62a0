//! Layout tables - animations, directions and the packed sheet grid
//!
//! The LPC convention stores every animation as four direction rows
//! (up, left, down, right) of fixed-size frames. A packed sheet stacks one
//! such four-row block per selected animation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Standard LPC frame width in pixels
pub const FRAME_WIDTH: u32 = 64;

/// Standard LPC frame height in pixels
pub const FRAME_HEIGHT: u32 = 64;

/// Rows each animation occupies in a packed sheet (one per direction)
pub const ROWS_PER_ANIMATION: u32 = 4;

/// Largest accepted frame side in pixels
pub const MAX_FRAME_SIZE: u32 = 512;

/// An argument passed directly to the compositor or layout tables is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("unknown animation '{0}'")]
    UnknownAnimation(String),
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),
    #[error("frame {frame} is out of range for animation '{animation}' ({frame_count} frames)")]
    FrameOutOfRange { animation: Animation, frame: u32, frame_count: u32 },
}

/// Static description of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub frame_count: u32,
}

/// The fixed registry of LPC animations, in registry order.
pub const ANIMATIONS: [AnimationSpec; 11] = [
    AnimationSpec { id: "walk", name: "Walk", frame_count: 9 },
    AnimationSpec { id: "run", name: "Run", frame_count: 8 },
    AnimationSpec { id: "jump", name: "Jump", frame_count: 9 },
    AnimationSpec { id: "idle", name: "Idle", frame_count: 6 },
    AnimationSpec { id: "sit", name: "Sit", frame_count: 1 },
    AnimationSpec { id: "cast", name: "Cast Spell", frame_count: 7 },
    AnimationSpec { id: "slash", name: "Slash", frame_count: 6 },
    AnimationSpec { id: "thrust", name: "Thrust", frame_count: 8 },
    AnimationSpec { id: "shoot", name: "Shoot Bow", frame_count: 13 },
    AnimationSpec { id: "hurt", name: "Hurt", frame_count: 6 },
    AnimationSpec { id: "climb", name: "Climb", frame_count: 3 },
];

/// A registered animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    Walk,
    Run,
    Jump,
    Idle,
    Sit,
    Cast,
    Slash,
    Thrust,
    Shoot,
    Hurt,
    Climb,
}

impl Animation {
    /// All animations in registry order
    pub const ALL: [Animation; 11] = [
        Animation::Walk,
        Animation::Run,
        Animation::Jump,
        Animation::Idle,
        Animation::Sit,
        Animation::Cast,
        Animation::Slash,
        Animation::Thrust,
        Animation::Shoot,
        Animation::Hurt,
        Animation::Climb,
    ];

    /// Registry entry for this animation
    pub fn spec(self) -> &'static AnimationSpec {
        &ANIMATIONS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }

    /// Human-readable name ("Cast Spell", "Shoot Bow", ...)
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn frame_count(self) -> u32 {
        self.spec().frame_count
    }

    /// Look up an animation by its registry id.
    pub fn from_id(id: &str) -> Option<Animation> {
        Animation::ALL.into_iter().find(|a| a.id() == id)
    }

    /// Check that `frame` addresses a pose of this animation.
    pub fn check_frame(self, frame: u32) -> Result<(), InvalidArgument> {
        if frame < self.frame_count() {
            Ok(())
        } else {
            Err(InvalidArgument::FrameOutOfRange {
                animation: self,
                frame,
                frame_count: self.frame_count(),
            })
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Animation {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Animation::from_id(s).ok_or_else(|| InvalidArgument::UnknownAnimation(s.to_string()))
    }
}

/// Facing direction; the discriminant is the LPC row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Direction {
    /// All directions in declaration (row) order
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    pub fn id(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        }
    }

    /// Display name with compass point
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "Up (North)",
            Direction::Left => "Left (West)",
            Direction::Down => "Down (South)",
            Direction::Right => "Right (East)",
        }
    }

    /// Row index inside any per-layer LPC source sheet
    pub fn row(self) -> u32 {
        self as u32
    }

    /// Side view (left or right)
    pub fn is_profile(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Viewed from behind
    pub fn is_back(self) -> bool {
        self == Direction::Up
    }

    pub fn from_id(id: &str) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.id() == id)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Direction {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_id(s).ok_or_else(|| InvalidArgument::UnknownDirection(s.to_string()))
    }
}

/// One animation's four-row block inside a packed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationBlock {
    pub animation: Animation,
    /// Row of the block's first (up) direction
    pub first_row: u32,
}

impl AnimationBlock {
    /// Sheet row used for `direction` within this block
    pub fn row(&self, direction: Direction) -> u32 {
        self.first_row + direction.row()
    }
}

/// A single frame slot of a packed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub animation: Animation,
    pub direction: Direction,
    pub frame: u32,
    pub row: u32,
    /// Top-left pixel of the slot
    pub x: u32,
    pub y: u32,
}

/// Grid layout of a packed spritesheet.
///
/// Derived purely from the selection order and frame size; both the packer
/// and the metadata builder read rows from here so the image and its
/// description can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpritesheetLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub blocks: Vec<AnimationBlock>,
}

impl SpritesheetLayout {
    pub fn new(selected: &[Animation], frame_width: u32, frame_height: u32) -> Self {
        let mut row_cursor = 0;
        let blocks = selected
            .iter()
            .map(|&animation| {
                let block = AnimationBlock { animation, first_row: row_cursor };
                row_cursor += ROWS_PER_ANIMATION;
                block
            })
            .collect();

        Self { frame_width, frame_height, blocks }
    }

    /// Columns needed by the widest animation in the selection
    pub fn columns(&self) -> u32 {
        self.blocks.iter().map(|b| b.animation.frame_count()).max().unwrap_or(0)
    }

    pub fn rows(&self) -> u32 {
        self.blocks.len() as u32 * ROWS_PER_ANIMATION
    }

    /// Pixel width, or `None` if it does not fit the canvas coordinate space
    pub fn width(&self) -> Option<u32> {
        self.columns().checked_mul(self.frame_width).filter(|&w| w <= i32::MAX as u32)
    }

    /// Pixel height, or `None` if it does not fit the canvas coordinate space
    pub fn height(&self) -> Option<u32> {
        self.rows().checked_mul(self.frame_height).filter(|&h| h <= i32::MAX as u32)
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width()?, self.height()?))
    }

    /// Block for an animation, if it was selected
    pub fn block(&self, animation: Animation) -> Option<&AnimationBlock> {
        self.blocks.iter().find(|b| b.animation == animation)
    }

    /// Every frame slot in draw order: selection, then direction, then frame.
    ///
    /// Positions saturate when `dimensions()` is `None`.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocks.iter().flat_map(move |block| {
            Direction::ALL.into_iter().flat_map(move |direction| {
                let row = block.row(direction);
                (0..block.animation.frame_count()).map(move |frame| Cell {
                    animation: block.animation,
                    direction,
                    frame,
                    row,
                    x: frame.saturating_mul(self.frame_width),
                    y: row.saturating_mul(self.frame_height),
                })
            })
        })
    }
}
