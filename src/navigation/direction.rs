//! Grid position and facing.

/// Robot facing. Ordinals increase clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in clockwise order, starting at `Up`.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Ordinal in `0..4`.
    #[inline]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Direction for an ordinal, wrapping modulo 4.
    #[inline]
    pub fn from_ordinal(ordinal: usize) -> Self {
        Self::CLOCKWISE[ordinal % 4]
    }

    /// Facing after one right turn.
    #[inline]
    pub fn turned_right(self) -> Self {
        Self::from_ordinal(self.ordinal() as usize + 1)
    }

    /// Right turns needed to face `target` (0..=3).
    #[inline]
    pub fn right_turns_to(self, target: Direction) -> u8 {
        (target.ordinal() + 4 - self.ordinal()) % 4
    }

    /// Facing implied by a move from `from` to `to`.
    ///
    /// The x axis wins if both changed; `None` if neither did.
    pub fn from_displacement(from: Position, to: Position) -> Option<Self> {
        if to.x > from.x {
            Some(Direction::Right)
        } else if to.x < from.x {
            Some(Direction::Left)
        } else if to.y > from.y {
            Some(Direction::Up)
        } else if to.y < from.y {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Grid coordinates as reported by the robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check whether either coordinate lies beyond `radius` from the origin.
    pub fn outside(&self, radius: i32) -> bool {
        self.x.abs() > radius || self.y.abs() > radius
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
