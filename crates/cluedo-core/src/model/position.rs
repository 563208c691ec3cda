use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four orthogonal cells exactly `radius` away. Callers filter out-of-bounds and wall cells.
    pub const fn neighbours(self, radius: i32) -> [Position; 4] {
        [
            Position::new(self.x, self.y - radius),
            Position::new(self.x + radius, self.y),
            Position::new(self.x, self.y + radius),
            Position::new(self.x - radius, self.y),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn neighbours_are_orthogonal() {
        let around = Position::new(3, 3).neighbours(1);
        assert!(around.contains(&Position::new(3, 2)));
        assert!(around.contains(&Position::new(4, 3)));
        assert!(around.contains(&Position::new(3, 4)));
        assert!(around.contains(&Position::new(2, 3)));
        assert!(!around.contains(&Position::new(4, 4)));
    }

    #[test]
    fn neighbours_respect_radius() {
        let around = Position::new(0, 0).neighbours(2);
        assert_eq!(
            around,
            [
                Position::new(0, -2),
                Position::new(2, 0),
                Position::new(0, 2),
                Position::new(-2, 0),
            ]
        );
    }
}
