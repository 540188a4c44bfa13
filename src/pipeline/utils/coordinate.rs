use std::fmt;
use serde::Deserialize;

/// 2D pixel coordinate as reported by the analysis capability.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coord2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Coord2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let coord = Coord2D { x: 169.5, y: 213.0 };
        assert_eq!(coord.to_string(), "(169.5, 213)");
    }

    #[test]
    fn test_deserialize() {
        let coord: Coord2D = serde_json::from_str(r#"{"x": 10.0, "y": 20.5}"#).unwrap();
        assert_eq!(coord, Coord2D { x: 10.0, y: 20.5 });
    }
}
