use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncorrectTriangleSides {
    #[error("All sides must be positive")]
    NonPositive,
    #[error("The sum of any two sides must be greater than the third")]
    Inequality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangleKind {
    Equilateral,
    Isosceles,
    Scalene,
}

impl fmt::Display for TriangleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriangleKind::Equilateral => "equilateral",
            TriangleKind::Isosceles => "isosceles",
            TriangleKind::Scalene => "nonequilateral",
        };
        f.write_str(name)
    }
}

fn validate(a: f64, b: f64, c: f64) -> Result<(), IncorrectTriangleSides> {
    if !(a > 0.0 && b > 0.0 && c > 0.0) {
        return Err(IncorrectTriangleSides::NonPositive);
    }
    if a + b <= c || a + c <= b || b + c <= a {
        return Err(IncorrectTriangleSides::Inequality);
    }
    Ok(())
}

/// Classifies a triangle by its sides.
///
/// ```
/// use coursework::triangle::{TriangleKind, triangle_type};
///
/// assert_eq!(triangle_type(5.0, 6.0, 5.0), Ok(TriangleKind::Isosceles));
/// assert!(triangle_type(1.0, 2.0, 3.0).is_err());
/// ```
pub fn triangle_type(a: f64, b: f64, c: f64) -> Result<TriangleKind, IncorrectTriangleSides> {
    validate(a, b, c)?;

    let kind = if a == b && b == c {
        TriangleKind::Equilateral
    } else if a == b || a == c || b == c {
        TriangleKind::Isosceles
    } else {
        TriangleKind::Scalene
    };
    Ok(kind)
}

/// A triangle whose sides are known to be valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, IncorrectTriangleSides> {
        validate(a, b, c)?;
        Ok(Self { a, b, c })
    }

    pub fn kind(&self) -> TriangleKind {
        // Sides were validated on construction.
        triangle_type(self.a, self.b, self.c).unwrap_or(TriangleKind::Scalene)
    }

    pub fn perimeter(&self) -> f64 {
        self.a + self.b + self.c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_equal_sides() {
        assert_eq!(triangle_type(5.0, 5.0, 5.0), Ok(TriangleKind::Equilateral));
        assert_eq!(triangle_type(3.0, 4.0, 5.0), Ok(TriangleKind::Scalene));
    }

    #[test]
    fn isosceles_regardless_of_order() {
        for (a, b, c) in [(5.0, 5.0, 6.0), (5.0, 6.0, 5.0), (6.0, 5.0, 5.0)] {
            assert_eq!(triangle_type(a, b, c), Ok(TriangleKind::Isosceles));
        }
    }

    #[test]
    fn rejects_non_positive_sides() {
        assert_eq!(
            triangle_type(-1.0, 2.0, 3.0),
            Err(IncorrectTriangleSides::NonPositive)
        );
        assert_eq!(
            triangle_type(0.0, 0.0, 0.0),
            Err(IncorrectTriangleSides::NonPositive)
        );
        assert_eq!(
            Triangle::new(f64::NAN, 1.0, 1.0),
            Err(IncorrectTriangleSides::NonPositive)
        );
    }

    #[test]
    fn rejects_degenerate_triangles() {
        for (a, b, c) in [(1.0, 2.0, 3.0), (3.0, 1.0, 2.0), (2.0, 3.0, 1.0)] {
            assert_eq!(triangle_type(a, b, c), Err(IncorrectTriangleSides::Inequality));
        }
    }

    #[test]
    fn triangle_value_reports_kind_and_perimeter() {
        let triangle = Triangle::new(3.0, 4.0, 5.0).unwrap();
        assert_eq!(triangle.kind(), TriangleKind::Scalene);
        assert_eq!(triangle.perimeter(), 12.0);
        assert_eq!(triangle.kind().to_string(), "nonequilateral");
    }
}
