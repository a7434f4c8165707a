//! Fixture crate root.

use std::fmt;

/// A point in 2D space.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub struct Marker;

pub enum Shape {
    Circle { r: f64 },
    Square(f64),
}

pub trait Area {
    fn area(&self) -> f64;

    fn describe(&self) -> String {
        format!("area {}", self.area())
    }
}

impl Area for Shape {
    fn area(&self) -> f64 {
        match self {
            Shape::Circle { r } => 3.14 * r * r,
            Shape::Square(s) => s * s,
        }
    }
}

impl<'a> fmt::Display for Wrapper<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct Wrapper<'a>(&'a str);

mod inner {
    pub(crate) fn helper() -> char {
        let brace = '{';
        let raw = r#"fn fake() { "#;
        brace
    }
}

macro_rules! square {
    ($x:expr) => {
        $x * $x
    };
}
