use std::fmt;

/// Fixed drawing surface of one diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgCanvas {
    pub width: f64,
    pub height: f64,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn cell_width(&self) -> f64 {
        self.width / super::chromosome::GRID_COLUMNS as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.height / super::chromosome::GRID_ROWS as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Transform {
    #[default]
    Identity,
    Translate(f64, f64),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => Ok(()),
            Transform::Translate(dx, dy) => write!(f, "translate({:.2},{:.2})", dx, dy),
        }
    }
}

/// Rectangle occupied by a rendered entity, in the coordinate frame of its
/// transform.
///
/// Heights may be negative: an association line bending upwards occupies a
/// region that extends above its starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub transform: Transform,
    pub z_index: i32,
}

impl SvgArea {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            transform: Transform::Identity,
            z_index: 0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}
