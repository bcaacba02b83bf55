/// Color representation for wheel elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// A single drawing operation against a 2D surface.
///
/// Coordinates are in the current user space: `Translate`/`Rotate`
/// change it, `Save`/`Restore` push and pop it.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// Angles in radians, swept in increasing direction (y-down, so visually clockwise).
    StrokeArc {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        line_width: f64,
        color: Color,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    StrokeLine {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        line_width: f64,
        color: Color,
    },
    FillPolygon {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    /// Text centered on (x, y)
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f32,
        color: Color,
    },
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Rotate(f64),
}

/// Ordered list of draw commands produced by one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
