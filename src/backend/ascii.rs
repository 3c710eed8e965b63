//! ASCII renderer for the simulated overview
//!
//! Draws every thumbnail of the active workspace as a box on a character
//! grid. The box style tells the window's role at a glance.

use crate::geometry::Rect;
use crate::window::WindowId;

/// ASCII grid dimensions
pub const DEFAULT_WIDTH: usize = 96;
pub const DEFAULT_HEIGHT: usize = 27;

/// Box drawing characters for different window states
mod box_chars {
    // Normal thumbnail (single line)
    pub const NORMAL: [char; 6] = ['┌', '┐', '└', '┘', '─', '│'];

    // Initial window of the selection (double line)
    pub const FOCUS: [char; 6] = ['╔', '╗', '╚', '╝', '═', '║'];

    // Highlighted thumbnail (heavy/thick)
    pub const HIGHLIGHT: [char; 6] = ['┏', '┓', '┗', '┛', '━', '┃'];
}

/// How a thumbnail is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BoxStyle {
    Normal,
    /// Carries the focus hint
    Focus,
    /// Highlighted by the keyboard selection, drawn on top
    Highlight,
}

impl BoxStyle {
    fn chars(self) -> [char; 6] {
        match self {
            BoxStyle::Normal => box_chars::NORMAL,
            BoxStyle::Focus => box_chars::FOCUS,
            BoxStyle::Highlight => box_chars::HIGHLIGHT,
        }
    }
}

/// Thumbnail state for rendering
#[derive(Debug, Clone)]
pub struct AsciiWindow {
    pub id: WindowId,
    pub bounds: Rect,
    pub style: BoxStyle,
}

/// Character grid renderer
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    grid: Vec<Vec<char>>,
    /// Scale factor for converting stage coordinates to the grid
    scale_x: f64,
    scale_y: f64,
}

impl AsciiRenderer {
    /// Create a renderer mapping a stage of `stage_width` x `stage_height`
    /// onto a grid of `width` x `height` characters
    pub fn new(width: usize, height: usize, stage_width: f64, stage_height: f64) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        Self {
            width,
            height,
            grid: vec![vec![' '; width]; height],
            scale_x: width as f64 / stage_width.max(1.0),
            scale_y: height as f64 / stage_height.max(1.0),
        }
    }

    /// Get the width of the ASCII grid
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the ASCII grid
    pub fn height(&self) -> usize {
        self.height
    }

    /// Convert stage coordinates to grid coordinates
    fn to_grid_coords(&self, x: f64, y: f64) -> (usize, usize) {
        let gx = (x * self.scale_x).max(0.0) as usize;
        let gy = (y * self.scale_y).max(0.0) as usize;
        (gx.min(self.width - 1), gy.min(self.height - 1))
    }

    /// Convert a stage rectangle to grid corners
    fn to_grid_rect(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let (x1, y1) = self.to_grid_coords(rect.left(), rect.top());
        let (x2, y2) = self.to_grid_coords(rect.right(), rect.bottom());
        (x1, y1, x2, y2)
    }

    fn clear_grid(&mut self) {
        for row in &mut self.grid {
            row.fill(' ');
        }
    }

    /// Draw a box on the grid
    fn draw_box(&mut self, (x1, y1, x2, y2): (usize, usize, usize, usize), style: BoxStyle) {
        if x2 <= x1 || y2 <= y1 {
            return;
        }
        let [tl, tr, bl, br, h, v] = style.chars();

        self.grid[y1][x1] = tl;
        self.grid[y1][x2] = tr;
        self.grid[y2][x1] = bl;
        self.grid[y2][x2] = br;
        for x in (x1 + 1)..x2 {
            self.grid[y1][x] = h;
            self.grid[y2][x] = h;
        }
        for y in (y1 + 1)..y2 {
            self.grid[y][x1] = v;
            self.grid[y][x2] = v;
        }
    }

    /// Draw a thumbnail with its id in the top-left corner
    fn draw_window(&mut self, window: &AsciiWindow) {
        let corners = self.to_grid_rect(window.bounds);
        let (x1, y1, x2, y2) = corners;
        // Clear the interior so overlapping zoomed thumbnails stay readable
        for row in self.grid.iter_mut().take(y2).skip(y1 + 1) {
            for cell in row.iter_mut().take(x2).skip(x1 + 1) {
                *cell = ' ';
            }
        }
        self.draw_box(corners, window.style);

        if y1 + 1 < y2 && x1 + 2 < x2 {
            let label = match window.style {
                BoxStyle::Highlight => format!("{} [*]", window.id.get()),
                BoxStyle::Focus => format!("{} [F]", window.id.get()),
                BoxStyle::Normal => window.id.get().to_string(),
            };
            for (x, ch) in (x1 + 2..x2).zip(label.chars()) {
                self.grid[y1 + 1][x] = ch;
            }
        }
    }

    /// Render thumbnails below a header line
    pub fn render(&mut self, header: &str, windows: &[AsciiWindow]) -> String {
        profiling::scope!("ascii_render");
        self.clear_grid();

        let mut windows: Vec<&AsciiWindow> = windows.iter().collect();
        windows.sort_by_key(|window| window.style);
        for window in windows {
            self.draw_window(window);
        }

        let mut output = String::with_capacity((self.width + 1) * (self.height + 1));
        output.push_str(header);
        output.push('\n');
        for row in &self.grid {
            output.extend(row.iter());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(raw: u64, bounds: Rect, style: BoxStyle) -> AsciiWindow {
        AsciiWindow {
            id: WindowId::from_raw(raw).unwrap(),
            bounds,
            style,
        }
    }

    #[test]
    fn styles_use_distinct_borders() {
        let mut renderer = AsciiRenderer::new(40, 10, 400.0, 100.0);
        let output = renderer.render(
            "Workspace 1/1",
            &[
                window(1, Rect::new(0.0, 0.0, 100.0, 50.0), BoxStyle::Normal),
                window(2, Rect::new(150.0, 0.0, 100.0, 50.0), BoxStyle::Focus),
                window(3, Rect::new(300.0, 0.0, 90.0, 50.0), BoxStyle::Highlight),
            ],
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Workspace 1/1");
        assert_eq!(lines.len(), 11);
        assert!(lines[1].contains('┌'));
        assert!(lines[1].contains('╔'));
        assert!(lines[1].contains('┏'));
        assert!(output.contains("2 [F]"));
        assert!(output.contains("3 [*]"));
    }

    #[test]
    fn highlight_is_drawn_over_neighbors() {
        let mut renderer = AsciiRenderer::new(20, 10, 200.0, 100.0);
        let output = renderer.render(
            "",
            &[
                window(2, Rect::new(20.0, 20.0, 150.0, 60.0), BoxStyle::Highlight),
                window(1, Rect::new(0.0, 0.0, 100.0, 50.0), BoxStyle::Normal),
            ],
        );
        assert!(output.contains("2 [*]"));
        assert!(output.lines().nth(1).unwrap().starts_with('┌'));
        assert!(output.lines().nth(3).unwrap().contains('┏'));
    }

    #[test]
    fn out_of_stage_rects_are_clamped() {
        let mut renderer = AsciiRenderer::new(10, 5, 100.0, 50.0);
        let output = renderer.render(
            "",
            &[window(1, Rect::new(-50.0, -50.0, 500.0, 500.0), BoxStyle::Normal)],
        );
        assert_eq!(output.lines().count(), 6);
        assert!(output.lines().all(|line| line.chars().count() <= 10));
    }
}
