//!
//! Line and circle rasterization on top of the framebuffer
//!
//! Both algorithms are the classic incremental integer variants (Bresenham line,
//! midpoint circle). Clipping is handled one pixel at a time by the framebuffer's
//! clipped setter: a point past the screen edge is dropped and the walk simply
//! continues, so shapes that are only partially on screen render their visible
//! part.
//!

use crate::framebuffer::{Framebuffer, Rotation};

impl Framebuffer {
    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's line algorithm
    ///
    /// `on` selects whether the line sets or clears pixels. Points outside the
    /// frame are clipped individually; the line itself always runs to completion.
    pub fn draw_line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, on: bool) {
        let (mut x, mut y) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x1 as i32, y1 as i32);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel_clipped(x, y, on, Rotation::Deg0);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a circle around (xc, yc) using the midpoint circle algorithm
    ///
    /// The center is signed and may lie outside the frame so that the visible arc
    /// of a large circle still renders; every one of the 8 symmetric points per
    /// step is clipped on its own. A radius of 0 plots the single center point.
    pub fn draw_circle(&mut self, xc: i16, yc: i16, radius: u16) {
        let (xc, yc) = (xc as i32, yc as i32);
        let r = radius as i32;

        let mut x = 0;
        let mut y = r;
        let mut d = 3 - 2 * r;
        while x <= y {
            self.plot_circle_points(xc, yc, x, y);
            if d < 0 {
                d += 4 * x + 6;
            } else {
                d += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }

    /// Plot the 8 symmetric reflections of the circle offset (x, y) around (xc, yc)
    fn plot_circle_points(&mut self, xc: i32, yc: i32, x: i32, y: i32) {
        self.set_pixel_clipped(xc + x, yc + y, true, Rotation::Deg0);
        self.set_pixel_clipped(xc - x, yc + y, true, Rotation::Deg0);
        self.set_pixel_clipped(xc + x, yc - y, true, Rotation::Deg0);
        self.set_pixel_clipped(xc - x, yc - y, true, Rotation::Deg0);
        self.set_pixel_clipped(xc + y, yc + x, true, Rotation::Deg0);
        self.set_pixel_clipped(xc - y, yc + x, true, Rotation::Deg0);
        self.set_pixel_clipped(xc + y, yc - x, true, Rotation::Deg0);
        self.set_pixel_clipped(xc - y, yc - x, true, Rotation::Deg0);
    }
}

#[cfg(test)]
mod test {
    use crate::errors::ErrorSink;
    use crate::framebuffer::Framebuffer;

    fn framebuffer(width: u8, height: u8) -> Framebuffer {
        Framebuffer::new(width, height, ErrorSink::new()).unwrap()
    }

    fn set_pixels(fb: &Framebuffer) -> Vec<(usize, usize)> {
        let (w, h) = fb.get_size();
        let mut pixels = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if fb.get_pixel(x, y) == 1 {
                    pixels.push((x, y));
                }
            }
        }
        pixels
    }

    #[test]
    fn test_horizontal_line_sets_exactly_width_pixels() {
        let mut fb = framebuffer(128, 64);
        fb.draw_line(0, 0, 127, 0, true);

        let pixels = set_pixels(&fb);
        assert_eq!(pixels.len(), 128);
        assert!(pixels.iter().all(|(_, y)| *y == 0));
    }

    #[test]
    fn test_degenerate_line_sets_one_pixel() {
        let mut fb = framebuffer(64, 32);
        fb.draw_line(10, 10, 10, 10, true);
        assert_eq!(set_pixels(&fb), vec![(10, 10)]);
    }

    #[test]
    fn test_line_hits_both_endpoints() {
        let mut fb = framebuffer(64, 32);
        fb.draw_line(3, 5, 40, 20, true);
        assert_eq!(fb.get_pixel(3, 5), 1);
        assert_eq!(fb.get_pixel(40, 20), 1);
    }

    #[test]
    fn test_line_clears_pixels_when_off() {
        let mut fb = framebuffer(64, 32);
        fb.draw_line(0, 4, 63, 4, true);
        fb.draw_line(0, 4, 63, 4, false);
        assert!(set_pixels(&fb).is_empty());
    }

    #[test]
    fn test_line_past_the_edge_is_clipped() {
        let mut fb = framebuffer(64, 32);
        // y runs out of the frame halfway through; only the visible part renders
        fb.draw_line(0, 16, 63, 48, true);

        let pixels = set_pixels(&fb);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|(x, y)| *x < 64 && *y < 32));
        assert_eq!(fb.get_pixel(0, 16), 1);
    }

    #[test]
    fn test_circle_radius_tolerance_and_symmetry() {
        let mut fb = framebuffer(128, 64);
        let (xc, yc, r) = (64i32, 32i32, 14i32);
        fb.draw_circle(xc as i16, yc as i16, r as u16);

        let pixels = set_pixels(&fb);
        assert!(!pixels.is_empty());
        for (x, y) in &pixels {
            let dx = *x as i32 - xc;
            let dy = *y as i32 - yc;
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            // discretization puts every plotted point within one pixel of the ideal arc
            assert!(
                (dist - r as f64).abs() <= 1.0,
                "({}, {}) is {} pixels from the center",
                x,
                y,
                dist
            );
        }

        // the plotted set is closed under the 8-way reflection group
        let set: std::collections::HashSet<(i32, i32)> = pixels
            .iter()
            .map(|(x, y)| (*x as i32 - xc, *y as i32 - yc))
            .collect();
        for (dx, dy) in &set {
            for (rx, ry) in [
                (-dx, *dy),
                (*dx, -dy),
                (-dx, -dy),
                (*dy, *dx),
                (-dy, *dx),
                (*dy, -dx),
                (-dy, -dx),
            ] {
                assert!(set.contains(&(rx, ry)));
            }
        }
    }

    #[test]
    fn test_circle_with_radius_0_plots_the_center() {
        let mut fb = framebuffer(64, 32);
        fb.draw_circle(20, 10, 0);
        assert_eq!(set_pixels(&fb), vec![(20, 10)]);
    }

    #[test]
    fn test_circle_with_off_screen_center_renders_visible_arc() {
        let mut fb = framebuffer(64, 32);
        fb.draw_circle(-5, -5, 20);

        let pixels = set_pixels(&fb);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|(x, y)| *x < 64 && *y < 32));
    }
}
