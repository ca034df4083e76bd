use smart_leds::{brightness, RGB8, SmartLedsWrite};

pub const GRID_SIZE: usize = 4;
pub const PIXEL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Framebuffer over a serpentine WS2812 chain. The chain snakes through the
/// grid with even rows reversed; callers always address logical `(x, y)`.
pub struct PixelGrid<S> {
    strip: S,
    frame: [RGB8; PIXEL_COUNT],
    brightness: u8,
}

impl<S> PixelGrid<S>
where
    S: SmartLedsWrite,
    S::Color: From<RGB8>,
{
    pub fn new(strip: S, brightness_level: u8) -> Self {
        Self {
            strip,
            frame: [RGB8::default(); PIXEL_COUNT],
            brightness: brightness_level,
        }
    }

    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn fill_with(&mut self, mut pixel_at: impl FnMut(i8, i8) -> RGB8) {
        for (index, slot) in self.frame.iter_mut().enumerate() {
            let (x, y) = grid_position(index);
            *slot = pixel_at(x as i8, y as i8);
        }
    }

    pub fn show(&mut self) -> Result<(), S::Error> {
        self.strip
            .write(brightness(self.frame.iter().copied(), self.brightness))
    }
}

fn grid_position(chain_index: usize) -> (usize, usize) {
    let y = chain_index / GRID_SIZE;
    let mut x = chain_index % GRID_SIZE;
    if y % 2 == 0 {
        x = GRID_SIZE - 1 - x;
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serpentine_reverses_even_rows() {
        assert_eq!(grid_position(0), (3, 0));
        assert_eq!(grid_position(3), (0, 0));
        assert_eq!(grid_position(4), (0, 1));
        assert_eq!(grid_position(7), (3, 1));
        assert_eq!(grid_position(8), (3, 2));
    }

    #[test]
    fn every_cell_is_addressed_once() {
        let mut seen = [false; PIXEL_COUNT];
        for index in 0..PIXEL_COUNT {
            let (x, y) = grid_position(index);
            let cell = y * GRID_SIZE + x;
            assert!(!seen[cell], "cell ({x},{y}) mapped twice");
            seen[cell] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }
}
