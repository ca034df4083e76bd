use smart_leds::RGB8;

use super::game::board::{Board, BoardPhase, BOARD_SIZE, TILE_MAX};
use super::tilt::classifier::TiltState;

// RGB444 palette per tile value, expanded at draw time.
const TILE_COLORS: [u16; (TILE_MAX + 1) as usize] = [
    0x000, 0xE00, 0xE40, 0xCA0, 0x480, 0x041, 0x06A, 0x00F, 0x20C, 0x92C, 0xC88, 0xFFF,
];

const CALIBRATION_GLOW: RGB8 = RGB8 { r: 8, g: 8, b: 8 };
const GAME_OVER_BLINK_FRAMES: u8 = 8;

/// What the matrix currently shows. One variant per mode; the frame loop
/// picks the variant and the grid driver pulls every cell through
/// `pixel`.
pub enum Scene<'a> {
    Calibration { tilt: &'a TiltState },
    Game { board: &'a Board },
}

impl Scene<'_> {
    pub fn pixel(&self, x: i8, y: i8) -> RGB8 {
        match self {
            Scene::Calibration { tilt } => calibration_pixel(tilt, x, y),
            Scene::Game { board } => game_pixel(board, x, y),
        }
    }
}

/// Edge glow on the side the device is tilted toward, so holding the board
/// level during calibration has visible feedback.
fn calibration_pixel(tilt: &TiltState, x: i8, y: i8) -> RGB8 {
    let (raw_x, raw_y) = tilt.raw();
    let mut lit = false;
    if y > 0 && y < BOARD_SIZE - 1 {
        lit |= TiltState::engaged(raw_x) < 0 && x == 0;
        lit |= TiltState::engaged(raw_x) > 0 && x == BOARD_SIZE - 1;
    }
    if x > 0 && x < BOARD_SIZE - 1 {
        lit |= TiltState::engaged(raw_y) < 0 && y == 0;
        lit |= TiltState::engaged(raw_y) > 0 && y == BOARD_SIZE - 1;
    }
    if lit {
        CALIBRATION_GLOW
    } else {
        RGB8::default()
    }
}

fn game_pixel(board: &Board, x: i8, y: i8) -> RGB8 {
    let tile = board.tile(x, y);
    if !(0..=TILE_MAX as i8).contains(&tile) {
        return RGB8::default();
    }

    let color = TILE_COLORS[tile as usize];
    let mut white = 0u8;
    let mut dim = 0u8;

    if board.phase() == BoardPhase::Locked {
        // Everything but the best tile pulses dark on the end screen.
        let blink = board.blink() as i8;
        if tile as u8 != board.best_tile() && blink <= GAME_OVER_BLINK_FRAMES as i8 {
            dim = (5 - (4 - blink).abs()) as u8;
        }
    } else {
        if board.is_merged(x, y) {
            white = board.flash();
        }
        // Tile values take turns glowing slightly, lowest to highest.
        if tile as u8 == (board.blink() >> 1) + 1 && board.blink() & 1 == 0 {
            dim = 1;
        }
        if board.flash() & 1 == 1 && board.added_cell() == Some((x, y)) {
            dim = board.flash() >> 1;
        }
    }

    expand_rgb444(color, white, dim)
}

fn expand_rgb444(color: u16, white: u8, dim: u8) -> RGB8 {
    RGB8 {
        r: ((((color >> 7) & 0x1E) as u8) >> dim).saturating_add(white),
        g: ((((color >> 3) & 0x1E) as u8) >> dim).saturating_add(white),
        b: ((((color << 1) & 0x1E) as u8) >> dim).saturating_add(white),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_expansion_doubles_each_channel() {
        assert_eq!(
            expand_rgb444(0xFFF, 0, 0),
            RGB8 {
                r: 30,
                g: 30,
                b: 30
            }
        );
        assert_eq!(expand_rgb444(0xE00, 0, 0), RGB8 { r: 28, g: 0, b: 0 });
        assert_eq!(expand_rgb444(0x000, 0, 0), RGB8::default());
    }

    #[test]
    fn dimming_halves_and_white_adds_on_top() {
        let dimmed = expand_rgb444(0xE00, 0, 1);
        assert_eq!(dimmed.r, 14);

        let flashed = expand_rgb444(0x000, 6, 0);
        assert_eq!(
            flashed,
            RGB8 { r: 6, g: 6, b: 6 }
        );
    }
}
