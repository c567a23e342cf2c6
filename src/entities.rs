use crate::constants::*;
use crate::types::Rect;
use crate::rendering::GameGrid;

// --- Player: pinned to the bottom edge, moves horizontally only ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub rect: Rect,
}

impl Player {
    pub fn new(x: i32) -> Self {
        Player {
            rect: Rect::new(x, HEIGHT - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    pub fn x(&self) -> i32 {
        self.rect.x
    }

    pub fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.fill_world_rect(&self.rect, PLAYER_CHAR);
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new(PLAYER_START_X)
    }
}

// --- Star: falls straight down from where it spawned ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Star {
    pub rect: Rect,
}

impl Star {
    /// New star fully hidden above the top edge.
    pub fn new(x: i32) -> Self {
        Star {
            rect: Rect::new(x, -STAR_HEIGHT, STAR_WIDTH, STAR_HEIGHT),
        }
    }

    pub fn update(&mut self) {
        self.rect.y += STAR_VELOCITY;
    }

    pub fn is_below_screen(&self) -> bool {
        self.rect.y > HEIGHT
    }

    /// A hit needs the star's bottom edge to have reached the player's top
    /// edge and the boxes to overlap.
    pub fn hits(&self, player: &Player) -> bool {
        self.rect.bottom() >= player.rect.y && self.rect.collides_with(&player.rect)
    }

    pub fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.fill_world_rect(&self.rect, STAR_CHAR);
    }
}

#[cfg(test)]
impl Star {
    pub fn at(x: i32, y: i32) -> Self {
        Star {
            rect: Rect::new(x, y, STAR_WIDTH, STAR_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_sits_on_the_bottom_edge() {
        let player = Player::default();
        assert_eq!(player.rect.bottom(), HEIGHT);
        assert_eq!(player.x(), PLAYER_START_X);
    }

    #[test]
    fn new_star_is_fully_off_screen() {
        let star = Star::new(123);
        assert_eq!(star.rect.bottom(), 0);
        assert_eq!(star.rect.x, 123);
    }

    #[test]
    fn star_falls_at_constant_velocity() {
        let mut star = Star::at(10, 100);
        star.update();
        star.update();
        assert_eq!(star.rect.y, 100 + 2 * STAR_VELOCITY);
        assert_eq!(star.rect.x, 10);
    }

    #[test]
    fn star_above_the_player_does_not_hit() {
        let player = Player::new(100);
        let star = Star::at(110, player.rect.y - STAR_HEIGHT - 1);
        assert!(!star.hits(&player));
    }

    #[test]
    fn star_beside_the_player_does_not_hit() {
        let player = Player::new(100);
        let star = Star::at(100 + PLAYER_WIDTH, player.rect.y + 5);
        assert!(!star.hits(&player));
    }

    #[test]
    fn star_inside_the_player_hits() {
        let player = Player::new(100);
        let star = Star::at(110, player.rect.y + 5);
        assert!(star.hits(&player));
    }
}
