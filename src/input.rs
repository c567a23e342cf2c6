use crate::constants::{PLAYER_VELOCITY, WIDTH};
use crate::entities::Player;

/// Controls sampled once per frame. Movement reflects keys currently held,
/// not key presses, so holding a direction keeps the player moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub quit: bool,
}

impl InputSnapshot {
    pub fn left() -> Self {
        InputSnapshot { left: true, ..Default::default() }
    }

    pub fn right() -> Self {
        InputSnapshot { right: true, ..Default::default() }
    }

    pub fn quit() -> Self {
        InputSnapshot { quit: true, ..Default::default() }
    }
}

/// Applies held directions to the player. Each direction moves only if the
/// whole step stays on screen; otherwise the player stays put for that
/// direction. Both directions held apply one after the other.
pub fn move_player(player: Player, keys: &InputSnapshot) -> Player {
    move_player_within(player, keys, WIDTH)
}

pub fn move_player_within(mut player: Player, keys: &InputSnapshot, screen_width: i32) -> Player {
    if keys.left && player.rect.x - PLAYER_VELOCITY >= 0 {
        player.rect.x -= PLAYER_VELOCITY;
    }
    if keys.right && player.rect.x + PLAYER_VELOCITY + player.rect.width <= screen_width {
        player.rect.x += PLAYER_VELOCITY;
    }
    player
}
