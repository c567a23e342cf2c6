use log::info;

use crate::entities::{Player, Star};

/// Moves every star one step down, drops the ones that left the bottom of the
/// screen and reports whether any of them hit the player.
///
/// Stars are visited in spawn order. The first hit removes that star and ends
/// the pass; stars after it are carried over without moving this frame.
pub fn advance(stars: Vec<Star>, player: &Player) -> (Vec<Star>, bool) {
    let mut surviving = Vec::with_capacity(stars.len());
    let mut pending = stars.into_iter();

    while let Some(mut star) = pending.next() {
        star.update();
        if star.is_below_screen() {
            continue;
        }
        if star.hits(player) {
            info!("Star at ({}, {}) hit the player at x = {}", star.rect.x, star.rect.y, player.x());
            surviving.extend(pending);
            return (surviving, true);
        }
        surviving.push(star);
    }

    (surviving, false)
}
