//! Bot pursuit and aiming

use glam::Vec2;
use rand::Rng;

use super::grid::TileGrid;
use super::player::{Player, PlayerId, symmetric_jitter};
use super::projectile::Projectile;
use crate::aim_direction;
use crate::config::GameConfig;

/// Nearest living enemy of `me`; ties go to the earlier roster slot
pub fn nearest_enemy(players: &[Player], me: PlayerId) -> Option<PlayerId> {
    let me = players.get(me.0)?;
    let mut best: Option<(PlayerId, f32)> = None;
    for p in players.iter().filter(|p| p.alive && p.team != me.team) {
        let d = p.pos.distance(me.pos);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((p.id, d));
        }
    }
    best.map(|(id, _)| id)
}

/// One tick of bot behaviour: close in on the nearest enemy, then shoot with
/// imperfect aim once in range
///
/// Pursuit stops at `bot_engage_radius`. A class whose attack range is shorter
/// than that (the Knight with default tuning) parks just outside its own reach
/// and only swings at enemies that walk into it.
pub fn drive_bot(
    players: &mut [Player],
    me: PlayerId,
    dt: f32,
    grid: &TileGrid,
    config: &GameConfig,
    rng: &mut impl Rng,
    out: &mut Vec<Projectile>,
) {
    let Some(target_id) = nearest_enemy(players, me) else {
        return;
    };
    let target = players[target_id.0].pos;
    let Some(bot) = players.get_mut(me.0) else {
        return;
    };
    if !bot.alive {
        return;
    }

    let (dir, dist) = aim_direction(bot.pos, target);
    if dist > config.bot_engage_radius {
        bot.move_with_collision(dir * bot.speed * dt * config.bot_speed_factor, grid);
        bot.facing_left = dir.x < 0.0;
    }

    if bot.fire_timer <= 0.0 && dist < bot.attack_range {
        let jitter = config.bot_aim_jitter;
        let aim = target
            + Vec2::new(
                symmetric_jitter(rng, jitter),
                symmetric_jitter(rng, jitter),
            );
        bot.fire(aim, &config.classes, rng, out);
    }
}
