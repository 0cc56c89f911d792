//! Попарные RPS столкновения снарядов
//!
//! Обход пар (i < j) по возрастанию id. Помеченный снаряд больше не
//! участвует ни в одной паре этого тика (без двойного разрешения).

use std::collections::BTreeSet;

use super::projectile::{ProjectileId, Projectiles};
use super::spells::{resolve_clash, ClashOutcome};

/// Пометить проигравших в столкновениях
///
/// `self_clash = false` — снаряды одного владельца не сталкиваются.
pub fn mark_clashes(
    projectiles: &Projectiles,
    doomed: &mut BTreeSet<ProjectileId>,
    radius: f32,
    self_clash: bool,
) {
    let radius_sq = radius * radius;
    let live: Vec<_> = projectiles.iter().collect();

    for (i, (first_id, first)) in live.iter().enumerate() {
        if doomed.contains(first_id) {
            continue;
        }

        for (second_id, second) in live.iter().skip(i + 1) {
            if doomed.contains(second_id) {
                continue;
            }
            if !self_clash && first.owner == second.owner {
                continue;
            }
            if first.position.distance_squared(second.position) >= radius_sq {
                continue;
            }

            match resolve_clash(first.kind, second.kind) {
                ClashOutcome::Mutual => {
                    doomed.insert(*first_id);
                    doomed.insert(*second_id);
                }
                ClashOutcome::FirstWins => {
                    doomed.insert(*second_id);
                }
                ClashOutcome::SecondWins => {
                    doomed.insert(*first_id);
                }
            }

            // Первый уничтожен — дальше его пары не считаем
            if doomed.contains(first_id) {
                break;
            }
        }
    }
}
