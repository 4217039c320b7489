//! Achievement unlocking rules.
//!
//! Thresholds and rarity bands are fixed:
//!
//! | Rule             | Unlocks when                          | Rarity                     |
//! |------------------|---------------------------------------|----------------------------|
//! | Fire Streak      | best win streak >= 5                  | rare / epic (7) / legendary (10) |
//! | Unstoppable      | >= 10 wins, 0 losses in one league    | legendary                  |
//! | Epic Comeback    | a 3-2 series win                      | epic                       |
//! | Total Domination | a 3-0 series win                      | rare                       |
//! | Veterans         | >= 50 classified matches              | legendary                  |
//! | Consistency      | winrate >= 65%                        | rare / epic (75)           |

use crate::models::{Achievement, Lang, Rarity};

use super::outcome::ClassifiedMatch;
use super::streaks::compute_streaks;
use super::tournaments::league_records;
use super::calculate_win_rate;

const FIRE_STREAK_MIN: u32 = 5;
const FIRE_STREAK_EPIC: u32 = 7;
const FIRE_STREAK_LEGENDARY: u32 = 10;
const UNSTOPPABLE_MIN_WINS: u32 = 10;
const VETERAN_MIN_MATCHES: u32 = 50;
const VETERAN_MAX: u32 = 100;
const CONSISTENCY_MIN: f64 = 65.0;
const CONSISTENCY_EPIC: f64 = 75.0;

const LOCKED_ICON: &str = "🔒";

/// Evaluate every rule against a chronological (oldest first) history.
///
/// Unlocked achievements come first in rule order, followed by locked
/// placeholders for Fire Streak and Veterans. An empty history yields
/// nothing.
pub fn evaluate_achievements(history: &[ClassifiedMatch], lang: Lang) -> Vec<Achievement> {
    if history.is_empty() {
        return Vec::new();
    }

    let outcomes: Vec<bool> = history.iter().map(|m| m.win).collect();
    let best_win = compute_streaks(&outcomes, false).best_win;
    let total = history.len() as u32;
    let wins = outcomes.iter().filter(|&&w| w).count() as u32;
    let winrate = calculate_win_rate(wins, total);

    let mut unlocked = Vec::new();
    unlocked.extend(fire_streak(best_win, lang));
    unlocked.extend(unstoppable(history, lang));
    unlocked.extend(history.iter().filter_map(|m| epic_comeback(m, lang)));
    unlocked.extend(history.iter().filter_map(|m| total_domination(m, lang)));
    unlocked.extend(veterans(total, lang));
    unlocked.extend(consistency(winrate, lang));

    if best_win < FIRE_STREAK_MIN {
        unlocked.push(Achievement {
            id: "fire-streak-locked".to_string(),
            icon: LOCKED_ICON.to_string(),
            title: lang.pick("Racha de Fuego", "Fire Streak").to_string(),
            description: lang
                .pick("5 victorias consecutivas", "5 consecutive wins")
                .to_string(),
            unlocked: false,
            rarity: Rarity::Rare,
            progress: best_win,
            max: FIRE_STREAK_MIN,
        });
    }

    if total < VETERAN_MIN_MATCHES {
        unlocked.push(Achievement {
            id: "veteran-locked".to_string(),
            icon: LOCKED_ICON.to_string(),
            title: lang.pick("Veteranos", "Veterans").to_string(),
            description: lang
                .pick("50 partidos completados", "50 completed matches")
                .to_string(),
            unlocked: false,
            rarity: Rarity::Legendary,
            progress: total,
            max: VETERAN_MIN_MATCHES,
        });
    }

    unlocked
}

fn fire_streak(best_win: u32, lang: Lang) -> Option<Achievement> {
    if best_win < FIRE_STREAK_MIN {
        return None;
    }

    let rarity = if best_win >= FIRE_STREAK_LEGENDARY {
        Rarity::Legendary
    } else if best_win >= FIRE_STREAK_EPIC {
        Rarity::Epic
    } else {
        Rarity::Rare
    };

    Some(Achievement {
        id: "fire-streak".to_string(),
        icon: "🔥".to_string(),
        title: lang.pick("Racha de Fuego", "Fire Streak").to_string(),
        description: match lang {
            Lang::Es => format!("{} victorias consecutivas", best_win),
            Lang::En => format!("{} consecutive wins", best_win),
        },
        unlocked: true,
        rarity,
        progress: best_win,
        max: best_win.max(FIRE_STREAK_LEGENDARY),
    })
}

fn unstoppable(history: &[ClassifiedMatch], lang: Lang) -> Vec<Achievement> {
    league_records(history)
        .into_iter()
        .filter(|(_, wins, losses)| *wins >= UNSTOPPABLE_MIN_WINS && *losses == 0)
        .map(|(league, wins, _)| Achievement {
            id: format!("unstoppable-{}", league),
            icon: "🏆".to_string(),
            title: lang.pick("Imparables", "Unstoppable").to_string(),
            description: match lang {
                Lang::Es => format!("{}-0 en {}", wins, league),
                Lang::En => format!("{}-0 in {}", wins, league),
            },
            unlocked: true,
            rarity: Rarity::Legendary,
            progress: wins,
            max: wins,
        })
        .collect()
}

/// A best-of-5 won after trailing 0-2.
fn epic_comeback(m: &ClassifiedMatch, lang: Lang) -> Option<Achievement> {
    let comeback = m.win
        && m.opponent_score == 2
        && m.tracked_score.checked_sub(m.opponent_score) == Some(1);
    if !comeback {
        return None;
    }

    Some(Achievement {
        id: format!("comeback-{}", m.id),
        icon: "⚡".to_string(),
        title: lang.pick("Remontada Épica", "Epic Comeback").to_string(),
        description: match lang {
            Lang::Es => format!(
                "Ganaron {}-{} después de estar 0-2",
                m.tracked_score, m.opponent_score
            ),
            Lang::En => format!(
                "Won {}-{} after being 0-2",
                m.tracked_score, m.opponent_score
            ),
        },
        unlocked: true,
        rarity: Rarity::Epic,
        progress: 1,
        max: 1,
    })
}

fn total_domination(m: &ClassifiedMatch, lang: Lang) -> Option<Achievement> {
    if !(m.win && m.tracked_score == 3 && m.opponent_score == 0) {
        return None;
    }

    let opponent = if m.opponent_name.is_empty() {
        lang.pick("rival", "opponent")
    } else {
        m.opponent_name.as_str()
    };

    Some(Achievement {
        id: format!("perfect-{}", m.id),
        icon: "🌟".to_string(),
        title: lang.pick("Dominación Total", "Total Domination").to_string(),
        description: match lang {
            Lang::Es => format!("Victoria perfecta 3-0 vs {}", opponent),
            Lang::En => format!("Perfect 3-0 victory vs {}", opponent),
        },
        unlocked: true,
        rarity: Rarity::Rare,
        progress: 1,
        max: 1,
    })
}

fn veterans(total: u32, lang: Lang) -> Option<Achievement> {
    if total < VETERAN_MIN_MATCHES {
        return None;
    }

    Some(Achievement {
        id: "veteran".to_string(),
        icon: "💎".to_string(),
        title: lang.pick("Veteranos", "Veterans").to_string(),
        description: match lang {
            Lang::Es => format!("{} partidos jugados", total),
            Lang::En => format!("{} matches played", total),
        },
        unlocked: true,
        rarity: Rarity::Legendary,
        progress: total,
        max: VETERAN_MAX,
    })
}

fn consistency(winrate: f64, lang: Lang) -> Option<Achievement> {
    if winrate < CONSISTENCY_MIN {
        return None;
    }

    Some(Achievement {
        id: "consistency".to_string(),
        icon: "🎯".to_string(),
        title: lang.pick("Consistencia", "Consistency").to_string(),
        description: match lang {
            Lang::Es => format!("{:.1}% de victorias", winrate),
            Lang::En => format!("{:.1}% winrate", winrate),
        },
        unlocked: true,
        rarity: if winrate >= CONSISTENCY_EPIC {
            Rarity::Epic
        } else {
            Rarity::Rare
        },
        progress: winrate.round() as u32,
        max: 100,
    })
}
