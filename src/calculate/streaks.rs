//! Streak computation over a sequence of win/loss flags.

use crate::models::{StreakSummary, StreakType};

/// Compute current and best streaks.
///
/// `outcomes` holds one flag per classified match (`true` = win). When
/// `most_recent_first` is set the first element is the latest match,
/// otherwise the sequence is oldest first.
pub fn compute_streaks(outcomes: &[bool], most_recent_first: bool) -> StreakSummary {
    let chronological: Vec<bool> = if most_recent_first {
        outcomes.iter().rev().copied().collect()
    } else {
        outcomes.to_vec()
    };

    let Some(&latest) = chronological.last() else {
        return StreakSummary::default();
    };

    let current = chronological
        .iter()
        .rev()
        .take_while(|&&won| won == latest)
        .count() as u32;

    let mut best_win = 0;
    let mut best_loss = 0;
    let mut win_run = 0;
    let mut loss_run = 0;
    for &won in &chronological {
        if won {
            win_run += 1;
            loss_run = 0;
            best_win = best_win.max(win_run);
        } else {
            loss_run += 1;
            win_run = 0;
            best_loss = best_loss.max(loss_run);
        }
    }

    StreakSummary {
        current,
        current_type: Some(StreakType::from_win(latest)),
        best_win,
        best_loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const W: bool = true;
    const L: bool = false;

    #[test]
    fn test_mixed_sequence_oldest_first() {
        let s = compute_streaks(&[W, W, L, W, W, W, L], false);
        assert_eq!(
            s,
            StreakSummary {
                current: 1,
                current_type: Some(StreakType::Loss),
                best_win: 3,
                best_loss: 1,
            }
        );
    }

    #[test]
    fn test_same_sequence_most_recent_first() {
        let s = compute_streaks(&[L, W, W, W, L, W, W], true);
        assert_eq!(s.current, 1);
        assert_eq!(s.current_type, Some(StreakType::Loss));
        assert_eq!(s.best_win, 3);
        assert_eq!(s.best_loss, 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(compute_streaks(&[], true), StreakSummary::default());
        assert_eq!(compute_streaks(&[], false).current_type, None);
    }

    #[test]
    fn test_single_win() {
        let s = compute_streaks(&[W], false);
        assert_eq!(s.current, 1);
        assert_eq!(s.current_type, Some(StreakType::Win));
        assert_eq!(s.best_win, 1);
        assert_eq!(s.best_loss, 0);
    }

    #[test]
    fn test_single_loss() {
        let s = compute_streaks(&[L], true);
        assert_eq!(s.current, 1);
        assert_eq!(s.current_type, Some(StreakType::Loss));
        assert_eq!(s.best_win, 0);
        assert_eq!(s.best_loss, 1);
    }

    #[test]
    fn test_current_run_at_end() {
        let s = compute_streaks(&[L, L, L, W, W, W, W], false);
        assert_eq!(s.current, 4);
        assert_eq!(s.current_type, Some(StreakType::Win));
        assert_eq!(s.best_win, 4);
        assert_eq!(s.best_loss, 3);
    }

    #[test]
    fn test_best_never_below_current() {
        let sequences: [&[bool]; 4] = [
            &[W, L, W, W],
            &[L, L, W, L, L, L],
            &[W, W, W, W, W],
            &[L, W, L, W, L],
        ];
        for seq in sequences {
            let s = compute_streaks(seq, false);
            match s.current_type {
                Some(StreakType::Win) => assert!(s.best_win >= s.current),
                Some(StreakType::Loss) => assert!(s.best_loss >= s.current),
                None => unreachable!(),
            }
        }
    }
}
