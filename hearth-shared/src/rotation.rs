/// Round-robin turn rotation math
///
/// Tasks rotate through the household roster in a fixed order. The roster is
/// the set of all users sorted by `(created_at, id)` — the same deterministic
/// ordering must be used when a turn is assigned and when it is advanced,
/// otherwise the rotation drifts.
///
/// The rotation index is the zero-based position of the task's current
/// turn-holder within that ordering. Completing a task advances the index by
/// one, wrapping at the roster length.
///
/// # Example
///
/// ```
/// use hearth_shared::rotation::next_index;
///
/// // Three roommates: completing the task moves the turn along and wraps.
/// assert_eq!(next_index(0, 3), Some(1));
/// assert_eq!(next_index(1, 3), Some(2));
/// assert_eq!(next_index(2, 3), Some(0));
///
/// // An empty roster has no next turn-holder.
/// assert_eq!(next_index(0, 0), None);
/// ```

use uuid::Uuid;

/// Computes the rotation index after a successful completion.
///
/// Returns `None` when the roster is empty. A stale `rotation_index` (for
/// example after the roster shrank) is brought back into range by the modulo,
/// so the result is always a valid position in the given roster.
pub fn next_index(rotation_index: i32, roster_len: usize) -> Option<i32> {
    if roster_len == 0 {
        return None;
    }

    // rem_euclid keeps a stale or corrupt stored index in range
    let current = (rotation_index.max(0) as usize).rem_euclid(roster_len);
    Some(((current + 1) % roster_len) as i32)
}

/// Looks up the turn-holder at a rotation index within the roster ordering.
///
/// Returns `None` when the roster is empty or the index is out of range.
pub fn holder_at(roster: &[Uuid], rotation_index: i32) -> Option<Uuid> {
    if rotation_index < 0 {
        return None;
    }
    roster.get(rotation_index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_next_index_advances_and_wraps() {
        assert_eq!(next_index(0, 3), Some(1));
        assert_eq!(next_index(1, 3), Some(2));
        assert_eq!(next_index(2, 3), Some(0));
    }

    #[test]
    fn test_next_index_single_user_self_loop() {
        // With one roommate the turn never leaves them
        assert_eq!(next_index(0, 1), Some(0));
        assert_eq!(next_index(0, 1), Some(0));
    }

    #[test]
    fn test_next_index_empty_roster() {
        assert_eq!(next_index(0, 0), None);
        assert_eq!(next_index(5, 0), None);
    }

    #[test]
    fn test_next_index_stale_index_recovers() {
        // Roster shrank from 5 to 3 while a task still carried index 4:
        // the advance must land inside the new roster
        let next = next_index(4, 3).unwrap();
        assert!((0..3).contains(&next));
        assert_eq!(next, 2); // 4 % 3 == 1, +1 == 2
    }

    #[test]
    fn test_next_index_negative_index_recovers() {
        let next = next_index(-1, 3).unwrap();
        assert!((0..3).contains(&next));
    }

    #[test]
    fn test_full_cycle_returns_to_first_holder() {
        // N successive completions visit every roommate exactly once and
        // return the turn to the original holder
        for n in 1..=6usize {
            let mut index = 0i32;
            let mut seen = vec![index];
            for _ in 0..n {
                index = next_index(index, n).unwrap();
                seen.push(index);
            }
            assert_eq!(index, 0, "cycle of {} should return to the start", n);
            let mut visited: Vec<i32> = seen[..n].to_vec();
            visited.sort_unstable();
            assert_eq!(visited, (0..n as i32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_holder_at() {
        let users = roster(3);
        assert_eq!(holder_at(&users, 0), Some(users[0]));
        assert_eq!(holder_at(&users, 2), Some(users[2]));
        assert_eq!(holder_at(&users, 3), None);
        assert_eq!(holder_at(&users, -1), None);
        assert_eq!(holder_at(&[], 0), None);
    }

    #[test]
    fn test_three_user_scenario() {
        // users = [A, B, C]; create task -> turn A (index 0).
        // A completes -> B (1). B completes -> C (2). C completes -> A (0).
        let users = roster(3);
        let (a, b, c) = (users[0], users[1], users[2]);

        let mut index = 0i32;
        assert_eq!(holder_at(&users, index), Some(a));

        index = next_index(index, users.len()).unwrap();
        assert_eq!((index, holder_at(&users, index)), (1, Some(b)));

        index = next_index(index, users.len()).unwrap();
        assert_eq!((index, holder_at(&users, index)), (2, Some(c)));

        index = next_index(index, users.len()).unwrap();
        assert_eq!((index, holder_at(&users, index)), (0, Some(a)));
    }

    #[test]
    fn test_removal_reset_points_at_new_first_member() {
        // Removing user C resets any task that pointed at C to the first
        // remaining roster member at index 0 (deliberate simplification,
        // see User::delete_account)
        let users = roster(3);
        let remaining = vec![users[0], users[1]];

        let index = 0i32;
        assert_eq!(holder_at(&remaining, index), Some(users[0]));
    }
}
