use crate::gameplay::bridge::registry::Zone;
use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelState {
    #[default]
    Playing,
    Passed,
    Lose,
}

impl LevelState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

// Goal is checked before the hazard.
pub fn evaluate_zones(
    state: LevelState,
    point: Vec2,
    goal: Option<&Zone>,
    lose: Option<&Zone>,
) -> Option<LevelState> {
    if state.is_terminal() {
        return None;
    }
    if goal.is_some_and(|zone| zone.contains(point)) {
        return Some(LevelState::Passed);
    }
    if lose.is_some_and(|zone| zone.contains(point)) {
        return Some(LevelState::Lose);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::bridge::registry::ZoneKind;

    fn goal() -> Zone {
        Zone::new(ZoneKind::Goal, Vec2::new(100.0, 0.0), Vec2::new(50.0, 50.0))
    }

    fn lose() -> Zone {
        Zone::new(ZoneKind::Lose, Vec2::new(120.0, 0.0), Vec2::new(100.0, 100.0))
    }

    #[test]
    fn goal_wins_over_overlapping_hazard() {
        let point = Vec2::new(130.0, 20.0);
        assert_eq!(
            evaluate_zones(LevelState::Playing, point, Some(&goal()), Some(&lose())),
            Some(LevelState::Passed)
        );
    }

    #[test]
    fn hazard_alone_loses() {
        let point = Vec2::new(200.0, 80.0);
        assert_eq!(
            evaluate_zones(LevelState::Playing, point, Some(&goal()), Some(&lose())),
            Some(LevelState::Lose)
        );
    }

    #[test]
    fn terminal_states_ignore_overlaps() {
        let point = Vec2::new(130.0, 20.0);
        for state in [LevelState::Passed, LevelState::Lose] {
            assert_eq!(
                evaluate_zones(state, point, Some(&goal()), Some(&lose())),
                None
            );
        }
    }

    #[test]
    fn missing_zones_never_trigger() {
        assert_eq!(
            evaluate_zones(LevelState::Playing, Vec2::new(130.0, 20.0), None, None),
            None
        );
        assert_eq!(
            evaluate_zones(LevelState::Playing, Vec2::ZERO, Some(&goal()), Some(&lose())),
            None
        );
    }
}
