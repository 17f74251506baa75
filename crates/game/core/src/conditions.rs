//! Evaluation of typed pack conditions against the engine state.

use crate::definitions::Condition;
use crate::expr;
use crate::state::EngineState;

/// Checks a condition against the current state. Pure.
///
/// Expression strings are parsed on every check; the validator guarantees
/// they parse for registered packs, and an expression that still fails to
/// parse evaluates to `false`.
pub fn holds(condition: &Condition, state: &EngineState) -> bool {
    match condition {
        Condition::FlagSet(name) => state.flag(name),
        Condition::FlagClear(name) => !state.flag(name),
        Condition::QuestActive(quest) => state.quests().is_active(quest),
        Condition::QuestAtStage(quest, stage) => {
            state.quests().stage_of(quest) == Some(*stage)
        }
        Condition::QuestCompleted(quest) => state.quests().is_completed(quest),
        Condition::EventCompleted(event) => state.completed_events().contains(event),
        Condition::RegionDiscovered(region) => state.world().discovered.contains(region),
        Condition::RegionStatusIs(region, status) => {
            state.world().status_of(region) == *status
        }
        Condition::MinHealth(minimum) => state.resources().health.current >= *minimum,
        Condition::MinFaith(minimum) => state.resources().faith.current >= *minimum,
        Condition::BalanceAtLeast(minimum) => state.resources().balance >= *minimum,
        Condition::BalanceAtMost(maximum) => state.resources().balance <= *maximum,
        Condition::Expression(source) => expr::parse(source)
            .map(|parsed| expr::holds(&parsed, state))
            .unwrap_or(false),
        Condition::All(conditions) => conditions.iter().all(|c| holds(c, state)),
        Condition::Any(conditions) => conditions.iter().any(|c| holds(c, state)),
        Condition::Not(inner) => !holds(inner, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::RegionStatus;
    use crate::env::GameEnv;
    use crate::state::EngineState;
    use crate::testutil::fixture_content;

    fn fresh_state() -> EngineState {
        let content = fixture_content();
        let env = GameEnv::new(&content);
        EngineState::new(&content.hero, &env, 0).unwrap()
    }

    #[test]
    fn resource_and_flag_conditions() {
        let state = fresh_state();

        assert!(holds(&Condition::MinHealth(30), &state));
        assert!(!holds(&Condition::MinHealth(31), &state));
        assert!(holds(&Condition::MinFaith(10), &state));
        assert!(holds(&Condition::BalanceAtLeast(0), &state));
        assert!(holds(&Condition::BalanceAtMost(0), &state));
        assert!(holds(&Condition::FlagSet("oath_sworn".into()), &state));
        assert!(holds(&Condition::FlagClear("omen_heeded".into()), &state));
    }

    #[test]
    fn world_conditions() {
        let state = fresh_state();

        assert!(holds(
            &Condition::RegionDiscovered("vigil_keep".into()),
            &state
        ));
        assert!(!holds(
            &Condition::RegionDiscovered("breach_maw".into()),
            &state
        ));
        assert!(holds(
            &Condition::RegionStatusIs("breach_maw".into(), RegionStatus::Breach),
            &state
        ));
    }

    #[test]
    fn combinators_compose() {
        let state = fresh_state();

        assert!(holds(
            &Condition::All(vec![
                Condition::MinFaith(1),
                Condition::Not(Box::new(Condition::QuestActive(
                    "seal_the_breach".into()
                ))),
            ]),
            &state
        ));
        assert!(holds(
            &Condition::Any(vec![
                Condition::MinHealth(999),
                Condition::FlagSet("oath_sworn".into()),
            ]),
            &state
        ));
    }

    #[test]
    fn expression_conditions_evaluate_against_state() {
        let state = fresh_state();

        assert!(holds(
            &Condition::Expression("faith >= 10 && health == max_health".into()),
            &state
        ));
        assert!(holds(
            &Condition::Expression(
                "flag('oath_sworn') && region_status('breach_maw') == 'breach'".into()
            ),
            &state
        ));
        // A malformed expression never matches; the validator rejects it at
        // load time.
        assert!(!holds(&Condition::Expression("faith >=".into()), &state));
    }
}
