use goap_planner::{
    Action, ActionLibrary, ActionSpec, GoapError, Goal, PlanResult, PlanStatus, Planner,
    PlannerConfig, State, Value,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn door_state(key_available: bool) -> State {
        let mut state = State::new();
        state.set("door_open", false);
        state.set("has_key", false);
        if key_available {
            state.set("key_available", true);
        }
        state
    }

    fn door_planner() -> Planner {
        Planner::from_table(vec![
            ActionSpec::new(
                "pickup_key",
                [("key_available", true)].into_iter().collect(),
                [("has_key", true)].into_iter().collect(),
                1.0,
            ),
            ActionSpec::new(
                "open_door",
                [("has_key", true)].into_iter().collect(),
                [("door_open", true)].into_iter().collect(),
                1.0,
            ),
        ])
        .unwrap()
    }

    fn door_goal(open: bool) -> Goal {
        Goal::new([("door_open", open)].into_iter().collect()).unwrap()
    }

    /// Replays a plan step by step, checking preconditions along the way.
    fn replay(planner: &Planner, initial: &State, result: &PlanResult) -> (State, f64) {
        let mut state = initial.clone();
        let mut cost = 0.0;
        for name in result.plan().expect("a plan") {
            let action = planner.actions().lookup(name).expect("known action");
            assert!(
                action.is_applicable(&state),
                "Precondition not met for action {} in {}",
                name,
                state
            );
            state = action.apply(&state).unwrap();
            cost += action.cost();
        }
        (state, cost)
    }

    #[test]
    fn test_door_scenario_finds_two_step_plan() {
        let planner = door_planner();
        let initial = door_state(true);
        let goal = door_goal(true);

        let result = planner.generate_plan(&initial, &goal).unwrap();
        assert_eq!(result.status(), PlanStatus::PlanFound);
        assert_eq!(result.plan().unwrap(), ["pickup_key", "open_door"]);
        assert_eq!(result.stats().total_cost, 2.0);
        assert_eq!(result.stats().plan_length, 2);

        let (final_state, cost) = replay(&planner, &initial, &result);
        assert!(goal.is_satisfied(&final_state));
        assert_eq!(cost, result.stats().total_cost);
    }

    #[test]
    fn test_door_scenario_already_satisfied() {
        let result = door_planner()
            .generate_plan(&door_state(true), &door_goal(false))
            .unwrap();
        assert_eq!(result.status(), PlanStatus::GoalAlreadySatisfied);
        assert!(result.is_success());
        assert!(result.plan().unwrap().is_empty());
        assert_eq!(result.stats().total_cost, 0.0);
        assert_eq!(result.stats().nodes_expanded, 0);
    }

    #[test]
    fn test_door_scenario_without_key_exhausts_search() {
        let planner = door_planner()
            .with_config(PlannerConfig::new(1).unwrap())
            .unwrap();
        let result = planner
            .generate_plan(&door_state(false), &door_goal(true))
            .unwrap();
        assert_eq!(result.status(), PlanStatus::SearchSpaceExhausted);
        assert!(result.plan().is_none());
        assert_eq!(
            result.message(),
            "No valid plan exists: search space exhausted"
        );
    }

    #[test]
    fn test_cheaper_two_step_route_wins() {
        let planner = Planner::from_table(vec![
            ActionSpec::new(
                "teleport",
                [("at_home", true)].into_iter().collect(),
                [("at_work", true)].into_iter().collect(),
                5.0,
            ),
            ActionSpec::new(
                "walk_to_station",
                [("at_home", true)].into_iter().collect(),
                [("at_station", true)].into_iter().collect(),
                1.0,
            ),
            ActionSpec::new(
                "ride_train",
                [("at_station", true)].into_iter().collect(),
                [("at_work", true)].into_iter().collect(),
                1.0,
            ),
        ])
        .unwrap();

        let initial: State = [("at_home", true)].into_iter().collect();
        let goal = Goal::new([("at_work", true)].into_iter().collect()).unwrap();

        let result = planner.generate_plan(&initial, &goal).unwrap();
        assert_eq!(result.plan().unwrap(), ["walk_to_station", "ride_train"]);
        assert_eq!(result.stats().total_cost, 2.0);
    }

    #[test]
    fn test_iteration_cap_is_reported_separately() {
        // Eight independent switches; the goal needs all of them on.
        let mut library = ActionLibrary::new();
        let mut target = State::new();
        for i in 0..8 {
            let key = format!("switch_{}", i);
            library
                .register(Action::new(format!("flip_{}", i), 1.0).unwrap().with_effect(&*key, true))
                .unwrap();
            target.set(key, true);
        }
        let goal = Goal::new(target).unwrap();

        let capped = Planner::new(library.clone())
            .with_config(PlannerConfig::new(2).unwrap())
            .unwrap();
        let result = capped.generate_plan(&State::new(), &goal).unwrap();
        assert_eq!(
            result.status(),
            PlanStatus::IterationLimitReached { max_iterations: 2 }
        );
        assert!(!result.is_success());
        assert_ne!(result.status(), PlanStatus::SearchSpaceExhausted);

        let result = Planner::new(library).generate_plan(&State::new(), &goal).unwrap();
        assert_eq!(result.status(), PlanStatus::PlanFound);
        assert_eq!(result.plan().unwrap().len(), 8);
        assert_eq!(result.stats().total_cost, 8.0);
    }

    #[test]
    fn test_planning_is_deterministic() {
        let mut library = ActionLibrary::new();
        for (name, key) in [("a", "x"), ("b", "y"), ("c", "z"), ("d", "x")] {
            library
                .register(Action::new(name, 1.0).unwrap().with_effect(key, true))
                .unwrap();
        }
        let planner = Planner::new(library);
        let goal = Goal::new([("x", true), ("y", true), ("z", true)].into_iter().collect()).unwrap();

        let first = planner.generate_plan(&State::new(), &goal).unwrap();
        for _ in 0..5 {
            let again = planner.generate_plan(&State::new(), &goal).unwrap();
            assert_eq!(again.plan(), first.plan());
            assert_eq!(again.stats().nodes_visited, first.stats().nodes_visited);
            assert_eq!(again.stats().nodes_expanded, first.stats().nodes_expanded);
        }
        assert_eq!(first.plan().unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn test_planner_from_json_table() {
        let library = ActionLibrary::from_json(
            r#"[
                ["wake_up", {"awake": false}, {"awake": true}, 1],
                ["make_coffee", {"awake": true, "location": "kitchen"}, {"has_coffee": true}, 2],
                ["go_to_kitchen", {"awake": true}, {"location": "kitchen"}, 1],
                ["drink_coffee", {"has_coffee": true}, {"caffeinated": true}, 0.5]
            ]"#,
        )
        .unwrap();
        let config = PlannerConfig::from_json(r#"{"max_iterations": 100}"#).unwrap();
        let planner = Planner::new(library).with_config(config).unwrap();

        let mut initial = State::new();
        initial.set("awake", false);
        initial.set("location", "bedroom");

        let goal = Goal::new([("caffeinated", true)].into_iter().collect())
            .unwrap()
            .with_name("MorningCoffee");

        let result = planner.generate_plan(&initial, &goal).unwrap();
        assert_eq!(
            result.plan().unwrap(),
            ["wake_up", "go_to_kitchen", "make_coffee", "drink_coffee"]
        );
        assert_eq!(result.stats().total_cost, 4.5);

        let (final_state, _) = replay(&planner, &initial, &result);
        assert_eq!(final_state.get("location"), Some(&Value::from("kitchen")));
    }

    #[test]
    fn test_duplicate_rows_fail_construction() {
        let result = Planner::from_table(vec![
            ActionSpec::new("a", State::new(), State::new(), 1.0),
            ActionSpec::new("a", State::new(), State::new(), 2.0),
        ]);
        assert!(matches!(
            result,
            Err(GoapError::ActionAlreadyInCollection(ref name)) if name == "a"
        ));
    }

    #[test]
    fn test_invalid_action_cost() {
        let result = Action::new("invalid_action", 0.0);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));

        let result = Action::new("invalid_action", -1.0);
        assert!(matches!(result, Err(GoapError::InvalidActionCost)));
    }

    #[test]
    fn test_independent_planners_run_in_parallel() {
        let planner = door_planner();
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = [true, false]
                .into_iter()
                .map(|open| {
                    let planner = &planner;
                    scope.spawn(move || {
                        planner
                            .generate_plan(&door_state(true), &door_goal(open))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results[0].status(), PlanStatus::PlanFound);
        assert_eq!(results[1].status(), PlanStatus::GoalAlreadySatisfied);
    }
}
