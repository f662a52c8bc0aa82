use criterion::{black_box, criterion_group, criterion_main, Criterion};
use goap_planner::{Action, ActionLibrary, Goal, Planner, PlannerConfig, State, ZeroHeuristic};

fn switch_planner(switches: usize) -> (ActionLibrary, State, Goal) {
    let mut library = ActionLibrary::new();
    let mut target = State::new();
    for i in 0..switches {
        let key = format!("switch_{}", i);
        let action = Action::new(format!("flip_{}", i), 1.0)
            .expect("valid action")
            .with_effect(&*key, true);
        library.register(action).expect("unique name");
        target.set(key, true);
    }
    let goal = Goal::new(target).expect("non-empty goal");
    (library, State::new(), goal)
}

fn bench_planner(c: &mut Criterion) {
    let (library, start, goal) = switch_planner(10);
    let config = PlannerConfig::new(1 << 12).expect("valid config");

    let astar = Planner::new(library.clone())
        .with_config(config)
        .expect("valid config");
    c.bench_function("planner.generate_plan(switches=10)", |b| {
        b.iter(|| {
            let result = astar.generate_plan(&start, &goal).expect("plan");
            black_box(result.stats().plan_length);
        })
    });

    let dijkstra = Planner::new(library)
        .with_config(config)
        .expect("valid config")
        .with_heuristic(ZeroHeuristic);
    c.bench_function("planner.generate_plan(switches=10, zero heuristic)", |b| {
        b.iter(|| {
            let result = dijkstra.generate_plan(&start, &goal).expect("plan");
            black_box(result.stats().nodes_visited);
        })
    });
}

criterion_group!(benches, bench_planner);
criterion_main!(benches);
