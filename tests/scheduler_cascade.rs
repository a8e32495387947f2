mod common;

use std::path::PathBuf;

use common::Project;
use pathflow::schedule::ResolutionStatus;
use pathflow_test_utils::builders::TaskBuilder;
use pathflow_test_utils::recording_body::ExecutionLog;

#[test]
fn consumer_waits_for_producer_and_runs_in_same_add() {
    let project = Project::with_scripts(&["producer", "consumer"]);
    let log = ExecutionLog::new();
    let mut scheduler = project.scheduler();

    let outcome = scheduler
        .add(
            TaskBuilder::new("consumer")
                .input("p", "output/p.json")
                .output("c", "output/c.json")
                .recorded(&log),
        )
        .unwrap();
    assert!(outcome.is_deferred());
    assert!(log.names().is_empty());

    let outcome = scheduler
        .add(TaskBuilder::new("producer").output("p", "output/p.json").recorded(&log))
        .unwrap();

    assert_eq!(log.names(), vec!["producer", "consumer"]);
    assert_eq!(outcome.status_of("consumer"), Some(ResolutionStatus::Executed));
    assert!(project.path("output/c.json").is_file());
    scheduler.finish().unwrap();
}

#[test]
fn long_chain_added_in_reverse_resolves_in_one_call() {
    let project = Project::with_scripts(&["s0", "s1", "s2", "s3", "s4"]);
    let log = ExecutionLog::new();
    let mut scheduler = project.scheduler();

    for i in (1..5).rev() {
        let outcome = scheduler
            .add(
                TaskBuilder::new(&format!("s{i}"))
                    .input("prev", &format!("output/{}", i - 1))
                    .output("next", &format!("output/{i}"))
                    .recorded(&log),
            )
            .unwrap();
        assert!(outcome.is_deferred());
    }

    let outcome = scheduler
        .add(TaskBuilder::new("s0").output("next", "output/0").recorded(&log))
        .unwrap();

    assert_eq!(outcome.resolutions().len(), 5);
    assert_eq!(log.names(), vec!["s0", "s1", "s2", "s3", "s4"]);
    assert_eq!(scheduler.pending_tasks().count(), 0);
    scheduler.finish().unwrap();
}

#[test]
fn task_with_several_inputs_waits_for_all_of_them() {
    let project = Project::with_scripts(&["a", "b", "join"]);
    let log = ExecutionLog::new();
    let mut scheduler = project.scheduler();

    scheduler
        .add(
            TaskBuilder::new("join")
                .input("a", "output/a")
                .input("b", "output/b")
                .output("j", "output/j")
                .recorded(&log),
        )
        .unwrap();

    scheduler
        .add(TaskBuilder::new("a").output("a", "output/a").recorded(&log))
        .unwrap();
    assert_eq!(scheduler.pending_tasks().collect::<Vec<_>>(), vec!["join"]);

    scheduler
        .add(TaskBuilder::new("b").output("b", "output/b").recorded(&log))
        .unwrap();
    assert_eq!(log.names(), vec!["a", "b", "join"]);
    scheduler.finish().unwrap();
}

#[test]
fn external_input_is_exempt_from_readiness() {
    let project = Project::with_scripts(&["decode"]);
    project.write_old("botw/Cooking/CookData.yml", 500);
    let log = ExecutionLog::new();
    let mut scheduler = project.scheduler();

    let outcome = scheduler
        .add(
            TaskBuilder::new("decode")
                .external("cook", "botw/Cooking")
                .output("recipes", "output/recipes.yaml")
                .recorded(&log),
        )
        .unwrap();

    assert!(!outcome.is_deferred());
    assert_eq!(log.names(), vec!["decode"]);
    assert!(!scheduler.is_available(&project.path("botw/Cooking")));
    scheduler.finish().unwrap();
}

#[test]
fn available_set_only_grows() {
    let project = Project::with_scripts(&["a", "b", "c"]);
    let log = ExecutionLog::new();
    let mut scheduler = project.scheduler();
    let mut previous: Vec<PathBuf> = Vec::new();

    let tasks = vec![
        TaskBuilder::new("c").input("b", "output/b").output("c", "output/c").recorded(&log),
        TaskBuilder::new("a").output("a", "output/a").recorded(&log),
        TaskBuilder::new("b").input("a", "output/a").output("b", "output/b").recorded(&log),
    ];

    for task in tasks {
        scheduler.add(task).unwrap();
        let now: Vec<PathBuf> = scheduler.available().map(|p| p.to_path_buf()).collect();
        assert!(previous.iter().all(|p| now.contains(p)));
        previous = now;
    }

    assert_eq!(previous.len(), 3);
}
