use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use pathflow::fs::mock::{at, MockFileSystem};
use pathflow::schedule::{Scheduler, StalenessOracle};
use pathflow::task::{InputPath, ResolvedPaths, TaskDescriptor};
use proptest::prelude::*;

// Strategy to generate a random acyclic pipeline plus a submission order.
// Acyclicity comes from only letting task N read outputs of tasks 0..N-1.
fn pipeline_strategy(max_tasks: usize) -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<usize>)> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..3),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let valid: BTreeSet<usize> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    };
                    valid.into_iter().collect()
                })
                .collect::<Vec<Vec<usize>>>()
        });
        let order = Just((0..num_tasks).collect::<Vec<_>>()).prop_shuffle();
        (deps, order)
    })
}

fn output_of(i: usize) -> PathBuf {
    PathBuf::from(format!("out/{i}"))
}

fn build_task(
    i: usize,
    deps: &[usize],
    fs: &MockFileSystem,
    clock: &Arc<AtomicU64>,
    log: &Arc<Mutex<Vec<usize>>>,
) -> TaskDescriptor {
    let inputs: BTreeMap<_, _> = deps
        .iter()
        .map(|d| (format!("in{d}"), InputPath::Tracked(output_of(*d))))
        .collect();
    let outputs = BTreeMap::from([("out".to_string(), output_of(i))]);
    let fs = fs.clone();
    let clock = Arc::clone(clock);
    let log = Arc::clone(log);
    TaskDescriptor::new(
        format!("task_{i}"),
        "pipeline",
        inputs,
        outputs,
        move |_: &ResolvedPaths, outs: &ResolvedPaths| {
            log.lock().unwrap().push(i);
            let now = clock.fetch_add(1, Ordering::SeqCst);
            for path in outs.values() {
                fs.add_file(path, at(now));
            }
            Ok(())
        },
    )
    .unwrap()
}

proptest! {
    #[test]
    fn every_task_runs_once_after_its_producers(
        (deps, order) in pipeline_strategy(12),
    ) {
        let fs = MockFileSystem::new();
        fs.add_file("/p/pipeline", at(1));
        let clock = Arc::new(AtomicU64::new(10));
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scheduler =
            Scheduler::with_oracle("/p", StalenessOracle::new(Arc::new(fs.clone())));

        let mut previous: BTreeSet<PathBuf> = BTreeSet::new();
        for &i in &order {
            scheduler.add(build_task(i, &deps[i], &fs, &clock, &log)).unwrap();

            let now: BTreeSet<PathBuf> = scheduler.available().map(Path::to_path_buf).collect();
            prop_assert!(previous.is_subset(&now), "available set shrank");
            previous = now;
        }
        prop_assert!(scheduler.finish().is_ok());

        let executed = log.lock().unwrap().clone();
        prop_assert_eq!(executed.len(), deps.len());
        let position: BTreeMap<usize, usize> =
            executed.iter().enumerate().map(|(pos, &t)| (t, pos)).collect();
        prop_assert_eq!(position.len(), deps.len(), "some task ran twice");
        for (task, task_deps) in deps.iter().enumerate() {
            for dep in task_deps {
                prop_assert!(position[dep] < position[&task], "task_{} ran before its input task_{}", task, dep);
            }
        }
    }

    #[test]
    fn rerun_with_fresh_outputs_executes_nothing(
        (deps, order) in pipeline_strategy(8),
    ) {
        let fs = MockFileSystem::new();
        fs.add_file("/p/pipeline", at(1));
        let clock = Arc::new(AtomicU64::new(10));
        let log = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let mut scheduler =
                Scheduler::with_oracle("/p", StalenessOracle::new(Arc::new(fs.clone())));
            for &i in &order {
                scheduler.add(build_task(i, &deps[i], &fs, &clock, &log)).unwrap();
            }
            prop_assert!(scheduler.finish().is_ok());
        }

        prop_assert_eq!(log.lock().unwrap().len(), deps.len());
    }
}
