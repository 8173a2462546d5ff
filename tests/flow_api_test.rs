//! Integration tests for building and running flows.

use procflow::config::RunnerConfig;
use procflow::context::Context;
use procflow::execution::{FlowRunner, InputStream, OutputStream};
use procflow::graph::{Flow, Path};
use procflow::listener::{RecordingListener, RunEvent, RunListener};
use procflow::process::{Dataset, FnProcess, Process};
use procflow::FlowError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn quiet_runner() -> FlowRunner {
    FlowRunner::with_config(RunnerConfig {
        log_events: false,
        ..Default::default()
    })
}

/// Appends its name to a shared log and writes it on the default port.
struct Tracker {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Process for Tracker {
    fn perform(
        &self,
        _input: &InputStream,
        output: &mut OutputStream,
        _context: &Context,
    ) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(self.name.to_string());
        output.write_default(Dataset::new(self.name));
        Ok(())
    }
}

fn tracked_flow(names: &[&'static str], paths: Vec<Path>) -> (Flow, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut flow = Flow::new("tracked");
    for &name in names {
        flow.add_process(
            name,
            Tracker {
                name,
                log: Arc::clone(&log),
            },
        );
    }
    for path in paths {
        flow.add_path(path);
    }
    (flow, log)
}

#[test]
fn fan_in_passes_every_upstream_result() {
    let (flow, _) = tracked_flow(
        &["a", "b", "c"],
        vec![Path::from_process("a").to("c"), Path::from_process("b").to("c")],
    );
    let graph = flow.analyze().unwrap();

    let mut calls: Vec<(String, HashMap<String, String>)> = Vec::new();
    graph
        .visit(|name, inputs: HashMap<String, String>| {
            calls.push((name.to_string(), inputs));
            Ok(format!("result{}", name.to_uppercase()))
        })
        .unwrap();

    assert_eq!(calls.len(), 3);
    let (last, inputs) = calls.last().unwrap();
    assert_eq!(last, "c");
    assert_eq!(inputs["a"], "resultA");
    assert_eq!(inputs["b"], "resultB");
    for (name, inputs) in &calls[..2] {
        assert!(name == "a" || name == "b");
        assert!(inputs.is_empty());
    }
}

#[test]
fn every_arrow_source_runs_before_its_destination() {
    let (flow, log) = tracked_flow(
        &["report", "merge", "left", "right", "raw"],
        vec![
            Path::from_process("raw").to("left").to("merge").to("report"),
            Path::from_process("raw").to("right").to("merge"),
        ],
    );

    quiet_runner().run(&flow).unwrap().start().unwrap();

    let order = log.lock().unwrap().clone();
    assert_eq!(order.len(), 5);
    let pos = |n: &str| order.iter().position(|s| s == n).unwrap();
    for arrow in flow.arrows() {
        let to = arrow.to.as_deref().unwrap();
        assert!(pos(&arrow.from) < pos(to), "{} ran after {}", arrow.from, to);
    }
}

#[test]
fn shared_ancestor_performs_once() {
    let (flow, log) = tracked_flow(
        &["root", "x", "y", "z"],
        vec![
            Path::from_process("root").to("x"),
            Path::from_process("root").to("y"),
            Path::from_process("root").to("z"),
        ],
    );

    quiet_runner().run(&flow).unwrap().start().unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|n| *n == "root").count(), 1);
    assert_eq!(log.len(), 4);
}

#[test]
fn dataset_passes_through_unchanged() {
    let produced: Arc<Mutex<Option<Dataset>>> = Arc::new(Mutex::new(None));
    let consumed: Arc<Mutex<Option<Dataset>>> = Arc::new(Mutex::new(None));

    let mut flow = Flow::new("identity");
    let produced_in = Arc::clone(&produced);
    flow.add_process(
        "x",
        FnProcess::new(move |_, out, _| {
            let dataset = Dataset::new(vec![1u64, 2, 3]);
            *produced_in.lock().unwrap() = Some(dataset.clone());
            out.write("default", dataset);
            Ok(())
        }),
    );
    let consumed_in = Arc::clone(&consumed);
    flow.add_process(
        "y",
        FnProcess::new(move |input, _, _| {
            *consumed_in.lock().unwrap() = Some(input.read_default()?.clone());
            Ok(())
        }),
    );
    flow.add_path(Path::from_process("x").to("y"));

    quiet_runner().run(&flow).unwrap().start().unwrap();

    let produced = produced.lock().unwrap().clone().unwrap();
    let consumed = consumed.lock().unwrap().clone().unwrap();
    assert!(produced.ptr_eq(&consumed));
    assert_eq!(consumed.downcast_ref::<Vec<u64>>(), Some(&vec![1, 2, 3]));
}

#[test]
fn named_ports_route_datasets() {
    let mut flow = Flow::new("split");
    flow.add_process(
        "split",
        FnProcess::new(|_, out, _| {
            out.write("even", Dataset::new(vec![2, 4]));
            out.write("odd", Dataset::new(vec![1, 3]));
            Ok(())
        }),
    );
    flow.add_process(
        "sum",
        FnProcess::new(|input, out, _| {
            let total: i32 = ["lhs", "rhs"]
                .iter()
                .map(|port| -> anyhow::Result<i32> {
                    let values = input
                        .read(port)?
                        .downcast_ref::<Vec<i32>>()
                        .ok_or_else(|| anyhow::anyhow!("expected numbers on {}", port))?;
                    Ok(values.iter().sum())
                })
                .sum::<anyhow::Result<i32>>()?;
            out.write_default(Dataset::new(total));
            Ok(())
        }),
    );
    flow.add_path(
        Path::from_process("split")
            .to("sum")
            .output_port("even")
            .input_port("lhs"),
    );
    flow.add_path(
        Path::from_process("split")
            .to("sum")
            .output_port("odd")
            .input_port("rhs"),
    );

    let result = quiet_runner().run(&flow).unwrap().start().unwrap();
    let total = result
        .dataset("sum", "default")
        .and_then(|d| d.downcast_ref::<i32>());
    assert_eq!(total, Some(&10));
}

#[test]
fn failing_process_reports_and_aborts() {
    let mut flow = Flow::new("fails");
    flow.add_process("ok", FnProcess::new(|_, out, _| {
        out.write_default(Dataset::new(()));
        Ok(())
    }));
    flow.add_process("bad", FnProcess::new(|_, _, _| anyhow::bail!("upstream schema changed")));
    flow.add_process("never", FnProcess::new(|_, _, _| Ok(())));
    flow.add_path(Path::from_process("ok").to("bad").to("never"));

    let recorder = Arc::new(RecordingListener::new());
    let mut runner = quiet_runner();
    runner.add_listener(recorder.clone());

    let err = runner.run(&flow).unwrap().start().unwrap_err();

    assert_eq!(err.process(), Some("bad"));
    assert_eq!(recorder.processes_with("process_failed"), vec!["bad"]);
    assert!(!recorder.processes_with("process_completed").contains(&"bad".to_string()));
    assert!(recorder.processes_with("process_started").iter().all(|p| p != "never"));
    assert!(!recorder.kinds().contains(&"flow_shutdown"));
}

#[test]
fn successful_run_emits_every_event_kind_but_failure() {
    let (flow, _) = tracked_flow(&["a", "b"], vec![Path::from_process("a").to("b")]);
    let recorder = Arc::new(RecordingListener::new());
    let mut execution = quiet_runner().run(&flow).unwrap();
    execution.add_listener(recorder.clone());
    let result = execution.start().unwrap();

    let events = recorder.events();
    assert!(matches!(
        events.first(),
        Some(RunEvent::FlowStarted { execution, .. }) if *execution == result.execution
    ));
    assert!(matches!(events.last(), Some(RunEvent::FlowShutdown { .. })));
    let kinds = recorder.kinds();
    for kind in ["process_initialized", "process_started", "process_completed"] {
        assert_eq!(kinds.iter().filter(|k| **k == kind).count(), 2, "{}", kind);
    }
    assert!(!kinds.contains(&"process_failed"));
}

#[test]
fn failing_listener_does_not_block_others() {
    struct Grumpy;
    impl RunListener for Grumpy {
        fn process_completed(
            &self,
            _: &procflow::execution::ProcessExecution,
            _: &OutputStream,
        ) -> anyhow::Result<()> {
            anyhow::bail!("listener broke")
        }
    }

    let (flow, _) = tracked_flow(&["a"], vec![]);
    let recorder = Arc::new(RecordingListener::new());
    let mut execution = quiet_runner().run(&flow).unwrap();
    execution.add_listener(Arc::new(Grumpy));
    execution.add_listener(recorder.clone());

    execution.start().unwrap();
    assert_eq!(recorder.processes_with("process_completed"), vec!["a"]);
}

#[test]
fn listeners_run_in_registration_order() {
    struct Tag {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }
    impl RunListener for Tag {
        fn flow_started(&self, _: &procflow::execution::FlowExecution<'_>) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("{}:flow_started", self.tag));
            Ok(())
        }

        fn process_completed(
            &self,
            _: &procflow::execution::ProcessExecution,
            _: &OutputStream,
        ) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("{}:process_completed", self.tag));
            Ok(())
        }
    }

    let order = Arc::new(Mutex::new(Vec::new()));
    let tag = |tag| {
        Arc::new(Tag {
            tag,
            log: Arc::clone(&order),
        })
    };

    let (flow, _) = tracked_flow(&["a"], vec![]);
    let mut runner = quiet_runner();
    runner.add_listener(tag("r1"));
    let mut execution = runner.run(&flow).unwrap();
    execution.add_listener(tag("e1"));
    execution.add_listener(tag("e2"));
    execution.start().unwrap();

    assert_eq!(
        *order.lock().unwrap(),
        vec![
            "r1:flow_started",
            "e1:flow_started",
            "e2:flow_started",
            "r1:process_completed",
            "e1:process_completed",
            "e2:process_completed",
        ]
    );
}

#[test]
fn graph_errors_surface_before_running() {
    let (mut flow, log) = tracked_flow(&["a"], vec![]);
    flow.add_path(Path::from_process("a").to("nowhere"));

    let err = quiet_runner().run(&flow).unwrap_err();
    assert!(matches!(err, FlowError::UnknownProcess { .. }));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn cycles_are_rejected_instead_of_recursing() {
    let (flow, _) = tracked_flow(
        &["a", "b", "c"],
        vec![Path::from_process("a").to("b").to("c").to("a")],
    );
    match quiet_runner().run(&flow) {
        Err(FlowError::CircularDependency { cycle }) => assert_eq!(cycle, "a -> b -> c -> a"),
        other => panic!("expected cycle, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn repeated_analysis_is_stable() {
    let (flow, _) = tracked_flow(
        &["a", "b", "c", "d"],
        vec![
            Path::from_process("a").to("b").to("d"),
            Path::from_process("c").to("d"),
        ],
    );
    let describe = |name: &str, inputs: HashMap<String, String>| -> procflow::Result<String> {
        let mut parts: Vec<String> = inputs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        parts.sort();
        Ok(format!("{}[{}]", name, parts.join(";")))
    };

    let first = flow.analyze().unwrap().visit(describe).unwrap();
    let second = flow.analyze().unwrap().visit(describe).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["d"], "d[b=b[a=a[]];c=c[]]");
}

#[test]
fn runner_settings_reach_processes() {
    let config: RunnerConfig =
        serde_yaml::from_str("log_events: false\nsettings:\n  greeting: hi\n").unwrap();
    let runner = FlowRunner::with_config(config);

    let mut flow = Flow::new("settings");
    flow.add_process(
        "speak",
        FnProcess::new(|_, out, ctx| {
            let greeting = ctx
                .setting("greeting")
                .and_then(|v| v.as_str().map(str::to_string))
                .ok_or_else(|| anyhow::anyhow!("greeting not configured"))?;
            out.write_default(Dataset::new(greeting));
            Ok(())
        }),
    );

    let result = runner.run(&flow).unwrap().start().unwrap();
    let spoken = result
        .dataset("speak", "default")
        .and_then(|d| d.downcast_ref::<String>());
    assert_eq!(spoken.map(String::as_str), Some("hi"));
}
