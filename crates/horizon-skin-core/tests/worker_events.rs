//! Integration tests for workers reporting back through event queues.

use std::time::Duration;

use horizon_skin_core::{EventQueue, SkinEvent, Worker};

#[test]
fn worker_results_arrive_in_submission_order() {
    let queue = EventQueue::new();
    let worker = Worker::spawn("report").unwrap();

    for i in 0..3 {
        let sender = queue.sender();
        worker
            .submit(move || {
                sender
                    .post(SkinEvent::WorkerDone {
                        command: format!("job{i}"),
                        result: Ok(i.to_string()),
                    })
                    .unwrap();
            })
            .unwrap();
    }
    assert!(worker.wait_idle(Duration::from_secs(5)));

    let commands: Vec<String> = queue
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            SkinEvent::WorkerDone { command, .. } => Some(command),
            _ => None,
        })
        .collect();
    assert_eq!(commands, ["job0", "job1", "job2"]);
}

#[test]
fn dropped_queue_does_not_break_worker() {
    let queue = EventQueue::new();
    let sender = queue.sender();
    drop(queue);

    let worker = Worker::spawn("orphan").unwrap();
    worker
        .submit(move || {
            assert!(
                sender
                    .post(SkinEvent::WorkerDone {
                        command: "late".into(),
                        result: Err("window closed".into()),
                    })
                    .is_err()
            );
        })
        .unwrap();
    assert!(worker.wait_idle(Duration::from_secs(5)));
    assert!(worker.shutdown_and_join());
}
