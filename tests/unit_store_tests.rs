//! # Result Store Unit Tests / 结果存储单元测试
//!
//! This module tests the published result store: the initial idle value, run
//! tickets, and that a stale run can never overwrite a newer one.
//!
//! 此模块测试已发布结果的存储：初始空闲值、运行票据，以及过期运行永远无法覆盖较新的运行。

use std::sync::Arc;
use std::thread;

use webunit::models::{ExecutionResult, RunState};
use webunit::server::ResultStore;

fn result(total: usize) -> RunState {
    RunState::Result(ExecutionResult::scheduled(total))
}

#[cfg(test)]
mod ticket_tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let store = ResultStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.run_id, 0);
        assert_eq!(snapshot.state, RunState::Idle);
    }

    #[test]
    fn test_newest_ticket_publishes() {
        let store = ResultStore::new();
        let ticket = store.begin_run();

        assert!(store.publish(&ticket, result(2)));
        assert_eq!(store.snapshot().state, result(2));
        assert_eq!(store.snapshot().run_id, ticket.id());
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let store = ResultStore::new();
        let first = store.begin_run();
        let second = store.begin_run();

        assert!(store.publish(&second, result(7)));
        assert!(!store.publish(&first, result(1)));
        assert_eq!(store.snapshot().state, result(7));
    }

    #[test]
    fn test_error_stays_until_next_run() {
        let store = ResultStore::new();
        let ticket = store.begin_run();
        let failed = RunState::ServiceError("Module 'missing_module' cannot be found.".to_string());
        store.publish(&ticket, failed.clone());

        assert_eq!(store.snapshot().state, failed);
        assert_eq!(store.snapshot().state, failed);

        let next = store.begin_run();
        store.publish(&next, result(1));
        assert_eq!(store.snapshot().state, result(1));
    }
}

#[cfg(test)]
mod concurrent_publish_tests {
    use super::*;

    /// Two runs publish concurrently. Every snapshot a reader sees must be one
    /// a single run published as a whole.
    #[test]
    fn test_readers_never_see_mixed_runs() {
        let store = Arc::new(ResultStore::new());
        let first = store.begin_run();
        let second = store.begin_run();

        let writers: Vec<_> = [(first, 100usize), (second, 200usize)]
            .into_iter()
            .map(|(ticket, total)| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for runs in 0..=50 {
                        let mut state = ExecutionResult::scheduled(total);
                        state.runs = runs;
                        store.publish(&ticket, RunState::Result(state));
                    }
                })
            })
            .collect();

        let reader = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = store.snapshot();
                    match &snapshot.state {
                        RunState::Idle => assert_eq!(snapshot.run_id, 0),
                        RunState::Result(result) => {
                            assert_eq!(snapshot.run_id, 2);
                            assert_eq!(result.total, 200);
                        }
                        RunState::ServiceError(_) => panic!("no run published an error"),
                    }
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let last = store.snapshot();
        assert_eq!(last.run_id, 2);
        assert_eq!(last.state, {
            let mut expected = ExecutionResult::scheduled(200);
            expected.runs = 50;
            RunState::Result(expected)
        });
    }
}
