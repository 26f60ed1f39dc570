use fanfetch_common_async::{build_runtime, CompletionBarrier, PoolConfig, RuntimeConfig, TaskPool};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn runtime() -> tokio::runtime::Runtime {
    build_runtime(RuntimeConfig {
        worker_threads: 4,
        thread_name: "fan-in-test".to_string(),
    })
    .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn barrier_releases_after_every_task(tasks in 0usize..40, cap in proptest::option::of(1usize..8)) {
        let rt = runtime();
        let finished = rt.block_on(async move {
            let pool = TaskPool::new(PoolConfig { max_in_flight: cap });
            let barrier = CompletionBarrier::new();
            let finished = Arc::new(AtomicUsize::new(0));

            barrier.add(tasks);
            for i in 0..tasks {
                let guard = barrier.done_on_drop();
                let finished = finished.clone();
                pool.spawn(async move {
                    let _guard = guard;
                    tokio::time::sleep(Duration::from_micros((i % 7) as u64 * 50)).await;
                    finished.fetch_add(1, Ordering::SeqCst);
                });
            }

            tokio::time::timeout(Duration::from_secs(10), barrier.wait())
                .await
                .expect("barrier never released");
            finished.load(Ordering::SeqCst)
        });

        prop_assert_eq!(finished, tasks);
    }
}

#[test]
fn closer_task_sees_all_sends_before_close() {
    let rt = runtime();
    let drained = rt.block_on(async {
        let n = 16;
        let pool = TaskPool::unbounded();
        let barrier = CompletionBarrier::new();
        let (tx, mut rx) = tokio::sync::mpsc::channel::<usize>(n);

        barrier.add(n);
        for i in 0..n {
            let guard = barrier.done_on_drop();
            let tx = tx.clone();
            pool.spawn(async move {
                let _guard = guard;
                tx.send(i).await.expect("receiver alive");
            });
        }

        let closer = barrier.clone();
        tokio::spawn(async move {
            closer.wait().await;
            drop(tx);
        });

        let mut seen = Vec::new();
        while let Some(i) = rx.recv().await {
            seen.push(i);
        }
        seen.sort_unstable();
        seen
    });

    assert_eq!(drained, (0..16).collect::<Vec<_>>());
}
