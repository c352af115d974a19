use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::notify::Notify;
use crate::pace::Pace;
use crate::philosopher::Philosopher;
use crate::shutdown::Shutdown;
use crate::table::{State, Table};

// 哲学者ごとにスレッドを 1 つ起動し、終了後にテーブルを片付ける
pub struct Dinner {
    table: Table,
    shutdown: Shutdown,
    handles: Vec<JoinHandle<()>>,
}

impl Dinner {
    pub fn start(
        count: i64,
        pace: Pace,
        notify: Arc<dyn Notify>,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let table = Table::with_notify(count, notify)?;
        let handles = seat_all(&table, &shutdown, &pace, |id, philosopher| {
            thread::Builder::new()
                .name(format!("philosopher-{id}"))
                .spawn(move || philosopher.run())
        })?;

        Ok(Dinner {
            table,
            shutdown,
            handles,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn stop(&self) -> bool {
        self.shutdown.signal()
    }

    // 全員の終了を待ってからテーブルを片付ける
    pub fn join(self) -> Result<Vec<State>> {
        let Dinner { table, handles, .. } = self;

        if let Some(id) = join_all(handles) {
            return Err(Error::ActorPanicked(id));
        }

        info!("cleaning up resources");
        table.teardown()
    }
}

// spawn が 1 つでも失敗したら、起動済みの哲学者を止めて join してからエラーを返す
// 一部の哲学者だけで続行はしない
fn seat_all<F>(
    table: &Table,
    shutdown: &Shutdown,
    pace: &Pace,
    mut spawn: F,
) -> Result<Vec<JoinHandle<()>>>
where
    F: FnMut(usize, Philosopher) -> io::Result<JoinHandle<()>>,
{
    let mut handles = Vec::with_capacity(table.len());

    for id in 0..table.len() {
        info!(philosopher = id, "initializing");
        let philosopher = Philosopher::new(id, table.clone(), shutdown.clone(), pace.clone());

        match spawn(id, philosopher) {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                error!(philosopher = id, error = %e, "thread creation failed");
                shutdown.signal();
                join_all(handles);
                return Err(Error::InitializationFailure(format!(
                    "spawning philosopher {id}: {e}"
                )));
            }
        }
    }

    Ok(handles)
}

// 全員 join し、panic した最初の哲学者を返す
fn join_all(handles: Vec<JoinHandle<()>>) -> Option<usize> {
    let mut panicked = None;
    for (id, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            error!(philosopher = id, "philosopher panicked");
            panicked.get_or_insert(id);
        }
    }
    panicked
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn quick() -> Pace {
        let ms = Duration::from_millis;
        Pace::new(ms(0)..=ms(1), ms(0)..=ms(1)).unwrap()
    }

    #[test]
    fn test_spawn_failure_stops_seated_philosophers() {
        const FAIL_AT: usize = 3;

        let table = Table::new(5).unwrap();
        let shutdown = Shutdown::new();
        let finished = Arc::new(Mutex::new(Vec::new()));
        let attempts = AtomicUsize::new(0);

        let result = seat_all(&table, &shutdown, &quick(), |id, philosopher| {
            attempts.fetch_add(1, Ordering::Relaxed);
            if id == FAIL_AT {
                return Err(io::Error::new(io::ErrorKind::OutOfMemory, "no threads left"));
            }
            let finished = finished.clone();
            thread::Builder::new().spawn(move || {
                philosopher.run();
                finished.lock().unwrap().push(id);
            })
        });

        match result {
            Err(Error::InitializationFailure(msg)) => assert!(msg.contains("philosopher 3")),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("seating should have failed"),
        }
        assert!(!shutdown.is_running());
        // 失敗した以降は起動を試みない
        assert_eq!(attempts.load(Ordering::Relaxed), FAIL_AT + 1);

        // seat_all が返った時点で 0..FAIL_AT は全員 join 済み
        let mut finished = finished.lock().unwrap().clone();
        finished.sort_unstable();
        assert_eq!(finished, (0..FAIL_AT).collect::<Vec<_>>());

        // 起動済みの哲学者のハンドルも残っていない
        assert_eq!(table.teardown().unwrap(), vec![State::Thinking; 5]);
    }

    #[test]
    fn test_join_all_reports_first_panic() {
        let handles = vec![
            thread::spawn(|| {}),
            thread::spawn(|| panic!("choked")),
            thread::spawn(|| panic!("choked again")),
        ];
        assert_eq!(join_all(handles), Some(1));
        assert_eq!(join_all(vec![thread::spawn(|| {})]), None);
    }
}
