use std::thread;

use tracing::debug;

use crate::notify::Event;
use crate::pace::Pace;
use crate::shutdown::Shutdown;
use crate::table::Table;

pub struct Philosopher {
    id: usize,
    table: Table,
    shutdown: Shutdown,
    pace: Pace,
}

impl Philosopher {
    pub fn new(id: usize, table: Table, shutdown: Shutdown, pace: Pace) -> Self {
        assert!(id < table.len(), "philosopher {id} has no seat");
        Philosopher {
            id,
            table,
            shutdown,
            pace,
        }
    }

    // 考える -> 箸を取る -> 食べる -> 箸を置く を終了が伝えられるまで繰り返す
    // 終了フラグはループの先頭でしか見ないので、待機中の request_to_eat は最後まで終える
    pub fn run(&self) {
        debug!(philosopher = self.id, "starting");
        let mut meals: u64 = 0;

        while self.shutdown.is_running() {
            self.table.emit(self.id, Event::Thinking);
            thread::sleep(self.pace.think());

            debug!(philosopher = self.id, "requesting forks");
            self.table.request_to_eat(self.id);

            self.table.emit(self.id, Event::Eating);
            thread::sleep(self.pace.eat());

            debug!(philosopher = self.id, "releasing forks");
            self.table.finish_eating(self.id);
            meals += 1;
        }

        debug!(philosopher = self.id, meals, "leaving the table");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::notify::Recorder;
    use crate::table::State;

    fn quick() -> Pace {
        let ms = Duration::from_millis;
        Pace::new(ms(0)..=ms(1), ms(0)..=ms(1)).unwrap()
    }

    #[test]
    fn test_stopped_before_start_does_nothing() {
        let recorder = Arc::new(Recorder::new());
        let table = Table::with_notify(3, recorder.clone()).unwrap();
        let shutdown = Shutdown::new();
        shutdown.signal();

        Philosopher::new(1, table.clone(), shutdown, quick()).run();
        assert!(recorder.events().is_empty());
        assert_eq!(table.snapshot(), vec![State::Thinking; 3]);
    }

    #[test]
    fn test_alone_at_the_table() {
        let recorder = Arc::new(Recorder::new());
        let table = Table::with_notify(1, recorder.clone()).unwrap();
        let shutdown = Shutdown::new();
        let philosopher = Philosopher::new(0, table.clone(), shutdown.clone(), quick());

        let handle = thread::spawn(move || philosopher.run());
        thread::sleep(Duration::from_millis(50));
        shutdown.signal();
        handle.join().unwrap();

        let events = recorder.events_of(0);
        // 1 人なら待たされることはない
        assert!(!events.contains(&Event::Waiting));
        assert!(events.iter().filter(|&&e| e == Event::Eating).count() >= 2);
        assert_eq!(table.teardown().unwrap(), vec![State::Thinking]);
    }

    #[test]
    #[should_panic(expected = "has no seat")]
    fn test_id_out_of_range() {
        let table = Table::new(2).unwrap();
        Philosopher::new(2, table, Shutdown::new(), quick());
    }
}
