use std::sync::{Mutex, PoisonError};

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Thinking,
    Waiting,
    Eating,
}

// 哲学者の様子の出力先
// Waiting はテーブルのロック獲得中に呼ばれるので、テーブルを触ってはいけない
pub trait Notify: Send + Sync {
    fn notify(&self, id: usize, event: Event);
}

// tracing に流す
#[derive(Debug, Default)]
pub struct LogNotify;

impl Notify for LogNotify {
    fn notify(&self, id: usize, event: Event) {
        match event {
            Event::Thinking => info!(philosopher = id, "contemplating"),
            Event::Waiting => info!(philosopher = id, "waiting for forks"),
            Event::Eating => info!(philosopher = id, "dining"),
        }
    }
}

#[derive(Debug, Default)]
pub struct NullNotify;

impl Notify for NullNotify {
    fn notify(&self, _id: usize, _event: Event) {}
}

// 発生順にイベントを記録する
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<(usize, Event)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(usize, Event)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // id 番目の哲学者のイベントだけを取り出す
    pub fn events_of(&self, id: usize) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|&(i, _)| i == id)
            .map(|(_, e)| e)
            .collect()
    }
}

impl Notify for Recorder {
    fn notify(&self, id: usize, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, event));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_recorder_keeps_order() {
        let recorder = Recorder::new();
        recorder.notify(1, Event::Thinking);
        recorder.notify(0, Event::Waiting);
        recorder.notify(1, Event::Eating);

        assert_eq!(
            recorder.events(),
            vec![(1, Event::Thinking), (0, Event::Waiting), (1, Event::Eating)]
        );
        assert_eq!(recorder.events_of(1), vec![Event::Thinking, Event::Eating]);
    }
}
