use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{Error, Result};
use crate::notify::{Event, Notify, NullNotify};

// 哲学者の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Thinking,
    Hungry,
    Eating,
}

fn left(n: usize, id: usize) -> usize {
    (id + n - 1) % n
}

fn right(n: usize, id: usize) -> usize {
    (id + 1) % n
}

// 1 人や 2 人のテーブルでは left/right が自分自身や同じ相手を指す
// 自分自身は隣人として数えない
fn neighbor_eating(states: &[State], id: usize) -> bool {
    let n = states.len();
    [left(n, id), right(n, id)]
        .into_iter()
        .any(|i| i != id && states[i] == State::Eating)
}

// 隣り合う 2 人が同時に Eating になっていないか
pub fn is_consistent(states: &[State]) -> bool {
    (0..states.len()).all(|i| states[i] != State::Eating || !neighbor_eating(states, i))
}

// ロックで保護される状態配列
// ここのメソッドはすべてロック獲得中にのみ呼ばれる
#[derive(Debug)]
struct Seats {
    states: Vec<State>,
}

impl Seats {
    fn left(&self, id: usize) -> usize {
        left(self.states.len(), id)
    }

    fn right(&self, id: usize) -> usize {
        right(self.states.len(), id)
    }

    // id 番目の哲学者が食事を始められるなら Eating にする
    // 書き換えるのは states[id] だけ
    fn admit(&mut self, id: usize) -> bool {
        if self.states[id] != State::Hungry || neighbor_eating(&self.states, id) {
            return false;
        }

        self.states[id] = State::Eating;
        debug_assert!(
            is_consistent(&self.states),
            "adjacent philosophers eating: {:?}",
            self.states
        );
        true
    }
}

// モニタ
// 状態配列は 1 つのミューテックスで守り、哲学者ごとに条件変数を 1 つ持つ
#[derive(Clone)]
pub struct Table {
    seats: Arc<Mutex<Seats>>,
    slots: Arc<Vec<Condvar>>,
    notify: Arc<dyn Notify>,
}

impl Table {
    pub fn new(count: i64) -> Result<Self> {
        Self::with_notify(count, Arc::new(NullNotify))
    }

    pub fn with_notify(count: i64, notify: Arc<dyn Notify>) -> Result<Self> {
        if count <= 0 {
            return Err(Error::InvalidArgument(count));
        }
        let n = usize::try_from(count)
            .map_err(|_| Error::InitializationFailure(format!("{count} seats do not fit")))?;

        let mut states = Vec::new();
        states
            .try_reserve_exact(n)
            .map_err(|e| Error::InitializationFailure(e.to_string()))?;
        states.resize(n, State::Thinking);

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(n)
            .map_err(|e| Error::InitializationFailure(e.to_string()))?;
        slots.extend((0..n).map(|_| Condvar::new()));

        Ok(Table {
            seats: Arc::new(Mutex::new(Seats { states })),
            slots: Arc::new(slots),
            notify,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn state(&self, id: usize) -> State {
        self.lock().states[id]
    }

    pub fn snapshot(&self) -> Vec<State> {
        self.lock().states.clone()
    }

    pub(crate) fn emit(&self, id: usize, event: Event) {
        self.notify.notify(id, event);
    }

    // 箸を取る
    // 取れなければ自分の条件変数で待機する
    pub fn request_to_eat(&self, id: usize) {
        let mut seats = self.lock();
        seats.states[id] = State::Hungry;
        self.admit(&mut seats, id);

        // 起こされても Eating になっているとは限らないので毎回確認する
        while seats.states[id] != State::Eating {
            self.notify.notify(id, Event::Waiting);
            seats = self.slots[id]
                .wait(seats)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    // 箸を置き、左右の哲学者に食事の機会を与える
    pub fn finish_eating(&self, id: usize) {
        let mut seats = self.lock();
        seats.states[id] = State::Thinking;

        let left = seats.left(id);
        let right = seats.right(id);
        self.admit(&mut seats, left);
        self.admit(&mut seats, right);
    }

    // 最後のハンドルを消費して最終状態を返す
    // 他のハンドルが残っている (まだ join していない哲学者がいる) 場合はエラー
    pub fn teardown(self) -> Result<Vec<State>> {
        let seats = Arc::try_unwrap(self.seats)
            .map_err(|seats| Error::StillShared(Arc::strong_count(&seats) - 1))?;
        let seats = seats.into_inner().unwrap_or_else(PoisonError::into_inner);
        debug!(seats = seats.states.len(), "table torn down");
        Ok(seats.states)
    }

    // 状態の書き込みは 1 要素ずつなので、poison されても配列が壊れることはない
    fn lock(&self) -> MutexGuard<'_, Seats> {
        self.seats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self, seats: &mut Seats, id: usize) {
        if seats.admit(id) {
            debug!(philosopher = id, "can now eat");
            self.slots[id].notify_one();
        }
    }
}
