use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};

use libc::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::{debug, info};

use crate::error::{Error, Result};

// 哲学者たちに終了を伝えるフラグ
// 各哲学者はループの先頭でだけこれを見る
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    stopped: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    // 何度呼んでもよい
    // 最初にフラグを立てた呼び出しだけが true を返す
    pub fn signal(&self) -> bool {
        !self.stopped.swap(true, Ordering::AcqRel)
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }
}

// SIGINT / SIGTERM を受け取ったら shutdown を立てるスレッドを起動する
pub fn install_signal_handler(shutdown: Shutdown) -> Result<JoinHandle<()>> {
    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| Error::InitializationFailure(format!("registering signals: {e}")))?;

    thread::Builder::new()
        .name("signal".into())
        .spawn(move || {
            for sig in signals.forever() {
                if shutdown.signal() {
                    info!(signal = sig, "initiating shutdown");
                } else {
                    debug!(signal = sig, "shutdown already in progress");
                }
            }
        })
        .map_err(|e| Error::InitializationFailure(format!("spawning signal thread: {e}")))
}
