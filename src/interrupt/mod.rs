use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Exit status of a session ended by Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    CancelGeneration,
    Exit,
}

/// Session-wide Ctrl-C routing. During a generation the signal cancels
/// it; anywhere else it ends the session.
pub struct Interrupts {
    generating: AtomicBool,
    cancel: watch::Sender<u64>,
}

impl Interrupts {
    pub fn new() -> Arc<Self> {
        let (cancel, _) = watch::channel(0);
        Arc::new(Self {
            generating: AtomicBool::new(false),
            cancel,
        })
    }

    pub fn on_signal(&self) -> SignalAction {
        if self.generating.load(Ordering::SeqCst) {
            self.cancel.send_modify(|n| *n += 1);
            SignalAction::CancelGeneration
        } else {
            SignalAction::Exit
        }
    }

    /// Marks a generation in flight until the returned scope is dropped.
    /// Signals delivered before this call do not cancel it.
    pub fn generation(&self) -> GenerationScope<'_> {
        let rx = self.cancel.subscribe();
        self.generating.store(true, Ordering::SeqCst);
        GenerationScope { owner: self, rx }
    }
}

pub struct GenerationScope<'a> {
    owner: &'a Interrupts,
    rx: watch::Receiver<u64>,
}

impl GenerationScope<'_> {
    pub async fn cancelled(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Drop for GenerationScope<'_> {
    fn drop(&mut self) {
        self.owner.generating.store(false, Ordering::SeqCst);
    }
}

/// Single Ctrl-C listener for the lifetime of the process.
pub fn install(interrupts: Arc<Interrupts>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                debug!("Ctrl-C listener unavailable: {e}");
                return;
            }
            if interrupts.on_signal() == SignalAction::Exit {
                println!();
                std::process::exit(EXIT_INTERRUPTED);
            }
        }
    });
}
