use crate::error::{InstallerError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    prompting: Arc<AtomicBool>,
}

/// Clears the prompting flag however the prompt ends.
struct PromptingGuard<'a>(&'a AtomicBool);

impl Drop for PromptingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let message_shown = AtomicBool::new(false);
        let prompting = Arc::new(AtomicBool::new(false));

        let running_clone = running.clone();
        let prompting_clone = prompting.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);

            // A blocked read never reaches the next shutdown check
            if prompting_clone.load(Ordering::SeqCst) {
                eprintln!("\n🛑 Cancelled.");
                std::process::exit(130);
            }

            if !message_shown.swap(true, Ordering::SeqCst) {
                eprintln!("\n🛑 Stopping after the current step... (press Ctrl+C again to force exit)");
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(130);
            }
        })
        .map_err(|e| InstallerError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self {
            running,
            prompting,
        })
    }

    /// Create a GracefulShutdown instance for testing (no signal handler registration)
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            prompting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Flag shared with long-running work such as the archive download.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(InstallerError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Runs `operation` while it waits for user input. A Ctrl+C meanwhile
    /// exits the process instead of waiting for the next step.
    pub fn while_prompting<F, R>(&self, operation: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.prompting.store(true, Ordering::SeqCst);
        let _guard = PromptingGuard(&self.prompting);
        operation()
    }

    pub fn is_prompting(&self) -> bool {
        self.prompting.load(Ordering::SeqCst)
    }

    pub fn with_shutdown_check<F, R>(&self, operation: F) -> Result<R>
    where
        F: FnOnce() -> Result<R>,
    {
        self.check_shutdown()?;
        let result = operation().map_err(|e| {
            // A step interrupted by Ctrl+C reports the interruption, not its own failure
            if !self.is_running() {
                InstallerError::Cancelled
            } else {
                e
            }
        })?;
        self.check_shutdown()?;
        Ok(result)
    }
}
