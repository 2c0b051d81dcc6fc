use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vidhi_core::ModelOption;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const BODY: Color = Color::Cyan;
    const WARNING: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

/// Formats reports, answers and errors for the terminal.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, title: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{title}\n")),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_body(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::BODY),
            Print(format!("{}\n", text.trim_end())),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_warning(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::WARNING),
            Print(format!("{message}\n")),
            ResetColor,
        )?;
        Ok(())
    }

    /// Errors go to stderr with the suggested next step underneath.
    pub fn print_error(&self, message: &str, remedy: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("[error: {message}]\n")),
            SetForegroundColor(Colors::DIM),
            Print(format!("  {remedy}\n")),
            ResetColor,
        )?;
        Ok(())
    }

    pub fn print_models(&self, models: &[ModelOption]) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("Models:\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("{:<10} {:<20} {}\n", "CHOICE", "MODEL", "NOTE")),
            Print(format!("{}\n", "-".repeat(72))),
            ResetColor,
        )?;
        for m in models {
            let marker = if m.default { " (default)" } else { "" };
            execute!(
                stdout,
                Print(format!("{:<10} {:<20} {}{}\n", m.choice, m.model, m.note, marker)),
            )?;
        }
        Ok(())
    }

    pub fn print_examples(&self, questions: &[&str]) -> Result<()> {
        self.print_header("Example questions:")?;
        let mut stdout = io::stdout();
        for (i, q) in questions.iter().enumerate() {
            execute!(stdout, Print(format!("{:>2}. {q}\n", i + 1)))?;
        }
        Ok(())
    }

    /// Show a spinner while a completion call is in flight.
    pub fn start_spinner(&self, message: &str) -> Result<SpinnerHandle> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::DIM),
            Print(format!("{message} ")),
            ResetColor,
        )?;
        stderr.flush()?;

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = std::thread::spawn(move || {
            let frames = ['|', '/', '-', '\\'];
            let mut i = 0;
            while running_clone.load(Ordering::SeqCst) {
                let mut stderr = io::stderr();
                execute!(
                    stderr,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("\r{} ", frames[i % frames.len()])),
                    ResetColor,
                )
                .ok();
                stderr.flush().ok();
                i += 1;
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            let mut stderr = io::stderr();
            execute!(stderr, Print("\r  \r")).ok();
            stderr.flush().ok();
        });

        Ok(SpinnerHandle {
            running,
            thread: Some(handle),
        })
    }
}

/// Stops the spinner thread when dropped or stopped explicitly.
pub struct SpinnerHandle {
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SpinnerHandle {
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.halt();
    }
}
