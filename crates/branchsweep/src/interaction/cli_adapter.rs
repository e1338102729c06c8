//! CLI adapter implementation using dialoguer for interactive prompts

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use console::Style;
use dialoguer::theme::Theme;
use dialoguer::{MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use branchsweep_core::interaction::{
    InteractionAdapter, InteractionError, InteractionResult, ProgressHandle,
};

use crate::colors::COLORS;

/// Set by the Ctrl+C handler
static CANCELLED: AtomicBool = AtomicBool::new(false);

fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Install the process-wide Ctrl+C handler once
fn setup_ctrl_c_handler() {
    static HANDLER_SET: AtomicBool = AtomicBool::new(false);

    if HANDLER_SET.swap(true, Ordering::SeqCst) {
        return;
    }

    if let Err(e) = ctrlc::set_handler(move || {
        CANCELLED.store(true, Ordering::SeqCst);
        // Restore the cursor dialoguer hides while a prompt is active
        let _ = console::Term::stderr().show_cursor();
        eprintln!();
    }) {
        tracing::warn!(error = %e, "could not set Ctrl+C handler");
    }
}

/// Branch picker theme: one row per branch, separated by a blank line
struct PickerTheme {
    prompt: Style,
    cursor: Style,
    idle: Style,
    hint: Style,
}

impl PickerTheme {
    const MULTI_SELECT_HINT: &'static str = "(space to toggle, enter to confirm)";

    fn new() -> Self {
        Self {
            prompt: Style::new().cyan().bold(),
            cursor: Style::new().cyan(),
            idle: Style::new(),
            hint: Style::new().dim(),
        }
    }

    /// `? <prompt>` followed by an optional answer or hint
    fn header(&self, f: &mut dyn FmtWrite, prompt: &str, tail: Option<String>) -> std::fmt::Result {
        write!(f, "{}", self.prompt.apply_to(format!("? {}", prompt)))?;
        match tail {
            Some(tail) => write!(f, " {}", tail),
            None => Ok(()),
        }
    }

    /// One picker row; `checked` is `None` for single-choice lists
    fn row(
        &self,
        f: &mut dyn FmtWrite,
        text: &str,
        checked: Option<bool>,
        active: bool,
    ) -> std::fmt::Result {
        let (style, lead) = if active {
            (&self.cursor, "  > ")
        } else {
            (&self.idle, "    ")
        };
        let mut body = String::new();
        if let Some(checked) = checked {
            body.push_str(if checked { "[✓] " } else { "[ ] " });
        }
        body.push_str(text);
        write!(f, "\n{}{}", style.apply_to(lead), style.apply_to(body))
    }
}

impl Theme for PickerTheme {
    fn format_select_prompt(&self, f: &mut dyn FmtWrite, prompt: &str) -> std::fmt::Result {
        self.header(f, prompt, None)
    }

    fn format_select_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        sel: &str,
    ) -> std::fmt::Result {
        self.header(f, prompt, Some(self.cursor.apply_to(sel).to_string()))
    }

    fn format_select_prompt_item(
        &self,
        f: &mut dyn FmtWrite,
        text: &str,
        active: bool,
    ) -> std::fmt::Result {
        self.row(f, text, None, active)
    }

    fn format_multi_select_prompt(&self, f: &mut dyn FmtWrite, prompt: &str) -> std::fmt::Result {
        let hint = self.hint.apply_to(Self::MULTI_SELECT_HINT).to_string();
        self.header(f, prompt, Some(hint))
    }

    fn format_multi_select_prompt_selection(
        &self,
        f: &mut dyn FmtWrite,
        prompt: &str,
        selections: &[&str],
    ) -> std::fmt::Result {
        let picked = self.cursor.apply_to(selections.join(", ")).to_string();
        self.header(f, prompt, Some(picked))
    }

    fn format_multi_select_prompt_item(
        &self,
        f: &mut dyn FmtWrite,
        text: &str,
        checked: bool,
        active: bool,
    ) -> std::fmt::Result {
        self.row(f, text, Some(checked), active)
    }
}

/// Terminal implementation of [`InteractionAdapter`]
pub struct CliAdapter {
    is_tty: bool,
    progress_counter: AtomicU64,
    active_progress: Arc<Mutex<HashMap<u64, ProgressBar>>>,
}

impl CliAdapter {
    pub fn new() -> Self {
        Self::with_tty(std::io::stdin().is_terminal() && std::io::stderr().is_terminal())
    }

    pub fn with_tty(is_tty: bool) -> Self {
        setup_ctrl_c_handler();
        Self {
            is_tty,
            progress_counter: AtomicU64::new(0),
            active_progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    fn check_cancelled(&self) -> InteractionResult<()> {
        if is_cancelled() {
            Err(InteractionError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn require_tty(&self) -> InteractionResult<()> {
        if !self.is_tty {
            Err(InteractionError::NonTty)
        } else {
            Ok(())
        }
    }

    fn convert_dialoguer_error(err: dialoguer::Error) -> InteractionError {
        if is_cancelled() {
            return InteractionError::Cancelled;
        }
        match err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                InteractionError::Cancelled
            }
            other => InteractionError::Io(other.to_string()),
        }
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Default for CliAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionAdapter for CliAdapter {
    fn ask_select(&self, prompt: &str, options: &[&str]) -> InteractionResult<usize> {
        self.require_tty()?;
        self.check_cancelled()?;

        if options.is_empty() {
            return Err(InteractionError::InvalidInput(
                "options cannot be empty".to_string(),
            ));
        }

        let theme = PickerTheme::new();
        println!();

        Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(Self::convert_dialoguer_error)?
            .ok_or(InteractionError::Cancelled)
    }

    fn ask_multi_select(&self, prompt: &str, options: &[&str]) -> InteractionResult<Vec<usize>> {
        self.require_tty()?;
        self.check_cancelled()?;

        if options.is_empty() {
            return Err(InteractionError::InvalidInput(
                "options cannot be empty".to_string(),
            ));
        }

        let theme = PickerTheme::new();
        println!();

        MultiSelect::with_theme(&theme)
            .with_prompt(prompt)
            .items(options)
            .interact_opt()
            .map_err(Self::convert_dialoguer_error)?
            .ok_or(InteractionError::Cancelled)
    }

    fn start_progress(&self, message: &str) -> ProgressHandle {
        let id = self.progress_counter.fetch_add(1, Ordering::SeqCst);
        let pb = self.spinner(message);

        if let Ok(mut progress_map) = self.active_progress.lock() {
            progress_map.insert(id, pb);
        }

        ProgressHandle::new(id, message)
    }

    fn end_progress(&self, handle: ProgressHandle, success: bool) {
        let Ok(mut progress_map) = self.active_progress.lock() else {
            return;
        };
        let Some(pb) = progress_map.remove(&handle.id()) else {
            return;
        };

        let elapsed = format!("{:.1}s", pb.elapsed().as_secs_f64());
        pb.finish_and_clear();
        if !self.is_tty {
            return;
        }

        let msg = handle.message();
        if success {
            eprintln!("{} {} [{}]", "✓".green(), msg, elapsed);
        } else {
            eprintln!("{} {} [{}]", "✗".red(), msg.red(), elapsed);
        }
    }

    fn print_info(&self, message: &str) {
        println!("{}", message);
        let _ = std::io::stdout().flush();
    }

    fn print_warning(&self, message: &str) {
        println!(
            "{} {}",
            "warning:".style(COLORS.warning).bold(),
            message.style(COLORS.warning)
        );
        let _ = std::io::stdout().flush();
    }

    fn print_error(&self, message: &str) {
        eprintln!(
            "{} {}",
            "error:".style(COLORS.fail).bold(),
            message.style(COLORS.fail)
        );
        let _ = std::io::stderr().flush();
    }

    fn print_success(&self, message: &str) {
        println!(
            "{} {}",
            "✓".style(COLORS.success),
            message.style(COLORS.success)
        );
        let _ = std::io::stdout().flush();
    }
}
