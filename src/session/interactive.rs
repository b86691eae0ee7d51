//! Interactive scraping session
//!
//! The session is a two-state machine. While **awaiting input** it reads a
//! line, treats `exit` (any case) as the end, skips blank lines, and hands
//! everything else to the retry runner as a candidate URL. It becomes
//! **terminated** on `exit`, on cancellation (Ctrl-C), or at end of input.

use crate::config::{Config, OutputConfig};
use crate::model::ProductRecord;
use crate::output::{format_banner, format_records_preview, CsvRecordWriter, RecordSink};
use crate::scrape::{RetryOutcome, RetryPolicy, RetryRunner, Scrape, ScrapePipeline};
use crate::session::console::Console;
use crate::url::validate_url;
use crate::ScrapeError;
use tokio_util::sync::CancellationToken;

/// Command that ends the session (case-insensitive)
pub const EXIT_COMMAND: &str = "exit";

/// Prompt shown before every read
pub const PROMPT: &str = "\nURL >>> ";

/// Practice page advertised in the banner
pub const EXAMPLE_URL: &str = "https://webscraper.io/test-sites/e-commerce/allinone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Terminated,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    ExitCommand,
    Interrupted,
    EndOfInput,
    InputError,
}

/// Final report of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Runs that extracted, displayed and saved records
    pub successful_runs: u64,
    pub reason: TerminationReason,
}

/// Display limits for the record preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    pub max_records: usize,
    pub description_chars: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_records: 5,
            description_chars: 100,
        }
    }
}

impl From<&OutputConfig> for PreviewSettings {
    fn from(config: &OutputConfig) -> Self {
        Self {
            max_records: config.preview_limit,
            description_chars: config.description_preview_chars,
        }
    }
}

/// What the loop should do after handling one line
enum Step {
    Continue,
    Stop(TerminationReason),
}

/// Console-driven scrape loop with a successful-run counter
pub struct InteractiveSession<C, S> {
    console: C,
    runner: RetryRunner<S>,
    sink: Box<dyn RecordSink>,
    cancel: CancellationToken,
    preview: PreviewSettings,
    state: SessionState,
    successful_runs: u64,
}

impl<C: Console> InteractiveSession<C, ScrapePipeline> {
    /// Builds a session with the HTTP pipeline and a CSV writer
    ///
    /// The output directory is created here if it does not exist.
    pub fn from_config(
        console: C,
        config: &Config,
        cancel: CancellationToken,
    ) -> Result<Self, ScrapeError> {
        let sink = CsvRecordWriter::new(&config.output.directory)?;
        tracing::info!("Output directory ready: {}", sink.dir().display());

        let pipeline = ScrapePipeline::from_config(&config.http)?;
        let runner = RetryRunner::new(
            pipeline,
            RetryPolicy::from(&config.retry),
            cancel.clone(),
        );

        Ok(Self::new(
            console,
            runner,
            Box::new(sink),
            cancel,
            PreviewSettings::from(&config.output),
        ))
    }
}

impl<C: Console, S: Scrape> InteractiveSession<C, S> {
    pub fn new(
        console: C,
        runner: RetryRunner<S>,
        sink: Box<dyn RecordSink>,
        cancel: CancellationToken,
        preview: PreviewSettings,
    ) -> Self {
        Self {
            console,
            runner,
            sink,
            cancel,
            preview,
            state: SessionState::AwaitingInput,
            successful_runs: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Runs the loop until the session terminates
    pub async fn run(&mut self) -> SessionSummary {
        for line in format_banner(EXAMPLE_URL) {
            self.console.print_line(&line);
        }

        let reason = loop {
            let read = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break TerminationReason::Interrupted,
                read = self.console.read_line(PROMPT) => read,
            };

            let line = match read {
                Ok(Some(line)) => line,
                Ok(None) => break TerminationReason::EndOfInput,
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break TerminationReason::InputError;
                }
            };

            match self.handle_line(line.trim()).await {
                Step::Continue => {}
                Step::Stop(reason) => break reason,
            }
        };

        self.terminate(reason)
    }

    async fn handle_line(&mut self, input: &str) -> Step {
        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            return Step::Stop(TerminationReason::ExitCommand);
        }

        if input.is_empty() {
            self.console.print_line("Please enter a URL");
            return Step::Continue;
        }

        match self.scrape_and_save(input).await {
            Ok(step) => step,
            Err(e) => {
                // Nothing escapes an iteration; the session keeps going
                tracing::error!("Unexpected error while handling {}: {}", input, e);
                self.console.print_line(&format!("An error occurred: {}", e));
                Step::Continue
            }
        }
    }

    async fn scrape_and_save(&mut self, input: &str) -> Result<Step, ScrapeError> {
        if let Err(e) = validate_url(input) {
            self.console.print_line(&format!("✗ {}", e));
            return Ok(Step::Continue);
        }
        self.console.print_line("✓ URL format is valid");

        match self.runner.run_with_retry(input).await {
            RetryOutcome::Success { records, stats } => {
                tracing::info!(
                    attempts = stats.attempts,
                    "Scrape succeeded: {}",
                    stats.records
                );
                self.successful_runs += 1;
                self.show_records(&records);
                // Counted before persisting; a save error goes to the catch-all
                self.save_records(&records)?;
                Ok(Step::Continue)
            }
            RetryOutcome::Exhausted { attempts, last_error } => {
                self.console.print_line(&format!(
                    "✗ All {} attempts failed{}",
                    attempts,
                    last_error
                        .map(|e| format!(" (last error: {})", e))
                        .unwrap_or_default()
                ));
                self.console.print_line("Scraping failed");
                Ok(Step::Continue)
            }
            RetryOutcome::Cancelled { .. } => Ok(Step::Stop(TerminationReason::Interrupted)),
        }
    }

    fn show_records(&mut self, records: &[ProductRecord]) {
        let lines = format_records_preview(
            records,
            self.preview.max_records,
            self.preview.description_chars,
        );
        for line in lines {
            self.console.print_line(&line);
        }
    }

    /// Writes the batch and prints the readback report
    ///
    /// Write failures propagate; a failed readback is only reported.
    fn save_records(&mut self, records: &[ProductRecord]) -> Result<(), ScrapeError> {
        let path = self.sink.write_records(records, None).map_err(|e| {
            tracing::error!("File save error: {}", e);
            e
        })?;
        self.console
            .print_line(&format!("✓ Data saved: {} ({} records)", path.display(), records.len()));

        match self.sink.verify(&path) {
            Ok(report) => {
                for line in report.to_string().lines() {
                    self.console.print_line(line);
                }
                self.console.print_line("✓ File saved correctly");
            }
            Err(e) => {
                tracing::warn!("File check error: {}", e);
                self.console.print_line(&format!("✗ File check error: {}", e));
            }
        }
        Ok(())
    }

    fn terminate(&mut self, reason: TerminationReason) -> SessionSummary {
        self.state = SessionState::Terminated;

        let message = match reason {
            TerminationReason::Interrupted => "Program interrupted",
            _ => "Ending scraping session",
        };
        self.console.print_line("");
        self.console.print_line(message);
        self.console
            .print_line(&format!("Total runs: {}", self.successful_runs));

        tracing::info!(?reason, successful_runs = self.successful_runs, "Session terminated");
        SessionSummary {
            successful_runs: self.successful_runs,
            reason,
        }
    }
}
