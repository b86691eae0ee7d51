//! Line-oriented console abstraction
//!
//! The session reads commands and prints results through this trait, so it
//! can run against a terminal or against scripted input.

use async_trait::async_trait;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// A prompt-and-read console
#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` and reads one line without its line terminator
    ///
    /// Returns `Ok(None)` at end of input.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Prints one line of output
    fn print_line(&mut self, line: &str);
}

/// Console on the process's stdin/stdout
pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }
        self.lines.next_line().await
    }

    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }
}
