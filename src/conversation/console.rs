use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::error::Result;

const PROMPT: &str = ">>> ";

/// Line-based operator I/O
pub trait Console {
    /// Show an agent message
    fn say(&mut self, text: &str);

    /// Show a secondary notice (re-prompts, progress summaries)
    fn notice(&mut self, text: &str);

    /// Read one line; `None` once input is exhausted
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// Console on the process's stdin/stdout
pub struct StdConsole {
    stdin: io::StdinLock<'static>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn notice(&mut self, text: &str) {
        println!("{}", text.dimmed());
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        print!("{}", PROMPT.cyan());
        io::stdout().flush()?;

        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Console fed from a fixed script; records everything shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    shown: Vec<String>,
    reads: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            shown: Vec::new(),
            reads: 0,
        }
    }

    /// Everything shown so far, in order
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Number of read attempts, including the one that hit end of input
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn notice(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.reads += 1;
        Ok(self.input.pop_front())
    }
}
