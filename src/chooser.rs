// src/chooser.rs
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// 从若干命名选项中选择一个，或回答是/否
pub trait Chooser {
    /// 返回所选选项的下标；选项为空或用户取消时返回None
    fn choose(&mut self, title: &str, options: &[String]) -> Result<Option<usize>>;

    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// 基于行输入的选择器，用于没有TUI的终端
pub struct LineChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 读取一行，EOF时返回None
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line.trim().to_string()))
        }
    }
}

impl<R: BufRead, W: Write> Chooser for LineChooser<R, W> {
    fn choose(&mut self, title: &str, options: &[String]) -> Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }

        writeln!(self.output, "{}", title)?;
        for (idx, option) in options.iter().enumerate() {
            writeln!(self.output, "[{}] {}", idx, option)?;
        }

        loop {
            write!(self.output, "Enter [#]: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };

            match line.parse::<usize>() {
                Ok(idx) if idx < options.len() => return Ok(Some(idx)),
                _ => writeln!(
                    self.output,
                    "Invalid index. Number must be between 0 and {}. Try again!",
                    options.len() - 1
                )?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        Ok(self
            .read_line()?
            .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false))
    }
}

/// 先使用命令行给出的预设答案，没有预设时交给内部选择器
pub struct PresetChooser {
    inner: Box<dyn Chooser>,
    choices: VecDeque<Option<String>>,
    confirmations: VecDeque<Option<bool>>,
}

impl PresetChooser {
    pub fn new(
        inner: Box<dyn Chooser>,
        choices: impl IntoIterator<Item = Option<String>>,
        confirmations: impl IntoIterator<Item = Option<bool>>,
    ) -> Self {
        Self {
            inner,
            choices: choices.into_iter().collect(),
            confirmations: confirmations.into_iter().collect(),
        }
    }
}

impl Chooser for PresetChooser {
    fn choose(&mut self, title: &str, options: &[String]) -> Result<Option<usize>> {
        if let Some(Some(preset)) = self.choices.pop_front() {
            if let Some(idx) = options.iter().position(|o| *o == preset) {
                info!(%preset, "{}", title);
                return Ok(Some(idx));
            }
            warn!(%preset, "Preset is not among the options, asking instead");
        }
        self.inner.choose(title, options)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        match self.confirmations.pop_front().flatten() {
            Some(answer) => Ok(answer),
            None => self.inner.confirm(question),
        }
    }
}
