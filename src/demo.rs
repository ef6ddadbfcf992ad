// =============================================================================
// Lesson walk-through: copy, member access, arrays, and a null dereference
// =============================================================================

use thiserror::Error;

use crate::config::{ConfigError, DemoConfig};
use crate::error::PointerError;
use crate::{SharedArray, SharedPtr};

#[derive(Error, Debug)]
pub enum DemoError {
    #[error(transparent)]
    Pointer(#[from] PointerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Object reached through member access in the lesson.
#[derive(Debug, Default)]
pub struct Greeter {
    calls: usize,
}

impl Greeter {
    pub fn touch(&mut self) {
        self.calls += 1;
    }

    pub fn show_message(&mut self, message: &str) -> String {
        self.calls += 1;
        format!("Message: {message}")
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Heading(String),
    Info(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct Report {
    lines: Vec<Line>,
}

impl Report {
    fn heading(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Heading(text.into()));
    }

    fn info(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Info(text.into()));
    }

    fn error(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Error(text.into()));
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

pub fn run(config: &DemoConfig) -> Result<Report, DemoError> {
    config.validate()?;
    let mut report = Report::default();

    report.heading("Shared pointer");
    let first = SharedPtr::new(config.value);
    report.info(format!("Value: {}", *first.get()?));
    report.info(format!("References: {}", first.strong_count()));

    let second = first.clone();
    report.info(format!(
        "References after copying the pointer: {}",
        first.strong_count()
    ));

    report.heading("Member access");
    let greeter = SharedPtr::new(Greeter::default());
    greeter.with_mut(Greeter::touch)?;
    let shown = greeter.with_mut(|g| g.show_message(&config.message))?;
    report.info(shown);
    report.info(format!("Calls: {}", greeter.with(Greeter::calls)?));

    report.heading("Shared array");
    let array = SharedArray::<i32>::with_len(config.array_len);
    for i in 0..array.len() {
        *array.index_mut(i)? = i32::try_from(i).unwrap_or(i32::MAX);
    }
    let items = array
        .to_vec()?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    report.info(format!("Array: {items}"));

    report.heading("Null pointer");
    let null: SharedPtr<i32> = SharedPtr::null();
    match null.get() {
        Ok(value) => report.info(format!("Value: {}", *value)),
        Err(err) => report.error(format!("Exception: {err}")),
    }

    drop(second);
    report.info(format!(
        "References after dropping the copy: {}",
        first.strong_count()
    ));

    log::info!("demo finished with {} lines", report.lines.len());
    Ok(report)
}
