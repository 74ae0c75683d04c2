//! Line model of the shared listen file.
//!
//! The file holds one `listen <port>;` line per provisioned port next to any
//! static scaffolding the deployment needs (comments, `listen 443 ssl;`, ...).
//! Only lines that are exactly a canonical directive are managed; every other
//! line is kept verbatim and in place, terminator included. Appended
//! directives use the file's first line ending (`\n` for a new file).

use crate::domain::entities::ListenPort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenLine {
    Directive(ListenPort),
    Other(String),
}

impl ListenLine {
    fn parse(line: &str) -> Self {
        Self::directive_port(line)
            .map(Self::Directive)
            .unwrap_or_else(|| Self::Other(line.to_string()))
    }

    /// `listen 8;` is a directive, `listen 80;` for port 8 is not, and neither are
    /// `listen 080;`, `listen 443 ssl;` or an indented line.
    fn directive_port(line: &str) -> Option<ListenPort> {
        let digits = line.strip_prefix("listen ")?.strip_suffix(';')?;
        let port: ListenPort = digits.parse().ok()?;
        (port.to_string() == digits).then_some(port)
    }
}

/// Terminator of one line as read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
    /// Last line of a file without a trailing newline.
    None,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

/// Parsed listen file. Rendering an unmodified file reproduces it byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenFile {
    lines: Vec<(ListenLine, LineEnding)>,
}

impl ListenFile {
    pub fn parse(text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|raw| {
                let (content, ending) = if let Some(content) = raw.strip_suffix("\r\n") {
                    (content, LineEnding::CrLf)
                } else if let Some(content) = raw.strip_suffix('\n') {
                    (content, LineEnding::Lf)
                } else {
                    (raw, LineEnding::None)
                };
                (ListenLine::parse(content), ending)
            })
            .collect();
        Self { lines }
    }

    pub fn contains(&self, port: ListenPort) -> bool {
        self.lines
            .iter()
            .any(|(line, _)| matches!(line, ListenLine::Directive(p) if *p == port))
    }

    /// Managed ports in file order, duplicates included.
    pub fn ports(&self) -> Vec<ListenPort> {
        self.lines
            .iter()
            .filter_map(|(line, _)| match line {
                ListenLine::Directive(port) => Some(*port),
                ListenLine::Other(_) => None,
            })
            .collect()
    }

    pub fn append(&mut self, port: ListenPort) {
        let ending = self
            .lines
            .first()
            .map(|(_, ending)| *ending)
            .filter(|ending| *ending != LineEnding::None)
            .unwrap_or(LineEnding::Lf);
        if let Some((_, last)) = self.lines.last_mut() {
            if *last == LineEnding::None {
                *last = ending;
            }
        }
        self.lines.push((ListenLine::Directive(port), ending));
    }

    /// Removes every directive for `port` and returns how many were dropped.
    pub fn remove_all(&mut self, port: ListenPort) -> usize {
        let before = self.lines.len();
        self.lines
            .retain(|(line, _)| !matches!(line, ListenLine::Directive(p) if *p == port));
        before - self.lines.len()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (line, ending) in &self.lines {
            match line {
                ListenLine::Directive(port) => out.push_str(&port.directive()),
                ListenLine::Other(text) => out.push_str(text),
            }
            out.push_str(ending.as_str());
        }
        out
    }
}
