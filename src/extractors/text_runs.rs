// src/extractors/text_runs.rs

use super::line_token::{classify_line, LineToken};

/// Statement lines paired one-to-one with their structural tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedLines {
    lines: Vec<String>,
    tokens: Vec<LineToken>,
}

impl TokenizedLines {
    /// Classifies every line.
    pub fn classify<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut out = Self::default();
        for line in lines {
            let line = line.as_ref();
            out.push(line.to_string(), classify_line(line));
        }
        out
    }

    fn push(&mut self, line: String, token: LineToken) {
        self.lines.push(line);
        self.tokens.push(token);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn tokens(&self) -> &[LineToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Collapses every maximal run of consecutive TEXT entries into a single TEXT
/// entry whose line is the run joined with spaces. Other entries pass through.
pub fn merge_text_runs(input: &TokenizedLines) -> TokenizedLines {
    let mut merged = TokenizedLines::default();
    let mut run: Vec<&str> = Vec::new();

    for (line, &token) in input.lines.iter().zip(&input.tokens) {
        if token == LineToken::Text {
            run.push(line);
            continue;
        }
        if !run.is_empty() {
            merged.push(run.join(" "), LineToken::Text);
            run.clear();
        }
        merged.push(line.clone(), token);
    }
    if !run.is_empty() {
        merged.push(run.join(" "), LineToken::Text);
    }

    tracing::debug!("Merged {} lines into {} segments", input.len(), merged.len());
    merged
}
