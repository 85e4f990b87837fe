use serde::{Deserialize, Serialize};

/// A web page the service cited for the lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: Option<String>,
}

impl Source {
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.uri)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsResult {
    pub lines: Vec<String>,
    pub sources: Vec<Source>,
}

impl LyricsResult {
    pub fn from_text(text: &str, sources: Vec<Source>) -> Self {
        let lines = text
            .trim_matches(['\r', '\n'])
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();

        Self { lines, sources }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}
