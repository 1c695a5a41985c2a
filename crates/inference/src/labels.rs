use anyhow::Context;
use std::fs;
use std::path::Path;

/// Class names indexed by model output position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading labels from {}", path.display()))?;
        let labels = Self::parse(&text);
        if labels.is_empty() {
            anyhow::bail!("labels file {} contains no labels", path.display());
        }
        Ok(labels)
    }

    /// One label per line. Blank lines are skipped and a leading WordNet id
    /// (`n01443537 goldfish, Carassius auratus`) is dropped.
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_synset_id(line).to_string())
            .collect();
        Self { names }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Labels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

fn strip_synset_id(line: &str) -> &str {
    match line.split_once(char::is_whitespace) {
        Some((id, rest))
            if id.len() == 9
                && id.starts_with('n')
                && id[1..].bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest.trim_start()
        }
        _ => line,
    }
}
