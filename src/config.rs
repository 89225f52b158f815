//! Document configuration loading.
//!
//! A batch is described by a `paper-press.toml` file holding one `[[document]]`
//! table per output PDF. The file is read once at start-up into a
//! [`DocumentSet`], which is then handed to the batch runner and never mutated.
//! Relative paths inside the file are resolved against the directory the file
//! lives in, so a batch can be run from anywhere.

use anyhow::{anyhow, bail, Context, Result};
use derive_builder::Builder;
use globset::{Glob, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "paper-press.toml";

/// One markdown document to be turned into a PDF.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct DocumentConfig {
    /// Identifier, unique within the set
    pub name: String,
    /// Source markdown file
    pub input: PathBuf,
    /// Destination PDF file; its parent directory is created when missing
    pub output: PathBuf,
    pub title: String,
    pub subtitle: String,
    /// Short badge shown on the cover
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    pub cover_line: Option<String>,
    /// Text shown in the footer of every page
    pub footer_text: String,
    /// Raster image shown beside the footer text, when it can be read
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    pub footer_logo: Option<PathBuf>,
    /// Raster image used as a full-page background
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    pub watermark: Option<PathBuf>,
}

impl DocumentConfig {
    /// Anchor every relative path at `base`.
    fn resolved_against(mut self, base: &Path) -> DocumentConfig {
        self.input = base.join(&self.input);
        self.output = base.join(&self.output);
        self.footer_logo = self.footer_logo.map(|p| base.join(p));
        self.watermark = self.watermark.map(|p| base.join(p));
        self
    }
}

/// On-disk layout of the configuration file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub document: Vec<DocumentConfig>,
}

/// An ordered, read-only list of document configurations.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<DocumentConfig>,
}

impl DocumentSet {
    /// Build a set, rejecting duplicate document names.
    pub fn new(documents: Vec<DocumentConfig>) -> Result<DocumentSet> {
        let mut seen = HashSet::new();
        for doc in documents.iter() {
            if !seen.insert(doc.name.as_str()) {
                bail!("Duplicate document name '{}'", doc.name);
            }
        }
        Ok(DocumentSet { documents })
    }

    /// Load a set from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DocumentSet> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let base = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::new(),
        };
        let base = if base.is_absolute() {
            base
        } else {
            std::env::current_dir()
                .with_context(|| "Failed to determine working directory")?
                .join(base)
        };

        DocumentSet::new(
            config
                .document
                .into_iter()
                .map(|doc| doc.resolved_against(&base))
                .collect(),
        )
    }

    /// Keep only the documents whose name matches one of the glob `patterns`.
    ///
    /// An empty pattern list selects everything. Patterns that leave nothing
    /// selected are an error, since the run would silently do nothing.
    pub fn select(&self, patterns: &[String]) -> Result<DocumentSet> {
        if patterns.is_empty() {
            return Ok(self.clone());
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(
                Glob::new(pattern)
                    .with_context(|| format!("Invalid document pattern: {}", pattern))?,
            );
        }
        let globs = builder
            .build()
            .with_context(|| "Failed to compile document patterns")?;

        let documents: Vec<DocumentConfig> = self
            .documents
            .iter()
            .filter(|doc| globs.is_match(&doc.name))
            .cloned()
            .collect();
        if documents.is_empty() {
            return Err(anyhow!(
                "No documents match [{}]",
                patterns.join("], [")
            ));
        }
        Ok(DocumentSet { documents })
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentConfig> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[document]]
name = "governed-execution"
input = "papers/governed-execution.md"
output = "out/governed-execution-v1.0.0.pdf"
title = "Governed Execution"
subtitle = "Artifact-Registered Workflows"
cover_line = "Implements: CGAE"
footer_text = "Governed by Keon"
footer_logo = "images/cube.png"

[[document]]
name = "cgae"
input = "/abs/cgae.md"
output = "out/cgae.pdf"
title = "Cryptographically Governed AI Execution"
subtitle = "A New Category"
footer_text = "Keon Systems"
watermark = "images/cube.png"
"#;

    fn doc(name: &str) -> DocumentConfig {
        DocumentConfigBuilder::default()
            .name(name)
            .input("in.md")
            .output("out.pdf")
            .title("Title")
            .subtitle("Subtitle")
            .footer_text("Footer")
            .build()
            .expect("can build document config")
    }

    #[test]
    fn can_parse_configuration() {
        let config: Configuration = toml::from_str(SAMPLE).expect("can parse sample");
        assert_eq!(config.document.len(), 2);

        let first = &config.document[0];
        assert_eq!(first.cover_line.as_deref(), Some("Implements: CGAE"));
        assert_eq!(first.footer_logo, Some(PathBuf::from("images/cube.png")));
        assert_eq!(first.watermark, None);

        let second = &config.document[1];
        assert_eq!(second.cover_line, None);
        assert_eq!(second.footer_logo, None);
        assert_eq!(second.watermark, Some(PathBuf::from("images/cube.png")));
    }

    #[test]
    fn load_resolves_paths_against_config_dir() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("paper-press.toml");
        std::fs::write(&path, SAMPLE).expect("can write config");

        let set = DocumentSet::load(&path).expect("can load config");
        let docs: Vec<&DocumentConfig> = set.iter().collect();
        assert_eq!(docs[0].name, "governed-execution");
        assert_eq!(
            docs[0].input,
            dir.path().join("papers/governed-execution.md")
        );
        assert_eq!(
            docs[0].footer_logo,
            Some(dir.path().join("images/cube.png"))
        );
        // absolute paths are left alone
        assert_eq!(docs[1].input, PathBuf::from("/abs/cgae.md"));
        assert_eq!(docs[1].watermark, Some(dir.path().join("images/cube.png")));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        assert!(DocumentSet::load(dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn load_fails_for_missing_required_field() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("paper-press.toml");
        std::fs::write(&path, "[[document]]\nname = \"x\"\n").expect("can write config");
        assert!(DocumentSet::load(&path).is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = DocumentSet::new(vec![doc("a"), doc("b"), doc("a")])
            .expect_err("duplicates are rejected");
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn select_keeps_order_and_matches_globs() {
        let set = DocumentSet::new(vec![doc("cgae"), doc("omega"), doc("cgae-draft")])
            .expect("can build set");

        let all = set.select(&[]).expect("empty selection keeps all");
        assert_eq!(all.len(), 3);

        let picked = set
            .select(&["cgae*".to_string()])
            .expect("can select by glob");
        let names: Vec<&str> = picked.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["cgae", "cgae-draft"]);
        // the original set is untouched
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn select_with_no_matches_is_an_error() {
        let set = DocumentSet::new(vec![doc("cgae")]).expect("can build set");
        assert!(set.select(&["nothing".to_string()]).is_err());
    }

    #[test]
    fn can_roundtrip_configuration() {
        let config = Configuration {
            document: vec![doc("a")],
        };
        let toml_str = toml::to_string(&config).expect("can serialize");
        let parsed: Configuration = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(parsed.document, config.document);
    }
}
