//! Repository listings and commit history.

use log::debug;
use serde::Deserialize;

use crate::SextantError;

/// Whether an entry is a file or a directory.
///
/// Git object names are accepted too: `blob` reads as a file, `dir` and
/// `tree` as a directory. Anything else, including a missing type, is a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum EntryKind {
    #[default]
    File,
    Tree,
}

impl From<String> for EntryKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "tree" | "dir" => Self::Tree,
            _ => Self::File,
        }
    }
}

impl EntryKind {
    /// Returns `folder` or `file`, as shown to users
    pub fn display_name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Tree => "folder",
        }
    }
}

/// One path of a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    path: String,
    #[serde(rename = "type", default)]
    kind: EntryKind,
    #[serde(default)]
    size: Option<u64>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind, size: u64) -> Self {
        Self {
            path: path.into(),
            kind,
            size: Some(size),
        }
    }

    /// Shorthand for a file entry
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self::new(path, EntryKind::File, size)
    }

    /// Shorthand for a directory entry
    pub fn tree(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Tree, 0)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Size in bytes, 0 when unknown
    pub fn size(&self) -> u64 {
        self.size.unwrap_or(0)
    }
}

/// A commit, used for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Commit {
    sha: String,
    author: Option<String>,
    message: String,
    date: String,
}

impl Commit {
    pub fn sha(&self) -> &str {
        &self.sha
    }

    /// Author name, `"Unknown"` when absent or empty
    pub fn display_author(&self) -> &str {
        self.author
            .as_deref()
            .filter(|author| !author.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DependencyGraph {
    repo: Option<String>,
    branch: Option<String>,
    entries: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRepository {
    Entries(Vec<FileEntry>),
    Analysis {
        #[serde(default)]
        dependency_graph: DependencyGraph,
        #[serde(default)]
        commits: Vec<Commit>,
    },
}

/// A repository analysis: its file listing plus recent commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySnapshot {
    repo: Option<String>,
    branch: Option<String>,
    entries: Vec<FileEntry>,
    commits: Vec<Commit>,
}

impl RepositorySnapshot {
    pub fn new(entries: Vec<FileEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Decodes either a bare entry array or a full analysis object
    /// `{dependency_graph: {entries}, commits}`.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Json`] when the input matches neither shape.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant::model::repo::RepositorySnapshot;
    /// let bare = RepositorySnapshot::from_json(r#"[{"path": "src/a.js", "type": "blob"}]"#).unwrap();
    /// assert_eq!(bare.entries().len(), 1);
    ///
    /// let full = RepositorySnapshot::from_json(
    ///     r#"{"dependency_graph": {"entries": []}, "commits": [{"sha": "abc", "message": "init"}]}"#,
    /// ).unwrap();
    /// assert_eq!(full.commits()[0].display_author(), "Unknown");
    /// ```
    pub fn from_json(source: &str) -> Result<Self, SextantError> {
        let snapshot = match serde_json::from_str::<RawRepository>(source)? {
            RawRepository::Entries(entries) => Self::new(entries),
            RawRepository::Analysis {
                dependency_graph,
                commits,
            } => Self {
                repo: dependency_graph.repo,
                branch: dependency_graph.branch,
                entries: dependency_graph.entries,
                commits,
            },
        };
        debug!(
            entries = snapshot.entries.len(),
            commits = snapshot.commits.len();
            "Repository decoded"
        );
        Ok(snapshot)
    }

    /// `owner/name` of the analyzed repository, when known
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }
}
