//! Directory trees built through the hierarchy builder.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::balance::{BalanceSettings, HierarchyBuilder};
use crate::error::{Error, Result};
use crate::tree::{Color, Node, NodeKind, NodeStyle};
use crate::walker::MAX_DEPTH_LIMIT;

/// Default number of listed directory levels.
pub const DEFAULT_FILES_DEPTH: usize = 3;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Size in bytes (0 for directories).
    pub len: u64,
    /// Whether the entry is hidden.
    pub hidden: bool,
}

impl DirEntryInfo {
    /// Describes a file; names starting with `.` are hidden.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, len: u64) -> Self {
        Self::from_path(path.into(), false, len)
    }

    /// Describes a directory; names starting with `.` are hidden.
    #[must_use]
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::from_path(path.into(), true, 0)
    }

    fn from_path(path: PathBuf, is_dir: bool, len: u64) -> Self {
        let name = display_name(&path);
        Self {
            hidden: name.starts_with('.'),
            name,
            path,
            is_dir,
            len,
        }
    }
}

/// Directory listing capability.
pub trait DirectorySource {
    /// Lists the entries of a directory, in any order.
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

/// Settings of the filesystem variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTreeSettings {
    /// Listed directory levels; the root is always listed.
    pub max_depth: usize,
    /// Include entries whose name starts with `.`.
    pub show_hidden: bool,
    /// Regrouping of each directory's children.
    pub balance: BalanceSettings,
}

impl FileTreeSettings {
    /// Checks the depth against [`MAX_DEPTH_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` when `max_depth` is too large.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "files max_depth {} exceeds {MAX_DEPTH_LIMIT}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

impl Default for FileTreeSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_FILES_DEPTH,
            show_hidden: false,
            balance: BalanceSettings::default(),
        }
    }
}

/// Builds a bounded tree from a [`DirectorySource`].
///
/// # Example
///
/// ```rust
/// use std::io;
/// use std::path::Path;
/// use treefold_core::files::{DirEntryInfo, DirectorySource, FileTreeBuilder, FileTreeSettings};
///
/// struct Flat;
///
/// impl DirectorySource for Flat {
///     fn list(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
///         Ok((0..20).map(|i| DirEntryInfo::file(path.join(format!("f{i:02}")), 1)).collect())
///     }
/// }
///
/// let tree = FileTreeBuilder::new(&Flat, FileTreeSettings::default())
///     .build(Path::new("/data"))
///     .unwrap();
/// assert_eq!(tree.children().len(), 2);
/// ```
pub struct FileTreeBuilder<'a, S: DirectorySource + ?Sized> {
    source: &'a S,
    settings: FileTreeSettings,
    balancer: Option<HierarchyBuilder>,
    directory_style: NodeStyle,
    file_style: NodeStyle,
}

impl<'a, S: DirectorySource + ?Sized> FileTreeBuilder<'a, S> {
    /// Creates a builder over `source`.
    #[must_use]
    pub fn new(source: &'a S, settings: FileTreeSettings) -> Self {
        let ink = Color::rgb(0x20, 0x20, 0x20);
        let balancer = settings.balance.enabled.then(|| {
            HierarchyBuilder::from_settings(&settings.balance).with_group_style(
                NodeStyle::colored(ink, Color::rgb(0xf4, 0xf4, 0xf4)).with_icon("group.png"),
            )
        });
        Self {
            source,
            settings,
            balancer,
            directory_style: NodeStyle::colored(ink, Color::rgb(0xff, 0xe8, 0xa8))
                .with_icon("folder.png"),
            file_style: NodeStyle::colored(ink, Color::rgb(0xff, 0xff, 0xff)).with_icon("file.png"),
        }
    }

    /// Lists `root` and its sub-directories up to the depth limit.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the settings fail
    /// [`FileTreeSettings::validate`], and `Error::Io` if `root` itself
    /// cannot be listed. Failing sub-directories become childless nodes.
    pub fn build(&self, root: &Path) -> Result<Node> {
        self.settings.validate()?;
        let entries = self.source.list(root)?;
        let children = self.children(entries, 1);
        debug!(root = %root.display(), "File tree built");
        Ok(self.directory_node(root).with_children(children))
    }

    fn children(&self, mut entries: Vec<DirEntryInfo>, depth: usize) -> Vec<Node> {
        if !self.settings.show_hidden {
            entries.retain(|e| !e.hidden);
        }
        entries.sort_by_cached_key(|e| (!e.is_dir, e.name.to_lowercase(), e.name.clone()));

        let nodes = entries
            .into_iter()
            .map(|entry| {
                if entry.is_dir {
                    self.directory(&entry, depth)
                } else {
                    self.file_node(&entry)
                }
            })
            .collect();

        match &self.balancer {
            Some(balancer) => balancer.build(nodes),
            None => nodes,
        }
    }

    fn directory(&self, entry: &DirEntryInfo, depth: usize) -> Node {
        let node = self.directory_node(&entry.path);
        if depth >= self.settings.max_depth {
            return node;
        }
        match self.source.list(&entry.path) {
            Ok(entries) => node.with_children(self.children(entries, depth + 1)),
            Err(err) => {
                debug!(path = %entry.path.display(), error = %err, "Listing failed, branch pruned");
                node
            }
        }
    }

    fn directory_node(&self, path: &Path) -> Node {
        trace!(path = %path.display(), "Directory");
        Node::new(path.display().to_string(), NodeKind::Directory)
            .with_label(display_name(path))
            .styled(&self.directory_style)
    }

    fn file_node(&self, entry: &DirEntryInfo) -> Node {
        Node::new(entry.path.display().to_string(), NodeKind::File)
            .with_label(entry.name.clone())
            .with_content(format!("{} bytes", entry.len))
            .with_link(format!("file:{}", entry.path.display()))
            .styled(&self.file_style)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
