//! Working tree abstraction for a single conversion.
//!
//! A conversion stages the extracted input and the synthesized package in
//! a [`WorkTree`]. Two backends exist: [`MemoryTree`], an in-memory virtual
//! filesystem, and [`DiskTree`], a view over a directory on disk. Disk
//! trees live inside a [`Scratch`] directory that is removed when dropped.
//!
//! Paths are relative, `/`-separated, and never start with a slash. The
//! empty string denotes the tree root.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single entry returned by [`WorkTree::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name (no separators)
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl DirEntry {
    fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Storage backend for a conversion's working tree.
pub trait WorkTree {
    /// Create a directory and all of its parents.
    fn create_dir_all(&mut self, path: &str) -> Result<()>;

    /// Write a file, creating parent directories and replacing any
    /// existing file at `path`.
    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()>;

    /// Read the full contents of a file.
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// List the direct children of a directory, sorted by name.
    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Check whether a file exists at `path`.
    fn is_file(&self, path: &str) -> bool;
}

/// Join a parent tree path and a child name.
///
/// An empty side yields the other unchanged, so `join(root, "")` is `root`.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Split a tree path into its parent and final component.
fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

/// List every file below `root` in walk order.
///
/// Walk order is top-down: the files of a directory come first, sorted by
/// name, followed by the contents of each subdirectory, also sorted by name.
/// Returned paths are relative to `root`.
pub fn walk_files<T: WorkTree + ?Sized>(tree: &T, root: &str) -> Result<Vec<String>> {
    let mut files = Vec::new();
    walk_dir(tree, root, "", &mut files)?;
    Ok(files)
}

/// Find the first file below `root`, in walk order, whose path satisfies
/// `pred`.
///
/// The walk stops at the first match; later directories are never listed.
pub fn find_file<T, F>(tree: &T, root: &str, mut pred: F) -> Result<Option<String>>
where
    T: WorkTree + ?Sized,
    F: FnMut(&str) -> bool,
{
    find_in_dir(tree, root, "", &mut pred)
}

fn find_in_dir<T, F>(tree: &T, root: &str, rel: &str, pred: &mut F) -> Result<Option<String>>
where
    T: WorkTree + ?Sized,
    F: FnMut(&str) -> bool,
{
    let entries = tree.read_dir(&join(root, rel))?;
    let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);

    for file in files {
        let path = join(rel, &file.name);
        if pred(&path) {
            return Ok(Some(path));
        }
    }
    for dir in dirs {
        if let Some(found) = find_in_dir(tree, root, &join(rel, &dir.name), pred)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn walk_dir<T: WorkTree + ?Sized>(
    tree: &T,
    root: &str,
    rel: &str,
    out: &mut Vec<String>,
) -> Result<()> {
    let entries = tree.read_dir(&join(root, rel))?;
    let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);

    for file in files {
        out.push(join(rel, &file.name));
    }
    for dir in dirs {
        walk_dir(tree, root, &join(rel, &dir.name), out)?;
    }
    Ok(())
}

/// Copy the subtree at `src_root` of `src` into the root of `dst`.
///
/// Empty directories are carried over. Returns the number of files copied.
pub fn copy_tree<S, D>(src: &S, src_root: &str, dst: &mut D) -> Result<usize>
where
    S: WorkTree + ?Sized,
    D: WorkTree + ?Sized,
{
    copy_dir(src, src_root, "", dst)
}

fn copy_dir<S, D>(src: &S, src_root: &str, rel: &str, dst: &mut D) -> Result<usize>
where
    S: WorkTree + ?Sized,
    D: WorkTree + ?Sized,
{
    let mut count = 0;
    for entry in src.read_dir(&join(src_root, rel))? {
        let child = join(rel, &entry.name);
        if entry.is_dir {
            dst.create_dir_all(&child)?;
            count += copy_dir(src, src_root, &child, dst)?;
        } else {
            let data = src.read_file(&join(src_root, &child))?;
            dst.write_file(&child, &data)?;
            count += 1;
        }
    }
    Ok(count)
}

fn not_found(path: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path),
    ))
}

fn not_a_directory(path: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("not a directory: {}", path),
    ))
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// In-memory working tree.
///
/// Nodes are keyed by their full path; every ancestor of a node is
/// present as a directory node.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    nodes: BTreeMap<String, Node>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files in the tree.
    pub fn file_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| matches!(n, Node::File(_)))
            .count()
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || matches!(self.nodes.get(path), Some(Node::Dir))
    }
}

impl WorkTree for MemoryTree {
    fn create_dir_all(&mut self, path: &str) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let mut current = String::new();
        for component in path.split('/').filter(|c| !c.is_empty()) {
            current = join(&current, component);
            match self.nodes.get(&current) {
                Some(Node::File(_)) => return Err(not_a_directory(&current)),
                Some(Node::Dir) => {}
                None => {
                    self.nodes.insert(current.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let (parent, name) = split_parent(path);
        if name.is_empty() {
            return Err(not_found(path));
        }
        self.create_dir_all(parent)?;
        if let Some(Node::Dir) = self.nodes.get(path) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", path),
            )));
        }
        self.nodes.insert(path.to_string(), Node::File(data.to_vec()));
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        match self.nodes.get(path) {
            Some(Node::File(data)) => Ok(data.clone()),
            _ => Err(not_found(path)),
        }
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        if !self.is_dir(path) {
            return Err(not_a_directory(path));
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };

        // BTreeMap iteration is already sorted by full path, so direct
        // children come out in name order.
        let entries = self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, node)| {
                let rest = &key[prefix.len()..];
                if rest.contains('/') {
                    return None;
                }
                Some(match node {
                    Node::File(_) => DirEntry::file(rest),
                    Node::Dir => DirEntry::dir(rest),
                })
            })
            .collect::<Vec<_>>();

        Ok(sorted(entries))
    }

    fn is_file(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(Node::File(_)))
    }
}

/// Sort entries by name, bytewise.
///
/// `BTreeMap` orders `a/b` before `a-b`, so children must be re-sorted by
/// their own names.
fn sorted(mut entries: Vec<DirEntry>) -> Vec<DirEntry> {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Working tree backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}

impl DiskTree {
    /// Create a view over an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for component in path.split('/').filter(|c| !c.is_empty()) {
            full.push(component);
        }
        full
    }
}

impl WorkTree for DiskTree {
    fn create_dir_all(&mut self, path: &str) -> Result<()> {
        fs::create_dir_all(self.resolve(path))?;
        Ok(())
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, data)?;
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(path))?)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(path))? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type()?.is_dir() {
                entries.push(DirEntry::dir(name));
            } else {
                entries.push(DirEntry::file(name));
            }
        }
        Ok(sorted(entries))
    }

    fn is_file(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

/// Uniquely named scratch directory owned by one conversion.
///
/// The directory and everything below it is deleted when the value is
/// dropped, on success and error paths alike.
#[derive(Debug)]
pub struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    /// Create a scratch directory under `base`, or under the system
    /// temporary directory when `base` is `None`.
    ///
    /// `id` is embedded in the directory name; `tempfile` appends a random
    /// suffix so two calls never share a directory.
    pub fn create(base: Option<&Path>, id: &str) -> Result<Self> {
        let prefix = format!("icf2scorm-{}-", id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match base {
            Some(base) => {
                fs::create_dir_all(base)?;
                builder.tempdir_in(base)?
            }
            None => builder.tempdir()?,
        };

        log::debug!("created scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a [`DiskTree`] over a fresh subdirectory of the scratch area.
    pub fn subtree(&self, name: &str) -> Result<DiskTree> {
        let root = self.dir.path().join(name);
        fs::create_dir_all(&root)?;
        Ok(DiskTree::new(root))
    }
}
