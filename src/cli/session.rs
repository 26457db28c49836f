//! A front-end session: one tree, an optional snapshot file, and the
//! commands that act on them.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cli::command::{Command, HELP};
use crate::common::config::DEFAULT_SNAPSHOT_FILE;
use crate::common::{Error, Result};
use crate::index::btree::BPlusTree;
use crate::storage::snapshot;

/// Whether the caller should keep feeding commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the tree for the lifetime of a front end.
///
/// Every response goes to the writer handed to [`execute`](Self::execute),
/// so the same session drives a terminal, a one-shot command or a test
/// buffer.
#[derive(Debug)]
pub struct Session {
    tree: BPlusTree,
    /// Where `save`/`load` without a path go. `None` disables autosave.
    snapshot: Option<PathBuf>,
    /// Changed since the last save or load.
    dirty: bool,
}

impl Session {
    /// Session over `tree` with no snapshot file.
    pub fn new(tree: BPlusTree) -> Self {
        Self {
            tree,
            snapshot: None,
            dirty: false,
        }
    }

    /// Session backed by `path`: loads it if it exists, otherwise starts an
    /// empty tree of `order`.
    ///
    /// # Errors
    /// See [`snapshot::load_or_new`].
    pub fn open<P: Into<PathBuf>>(path: P, order: usize) -> Result<Self> {
        let path = path.into();
        let tree = snapshot::load_or_new(&path, order)?;
        Ok(Self {
            tree,
            snapshot: Some(path),
            dirty: false,
        })
    }

    #[inline]
    pub fn tree(&self) -> &BPlusTree {
        &self.tree
    }

    #[inline]
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the tree under `order`, carrying every key over.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` and leaves the tree untouched if
    /// `order` is out of range.
    pub fn set_order(&mut self, order: usize) -> Result<()> {
        if order == self.tree.order() {
            return Ok(());
        }
        let mut rebuilt = BPlusTree::new(order)?;
        rebuilt.extend(self.tree.iter());

        tracing::debug!(from = self.tree.order(), to = order, keys = rebuilt.len(), "tree rebuilt");
        self.tree = rebuilt;
        self.dirty = true;
        Ok(())
    }

    /// Write the tree to `path`, or to the session's snapshot path.
    ///
    /// Returns the path written.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve(path);
        self.tree.save(&path)?;
        self.dirty = false;
        Ok(path)
    }

    /// Replace the tree with the one stored at `path`, or at the session's
    /// snapshot path.
    ///
    /// On error the current tree is kept.
    pub fn load(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve(path);
        self.tree = BPlusTree::load(&path)?;
        self.dirty = false;
        Ok(path)
    }

    /// Save to the snapshot path if the tree changed and a path is set.
    ///
    /// Returns true if a save happened.
    pub fn save_if_dirty(&mut self) -> Result<bool> {
        match self.snapshot.clone() {
            Some(path) if self.dirty => {
                self.save(Some(&path))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn resolve(&self, path: Option<&Path>) -> PathBuf {
        path.or(self.snapshot.as_deref())
            .unwrap_or(Path::new(DEFAULT_SNAPSHOT_FILE))
            .to_path_buf()
    }

    /// Run one command, writing its response to `out`.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` from `order`
    /// - `Error::Io` / `Error::CorruptData` from `save` and `load`
    /// - `Error::Io` if `out` cannot be written
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        tracing::trace!(%command, "execute");

        match command {
            Command::Insert(value) => {
                if self.tree.insert(value) {
                    self.dirty = true;
                    writeln!(out, "Successfully inserted {}", value)?;
                } else {
                    writeln!(out, "Value {} already exists in the tree", value)?;
                }
            }
            Command::Delete(value) => {
                if self.tree.delete(value) {
                    self.dirty = true;
                    writeln!(out, "Successfully deleted {}", value)?;
                } else {
                    writeln!(out, "Value {} not found in the tree", value)?;
                }
            }
            Command::Search(value) => {
                if self.tree.search(value) {
                    writeln!(out, "Found {} in the tree", value)?;
                } else {
                    writeln!(out, "Value {} not found in the tree", value)?;
                }
            }
            Command::Range(low, high) => {
                let values: Vec<String> = self.tree.range(low, high).map(|k| k.to_string()).collect();
                if values.is_empty() {
                    writeln!(out, "No values in [{}, {}]", low, high)?;
                } else {
                    writeln!(out, "Values in [{}, {}]: {}", low, high, values.join(" "))?;
                }
            }
            Command::Display => {
                writeln!(out, "Current B+ Tree structure:")?;
                writeln!(out, "{}", self.tree)?;
            }
            Command::Order(order) => {
                self.set_order(order)?;
                writeln!(
                    out,
                    "Tree order set to {} ({} keys carried over)",
                    order,
                    self.tree.len()
                )?;
            }
            Command::Save(path) => {
                let path = self.save(path.as_deref())?;
                writeln!(out, "Saved {} keys to {}", self.tree.len(), path.display())?;
            }
            Command::Load(path) => {
                let path = self.load(path.as_deref())?;
                writeln!(
                    out,
                    "Loaded {} keys (order {}) from {}",
                    self.tree.len(),
                    self.tree.order(),
                    path.display()
                )?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    /// Read commands from `input` until `exit` or end of input.
    ///
    /// Parse failures and failed commands are reported on `out` and the loop
    /// continues.
    ///
    /// # Errors
    /// Returns `Error::Io` only if `input` or `out` fail.
    pub fn run_interactive<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "B+ Tree Interactive Mode (order {})", self.tree.order())?;
        writeln!(out, "Type 'help' for a list of commands")?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            };

            match self.execute(command, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e @ (Error::InvalidOrder(_) | Error::CorruptData(_) | Error::Io(_))) => {
                    writeln!(out, "Error: {}", e)?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BPlusTree::default())
    }
}
