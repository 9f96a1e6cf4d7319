//! Diagnostic rendering of the spatial memory tree.

use std::io::{self, Write};

use crate::types::{ArenaMap, SectorMap, WorldMap};

/// Borrowed view of one node in the tree
#[derive(Debug)]
pub enum TreeNode<'a> {
    /// Named children, in key order
    Branch(Vec<(&'a str, TreeNode<'a>)>),
    /// Game objects of an arena
    Leaf(&'a [String]),
}

impl<'a> TreeNode<'a> {
    pub fn from_worlds(worlds: &'a WorldMap) -> Self {
        TreeNode::Branch(
            worlds
                .iter()
                .map(|(name, sectors)| (name.as_str(), Self::from_sectors(sectors)))
                .collect(),
        )
    }

    fn from_sectors(sectors: &'a SectorMap) -> Self {
        TreeNode::Branch(
            sectors
                .iter()
                .map(|(name, arenas)| (name.as_str(), Self::from_arenas(arenas)))
                .collect(),
        )
    }

    fn from_arenas(arenas: &'a ArenaMap) -> Self {
        TreeNode::Branch(
            arenas
                .iter()
                .map(|(name, objects)| (name.as_str(), TreeNode::Leaf(objects)))
                .collect(),
        )
    }
}

/// Quote a name the way the list repr does: single quotes unless the name
/// holds a `'` and no `"`, escaping whatever quote and backslashes remain.
fn quote(name: &str) -> String {
    let mark = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(mark);
    for c in name.chars() {
        if c == '\\' || c == mark {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push(mark);
    quoted
}

fn write_node<W: Write>(out: &mut W, node: &TreeNode<'_>, depth: usize) -> io::Result<()> {
    let dash = " >".repeat(depth);
    match node {
        TreeNode::Leaf(objects) => {
            if !objects.is_empty() {
                let quoted: Vec<String> = objects.iter().map(|o| quote(o)).collect();
                writeln!(out, "{dash} [{}]", quoted.join(", "))?;
            }
        }
        TreeNode::Branch(children) => {
            for (name, child) in children {
                if !name.is_empty() {
                    writeln!(out, "{dash} {name}")?;
                }
                write_node(out, child, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// Write an indentation-by-depth rendering of `tree` to `out`.
pub fn write_tree<W: Write>(out: &mut W, tree: &WorldMap) -> io::Result<()> {
    write_node(out, &TreeNode::from_worlds(tree), 0)
}

/// Render the tree into a string.
pub fn render_tree(tree: &WorldMap) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_tree(&mut buffer, tree);
    String::from_utf8_lossy(&buffer).into_owned()
}
