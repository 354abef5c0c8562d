use std::io::{self, Write};

use crate::core::tree::rendered_name;
use crate::models::TreeNode;

/// Write `nodes` as an ASCII tree, one entry per line.
pub fn write_tree<W: Write>(writer: &mut W, nodes: &[TreeNode]) -> io::Result<()> {
    write_level(writer, nodes, &mut Vec::new())
}

fn write_level<W: Write>(
    writer: &mut W,
    nodes: &[TreeNode],
    ancestor_has_more: &mut Vec<bool>,
) -> io::Result<()> {
    for (index, node) in nodes.iter().enumerate() {
        let is_last = index + 1 == nodes.len();

        for &has_more in ancestor_has_more.iter() {
            writer.write_all(if has_more { b"|   " } else { b"    " })?;
        }
        writer.write_all(if is_last { b"`-- " } else { b"|-- " })?;
        writeln!(writer, "{}", rendered_name(&node.name, node.kind))?;

        if !node.children.is_empty() {
            ancestor_has_more.push(!is_last);
            write_level(writer, &node.children, ancestor_has_more)?;
            ancestor_has_more.pop();
        }
    }

    Ok(())
}
