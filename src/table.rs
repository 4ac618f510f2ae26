//! Markdown table output

use gridcalc_core::Document;
use std::io::Write;

/// Write the grid as a markdown table, header row first.
pub fn write_table(out: &mut impl Write, doc: &Document) -> std::io::Result<()> {
    let rows = doc.display_rows();
    let Some((header, body)) = rows.split_first() else {
        return Ok(());
    };

    write!(out, "|")?;
    for label in header {
        write!(out, " {} |", escape_markdown(label))?;
    }
    writeln!(out)?;

    write!(out, "|")?;
    for _ in header {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for row in body {
        write!(out, "|")?;
        for value in row {
            write!(out, " {} |", escape_markdown(value))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::GridConfig;

    #[test]
    fn test_write_table() {
        let mut doc = Document::new(&GridConfig::new(2, 1)).unwrap();
        doc.commit_edit("A1", "a|b").unwrap();
        doc.commit_edit("B1", "=2*3").unwrap();

        let mut out = Vec::new();
        write_table(&mut out, &doc).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "|  | A | B |\n|---|---|---|\n| 1 | a\\|b | 6 |\n");
    }
}
