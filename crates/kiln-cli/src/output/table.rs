//! Plain aligned-column table rendering.

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render rows as an aligned table with a header line and divider.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(String::len)
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    shrink_to_fit(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.len());

    let mut lines = vec![header_line, divider];
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map_or("-", String::as_str);
                let cell = truncate(cell, *width);
                let padded = pad(&cell, *width);
                if options.color {
                    colorize_status(&padded, &cell)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line);
    }
    lines.join("\n")
}

/// Shrink the widest shrinkable columns until the table fits `max_width`.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else { return };
    if widths.is_empty() {
        return;
    }

    let separators = widths.len().saturating_sub(1) * 2;
    loop {
        let total = widths.iter().sum::<usize>() + separators;
        if total <= max_width {
            return;
        }
        let Some((index, _)) = widths
            .iter()
            .enumerate()
            .filter(|(i, w)| **w > headers[*i].len().max(6))
            .max_by_key(|(_, w)| **w)
        else {
            return;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.chars().count());
    format!("{value}{}", " ".repeat(fill))
}

/// Wrap well-known status words in green/red ANSI codes. Padding was applied
/// to the plain text, so alignment is unaffected.
fn colorize_status(padded: &str, plain: &str) -> String {
    let code = match plain.to_ascii_lowercase().as_str() {
        "true" | "ok" | "success" | "editable" | "valid" => Some("32"),
        "false" | "failed" | "missing" | "invalid" => Some("31"),
        _ => None,
    };
    code.map_or_else(
        || padded.to_string(),
        |code| padded.replace(plain, &format!("\u{1b}[{code}m{plain}\u{1b}[0m")),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let rows = vec![
            vec!["build".to_string(), "build".to_string()],
            vec!["test".to_string(), "editable".to_string()],
        ];
        let rendered = render(&["label", "mode"], &rows, TableOptions::default());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "label  mode    ");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "build  build   ");
        assert_eq!(lines[3], "test   editable");
    }

    #[test]
    fn narrow_tables_truncate_with_ellipsis() {
        let rows = vec![vec![
            "short".to_string(),
            "a very long value that will not fit".to_string(),
        ]];
        let rendered = render(
            &["a", "b"],
            &rows,
            TableOptions {
                max_width: Some(20),
                color: false,
            },
        );
        assert!(rendered.contains('…'));
        for line in rendered.lines() {
            assert!(line.chars().count() <= 20);
        }
    }
}
