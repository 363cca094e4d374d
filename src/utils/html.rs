//! Minimal, allocation-light helpers for pulling tables out of HTML pages.
//!
//! Case-insensitive tag matching over the raw markup. Good enough for the
//! well-formed tables medal pages serve; not a general HTML parser.

fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Finds the next `<tag ...>...</tag>` block at or after `from`.
///
/// Returns `(start, end)` byte offsets into `src`, `end` exclusive and past the
/// closing tag. Nested blocks of the same tag are not balanced.
pub fn next_block(src: &str, lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let mut search = from;
    loop {
        let start = lower.get(search..)?.find(&open)? + search;
        // `<th` must not match `<thead`
        let next = lower[start + open.len()..].chars().next()?;
        if next == '>' || next.is_whitespace() {
            let open_end = src[start..].find('>')? + start + 1;
            let end = lower[open_end..]
                .find(&close)
                .map(|rel| open_end + rel + close.len())
                .unwrap_or(src.len());
            return Some((start, end));
        }
        search = start + open.len();
    }
}

/// Opening tag text of a block, e.g. `<table class="wikitable">`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(end) => &block[..=end],
        None => block,
    }
}

/// Text between the opening tag and the last `<` of a block.
pub fn inner(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(oe), Some(cs)) if cs > oe => &block[oe + 1..cs],
        (Some(oe), _) => &block[oe + 1..],
        _ => "",
    }
}

/// Every `<table>` whose opening tag contains `marker` (case-insensitive), in
/// page order.
pub fn find_tables<'a>(src: &'a str, marker: &str) -> Vec<&'a str> {
    let lower = to_lower(src);
    let marker = to_lower(marker);
    let mut tables = Vec::new();
    let mut from = 0;
    while let Some((start, end)) = next_block(src, &lower, "table", from) {
        let block = &src[start..end];
        if to_lower(open_tag(block)).contains(&marker) {
            tables.push(block);
        }
        // step inside: a wrapper table may hold the marked one
        from = start + 1;
    }
    tables
}

/// Iterates the `<tr>` blocks of a table.
pub fn rows(table: &str) -> Rows<'_> {
    Rows {
        lower: to_lower(table),
        src: table,
        pos: 0,
    }
}

pub struct Rows<'a> {
    src: &'a str,
    lower: String,
    pos: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, end) = next_block(self.src, &self.lower, "tr", self.pos)?;
        let row = &self.src[start..end];
        // a missing </tr> would swallow the next row
        let row = match to_lower(&row[3..]).find("<tr") {
            Some(next) => &row[..next + 3],
            None => row,
        };
        self.pos = start + row.len();
        Some(row)
    }
}

/// Visible text of every `<td>`/`<th>` cell in a row, in document order.
pub fn cells(row: &str) -> Vec<String> {
    let lower = to_lower(row);
    let mut out = Vec::new();
    let mut pos = 0;
    loop {
        let td = next_block(row, &lower, "td", pos);
        let th = next_block(row, &lower, "th", pos);
        let (start, end) = match (td, th) {
            (Some(a), Some(b)) => {
                if a.0 < b.0 {
                    a
                } else {
                    b
                }
            }
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };
        let mut block = &row[start..end];
        // unclosed cell: stop at the next cell opener
        if let Some(next) = to_lower(&block[3..])
            .find("<td")
            .into_iter()
            .chain(to_lower(&block[3..]).find("<th"))
            .min()
        {
            block = &block[..next + 3];
        }
        out.push(strip_tags(inner(block)));
        pos = start + block.len();
    }
    out
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&thinsp;", " ")
        .replace("&#8201;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tables_by_marker() {
        let page = r#"<table class="infobox"><tr><td>x</td></tr></table>
            <TABLE class="wikitable sortable"><tr><td>y</td></tr></TABLE>
            <table class="wikitable"><tr><td>z</td></tr></table>"#;
        let tables = find_tables(page, "wikitable");
        assert_eq!(tables.len(), 2);
        assert!(tables[0].contains("y"));
        assert!(!tables[0].contains("x"));
        assert!(tables[1].contains("z"));
        assert!(find_tables(page, "medals").is_empty());
    }

    #[test]
    fn test_cells_mix_th_and_td() {
        let row = r#"<tr><td>1</td><th scope="row"><a href="/n">Norway</a>&nbsp;*</th><td>12</td></tr>"#;
        assert_eq!(cells(row), vec!["1", "Norway *", "12"]);
    }

    #[test]
    fn test_thead_is_not_a_cell() {
        let table = "<table><thead><tr><th>Rank</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>";
        let all: Vec<Vec<String>> = rows(table).map(cells).collect();
        assert_eq!(all, vec![vec!["Rank".to_string()], vec!["1".to_string()]]);
    }

    #[test]
    fn test_unclosed_rows_and_cells() {
        let table = "<table><tr><td>a<td>b<tr><td>c</td></tr></table>";
        let all: Vec<Vec<String>> = rows(table).map(cells).collect();
        assert_eq!(all[0], vec!["a", "b"]);
        assert_eq!(all[1], vec!["c"]);
    }
}
