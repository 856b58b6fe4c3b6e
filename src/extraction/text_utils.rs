//! Low-level scanning helpers over rendered page text

/// A keyword located in a text, as byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Hit<K> {
    pub start: usize,
    /// Offset just past the keyword (and its colon, for headers)
    pub end: usize,
    pub kind: K,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// True when `text[pos..]` starts a word (nothing alphanumeric right before it)
fn word_starts_at(text: &str, pos: usize) -> bool {
    text[..pos].chars().next_back().is_none_or(|c| !is_word_char(c))
}

/// True when nothing but spaces or tabs precede `pos` on its line
fn at_line_start(text: &str, pos: usize) -> bool {
    text[..pos]
        .chars()
        .rev()
        .take_while(|c| *c != '\n')
        .all(|c| c == ' ' || c == '\t')
}

/// Remainder of the line starting at `pos`, without the newline
fn rest_of_line(text: &str, pos: usize) -> &str {
    let rest = &text[pos..];
    rest.split('\n').next().unwrap_or(rest)
}

/// Positions where a category name opens a block.
///
/// A name counts only at the start of a line, and only when the next
/// non-blank character on that line is not a letter. This keeps "Pori dilatati"
/// in a cause list from opening a new "Pori" block. When several names match
/// the same line the longest wins.
pub(crate) fn find_block_starts<'a>(text: &str, names: &'a [String]) -> Vec<Hit<&'a str>> {
    let mut ordered: Vec<&String> = names.iter().filter(|n| !n.is_empty()).collect();
    ordered.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));

    let mut hits = Vec::new();
    let mut line_offset = 0;
    for line in text.split_inclusive('\n') {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let content = &line[indent..];
        for name in &ordered {
            if !content.starts_with(name.as_str()) {
                continue;
            }
            let after = &content[name.len()..];
            let next = after.chars().find(|c| *c != ' ' && *c != '\t');
            let opens_block = match next {
                None | Some('\n' | '\r') => true,
                Some(c) => !c.is_alphabetic(),
            };
            if opens_block {
                let start = line_offset + indent;
                hits.push(Hit {
                    start,
                    end: start + name.len(),
                    kind: name.as_str(),
                });
                break;
            }
        }
        line_offset += line.len();
    }
    hits
}

/// Locate section headers inside a category block.
///
/// A header is one of the keywords starting a word and followed by a colon
/// (optionally after spaces), or standing alone on its line. Overlapping
/// matches resolve to the earliest, then longest, keyword.
pub(crate) fn find_headers<K: Copy>(text: &str, keywords: &[(K, &str)]) -> Vec<Hit<K>> {
    let mut candidates = Vec::new();
    for (kind, keyword) in keywords {
        if keyword.is_empty() {
            continue;
        }
        for (start, _) in text.match_indices(keyword) {
            if !word_starts_at(text, start) {
                continue;
            }
            let after_kw = start + keyword.len();
            let tail = &text[after_kw..];
            let blanks = tail.len() - tail.trim_start_matches([' ', '\t']).len();
            let mut after_blanks = tail[blanks..].chars();
            match after_blanks.next() {
                Some(colon @ (':' | '：')) => candidates.push(Hit {
                    start,
                    end: after_kw + blanks + colon.len_utf8(),
                    kind: *kind,
                }),
                _ if at_line_start(text, start) && rest_of_line(text, after_kw).trim().is_empty() => {
                    candidates.push(Hit {
                        start,
                        end: after_kw,
                        kind: *kind,
                    });
                }
                _ => {}
            }
        }
    }

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut hits: Vec<Hit<K>> = Vec::with_capacity(candidates.len());
    for hit in candidates {
        if hits.last().is_none_or(|prev| hit.start >= prev.end) {
            hits.push(hit);
        }
    }
    hits
}

/// Earliest whole-word occurrence of any keyword; ties go to the longer one
pub(crate) fn first_keyword<'a>(text: &str, keywords: &'a [String]) -> Option<&'a str> {
    let mut best: Option<(usize, &'a str)> = None;
    for keyword in keywords.iter().filter(|k| !k.is_empty()) {
        let found = text.match_indices(keyword.as_str()).find(|(pos, _)| {
            let end = pos + keyword.len();
            word_starts_at(text, *pos) && text[end..].chars().next().is_none_or(|c| !is_word_char(c))
        });
        if let Some((pos, _)) = found {
            let better = match best {
                None => true,
                Some((best_pos, best_kw)) => {
                    pos < best_pos || (pos == best_pos && keyword.len() > best_kw.len())
                }
            };
            if better {
                best = Some((pos, keyword.as_str()));
            }
        }
    }
    best.map(|(_, keyword)| keyword)
}

/// A bare number such as `52`, `3.5` or `7,25`
pub(crate) fn is_bare_number(token: &str) -> bool {
    let mut separators = 0;
    let mut chars = token.chars().peekable();
    let Some(first) = chars.peek().copied() else {
        return false;
    };
    if !first.is_ascii_digit() || !token.ends_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    for c in chars {
        match c {
            '0'..='9' => {}
            '.' | ',' => separators += 1,
            _ => return false,
        }
    }
    separators <= 1
}

/// First bare-number token of `text`, with surrounding punctuation removed
pub(crate) fn first_number(text: &str) -> Option<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|token| is_bare_number(token))
}

/// Split a free-text zone into list items.
///
/// Items are separated by newlines, semicolons or inline bullets. Leading
/// bullets or numbering and trailing ellipses are removed; items left with no
/// letters or digits are dropped.
pub(crate) fn split_list_items(zone: &str) -> Vec<String> {
    zone.split(['\n', ';', '•', '·', '▪', '●'])
        .filter_map(clean_list_item)
        .collect()
}

fn clean_list_item(raw: &str) -> Option<String> {
    let mut item = raw.trim();
    item = item.trim_start_matches(['-', '*', '–', '—', '◦']).trim_start();

    let digits = item.len() - item.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &item[digits..];
        if let Some(stripped) = rest.strip_prefix(['.', ')']) {
            if stripped.starts_with(char::is_whitespace) {
                item = stripped.trim_start();
            }
        }
    }

    loop {
        let trimmed = item
            .trim_end()
            .trim_end_matches("...")
            .trim_end_matches('…')
            .trim_end();
        if trimmed.len() == item.len() {
            break;
        }
        item = trimmed;
    }

    item.chars()
        .any(char::is_alphanumeric)
        .then(|| item.to_string())
}
