// Paren spans (with their parens) first, then `;`/`#` to end of line.
pub fn split_comment(line: &str) -> (String, String) {
    let mut executable = String::with_capacity(line.len());
    let mut comment = String::new();

    let mut rest = line;
    while let Some(open) = rest.find('(') {
        // An unclosed paren is ordinary text.
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        let close = open + close;
        executable.push_str(&rest[..open]);
        comment.push_str(&rest[open..=close]);
        rest = &rest[close + 1..];
    }
    executable.push_str(rest);

    if let Some(marker) = executable.find([';', '#']) {
        comment.push_str(&executable[marker..]);
        executable.truncate(marker);
    }

    (executable, comment.trim().to_string())
}
