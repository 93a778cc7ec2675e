//! Drive-aware path string helpers
//!
//! Jobs describe Windows locations (`C:\MyStuff`, `\\nas\backup`) and these helpers treat them
//! the same way on every host, accepting either `\` or `/` as a separator.

/// The separator used when composing a path onto a drive
pub const SEPARATOR: char = '\\';

/// Returns true for either path separator
pub fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// Splits a leading drive (`C:`) or UNC share (`\\server\share`) from the rest of the path
///
/// Paths with neither return an empty drive.
pub fn split_drive(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return path.split_at(2);
    }
    match unc_prefix_len(path) {
        Some(len) => path.split_at(len),
        None => ("", path),
    }
}

fn unc_prefix_len(path: &str) -> Option<usize> {
    let rest = path.strip_prefix(is_separator)?.strip_prefix(is_separator)?;
    let server = rest.find(is_separator)?;
    if server == 0 {
        return None;
    }
    let after = &rest[server + 1..];
    if after.is_empty() || after.starts_with(is_separator) {
        return None;
    }
    let share = after.find(is_separator).unwrap_or(after.len());
    Some(2 + server + 1 + share)
}

/// The drive letter at the start of the path, if it has one
pub fn drive_letter(path: &str) -> Option<char> {
    match split_drive(path) {
        (drive, _) if drive.len() == 2 => drive.chars().next(),
        _ => None,
    }
}

/// Returns true if the path is fully qualified
///
/// That is a drive followed by a separator (`C:\`), a UNC share, or on non-Windows hosts a path
/// starting with `/`. Drive relative paths such as `C:Backup` are not absolute.
pub fn is_absolute(path: &str) -> bool {
    let (drive, rest) = split_drive(path);
    match drive.len() {
        0 => !cfg!(windows) && path.starts_with('/'),
        2 => rest.starts_with(is_separator),
        _ => true,
    }
}

/// Joins a child onto a base path, with exactly one separator between them
///
/// The separator follows the style of the base path, defaulting to [`SEPARATOR`].
pub fn join(base: &str, child: &str) -> String {
    let child = child.trim_start_matches(is_separator);
    let separator = if base.contains('/') && !base.contains('\\') {
        '/'
    } else {
        SEPARATOR
    };
    let mut joined = base.trim_end_matches(is_separator).to_owned();
    joined.push(separator);
    joined.push_str(child);
    joined
}

/// The parent of the path, or `None` for a root (`C:\`, `\\host\share`, `/`) or a single name
pub fn parent(path: &str) -> Option<&str> {
    let (drive, rest) = split_drive(path);
    let trimmed = rest.trim_end_matches(is_separator);
    match trimmed.rfind(is_separator) {
        _ if trimmed.is_empty() => None,
        Some(0) => Some(&path[..drive.len() + 1]),
        Some(index) => Some(&path[..drive.len() + index]),
        None => None,
    }
}

/// Normalizes separators to [`SEPARATOR`], dropping repeated and trailing separators and `.`
/// components
pub fn normalize(path: &str) -> String {
    let (drive, rest) = split_drive(path);
    let mut normal = drive.replace('/', "\\");
    let parts: Vec<&str> = rest
        .split(is_separator)
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    // `C:` and `C:\` differ, but a share is the same with or without its trailing separator
    let share = drive.len() > 2;
    if rest.starts_with(is_separator) && !(share && parts.is_empty()) {
        normal.push(SEPARATOR);
    }
    normal.push_str(&parts.join("\\"));
    normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drive_letters_and_shares() {
        assert_eq!(split_drive("C:\\MyStuff"), ("C:", "\\MyStuff"));
        assert_eq!(split_drive("e:/Backup"), ("e:", "/Backup"));
        assert_eq!(split_drive("\\\\nas\\backup\\jobs"), ("\\\\nas\\backup", "\\jobs"));
        assert_eq!(split_drive("\\\\nas\\C$"), ("\\\\nas\\C$", ""));
        assert_eq!(split_drive("\\\\nas"), ("", "\\\\nas"));
        assert_eq!(split_drive("Backup\\MyStuff"), ("", "Backup\\MyStuff"));
    }

    #[test]
    fn absolute_paths() {
        assert!(is_absolute("C:\\MyStuff"));
        assert!(is_absolute("C:/"));
        assert!(is_absolute("\\\\nas\\backup"));
        assert!(!is_absolute("C:MyStuff"));
        assert!(!is_absolute("MyStuff"));
        assert!(!is_absolute("\\MyStuff"));
        assert_eq!(is_absolute("/mnt/backup"), !cfg!(windows));
    }

    #[test]
    fn drive_letters() {
        assert_eq!(drive_letter("D:\\Photos"), Some('D'));
        assert_eq!(drive_letter("\\\\nas\\backup"), None);
        assert_eq!(drive_letter("Photos"), None);
    }

    #[test]
    fn join_uses_one_separator() {
        assert_eq!(join("C:\\", "MyStuff"), "C:\\MyStuff");
        assert_eq!(join("C:\\MyStuff\\", "\\Robocopy.flag"), "C:\\MyStuff\\Robocopy.flag");
        assert_eq!(join("/tmp", "flag"), "/tmp/flag");
    }

    #[test]
    fn parents() {
        assert_eq!(parent("E:\\Backup\\MyStuff"), Some("E:\\Backup"));
        assert_eq!(parent("E:\\Backup\\"), Some("E:\\"));
        assert_eq!(parent("E:\\"), None);
        assert_eq!(parent("\\\\nas\\share\\jobs"), Some("\\\\nas\\share\\"));
        assert_eq!(parent("/tmp/x"), Some("/tmp"));
        assert_eq!(parent("/tmp"), Some("/"));
        assert_eq!(parent("name"), None);
    }

    #[test]
    fn normalized() {
        assert_eq!(normalize("E:/Backup//MyStuff/"), "E:\\Backup\\MyStuff");
        assert_eq!(normalize("C:\\"), "C:\\");
        assert_eq!(normalize("C:\\.\\x"), "C:\\x");
        assert_eq!(normalize("//nas/share/x"), "\\\\nas\\share\\x");
        assert_eq!(normalize("\\\\nas\\share\\"), "\\\\nas\\share");
        assert_eq!(normalize("\\\\nas\\share"), "\\\\nas\\share");
    }
}
