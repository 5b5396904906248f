//! Reading `os-release(5)` files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::specifier::Resolve;

/// The os-release locations, in order of preference, relative to the root directory.
pub const OS_RELEASE_PATHS: [&str; 2] = ["etc/os-release", "usr/lib/os-release"];

/// The parsed contents of an os-release file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OsRelease {
    fields: BTreeMap<String, String>,
}

impl OsRelease {
    /// Load the os-release file of the running system.
    pub fn load() -> io::Result<Self> {
        Self::load_from_root("/")
    }

    /// Load the os-release file of the system located at `root`.
    ///
    /// `/etc/os-release` is preferred, `/usr/lib/os-release` is used if it does not exist.
    pub fn load_from_root<P: AsRef<Path>>(root: P) -> io::Result<Self> {
        let root = root.as_ref();
        let mut last_err = None;
        for path in OS_RELEASE_PATHS {
            match fs::read_to_string(root.join(path)) {
                Ok(content) => return Ok(Self::parse(&content)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => last_err = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)))
    }

    /// Parse the contents of an os-release file.
    ///
    /// This is the environment file format: `KEY=VALUE` assignments, one per line, with shell-like
    /// quoting of values. Empty lines and `#` comments are ignored, as are malformed lines. Later
    /// assignments override earlier ones.
    pub fn parse(content: &str) -> Self {
        let mut fields = BTreeMap::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                log::debug!("os-release line {}: missing '=', ignoring", lineno + 1);
                continue;
            };

            let key = key.trim_end();
            if !is_valid_key(key) {
                log::debug!("os-release line {}: invalid key {key:?}, ignoring", lineno + 1);
                continue;
            }

            fields.insert(key.to_owned(), unquote(value.trim()));
        }

        Self { fields }
    }

    /// Get the value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Iterate over all fields, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were found.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Characters which keep their special meaning after a backslash inside double quotes.
const DOUBLE_QUOTE_ESCAPES: &str = "\"\\`$";

/// Remove shell-style quoting from a value.
fn unquote(raw: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Plain,
        Single,
        Double,
    }

    let mut out = String::with_capacity(raw.len());
    let mut state = State::Plain;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match (state, c) {
            (State::Plain, '\'') => state = State::Single,
            (State::Plain, '"') => state = State::Double,
            (State::Plain, '\\') => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            (State::Single, '\'') => state = State::Plain,
            (State::Double, '"') => state = State::Plain,
            (State::Double, '\\') => match chars.next() {
                Some(next) if DOUBLE_QUOTE_ESCAPES.contains(next) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            (_, c) => out.push(c),
        }
    }

    out
}

/// Resolves to a field of the running system's os-release file.
///
/// A missing field resolves to the empty string, since most fields are optional. A missing
/// os-release file is an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OsReleaseField {
    key: &'static str,
}

impl OsReleaseField {
    /// `ID=`, the lower case OS identifier.
    pub const ID: Self = Self::new("ID");

    /// `VERSION_ID=`, the OS version.
    pub const VERSION_ID: Self = Self::new("VERSION_ID");

    /// `BUILD_ID=`, the build of the OS image.
    pub const BUILD_ID: Self = Self::new("BUILD_ID");

    /// `VARIANT_ID=`, the OS variant.
    pub const VARIANT_ID: Self = Self::new("VARIANT_ID");

    /// `IMAGE_ID=`, the OS image identifier.
    pub const IMAGE_ID: Self = Self::new("IMAGE_ID");

    /// `IMAGE_VERSION=`, the OS image version.
    pub const IMAGE_VERSION: Self = Self::new("IMAGE_VERSION");

    /// Resolve an arbitrary field.
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }

    /// The field name.
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// The value of this field for the system located at `root`, `""` if it is not set.
    pub fn resolve_in<P: AsRef<Path>>(&self, root: P) -> io::Result<String> {
        let os_release = OsRelease::load_from_root(root)?;
        Ok(os_release.get(self.key).unwrap_or_default().to_owned())
    }
}

impl<U: ?Sized> Resolve<U> for OsReleaseField {
    fn resolve(&self, _specifier: char, _userdata: &U) -> io::Result<String> {
        self.resolve_in("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Generated by the image builder
NAME="Debian GNU/Linux"
ID=debian
VERSION_ID="12"
PRETTY_NAME='Debian GNU/Linux 12 (bookworm)'
HOME_URL="https://www.debian.org/"
   IMAGE_VERSION = 2024\ 07
QUOTED="say \"hi\" for \$5 \n"
not a field
1INVALID=x
ID=debian-override
"#;

    #[test]
    fn parse_sample() {
        let os = OsRelease::parse(SAMPLE);
        assert_eq!(os.get("NAME"), Some("Debian GNU/Linux"));
        assert_eq!(os.get("ID"), Some("debian-override"));
        assert_eq!(os.get("VERSION_ID"), Some("12"));
        assert_eq!(os.get("PRETTY_NAME"), Some("Debian GNU/Linux 12 (bookworm)"));
        assert_eq!(os.get("HOME_URL"), Some("https://www.debian.org/"));
        assert_eq!(os.get("IMAGE_VERSION"), Some("2024 07"));
        assert_eq!(os.get("QUOTED"), Some(r#"say "hi" for $5 \n"#));
        assert_eq!(os.get("1INVALID"), None);
        assert_eq!(os.get("VARIANT_ID"), None);
        assert_eq!(os.len(), 7);
    }

    #[test]
    fn empty_values() {
        let os = OsRelease::parse("A=\nB=\"\"\nC=''\n");
        assert_eq!(os.get("A"), Some(""));
        assert_eq!(os.get("B"), Some(""));
        assert_eq!(os.get("C"), Some(""));
        assert!(OsRelease::parse("# nothing\n\n").is_empty());
    }

    #[test]
    fn iteration_is_sorted() {
        let os = OsRelease::parse("ZED=1\nALPHA=2\n");
        let keys: Vec<&str> = os.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["ALPHA", "ZED"]);
    }

    #[test]
    fn keys() {
        assert!(is_valid_key("ID"));
        assert!(is_valid_key("_X1"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("9A"));
        assert!(!is_valid_key("A-B"));
    }

    #[test]
    fn load_prefers_etc() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("etc")).unwrap();
        fs::create_dir_all(root.path().join("usr/lib")).unwrap();
        fs::write(root.path().join("usr/lib/os-release"), "ID=usr\n").unwrap();

        let os = OsRelease::load_from_root(root.path()).unwrap();
        assert_eq!(os.get("ID"), Some("usr"));

        fs::write(root.path().join("etc/os-release"), "ID=etc\n").unwrap();
        let os = OsRelease::load_from_root(root.path()).unwrap();
        assert_eq!(os.get("ID"), Some("etc"));
    }

    #[test]
    fn load_missing() {
        let root = tempfile::tempdir().unwrap();
        let err = OsRelease::load_from_root(root.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn missing_field_is_empty() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("etc")).unwrap();
        fs::write(
            root.path().join("etc/os-release"),
            "NAME=Minimal\nVERSION_ID=1\n",
        )
        .unwrap();

        assert_eq!(OsReleaseField::ID.resolve_in(root.path()).unwrap(), "");
        assert_eq!(OsReleaseField::IMAGE_ID.resolve_in(root.path()).unwrap(), "");
        assert_eq!(
            OsReleaseField::VERSION_ID.resolve_in(root.path()).unwrap(),
            "1"
        );
    }

    #[test]
    fn missing_file_fails_resolution() {
        let root = tempfile::tempdir().unwrap();
        let err = OsReleaseField::ID.resolve_in(root.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn field_constants() {
        assert_eq!(OsReleaseField::ID.key(), "ID");
        assert_eq!(OsReleaseField::IMAGE_VERSION.key(), "IMAGE_VERSION");
        assert_eq!(OsReleaseField::new("SYSEXT_LEVEL").key(), "SYSEXT_LEVEL");
    }
}
