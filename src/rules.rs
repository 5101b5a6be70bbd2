/*!
 * Exclusion rules for projsnap
 *
 * A `RuleSet` is built once per run and never mutated while a snapshot is
 * being taken. Every path it sees is root-relative with `/` separators.
 */

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::ensure;
use crate::error::Result;
use crate::utils::relative_path;

/// Placeholder written instead of the body of a content-omitted file
pub const OMITTED_PLACEHOLDER: &str = "[Content Omitted - Generated/Tooling File]";

/// Default snapshot file name, written into the project root
pub const DEFAULT_OUTPUT_FILE: &str = "project_snapshot.txt";

/// Kind of filesystem entry a pattern is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory, candidate for pruning
    Directory,
    /// Anything read as a file
    File,
}

/// A single exclusion pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches one relative path and nothing else
    Exact(String),
    /// Matches the path itself or anything nested beneath it
    PrefixDir(String),
    /// Written as `*.ext`; holds the `.ext` suffix. Only applies to files.
    SuffixGlob(String),
}

impl Pattern {
    /// Parse a pattern string.
    ///
    /// `*.ext` becomes a [`Pattern::SuffixGlob`], anything else a
    /// [`Pattern::PrefixDir`]. A leading `./` and trailing `/` are dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
        let trimmed = trimmed.trim_end_matches('/');

        ensure!(!trimmed.is_empty(), InvalidPattern, "empty pattern {:?}", raw);

        if let Some(suffix) = trimmed.strip_prefix('*') {
            ensure!(
                suffix.len() > 1 && suffix.starts_with('.') && !suffix.contains(['*', '/']),
                InvalidPattern,
                "unsupported wildcard pattern {:?}, expected *.ext",
                raw
            );
            return Ok(Pattern::SuffixGlob(suffix.to_string()));
        }

        Ok(Pattern::PrefixDir(trimmed.to_string()))
    }

    /// Test a root-relative path against this pattern
    pub fn matches(&self, rel_path: &str, kind: EntryKind) -> bool {
        match self {
            Pattern::Exact(path) => rel_path == path,
            Pattern::PrefixDir(path) => {
                rel_path == path
                    || rel_path
                        .strip_prefix(path.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Pattern::SuffixGlob(suffix) => kind == EntryKind::File && rel_path.ends_with(suffix),
        }
    }
}

/// Paths excluded for a single run only: the snapshot file and the tool binary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicExclusions {
    patterns: Vec<Pattern>,
}

impl DynamicExclusions {
    /// Work out which of `output_path` and `tool_path` live under `root`
    pub fn compute(root: &Path, output_path: &Path, tool_path: Option<&Path>) -> Self {
        let mut patterns = Vec::new();

        let output_rel = resolve_under_root(output_path, root);
        if let Some(rel) = &output_rel {
            patterns.push(Pattern::Exact(rel.clone()));
        }

        if let Some(tool_rel) = tool_path.and_then(|tool| resolve_under_root(tool, root)) {
            if output_rel.as_deref() != Some(tool_rel.as_str()) {
                patterns.push(Pattern::Exact(tool_rel));
            }
        }

        Self { patterns }
    }

    /// Relative paths excluded for this run
    pub fn paths(&self) -> Vec<&str> {
        self.patterns
            .iter()
            .filter_map(|p| match p {
                Pattern::Exact(path) => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, rel_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(rel_path, EntryKind::File))
    }
}

/// Relative form of `path` under `root`, trying a lexical match first and
/// falling back to canonical paths (the output file may not exist yet).
fn resolve_under_root(path: &Path, root: &Path) -> Option<String> {
    if let Some(rel) = relative_path(path, root) {
        return (!rel.is_empty()).then_some(rel);
    }

    let canonical_root = root.canonicalize().ok()?;
    let canonical_path = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            let parent = path.parent()?.canonicalize().ok()?;
            parent.join(path.file_name()?)
        }
    };

    relative_path(&canonical_path, &canonical_root).filter(|rel| !rel.is_empty())
}

/// Immutable set of rules consulted by the classifier
#[derive(Debug, Clone)]
pub struct RuleSet {
    patterns: Vec<Pattern>,
    extensions: HashSet<String>,
    content_omit: HashSet<String>,
    dynamic: DynamicExclusions,
}

impl RuleSet {
    /// Build a rule set from custom lists.
    ///
    /// Extensions may be given with or without the leading dot and in any
    /// case. Content-omit entries are exact relative paths.
    pub fn new<P, E, O>(patterns: P, extensions: E, content_omit: O) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
            content_omit: content_omit
                .into_iter()
                .map(|p| p.as_ref().trim_start_matches("./").to_string())
                .collect(),
            dynamic: DynamicExclusions::default(),
        })
    }

    /// Attach the exclusions computed for the current run
    pub fn with_dynamic(mut self, dynamic: DynamicExclusions) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Add one more exclusion pattern
    pub fn with_pattern(mut self, raw: &str) -> Result<Self> {
        self.patterns.push(Pattern::parse(raw)?);
        Ok(self)
    }

    /// Add one more exact path whose content is omitted
    #[cfg(test)]
    pub(crate) fn with_content_omit(mut self, rel_path: &str) -> Self {
        self.content_omit
            .insert(rel_path.trim_start_matches("./").to_string());
        self
    }

    pub fn dynamic(&self) -> &DynamicExclusions {
        &self.dynamic
    }

    /// Whether any path pattern or dynamic exclusion matches
    pub fn matches_path(&self, rel_path: &str, kind: EntryKind) -> bool {
        self.dynamic.contains(rel_path) || self.patterns.iter().any(|p| p.matches(rel_path, kind))
    }

    /// Whether the file's extension is on the deny list
    pub fn has_denied_extension(&self, rel_path: &str) -> bool {
        file_extension(rel_path).is_some_and(|ext| self.extensions.contains(&ext))
    }

    pub fn is_content_omitted(&self, rel_path: &str) -> bool {
        self.content_omit.contains(rel_path)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            content_omit: DEFAULT_CONTENT_OMIT.iter().map(|p| p.to_string()).collect(),
            dynamic: DynamicExclusions::default(),
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Lowercased text after the last `.` of the file name, if any
pub fn file_extension(rel_path: &str) -> Option<String> {
    let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Default path pattern strings
pub const DEFAULT_PATTERN_SOURCES: &[&str] = &[
    // Version Control
    ".git",
    ".hg",
    ".svn",
    // IDEs & Editors
    ".idea",
    ".vscode",
    "*.iml",
    ".ipr",
    ".iws",
    // Dart & Flutter tooling
    ".dart_tool",
    "build",
    "pubspec.lock",
    // iOS
    "ios/Pods",
    "ios/.symlinks",
    "ios/Flutter/App.framework",
    "ios/Flutter/Flutter.framework",
    "ios/Flutter/engine",
    "ios/DerivedData",
    "ios/Runner/Assets.xcassets",
    "ios/Runner.xcworkspace/xcuserdata",
    // Android
    "android/.gradle",
    "android/.idea",
    "android/app/build",
    "android/build",
    "android/key.properties",
    "android/local.properties",
    "android/gradlew",
    "android/gradlew.bat",
    "android/gradle/wrapper/gradle-wrapper.jar",
    // Desktop & Web
    "linux/flutter/ephemeral",
    "macos/flutter/ephemeral",
    "windows/flutter/ephemeral",
    "web/build",
    DEFAULT_OUTPUT_FILE,
];

/// Default path patterns, parsed from [`DEFAULT_PATTERN_SOURCES`]
pub static DEFAULT_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    DEFAULT_PATTERN_SOURCES
        .iter()
        .map(|p| Pattern::parse(p).expect("built-in pattern is valid"))
        .collect()
});

/// Default extension deny list
pub static DEFAULT_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Images
        "png", "jpg", "jpeg", "gif", "svg", "webp", "ico",
        // Audio
        "mp3", "wav", "ogg", "m4a",
        // Video
        "mp4", "mov", "avi", "webm",
        // Fonts
        "ttf", "otf", "woff", "woff2",
        // Archives
        "zip", "gz", "tar", "rar", "7z",
        // Compiled binaries
        "a", "so", "dll", "exe", "obj", "o", "dylib", "jar", "class",
        // Keystores
        "keystore", "jks",
        // Logs, OS and editor droppings
        "log", "DS_Store", "swp", "swo",
    ]
});

/// Default files listed without their content
pub static DEFAULT_CONTENT_OMIT: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "lib/firebase_options.dart",
        "lib/generated_plugin_registrant.dart",
        ".metadata",
        ".flutter-plugins",
        ".flutter-plugins-dependencies",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_patterns() {
        assert_eq!(
            Pattern::parse("build").unwrap(),
            Pattern::PrefixDir("build".into())
        );
        assert_eq!(
            Pattern::parse("./ios/Pods/").unwrap(),
            Pattern::PrefixDir("ios/Pods".into())
        );
        assert_eq!(
            Pattern::parse("*.iml").unwrap(),
            Pattern::SuffixGlob(".iml".into())
        );
        assert!(Pattern::parse("").is_err());
        assert!(Pattern::parse("/").is_err());
        assert!(Pattern::parse("*.").is_err());
        assert!(Pattern::parse("*foo").is_err());
    }

    #[test]
    fn prefix_dir_matches_itself_and_children_only() {
        let p = Pattern::parse("build").unwrap();
        assert!(p.matches("build", EntryKind::Directory));
        assert!(p.matches("build", EntryKind::File));
        assert!(p.matches("build/out.bin", EntryKind::File));
        assert!(!p.matches("buildscripts", EntryKind::Directory));
        assert!(!p.matches("src/build", EntryKind::Directory));
        assert!(!p.matches("Build", EntryKind::Directory));
    }

    #[test]
    fn suffix_glob_is_file_only() {
        let p = Pattern::parse("*.iml").unwrap();
        assert!(p.matches("app.iml", EntryKind::File));
        assert!(p.matches("android/app/app.iml", EntryKind::File));
        assert!(!p.matches("weird.iml", EntryKind::Directory));
        assert!(!p.matches("app.iml.bak", EntryKind::File));
    }

    #[test]
    fn exact_does_not_match_children() {
        let p = Pattern::Exact("out.txt".into());
        assert!(p.matches("out.txt", EntryKind::File));
        assert!(!p.matches("out.txt/inner", EntryKind::File));
    }

    #[test]
    fn extension_check_ignores_case() {
        let rules = RuleSet::new(Vec::<&str>::new(), [".PNG", "log"], Vec::<&str>::new()).unwrap();
        assert!(rules.has_denied_extension("img/logo.png"));
        assert!(rules.has_denied_extension("img/logo.Png"));
        assert!(rules.has_denied_extension("notes.LOG"));
        assert!(!rules.has_denied_extension("png"));
        assert!(!rules.has_denied_extension("logs/readme.md"));
    }

    #[test]
    fn file_extension_takes_last_dot() {
        assert_eq!(file_extension("a/b.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension(".DS_Store").as_deref(), Some("ds_store"));
        assert_eq!(file_extension("dir.d/Makefile"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn every_default_pattern_parses() {
        assert_eq!(DEFAULT_PATTERNS.len(), DEFAULT_PATTERN_SOURCES.len());
        assert!(DEFAULT_PATTERNS.contains(&Pattern::SuffixGlob(".iml".into())));
    }

    #[test]
    fn defaults_cover_flutter_tooling() {
        let rules = RuleSet::default();
        assert!(rules.matches_path(".git/config", EntryKind::File));
        assert!(rules.matches_path("android/key.properties", EntryKind::File));
        assert!(rules.matches_path(DEFAULT_OUTPUT_FILE, EntryKind::File));
        assert!(rules.has_denied_extension("ios/.DS_Store"));
        assert!(rules.is_content_omitted("lib/firebase_options.dart"));
        assert!(!rules.matches_path("lib/main.dart", EntryKind::File));
    }

    #[test]
    fn dynamic_exclusions_skip_duplicate_tool_path() {
        let root = Path::new("/proj");
        let out = Path::new("/proj/snap.txt");

        let same = DynamicExclusions::compute(root, out, Some(out));
        assert_eq!(same.paths(), ["snap.txt"]);

        let both = DynamicExclusions::compute(root, out, Some(Path::new("/proj/bin/tool")));
        assert_eq!(both.paths(), ["snap.txt", "bin/tool"]);
    }

    #[test]
    fn dynamic_exclusions_ignore_paths_outside_root() {
        let dynamic = DynamicExclusions::compute(
            Path::new("/nonexistent-projsnap-root"),
            Path::new("/nonexistent-elsewhere/snap.txt"),
            None,
        );
        assert!(dynamic.paths().is_empty());
    }
}
