//! Extension-based file categorization.
//!
//! The category table is fixed: an ordered list of categories, each owning a set
//! of lowercase extensions (with the leading dot). Lookup walks the table in
//! order and the first category containing the extension wins. The last entry
//! is the catch-all and owns no extensions.
//!
//! # Examples
//!
//! ```
//! use sortdir::file_category::CategoryTable;
//!
//! let table = CategoryTable::standard();
//! assert_eq!(table.classify(".jpg").name(), "Photos");
//! assert_eq!(table.classify(".PDF").name(), "Documents");
//! assert_eq!(table.classify(".unknown").name(), "Others");
//! ```
use std::path::Path;

/// A named bucket of file extensions.
///
/// The `name` is used both as the destination folder name and as the key in
/// run statistics. The `glyph` is purely decorative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    name: &'static str,
    glyph: &'static str,
    extensions: &'static [&'static str],
}

impl Category {
    const fn new(
        name: &'static str,
        glyph: &'static str,
        extensions: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            glyph,
            extensions,
        }
    }

    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::standard();
    /// assert_eq!(table.fallback().name(), "Others");
    /// ```
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a label suitable for terminal display, e.g. `📸 Photos`.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.glyph, self.name)
    }

    /// Extensions owned by this category, lowercase with a leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    /// Returns true if this is a catch-all category (no extensions).
    pub fn is_catch_all(&self) -> bool {
        self.extensions.is_empty()
    }

    fn contains(&self, normalized_ext: &str) -> bool {
        self.extensions.contains(&normalized_ext)
    }
}

const OTHERS: Category = Category::new("Others", "📂", &[]);

static STANDARD_CATEGORIES: [Category; 9] = [
    Category::new(
        "Photos",
        "📸",
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".tif", ".webp", ".heic", ".heif",
            ".raw", ".cr2", ".nef", ".svg", ".ico",
        ],
    ),
    Category::new(
        "Videos",
        "🎬",
        &[
            ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".mpeg", ".mpg",
            ".3gp", ".ts", ".vob",
        ],
    ),
    Category::new(
        "Audios",
        "🎵",
        &[
            ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".opus", ".aiff", ".alac",
            ".mid", ".midi",
        ],
    ),
    Category::new(
        "Documents",
        "📄",
        &[
            ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt", ".csv", ".odt",
            ".ods", ".odp", ".rtf", ".pages", ".numbers", ".key", ".epub", ".mobi",
        ],
    ),
    Category::new(
        "Archives",
        "🗜️",
        &[
            ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso", ".dmg", ".cab",
        ],
    ),
    Category::new(
        "Code",
        "💻",
        &[
            ".py", ".js", ".ts", ".html", ".css", ".java", ".c", ".cpp", ".cs", ".php", ".rb",
            ".go", ".rs", ".swift", ".kt", ".sh", ".bat", ".ps1", ".sql", ".json", ".xml",
            ".yaml", ".yml", ".toml",
        ],
    ),
    Category::new(
        "Design",
        "🖼️",
        &[
            ".psd", ".ai", ".xd", ".fig", ".sketch", ".indd", ".afphoto", ".afdesign", ".blend",
            ".fbx", ".obj",
        ],
    ),
    Category::new(
        "Executables",
        "📦",
        &[".exe", ".msi", ".apk", ".app", ".deb", ".rpm", ".pkg"],
    ),
    OTHERS,
];

static STANDARD_TABLE: CategoryTable = CategoryTable {
    categories: &STANDARD_CATEGORIES,
};

/// Ordered, read-only table of categories.
///
/// Only the built-in table exists; it cannot be edited at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    categories: &'static [Category],
}

impl CategoryTable {
    /// Returns the built-in category table.
    pub fn standard() -> &'static CategoryTable {
        &STANDARD_TABLE
    }

    /// Iterates categories in lookup order, catch-all last.
    pub fn iter(&self) -> impl Iterator<Item = &'static Category> + '_ {
        self.categories.iter()
    }

    /// The category used when nothing else matches.
    pub fn fallback(&self) -> &'static Category {
        self.categories
            .iter()
            .rev()
            .find(|category| category.is_catch_all())
            .unwrap_or(&OTHERS)
    }

    /// Maps an extension to its category.
    ///
    /// The extension is lowercased before lookup and is expected to carry its
    /// leading dot (`".jpg"`). Anything that matches no category, including the
    /// empty string, lands in the catch-all.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::standard();
    /// assert_eq!(table.classify(".JPG").name(), "Photos");
    /// assert_eq!(table.classify("").name(), "Others");
    /// ```
    pub fn classify(&self, extension: &str) -> &'static Category {
        let normalized = extension.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.contains(&normalized))
            .unwrap_or_else(|| self.fallback())
    }

    /// Classifies a path by its final extension.
    pub fn classify_path(&self, path: &Path) -> &'static Category {
        self.classify(&extension_of(path))
    }
}

/// Returns the final extension of `path` with its leading dot, or an empty string.
///
/// Only the last suffix counts (`archive.tar.gz` yields `.gz`), and a name that
/// ends in a dot has no extension.
///
/// # Examples
///
/// ```
/// use sortdir::file_category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("/tmp/a.JPG")), ".JPG");
/// assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
/// assert_eq!(extension_of(Path::new("Makefile")), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => String::new(),
    }
}
