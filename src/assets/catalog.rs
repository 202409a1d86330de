use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{ForgeError, ForgeResult};

/// Layer category; one directory per category under the asset root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Base layer.
    Background,
    /// Clothing overlay.
    Clothing,
    /// Face overlay.
    Expression,
    /// Optional text overlay.
    Text,
    /// Rare overlay replacing clothing and expression.
    Rare,
    /// Finished artworks copied verbatim.
    SecretRare,
}

impl Category {
    /// Every category in layer order.
    pub const ALL: [Category; 6] = [
        Category::Background,
        Category::Clothing,
        Category::Expression,
        Category::Text,
        Category::Rare,
        Category::SecretRare,
    ];

    /// Directory name under the asset root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Background => "Background",
            Category::Clothing => "Clothing",
            Category::Expression => "Expression",
            Category::Text => "Text",
            Category::Rare => "Rare",
            Category::SecretRare => "SecretRare",
        }
    }

    // Older asset trees ship the background folder misspelled.
    fn alias_dir_name(self) -> Option<&'static str> {
        match self {
            Category::Background => Some("Backgound"),
            _ => None,
        }
    }

    fn required(self) -> bool {
        self != Category::SecretRare
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Layer file names per category, read once at startup.
///
/// Names are sorted so iteration order (and therefore seeded sampling) does not depend on
/// the platform's directory listing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetCatalog {
    root: PathBuf,
    dirs: [PathBuf; 6],
    /// Background file names.
    pub backgrounds: Vec<String>,
    /// Clothing file names.
    pub clothing: Vec<String>,
    /// Expression file names.
    pub expressions: Vec<String>,
    /// Text file names.
    pub text: Vec<String>,
    /// Rare overlay file names.
    pub rare: Vec<String>,
    /// Secret rare artwork file names.
    pub secret_rare: Vec<String>,
}

impl AssetCatalog {
    /// Enumerate every category directory under `root`.
    ///
    /// All categories except `SecretRare` must exist; only `Background` must be non-empty.
    /// Whether the other categories hold enough assets depends on the quota and is checked
    /// when sampling starts.
    #[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>) -> ForgeResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ForgeError::config(format!(
                "asset root '{}' is not a directory",
                root.display()
            )));
        }

        let mut out = Self {
            root: root.clone(),
            ..Self::default()
        };

        for category in Category::ALL {
            let Some(dir) = resolve_dir(&root, category) else {
                if category.required() {
                    return Err(ForgeError::config(format!(
                        "missing asset directory '{}'",
                        root.join(category.dir_name()).display()
                    )));
                }
                out.dirs[category as usize] = root.join(category.dir_name());
                continue;
            };

            let names = list_files(&dir)?;
            if category == Category::Background && names.is_empty() {
                return Err(ForgeError::config(format!(
                    "asset directory '{}' is empty",
                    dir.display()
                )));
            }
            tracing::debug!(%category, count = names.len(), dir = %dir.display(), "loaded category");
            out.dirs[category as usize] = dir;
            *out.names_mut(category) = names;
        }

        Ok(out)
    }

    /// Build an in-memory catalog rooted at `root` with the canonical directory names.
    pub fn from_parts(
        root: impl Into<PathBuf>,
        backgrounds: Vec<String>,
        clothing: Vec<String>,
        expressions: Vec<String>,
        text: Vec<String>,
        rare: Vec<String>,
        secret_rare: Vec<String>,
    ) -> Self {
        let root = root.into();
        let dirs = Category::ALL.map(|c| root.join(c.dir_name()));
        Self {
            root,
            dirs,
            backgrounds,
            clothing,
            expressions,
            text,
            rare,
            secret_rare,
        }
    }

    /// Asset root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names for `category`.
    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::Background => &self.backgrounds,
            Category::Clothing => &self.clothing,
            Category::Expression => &self.expressions,
            Category::Text => &self.text,
            Category::Rare => &self.rare,
            Category::SecretRare => &self.secret_rare,
        }
    }

    fn names_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Background => &mut self.backgrounds,
            Category::Clothing => &mut self.clothing,
            Category::Expression => &mut self.expressions,
            Category::Text => &mut self.text,
            Category::Rare => &mut self.rare,
            Category::SecretRare => &mut self.secret_rare,
        }
    }

    /// Secret rare artworks left over once the first `wanted` are used, in catalog order.
    pub fn unused_secret_rares(&self, wanted: u64) -> &[String] {
        let used = usize::try_from(wanted).unwrap_or(usize::MAX);
        self.secret_rare.get(used..).unwrap_or_default()
    }

    /// Filesystem path of `name` within `category`.
    pub fn path_of(&self, category: Category, name: &str) -> PathBuf {
        self.dirs[category as usize].join(name)
    }
}

fn resolve_dir(root: &Path, category: Category) -> Option<PathBuf> {
    let canonical = root.join(category.dir_name());
    if canonical.is_dir() {
        return Some(canonical);
    }
    let alias = root.join(category.alias_dir_name()?);
    if alias.is_dir() {
        tracing::warn!(
            dir = %alias.display(),
            "using misspelled directory name for {category}"
        );
        return Some(alias);
    }
    None
}

fn list_files(dir: &Path) -> ForgeResult<Vec<String>> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("read asset directory '{}'", dir.display()))?;

    let mut names = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            return Err(ForgeError::config(format!(
                "asset file name is not valid UTF-8: '{}'",
                path.display()
            )));
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name.to_string());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
