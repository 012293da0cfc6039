//! Platform-specific Cursor paths.
//!
//! The layout is a static table keyed by OS identity:
//!
//! | Platform | User dir                                        | Extensions                     |
//! |----------|-------------------------------------------------|--------------------------------|
//! | Windows  | `%APPDATA%\Cursor\User`                         | `%LOCALAPPDATA%\Cursor\extensions` |
//! | Darwin   | `~/Library/Application Support/Cursor/User`     | `~/.cursor/extensions`         |
//! | Linux    | `~/.config/Cursor/User`                         | `~/.cursor/extensions`         |
//!
//! Settings, keybindings and snippets live in the user dir. Paths are joined
//! with the separator of the *target* platform, so the table can be checked
//! from any host.

use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const KEYBINDINGS_FILE: &str = "keybindings.json";
pub const PACKAGE_JSON_FILE: &str = "package.json";
pub const EXTENSIONS_DIR: &str = "extensions";
pub const SNIPPETS_DIR: &str = "snippets";
pub const USER_DIR: &str = "User";
const EDITOR_DIR: &str = "Cursor";
const DOT_EDITOR_DIR: &str = ".cursor";

/// Operating system family that decides the path layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Darwin,
    Linux,
}

impl Platform {
    /// The platform this binary is running on. Unknown systems use the Linux layout.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::Darwin,
            _ => Platform::Linux,
        }
    }

    /// Tag stored in a snapshot's `platform` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Darwin => "Darwin",
            Platform::Linux => "Linux",
        }
    }

    fn separator(&self) -> char {
        match self {
            Platform::Windows => '\\',
            _ => '/',
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Root directories the layout table is filled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseDirs {
    /// User home directory
    pub home: PathBuf,
    /// `%APPDATA%` (Windows only)
    pub app_data: PathBuf,
    /// `%LOCALAPPDATA%` (Windows only)
    pub local_app_data: PathBuf,
}

impl BaseDirs {
    /// Read the base directories from the running environment.
    ///
    /// Missing values become empty paths, matching how an unset `%APPDATA%`
    /// has always been treated.
    pub fn from_env() -> Self {
        let env_path = |name: &str| std::env::var_os(name).map(PathBuf::from).unwrap_or_default();
        Self {
            home: dirs::home_dir().unwrap_or_default(),
            app_data: env_path("APPDATA"),
            local_app_data: env_path("LOCALAPPDATA"),
        }
    }
}

/// The four locations Cursor keeps user configuration in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorPaths {
    pub settings: PathBuf,
    pub keybindings: PathBuf,
    pub extensions: PathBuf,
    pub snippets: PathBuf,
}

impl EditorPaths {
    /// Resolve the layout for `platform` from `base`.
    pub fn resolve(platform: Platform, base: &BaseDirs) -> Self {
        let (user_dir, extensions) = match platform {
            Platform::Windows => (
                join(platform, &base.app_data, &[EDITOR_DIR, USER_DIR]),
                join(platform, &base.local_app_data, &[EDITOR_DIR, EXTENSIONS_DIR]),
            ),
            Platform::Darwin => (
                join(
                    platform,
                    &base.home,
                    &["Library", "Application Support", EDITOR_DIR, USER_DIR],
                ),
                join(platform, &base.home, &[DOT_EDITOR_DIR, EXTENSIONS_DIR]),
            ),
            Platform::Linux => (
                join(platform, &base.home, &[".config", EDITOR_DIR, USER_DIR]),
                join(platform, &base.home, &[DOT_EDITOR_DIR, EXTENSIONS_DIR]),
            ),
        };

        Self {
            settings: join(platform, &user_dir, &[SETTINGS_FILE]),
            keybindings: join(platform, &user_dir, &[KEYBINDINGS_FILE]),
            extensions,
            snippets: join(platform, &user_dir, &[SNIPPETS_DIR]),
        }
    }

    /// Resolve for the running platform and environment.
    pub fn detect() -> Self {
        Self::resolve(Platform::current(), &BaseDirs::from_env())
    }

    /// Layout rooted at an arbitrary directory, mirroring the Linux layout.
    ///
    /// Used for scratch roots and the `--root` override.
    pub fn under(root: &Path) -> Self {
        let user_dir = root.join(USER_DIR);
        Self {
            settings: user_dir.join(SETTINGS_FILE),
            keybindings: user_dir.join(KEYBINDINGS_FILE),
            extensions: root.join(EXTENSIONS_DIR),
            snippets: user_dir.join(SNIPPETS_DIR),
        }
    }
}

/// Join path components with the separator of `platform`.
fn join(platform: Platform, root: &Path, parts: &[&str]) -> PathBuf {
    let sep = platform.separator();
    let mut out = root.to_string_lossy().into_owned();
    for part in parts {
        if !out.ends_with(sep) {
            out.push(sep);
        }
        out.push_str(part);
    }
    PathBuf::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn test_windows_layout() {
        let base = BaseDirs {
            home: PathBuf::from("C:\\Users\\test"),
            app_data: PathBuf::from("C:\\Users\\test\\AppData\\Roaming"),
            local_app_data: PathBuf::from("C:\\Users\\test\\AppData\\Local"),
        };
        let paths = EditorPaths::resolve(Platform::Windows, &base);
        assert_eq!(
            s(&paths.settings),
            "C:\\Users\\test\\AppData\\Roaming\\Cursor\\User\\settings.json"
        );
        assert_eq!(
            s(&paths.keybindings),
            "C:\\Users\\test\\AppData\\Roaming\\Cursor\\User\\keybindings.json"
        );
        assert_eq!(s(&paths.extensions), "C:\\Users\\test\\AppData\\Local\\Cursor\\extensions");
        assert_eq!(
            s(&paths.snippets),
            "C:\\Users\\test\\AppData\\Roaming\\Cursor\\User\\snippets"
        );
    }

    #[test]
    fn test_macos_layout() {
        let base = BaseDirs {
            home: PathBuf::from("/Users/test"),
            ..Default::default()
        };
        let paths = EditorPaths::resolve(Platform::Darwin, &base);
        assert_eq!(
            s(&paths.settings),
            "/Users/test/Library/Application Support/Cursor/User/settings.json"
        );
        assert_eq!(
            s(&paths.keybindings),
            "/Users/test/Library/Application Support/Cursor/User/keybindings.json"
        );
        assert_eq!(s(&paths.extensions), "/Users/test/.cursor/extensions");
        assert_eq!(
            s(&paths.snippets),
            "/Users/test/Library/Application Support/Cursor/User/snippets"
        );
    }

    #[test]
    fn test_linux_layout() {
        let base = BaseDirs {
            home: PathBuf::from("/home/test"),
            ..Default::default()
        };
        let paths = EditorPaths::resolve(Platform::Linux, &base);
        assert_eq!(s(&paths.settings), "/home/test/.config/Cursor/User/settings.json");
        assert_eq!(s(&paths.keybindings), "/home/test/.config/Cursor/User/keybindings.json");
        assert_eq!(s(&paths.extensions), "/home/test/.cursor/extensions");
        assert_eq!(s(&paths.snippets), "/home/test/.config/Cursor/User/snippets");
    }

    #[test]
    fn test_windows_with_unset_app_data() {
        let paths = EditorPaths::resolve(Platform::Windows, &BaseDirs::default());
        assert_eq!(s(&paths.settings), "\\Cursor\\User\\settings.json");
    }

    #[test]
    fn test_under_root() {
        let paths = EditorPaths::under(Path::new("/tmp/scratch"));
        assert_eq!(paths.settings, PathBuf::from("/tmp/scratch/User/settings.json"));
        assert_eq!(paths.extensions, PathBuf::from("/tmp/scratch/extensions"));
        assert_eq!(paths.snippets, PathBuf::from("/tmp/scratch/User/snippets"));
    }

    #[test]
    fn test_platform_tags() {
        assert_eq!(Platform::Windows.to_string(), "Windows");
        assert_eq!(Platform::Darwin.as_str(), "Darwin");
        assert_eq!(Platform::Linux.as_str(), "Linux");
    }
}
