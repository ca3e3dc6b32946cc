//! Default configuration values

/// Base name of configuration files
pub const CONFIG_BASENAME: &str = "bumpr";

/// Recognised configuration extensions, in lookup order
pub const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Version used when nothing else can be found
pub const INITIAL_VERSION: &str = "0.0.0";

/// Default format for date tokens
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Environment variable overriding `release.github.token`
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Project-level configuration file names to search for
pub fn config_file_names() -> Vec<String> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| format!("{}.{}", CONFIG_BASENAME, ext))
        .collect()
}

/// User-level configuration file names, looked up in the home directory
pub fn user_config_file_names() -> Vec<String> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}.{}", CONFIG_BASENAME, ext))
        .collect()
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r####"# bumpr configuration

# Files holding the version: path = [pattern, replacement, flags?]
# The first capture group of the pattern is the version.
[files]
# "VERSION" = ['^(\d+\.\d+\.\d+.*)$', "[version]", "m"]

[version]
initial = "0.0.0"

[changelog]
enabled = true
create = false
file = "CHANGELOG.md"
version = "### Version [version]"
commit = "- [message]"
separator = "\n"

[commit]
enabled = true
message = "Bumped version to [version]"

[tag]
enabled = true
name = "v[version]"

[release]
enabled = false

[release.github]
enabled = false
draft = true
prerelease = false
files = []

[tokens.date]
format = "%Y-%m-%d"

[tokens.version_date]
format = "%Y-%m-%d"

[scripts]
enabled = true
"####;
