//! # Output Rendering
//!
//! Terminal rendering for the CLI: whether to decorate output with emoji, how
//! to print a configuration, and a tree view of a forest.
//!
//! Decoration follows `--color`. In `auto` mode `NO_COLOR` (any value) and
//! `TERM=dumb` switch it off; otherwise `console` decides from `CLICOLOR`,
//! `CLICOLOR_FORCE` and whether stdout is a terminal.

use std::borrow::Cow;
use std::env;
use std::io;

use ptree::TreeItem;

use crate::configuration::Configuration;
use crate::forest::{Forest, ResolvedNode};

/// The `--color` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Case-insensitive; unrecognised values mean `Auto`.
    pub fn from_flag(flag: &str) -> Self {
        if flag.eq_ignore_ascii_case("always") {
            ColorChoice::Always
        } else if flag.eq_ignore_ascii_case("never") {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        }
    }
}

/// Whether CLI output is decorated.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn new(choice: ColorChoice) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                let var = |name: &str| env::var_os(name).map(|v| v.to_string_lossy().into_owned());
                !env_disables_color(var) && console::colors_enabled()
            }
        };
        Self { use_color }
    }

    /// Build from the raw `--color` value.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        Self::new(ColorChoice::from_flag(color_flag))
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

fn env_disables_color(var: impl Fn(&str) -> Option<String>) -> bool {
    var("NO_COLOR").is_some() || var("TERM").as_deref() == Some("dumb")
}

/// `decorated` when colors are on, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, decorated: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        decorated
    } else {
        plain
    }
}

/// Render a configuration as an indented `repo  version` table.
///
/// The tag is shown too when it is spelled differently from the version.
pub fn render_configuration(configuration: &Configuration) -> String {
    let width = configuration
        .iter()
        .map(|(repo, _)| repo.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (repo, release) in configuration.iter() {
        let version = release.version.to_string();
        if release.tag == version {
            out.push_str(&format!("  {:<width$}  {}\n", repo, version, width = width));
        } else {
            out.push_str(&format!(
                "  {:<width$}  {} (tag {})\n",
                repo,
                version,
                release.tag,
                width = width
            ));
        }
    }
    out
}

/// A printable node of a forest view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestTree {
    pub label: String,
    pub children: Vec<ForestTree>,
}

impl ForestTree {
    /// Build a view of `repo`'s forest: one branch per feasible version, each
    /// showing the pinned children, at most `max_depth` levels below the
    /// versions.
    pub fn from_forest(repo: &str, forest: &Forest, max_depth: usize) -> Self {
        let children = if forest.is_empty() {
            vec![ForestTree {
                label: "(no feasible version)".to_string(),
                children: Vec::new(),
            }]
        } else {
            forest
                .values()
                .rev()
                .map(|node| Self::from_node(repo, node, max_depth, 0))
                .collect()
        };

        ForestTree {
            label: repo.to_string(),
            children,
        }
    }

    fn from_node(repo: &str, node: &ResolvedNode, max_depth: usize, depth: usize) -> Self {
        let label = format!("{} {}", repo, node.release);
        let children = if depth >= max_depth {
            Vec::new()
        } else {
            node.children
                .iter()
                .map(|(child_repo, child)| Self::from_node(child_repo, child, max_depth, depth + 1))
                .collect()
        };
        ForestTree { label, children }
    }
}

impl TreeItem for ForestTree {
    type Child = ForestTree;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
