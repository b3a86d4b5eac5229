//! The command map: a trie of alias path segments.
//!
//! Lookup walks the input text segment by segment under the configured
//! case sensitivity and separator rules, collecting a [`Match`] for every
//! command whose alias path is a valid prefix of the input — shorter and
//! longer paths both surface; ranking between them is a separate step
//! ([`crate::ranking`]).
//!
//! The map itself is a plain value. Concurrent use is built on top of it
//! by snapshotting: readers walk an immutable clone while a writer
//! prepares the next version (see the framework's service layer).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::command::Command;
use crate::config::{SeparatorRequirement, ServiceConfig};
use crate::error::MapError;

/// One candidate produced by [`CommandMap::find_commands`]: a command, the
/// alias path it matched under, and the unconsumed remainder text.
#[derive(Debug, Clone)]
pub struct Match {
    command: Arc<Command>,
    path: Vec<String>,
    raw_arguments: String,
}

impl Match {
    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    /// The matched alias path segments.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The leftover text, to be consumed by the command's argument parser.
    pub fn raw_arguments(&self) -> &str {
        &self.raw_arguments
    }

    pub fn into_parts(self) -> (Arc<Command>, Vec<String>, String) {
        (self.command, self.path, self.raw_arguments)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    commands: HashMap<String, Vec<Arc<Command>>>,
    children: HashMap<String, Node>,
}

impl Node {
    fn find(
        &self,
        text: &str,
        path: &mut Vec<String>,
        out: &mut Vec<Match>,
        config: &ServiceConfig,
    ) {
        if text.is_empty() {
            return;
        }
        for (segment, commands) in &self.commands {
            let Some(rest) = config.case_sensitivity.strip_prefix(text, segment) else {
                continue;
            };
            let raw_arguments = if rest.chars().all(char::is_whitespace) {
                ""
            } else if let Some(args) = strip_separator(rest, config) {
                args.trim_start()
            } else {
                continue;
            };
            for command in commands {
                let mut matched_path = path.clone();
                matched_path.push(segment.clone());
                out.push(Match {
                    command: command.clone(),
                    path: matched_path,
                    raw_arguments: raw_arguments.to_string(),
                });
            }
        }
        for (segment, child) in &self.children {
            let Some(rest) = config.case_sensitivity.strip_prefix(text, segment) else {
                continue;
            };
            let Some(next) = strip_separator(rest, config) else {
                continue;
            };
            path.push(segment.clone());
            child.find(next, path, out, config);
            path.pop();
        }
    }
}

/// Returns the text after the segment separator, or `None` when the
/// required separator does not follow.
fn strip_separator<'t>(rest: &'t str, config: &ServiceConfig) -> Option<&'t str> {
    match config.separator_requirement {
        SeparatorRequirement::Separator => {
            if config.separator_is_whitespace() {
                strip_whitespace(rest)
            } else {
                rest.strip_prefix(config.separator.as_str())
            }
        }
        SeparatorRequirement::SeparatorOrWhitespace => rest
            .strip_prefix(config.separator.as_str())
            .or_else(|| strip_whitespace(rest)),
    }
}

fn strip_whitespace(rest: &str) -> Option<&str> {
    let trimmed = rest.trim_start();
    (trimmed.len() < rest.len()).then_some(trimmed)
}

/// The alias trie. Nodes are created lazily on insert; removing the last
/// command under a terminal segment drops that entry, while intermediate
/// child nodes are retained.
#[derive(Debug, Clone)]
pub struct CommandMap {
    config: Arc<ServiceConfig>,
    root: Node,
}

impl CommandMap {
    pub fn new(config: Arc<ServiceConfig>) -> Self {
        Self {
            config,
            root: Node::default(),
        }
    }

    pub fn config(&self) -> &Arc<ServiceConfig> {
        &self.config
    }

    /// Inserts `command` at the node reached by `segments`, creating
    /// intermediate nodes as needed.
    ///
    /// Fails when `segments` is empty or a colliding signature already
    /// exists at the destination.
    pub fn add_command(&mut self, command: Arc<Command>, segments: &[String]) -> Result<(), MapError> {
        let folded: Vec<String> = segments
            .iter()
            .map(|s| self.config.case_sensitivity.fold(s).into_owned())
            .collect();
        let Some((last, intermediate)) = folded.split_last() else {
            return Err(MapError::EmptyPath {
                command: command.name().to_string(),
            });
        };

        let mut node = &mut self.root;
        for segment in intermediate {
            node = node.children.entry(segment.clone()).or_default();
        }
        let list = node.commands.entry(last.clone()).or_default();
        for existing in list.iter() {
            check_collision(&command, existing, last)?;
        }
        debug!(command = %command.name(), path = %folded.join(" "), "command mapped");
        list.push(command);
        Ok(())
    }

    /// Removes `command` (by identity) from the terminal node for
    /// `segments`. Returns whether anything was removed.
    pub fn remove_command(&mut self, command: &Arc<Command>, segments: &[String]) -> bool {
        let folded: Vec<String> = segments
            .iter()
            .map(|s| self.config.case_sensitivity.fold(s).into_owned())
            .collect();
        let Some((last, intermediate)) = folded.split_last() else {
            return false;
        };

        let mut node = &mut self.root;
        for segment in intermediate {
            match node.children.get_mut(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        let Some(list) = node.commands.get_mut(last) else {
            return false;
        };
        let before = list.len();
        list.retain(|c| !Arc::ptr_eq(c, command));
        let removed = list.len() < before;
        if list.is_empty() {
            node.commands.remove(last);
        }
        if removed {
            debug!(command = %command.name(), path = %folded.join(" "), "command unmapped");
        }
        removed
    }

    /// Collects every command whose alias path is a valid prefix of
    /// `text`, together with the unconsumed remainder.
    pub fn find_commands(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut path = Vec::new();
        self.root
            .find(text.trim_start(), &mut path, &mut matches, &self.config);
        trace!(matches = matches.len(), "command lookup");
        matches
    }
}

/// Signature-collision rule for two commands at one terminal segment.
///
/// Same type sequence and same remainder-ness is always an error. With
/// exactly one remainder the pair stays ambiguous when the non-remainder
/// overload ignores extra arguments, since both then accept any input.
fn check_collision(command: &Command, existing: &Command, segment: &str) -> Result<(), MapError> {
    let signature = command.signature();
    let other = existing.signature();
    if signature.identifier() != other.identifier() {
        return Ok(());
    }
    if signature.has_remainder() == other.has_remainder() {
        return Err(MapError::DuplicateSignature {
            command: command.name().to_string(),
            existing: existing.name().to_string(),
            segment: segment.to_string(),
        });
    }
    let plain_ignores_extras = if signature.has_remainder() {
        existing.ignores_extra_arguments()
    } else {
        command.ignores_extra_arguments()
    };
    if plain_ignores_extras {
        return Err(MapError::AmbiguousRemainder {
            command: command.name().to_string(),
            existing: existing.name().to_string(),
            segment: segment.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{CommandBuilder, ParameterBuilder};
    use crate::config::CaseSensitivity;
    use crate::handler::handler_fn;

    fn command(name: &str) -> Arc<Command> {
        CommandBuilder::new(name)
            .handler(handler_fn(|_ctx| async { Ok(()) }))
            .build()
            .unwrap()
    }

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn map() -> CommandMap {
        CommandMap::new(Arc::new(ServiceConfig::default()))
    }

    #[test]
    fn test_find_returns_remainder_text() {
        let mut map = map();
        map.add_command(command("ban"), &segments(&["ban"])).unwrap();

        let matches = map.find_commands("ban alice spamming");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path(), ["ban".to_string()]);
        assert_eq!(matches[0].raw_arguments(), "alice spamming");
    }

    #[test]
    fn test_exact_match_has_empty_arguments() {
        let mut map = map();
        map.add_command(command("ping"), &segments(&["ping"])).unwrap();

        let matches = map.find_commands("ping");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_arguments(), "");
        let matches = map.find_commands("ping   ");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_arguments(), "");
    }

    #[test]
    fn test_prefix_without_separator_is_no_match() {
        let mut map = map();
        map.add_command(command("ping"), &segments(&["ping"])).unwrap();
        assert!(map.find_commands("pingx").is_empty());
    }

    #[test]
    fn test_nested_path() {
        let mut map = map();
        map.add_command(command("ban"), &segments(&["admin", "user", "ban"]))
            .unwrap();

        let matches = map.find_commands("admin user ban alice");
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].path(),
            ["admin".to_string(), "user".to_string(), "ban".to_string()]
        );
        assert_eq!(matches[0].raw_arguments(), "alice");
        assert!(map.find_commands("admin user").is_empty());
    }

    #[test]
    fn test_ambiguous_lengths_both_surface() {
        let mut map = map();
        map.add_command(command("user"), &segments(&["user"])).unwrap();
        map.add_command(command("user info"), &segments(&["user", "info"]))
            .unwrap();

        let matches = map.find_commands("user info 42");
        assert_eq!(matches.len(), 2);
        let mut raws: Vec<&str> = matches.iter().map(Match::raw_arguments).collect();
        raws.sort();
        assert_eq!(raws, ["42", "info 42"]);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut map = map();
        map.add_command(command("Ping"), &segments(&["Ping"])).unwrap();
        assert_eq!(map.find_commands("PING").len(), 1);
        assert_eq!(map.find_commands("ping").len(), 1);
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let config = ServiceConfig {
            case_sensitivity: CaseSensitivity::Sensitive,
            ..Default::default()
        };
        let mut map = CommandMap::new(Arc::new(config));
        map.add_command(command("Ping"), &segments(&["Ping"])).unwrap();
        assert!(map.find_commands("ping").is_empty());
        assert_eq!(map.find_commands("Ping").len(), 1);
    }

    #[test]
    fn test_custom_separator() {
        let config = ServiceConfig {
            separator: "!".to_string(),
            ..Default::default()
        };
        let mut map = CommandMap::new(Arc::new(config));
        map.add_command(command("ban"), &segments(&["mod", "ban"]))
            .unwrap();

        let matches = map.find_commands("mod!ban alice");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_arguments(), "alice");
        // Plain whitespace does not satisfy a non-whitespace separator.
        assert!(map.find_commands("mod ban alice").is_empty());
    }

    #[test]
    fn test_separator_or_whitespace_mode() {
        let config = ServiceConfig {
            separator: "!".to_string(),
            separator_requirement: SeparatorRequirement::SeparatorOrWhitespace,
            ..Default::default()
        };
        let mut map = CommandMap::new(Arc::new(config));
        map.add_command(command("ban"), &segments(&["mod", "ban"]))
            .unwrap();

        assert_eq!(map.find_commands("mod!ban alice").len(), 1);
        assert_eq!(map.find_commands("mod ban alice").len(), 1);
    }

    #[test]
    fn test_multi_word_segment() {
        let mut map = map();
        map.add_command(command("user info"), &segments(&["user info"]))
            .unwrap();
        let matches = map.find_commands("user info 42");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_arguments(), "42");
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut map = map();
        let err = map.add_command(command("ban"), &[]).unwrap_err();
        assert!(matches!(err, MapError::EmptyPath { command } if command == "ban"));
    }

    #[test]
    fn test_duplicate_signature_rejected() {
        let mut map = map();
        map.add_command(command("a"), &segments(&["x"])).unwrap();
        let err = map.add_command(command("b"), &segments(&["x"])).unwrap_err();
        assert!(matches!(err, MapError::DuplicateSignature { .. }));
    }

    #[test]
    fn test_distinct_signatures_overload() {
        let mut map = map();
        let with_arg = CommandBuilder::new("x-num")
            .parameter(ParameterBuilder::value::<i64>("n"))
            .handler(handler_fn(|_ctx| async { Ok(()) }))
            .build()
            .unwrap();
        map.add_command(command("x-empty"), &segments(&["x"])).unwrap();
        map.add_command(with_arg, &segments(&["x"])).unwrap();
        assert_eq!(map.find_commands("x 5").len(), 2);
    }

    #[test]
    fn test_remainder_with_extras_ignoring_twin_rejected() {
        let mut map = map();
        let with_remainder = CommandBuilder::new("say-rest")
            .parameter(ParameterBuilder::remainder::<String>("text"))
            .handler(handler_fn(|_ctx| async { Ok(()) }))
            .build()
            .unwrap();
        let ignoring = CommandBuilder::new("say-one")
            .parameter(ParameterBuilder::value::<String>("text"))
            .ignore_extra_arguments()
            .handler(handler_fn(|_ctx| async { Ok(()) }))
            .build()
            .unwrap();
        map.add_command(with_remainder, &segments(&["say"])).unwrap();
        let err = map.add_command(ignoring, &segments(&["say"])).unwrap_err();
        assert!(matches!(err, MapError::AmbiguousRemainder { .. }));
    }

    #[test]
    fn test_remove_command() {
        let mut map = map();
        let ban = command("ban");
        map.add_command(ban.clone(), &segments(&["ban"])).unwrap();
        assert!(map.remove_command(&ban, &segments(&["ban"])));
        assert!(map.find_commands("ban").is_empty());
        assert!(!map.remove_command(&ban, &segments(&["ban"])));
    }

    #[test]
    fn test_remove_keeps_siblings() {
        let mut map = map();
        let a = command("a");
        let b = CommandBuilder::new("b")
            .parameter(ParameterBuilder::value::<i64>("n"))
            .handler(handler_fn(|_ctx| async { Ok(()) }))
            .build()
            .unwrap();
        map.add_command(a.clone(), &segments(&["x"])).unwrap();
        map.add_command(b, &segments(&["x"])).unwrap();
        map.remove_command(&a, &segments(&["x"]));
        assert_eq!(map.find_commands("x 1").len(), 1);
    }
}
