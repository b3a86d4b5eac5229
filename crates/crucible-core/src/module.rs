//! Modules group commands and nested submodules under shared alias
//! prefixes.

use std::sync::Arc;

use crate::command::Command;

/// A built module: a named group of commands and submodules.
///
/// The effective alias set of a nested module is the expansion of its
/// parent's paths with its own aliases; an empty alias passes the parent
/// path through unchanged instead of appending a segment.
#[derive(Debug)]
pub struct Module {
    name: String,
    aliases: Vec<String>,
    commands: Vec<Arc<Command>>,
    submodules: Vec<Module>,
}

impl Module {
    pub(crate) fn new(
        name: String,
        aliases: Vec<String>,
        commands: Vec<Arc<Command>>,
        submodules: Vec<Module>,
    ) -> Self {
        Self {
            name,
            aliases,
            commands,
            submodules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn submodules(&self) -> &[Module] {
        &self.submodules
    }

    /// Every `(command, full alias path)` pair this module tree registers.
    ///
    /// Registration treats the result as one batch: if any path fails to
    /// insert, none of the module's commands stay mapped.
    pub fn command_paths(&self) -> Vec<(Arc<Command>, Vec<String>)> {
        let mut out = Vec::new();
        self.collect(&[Vec::new()], &mut out);
        out
    }

    fn collect(&self, parent_paths: &[Vec<String>], out: &mut Vec<(Arc<Command>, Vec<String>)>) {
        let own_paths = expand(parent_paths, &self.aliases);
        for command in &self.commands {
            for path in expand(&own_paths, command.aliases()) {
                out.push((command.clone(), path));
            }
        }
        for submodule in &self.submodules {
            submodule.collect(&own_paths, out);
        }
    }
}

/// Expands `parents × aliases`; an empty alias yields the parent path
/// unchanged, and an empty alias list leaves the parents as they are.
fn expand(parents: &[Vec<String>], aliases: &[String]) -> Vec<Vec<String>> {
    if aliases.is_empty() {
        return parents.to_vec();
    }
    let mut out = Vec::with_capacity(parents.len() * aliases.len());
    for parent in parents {
        for alias in aliases {
            let mut path = parent.clone();
            if !alias.is_empty() {
                path.push(alias.clone());
            }
            out.push(path);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{CommandBuilder, ModuleBuilder};
    use crate::handler::handler_fn;

    fn noop_command(name: &str) -> CommandBuilder {
        CommandBuilder::new(name).handler(handler_fn(|_ctx| async { Ok(()) }))
    }

    #[test]
    fn test_nested_alias_expansion() {
        let module = ModuleBuilder::new("admin")
            .alias("admin")
            .alias("a")
            .module(
                ModuleBuilder::new("user")
                    .alias("user")
                    .command(noop_command("ban").alias("ban")),
            )
            .build()
            .unwrap();

        let mut paths: Vec<Vec<String>> = module
            .command_paths()
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["a".to_string(), "user".to_string(), "ban".to_string()],
                vec!["admin".to_string(), "user".to_string(), "ban".to_string()],
            ]
        );
    }

    #[test]
    fn test_empty_alias_passes_parent_through() {
        let module = ModuleBuilder::new("help")
            .alias("help")
            .command(noop_command("help").alias(""))
            .build()
            .unwrap();

        let paths: Vec<Vec<String>> = module
            .command_paths()
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        assert_eq!(paths, vec![vec!["help".to_string()]]);
    }

    #[test]
    fn test_module_without_aliases_adds_no_prefix() {
        let module = ModuleBuilder::new("general")
            .command(noop_command("ping").alias("ping"))
            .build()
            .unwrap();

        let paths: Vec<Vec<String>> = module
            .command_paths()
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        assert_eq!(paths, vec![vec!["ping".to_string()]]);
    }
}
