//! Ordering of command-map matches into overload groups.

use crate::map::Match;

/// Groups matches by full alias path and orders them for execution.
///
/// Across groups: longer paths first, then higher name word count (a
/// heuristic penalizing command names with embedded whitespace), then
/// higher parameter count. Within a group: higher declared priority
/// first.
///
/// The execution driver attempts only the best group's candidates; a
/// group with at least one syntactic match is terminal even when every
/// overload in it fails to parse.
pub fn rank_matches(mut matches: Vec<Match>, separator: &str) -> Vec<Vec<Match>> {
    matches.sort_by(|a, b| {
        b.path()
            .len()
            .cmp(&a.path().len())
            .then_with(|| {
                b.command()
                    .name_word_count()
                    .cmp(&a.command().name_word_count())
            })
            .then_with(|| {
                b.command()
                    .parameters()
                    .len()
                    .cmp(&a.command().parameters().len())
            })
    });

    let mut groups: Vec<(String, Vec<Match>)> = Vec::new();
    for m in matches {
        let key = m.path().join(separator);
        match groups.iter_mut().find(|(k, _)| k == &key) {
            Some((_, list)) => list.push(m),
            None => groups.push((key, vec![m])),
        }
    }
    for (_, list) in &mut groups {
        list.sort_by(|a, b| b.command().priority().cmp(&a.command().priority()));
    }
    groups.into_iter().map(|(_, list)| list).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{CommandBuilder, ParameterBuilder};
    use crate::config::ServiceConfig;
    use crate::handler::handler_fn;
    use crate::map::CommandMap;
    use std::sync::Arc;

    fn noop() -> Arc<dyn crate::handler::CommandHandler> {
        handler_fn(|_ctx| async { Ok(()) })
    }

    #[test]
    fn test_longer_path_wins() {
        let mut map = CommandMap::new(Arc::new(ServiceConfig::default()));
        map.add_command(
            CommandBuilder::new("user").handler(noop()).build().unwrap(),
            &["user".to_string()],
        )
        .unwrap();
        map.add_command(
            CommandBuilder::new("user info").handler(noop()).build().unwrap(),
            &["user".to_string(), "info".to_string()],
        )
        .unwrap();

        let groups = rank_matches(map.find_commands("user info"), " ");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].command().name(), "user info");
        assert_eq!(groups[1][0].command().name(), "user");
    }

    #[test]
    fn test_priority_orders_overloads() {
        let mut map = CommandMap::new(Arc::new(ServiceConfig::default()));
        let low = CommandBuilder::new("low")
            .parameter(ParameterBuilder::value::<String>("a"))
            .priority(0)
            .handler(noop())
            .build()
            .unwrap();
        let high = CommandBuilder::new("high")
            .parameter(ParameterBuilder::value::<i64>("a"))
            .priority(5)
            .handler(noop())
            .build()
            .unwrap();
        map.add_command(low, &["x".to_string()]).unwrap();
        map.add_command(high, &["x".to_string()]).unwrap();

        let groups = rank_matches(map.find_commands("x 1"), " ");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0][0].command().name(), "high");
        assert_eq!(groups[0][1].command().name(), "low");
    }

    #[test]
    fn test_parameter_count_breaks_path_ties() {
        let mut map = CommandMap::new(Arc::new(ServiceConfig::default()));
        let rich = CommandBuilder::new("two")
            .parameter(ParameterBuilder::value::<String>("a"))
            .parameter(ParameterBuilder::value::<String>("b").optional())
            .handler(noop())
            .build()
            .unwrap();
        let plain = CommandBuilder::new("one")
            .parameter(ParameterBuilder::value::<i64>("a"))
            .handler(noop())
            .build()
            .unwrap();
        // Distinct alias paths of equal length.
        map.add_command(rich, &["aa".to_string()]).unwrap();
        map.add_command(plain, &["bb".to_string()]).unwrap();

        let mut matches = map.find_commands("aa 1");
        matches.extend(map.find_commands("bb 1"));
        let groups = rank_matches(matches, " ");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].command().name(), "two");
    }
}
