//! The command service: registration, lookup, and the execution pipeline.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::RwLock;
use tower::Service;
use tracing::{debug, trace};

use crucible_core::{
    Command, CommandContext, CommandMap, Match, Module, RunMode, ServiceConfig, StateMap,
    rank_matches,
};

use crate::bind::bind_arguments;
use crate::checks::run_checks;
use crate::cooldown::{BucketKeyProvider, CooldownGate};
use crate::error::ExecutionFailure;

/// One execution request: the raw input plus whatever invocation state the
/// host wants visible to parsers, checks, and handlers.
#[derive(Debug, Clone, Default)]
pub struct ExecuteRequest {
    pub input: String,
    pub state: StateMap,
}

impl ExecuteRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            state: StateMap::new(),
        }
    }

    pub fn with_state(mut self, state: StateMap) -> Self {
        self.state = state;
        self
    }
}

/// What became of one execution request.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The command ran to completion. `run_mode` is the command's declared
    /// (or the service default) mode, passed through for hosts that drive
    /// parallel execution themselves.
    Succeeded {
        command: Arc<Command>,
        run_mode: RunMode,
    },
    Failed(ExecutionFailure),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded { .. })
    }

    pub fn failure(&self) -> Option<&ExecutionFailure> {
        match self {
            ExecutionOutcome::Failed(failure) => Some(failure),
            ExecutionOutcome::Succeeded { .. } => None,
        }
    }
}

struct ServiceInner {
    config: Arc<ServiceConfig>,
    /// Copy-on-write snapshot: readers clone the `Arc` and walk the map
    /// without holding the lock; writers build the next version and swap.
    map: RwLock<Arc<CommandMap>>,
    modules: RwLock<Vec<Arc<Module>>>,
    cooldowns: CooldownGate,
    bucket_keys: Option<Arc<dyn BucketKeyProvider>>,
}

/// The service tying the core together: module registration into the
/// command map, match ranking, argument parsing and binding, checks,
/// cooldowns, and handler invocation.
///
/// Cheaply cloneable; clones share the same registration state.
#[derive(Clone)]
pub struct CommandService {
    inner: Arc<ServiceInner>,
}

impl CommandService {
    pub fn new(config: ServiceConfig) -> Self {
        Self::build(config, None)
    }

    /// A service with cooldown support. Without a provider, declared
    /// cooldowns are inert.
    pub fn with_bucket_keys(config: ServiceConfig, provider: Arc<dyn BucketKeyProvider>) -> Self {
        Self::build(config, Some(provider))
    }

    fn build(config: ServiceConfig, bucket_keys: Option<Arc<dyn BucketKeyProvider>>) -> Self {
        let config = Arc::new(config);
        Self {
            inner: Arc::new(ServiceInner {
                map: RwLock::new(Arc::new(CommandMap::new(config.clone()))),
                config,
                modules: RwLock::new(Vec::new()),
                cooldowns: CooldownGate::new(),
                bucket_keys,
            }),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Registers every command of a module tree as one batch.
    ///
    /// All-or-nothing: on any path or signature conflict the map is left
    /// exactly as it was and the error is returned.
    pub fn add_module(&self, module: Module) -> Result<(), crucible_core::MapError> {
        let module = Arc::new(module);
        let mut guard = self.inner.map.write();
        let mut next = (**guard).clone();
        for (command, path) in module.command_paths() {
            next.add_command(command, &path)?;
        }
        *guard = Arc::new(next);
        drop(guard);
        debug!(module = module.name(), "module registered");
        self.inner.modules.write().push(module);
        Ok(())
    }

    /// Unregisters the first module with the given name, removing every
    /// command it mapped. Returns whether a module was found.
    pub fn remove_module(&self, name: &str) -> bool {
        let module = {
            let mut modules = self.inner.modules.write();
            match modules.iter().position(|m| m.name() == name) {
                Some(index) => modules.remove(index),
                None => return false,
            }
        };
        let mut guard = self.inner.map.write();
        let mut next = (**guard).clone();
        for (command, path) in module.command_paths() {
            next.remove_command(&command, &path);
        }
        *guard = Arc::new(next);
        debug!(module = module.name(), "module removed");
        true
    }

    /// Every command whose alias path is a valid prefix of `input`.
    ///
    /// Runs against a snapshot of the map; no lock is held during the
    /// walk.
    pub fn find_commands(&self, input: &str) -> Vec<Match> {
        let map = self.inner.map.read().clone();
        map.find_commands(input)
    }

    /// Runs the full pipeline for one input.
    pub async fn execute(&self, input: &str, state: StateMap) -> ExecutionOutcome {
        let matches = self.find_commands(input);
        if matches.is_empty() {
            return ExecutionOutcome::Failed(ExecutionFailure::CommandNotFound);
        }
        let separator = &self.inner.config.separator;
        let Some(group) = rank_matches(matches, separator).into_iter().next() else {
            return ExecutionOutcome::Failed(ExecutionFailure::CommandNotFound);
        };
        let Some(first) = group.first() else {
            return ExecutionOutcome::Failed(ExecutionFailure::CommandNotFound);
        };
        let path = first.path().join(separator);

        // Overloads are attempted in ranked order; the first whose
        // arguments parse, bind, and pass checks is the chosen command.
        // The group is terminal: a failure here never falls through to a
        // shorter alias path.
        let mut failures = Vec::new();
        for candidate in group {
            match self.try_accept(candidate, &state).await {
                Ok(ctx) => return self.invoke(ctx).await,
                Err(failure) => {
                    trace!(path = %path, %failure, "overload rejected");
                    failures.push(failure);
                }
            }
        }
        if failures.len() == 1 {
            ExecutionOutcome::Failed(failures.remove(0))
        } else {
            ExecutionOutcome::Failed(ExecutionFailure::OverloadsFailed { path, failures })
        }
    }

    /// Parses, binds, and checks one candidate without invoking it.
    async fn try_accept(
        &self,
        candidate: Match,
        state: &StateMap,
    ) -> Result<CommandContext, ExecutionFailure> {
        let (command, path, raw_text) = candidate.into_parts();
        let raw = command
            .argument_parser()
            .parse(&command, &raw_text, &self.inner.config)
            .map_err(|failure| ExecutionFailure::ArgumentParse {
                command: command.name().to_string(),
                failure,
            })?;

        let mut ctx = CommandContext::new(command.clone(), path, raw, state.clone());
        let arguments = bind_arguments(&ctx).await?;
        ctx.set_arguments(arguments);

        run_checks(&command, &ctx)
            .await
            .map_err(|failure| ExecutionFailure::CheckFailed {
                command: command.name().to_string(),
                failure,
            })?;
        Ok(ctx)
    }

    /// Gates on cooldowns and runs the handler. The command is already
    /// chosen at this point, so failures are terminal.
    async fn invoke(&self, ctx: CommandContext) -> ExecutionOutcome {
        let command = Arc::clone(ctx.command());
        if let Err(retry_after) =
            self.inner
                .cooldowns
                .hit(&command, &ctx, self.inner.bucket_keys.as_deref())
        {
            return ExecutionOutcome::Failed(ExecutionFailure::OnCooldown {
                command: command.name().to_string(),
                retry_after,
            });
        }

        let run_mode = command
            .run_mode()
            .unwrap_or(self.inner.config.default_run_mode);
        debug!(command = command.name(), "executing command");
        match command.handler().invoke(Arc::new(ctx)).await {
            Ok(()) => ExecutionOutcome::Succeeded { command, run_mode },
            Err(error) => ExecutionOutcome::Failed(ExecutionFailure::HandlerFailed {
                command: command.name().to_string(),
                reason: error.to_string(),
            }),
        }
    }
}

/// Tower integration: hosts can stack timeout or rate-limit layers on the
/// service the same way they would on any other middleware chain.
impl Service<ExecuteRequest> for CommandService {
    type Response = ExecutionOutcome;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: ExecuteRequest) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.execute(&request.input, request.state).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crucible_core::{
        Check, CheckFailure, CommandBuilder, Cooldown, ModuleBuilder, ParameterBuilder,
        ParseFailure, handler_fn,
    };
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Clone)]
    struct CallerId(String);

    struct PerUser;

    impl BucketKeyProvider for PerUser {
        fn key(&self, bucket: &str, ctx: &CommandContext) -> Option<String> {
            (bucket == "user")
                .then(|| ctx.state::<CallerId>().map(|id| id.0.clone()))
                .flatten()
        }
    }

    fn ban_module(seen: Arc<Mutex<Vec<(String, String, String)>>>) -> Module {
        ModuleBuilder::new("moderation")
            .command(
                CommandBuilder::new("ban")
                    .parameter(ParameterBuilder::value::<String>("user"))
                    .parameter(
                        ParameterBuilder::option::<String>("reason")
                            .short('r')
                            .long("reason"),
                    )
                    .parameter(ParameterBuilder::remainder::<String>("note").optional())
                    .handler(handler_fn(move |ctx| {
                        let seen = seen.clone();
                        async move {
                            let args = ctx.arguments();
                            seen.lock().push((
                                args.get::<String>("user").cloned().unwrap_or_default(),
                                args.get::<String>("reason").cloned().unwrap_or_default(),
                                args.get::<String>("note").cloned().unwrap_or_default(),
                            ));
                            Ok(())
                        }
                    })),
            )
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_ban() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let service = CommandService::new(ServiceConfig::default());
        service.add_module(ban_module(seen.clone())).unwrap();

        let outcome = service
            .execute("ban alice -r spam extra words", StateMap::new())
            .await;
        assert!(outcome.is_success(), "{:?}", outcome.failure());
        assert_eq!(
            seen.lock().as_slice(),
            [(
                "alice".to_string(),
                "spam".to_string(),
                "extra words".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_unknown_input_is_not_found() {
        let service = CommandService::new(ServiceConfig::default());
        let outcome = service.execute("nothing here", StateMap::new()).await;
        assert_eq!(
            outcome.failure(),
            Some(&ExecutionFailure::CommandNotFound)
        );
    }

    #[tokio::test]
    async fn test_parse_failure_surfaces() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let service = CommandService::new(ServiceConfig::default());
        service.add_module(ban_module(seen)).unwrap();

        let outcome = service
            .execute("ban alice --unknown", StateMap::new())
            .await;
        assert_eq!(
            outcome.failure(),
            Some(&ExecutionFailure::ArgumentParse {
                command: "ban".to_string(),
                failure: ParseFailure::UnknownOptionName {
                    name: "unknown".to_string()
                }
            })
        );
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let service = CommandService::new(ServiceConfig::default());
        service.add_module(ban_module(seen)).unwrap();

        let outcome = service.execute("ban", StateMap::new()).await;
        assert_eq!(
            outcome.failure(),
            Some(&ExecutionFailure::MissingRequiredArgument {
                command: "ban".to_string(),
                parameter: "user".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_overload_selection_and_aggregate_failure() {
        let service = CommandService::new(ServiceConfig::default());
        let module = ModuleBuilder::new("math")
            .command(
                CommandBuilder::new("add-numbers")
                    .alias("add")
                    .parameter(ParameterBuilder::value::<i64>("a"))
                    .parameter(ParameterBuilder::value::<i64>("b"))
                    .priority(1)
                    .handler(handler_fn(|_ctx| async { Ok(()) })),
            )
            .command(
                CommandBuilder::new("add-label")
                    .alias("add")
                    .parameter(ParameterBuilder::value::<String>("label"))
                    .handler(handler_fn(|_ctx| async { Ok(()) })),
            )
            .build()
            .unwrap();
        service.add_module(module).unwrap();

        // Two numbers: only the numeric overload binds.
        let outcome = service.execute("add 1 2", StateMap::new()).await;
        assert!(outcome.is_success());
        match outcome {
            ExecutionOutcome::Succeeded { command, .. } => {
                assert_eq!(command.name(), "add-numbers");
            }
            ExecutionOutcome::Failed(_) => unreachable!(),
        }

        // One word: the numeric overload fails to bind, the label one runs.
        let outcome = service.execute("add hello", StateMap::new()).await;
        assert!(outcome.is_success());

        // Three values: every overload fails; the aggregate carries both.
        let outcome = service.execute("add 1 2 3", StateMap::new()).await;
        match outcome.failure() {
            Some(ExecutionFailure::OverloadsFailed { path, failures }) => {
                assert_eq!(path, "add");
                assert_eq!(failures.len(), 2);
            }
            other => panic!("expected overload failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_failure_is_reported() {
        struct Deny;

        #[async_trait]
        impl Check for Deny {
            async fn check(&self, _ctx: &CommandContext) -> Result<(), CheckFailure> {
                Err(CheckFailure::new("not an operator"))
            }
        }

        let service = CommandService::new(ServiceConfig::default());
        let module = ModuleBuilder::new("ops")
            .check(Arc::new(Deny))
            .command(
                CommandBuilder::new("shutdown").handler(handler_fn(|_ctx| async { Ok(()) })),
            )
            .build()
            .unwrap();
        service.add_module(module).unwrap();

        let outcome = service.execute("shutdown", StateMap::new()).await;
        match outcome.failure() {
            Some(ExecutionFailure::CheckFailed { command, failure }) => {
                assert_eq!(command, "shutdown");
                assert_eq!(failure.reason(), "not an operator");
            }
            other => panic!("expected check failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cooldown_blocks_second_use() {
        let service =
            CommandService::with_bucket_keys(ServiceConfig::default(), Arc::new(PerUser));
        let module = ModuleBuilder::new("games")
            .command(
                CommandBuilder::new("roll")
                    .cooldown(Cooldown::new(1, Duration::from_secs(60), "user"))
                    .handler(handler_fn(|_ctx| async { Ok(()) })),
            )
            .build()
            .unwrap();
        service.add_module(module).unwrap();

        let state = StateMap::new().with(CallerId("alice".to_string()));
        assert!(service.execute("roll", state.clone()).await.is_success());
        let outcome = service.execute("roll", state).await;
        assert!(matches!(
            outcome.failure(),
            Some(ExecutionFailure::OnCooldown { command, .. }) if command == "roll"
        ));
    }

    #[tokio::test]
    async fn test_handler_error_is_terminal() {
        let service = CommandService::new(ServiceConfig::default());
        let module = ModuleBuilder::new("fragile")
            .command(CommandBuilder::new("boom").handler(handler_fn(|_ctx| async {
                Err("exploded".into())
            })))
            .build()
            .unwrap();
        service.add_module(module).unwrap();

        let outcome = service.execute("boom", StateMap::new()).await;
        assert!(matches!(
            outcome.failure(),
            Some(ExecutionFailure::HandlerFailed { reason, .. }) if reason == "exploded"
        ));
    }

    #[tokio::test]
    async fn test_add_module_rolls_back_on_collision() {
        let service = CommandService::new(ServiceConfig::default());
        let colliding = ModuleBuilder::new("broken")
            .command(
                CommandBuilder::new("first")
                    .alias("dup")
                    .handler(handler_fn(|_ctx| async { Ok(()) })),
            )
            .command(
                CommandBuilder::new("second")
                    .alias("dup")
                    .handler(handler_fn(|_ctx| async { Ok(()) })),
            )
            .build()
            .unwrap();

        assert!(service.add_module(colliding).is_err());
        // The first command of the failed batch must not stay mapped.
        assert!(service.find_commands("dup").is_empty());
    }

    #[tokio::test]
    async fn test_remove_module() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let service = CommandService::new(ServiceConfig::default());
        service.add_module(ban_module(seen)).unwrap();

        assert!(service.remove_module("moderation"));
        assert!(service.find_commands("ban alice").is_empty());
        assert!(!service.remove_module("moderation"));
    }

    #[test]
    fn test_tower_service_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let service = CommandService::new(ServiceConfig::default());
        service.add_module(ban_module(seen.clone())).unwrap();

        let mut svc = service;
        let outcome = tokio_test::block_on(svc.call(ExecuteRequest::new("ban bob -r spam")))
            .unwrap_or_else(|infallible| match infallible {});
        assert!(outcome.is_success());
        assert_eq!(seen.lock().len(), 1);
    }
}
