//! The binder: raw fragments in, typed [`Arguments`] out.
//!
//! Runs each command type parser once per scalar fragment (once per
//! element for multi-value parameters), applies declared defaults, and
//! enforces the required-parameter completeness the rich parser defers.

use crucible_core::{Arguments, BoundValue, CommandContext, RawArgument};

use crate::error::ExecutionFailure;

pub(crate) async fn bind_arguments(ctx: &CommandContext) -> Result<Arguments, ExecutionFailure> {
    let command = ctx.command().clone();
    let mut values: Vec<Option<BoundValue>> = Vec::with_capacity(command.parameters().len());

    for (index, parameter) in command.parameters().iter().enumerate() {
        let type_parse = |failure| ExecutionFailure::TypeParse {
            command: command.name().to_string(),
            failure,
        };
        let slot = match ctx.raw_arguments().get(index) {
            Some(RawArgument::Single(fragment)) => {
                let value = parameter
                    .parser()
                    .parse(ctx, parameter, fragment)
                    .await
                    .map_err(type_parse)?;
                Some(BoundValue::Single(value))
            }
            Some(RawArgument::Many(fragments)) => {
                let mut parsed = Vec::with_capacity(fragments.len());
                for fragment in fragments {
                    parsed.push(
                        parameter
                            .parser()
                            .parse(ctx, parameter, fragment)
                            .await
                            .map_err(type_parse)?,
                    );
                }
                Some(BoundValue::Many(parsed))
            }
            None => match parameter.default_value() {
                Some(default) => {
                    let value = parameter
                        .parser()
                        .parse(ctx, parameter, default)
                        .await
                        .map_err(type_parse)?;
                    Some(BoundValue::Single(value))
                }
                None if parameter.is_required() => {
                    return Err(ExecutionFailure::MissingRequiredArgument {
                        command: command.name().to_string(),
                        parameter: parameter.name().to_string(),
                    });
                }
                None => None,
            },
        };
        values.push(slot);
    }

    Ok(Arguments::new(command, values))
}
