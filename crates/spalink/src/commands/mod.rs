//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod status;
pub mod watch;

use spalink_core::{Command as CoreCommand, Spa};

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a spa-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    spa: &Spa,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(spa, session, global).await,
        Command::Watch(args) => watch::handle(spa, session, args, global).await,

        Command::Temperature(args) => {
            control::run(spa, control::temperature(&args, session)?, global).await
        }
        Command::Lights { state } => {
            control::run(spa, CoreCommand::SetLights { on: state.into() }, global).await
        }
        Command::Pump { pump, state } => {
            control::run(spa, CoreCommand::pump(&pump, &state)?, global).await
        }
        Command::Blower { blower, state } => {
            control::run(spa, CoreCommand::blower(&blower, &state)?, global).await
        }
        Command::Toggle { name, state } => {
            control::run(spa, CoreCommand::toggle(&name, state.into())?, global).await
        }
        Command::Boost => control::run(spa, CoreCommand::Boost, global).await,

        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
