//! Command-line surface. Every subcommand maps onto one command handler,
//! query or service call and yields a JSON value for stdout.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::application::commands::{
    CommandHandler, CreateEventCommand, CreateUserCommand, DeleteEventCommand,
    DeleteUserCommand, GrantFreezeCommand, RecordCheckInCommand, RenameUserCommand,
    UpdateEventCommand,
};
use crate::application::ResultExt;
use crate::presentation::AppState;
use rollcall_domain::event::EventChanges;
use rollcall_domain::shared::DomainError;

#[derive(Parser, Debug)]
#[command(
    name = "rollcall",
    author,
    version,
    about = "Daily check-ins, streaks, streak freezes and leaderboards"
)]
pub struct Cli {
    /// SQLite database file (overrides ROLLCALL_DATABASE_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Record today's check-in
    CheckIn(CheckInArgs),
    /// Current and longest streak (every event of the user if --event is omitted)
    Streak(StreakArgs),
    /// Rank an event's participants
    Leaderboard(LeaderboardArgs),
    /// Cached statistics of an event
    Summary(SummaryArgs),
    /// Grant and inspect streak freezes
    Freeze {
        #[command(subcommand)]
        action: FreezeAction,
    },
    /// Check-in history of a user in an event, or of the whole event
    History(HistoryArgs),
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    Add {
        username: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// One user with lifetime counters
    Show { id: String },
    List {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Users ranked by their longest streak in any event
    Leaderboard {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Set or clear (omit --display-name) the display name
    Rename {
        id: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Remove a user with their events, check-ins and freezes
    Delete { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Subcommand, Debug)]
pub enum EventAction {
    Add {
        title: String,
        /// Creating user id
        #[arg(long)]
        creator: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        private: bool,
    },
    Show { id: String },
    /// Public events, or every event of --creator
    List {
        #[arg(long)]
        creator: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Change an event; only its creator may
    Update {
        id: String,
        /// Acting user id
        #[arg(long = "as")]
        acting_user: String,
        #[arg(long)]
        title: Option<String>,
        /// An empty value clears the description
        #[arg(long)]
        description: Option<String>,
        /// An empty value clears the category
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        visibility: Option<Visibility>,
    },
    /// Remove an event with its check-ins; only its creator may
    Delete {
        id: String,
        /// Acting user id
        #[arg(long = "as")]
        acting_user: String,
    },
    /// Events a user has checked in to
    Participating {
        #[arg(long)]
        user: String,
    },
}

#[derive(Args, Debug)]
pub struct CheckInArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub event: String,
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
}

#[derive(Args, Debug)]
pub struct StreakArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub event: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankBy {
    #[default]
    Streak,
    Checkins,
}

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    #[arg(long)]
    pub event: String,
    #[arg(long, value_enum, default_value_t = RankBy::Streak)]
    pub by: RankBy,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[arg(long)]
    pub event: String,
}

#[derive(Subcommand, Debug)]
pub enum FreezeAction {
    Grant {
        #[arg(long)]
        user: String,
        #[arg(long)]
        event: String,
        /// First day the freeze can no longer be used (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        event: String,
        /// Only unused, unexpired freezes
        #[arg(long)]
        available: bool,
    },
    /// Spend the oldest available freeze today
    Use {
        #[arg(long)]
        user: String,
        #[arg(long)]
        event: String,
    },
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(long)]
    pub event: String,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub skip: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

fn to_json<T: Serialize>(value: T) -> Result<Value, DomainError> {
    serde_json::to_value(value).infra_context("Failed to encode output")
}

/// Execute one subcommand against the application state.
pub async fn run(command: Commands, state: &AppState) -> Result<Value, DomainError> {
    let handlers = &state.command_handlers;
    let queries = &state.queries;

    match command {
        Commands::User { action } => run_user(action, state).await,
        Commands::Event { action } => run_event(action, state).await,
        Commands::CheckIn(args) => to_json(
            handlers
                .record_check_in
                .handle(RecordCheckInCommand {
                    user_id: args.user,
                    event_id: args.event,
                    note: args.note,
                    mood: args.mood,
                })
                .await?,
        ),
        Commands::Streak(StreakArgs {
            user,
            event: Some(event),
        }) => to_json(queries.streak.compute_streak(&user, &event).await?),
        Commands::Streak(StreakArgs { user, event: None }) => {
            to_json(queries.streak.user_streaks(&user).await?)
        }
        Commands::Leaderboard(args) => match args.by {
            RankBy::Streak => to_json(
                queries
                    .leaderboard
                    .event_leaderboard(&args.event, args.limit)
                    .await?,
            ),
            RankBy::Checkins => to_json(
                queries
                    .leaderboard
                    .event_checkin_leaderboard(&args.event, args.limit)
                    .await?,
            ),
        },
        Commands::Summary(args) => to_json(queries.leaderboard.event_summary(&args.event).await?),
        Commands::Freeze {
            action:
                FreezeAction::Grant {
                    user,
                    event,
                    expires,
                },
        } => to_json(
            handlers
                .grant_freeze
                .handle(GrantFreezeCommand {
                    user_id: user,
                    event_id: event,
                    expiry_day: expires,
                })
                .await?,
        ),
        Commands::Freeze {
            action:
                FreezeAction::List {
                    user,
                    event,
                    available,
                },
        } => {
            let freezes = if available {
                state.services.freeze.available_freezes(&user, &event).await?
            } else {
                state.services.freeze.list_freezes(&user, &event).await?
            };
            to_json(freezes)
        }
        Commands::Freeze {
            action: FreezeAction::Use { user, event },
        } => {
            let used = state.services.freeze.use_oldest_available(&user, &event).await?;
            Ok(serde_json::json!({ "used": used }))
        }
        Commands::History(args) => match args.user {
            Some(user) => to_json(
                queries
                    .streak
                    .check_in_history(&user, &args.event, args.skip, args.limit)
                    .await?,
            ),
            None => to_json(
                queries
                    .streak
                    .event_check_ins(&args.event, args.skip, args.limit)
                    .await?,
            ),
        },
    }
}

async fn run_user(action: UserAction, state: &AppState) -> Result<Value, DomainError> {
    let handlers = &state.command_handlers;
    let directory = &state.queries.directory;

    match action {
        UserAction::Add {
            username,
            display_name,
        } => to_json(
            handlers
                .create_user
                .handle(CreateUserCommand {
                    username,
                    display_name,
                })
                .await?,
        ),
        UserAction::Show { id } => to_json(directory.get_user(&id).await?),
        UserAction::List { skip, limit } => to_json(directory.list_users(skip, limit).await?),
        UserAction::Leaderboard { limit } => to_json(directory.user_leaderboard(limit).await?),
        UserAction::Rename { id, display_name } => to_json(
            handlers
                .rename_user
                .handle(RenameUserCommand {
                    user_id: id,
                    display_name,
                })
                .await?,
        ),
        UserAction::Delete { id } => {
            handlers
                .delete_user
                .handle(DeleteUserCommand {
                    user_id: id.clone(),
                })
                .await?;
            Ok(serde_json::json!({ "deleted": id }))
        }
    }
}

async fn run_event(action: EventAction, state: &AppState) -> Result<Value, DomainError> {
    let handlers = &state.command_handlers;
    let directory = &state.queries.directory;

    match action {
        EventAction::Add {
            title,
            creator,
            description,
            category,
            private,
        } => to_json(
            handlers
                .create_event
                .handle(CreateEventCommand {
                    title,
                    description,
                    creator_id: creator,
                    category,
                    is_public: !private,
                })
                .await?,
        ),
        EventAction::Show { id } => to_json(directory.get_event(&id).await?),
        EventAction::List {
            creator: Some(creator),
            skip,
            limit,
        } => to_json(directory.events_created_by(&creator, skip, limit).await?),
        EventAction::List {
            creator: None,
            skip,
            limit,
        } => to_json(directory.list_public_events(skip, limit).await?),
        EventAction::Update {
            id,
            acting_user,
            title,
            description,
            category,
            visibility,
        } => to_json(
            handlers
                .update_event
                .handle(UpdateEventCommand {
                    event_id: id,
                    acting_user_id: acting_user,
                    changes: EventChanges {
                        title,
                        description,
                        category,
                        is_public: visibility.map(|v| v == Visibility::Public),
                    },
                })
                .await?,
        ),
        EventAction::Delete { id, acting_user } => {
            handlers
                .delete_event
                .handle(DeleteEventCommand {
                    event_id: id.clone(),
                    acting_user_id: acting_user,
                })
                .await?;
            Ok(serde_json::json!({ "deleted": id }))
        }
        EventAction::Participating { user } => {
            to_json(directory.participating_events(&user).await?)
        }
    }
}
