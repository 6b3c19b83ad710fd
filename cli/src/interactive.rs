//! Long-running commands: the vote prompt and the live watcher

use crate::{App, parse_trip};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tripvote_application::{
    LiveTripSession, LiveUpdate, StageAggregator, StageDecision, TripResultsUseCase,
    VotingError, VotingProgressNotifier,
};
use tripvote_domain::Stage;
use tripvote_presentation::{
    ConsoleFormatter, ProgressReporter, SimpleProgress, VoteArgs, VoteCommand,
};

enum Input {
    Line(Option<String>),
    Update(Option<Result<LiveUpdate, VotingError>>),
}

fn prompt() {
    print!("{} ", "like/pass >".bold());
    let _ = std::io::stdout().flush();
}

fn show_current(live: &LiveTripSession) {
    let session = live.session();
    if session.is_finished() {
        return;
    }
    match live.current_item() {
        Some(item) => {
            print!(
                "{}",
                ConsoleFormatter::item_card(
                    item,
                    live.trip().budget,
                    session.current_index(),
                    session.total_items()
                )
            );
            if let Some(previous) = session.vote_for(&item.id) {
                println!("  {} {}", "Your vote:".dimmed(), previous);
            }
            prompt();
        }
        None => println!(
            "\n{} {} (s = status, b = change a vote, q = quit)",
            "✓".green(),
            format!(
                "You have voted on every {} item. Waiting for the group...",
                session.stage().as_str()
            )
            .yellow()
        ),
    }
}

async fn print_results(app: &App, live: &LiveTripSession) -> Result<()> {
    let results = TripResultsUseCase::new(app.trip_store())
        .execute(&live.trip().id)
        .await?;
    println!("{}", ConsoleFormatter::format(&results));
    Ok(())
}

/// Report a failed vote. Only terminal errors are returned.
async fn handle_vote_error(
    live: &mut LiveTripSession,
    error: VotingError,
    progress: &dyn VotingProgressNotifier,
) -> Result<()> {
    match error {
        VotingError::StageNotRecorded(e) => {
            warn!("Could not record stage completion: {}", e);
            println!("{} Saving your progress failed, retrying...", "!".yellow());
            if let Err(e) = live.finish_stage(progress).await {
                println!("{} {} (type s to retry)", "!".red(), e);
            }
            Ok(())
        }
        e if e.is_not_found() => Err(e.into()),
        e if e.is_retryable() => {
            println!("{} {} (try again)", "!".yellow(), e);
            Ok(())
        }
        e => {
            println!("{} {}", "!".red(), e);
            Ok(())
        }
    }
}

async fn handle_command(
    live: &mut LiveTripSession,
    command: VoteCommand,
    progress: &dyn VotingProgressNotifier,
) -> Result<bool> {
    match command {
        VoteCommand::Cast(value) => {
            let Some(item_id) = live.current_item().map(|item| item.id.clone()) else {
                println!("Nothing left to vote on in this stage.");
                return Ok(true);
            };
            if let Err(e) = live.vote(&item_id, value, progress).await {
                handle_vote_error(live, e, progress).await?;
            }
        }
        VoteCommand::Back => {
            let index = live.session().current_index();
            let previous = index
                .checked_sub(1)
                .and_then(|i| live.session().items().get(i).cloned());
            match previous {
                Some(item_id) => {
                    if let Err(e) = live.rewind_to(&item_id) {
                        println!("{} {}", "!".yellow(), e);
                    }
                }
                None => println!("Already at the first item."),
            }
        }
        VoteCommand::Status => {
            let update = if live.session().is_stage_done() {
                live.finish_stage(progress).await
            } else {
                live.refresh(progress).await
            };
            match update {
                Ok(update) => print!("{}", ConsoleFormatter::snapshot(&update.snapshot)),
                Err(e) => handle_vote_error(live, e, progress).await?,
            }
        }
        VoteCommand::Help => println!("{}", VoteCommand::help()),
        VoteCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Interactive like/pass prompt for one participant.
pub async fn vote(app: &App, args: VoteArgs) -> Result<()> {
    let trip_id = parse_trip(&args.trip)?;
    let participant = app.resolve_participant(&trip_id, &args.participant).await?;

    let reporter = ProgressReporter::new();
    let progress: &dyn VotingProgressNotifier = if app.quiet {
        &SimpleProgress
    } else {
        &reporter
    };

    let mut live = LiveTripSession::start_with_logger(
        app.trip_store(),
        app.change_feed(),
        &trip_id,
        &participant.id,
        app.config.voting.to_params(),
        app.activity_logger.clone(),
    )
    .await?;

    println!(
        "{} {} as {}\n{}",
        "Voting on".cyan(),
        live.trip().name.bold(),
        live.participant().name.bold(),
        VoteCommand::help().dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = None;

    loop {
        if live.session().is_finished() {
            print_results(app, &live).await?;
            return Ok(());
        }

        let position = (live.session().stage(), live.session().current_index());
        if shown != Some(position) {
            show_current(&live);
            shown = Some(position);
        }

        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            update = live.next_update(progress) => Input::Update(update),
        };

        match input {
            Input::Line(None) => return Ok(()),
            Input::Line(Some(line)) => {
                let command = match VoteCommand::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        prompt();
                        continue;
                    }
                };
                if !handle_command(&mut live, command, progress).await? {
                    return Ok(());
                }
                shown = None;
            }
            Input::Update(None) => {
                debug!("Change feed closed");
                return Ok(());
            }
            Input::Update(Some(Ok(update))) => {
                if let StageDecision::Advanced { to, .. } = update.decision {
                    debug!("Group moved on to {}", to);
                }
            }
            Input::Update(Some(Err(e))) => handle_vote_error(&mut live, e, progress).await?,
        }
    }
}

/// Print the group's progress on every change until the trip is decided.
pub async fn watch(app: &App, trip: &str) -> Result<()> {
    let trip_id = parse_trip(trip)?;
    let mut subscription = app.change_feed().subscribe(&trip_id).await?;
    let aggregator =
        StageAggregator::new(app.trip_store()).with_activity_logger(app.activity_logger.clone());

    loop {
        let mut snapshot = aggregator.snapshot(&trip_id).await?;
        if snapshot.stage.is_votable() && snapshot.readiness.is_complete() {
            aggregator
                .check_stage_completion(&trip_id, snapshot.stage)
                .await?;
            snapshot = aggregator.snapshot(&trip_id).await?;
        }
        print!("{}", ConsoleFormatter::snapshot(&snapshot));

        if snapshot.stage == Stage::Completed {
            let results = TripResultsUseCase::new(app.trip_store())
                .execute(&trip_id)
                .await?;
            println!("{}", ConsoleFormatter::format(&results));
            return Ok(());
        }

        if subscription.next().await.is_none() {
            return Ok(());
        }
        let skipped = subscription.drain().len();
        debug!("Folded {} queued change(s) into one refresh", skipped);
    }
}
