//! Console output formatter for trips, items and results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use tripvote_application::{
    CreateTripOutput, GenerateItemsOutput, JoinTripOutput, StageSnapshot, TripResults,
};
use tripvote_domain::{
    BudgetTier, ItemDetails, ShareLink, Stage, StageReadiness, StageResults, Trip, VotableItem,
};

/// Formats tripvote state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn trip_created(output: &CreateTripOutput, link: &ShareLink) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Trip created"));
        out.push('\n');
        out.push_str(&Self::trip_summary(&output.trip));
        out.push_str(&format!(
            "\n{} {} ({})\n",
            "You:".cyan().bold(),
            output.creator.name,
            output.creator.id.as_str().dimmed()
        ));
        out.push_str(&format!("{} {}\n", "Share:".cyan().bold(), link.to_url().underline()));
        out.push_str(&Self::footer());
        out
    }

    pub fn joined(output: &JoinTripOutput, link: &ShareLink) -> String {
        let verb = if output.newly_joined {
            "Joined"
        } else {
            "Welcome back to"
        };
        format!(
            "{} {}\n{}\n{} {} ({})\n{} {}\n",
            verb.green().bold(),
            output.trip.name.bold(),
            Self::trip_summary(&output.trip),
            "You:".cyan().bold(),
            output.participant.name,
            output.participant.id.as_str().dimmed(),
            "Share:".cyan().bold(),
            link
        )
    }

    fn trip_summary(trip: &Trip) -> String {
        let mut out = format!(
            "{} {}\n{} {} to {} ({} nights)\n{} {} ({})\n{} {}\n",
            "Trip:".cyan().bold(),
            trip.name,
            "Dates:".cyan().bold(),
            trip.start_date,
            trip.end_date,
            trip.nights(),
            "Budget:".cyan().bold(),
            trip.budget.symbol(),
            trip.budget.descriptor(),
            "Stage:".cyan().bold(),
            Self::stage_label(trip.current_stage)
        );
        if let Some(from) = &trip.departure_location {
            out.push_str(&format!("{} {}\n", "From:".cyan().bold(), from));
        }
        out
    }

    pub fn stage_label(stage: Stage) -> String {
        match stage.ordinal() {
            Some(n) => format!("{} ({}/{})", stage.display_name(), n, Stage::VOTING.len()),
            None => stage.display_name().green().to_string(),
        }
    }

    pub fn generation(output: &GenerateItemsOutput) -> String {
        let mut out = Self::section_header(&format!("Items for {}", output.trip.name));
        for generation in &output.stages {
            let source = match &generation.source {
                tripvote_application::ItemSource::Generator(name) => name.green().to_string(),
                tripvote_application::ItemSource::Fallback { reason } => {
                    format!("{} ({})", "built-in".yellow(), reason.dimmed())
                }
            };
            out.push_str(&format!(
                "  {:<16} {:>3} item(s)  {}\n",
                generation.stage.display_name(),
                generation.items.len(),
                source
            ));
        }
        out
    }

    /// One item as a card, with the price for the trip's budget tier.
    pub fn item_card(item: &VotableItem, budget: BudgetTier, index: usize, total: usize) -> String {
        let mut out = format!(
            "\n{} {}",
            format!("[{}/{}]", index + 1, total).dimmed(),
            item.title().bold()
        );
        if item.ai_generated {
            out.push_str(&format!(" {}", "AI".magenta()));
        }
        out.push('\n');

        match &item.details {
            ItemDetails::Destination {
                description,
                best_time_to_visit,
                highlights,
                ..
            } => {
                Self::push_description(&mut out, description.as_deref());
                if let Some(best) = best_time_to_visit {
                    out.push_str(&format!("  {} {}\n", "Best time:".cyan(), best));
                }
                if !highlights.is_empty() {
                    out.push_str(&format!("  {} {}\n", "Highlights:".cyan(), highlights.join(", ")));
                }
            }
            ItemDetails::Accommodation {
                category,
                description,
                amenities,
                rating,
                ..
            } => {
                Self::push_description(&mut out, description.as_deref());
                let mut line = format!("  {} {}", "Type:".cyan(), category);
                if let Some(rating) = rating {
                    line.push_str(&format!("  {} {:.1}", "Rating:".cyan(), rating));
                }
                out.push_str(&line);
                out.push('\n');
                if !amenities.is_empty() {
                    out.push_str(&format!("  {} {}\n", "Amenities:".cyan(), amenities.join(", ")));
                }
            }
            ItemDetails::Transportation {
                description,
                departure_time,
                arrival_time,
                duration_minutes,
                ..
            } => {
                Self::push_description(&mut out, description.as_deref());
                if let (Some(dep), Some(arr)) = (departure_time, arrival_time) {
                    out.push_str(&format!("  {} {} → {}", "Times:".cyan(), dep, arr));
                    if let Some(minutes) = duration_minutes {
                        out.push_str(&format!(" ({}h{:02})", minutes / 60, minutes % 60));
                    }
                    out.push('\n');
                }
            }
        }

        match item.price_for(budget) {
            Some(price) => out.push_str(&format!(
                "  {} ${:.0} {}\n",
                format!("{}:", budget.symbol()).cyan(),
                price,
                item.details.price_label().dimmed()
            )),
            None => out.push_str(&format!("  {}\n", "Price unknown".dimmed())),
        }
        out
    }

    fn push_description(out: &mut String, description: Option<&str>) {
        if let Some(text) = description {
            out.push_str(&Self::indent(text, "  "));
            out.push('\n');
        }
    }

    /// Tallies and completion of the active stage.
    pub fn snapshot(snapshot: &StageSnapshot) -> String {
        if snapshot.stage == Stage::Completed {
            return format!("{} {}\n", "✓".green(), "Every stage is decided.".green().bold());
        }

        let (done, total) = snapshot.done_count();
        let mut out = Self::section_header(&format!(
            "{}  {}/{} done",
            Self::stage_label(snapshot.stage),
            done,
            total
        ));

        for item in &snapshot.items {
            let tally = snapshot.counts.get(&item.id);
            out.push_str(&format!(
                "  {:<12} {:>2} like  {}\n",
                tally.summary(),
                tally.likes,
                item.title()
            ));
        }

        out.push('\n');
        for participant in &snapshot.participants {
            let mark = if participant.done {
                "✓".green()
            } else {
                "…".yellow()
            };
            out.push_str(&format!("  {} {}\n", mark, participant.name));
        }

        if let StageReadiness::NoParticipants = snapshot.readiness {
            out.push_str(&format!("  {}\n", "Nobody has joined yet".dimmed()));
        }
        out
    }

    fn stage_results(results: &StageResults, voted: usize, total: usize) -> String {
        let mut out = Self::section_header(&format!(
            "{}  ({}/{} voted)",
            results.stage.display_name(),
            voted,
            total
        ));

        if results.ranking.is_empty() {
            out.push_str(&format!("  {}\n", "No items".dimmed()));
            return out;
        }

        let top = results.top_choice().map(|r| r.item_id.clone());
        for (rank, result) in results.ranking.iter().enumerate() {
            let line = format!(
                "  {:>2}. {:>5.1}%  {:>2}/{:<2} {}",
                rank + 1,
                result.percentage,
                result.likes,
                result.total_votes,
                result.title
            );
            if top.as_ref() == Some(&result.item_id) {
                out.push_str(&format!("{} {}\n", line.green().bold(), "★".yellow()));
            } else {
                out.push_str(&line);
                out.push('\n');
            }
            if !result.liked_by.is_empty() {
                out.push_str(&format!(
                    "          {}\n",
                    format!("liked by {}", result.liked_by.join(", ")).dimmed()
                ));
            }
        }
        out
    }

    /// Ranked results for every stage
    pub fn format(results: &TripResults) -> String {
        let mut out = String::new();
        out.push_str(&Self::header(&format!("{} - Results", results.trip.name)));
        out.push('\n');
        out.push_str(&Self::trip_summary(&results.trip));

        for summary in &results.stages {
            out.push_str(&Self::stage_results(
                &summary.results,
                summary.voted_count,
                summary.total_participants,
            ));
        }
        out.push_str(&Self::footer());
        out
    }

    /// Format as JSON
    pub fn format_json(results: &TripResults) -> String {
        serde_json::to_string_pretty(results).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, results: &TripResults) -> String {
        Self::format(results)
    }

    fn format_json(&self, results: &TripResults) -> String {
        Self::format_json(results)
    }
}
