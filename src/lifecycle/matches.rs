//! Result-reporting lifecycle of a single match. Every transition is
//! checked against the match status table, every result change appends an
//! immutable `MatchHistory` record, and mutation only happens once all
//! validation has passed (no partial writes on failure).

use chrono::Utc;
use log::info;

use crate::config::GameProfile;
use crate::domain::{
    Actor, MatchHistory, MatchResult, MatchStatus, ResultReporting, StatMap, Tournament,
    TournamentMatch, validate_stat_map,
};
use crate::errors::{EngineError, Result};

/// The payload of a result report: the canonical result plus optional
/// per-player game scores and stat maps.
#[derive(Debug, Clone, Default)]
pub struct ResultReport {
    pub result: MatchResult,
    pub player1_score: Option<u32>,
    pub player2_score: Option<u32>,
    pub player1_stats: StatMap,
    pub player2_stats: StatMap,
}

/// Reports (or, for admins, corrects) a match result.
///
/// Under `PlayersWithConfirmation` the match lands in `Reported` and waits
/// for the opponent; under `AdminOnly` and `PlayersTrusted` the report is
/// terminal and the match is confirmed in the same operation.
pub fn report_result(
    m: &mut TournamentMatch,
    report: ResultReport,
    actor: Actor,
    tournament: &Tournament,
    profile: &GameProfile,
) -> Result<MatchHistory> {
    authorize_reporter(m, actor, tournament)?;
    validate_report(m, &report)?;
    validate_stat_map(&report.player1_stats, &profile.stat_definitions)?;
    validate_stat_map(&report.player2_stats, &profile.stat_definitions)?;

    let reported = m.status.transition(m.id, MatchStatus::Reported)?;

    let previous_result = m.result;
    let previous_scores = (m.player1_score, m.player2_score);
    let correction = previous_result != MatchResult::NotPlayed;

    m.status = reported;
    m.result = report.result;
    m.player1_score = report.player1_score;
    m.player2_score = report.player2_score;
    m.player1_stats = report.player1_stats;
    m.player2_stats = report.player2_stats;
    m.reported_by = Some(actor);
    m.reported_at = Some(Utc::now());
    m.confirmed_by = None;
    m.confirmed_at = None;
    m.is_disputed = false;

    if tournament.result_reporting != ResultReporting::PlayersWithConfirmation {
        // No confirmation step in trusted and admin-only modes.
        m.status = m.status.transition(m.id, MatchStatus::Confirmed)?;
        m.confirmed_by = Some(actor);
        m.confirmed_at = m.reported_at;
    }

    info!(
        "match {}: result {} by {}{}",
        m.id,
        m.result,
        actor,
        if correction { " (correction)" } else { "" }
    );
    Ok(history_entry(
        m,
        previous_result,
        previous_scores,
        actor,
        if correction { "result corrected" } else { "result reported" },
    ))
}

/// Confirms a reported result. Only the non-reporting player may confirm
/// (and only under `PlayersWithConfirmation`); admins may confirm in any
/// mode and are the only ones who can resolve a disputed match.
pub fn confirm_result(m: &mut TournamentMatch, actor: Actor, tournament: &Tournament) -> Result<()> {
    let confirmed = m.status.transition(m.id, MatchStatus::Confirmed)?;

    match actor {
        Actor::Admin => {}
        Actor::Player(player) => {
            if m.status == MatchStatus::Disputed {
                return Err(not_authorized(actor, "resolve a dispute on", m.id));
            }
            if tournament.result_reporting != ResultReporting::PlayersWithConfirmation {
                return Err(not_authorized(actor, "confirm", m.id));
            }
            if !m.involves(player) || m.reported_by == Some(actor) {
                return Err(not_authorized(actor, "confirm", m.id));
            }
        }
    }

    m.status = confirmed;
    m.confirmed_by = Some(actor);
    m.confirmed_at = Some(Utc::now());
    m.is_disputed = false;
    info!("match {}: result confirmed by {actor}", m.id);
    Ok(())
}

/// Flags a reported result as disputed, leaving the result in place for an
/// admin to resolve.
pub fn dispute(m: &mut TournamentMatch, actor: Actor) -> Result<()> {
    let disputed = m.status.transition(m.id, MatchStatus::Disputed)?;

    if let Actor::Player(player) = actor {
        if !m.involves(player) || m.reported_by == Some(actor) {
            return Err(not_authorized(actor, "dispute", m.id));
        }
    }

    m.status = disputed;
    m.is_disputed = true;
    info!("match {}: result disputed by {actor}", m.id);
    Ok(())
}

/// Admin-only: reverts every result, score, stat, report and confirm field
/// to its `NotPlayed` default. Always appends a history record with the
/// given reason, whatever the starting state.
pub fn reset_result(m: &mut TournamentMatch, actor: Actor, reason: &str) -> Result<MatchHistory> {
    if !actor.is_admin() {
        return Err(not_authorized(actor, "reset", m.id));
    }
    let reset = m.status.transition(m.id, MatchStatus::NotPlayed)?;

    let previous_result = m.result;
    let previous_scores = (m.player1_score, m.player2_score);

    m.status = reset;
    m.result = MatchResult::NotPlayed;
    m.player1_score = None;
    m.player2_score = None;
    m.player1_stats = StatMap::new();
    m.player2_stats = StatMap::new();
    m.reported_by = None;
    m.reported_at = None;
    m.confirmed_by = None;
    m.confirmed_at = None;
    m.is_disputed = false;

    info!("match {}: result reset by admin ({reason})", m.id);
    Ok(history_entry(m, previous_result, previous_scores, actor, reason))
}

fn authorize_reporter(m: &TournamentMatch, actor: Actor, tournament: &Tournament) -> Result<()> {
    match actor {
        Actor::Admin => Ok(()),
        Actor::Player(player) => {
            if tournament.result_reporting == ResultReporting::AdminOnly {
                return Err(not_authorized(actor, "report", m.id));
            }
            if !m.involves(player) {
                return Err(not_authorized(actor, "report", m.id));
            }
            // Corrections over an existing report are an admin action.
            if m.status != MatchStatus::NotPlayed {
                return Err(not_authorized(actor, "correct", m.id));
            }
            Ok(())
        }
    }
}

fn validate_report(m: &TournamentMatch, report: &ResultReport) -> Result<()> {
    let invalid = |reason: &str| EngineError::InvalidReport {
        match_id: m.id,
        reason: reason.to_string(),
    };
    match (m.is_bye(), report.result) {
        (_, MatchResult::NotPlayed) => Err(invalid("cannot report a NotPlayed result")),
        (false, MatchResult::Bye) => Err(invalid("cannot report a bye for a two-player match")),
        (true, result) if result != MatchResult::Bye => {
            Err(invalid("a bye match only takes a bye result"))
        }
        _ => Ok(()),
    }
}

fn history_entry(
    m: &TournamentMatch,
    previous_result: MatchResult,
    previous_scores: (Option<u32>, Option<u32>),
    actor: Actor,
    reason: &str,
) -> MatchHistory {
    MatchHistory {
        match_id: m.id,
        previous_result,
        new_result: m.result,
        previous_scores,
        new_scores: (m.player1_score, m.player2_score),
        changed_by: actor,
        reason: reason.to_string(),
        changed_at: Utc::now(),
    }
}

fn not_authorized(actor: Actor, action: &'static str, match_id: i64) -> EngineError {
    EngineError::NotAuthorized {
        actor: actor.to_string(),
        action,
        match_id,
    }
}
