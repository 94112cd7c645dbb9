//! Round progression. A round opens for play once its pairings exist and
//! may only finish when every one of its matches carries a decided result.

use log::info;

use crate::domain::{Round, RoundStatus, TournamentMatch};
use crate::errors::{EngineError, Result};

pub fn start_round(round: &mut Round) -> Result<()> {
    round.status = round.status.transition(round.id, RoundStatus::InProgress)?;
    info!("round {} ({}): started", round.round_number, round.id);
    Ok(())
}

/// Finishes a round. Fails with the number of still-undecided matches if
/// any result is missing, so callers can surface exactly what blocks it.
pub fn complete_round(round: &mut Round, matches: &[TournamentMatch]) -> Result<()> {
    let unreported = matches
        .iter()
        .filter(|m| m.round_id == round.id && !m.is_decided())
        .count();
    if unreported > 0 {
        return Err(EngineError::RoundNotComplete {
            round_number: round.round_number,
            unreported,
        });
    }
    round.status = round.status.transition(round.id, RoundStatus::Finished)?;
    info!("round {} ({}): finished", round.round_number, round.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchResult, MatchStatus};

    fn round() -> Round {
        Round { id: 10, tournament_id: 1, round_number: 1, status: RoundStatus::InProgress }
    }

    fn match_in_round(id: i64, decided: bool) -> TournamentMatch {
        let mut m = TournamentMatch::new(id, 10, 1, id);
        m.player2_id = Some(id + 100);
        if decided {
            m.result = MatchResult::PlayerOneWin;
            m.status = MatchStatus::Confirmed;
        }
        m
    }

    #[test]
    fn completion_is_gated_on_every_result() {
        let mut r = round();
        let matches = vec![match_in_round(1, true), match_in_round(2, false)];
        let err = complete_round(&mut r, &matches).unwrap_err();
        assert_eq!(err, EngineError::RoundNotComplete { round_number: 1, unreported: 1 });
        assert_eq!(r.status, RoundStatus::InProgress);
    }

    #[test]
    fn completes_once_all_matches_are_decided() {
        let mut r = round();
        let matches = vec![match_in_round(1, true), match_in_round(2, true)];
        complete_round(&mut r, &matches).unwrap();
        assert_eq!(r.status, RoundStatus::Finished);
    }

    #[test]
    fn matches_of_other_rounds_do_not_block_completion() {
        let mut r = round();
        let mut other = match_in_round(3, false);
        other.round_id = 99;
        complete_round(&mut r, &[match_in_round(1, true), other]).unwrap();
        assert_eq!(r.status, RoundStatus::Finished);
    }
}
