//! Participant status transitions.

use log::info;

use crate::domain::{Participant, ParticipantStatus};
use crate::errors::Result;

pub fn confirm(p: &mut Participant) -> Result<()> {
    step(p, ParticipantStatus::Confirmed)
}

pub fn check_in(p: &mut Participant) -> Result<()> {
    step(p, ParticipantStatus::CheckedIn)
}

pub fn withdraw(p: &mut Participant) -> Result<()> {
    step(p, ParticipantStatus::Withdrawn)
}

pub fn disqualify(p: &mut Participant) -> Result<()> {
    step(p, ParticipantStatus::Disqualified)
}

fn step(p: &mut Participant, to: ParticipantStatus) -> Result<()> {
    p.status = p.status.transition(p.id, to)?;
    info!("participant {} ({}): now {to}", p.identity.display_name(), p.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identity;

    fn registered() -> Participant {
        Participant {
            id: 1,
            tournament_id: 1,
            identity: Identity::Guest { name: "Ada".to_string(), email: None },
            status: ParticipantStatus::Registered,
            seed: 1,
            has_received_bye: false,
        }
    }

    #[test]
    fn withdrawal_removes_playability() {
        let mut p = registered();
        confirm(&mut p).unwrap();
        assert!(p.is_playable());
        withdraw(&mut p).unwrap();
        assert!(!p.is_playable());
        assert!(confirm(&mut p).is_err());
    }
}
