//! Tournament-level transitions. All the legality rules live in the
//! status table; these helpers apply them and log the change.

use log::info;

use crate::domain::{Tournament, TournamentStatus};
use crate::errors::Result;

pub fn open_registration(t: &mut Tournament) -> Result<()> {
    step(t, TournamentStatus::RegistrationOpen)
}

pub fn close_registration(t: &mut Tournament) -> Result<()> {
    step(t, TournamentStatus::RegistrationClosed)
}

pub fn start(t: &mut Tournament) -> Result<()> {
    step(t, TournamentStatus::InProgress)
}

pub fn finish(t: &mut Tournament) -> Result<()> {
    step(t, TournamentStatus::Finished)
}

pub fn cancel(t: &mut Tournament) -> Result<()> {
    step(t, TournamentStatus::Cancelled)
}

fn step(t: &mut Tournament, to: TournamentStatus) -> Result<()> {
    t.status = t.status.transition(t.id, to)?;
    info!("tournament {} ({}): now {to}", t.name, t.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;

    #[test]
    fn full_lifecycle_in_order() {
        let mut t = Tournament::new(1, "league");
        open_registration(&mut t).unwrap();
        close_registration(&mut t).unwrap();
        start(&mut t).unwrap();
        finish(&mut t).unwrap();
        assert_eq!(t.status, TournamentStatus::Finished);
    }

    #[test]
    fn cannot_start_from_draft() {
        let mut t = Tournament::new(1, "league");
        let err = start(&mut t).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { entity: "tournament", .. }));
        assert_eq!(t.status, TournamentStatus::Draft);
    }

    #[test]
    fn cancel_is_reachable_until_terminal() {
        let mut t = Tournament::new(1, "league");
        open_registration(&mut t).unwrap();
        cancel(&mut t).unwrap();
        assert_eq!(t.status, TournamentStatus::Cancelled);
        assert!(cancel(&mut t).is_err());
    }
}
