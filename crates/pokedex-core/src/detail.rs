//! Entry detail controller: a one-shot fetch per identifier.

use crate::catalog::LoadOutcome;
use crate::load_state::LoadState;
use crate::model::{Ability, EntryDetail, Stat};
use crate::source::CatalogSource;
use crate::FetchError;

/// Number of moves shown in the detail view.
pub const MAX_DISPLAY_MOVES: usize = 10;

/// Placeholder subject for lookups attempted before the identifier is known.
const UNRESOLVED: &str = "<unresolved>";

/// A detail fetch handed out by [`DetailController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub identifier: String,
}

#[derive(Debug, Default)]
pub struct DetailController {
    identifier: Option<String>,
    state: LoadState<EntryDetail>,
    generation: u64,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the active identifier. Returns the fetch to run when a resolved
    /// identifier differs from the current one; `None` while unresolved or
    /// unchanged.
    pub fn set_identifier(&mut self, identifier: Option<&str>) -> Option<DetailRequest> {
        let identifier = normalize(identifier);
        if identifier == self.identifier {
            return None;
        }
        self.identifier = identifier.clone();
        match identifier {
            Some(id) => Some(self.begin_load(id)),
            None => {
                // Drop whatever was in flight for the previous identifier.
                self.generation += 1;
                self.state = LoadState::Idle;
                None
            }
        }
    }

    pub fn begin_load(&mut self, identifier: String) -> DetailRequest {
        self.generation += 1;
        self.state = LoadState::Loading;
        tracing::debug!(generation = self.generation, identifier = %identifier, "detail request");
        DetailRequest {
            generation: self.generation,
            identifier,
        }
    }

    pub fn complete_load(
        &mut self,
        request: &DetailRequest,
        result: Result<EntryDetail, FetchError>,
    ) -> LoadOutcome {
        if request.generation != self.generation {
            tracing::debug!(
                identifier = %request.identifier,
                "discarding superseded detail response"
            );
            return LoadOutcome::Stale;
        }
        match result {
            Ok(detail) => {
                tracing::info!(id = detail.id, name = %detail.name, "detail loaded");
                self.state = LoadState::Ready(detail);
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(identifier = %request.identifier, error = %e, "detail load failed");
                self.state = LoadState::Failed(e.clone());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Fetch and apply the detail for `identifier`. An absent or blank
    /// identifier fails with [`FetchError::NotFound`] without touching the
    /// source.
    pub async fn load_detail<S: CatalogSource + ?Sized>(
        &mut self,
        source: &S,
        identifier: Option<&str>,
    ) -> LoadOutcome {
        let Some(id) = normalize(identifier) else {
            self.generation += 1;
            let err = FetchError::NotFound(UNRESOLVED.to_string());
            self.state = LoadState::Failed(err.clone());
            return LoadOutcome::Failed(err);
        };
        self.identifier = Some(id.clone());
        let request = self.begin_load(id);
        let result = source.fetch_detail(&request.identifier).await;
        self.complete_load(&request, result)
    }

    /// Re-fetch the current identifier, if any.
    pub fn reload(&mut self) -> Option<DetailRequest> {
        let id = self.identifier.clone()?;
        Some(self.begin_load(id))
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn state(&self) -> &LoadState<EntryDetail> {
        &self.state
    }

    pub fn detail(&self) -> Option<&EntryDetail> {
        self.state.ready()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

fn normalize(identifier: Option<&str>) -> Option<String> {
    identifier
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

// Read-only projections used by the detail view. None of them alter the
// stored record.
impl EntryDetail {
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    /// The first [`MAX_DISPLAY_MOVES`] moves.
    pub fn display_moves(&self) -> &[String] {
        &self.moves[..self.moves.len().min(MAX_DISPLAY_MOVES)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::fixture_detail;

    #[test]
    fn unresolved_identifier_does_not_fetch() {
        let mut c = DetailController::new();
        assert_eq!(c.set_identifier(None), None);
        assert_eq!(c.set_identifier(Some("  ")), None);
        assert_eq!(c.state(), &LoadState::Idle);
    }

    #[test]
    fn resolved_identifier_starts_loading_once() {
        let mut c = DetailController::new();
        let req = c.set_identifier(Some("bulbasaur")).unwrap();
        assert_eq!(req.identifier, "bulbasaur");
        assert!(c.is_loading());

        // Same identifier again (e.g. a re-render) does not refetch.
        assert_eq!(c.set_identifier(Some("bulbasaur")), None);
    }

    #[test]
    fn changing_identifier_supersedes_in_flight_fetch() {
        let mut c = DetailController::new();
        let first = c.set_identifier(Some("bulbasaur")).unwrap();
        let second = c.set_identifier(Some("ivysaur")).unwrap();

        assert_eq!(
            c.complete_load(&first, Ok(fixture_detail("bulbasaur", 1, 3))),
            LoadOutcome::Stale
        );
        assert!(c.is_loading());
        assert_eq!(
            c.complete_load(&second, Ok(fixture_detail("ivysaur", 2, 3))),
            LoadOutcome::Applied
        );
        assert_eq!(c.detail().unwrap().name, "ivysaur");
    }

    #[test]
    fn failure_holds_no_payload() {
        let mut c = DetailController::new();
        let req = c.set_identifier(Some("missingno")).unwrap();
        c.complete_load(&req, Err(FetchError::NotFound("missingno".into())));
        assert!(c.detail().is_none());
        assert!(c.state().error().unwrap().is_not_found());
    }

    #[test]
    fn moves_are_truncated_for_display_only() {
        let detail = fixture_detail("mew", 151, 25);
        assert_eq!(detail.display_moves().len(), MAX_DISPLAY_MOVES);
        assert_eq!(detail.display_moves()[9], "move-10");
        assert_eq!(detail.moves.len(), 25);
    }

    #[test]
    fn short_move_list_is_shown_whole() {
        let detail = fixture_detail("ditto", 132, 1);
        assert_eq!(detail.display_moves(), &["move-1".to_string()]);
        assert_eq!(detail.types().len(), 2);
        assert_eq!(detail.abilities()[0].name, "overgrow");
        assert_eq!(detail.stats()[0].base_stat, 45);
    }
}
