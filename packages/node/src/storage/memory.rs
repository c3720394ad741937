//! In-memory contest storage.
//!
//! All data is held in RAM behind a [`RwLock`] and is lost when the process
//! exits. [`MemoryStorage::demo`] seeds a small contest so a freshly started
//! node has something to serve.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Clarification, Contest, ContestStorage, Problem, StorageError, Team, TeamFilter};

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct Inner {
    contest: Contest,
    problems: Vec<Problem>,
    teams: BTreeMap<u32, Team>,
    clarifications: Vec<Clarification>,
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`ContestStorage`].
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    /// An empty store around `contest`.
    pub fn new(contest: Contest) -> Self {
        Self {
            inner: RwLock::new(Inner {
                contest,
                problems: Vec::new(),
                teams: BTreeMap::new(),
                clarifications: Vec::new(),
            }),
        }
    }

    /// A small seeded contest with three problems and three teams.
    pub fn demo() -> Self {
        let store = Self::new(Contest {
            id: 2,
            shortname: "demo".into(),
            name: "Demo contest".into(),
            penalty_time: 20,
        });
        let problem = |id: u32, shortname: &str, name: &str, color: &str| Problem {
            id,
            cid: 2,
            shortname: shortname.into(),
            name: name.into(),
            color: Some(color.into()),
        };
        store.add_problems([
            problem(1, "hello", "Hello World", "#9486EA"),
            problem(2, "fltcmp", "Float special compare test", "#FF7109"),
            problem(3, "boolfind", "Boolean switch search", "#CCFF00"),
        ]);
        let team = |id: u32, name: &str, category: u32, affiliation: Option<&str>| Team {
            id,
            name: name.into(),
            category,
            affiliation: affiliation.map(Into::into),
        };
        store.add_teams([
            team(1, "Example teamname", 2, Some("UU")),
            team(2, "Another team", 2, Some("VU")),
            team(3, "Jury test team", 1, None),
        ]);
        store
    }

    pub fn add_problems(&self, problems: impl IntoIterator<Item = Problem>) {
        if let Ok(mut inner) = self.write() {
            inner.problems.extend(problems);
        }
    }

    pub fn add_teams(&self, teams: impl IntoIterator<Item = Team>) {
        if let Ok(mut inner) = self.write() {
            inner.teams.extend(teams.into_iter().map(|t| (t.id, t)));
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner
            .read()
            .map_err(|_| StorageError::Internal("contest store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner
            .write()
            .map_err(|_| StorageError::Internal("contest store lock poisoned".into()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::demo()
    }
}

// ---------------------------------------------------------------------------
// ContestStorage impl
// ---------------------------------------------------------------------------

impl ContestStorage for MemoryStorage {
    fn active_contest(&self) -> Result<Contest, StorageError> {
        Ok(self.read()?.contest.clone())
    }

    fn problems(&self, cid: u32) -> Result<Vec<Problem>, StorageError> {
        let inner = self.read()?;
        if inner.contest.id != cid {
            return Err(StorageError::NotFound(format!("contest {cid}")));
        }
        let mut problems: Vec<Problem> =
            inner.problems.iter().filter(|p| p.cid == cid).cloned().collect();
        problems.sort_by(|a, b| a.shortname.cmp(&b.shortname));
        Ok(problems)
    }

    fn teams(&self, filter: TeamFilter) -> Result<Vec<Team>, StorageError> {
        let inner = self.read()?;
        Ok(inner
            .teams
            .values()
            .filter(|t| filter.category.map_or(true, |c| t.category == c))
            .filter(|t| filter.team_id.map_or(true, |id| t.id == id))
            .cloned()
            .collect())
    }

    fn rename_team(&self, id: u32, name: &str) -> Result<Team, StorageError> {
        let mut inner = self.write()?;
        let team = inner
            .teams
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("team {id}")))?;
        team.name = name.to_string();
        Ok(team.clone())
    }

    fn add_clarification(
        &self,
        team: u32,
        problem: Option<u32>,
        text: &str,
    ) -> Result<Clarification, StorageError> {
        let mut inner = self.write()?;
        if !inner.teams.contains_key(&team) {
            return Err(StorageError::NotFound(format!("team {team}")));
        }
        if let Some(p) = problem {
            if !inner.problems.iter().any(|x| x.id == p) {
                return Err(StorageError::NotFound(format!("problem {p}")));
            }
        }
        let clar = Clarification {
            id: inner.clarifications.len() as u32 + 1,
            team,
            problem,
            text: text.to_string(),
        };
        inner.clarifications.push(clar.clone());
        Ok(clar)
    }

    fn clarifications(&self) -> Result<Vec<Clarification>, StorageError> {
        Ok(self.read()?.clarifications.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
