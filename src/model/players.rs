//! Online player list

/// Players in one permission group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerGroup {
    pub name: String,
    pub players: Vec<String>,
}

/// Online players, grouped in the order the server listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerList {
    pub groups: Vec<PlayerGroup>,
}

impl PlayerList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append players under `group`, merging with an existing group of that name
    pub fn push_group(&mut self, group: impl Into<String>, players: Vec<String>) {
        let group = group.into();
        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.players.extend(players),
            None => self.groups.push(PlayerGroup {
                name: group,
                players,
            }),
        }
    }

    /// Players of one group
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.players.as_slice())
    }

    /// All players, in listing order
    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.players.iter().map(String::as_str))
    }

    /// Total number of players
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.players.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
