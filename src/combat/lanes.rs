use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Left,
    Center,
    Right,
}

impl Sector {
    pub const ALL: [Sector; 3] = [Sector::Left, Sector::Center, Sector::Right];

    /// Hub bonuses only apply here.
    pub const fn is_center(self) -> bool {
        matches!(self, Sector::Center)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Sector::Left => "left",
            Sector::Center => "center",
            Sector::Right => "right",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly one slot per sector. Unknown keys are rejected when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lanes<T> {
    #[serde(default)]
    pub left: T,
    #[serde(default)]
    pub center: T,
    #[serde(default)]
    pub right: T,
}

impl<T> Lanes<T> {
    pub fn from_fn(mut f: impl FnMut(Sector) -> T) -> Self {
        Self {
            left: f(Sector::Left),
            center: f(Sector::Center),
            right: f(Sector::Right),
        }
    }

    pub fn get(&self, sector: Sector) -> &T {
        match sector {
            Sector::Left => &self.left,
            Sector::Center => &self.center,
            Sector::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, sector: Sector) -> &mut T {
        match sector {
            Sector::Left => &mut self.left,
            Sector::Center => &mut self.center,
            Sector::Right => &mut self.right,
        }
    }

    /// Slots in sector order.
    pub fn iter(&self) -> impl Iterator<Item = (Sector, &T)> {
        Sector::ALL.into_iter().map(move |sector| (sector, self.get(sector)))
    }

    /// Map every slot, stopping at the first error in sector order.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(Sector, &T) -> Result<U, E>,
    ) -> Result<Lanes<U>, E> {
        Ok(Lanes {
            left: f(Sector::Left, &self.left)?,
            center: f(Sector::Center, &self.center)?,
            right: f(Sector::Right, &self.right)?,
        })
    }
}
