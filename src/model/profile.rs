use crate::config::{TravelerMix, MINOR_AGE};
use crate::model::TravelerId;
use rand::Rng;

/// Who a traveler is and what they bring to the gate.
///
/// A profile with `dependent: Some(_)` describes a parent traveling with a
/// minor. The pair crosses the gate as one unit and takes two seats, while
/// the cargo (if any) is the parent's alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelerProfile {
    pub id: TravelerId,
    pub is_priority: bool,
    pub has_cargo: bool,
    pub age: u8,
    pub dependent: Option<TravelerId>,
}

/// Attributes drawn for a new arrival before ids are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnTraits {
    pub is_priority: bool,
    pub has_cargo: bool,
    pub age: u8,
    pub brings_dependent: bool,
}

impl TravelerMix {
    /// Draws the attributes of one arrival. Only adults bring a dependent.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> DrawnTraits {
        let is_priority = rng.gen_bool(self.priority_chance);
        let has_cargo = rng.gen_bool(self.cargo_chance);
        let age = rng.gen_range(0..self.max_age);
        let brings_dependent = age >= MINOR_AGE && rng.gen_bool(self.dependent_chance);
        DrawnTraits {
            is_priority,
            has_cargo,
            age,
            brings_dependent,
        }
    }
}

impl TravelerProfile {
    /// A plain adult without cargo, priority or dependent.
    pub fn adult(id: u32) -> Self {
        Self {
            id: TravelerId(id),
            is_priority: false,
            has_cargo: false,
            age: 30,
            dependent: None,
        }
    }

    /// A minor traveling alone.
    pub fn minor(id: u32) -> Self {
        Self {
            age: MINOR_AGE - 1,
            ..Self::adult(id)
        }
    }

    pub fn from_traits(id: TravelerId, traits: DrawnTraits, dependent: Option<TravelerId>) -> Self {
        Self {
            id,
            is_priority: traits.is_priority,
            has_cargo: traits.has_cargo,
            age: traits.age,
            dependent,
        }
    }

    pub fn with_cargo(mut self) -> Self {
        self.has_cargo = true;
        self
    }

    pub fn with_priority(mut self) -> Self {
        self.is_priority = true;
        self
    }

    pub fn with_dependent(mut self, dependent: u32) -> Self {
        self.dependent = Some(TravelerId(dependent));
        self
    }

    pub fn is_minor(&self) -> bool {
        self.age < MINOR_AGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn minors_never_bring_dependents() {
        let mix = TravelerMix {
            dependent_chance: 1.0,
            ..TravelerMix::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let traits = mix.draw(&mut rng);
            assert!(traits.age < mix.max_age);
            assert_eq!(traits.brings_dependent, traits.age >= MINOR_AGE);
        }
    }
}
