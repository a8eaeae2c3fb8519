//! Name generation utilities

use crate::components::Name;
use rand::Rng;

/// Pick a random miner name.
pub fn generate_name(rng: &mut impl Rng) -> Name {
    Name::new(MINER_NAMES[rng.gen_range(0..MINER_NAMES.len())])
}

static MINER_NAMES: &[&str] = &[
    // Common
    "James", "Cody", "Chris", "Robert", "Drew", "Josh", "Tristan", "Michael", "David", "Thomas",
    "Daniel", "Mark", "Paul", "Kevin", "Brian", "George", "Ryan", "Jacob", "Eric", "Scott",
    "Samuel", "Frank", "Patrick", "Tyler", "Aaron", "Henry", "Nathan", "Peter", "Kyle", "Walter",
    "Ethan", "Sean", "Austin", "Arthur", "Dylan", "Jordan", "Bruce", "Logan", "Victor", "Liam",
    "Mason", "Lucas", "Oliver", "Aiden", "Eizo", "Martin",
    // Call signs
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India", "Juliet",
    "Kilo", "Lima", "Oscar", "Quebec", "Sierra", "Tango", "Yankee", "Zulu",
    // Nicknames
    "Monkey", "Badger", "Mole", "Gopher", "Digger", "Pebble", "Rocky", "Flint", "Cobble", "Grit",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_name() {
        let mut rng = rand::thread_rng();
        let name = generate_name(&mut rng);
        assert!(!name.as_str().is_empty());
    }

    #[test]
    fn test_name_variety() {
        let mut rng = StdRng::seed_from_u64(7);
        let names: std::collections::HashSet<_> =
            (0..200).map(|_| generate_name(&mut rng).0).collect();
        assert!(names.len() > 20);
    }
}
